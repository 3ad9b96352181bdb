// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Maps a primitive kind and render context onto a material variant.

use tilepass_encoding::{PrimitiveKind, ShadingStyle, TranslucencyStyle, Variant};

use crate::context::{ContextFlags, RenderContext};
use crate::texture::{TextureInfo, TextureLookup};

/// What the hardware path of a primitive kind can do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindCapabilities {
    /// Colours can vary across the primitive.
    pub smooth: bool,
    pub textured: bool,
}

impl KindCapabilities {
    pub const fn of(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Line => Self {
                smooth: true,
                textured: false,
            },
            PrimitiveKind::Point => Self {
                smooth: false,
                textured: false,
            },
            PrimitiveKind::Sprite => Self {
                smooth: false,
                textured: true,
            },
            PrimitiveKind::Triangle => Self {
                smooth: true,
                textured: true,
            },
        }
    }
}

/// Result of classifying a submission call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub variant: Variant,
    /// The resolved texture, present exactly when the variant is textured.
    pub texture: Option<TextureInfo>,
    /// Texturing was requested but the texture did not resolve.
    pub texture_degraded: bool,
}

/// Selects the material variant for `kind` under `ctx`.
///
/// Requests the kind cannot honour fall back to the nearest variant it
/// supports. The result depends only on the inputs.
pub fn classify(
    kind: PrimitiveKind,
    ctx: &RenderContext,
    textures: &impl TextureLookup,
) -> Classification {
    let caps = KindCapabilities::of(kind);
    let flags = ctx.flags;

    let gouraud = flags.contains(ContextFlags::GOURAUD) && caps.smooth;
    let shading = match (gouraud, flags.contains(ContextFlags::HIGHLIGHT)) {
        (false, false) => ShadingStyle::Flat,
        (true, false) => ShadingStyle::Gouraud,
        (false, true) => ShadingStyle::FlatHighlight,
        (true, true) => ShadingStyle::Highlight,
    };

    let translucency = match (
        flags.contains(ContextFlags::VERTEX_TRANSLUCENT),
        flags.contains(ContextFlags::GLOBAL_TRANSLUCENT),
    ) {
        (false, false) => TranslucencyStyle::Opaque,
        (false, true) => TranslucencyStyle::Global,
        (true, false) => TranslucencyStyle::PerVertex,
        (true, true) => TranslucencyStyle::PerVertexGlobal,
    };

    let mut texture = None;
    let mut texture_degraded = false;
    if flags.contains(ContextFlags::TEXTURE) && caps.textured {
        texture = ctx.texture.and_then(|id| textures.resolve(id));
        texture_degraded = texture.is_none();
    }

    Classification {
        variant: Variant {
            shading,
            translucency,
            volume: ctx.volume,
            textured: texture.is_some(),
        },
        texture,
        texture_degraded,
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, KindCapabilities};
    use crate::context::{ContextFlags, RenderContext};
    use crate::texture::{NoTextures, TextureId, TextureInfo, TextureMap};
    use tilepass_encoding::{PrimitiveKind, ShadingStyle, TranslucencyStyle, Variant, VolumeMode};

    fn textures() -> TextureMap {
        let mut map = TextureMap::new();
        map.insert(
            TextureId(1),
            TextureInfo {
                base_address: 64,
                inv_texel_size: 1.0 / 64.0,
                has_alpha: true,
            },
        );
        map
    }

    #[test]
    fn plain_context_is_flat_opaque() {
        for kind in PrimitiveKind::ALL {
            let c = classify(kind, &RenderContext::new(), &NoTextures);
            assert_eq!(Variant::FLAT_OPAQUE, c.variant);
            assert!(!c.texture_degraded);
        }
    }

    #[test]
    fn points_and_sprites_degrade_to_flat() {
        let ctx = RenderContext::new().with_flags(ContextFlags::GOURAUD | ContextFlags::HIGHLIGHT);
        for kind in [PrimitiveKind::Point, PrimitiveKind::Sprite] {
            let c = classify(kind, &ctx, &NoTextures);
            assert_eq!(ShadingStyle::FlatHighlight, c.variant.shading);
        }
        let c = classify(PrimitiveKind::Triangle, &ctx, &NoTextures);
        assert_eq!(ShadingStyle::Highlight, c.variant.shading);
    }

    #[test]
    fn unresolvable_texture_degrades() {
        let ctx = RenderContext::new().with_texture(TextureId(9));
        let c = classify(PrimitiveKind::Triangle, &ctx, &textures());
        assert!(!c.variant.textured);
        assert!(c.texture_degraded);

        let ctx = RenderContext::new().with_texture(TextureId(1));
        let c = classify(PrimitiveKind::Triangle, &ctx, &textures());
        assert!(c.variant.textured);
        assert_eq!(Some(64), c.texture.map(|t| t.base_address));

        // Lines cannot texture at all; that is not a lookup failure.
        let c = classify(PrimitiveKind::Line, &ctx, &textures());
        assert!(!c.variant.textured);
        assert!(!c.texture_degraded);
    }

    #[test]
    fn classification_is_idempotent() {
        let ctx = RenderContext::new()
            .with_flags(ContextFlags::GOURAUD | ContextFlags::VERTEX_TRANSLUCENT)
            .with_global_alpha(0.25)
            .with_volume(VolumeMode::Shadow)
            .with_texture(TextureId(1));
        let textures = textures();
        for kind in PrimitiveKind::ALL {
            let first = classify(kind, &ctx, &textures);
            assert_eq!(first, classify(kind, &ctx, &textures));
            assert_eq!(
                TranslucencyStyle::PerVertexGlobal,
                first.variant.translucency
            );
            assert_eq!(VolumeMode::Shadow, first.variant.volume);
            let caps = KindCapabilities::of(kind);
            assert_eq!(caps.textured, first.variant.textured);
            assert_eq!(caps.smooth, first.variant.shading.is_smooth());
        }
    }
}
