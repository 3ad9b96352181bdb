// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bytemuck::{Pod, Zeroable};

use crate::{PrimitiveKind, Variant, VolumeMode};

/// First word of every geometry stream record.
#[derive(Copy, Clone, PartialEq, Eq, Pod, Zeroable, Default, Debug)]
#[repr(C)]
pub struct GeometryControl(pub u32);

impl GeometryControl {
    /// Mask of the shading-stream word offset.
    pub const SHADING_OFFSET_MASK: u32 = (1 << 22) - 1;
    const VOLUME_SHIFT: u32 = 22;
    pub const TRANSLUCENT: u32 = 1 << 24;
    /// Depth plane holds a synthetic inverse depth.
    pub const SYNTHETIC_DEPTH: u32 = 1 << 25;
    pub const TEXTURED: u32 = 1 << 26;
    const KIND_SHIFT: u32 = 28;
    pub const DEPTH_BIAS: u32 = 1 << 30;

    /// Base control bits for a variant of a primitive kind.
    pub const fn for_variant(kind: PrimitiveKind, variant: Variant) -> Self {
        let mut bits = (variant.volume as u32) << Self::VOLUME_SHIFT;
        if !matches!(variant.translucency, crate::TranslucencyStyle::Opaque) {
            bits |= Self::TRANSLUCENT;
        }
        if variant.textured {
            bits |= Self::TEXTURED;
        }
        bits |= (kind as u32) << Self::KIND_SHIFT;
        Self(bits)
    }

    /// Returns the control word pointing at `shading_offset`.
    pub const fn with_shading_offset(self, shading_offset: u32) -> Self {
        Self(self.0 & !Self::SHADING_OFFSET_MASK | (shading_offset & Self::SHADING_OFFSET_MASK))
    }

    pub const fn with_flags(self, flags: u32) -> Self {
        Self(self.0 | flags)
    }

    pub const fn shading_offset(self) -> u32 {
        self.0 & Self::SHADING_OFFSET_MASK
    }

    pub const fn kind(self) -> PrimitiveKind {
        PrimitiveKind::from_bits(self.0 >> Self::KIND_SHIFT)
    }

    pub const fn volume(self) -> VolumeMode {
        match (self.0 >> Self::VOLUME_SHIFT) & 3 {
            1 => VolumeMode::Shadow,
            2 => VolumeMode::LightVolume,
            _ => VolumeMode::None,
        }
    }
}

/// First word of every shading stream record.
#[derive(Copy, Clone, PartialEq, Eq, Pod, Zeroable, Default, Debug)]
#[repr(C)]
pub struct ShadingControl(pub u32);

impl ShadingControl {
    pub const GOURAUD: u32 = 1 << 0;
    pub const HIGHLIGHT: u32 = 1 << 1;
    pub const SMOOTH_HIGHLIGHT: u32 = 1 << 2;
    const TRANSLUCENCY_SHIFT: u32 = 3;
    const VOLUME_SHIFT: u32 = 5;
    pub const TEXTURED: u32 = 1 << 7;
    pub const FOG: u32 = 1 << 8;
    pub const MIP_OFFSET: u32 = 1 << 9;
    const WORDS_SHIFT: u32 = 16;
    const KIND_SHIFT: u32 = 28;

    /// Base control bits for a variant, including its word count.
    pub const fn for_variant(kind: PrimitiveKind, variant: Variant) -> Self {
        let mut bits = 0;
        if variant.shading.is_smooth() {
            bits |= Self::GOURAUD;
        }
        if variant.shading.has_highlight() {
            bits |= Self::HIGHLIGHT;
        }
        if matches!(variant.shading, crate::ShadingStyle::Highlight) {
            bits |= Self::SMOOTH_HIGHLIGHT;
        }
        bits |= (variant.translucency as u32) << Self::TRANSLUCENCY_SHIFT;
        bits |= (variant.volume as u32) << Self::VOLUME_SHIFT;
        if variant.textured {
            bits |= Self::TEXTURED;
        }
        bits |= variant.shading_words() << Self::WORDS_SHIFT;
        bits |= (kind as u32) << Self::KIND_SHIFT;
        Self(bits)
    }

    pub const fn with_flags(self, flags: u32) -> Self {
        Self(self.0 | flags)
    }

    /// Returns the size of the record (in u32s) this word heads.
    pub const fn words(self) -> u32 {
        (self.0 >> Self::WORDS_SHIFT) & 0xff
    }

    pub const fn kind(self) -> PrimitiveKind {
        PrimitiveKind::from_bits(self.0 >> Self::KIND_SHIFT)
    }
}

/// Link word written in the last word of a full geometry stream page.
pub const LINK_BIT: u32 = 1 << 31;

#[cfg(test)]
mod tests {
    use super::{GeometryControl, ShadingControl};
    use crate::{
        PrimitiveKind, ShadingStyle, TranslucencyStyle, Variant, VolumeMode, VARIANT_COUNT,
    };

    #[test]
    fn geometry_control_offset() {
        let variant = Variant {
            volume: VolumeMode::LightVolume,
            translucency: TranslucencyStyle::Global,
            ..Variant::FLAT_OPAQUE
        };
        let base = GeometryControl::for_variant(PrimitiveKind::Sprite, variant);
        let control = base.with_shading_offset(0x12345);
        assert_eq!(0x12345, control.shading_offset());
        assert_eq!(PrimitiveKind::Sprite, control.kind());
        assert_eq!(VolumeMode::LightVolume, control.volume());
        assert!(control.0 & GeometryControl::TRANSLUCENT != 0);
        // Re-pointing replaces the old offset.
        assert_eq!(7, control.with_shading_offset(7).shading_offset());
    }

    #[test]
    fn shading_control_carries_word_count() {
        for kind in PrimitiveKind::ALL {
            for ix in 0..VARIANT_COUNT {
                let variant = Variant::from_index(ix);
                let control = ShadingControl::for_variant(kind, variant);
                assert_eq!(variant.shading_words(), control.words());
                assert_eq!(kind, control.kind());
            }
        }
        let smooth = Variant {
            shading: ShadingStyle::Highlight,
            ..Variant::FLAT_OPAQUE
        };
        let control = ShadingControl::for_variant(PrimitiveKind::Triangle, smooth);
        assert_eq!(
            ShadingControl::GOURAUD | ShadingControl::HIGHLIGHT | ShadingControl::SMOOTH_HIGHLIGHT,
            control.0 & 0x7
        );
    }
}
