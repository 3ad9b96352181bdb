// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Material resolution: turns vertex attributes and render state into the
//! words of a shading record.

mod shade;
mod texture;

use smallvec::SmallVec;
use tilepass_encoding::math::channel_to_u8;
use tilepass_encoding::{GeometryRecord, MaterialRecord, TranslucencyStyle};

use crate::context::{ContextFlags, RenderContext, Vertex};
use crate::texture::TextureInfo;
use crate::util::{Plane, Vec2};

use texture::Projection;

pub(crate) type Samples = SmallVec<[f32; 3]>;

const MAX_REF_COORD: f32 = 4095.0;

/// One stage of material resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialStep {
    FlatColor(TranslucencyStyle),
    SmoothColor(TranslucencyStyle),
    FlatHighlight,
    SmoothHighlight,
    Shadow,
    LightVolume,
    Texture,
}

/// Device position the shading gradients are relative to, on the 12-bit
/// grid of the reference word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RefPoint {
    x: u32,
    y: u32,
}

impl RefPoint {
    pub(crate) fn new(p: Vec2) -> Self {
        Self {
            x: p.x.round().clamp(0.0, MAX_REF_COORD) as u32,
            y: p.y.round().clamp(0.0, MAX_REF_COORD) as u32,
        }
    }

    pub(crate) fn position(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    pub(crate) fn word(self, intensity: u8) -> u32 {
        self.x | self.y << 12 | (intensity as u32) << 24
    }
}

/// Plane through one, two or three samples.
pub(crate) fn fit_plane(points: &[Vec2], values: &[f32]) -> Plane {
    match (points, values) {
        ([p0, p1, p2, ..], [f0, f1, f2, ..]) => {
            Plane::fit_triangle([*p0, *p1, *p2], [*f0, *f1, *f2])
        }
        ([p0, p1, ..], [f0, f1, ..]) => Plane::fit_segment(*p0, *p1, *f0, *f1),
        (_, [f0, ..]) => Plane::constant(*f0),
        _ => Plane::default(),
    }
}

/// Everything material resolution reads about one primitive.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MaterialInput<'a> {
    pub vertices: &'a [Vertex],
    /// Device-space extent of a sprite.
    pub quad: Option<(Vec2, Vec2)>,
    pub texture: Option<&'a TextureInfo>,
}

/// Runs `steps` for one primitive, filling the base colour of `geometry` and
/// the words of `material`.
pub(crate) fn resolve(
    steps: &[MaterialStep],
    ctx: &RenderContext,
    input: &MaterialInput<'_>,
    geometry: &mut GeometryRecord,
    material: &mut MaterialRecord,
) {
    let vertices = input.vertices;
    let points: SmallVec<[Vec2; 3]> = vertices.iter().map(|v| Vec2::new(v.x, v.y)).collect();
    let origin = RefPoint::new(points[0]);

    for step in steps {
        match *step {
            MaterialStep::FlatColor(style) => {
                let alphas = shade::vertex_alphas(vertices, style, ctx.global_alpha);
                geometry.base_color = shade::flat_color(vertices, &alphas);
            }
            MaterialStep::SmoothColor(style) => {
                let alphas = shade::vertex_alphas(vertices, style, ctx.global_alpha);
                let color = shade::smooth_color(&points, vertices, &alphas, style, origin);
                geometry.base_color = color.base_color;
                material.color_dx = color.dx;
                material.color_dy = color.dy;
                material.shade_ref = color.reference;
                material.alpha_gradient = color.alpha_gradient.unwrap_or(0);
            }
            MaterialStep::FlatHighlight => {
                material.highlight = shade::flat_highlight(vertices);
            }
            MaterialStep::SmoothHighlight => {
                let (word, gradient) = shade::smooth_highlight(&points, vertices, origin);
                material.highlight = word;
                material.highlight_gradient = gradient;
            }
            MaterialStep::Shadow => {
                material.volume = channel_to_u8(ctx.shadow_brightness * 255.0) as u32;
            }
            MaterialStep::LightVolume => {
                material.volume = ctx.light_color & 0x00ff_ffff;
            }
            MaterialStep::Texture => {
                // Textured variants are only selected with a resolved texture.
                let Some(info) = input.texture else {
                    continue;
                };
                let mip_scale = if ctx.flags.contains(ContextFlags::MIP_OFFSET) {
                    4_f32.powf(ctx.mip_offset)
                } else {
                    1.0
                };
                material.texture = match input.quad {
                    Some((min, max)) => {
                        let projection = Projection::for_quad(min, max, vertices[0].inv_w, info)
                            .rebased(origin.position());
                        texture::texture_words(info, &projection, mip_scale)
                    }
                    None => texture::polygon_texture(&points, vertices, info, origin, mip_scale),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve, MaterialInput, MaterialStep, RefPoint};
    use crate::context::{RenderContext, Vertex};
    use crate::util::Vec2;
    use tilepass_encoding::{GeometryRecord, MaterialRecord, TranslucencyStyle};

    #[test]
    fn reference_point_clamps_to_word_range() {
        assert_eq!(
            RefPoint::new(Vec2::new(4095.0, 0.0)),
            RefPoint::new(Vec2::new(9000.0, -20.0))
        );
        assert_eq!(5 | 7 << 12 | 9 << 24, RefPoint::new(Vec2::new(4.6, 7.2)).word(9));
    }

    #[test]
    fn volume_steps() {
        let ctx = RenderContext::new()
            .with_shadow_brightness(0.5)
            .with_light_color(0xff12_3456);
        let vertices = [Vertex::new(1.0, 1.0, 1.0, 0xff00_0000)];
        let input = MaterialInput {
            vertices: &vertices,
            quad: None,
            texture: None,
        };
        let mut geometry = GeometryRecord::default();
        let mut material = MaterialRecord::default();
        resolve(&[MaterialStep::Shadow], &ctx, &input, &mut geometry, &mut material);
        assert_eq!(128, material.volume);
        resolve(&[MaterialStep::LightVolume], &ctx, &input, &mut geometry, &mut material);
        assert_eq!(0x12_3456, material.volume);
    }

    #[test]
    fn global_translucency_sets_base_alpha() {
        let ctx = RenderContext::new().with_global_alpha(0.25);
        let vertices = [Vertex::new(1.0, 1.0, 1.0, 0xff11_2233)];
        let input = MaterialInput {
            vertices: &vertices,
            quad: None,
            texture: None,
        };
        let mut geometry = GeometryRecord::default();
        let mut material = MaterialRecord::default();
        resolve(
            &[MaterialStep::FlatColor(TranslucencyStyle::Global)],
            &ctx,
            &input,
            &mut geometry,
            &mut material,
        );
        assert_eq!(0x4011_2233, geometry.base_color);
    }
}
