// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Perspective texture mapping terms.

use tilepass_encoding::math::{
    encode_mip_float, largest_magnitude, pack_signed, to_fixed_1_15, SharedExponent,
};
use tilepass_encoding::TEXTURE_WORDS;

use super::{fit_plane, RefPoint, Samples};
use crate::context::Vertex;
use crate::texture::TextureInfo;
use crate::util::{Plane, Vec2};

const ADDRESS_MASK: u32 = (1 << 21) - 1;
const MIP_EXPONENT_SHIFT: u32 = 24;
const COEFFICIENT_EXPONENT_SHIFT: u32 = 28;
const MANTISSA_BITS: u32 = 16;

/// The projective map from device position to texel coordinates:
/// `u = U(x, y) / W(x, y)` and `v = V(x, y) / W(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Projection {
    pub u: Plane,
    pub v: Plane,
    pub w: Plane,
}

impl Projection {
    /// Fits the map through the vertices' perspective-divided coordinates.
    pub(crate) fn from_vertices(
        points: &[Vec2],
        vertices: &[Vertex],
        texture: &TextureInfo,
    ) -> Self {
        let size = texture.size();
        let u: Samples = vertices.iter().map(|v| v.u_over_w * size).collect();
        let v: Samples = vertices.iter().map(|v| v.v_over_w * size).collect();
        let w: Samples = vertices.iter().map(|v| v.inv_w).collect();
        Self {
            u: fit_plane(points, &u),
            v: fit_plane(points, &v),
            w: fit_plane(points, &w),
        }
    }

    /// Maps the whole texture over the quad `[min, max]` at constant depth.
    pub(crate) fn for_quad(min: Vec2, max: Vec2, inv_w: f32, texture: &TextureInfo) -> Self {
        let size = texture.size();
        let extent = max - min;
        let su = size * inv_w / extent.x;
        let sv = size * inv_w / extent.y;
        Self {
            u: Plane {
                a: su,
                b: 0.0,
                c: -su * min.x,
            },
            v: Plane {
                a: 0.0,
                b: sv,
                c: -sv * min.y,
            },
            w: Plane::constant(inv_w),
        }
    }

    pub(crate) fn rebased(&self, origin: Vec2) -> Self {
        Self {
            u: self.u.rebased(origin),
            v: self.v.rebased(origin),
            w: self.w.rebased(origin),
        }
    }

    /// Texel area covered by one pixel at the constant-term position.
    pub(crate) fn compression(&self) -> f32 {
        let (u, v, w) = (self.u.c as f64, self.v.c as f64, self.w.c as f64);
        if w == 0.0 {
            return f32::INFINITY;
        }
        let w2 = w * w;
        let dudx = (self.u.a as f64 * w - u * self.w.a as f64) / w2;
        let dudy = (self.u.b as f64 * w - u * self.w.b as f64) / w2;
        let dvdx = (self.v.a as f64 * w - v * self.w.a as f64) / w2;
        let dvdy = (self.v.b as f64 * w - v * self.w.b as f64) / w2;
        (dudx * dvdy - dudy * dvdx).abs() as f32
    }
}

/// Power of two bringing `max` into `[0.5, 1)`.
fn normalizing_shift(max: f32) -> i32 {
    if max == 0.0 || !max.is_finite() {
        return 0;
    }
    let max = max as f64;
    let mut k = -(max.log2().floor() as i32) - 1;
    while max * 2_f64.powi(k) >= 1.0 {
        k -= 1;
    }
    while max * 2_f64.powi(k) < 0.5 {
        k += 1;
    }
    k
}

/// Encodes the texture block of a shading record.
///
/// `projection` must already be rebased at the reference point. All nine
/// coefficients are scaled by the power of two that normalizes `W`, which
/// leaves the projected coordinates unchanged.
pub(crate) fn texture_words(
    texture: &TextureInfo,
    projection: &Projection,
    mip_scale: f32,
) -> [u32; TEXTURE_WORDS as usize] {
    let Projection { u, v, w } = *projection;
    let norm = 2_f32.powi(normalizing_shift(largest_magnitude(&[w.a, w.b, w.c])));
    let (u, v, w) = (u.scaled(norm), v.scaled(norm), w.scaled(norm));

    let uv = SharedExponent::<6>::encode([u.a, u.b, u.c, v.a, v.b, v.c], MANTISSA_BITS);
    let [ua, ub, uc, va, vb, vc] = uv.mantissas.map(|m| pack_signed(m, MANTISSA_BITS));
    let [wa, wb, wc] = w.to_array().map(|c| pack_signed(to_fixed_1_15(c), MANTISSA_BITS));

    let (mip_exponent, mip_mantissa) = encode_mip_float(projection.compression() * mip_scale);

    [
        (texture.base_address & ADDRESS_MASK)
            | mip_exponent << MIP_EXPONENT_SHIFT
            | uv.exponent << COEFFICIENT_EXPONENT_SHIFT,
        ua | ub << 16,
        uc | va << 16,
        vb | vc << 16,
        wa | wb << 16,
        wc | mip_mantissa << 16,
    ]
}

/// Texture words of a triangle.
pub(crate) fn polygon_texture(
    points: &[Vec2],
    vertices: &[Vertex],
    texture: &TextureInfo,
    origin: RefPoint,
    mip_scale: f32,
) -> [u32; TEXTURE_WORDS as usize] {
    let projection =
        Projection::from_vertices(points, vertices, texture).rebased(origin.position());
    texture_words(texture, &projection, mip_scale)
}
