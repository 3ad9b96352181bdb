// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colour, alpha and highlight terms of the shading record.

use smallvec::SmallVec;
use tilepass_encoding::math::{channel_to_u8, pack_argb, pack_signed, unpack_argb, SharedExponent};
use tilepass_encoding::TranslucencyStyle;

use super::{fit_plane, RefPoint, Samples};
use crate::context::Vertex;
use crate::util::{Plane, Vec2};

const COLOR_MANTISSA_BITS: u32 = 9;
const PAIR_MANTISSA_BITS: u32 = 12;
const EXPONENT_SHIFT: u32 = 28;

/// Alpha of each vertex in `[0, 255]` under a translucency style.
pub(crate) fn vertex_alphas(
    vertices: &[Vertex],
    style: TranslucencyStyle,
    global_alpha: f32,
) -> Samples {
    let global = if style.uses_global() {
        global_alpha
    } else {
        1.0
    };
    vertices
        .iter()
        .map(|v| {
            let a = if style.uses_vertex_alpha() {
                (v.color >> 24) as f32
            } else {
                255.0
            };
            a * global
        })
        .collect()
}

/// Base colour of a flat-shaded primitive: the first vertex's colour with the
/// mean alpha.
pub(crate) fn flat_color(vertices: &[Vertex], alphas: &[f32]) -> u32 {
    let [_, r, g, b] = unpack_argb(vertices[0].color);
    let mean = alphas.iter().sum::<f32>() / alphas.len() as f32;
    pack_argb([channel_to_u8(mean), r, g, b])
}

/// Words of a smooth-shaded colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SmoothColor {
    /// Colour at the reference point, rescaled to full intensity.
    pub base_color: u32,
    pub dx: u32,
    pub dy: u32,
    /// Reference point plus the intensity the hardware scales back down by.
    pub reference: u32,
    pub alpha_gradient: Option<u32>,
}

/// Fits colour planes through the vertices.
///
/// The colours are rescaled so the brightest channel over all vertices
/// reaches 255; the reference word carries that channel's original value so
/// the hardware can undo the scaling after interpolating.
pub(crate) fn smooth_color(
    points: &[Vec2],
    vertices: &[Vertex],
    alphas: &[f32],
    style: TranslucencyStyle,
    origin: RefPoint,
) -> SmoothColor {
    let rgb: SmallVec<[[u8; 3]; 3]> = vertices
        .iter()
        .map(|v| {
            let [_, r, g, b] = unpack_argb(v.color);
            [r, g, b]
        })
        .collect();
    let intensity = rgb.iter().flatten().copied().max().unwrap_or(0);
    let scale = if intensity == 0 {
        1.0
    } else {
        255.0 / intensity as f32
    };
    let planes = [0, 1, 2].map(|ch| {
        let values: Samples = rgb.iter().map(|c| c[ch] as f32 * scale).collect();
        fit_plane(points, &values)
    });
    let at = origin.position();
    let [r, g, b] = planes.map(|p| channel_to_u8(p.eval(at)));

    let (alpha, alpha_gradient) = if style.uses_vertex_alpha() {
        let plane = fit_plane(points, alphas);
        (
            channel_to_u8(plane.eval(at)),
            Some(gradient_pair_word(plane.a, plane.b)),
        )
    } else {
        (channel_to_u8(alphas[0]), None)
    };

    let (dx, dy) = color_gradient_words(&planes);
    SmoothColor {
        base_color: pack_argb([alpha, r, g, b]),
        dx,
        dy,
        reference: origin.word(intensity),
        alpha_gradient,
    }
}

/// Encodes the x and y gradients of three colour planes. Both words share
/// one exponent.
pub(crate) fn color_gradient_words(planes: &[Plane; 3]) -> (u32, u32) {
    let se = SharedExponent::<6>::encode(
        [
            planes[0].a,
            planes[1].a,
            planes[2].a,
            planes[0].b,
            planes[1].b,
            planes[2].b,
        ],
        COLOR_MANTISSA_BITS,
    );
    let word = |m: &[i32]| {
        pack_signed(m[0], COLOR_MANTISSA_BITS)
            | pack_signed(m[1], COLOR_MANTISSA_BITS) << COLOR_MANTISSA_BITS
            | pack_signed(m[2], COLOR_MANTISSA_BITS) << (2 * COLOR_MANTISSA_BITS)
            | se.exponent << EXPONENT_SHIFT
    };
    (word(&se.mantissas[..3]), word(&se.mantissas[3..]))
}

/// Encodes the `(dx, dy)` gradient of a scalar such as alpha or highlight
/// intensity.
pub(crate) fn gradient_pair_word(dx: f32, dy: f32) -> u32 {
    let se = SharedExponent::<2>::encode([dx, dy], PAIR_MANTISSA_BITS);
    pack_signed(se.mantissas[0], PAIR_MANTISSA_BITS)
        | pack_signed(se.mantissas[1], PAIR_MANTISSA_BITS) << PAIR_MANTISSA_BITS
        | se.exponent << EXPONENT_SHIFT
}

fn highlight_intensity(specular: u32) -> u8 {
    let [_, r, g, b] = unpack_argb(specular);
    r.max(g).max(b)
}

/// Highlight word of the first vertex.
pub(crate) fn flat_highlight(vertices: &[Vertex]) -> u32 {
    let specular = vertices[0].specular & 0x00ff_ffff;
    specular | (highlight_intensity(specular) as u32) << 24
}

/// Highlight word at the reference point plus its intensity gradient.
pub(crate) fn smooth_highlight(
    points: &[Vec2],
    vertices: &[Vertex],
    origin: RefPoint,
) -> (u32, u32) {
    let intensities: Samples = vertices
        .iter()
        .map(|v| highlight_intensity(v.specular) as f32)
        .collect();
    let plane = fit_plane(points, &intensities);
    let at_origin = channel_to_u8(plane.eval(origin.position()));
    let word = (vertices[0].specular & 0x00ff_ffff) | (at_origin as u32) << 24;
    (word, gradient_pair_word(plane.a, plane.b))
}
