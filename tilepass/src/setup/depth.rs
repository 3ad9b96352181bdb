// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inverse depth planes.

use tilepass_encoding::PrimitiveKind;

use crate::context::Vertex;
use crate::util::{Plane, Vec2};

/// First synthetic inverse depth of a frame.
pub const SYNTHETIC_DEPTH_BASE: f32 = 1e-4;
/// Increment between consecutive synthetic depths.
pub const SYNTHETIC_DEPTH_STEP: f32 = 1e-6;

/// Hands out strictly increasing inverse depths so that primitives drawn
/// with depth disabled resolve in submission order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SyntheticDepth {
    next: f32,
}

impl Default for SyntheticDepth {
    fn default() -> Self {
        Self {
            next: SYNTHETIC_DEPTH_BASE,
        }
    }
}

impl SyntheticDepth {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn next(&mut self) -> f32 {
        let value = self.next;
        self.next += SYNTHETIC_DEPTH_STEP;
        value
    }
}

/// Where a primitive's depth comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DepthSource {
    Vertices,
    Synthetic(f32),
}

/// Returns the inverse depth plane and the nearest inverse depth.
pub(crate) fn plane(
    kind: PrimitiveKind,
    points: &[Vec2],
    vertices: &[Vertex],
    source: DepthSource,
) -> (Plane, f32) {
    if let DepthSource::Synthetic(value) = source {
        return (Plane::constant(value), value);
    }
    let nearest = vertices.iter().map(|v| v.inv_w).fold(f32::MIN, f32::max);
    let plane = match kind {
        PrimitiveKind::Triangle => Plane::fit_triangle(
            [points[0], points[1], points[2]],
            [vertices[0].inv_w, vertices[1].inv_w, vertices[2].inv_w],
        ),
        PrimitiveKind::Line => {
            Plane::fit_segment(points[0], points[1], vertices[0].inv_w, vertices[1].inv_w)
        }
        PrimitiveKind::Point | PrimitiveKind::Sprite => Plane::constant(vertices[0].inv_w),
    };
    (plane, nearest)
}
