// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines and points as boxes around a segment.

use tilepass_encoding::Edge;

use super::Shape;
use crate::util::Vec2;

/// Unit direction and left normal of the segment `p0 -> p1`.
///
/// Axis-aligned and zero-length segments get exact unit coefficients; a
/// zero-length segment is treated as horizontal.
pub(crate) fn frame(p0: Vec2, p1: Vec2) -> (Vec2, Vec2) {
    let d = p1 - p0;
    let dir = if d.x == 0.0 && d.y == 0.0 {
        Vec2::new(1.0, 0.0)
    } else if d.x == 0.0 {
        Vec2::new(0.0, d.y.signum())
    } else if d.y == 0.0 {
        Vec2::new(d.x.signum(), 0.0)
    } else {
        return general_frame(d);
    };
    (dir, dir.perp())
}

fn general_frame(d: Vec2) -> (Vec2, Vec2) {
    let dir = d * (1.0 / d.length());
    (dir, dir.perp())
}

/// Side, opposite side, start cap and end cap, each pushed out by `hw`.
fn edges(p0: Vec2, p1: Vec2, dir: Vec2, n: Vec2, hw: f32) -> [Edge; 4] {
    [
        [n.x, n.y, hw - n.dot(p0)],
        [-n.x, -n.y, hw + n.dot(p0)],
        [dir.x, dir.y, hw - dir.dot(p0)],
        [-dir.x, -dir.y, hw + dir.dot(p1)],
    ]
}

/// A segment of width `2 * hw`. Points pass `p0 == p1`.
pub(crate) fn shape(p0: Vec2, p1: Vec2, hw: f32) -> Shape {
    let (dir, n) = frame(p0, p1);
    let along = dir * hw;
    let across = n * hw;
    let corners = [
        p0 - along + across,
        p0 - along - across,
        p1 + along + across,
        p1 + along - across,
    ];
    let (min, max) = corners
        .iter()
        .fold((corners[0], corners[0]), |(min, max), c| (min.min(*c), max.max(*c)));
    Shape {
        edges: edges(p0, p1, dir, n, hw),
        min,
        max,
    }
}
