// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::Shape;
use crate::util::Vec2;

/// Screen-aligned quad centred on `center`, scaled by the vertex's inverse
/// depth. Returns `None` for quads with no area or behind the eye.
pub(crate) fn shape(center: Vec2, inv_w: f32, size: [f32; 2]) -> Option<Shape> {
    if inv_w.is_nan() || inv_w <= 0.0 {
        return None;
    }
    let half = Vec2::new(size[0], size[1]) * (0.5 * inv_w);
    if half.x == 0.0 || half.y == 0.0 || !half.is_finite() {
        return None;
    }
    let min = center - half;
    let max = center + half;
    Some(Shape {
        edges: [
            [0.0, 1.0, -min.y],
            [0.0, -1.0, max.y],
            [1.0, 0.0, -min.x],
            [-1.0, 0.0, max.x],
        ],
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::shape;
    use crate::util::Vec2;

    #[test]
    fn size_follows_inverse_depth() {
        let Some(near) = shape(Vec2::new(100.0, 100.0), 1.0, [16.0, 8.0]) else {
            panic!("sprite culled");
        };
        assert_eq!(Vec2::new(92.0, 96.0), near.min);
        assert_eq!(Vec2::new(108.0, 104.0), near.max);
        let Some(far) = shape(Vec2::new(100.0, 100.0), 0.5, [16.0, 8.0]) else {
            panic!("sprite culled");
        };
        assert_eq!(Vec2::new(96.0, 98.0), far.min);
    }

    #[test]
    fn empty_or_behind_is_culled() {
        assert!(shape(Vec2::new(0.0, 0.0), 1.0, [0.0, 4.0]).is_none());
        assert!(shape(Vec2::new(0.0, 0.0), -1.0, [4.0, 4.0]).is_none());
        assert!(shape(Vec2::new(0.0, 0.0), f32::NAN, [4.0, 4.0]).is_none());
    }
}
