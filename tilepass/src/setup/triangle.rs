// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tilepass_encoding::Edge;

use super::Shape;
use crate::util::Vec2;

/// Normalized edge through `pa -> pb`, scaled by `sign` so the interior of a
/// triangle with that winding is non-negative.
fn edge(pa: Vec2, pb: Vec2, sign: f32) -> Edge {
    let d = pb - pa;
    let (a, b) = if d.y == 0.0 {
        (0.0, sign * d.x.signum())
    } else if d.x == 0.0 {
        (-sign * d.y.signum(), 0.0)
    } else {
        let s = sign / d.length();
        (-d.y * s, d.x * s)
    };
    [a, b, -(a * pa.x + b * pa.y)]
}

/// Edge equations and bounds of a triangle. Returns `None` for zero area.
pub(crate) fn shape(p: [Vec2; 3]) -> Option<Shape> {
    let area2 = (p[1] - p[0]).cross(p[2] - p[0]);
    if area2 == 0.0 || !area2.is_finite() {
        return None;
    }
    let sign = area2.signum();
    Some(Shape {
        edges: [
            edge(p[0], p[1], sign),
            edge(p[1], p[2], sign),
            edge(p[2], p[0], sign),
            [0.0; 3],
        ],
        min: p[0].min(p[1]).min(p[2]),
        max: p[0].max(p[1]).max(p[2]),
    })
}

#[cfg(test)]
mod tests {
    use super::shape;
    use crate::util::Vec2;

    fn covers(edges: &[[f32; 3]], p: Vec2) -> bool {
        edges[..3].iter().all(|e| e[0] * p.x + e[1] * p.y + e[2] >= 0.0)
    }

    #[test]
    fn both_windings_cover_the_interior() {
        let ccw = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        let cw = [ccw[0], ccw[2], ccw[1]];
        for tri in [ccw, cw] {
            let s = shape(tri).map(|s| s.edges);
            let Some(edges) = s else {
                panic!("triangle culled");
            };
            assert!(covers(&edges, Vec2::new(2.0, 2.0)));
            assert!(!covers(&edges, Vec2::new(8.0, 8.0)));
            assert!(!covers(&edges, Vec2::new(-1.0, 2.0)));
        }
    }

    #[test]
    fn axis_edges_are_exact() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        let Some(s) = shape(tri) else {
            panic!("triangle culled");
        };
        assert_eq!([0.0, 1.0, 0.0], s.edges[0]);
        assert_eq!([1.0, 0.0, 0.0], s.edges[2]);
        let diag = s.edges[1];
        assert!((diag[0].hypot(diag[1]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_is_culled() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0)];
        assert!(shape(tri).is_none());
    }
}
