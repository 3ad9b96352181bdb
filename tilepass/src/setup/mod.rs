// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive setup: edge equations, depth planes and device bounds.

mod depth;
mod line;
mod sprite;
mod triangle;

use smallvec::SmallVec;
use tilepass_encoding::math::unpack_argb;
use tilepass_encoding::{Edge, GeometryControl, GeometryRecord, PrimitiveKind};

use crate::context::{ContextFlags, RenderContext, Vertex};
use crate::util::Vec2;

pub(crate) use depth::{DepthSource, SyntheticDepth};
pub use depth::{SYNTHETIC_DEPTH_BASE, SYNTHETIC_DEPTH_STEP};

/// Edges and device-space bounds of a primitive before rounding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shape {
    pub edges: [Edge; 4],
    pub min: Vec2,
    pub max: Vec2,
}

/// A primitive ready for tiling and material resolution.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Setup {
    pub record: GeometryRecord,
    /// Extent of a sprite's quad.
    pub quad: Option<(Vec2, Vec2)>,
}

/// Rounds bounds to device units. Returns `None` if the primitive covers
/// less than one unit on either axis.
pub(crate) fn device_bbox(min: Vec2, max: Vec2) -> Option<[i32; 4]> {
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let x0 = min.x.round() as i32;
    let y0 = min.y.round() as i32;
    let x1 = max.x.round() as i32;
    let y1 = max.y.round() as i32;
    (x1.saturating_sub(x0) >= 1 && y1.saturating_sub(y0) >= 1).then_some([x0, y0, x1, y1])
}

/// Sets up one primitive. Returns `None` if it is culled.
///
/// `vertices` holds exactly the primitive's vertices. The record's tag is
/// left empty and its base colour is the first vertex's colour made opaque.
pub(crate) fn setup(
    kind: PrimitiveKind,
    vertices: &[Vertex],
    ctx: &RenderContext,
    control: GeometryControl,
    depth: DepthSource,
) -> Option<Setup> {
    let points: SmallVec<[Vec2; 3]> = vertices.iter().map(|v| Vec2::new(v.x, v.y)).collect();
    if !points.iter().all(|p| p.is_finite()) || !vertices.iter().all(|v| v.inv_w.is_finite()) {
        return None;
    }

    let hw = ctx.effective_width() * 0.5;
    let shape = match kind {
        PrimitiveKind::Line => line::shape(points[0], points[1], hw),
        PrimitiveKind::Point => line::shape(points[0], points[0], hw),
        PrimitiveKind::Sprite => sprite::shape(points[0], vertices[0].inv_w, ctx.sprite_size)?,
        PrimitiveKind::Triangle => triangle::shape([points[0], points[1], points[2]])?,
    };
    let bbox = device_bbox(shape.min, shape.max)?;

    let (mut plane, mut depth_hint) = depth::plane(kind, &points, vertices, depth);
    let mut flags = 0;
    if matches!(depth, DepthSource::Synthetic(_)) {
        flags |= GeometryControl::SYNTHETIC_DEPTH;
    }
    if ctx.flags.contains(ContextFlags::DEPTH_BIAS) {
        plane.c += ctx.depth_bias;
        depth_hint += ctx.depth_bias;
        flags |= GeometryControl::DEPTH_BIAS;
    }

    let [_, r, g, b] = unpack_argb(vertices[0].color);
    let record = GeometryRecord {
        control: control.with_flags(flags),
        tag: Default::default(),
        base_color: u32::from_be_bytes([0xff, r, g, b]),
        depth: plane.to_array(),
        edges: shape.edges,
        depth_hint,
        bbox,
    };
    let quad = (kind == PrimitiveKind::Sprite).then_some((shape.min, shape.max));
    Some(Setup { record, quad })
}

#[cfg(test)]
mod tests {
    use super::{device_bbox, setup, DepthSource};
    use crate::context::{RenderContext, Vertex};
    use crate::util::Vec2;
    use tilepass_encoding::{GeometryControl, PrimitiveKind, Variant};

    fn control(kind: PrimitiveKind) -> GeometryControl {
        GeometryControl::for_variant(kind, Variant::FLAT_OPAQUE)
    }

    #[test]
    fn tiny_boxes_are_culled() {
        assert_eq!(None, device_bbox(Vec2::new(10.2, 10.0), Vec2::new(10.4, 20.0)));
        assert_eq!(
            Some([10, 10, 11, 20]),
            device_bbox(Vec2::new(10.2, 10.0), Vec2::new(10.6, 20.0))
        );
        assert_eq!(None, device_bbox(Vec2::new(f32::NAN, 0.0), Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn triangle_record() {
        let vertices = [
            Vertex::new(10.0, 10.0, 0.5, 0x8011_2233),
            Vertex::new(60.0, 10.0, 0.5, 0),
            Vertex::new(10.0, 40.0, 0.25, 0),
        ];
        let ctx = RenderContext::new();
        let Some(s) = setup(
            PrimitiveKind::Triangle,
            &vertices,
            &ctx,
            control(PrimitiveKind::Triangle),
            DepthSource::Vertices,
        ) else {
            panic!("triangle culled");
        };
        assert_eq!([10, 10, 60, 40], s.record.bbox);
        assert_eq!(0xff11_2233, s.record.base_color);
        assert_eq!(0.5, s.record.depth_hint);
        assert!((s.record.depth_at(10.0, 40.0) - 0.25).abs() < 1e-6);
        assert!(s.record.covers(20.0, 20.0));
        assert!(!s.record.covers(59.0, 39.0));
        assert_eq!(None, s.quad);
    }

    #[test]
    fn zero_width_line_is_a_hairline() {
        let vertices = [
            Vertex::new(10.0, 10.5, 1.0, 0),
            Vertex::new(50.0, 10.5, 1.0, 0),
        ];
        let ctx = RenderContext::new().with_width(0.0);
        let Some(s) = setup(
            PrimitiveKind::Line,
            &vertices,
            &ctx,
            control(PrimitiveKind::Line),
            DepthSource::Vertices,
        ) else {
            panic!("line culled");
        };
        assert_eq!([10, 10, 51, 11], s.record.bbox);
    }

    #[test]
    fn depth_bias_and_synthetic_depth_mark_the_control_word() {
        let vertices = [Vertex::new(10.0, 10.0, 0.5, 0)];
        let ctx = RenderContext::new().with_width(4.0).with_depth_bias(0.125);
        let Some(s) = setup(
            PrimitiveKind::Point,
            &vertices,
            &ctx,
            control(PrimitiveKind::Point),
            DepthSource::Synthetic(1e-4),
        ) else {
            panic!("point culled");
        };
        let bits = s.record.control.0;
        assert_ne!(0, bits & GeometryControl::SYNTHETIC_DEPTH);
        assert_ne!(0, bits & GeometryControl::DEPTH_BIAS);
        assert_eq!(1e-4 + 0.125, s.record.depth[2]);
    }

    #[test]
    fn sprites_report_their_quad() {
        let vertices = [Vertex::new(32.0, 32.0, 1.0, 0)];
        let ctx = RenderContext::new().with_sprite_size(8.0, 8.0);
        let s = setup(
            PrimitiveKind::Sprite,
            &vertices,
            &ctx,
            control(PrimitiveKind::Sprite),
            DepthSource::Vertices,
        );
        assert_eq!(
            Some((Vec2::new(28.0, 28.0), Vec2::new(36.0, 36.0))),
            s.and_then(|s| s.quad)
        );
    }
}
