// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bytemuck::{Pod, Zeroable};

use crate::{GeometryControl, RegionTag};

/// Implicit edge equation `a * x + b * y + c`, non-negative inside.
pub type Edge = [f32; 3];

/// Rasterizer input for one primitive.
#[derive(Clone, Copy, Debug, Default, Zeroable, Pod)]
#[repr(C)]
pub struct GeometryRecord {
    /// Base control word; the shading offset is filled in when packed.
    pub control: GeometryControl,
    /// Tile range and pass classification.
    pub tag: RegionTag,
    /// Packed `0xAARRGGBB` base colour.
    pub base_color: u32,
    /// Inverse depth plane `(A, B, C)`: `1/w = A * x + B * y + C`.
    pub depth: [f32; 3],
    /// Edge equations. Triangles use the first three.
    pub edges: [Edge; 4],
    /// Nearest inverse depth of the primitive.
    pub depth_hint: f32,
    /// Device-unit bounding box `[x0, y0, x1, y1)`.
    pub bbox: [i32; 4],
}

impl GeometryRecord {
    /// Evaluates the depth plane at a device position.
    pub fn depth_at(&self, x: f32, y: f32) -> f32 {
        self.depth[0] * x + self.depth[1] * y + self.depth[2]
    }

    /// Returns `true` if the point lies inside every edge of the record.
    pub fn covers(&self, x: f32, y: f32) -> bool {
        let n_edges = self.control.kind().edge_count() as usize;
        self.edges[..n_edges]
            .iter()
            .all(|e| e[0] * x + e[1] * y + e[2] >= 0.0)
    }
}

/// Texturing/shading input for one primitive, already in hardware word form.
#[derive(Clone, Copy, Debug, Default, Zeroable, Pod)]
#[repr(C)]
pub struct MaterialRecord {
    /// Highlight colour in the low 24 bits, intensity in the top byte.
    pub highlight: u32,
    /// Colour gradient along x.
    pub color_dx: u32,
    /// Colour gradient along y.
    pub color_dy: u32,
    /// Reference position and intensity scale of the smooth shading.
    pub shade_ref: u32,
    pub highlight_gradient: u32,
    pub alpha_gradient: u32,
    /// Shadow brightness or light-volume colour.
    pub volume: u32,
    /// Texture control word followed by the coefficient words.
    pub texture: [u32; 6],
}

static_assertions::const_assert_eq!(size_of::<GeometryRecord>(), 23 * 4);
static_assertions::const_assert_eq!(size_of::<MaterialRecord>(), 13 * 4);
