// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile ranges, clipping and translucency pass tagging.

use tilepass_encoding::{
    ClipRect, PassClass, PrimitiveKind, RegionTag, TileGrid, TileRange, TranslucencyStyle,
};

/// Converts device bounds to tile ranges under a clip rectangle.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TileEncoder {
    grid: TileGrid,
    clip: ClipRect,
    clipping: bool,
}

impl TileEncoder {
    pub(crate) fn new(grid: TileGrid, clip: Option<ClipRect>, clipping: bool) -> Self {
        Self {
            grid,
            clip: clip.unwrap_or(ClipRect::full(grid.tiles_x, grid.tiles_y)),
            clipping,
        }
    }

    /// Returns the tiles touched by the device box `[x0, y0, x1, y1)`, or
    /// `None` if none of them lie inside the clip rectangle.
    ///
    /// Without clipping the box must already lie inside the rectangle; a box
    /// that does not is clamped to the grid.
    pub(crate) fn encode(&self, bbox: [i32; 4]) -> Option<TileRange> {
        let tw = self.grid.tile_width as i32;
        let th = self.grid.tile_height as i32;
        let tx0 = bbox[0].div_euclid(tw);
        let ty0 = bbox[1].div_euclid(th);
        let tx1 = (bbox[2] - 1).div_euclid(tw);
        let ty1 = (bbox[3] - 1).div_euclid(th);
        if tx1 < 0 || ty1 < 0 {
            return None;
        }
        let range = TileRange {
            x0: tx0.max(0) as u32,
            y0: ty0.max(0) as u32,
            x1: tx1 as u32,
            y1: ty1 as u32,
        };
        if self.clipping {
            self.clip.clamp(&range)
        } else {
            debug_assert!(
                tx0 >= 0 && ty0 >= 0 && self.clip.contains(&range),
                "unclipped primitive outside the clip rectangle"
            );
            ClipRect::full(self.grid.tiles_x, self.grid.tiles_y).clamp(&range)
        }
    }
}

/// When a primitive kind opens a new translucency pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassPolicy {
    /// Once per submission call with global translucency.
    PerCall,
    /// Once per translucent primitive.
    PerPrimitive,
}

impl PassPolicy {
    pub const fn of(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Sprite => Self::PerPrimitive,
            PrimitiveKind::Line | PrimitiveKind::Point | PrimitiveKind::Triangle => Self::PerCall,
        }
    }
}

/// Pass class of a primitive.
///
/// Textured sprites whose texture carries alpha but which request no
/// translucency are depth-sorted with the translucent primitives without
/// being blended globally.
pub(crate) fn pass_class(
    kind: PrimitiveKind,
    translucency: TranslucencyStyle,
    texture_alpha: bool,
) -> PassClass {
    match translucency {
        TranslucencyStyle::Opaque if kind == PrimitiveKind::Sprite && texture_alpha => {
            PassClass::PseudoOpaque
        }
        TranslucencyStyle::Opaque => PassClass::Opaque,
        TranslucencyStyle::Global => PassClass::Global,
        TranslucencyStyle::PerVertex => PassClass::PerVertex,
        TranslucencyStyle::PerVertexGlobal => PassClass::PerVertexGlobal,
    }
}

/// Translucency pass bookkeeping of one frame.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PassTracker {
    passes: u32,
    marked: [bool; 2],
    /// Whether the current call has opened its pass yet.
    call_opened: bool,
}

impl PassTracker {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of translucency passes opened this frame.
    pub(crate) fn passes(&self) -> u32 {
        self.passes
    }

    fn opens_pass(class: PassClass) -> bool {
        matches!(class, PassClass::Global | PassClass::PerVertexGlobal)
    }

    /// Called once at the start of a submission call. A per-call pass is
    /// opened by the call's first tagged primitive.
    pub(crate) fn begin_call(&mut self) {
        self.call_opened = false;
    }

    /// Builds the tag of the next primitive of the call.
    pub(crate) fn tag(
        &mut self,
        policy: PassPolicy,
        class: PassClass,
        range: TileRange,
    ) -> RegionTag {
        match policy {
            PassPolicy::PerCall if Self::opens_pass(class) && !self.call_opened => {
                self.call_opened = true;
                self.passes += 1;
            }
            PassPolicy::PerPrimitive if class.is_translucent() => self.passes += 1,
            _ => {}
        }
        let parity = self.passes & 1 == 1;
        let first = if class.is_translucent() && !self.marked[parity as usize] {
            self.marked[parity as usize] = true;
            true
        } else {
            false
        };
        RegionTag::new(range, class, parity, first)
    }
}
