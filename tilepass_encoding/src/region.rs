// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bytemuck::{Pod, Zeroable};

/// Number of tiles addressable on each axis of a region tag.
pub const MAX_TILES_PER_AXIS: u32 = 1 << TILE_FIELD_BITS;

const TILE_FIELD_BITS: u32 = 6;
const TILE_FIELD_MASK: u32 = (1 << TILE_FIELD_BITS) - 1;
const PASS_CLASS_SHIFT: u32 = 24;
const PARITY_BIT: u32 = 1 << 27;
const FIRST_OF_PASS_BIT: u32 = 1 << 28;

/// Translucency pass classification of a primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassClass {
    Opaque = 0,
    /// Translucent by the context's global setting.
    Global = 1,
    /// Translucent by vertex alpha.
    PerVertex = 2,
    /// Vertex alpha modulated by the global setting.
    PerVertexGlobal = 3,
    /// Depth-sorted like a translucent primitive but never blended by a
    /// global factor.
    PseudoOpaque = 4,
}

impl PassClass {
    pub const fn is_translucent(self) -> bool {
        !matches!(self, Self::Opaque)
    }

    pub const fn from_bits(bits: u32) -> Option<Self> {
        Some(match bits {
            0 => Self::Opaque,
            1 => Self::Global,
            2 => Self::PerVertex,
            3 => Self::PerVertexGlobal,
            4 => Self::PseudoOpaque,
            _ => return None,
        })
    }
}

/// Inclusive range of tiles covered by a primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct TileRange {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl TileRange {
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// Inclusive clip rectangle in tile units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipRect {
    pub first_x: u32,
    pub last_x: u32,
    pub first_y: u32,
    pub last_y: u32,
}

impl ClipRect {
    /// Covers every tile of a `tiles_x` x `tiles_y` grid.
    pub const fn full(tiles_x: u32, tiles_y: u32) -> Self {
        Self {
            first_x: 0,
            last_x: tiles_x - 1,
            first_y: 0,
            last_y: tiles_y - 1,
        }
    }

    pub const fn contains(&self, range: &TileRange) -> bool {
        range.x0 >= self.first_x
            && range.x1 <= self.last_x
            && range.y0 >= self.first_y
            && range.y1 <= self.last_y
    }

    /// Clamps `range` to the rectangle. Returns `None` if nothing remains.
    pub fn clamp(&self, range: &TileRange) -> Option<TileRange> {
        let clamped = TileRange {
            x0: range.x0.max(self.first_x),
            y0: range.y0.max(self.first_y),
            x1: range.x1.min(self.last_x),
            y1: range.y1.min(self.last_y),
        };
        (clamped.x0 <= clamped.x1 && clamped.y0 <= clamped.y1).then_some(clamped)
    }
}

/// Region tag word: tile range plus translucency pass classification.
#[derive(Copy, Clone, PartialEq, Eq, Pod, Zeroable, Default, Debug, Hash)]
#[repr(C)]
pub struct RegionTag(pub u32);

impl RegionTag {
    /// Encodes a tag. Tile indices must be below [`MAX_TILES_PER_AXIS`].
    pub fn new(range: TileRange, class: PassClass, parity: bool, first_of_pass: bool) -> Self {
        debug_assert!(range.x1 < MAX_TILES_PER_AXIS && range.y1 < MAX_TILES_PER_AXIS);
        let mut bits = (range.x0 & TILE_FIELD_MASK)
            | (range.x1 & TILE_FIELD_MASK) << TILE_FIELD_BITS
            | (range.y0 & TILE_FIELD_MASK) << (2 * TILE_FIELD_BITS)
            | (range.y1 & TILE_FIELD_MASK) << (3 * TILE_FIELD_BITS)
            | (class as u32) << PASS_CLASS_SHIFT;
        if parity {
            bits |= PARITY_BIT;
        }
        if first_of_pass {
            bits |= FIRST_OF_PASS_BIT;
        }
        Self(bits)
    }

    pub const fn range(self) -> TileRange {
        TileRange {
            x0: self.0 & TILE_FIELD_MASK,
            x1: (self.0 >> TILE_FIELD_BITS) & TILE_FIELD_MASK,
            y0: (self.0 >> (2 * TILE_FIELD_BITS)) & TILE_FIELD_MASK,
            y1: (self.0 >> (3 * TILE_FIELD_BITS)) & TILE_FIELD_MASK,
        }
    }

    pub const fn class(self) -> Option<PassClass> {
        PassClass::from_bits((self.0 >> PASS_CLASS_SHIFT) & 0x7)
    }

    pub const fn parity(self) -> bool {
        self.0 & PARITY_BIT != 0
    }

    pub const fn is_first_of_pass(self) -> bool {
        self.0 & FIRST_OF_PASS_BIT != 0
    }
}

#[cfg(test)]
mod tests {
    use super::{ClipRect, PassClass, RegionTag, TileRange};

    #[test]
    fn tag_fields() {
        let range = TileRange {
            x0: 3,
            y0: 1,
            x1: 63,
            y1: 9,
        };
        let tag = RegionTag::new(range, PassClass::PerVertexGlobal, true, false);
        assert_eq!(range, tag.range());
        assert_eq!(Some(PassClass::PerVertexGlobal), tag.class());
        assert!(tag.parity());
        assert!(!tag.is_first_of_pass());
    }

    #[test]
    fn clip_clamp() {
        let clip = ClipRect {
            first_x: 2,
            last_x: 5,
            first_y: 0,
            last_y: 3,
        };
        let inside = TileRange {
            x0: 0,
            y0: 1,
            x1: 3,
            y1: 8,
        };
        assert_eq!(
            Some(TileRange {
                x0: 2,
                y0: 1,
                x1: 3,
                y1: 3
            }),
            clip.clamp(&inside)
        );
        let left = TileRange {
            x0: 0,
            y0: 0,
            x1: 1,
            y1: 1,
        };
        assert_eq!(None, clip.clamp(&left));
    }
}
