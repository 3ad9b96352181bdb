// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::region::MAX_TILES_PER_AXIS;

/// Default tile width in device units.
pub const TILE_WIDTH: u32 = 32;
/// Default tile height in device units.
pub const TILE_HEIGHT: u32 = 16;

/// Geometry of the frame's tile grid.
///
/// The last row of tiles may be shorter than the others when the device
/// height is not a multiple of the tile height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    /// Width of a tile in device units.
    pub tile_width: u32,
    /// Height of a tile in device units.
    pub tile_height: u32,
    /// Number of tile columns.
    pub tiles_x: u32,
    /// Number of tile rows.
    pub tiles_y: u32,
    /// Height of the last row in device units.
    pub last_row_height: u32,
}

impl TileGrid {
    /// Creates a grid that covers a `width` x `height` device with tiles of
    /// the default size.
    pub fn for_device(width: u32, height: u32) -> Self {
        let tiles_x = width.div_ceil(TILE_WIDTH).max(1);
        let tiles_y = height.div_ceil(TILE_HEIGHT).max(1);
        let last_row_height = match height % TILE_HEIGHT {
            0 => TILE_HEIGHT,
            rem => rem,
        };
        Self {
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            tiles_x,
            tiles_y,
            last_row_height,
        }
    }

    /// Width of the device covered by the grid.
    pub const fn device_width(&self) -> u32 {
        self.tiles_x * self.tile_width
    }

    /// Height of the device covered by the grid.
    pub const fn device_height(&self) -> u32 {
        (self.tiles_y - 1) * self.tile_height + self.last_row_height
    }

    /// Returns a reason the grid cannot be encoded, if any.
    pub fn validate(&self) -> Option<&'static str> {
        if self.tile_width == 0 || self.tile_height == 0 {
            Some("tile dimensions must be non-zero")
        } else if self.tiles_x == 0 || self.tiles_y == 0 {
            Some("tile grid must contain at least one tile")
        } else if self.tiles_x > MAX_TILES_PER_AXIS || self.tiles_y > MAX_TILES_PER_AXIS {
            Some("tile grid exceeds the region tag range")
        } else if self.last_row_height == 0 || self.last_row_height > self.tile_height {
            Some("last row height must be in 1..=tile_height")
        } else {
            None
        }
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::for_device(640, 480)
    }
}

/// Floating-point encoding of the geometry stream's plane and edge terms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Raw IEEE-754 single-precision bit patterns.
    #[default]
    Ieee,
    /// 20-bit sign/exponent/mantissa floats in the low bits of each word.
    Packed20,
}

/// Sizing of one parameter stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamConfig {
    /// Total capacity in words.
    pub capacity_words: u32,
    /// Size of the allocator's pages in words, if the stream is paged.
    ///
    /// The last word of every page is reserved for the link to the next one.
    pub page_words: Option<u32>,
}

impl StreamConfig {
    /// An unpaged stream of `words` words.
    pub const fn unpaged(words: u32) -> Self {
        Self {
            capacity_words: words,
            page_words: None,
        }
    }

    /// A stream of `words` words split into pages of `page_words` words.
    pub const fn paged(words: u32, page_words: u32) -> Self {
        Self {
            capacity_words: words,
            page_words: Some(page_words),
        }
    }
}

/// Default geometry stream: 256K words in 1K-word pages.
pub const DEFAULT_GEOMETRY_STREAM: StreamConfig = StreamConfig::paged(1 << 18, 1 << 10);
/// Default shading stream: 256K words.
pub const DEFAULT_SHADING_STREAM: StreamConfig = StreamConfig::unpaged(1 << 18);
