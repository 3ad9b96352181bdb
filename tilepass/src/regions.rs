// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tilepass_encoding::{RegionTag, TileRange};

/// One packed primitive as seen by the per-tile object lists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub tag: RegionTag,
    pub tiles: TileRange,
    /// Word offset of the primitive's geometry record.
    pub stream_offset: u32,
    /// Nearest inverse depth of the primitive.
    pub depth_hint: f32,
}

/// Receives every packed primitive for insertion into per-tile lists.
pub trait RegionSink {
    fn register(&mut self, tag: RegionTag, tiles: TileRange, stream_offset: u32, depth_hint: f32);

    /// Called when the parameter streams are reset for a new frame.
    fn begin_frame(&mut self) {}
}

/// Records registrations in submission order.
#[derive(Clone, Debug, Default)]
pub struct RegionList {
    regions: Vec<Region>,
}

impl RegionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates over the primitives touching tile `(x, y)`, in submission
    /// order.
    pub fn in_tile(&self, x: u32, y: u32) -> impl Iterator<Item = &Region> + '_ {
        self.regions
            .iter()
            .filter(move |region| region.tiles.contains(x, y))
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }
}

impl RegionSink for RegionList {
    fn register(&mut self, tag: RegionTag, tiles: TileRange, stream_offset: u32, depth_hint: f32) {
        self.regions.push(Region {
            tag,
            tiles,
            stream_offset,
            depth_hint,
        });
    }

    fn begin_frame(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{RegionList, RegionSink};
    use tilepass_encoding::{PassClass, RegionTag, TileRange};

    #[test]
    fn tile_query_filters_by_range() {
        let mut list = RegionList::new();
        let a = TileRange {
            x0: 0,
            y0: 0,
            x1: 1,
            y1: 1,
        };
        let b = TileRange {
            x0: 1,
            y0: 1,
            x1: 3,
            y1: 2,
        };
        list.register(RegionTag::new(a, PassClass::Opaque, false, false), a, 0, 1.0);
        list.register(RegionTag::new(b, PassClass::Opaque, false, false), b, 16, 0.5);
        assert_eq!(2, list.in_tile(1, 1).count());
        let only_b: Vec<_> = list.in_tile(3, 2).map(|r| r.stream_offset).collect();
        assert_eq!(vec![16], only_b);
        list.begin_frame();
        assert!(list.is_empty());
    }
}
