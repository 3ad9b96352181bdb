// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tilepass_encoding::{GeometryRecord, MaterialRecord};

/// Default number of primitives packed per burst.
pub const DEFAULT_BURST_CAPACITY: usize = 32;
/// Largest supported burst.
pub const MAX_BURST_CAPACITY: usize = 48;

/// Set-up primitives waiting to be packed, in submission order.
#[derive(Clone, Debug)]
pub(crate) struct BurstBuffer {
    geometry: Vec<GeometryRecord>,
    materials: Vec<MaterialRecord>,
    capacity: usize,
}

impl BurstBuffer {
    /// Creates a buffer of `capacity` primitives, clamped to
    /// `1..=MAX_BURST_CAPACITY`.
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_BURST_CAPACITY);
        Self {
            geometry: Vec::with_capacity(capacity),
            materials: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.geometry.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    pub(crate) fn push(&mut self, geometry: GeometryRecord, material: MaterialRecord) {
        debug_assert!(!self.is_full());
        self.geometry.push(geometry);
        self.materials.push(material);
    }

    pub(crate) fn geometry(&self) -> &[GeometryRecord] {
        &self.geometry
    }

    pub(crate) fn materials(&self) -> &[MaterialRecord] {
        &self.materials
    }

    pub(crate) fn clear(&mut self) {
        self.geometry.clear();
        self.materials.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{BurstBuffer, MAX_BURST_CAPACITY};
    use tilepass_encoding::{GeometryRecord, MaterialRecord};

    #[test]
    fn capacity_is_clamped() {
        let mut burst = BurstBuffer::new(0);
        burst.push(GeometryRecord::default(), MaterialRecord::default());
        assert!(burst.is_full());

        let mut burst = BurstBuffer::new(1000);
        for _ in 0..MAX_BURST_CAPACITY {
            assert!(!burst.is_full());
            burst.push(GeometryRecord::default(), MaterialRecord::default());
        }
        assert!(burst.is_full());
    }

    #[test]
    fn fills_and_clears() {
        let mut burst = BurstBuffer::new(2);
        burst.push(GeometryRecord::default(), MaterialRecord::default());
        assert!(!burst.is_full());
        burst.push(GeometryRecord::default(), MaterialRecord::default());
        assert!(burst.is_full());
        assert_eq!(2, burst.materials().len());
        burst.clear();
        assert!(burst.is_empty());
    }
}
