// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Word layouts of the geometry and shading parameter streams.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![allow(missing_docs, reason = "We have many as-yet undocumented items.")]

mod config;
mod control;
pub mod math;
mod record;
mod region;
mod variant;

pub use config::{
    GeometryFormat, StreamConfig, TileGrid, DEFAULT_GEOMETRY_STREAM, DEFAULT_SHADING_STREAM,
    TILE_HEIGHT, TILE_WIDTH,
};
pub use control::{GeometryControl, ShadingControl, LINK_BIT};
pub use record::{Edge, GeometryRecord, MaterialRecord};
pub use region::{ClipRect, PassClass, RegionTag, TileRange, MAX_TILES_PER_AXIS};
pub use variant::{
    PrimitiveKind, ShadingStyle, TranslucencyStyle, Variant, VolumeMode, ALPHA_GRADIENT_WORDS,
    HIGHLIGHT_GRADIENT_WORDS, HIGHLIGHT_WORDS, SHADING_HEADER_WORDS, SMOOTH_SHADE_WORDS,
    TEXTURE_WORDS, VARIANT_COUNT, VOLUME_WORDS,
};
