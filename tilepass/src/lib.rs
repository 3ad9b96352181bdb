// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tilepass is the primitive submission front end of a tile-based deferred
//! rasterizer.
//!
//! Each submission call hands over a batch of lines, points, sprites or
//! triangles together with a [`RenderContext`]. Tilepass sets every primitive
//! up (edge equations, an inverse depth plane and device bounds), works out
//! which screen tiles it touches and how it is to be blended, resolves its
//! material into hardware shading words, and packs the results into two
//! parameter streams:
//!
//! - the **geometry stream**, one record per primitive, split into linked
//!   pages;
//! - the **shading stream**, one variable-sized record per primitive, pointed
//!   at by the geometry record.
//!
//! Every packed primitive is also reported to a [`RegionSink`] so that
//! per-tile object lists can be built.
//!
//! ```
//! use tilepass::{PrimitiveKind, RenderContext, SubmissionSession, Vertex};
//!
//! let mut session = SubmissionSession::with_defaults();
//! session.begin_frame();
//! let triangle = [
//!     Vertex::new(10.0, 10.0, 1.0, 0xffff_0000),
//!     Vertex::new(90.0, 10.0, 1.0, 0xff00_ff00),
//!     Vertex::new(10.0, 70.0, 1.0, 0xff00_00ff),
//! ];
//! let status = session
//!     .submit(PrimitiveKind::Triangle, &RenderContext::new(), 1, None, &triangle)
//!     .expect("valid call");
//! assert_eq!(1, status.submitted());
//! assert_eq!(13, session.geometry_stream().cursor());
//! ```
//!
//! When the streams fill up, the rest of the frame is discarded and
//! [`SubmitStatus::Truncated`] is reported; call
//! [`SubmissionSession::begin_frame`] to start over.

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

mod blocks;
mod burst;
mod classify;
mod context;
mod material;
mod pack;
mod regions;
mod session;
mod setup;
mod stream;
mod texture;
mod tile;

pub mod util;

pub use tilepass_encoding;

pub use blocks::{table, FunctionBlock, FunctionBlockTable, Resolver, Section, ShadingLayout};
pub use burst::{DEFAULT_BURST_CAPACITY, MAX_BURST_CAPACITY};
pub use classify::{classify, Classification, KindCapabilities};
pub use context::{ContextFlags, RenderContext, Vertex};
pub use material::MaterialStep;
pub use regions::{Region, RegionList, RegionSink};
pub use session::{FrameStats, SessionConfig, SubmissionSession, SubmitStatus};
pub use setup::{SYNTHETIC_DEPTH_BASE, SYNTHETIC_DEPTH_STEP};
pub use stream::ParameterStream;
pub use texture::{NoTextures, TextureId, TextureInfo, TextureLookup, TextureMap};
pub use tile::PassPolicy;
pub use tilepass_encoding::{
    ClipRect, GeometryFormat, PassClass, PrimitiveKind, RegionTag, ShadingStyle, StreamConfig,
    TileGrid, TileRange, TranslucencyStyle, Variant, VolumeMode,
};

use thiserror::Error;

/// Errors that can occur in Tilepass.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A submission call was rejected before anything was written.
    #[error("Bad parameter: {0}")]
    BadParameter(&'static str),
    /// The session cannot be created with this configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

static_assertions::assert_impl_all!(SubmissionSession: Send, Sync);
static_assertions::assert_impl_all!(Error: Send, Sync, std::error::Error);

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn error_messages() {
        assert_eq!(
            "Bad parameter: index out of range",
            Error::BadParameter("index out of range").to_string()
        );
    }
}
