// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serialization of bursts into the geometry and shading streams.

pub(crate) mod geometry;
pub(crate) mod shading;
