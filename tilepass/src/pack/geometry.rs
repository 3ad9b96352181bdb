// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tilepass_encoding::math::{f32_to_hw20, float_bits};
use tilepass_encoding::{GeometryFormat, GeometryRecord};

use crate::stream::ParameterStream;

const MAX_GEOMETRY_WORDS: usize = 16;

fn encode(format: GeometryFormat, val: f32) -> u32 {
    match format {
        GeometryFormat::Ieee => float_bits(val),
        GeometryFormat::Packed20 => f32_to_hw20(val),
    }
}

/// Serializes one record: control word, depth plane, then the edges the
/// primitive kind uses.
pub(crate) fn record_words(
    record: &GeometryRecord,
    format: GeometryFormat,
    shading_offset: u32,
    out: &mut [u32; MAX_GEOMETRY_WORDS],
) -> usize {
    let kind = record.control.kind();
    out[0] = record.control.with_shading_offset(shading_offset).0;
    let terms = record
        .depth
        .iter()
        .chain(record.edges[..kind.edge_count() as usize].iter().flatten());
    let mut n = 1;
    for term in terms {
        out[n] = encode(format, *term);
        n += 1;
    }
    debug_assert_eq!(n, kind.geometry_words() as usize);
    n
}

/// Writes the leading records of `records` that fit before the stream's page
/// boundary and returns how many were written.
///
/// Record `i` points at shading offset `shading_base + i * shading_words`.
pub(crate) fn pack(
    stream: &mut ParameterStream,
    records: &[GeometryRecord],
    format: GeometryFormat,
    shading_base: u32,
    shading_words: u32,
) -> usize {
    let Some(first) = records.first() else {
        return 0;
    };
    let words = first.control.kind().geometry_words();
    let n = records.len().min((stream.space_to_boundary() / words) as usize);
    let mut out = [0; MAX_GEOMETRY_WORDS];
    for (i, record) in records[..n].iter().enumerate() {
        let len = record_words(record, format, shading_base + i as u32 * shading_words, &mut out);
        stream.write(&out[..len]);
    }
    n
}
