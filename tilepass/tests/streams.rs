// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stream layout across page boundaries.

use tilepass::tilepass_encoding::math::hw20_to_f32;
use tilepass::tilepass_encoding::{GeometryControl, ShadingControl, LINK_BIT};
use tilepass::{
    GeometryFormat, NoTextures, PrimitiveKind, RegionList, RenderContext, SessionConfig,
    StreamConfig, SubmissionSession, SubmitStatus, Vertex,
};

/// Follows the geometry stream from its start, returning the offset of every
/// record.
fn walk(words: &[u32]) -> Vec<u32> {
    let mut offsets = vec![];
    let mut at = 0;
    while (at as usize) < words.len() {
        let word = words[at as usize];
        if word & LINK_BIT != 0 {
            at = word & !LINK_BIT;
            continue;
        }
        offsets.push(at);
        at += GeometryControl(word).kind().geometry_words();
    }
    offsets
}

fn session(geometry: StreamConfig) -> SubmissionSession<NoTextures, RegionList> {
    let config = SessionConfig {
        geometry,
        burst_capacity: 8,
        ..Default::default()
    };
    SubmissionSession::new(config, NoTextures, RegionList::new()).unwrap()
}

fn quad_strip(n: usize) -> Vec<Vertex> {
    (0..n * 3)
        .map(|i| {
            let prim = (i / 3) as f32;
            let (x, y) = match i % 3 {
                0 => (10.0, 10.0),
                1 => (50.0, 10.0),
                _ => (10.0, 50.0),
            };
            Vertex::new(x + prim, y, 0.5, 0xff00_0000 | i as u32)
        })
        .collect()
}

#[test]
fn records_never_straddle_pages() {
    // 64-word pages hold four 13-word triangles before the link word.
    let mut session = session(StreamConfig::paged(64 * 8, 64));
    let status = session.submit(
        PrimitiveKind::Triangle,
        &RenderContext::new(),
        20,
        None,
        &quad_strip(20),
    );
    assert_eq!(Ok(SubmitStatus::Complete { submitted: 20 }), status);

    let stream = session.geometry_stream();
    let offsets = walk(stream.words());
    assert_eq!(20, offsets.len());
    for offset in &offsets {
        let page_end = (offset / 64 + 1) * 64;
        assert!(offset + 13 < page_end, "record at {offset} crosses a page");
    }
    assert_eq!(4, session.stats().page_transitions);

    // The region list agrees with the stream and shading offsets are dense.
    let registered: Vec<_> = session
        .regions()
        .regions()
        .iter()
        .map(|r| r.stream_offset)
        .collect();
    assert_eq!(offsets, registered);
    for (i, offset) in offsets.iter().enumerate() {
        let control = GeometryControl(stream.words()[*offset as usize]);
        assert_eq!(2 * i as u32, control.shading_offset());
        let shading = ShadingControl(session.shading_stream().words()[2 * i]);
        assert_eq!(PrimitiveKind::Triangle, shading.kind());
    }
}

#[test]
fn saturates_after_last_page() {
    // Two pages of three 16-word lines each.
    let mut session = session(StreamConfig::paged(2 * 64, 64));
    let vertices: Vec<_> = (0..20)
        .map(|i| Vertex::new(10.0 + i as f32 * 10.0, 100.0 + (i % 2) as f32 * 50.0, 1.0, 0))
        .collect();
    let status = session.submit(PrimitiveKind::Line, &RenderContext::new(), 10, None, &vertices);
    assert_eq!(
        Ok(SubmitStatus::Truncated {
            submitted: 6,
            dropped: 4
        }),
        status
    );
    assert_eq!(6, walk(session.geometry_stream().words()).len());
    assert_eq!(1, session.stats().page_transitions);
}

#[test]
fn packed_geometry_format() {
    let config = SessionConfig {
        geometry_format: GeometryFormat::Packed20,
        ..Default::default()
    };
    let mut session = SubmissionSession::new(config, NoTextures, RegionList::new()).unwrap();
    let vertical = [
        Vertex::new(100.0, 50.0, 1.0, 0),
        Vertex::new(100.0, 150.0, 1.0, 0),
    ];
    let ctx = RenderContext::new().with_width(4.0);
    let _ = session.submit(PrimitiveKind::Line, &ctx, 1, None, &vertical);
    let words = session.geometry_stream().words();
    assert_eq!(16, words.len());
    assert!(words[1..].iter().all(|w| w >> 20 == 0));
    // Side edge of a vertical line: exact axis coefficients.
    assert_eq!(-1.0, hw20_to_f32(words[4]));
    assert_eq!(0.0, hw20_to_f32(words[5]));
    assert_eq!(102.0, hw20_to_f32(words[6]));
    // End cap: 2 + 150.
    assert_eq!(0.0, hw20_to_f32(words[13]));
    assert_eq!(-1.0, hw20_to_f32(words[14]));
    assert_eq!(152.0, hw20_to_f32(words[15]));
}
