// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tilepass_encoding::{GeometryRecord, MaterialRecord};

use crate::blocks::{FunctionBlock, MAX_SHADING_WORDS};
use crate::stream::ParameterStream;

/// Appends one shading record per primitive using the block's layout.
///
/// `call_flags` are the per-call bits (fog, mip offset) of the control word.
/// The stream must have room for every record.
pub(crate) fn pack(
    stream: &mut ParameterStream,
    block: &FunctionBlock,
    call_flags: u32,
    geometry: &[GeometryRecord],
    materials: &[MaterialRecord],
) {
    let control = block.shading_control.with_flags(call_flags);
    let mut out = [0; MAX_SHADING_WORDS];
    for (g, m) in geometry.iter().zip(materials) {
        let n = block.layout.write(control, g.base_color, m, &mut out);
        debug_assert_eq!(n, block.shading_words() as usize);
        stream.write(&out[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::pack;
    use crate::blocks::table;
    use crate::stream::ParameterStream;
    use tilepass_encoding::{
        GeometryRecord, MaterialRecord, PrimitiveKind, ShadingControl, ShadingStyle, StreamConfig,
        Variant, VolumeMode,
    };

    #[test]
    fn writes_sections_in_order() {
        let variant = Variant {
            shading: ShadingStyle::FlatHighlight,
            volume: VolumeMode::Shadow,
            ..Variant::FLAT_OPAQUE
        };
        let block = table(PrimitiveKind::Triangle).get(variant);
        let geometry = [GeometryRecord {
            base_color: 0xff00_00ff,
            ..Default::default()
        }];
        let materials = [MaterialRecord {
            highlight: 0x8080_8080,
            volume: 77,
            ..Default::default()
        }];
        let mut stream = ParameterStream::new(StreamConfig::unpaged(64));
        pack(&mut stream, block, ShadingControl::FOG, &geometry, &materials);
        let words = stream.words();
        assert_eq!(4, words.len());
        let control = ShadingControl(words[0]);
        assert_eq!(4, control.words());
        assert_ne!(0, control.0 & ShadingControl::FOG);
        assert_eq!(&[0xff00_00ff_u32, 0x8080_8080, 77], &words[1..]);
    }
}
