// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-kind tables mapping every material variant to the work and stream
//! layout it needs.

use std::sync::LazyLock;

use smallvec::SmallVec;
use tilepass_encoding::{
    GeometryControl, MaterialRecord, PrimitiveKind, ShadingControl, ShadingStyle, Variant,
    VolumeMode, ALPHA_GRADIENT_WORDS, HIGHLIGHT_GRADIENT_WORDS, HIGHLIGHT_WORDS,
    SMOOTH_SHADE_WORDS, TEXTURE_WORDS, VARIANT_COUNT, VOLUME_WORDS,
};

use crate::material::MaterialStep;

/// Largest shading record of any variant, in words.
pub const MAX_SHADING_WORDS: usize = 15;

/// Material resolution of a variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolver {
    /// The base colour from primitive setup is already final.
    Skip,
    Resolve(SmallVec<[MaterialStep; 4]>),
}

impl Resolver {
    fn for_variant(variant: Variant) -> Self {
        if variant.is_trivial() {
            return Self::Skip;
        }
        let mut steps = SmallVec::new();
        steps.push(if variant.shading.is_smooth() {
            MaterialStep::SmoothColor(variant.translucency)
        } else {
            MaterialStep::FlatColor(variant.translucency)
        });
        match variant.shading {
            ShadingStyle::FlatHighlight => steps.push(MaterialStep::FlatHighlight),
            ShadingStyle::Highlight => steps.push(MaterialStep::SmoothHighlight),
            ShadingStyle::Flat | ShadingStyle::Gouraud => {}
        }
        match variant.volume {
            VolumeMode::Shadow => steps.push(MaterialStep::Shadow),
            VolumeMode::LightVolume => steps.push(MaterialStep::LightVolume),
            VolumeMode::None => {}
        }
        if variant.textured {
            steps.push(MaterialStep::Texture);
        }
        Self::Resolve(steps)
    }
}

/// A run of words in a shading record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Control,
    BaseColor,
    /// Colour gradients along x and y plus the reference word.
    SmoothShade,
    Highlight,
    HighlightGradient,
    AlphaGradient,
    Volume,
    Texture,
}

impl Section {
    pub const fn words(self) -> u32 {
        match self {
            Self::Control | Self::BaseColor => 1,
            Self::SmoothShade => SMOOTH_SHADE_WORDS,
            Self::Highlight => HIGHLIGHT_WORDS,
            Self::HighlightGradient => HIGHLIGHT_GRADIENT_WORDS,
            Self::AlphaGradient => ALPHA_GRADIENT_WORDS,
            Self::Volume => VOLUME_WORDS,
            Self::Texture => TEXTURE_WORDS,
        }
    }
}

/// Ordered sections of a variant's shading record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShadingLayout {
    sections: SmallVec<[Section; 8]>,
}

impl ShadingLayout {
    fn for_variant(variant: Variant) -> Self {
        let mut sections = SmallVec::new();
        sections.extend([Section::Control, Section::BaseColor]);
        if variant.shading.is_smooth() {
            sections.push(Section::SmoothShade);
        }
        if variant.shading.has_highlight() {
            sections.push(Section::Highlight);
        }
        if matches!(variant.shading, ShadingStyle::Highlight) {
            sections.push(Section::HighlightGradient);
        }
        if variant.has_alpha_gradient() {
            sections.push(Section::AlphaGradient);
        }
        if variant.volume != VolumeMode::None {
            sections.push(Section::Volume);
        }
        if variant.textured {
            sections.push(Section::Texture);
        }
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Total words of the layout.
    pub fn words(&self) -> u32 {
        self.sections.iter().map(|s| s.words()).sum()
    }

    /// Writes one record into `out`, returning the number of words written.
    pub fn write(
        &self,
        control: ShadingControl,
        base_color: u32,
        material: &MaterialRecord,
        out: &mut [u32; MAX_SHADING_WORDS],
    ) -> usize {
        let mut n = 0;
        let mut put = |words: &[u32]| {
            out[n..n + words.len()].copy_from_slice(words);
            n += words.len();
        };
        for section in &self.sections {
            match section {
                Section::Control => put(&[control.0]),
                Section::BaseColor => put(&[base_color]),
                Section::SmoothShade => {
                    put(&[material.color_dx, material.color_dy, material.shade_ref]);
                }
                Section::Highlight => put(&[material.highlight]),
                Section::HighlightGradient => put(&[material.highlight_gradient]),
                Section::AlphaGradient => put(&[material.alpha_gradient]),
                Section::Volume => put(&[material.volume]),
                Section::Texture => put(&material.texture),
            }
        }
        n
    }
}

/// Everything needed to resolve and pack one variant of one kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionBlock {
    pub variant: Variant,
    pub resolver: Resolver,
    pub layout: ShadingLayout,
    pub geometry_control: GeometryControl,
    pub shading_control: ShadingControl,
}

impl FunctionBlock {
    fn new(kind: PrimitiveKind, variant: Variant) -> Self {
        Self {
            variant,
            resolver: Resolver::for_variant(variant),
            layout: ShadingLayout::for_variant(variant),
            geometry_control: GeometryControl::for_variant(kind, variant),
            shading_control: ShadingControl::for_variant(kind, variant),
        }
    }

    /// Words this block writes to the shading stream per primitive.
    pub fn shading_words(&self) -> u32 {
        self.shading_control.words()
    }
}

/// Function blocks of one primitive kind, indexed by [`Variant::index`].
#[derive(Debug)]
pub struct FunctionBlockTable {
    kind: PrimitiveKind,
    blocks: Box<[FunctionBlock]>,
}

impl FunctionBlockTable {
    fn build(kind: PrimitiveKind) -> Self {
        let blocks = (0..VARIANT_COUNT)
            .map(|ix| FunctionBlock::new(kind, Variant::from_index(ix)))
            .collect();
        Self { kind, blocks }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn get(&self, variant: Variant) -> &FunctionBlock {
        &self.blocks[variant.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionBlock> + '_ {
        self.blocks.iter()
    }
}

static TABLES: LazyLock<[FunctionBlockTable; 4]> =
    LazyLock::new(|| PrimitiveKind::ALL.map(FunctionBlockTable::build));

/// Returns the function-block table of `kind`. Tables are built on first use
/// and never change afterwards.
pub fn table(kind: PrimitiveKind) -> &'static FunctionBlockTable {
    &TABLES[kind as usize]
}

#[cfg(test)]
mod tests {
    use super::{table, Resolver, MAX_SHADING_WORDS};
    use tilepass_encoding::{MaterialRecord, PrimitiveKind, Variant, VARIANT_COUNT};

    #[test]
    fn every_block_writes_its_declared_size() {
        let material = MaterialRecord::default();
        for kind in PrimitiveKind::ALL {
            let table = table(kind);
            assert_eq!(kind, table.kind());
            assert_eq!(VARIANT_COUNT, table.iter().count());
            for (ix, block) in table.iter().enumerate() {
                assert_eq!(ix, block.variant.index());
                assert_eq!(kind, block.shading_control.kind());
                assert_eq!(kind, block.geometry_control.kind());
                let mut out = [0; MAX_SHADING_WORDS];
                let written = block.layout.write(block.shading_control, 0, &material, &mut out);
                assert_eq!(block.shading_words() as usize, written);
                assert_eq!(block.layout.words(), block.shading_words());
                assert_eq!(block.variant.shading_words(), block.shading_words());
                assert_eq!(block.shading_control.0, out[0]);
            }
        }
    }

    #[test]
    fn only_flat_opaque_skips_resolution() {
        for kind in PrimitiveKind::ALL {
            let skipped: Vec<_> = table(kind)
                .iter()
                .filter(|b| b.resolver == Resolver::Skip)
                .map(|b| b.variant)
                .collect();
            assert_eq!(vec![Variant::FLAT_OPAQUE], skipped);
        }
    }

    #[test]
    fn lookups_return_the_same_block() {
        let a: *const _ = table(PrimitiveKind::Line).get(Variant::FLAT_OPAQUE);
        let b: *const _ = table(PrimitiveKind::Line).get(Variant::FLAT_OPAQUE);
        assert_eq!(a, b);
    }
}
