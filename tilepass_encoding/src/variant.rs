// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The material-variant space and the word counts it implies.

/// Kind of primitive submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Line = 0,
    Point = 1,
    Sprite = 2,
    Triangle = 3,
}

impl PrimitiveKind {
    pub const ALL: [Self; 4] = [Self::Line, Self::Point, Self::Sprite, Self::Triangle];

    /// Number of vertices consumed per primitive.
    pub const fn arity(self) -> usize {
        match self {
            Self::Line => 2,
            Self::Point | Self::Sprite => 1,
            Self::Triangle => 3,
        }
    }

    /// Number of implicit edges in the geometry record.
    pub const fn edge_count(self) -> u32 {
        match self {
            Self::Triangle => 3,
            _ => 4,
        }
    }

    /// Words occupied by one geometry record of this kind.
    pub const fn geometry_words(self) -> u32 {
        1 + 3 + 3 * self.edge_count()
    }

    pub const fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => Self::Line,
            1 => Self::Point,
            2 => Self::Sprite,
            _ => Self::Triangle,
        }
    }
}

/// How colour varies across a primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShadingStyle {
    Flat = 0,
    Gouraud = 1,
    FlatHighlight = 2,
    /// Gouraud shading with an interpolated highlight.
    Highlight = 3,
}

impl ShadingStyle {
    pub const ALL: [Self; 4] = [Self::Flat, Self::Gouraud, Self::FlatHighlight, Self::Highlight];

    pub const fn is_smooth(self) -> bool {
        matches!(self, Self::Gouraud | Self::Highlight)
    }

    pub const fn has_highlight(self) -> bool {
        matches!(self, Self::FlatHighlight | Self::Highlight)
    }

    const fn from_index(ix: usize) -> Self {
        Self::ALL[ix]
    }
}

/// Where a primitive's alpha comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TranslucencyStyle {
    Opaque = 0,
    Global = 1,
    PerVertex = 2,
    PerVertexGlobal = 3,
}

impl TranslucencyStyle {
    pub const ALL: [Self; 4] = [
        Self::Opaque,
        Self::Global,
        Self::PerVertex,
        Self::PerVertexGlobal,
    ];

    pub const fn uses_vertex_alpha(self) -> bool {
        matches!(self, Self::PerVertex | Self::PerVertexGlobal)
    }

    pub const fn uses_global(self) -> bool {
        matches!(self, Self::Global | Self::PerVertexGlobal)
    }

    const fn from_index(ix: usize) -> Self {
        Self::ALL[ix]
    }
}

/// Shadow or light-volume behaviour of a primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VolumeMode {
    #[default]
    None = 0,
    /// Darkens what it covers by a brightness factor.
    Shadow = 1,
    /// Adds a fixed colour to what it covers.
    LightVolume = 2,
}

impl VolumeMode {
    pub const ALL: [Self; 3] = [Self::None, Self::Shadow, Self::LightVolume];

    const fn from_index(ix: usize) -> Self {
        Self::ALL[ix]
    }
}

/// Number of material variants per primitive kind.
pub const VARIANT_COUNT: usize =
    ShadingStyle::ALL.len() * TranslucencyStyle::ALL.len() * VolumeMode::ALL.len() * 2;

/// One point of the (shading x translucency x volume x texture) space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variant {
    pub shading: ShadingStyle,
    pub translucency: TranslucencyStyle,
    pub volume: VolumeMode,
    pub textured: bool,
}

impl Variant {
    pub const FLAT_OPAQUE: Self = Self {
        shading: ShadingStyle::Flat,
        translucency: TranslucencyStyle::Opaque,
        volume: VolumeMode::None,
        textured: false,
    };

    /// Dense index of this variant in a function-block table.
    pub const fn index(self) -> usize {
        let ix = (self.shading as usize * TranslucencyStyle::ALL.len()
            + self.translucency as usize)
            * VolumeMode::ALL.len()
            + self.volume as usize;
        ix * 2 + self.textured as usize
    }

    /// Inverse of [`Variant::index`].
    pub const fn from_index(ix: usize) -> Self {
        let textured = ix & 1 != 0;
        let ix = ix / 2;
        let volume = VolumeMode::from_index(ix % VolumeMode::ALL.len());
        let ix = ix / VolumeMode::ALL.len();
        let translucency = TranslucencyStyle::from_index(ix % TranslucencyStyle::ALL.len());
        let shading = ShadingStyle::from_index(ix / TranslucencyStyle::ALL.len());
        Self {
            shading,
            translucency,
            volume,
            textured,
        }
    }

    /// Returns `true` when the variant needs no per-primitive material work
    /// beyond copying the base colour.
    pub const fn is_trivial(self) -> bool {
        matches!(self.shading, ShadingStyle::Flat)
            && matches!(self.translucency, TranslucencyStyle::Opaque)
            && matches!(self.volume, VolumeMode::None)
            && !self.textured
    }

    pub const fn has_alpha_gradient(self) -> bool {
        self.shading.is_smooth() && self.translucency.uses_vertex_alpha()
    }

    /// Words written to the shading stream per primitive.
    pub const fn shading_words(self) -> u32 {
        let mut words = SHADING_HEADER_WORDS;
        if self.shading.is_smooth() {
            words += SMOOTH_SHADE_WORDS;
        }
        if self.shading.has_highlight() {
            words += HIGHLIGHT_WORDS;
        }
        if matches!(self.shading, ShadingStyle::Highlight) {
            words += HIGHLIGHT_GRADIENT_WORDS;
        }
        if self.has_alpha_gradient() {
            words += ALPHA_GRADIENT_WORDS;
        }
        if !matches!(self.volume, VolumeMode::None) {
            words += VOLUME_WORDS;
        }
        if self.textured {
            words += TEXTURE_WORDS;
        }
        words
    }
}

/// Control word plus base colour.
pub const SHADING_HEADER_WORDS: u32 = 2;
/// Colour gradients along x and y plus the reference word.
pub const SMOOTH_SHADE_WORDS: u32 = 3;
pub const HIGHLIGHT_WORDS: u32 = 1;
pub const HIGHLIGHT_GRADIENT_WORDS: u32 = 1;
pub const ALPHA_GRADIENT_WORDS: u32 = 1;
pub const VOLUME_WORDS: u32 = 1;
/// Texture control word plus five coefficient words.
pub const TEXTURE_WORDS: u32 = 6;

#[cfg(test)]
mod tests {
    use super::{PrimitiveKind, Variant, VARIANT_COUNT};

    #[test]
    fn index_round_trips_over_whole_space() {
        for ix in 0..VARIANT_COUNT {
            assert_eq!(ix, Variant::from_index(ix).index());
        }
    }

    #[test]
    fn word_counts() {
        assert_eq!(2, Variant::FLAT_OPAQUE.shading_words());
        let largest = (0..VARIANT_COUNT)
            .map(|ix| Variant::from_index(ix).shading_words())
            .max();
        assert_eq!(Some(15), largest);
        assert_eq!(13, PrimitiveKind::Triangle.geometry_words());
        assert_eq!(16, PrimitiveKind::Line.geometry_words());
    }
}
