// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::HashMap;

/// Handle of a texture owned by the texture manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// What the texturing unit needs to know about a resident texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureInfo {
    /// Word address of the texture in texture memory (21 bits).
    pub base_address: u32,
    /// Reciprocal of the texture's side length in texels.
    pub inv_texel_size: f32,
    /// The texture carries an alpha channel.
    pub has_alpha: bool,
}

impl TextureInfo {
    /// Side length of the texture in texels.
    pub fn size(&self) -> f32 {
        1.0 / self.inv_texel_size
    }
}

/// Resolves texture handles at submission time.
pub trait TextureLookup {
    /// Returns the texture's description, or `None` if it is not resident.
    fn resolve(&self, id: TextureId) -> Option<TextureInfo>;
}

/// A [`TextureLookup`] with nothing resident.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTextures;

impl TextureLookup for NoTextures {
    fn resolve(&self, _id: TextureId) -> Option<TextureInfo> {
        None
    }
}

/// Table of resident textures.
#[derive(Clone, Debug, Default)]
pub struct TextureMap {
    map: HashMap<TextureId, TextureInfo>,
}

impl TextureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a texture resident, returning the description it replaces.
    pub fn insert(&mut self, id: TextureId, info: TextureInfo) -> Option<TextureInfo> {
        self.map.insert(id, info)
    }

    pub fn remove(&mut self, id: TextureId) -> Option<TextureInfo> {
        self.map.remove(&id)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl TextureLookup for TextureMap {
    fn resolve(&self, id: TextureId) -> Option<TextureInfo> {
        // Textures without a usable size cannot be mapped.
        self.map
            .get(&id)
            .copied()
            .filter(|info| info.inv_texel_size.is_finite() && info.inv_texel_size > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{TextureId, TextureInfo, TextureLookup, TextureMap};

    #[test]
    fn resolves_resident_textures() {
        let mut textures = TextureMap::new();
        let info = TextureInfo {
            base_address: 0x400,
            inv_texel_size: 1.0 / 256.0,
            has_alpha: false,
        };
        assert_eq!(None, textures.insert(TextureId(3), info));
        assert_eq!(Some(info), textures.resolve(TextureId(3)));
        assert_eq!(None, textures.resolve(TextureId(4)));
        assert_eq!(256.0, info.size());
        textures.remove(TextureId(3));
        assert!(textures.is_empty());
    }

    #[test]
    fn zero_sized_textures_do_not_resolve() {
        let mut textures = TextureMap::new();
        textures.insert(
            TextureId(0),
            TextureInfo {
                base_address: 0,
                inv_texel_size: 0.0,
                has_alpha: true,
            },
        );
        assert_eq!(None, textures.resolve(TextureId(0)));
    }
}
