// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-call rendering state and vertex input.

use bytemuck::{Pod, Zeroable};
use tilepass_encoding::{ClipRect, VolumeMode};

use crate::texture::TextureId;

bitflags::bitflags! {
    /// Rendering options of one submission call.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ContextFlags: u32 {
        /// Interpolate vertex colours across the primitive.
        const GOURAUD = 1 << 0;
        /// Add the vertex specular colour. Combined with `GOURAUD` the
        /// highlight is interpolated too.
        const HIGHLIGHT = 1 << 1;
        /// Sample the context's texture.
        const TEXTURE = 1 << 2;
        /// Blend by vertex alpha.
        const VERTEX_TRANSLUCENT = 1 << 3;
        /// Blend by the context's global alpha.
        const GLOBAL_TRANSLUCENT = 1 << 4;
        const FOG = 1 << 5;
        /// Clamp tile ranges to the context's clip rectangle.
        const CLIP = 1 << 6;
        /// Scale the mip selection by the context's mip offset.
        const MIP_OFFSET = 1 << 7;
        /// Add the context's depth bias to the depth plane.
        const DEPTH_BIAS = 1 << 8;
        /// Ignore vertex depth and order primitives by submission.
        const DISABLE_DEPTH = 1 << 9;
    }
}

/// State shared by every primitive of a submission call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderContext {
    pub flags: ContextFlags,
    pub volume: VolumeMode,
    /// Line width or point size in device units. Zero means one unit.
    pub width: f32,
    /// Sprite width and height at an inverse depth of one.
    pub sprite_size: [f32; 2],
    /// Clip rectangle in tiles; `None` covers the whole grid.
    pub clip: Option<ClipRect>,
    /// Global translucency in `[0, 1]`.
    pub global_alpha: f32,
    /// Brightness kept under a shadow volume, in `[0, 1]`.
    pub shadow_brightness: f32,
    /// `0x00RRGGBB` colour added by a light volume.
    pub light_color: u32,
    pub texture: Option<TextureId>,
    /// Mip selection bias in powers of two of the texel footprint's side.
    pub mip_offset: f32,
    pub depth_bias: f32,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            flags: ContextFlags::empty(),
            volume: VolumeMode::None,
            width: 1.0,
            sprite_size: [1.0, 1.0],
            clip: None,
            global_alpha: 1.0,
            shadow_brightness: 0.5,
            light_color: 0,
            texture: None,
            mip_offset: 0.0,
            depth_bias: 0.0,
        }
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(mut self, flags: ContextFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_volume(mut self, volume: VolumeMode) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_sprite_size(mut self, width: f32, height: f32) -> Self {
        self.sprite_size = [width, height];
        self
    }

    /// Enables clipping to `clip`.
    pub fn with_clip(mut self, clip: ClipRect) -> Self {
        self.clip = Some(clip);
        self.flags |= ContextFlags::CLIP;
        self
    }

    /// Enables global translucency at `alpha`.
    pub fn with_global_alpha(mut self, alpha: f32) -> Self {
        self.global_alpha = alpha;
        self.flags |= ContextFlags::GLOBAL_TRANSLUCENT;
        self
    }

    pub fn with_shadow_brightness(mut self, brightness: f32) -> Self {
        self.shadow_brightness = brightness;
        self
    }

    pub fn with_light_color(mut self, rgb: u32) -> Self {
        self.light_color = rgb & 0x00ff_ffff;
        self
    }

    /// Enables texturing from `texture`.
    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self.flags |= ContextFlags::TEXTURE;
        self
    }

    pub fn with_mip_offset(mut self, offset: f32) -> Self {
        self.mip_offset = offset;
        self.flags |= ContextFlags::MIP_OFFSET;
        self
    }

    pub fn with_depth_bias(mut self, bias: f32) -> Self {
        self.depth_bias = bias;
        self.flags |= ContextFlags::DEPTH_BIAS;
        self
    }

    /// Returns the width actually rasterized for lines and points.
    pub(crate) fn effective_width(&self) -> f32 {
        if self.width == 0.0 {
            1.0
        } else {
            self.width
        }
    }

    pub(crate) fn validate(&self) -> Option<&'static str> {
        if !self.width.is_finite() || self.width < 0.0 {
            Some("width must be finite and non-negative")
        } else if !self.sprite_size.iter().all(|s| s.is_finite() && *s >= 0.0) {
            Some("sprite size must be finite and non-negative")
        } else if !(0.0..=1.0).contains(&self.global_alpha) {
            Some("global alpha must be in [0, 1]")
        } else if !(0.0..=1.0).contains(&self.shadow_brightness) {
            Some("shadow brightness must be in [0, 1]")
        } else if !self.mip_offset.is_finite() || !self.depth_bias.is_finite() {
            Some("mip offset and depth bias must be finite")
        } else {
            None
        }
    }
}

/// A transformed, lit vertex in device space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Reciprocal of the clip-space `w`.
    pub inv_w: f32,
    /// `0xAARRGGBB` diffuse colour.
    pub color: u32,
    /// `0x00RRGGBB` specular colour.
    pub specular: u32,
    /// Texture `u` divided by `w`.
    pub u_over_w: f32,
    /// Texture `v` divided by `w`.
    pub v_over_w: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32, inv_w: f32, color: u32) -> Self {
        Self {
            x,
            y,
            inv_w,
            color,
            ..Default::default()
        }
    }

    /// Sets perspective-correct texture coordinates from plain `(u, v)`.
    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.u_over_w = u * self.inv_w;
        self.v_over_w = v * self.inv_w;
        self
    }

    pub fn with_specular(mut self, rgb: u32) -> Self {
        self.specular = rgb & 0x00ff_ffff;
        self
    }
}
