// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The submission entry point and stream backpressure.

use log::{debug, trace, warn};
use tilepass_encoding::{
    GeometryControl, GeometryFormat, MaterialRecord, PassClass, PrimitiveKind, ShadingControl,
    StreamConfig, TileGrid, DEFAULT_GEOMETRY_STREAM, DEFAULT_SHADING_STREAM,
};

use crate::blocks::{table, FunctionBlock, Resolver};
use crate::burst::{BurstBuffer, DEFAULT_BURST_CAPACITY, MAX_BURST_CAPACITY};
use crate::classify::classify;
use crate::context::{ContextFlags, RenderContext, Vertex};
use crate::material::{self, MaterialInput};
use crate::pack;
use crate::regions::{RegionList, RegionSink};
use crate::setup::{setup, DepthSource, SyntheticDepth};
use crate::stream::ParameterStream;
use crate::texture::{TextureInfo, TextureLookup, TextureMap};
use crate::tile::{pass_class, PassPolicy, PassTracker, TileEncoder};
use crate::{Error, Result};

/// Largest shading stream the 22-bit shading offset can address.
const MAX_SHADING_WORDS_ADDRESSABLE: u32 = GeometryControl::SHADING_OFFSET_MASK + 1;

/// Sizing of a [`SubmissionSession`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    pub grid: TileGrid,
    pub geometry: StreamConfig,
    pub shading: StreamConfig,
    pub geometry_format: GeometryFormat,
    /// Primitives set up before each pack. Clamped to
    /// `1..=MAX_BURST_CAPACITY`.
    pub burst_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid: TileGrid::default(),
            geometry: DEFAULT_GEOMETRY_STREAM,
            shading: DEFAULT_SHADING_STREAM,
            geometry_format: GeometryFormat::default(),
            burst_capacity: DEFAULT_BURST_CAPACITY,
        }
    }
}

impl SessionConfig {
    fn validate(&self) -> Result<()> {
        if let Some(reason) = self.grid.validate() {
            return Err(Error::InvalidConfig(reason));
        }
        let largest_record = PrimitiveKind::ALL
            .iter()
            .map(|k| k.geometry_words())
            .max()
            .unwrap_or(0);
        if let Some(page) = self.geometry.page_words {
            if page <= largest_record {
                return Err(Error::InvalidConfig(
                    "geometry pages must hold a record and a link word",
                ));
            }
        }
        if self.shading.page_words.is_some() {
            return Err(Error::InvalidConfig("the shading stream cannot be paged"));
        }
        if self.shading.capacity_words > MAX_SHADING_WORDS_ADDRESSABLE {
            return Err(Error::InvalidConfig(
                "shading stream exceeds the addressable range",
            ));
        }
        Ok(())
    }
}

/// Per-frame counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Primitives packed into the streams.
    pub submitted: u32,
    pub opaque: u32,
    /// Packed primitives in any translucency pass class.
    pub translucent: u32,
    /// Primitives rejected by setup as degenerate or sub-pixel.
    pub culled: u32,
    /// Primitives entirely outside the clip rectangle.
    pub clipped: u32,
    /// Primitives lost because the streams were full.
    pub dropped: u32,
    /// Calls whose texture did not resolve.
    pub degraded_textures: u32,
    /// Bursts packed.
    pub bursts: u32,
    /// Geometry stream page links written.
    pub page_transitions: u32,
    /// Translucency passes opened.
    pub passes: u32,
}

/// Outcome of a submission call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum SubmitStatus {
    /// Every primitive was packed or legitimately rejected.
    Complete { submitted: usize },
    /// The streams filled up; the rest of the call was discarded.
    ///
    /// The frame saturates as soon as the next record of a burst fits in
    /// neither stream, even if smaller records of another kind still would.
    /// Every later call of the frame is then truncated in full until
    /// [`SubmissionSession::begin_frame`].
    Truncated { submitted: usize, dropped: usize },
}

impl SubmitStatus {
    pub fn submitted(&self) -> usize {
        match *self {
            Self::Complete { submitted } | Self::Truncated { submitted, .. } => submitted,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

/// Per-frame state reset by [`SubmissionSession::begin_frame`].
#[derive(Clone, Copy, Debug, Default)]
struct FrameState {
    stats: FrameStats,
    saturated: bool,
    depth: SyntheticDepth,
    passes: PassTracker,
}

/// Per-call state shared by every primitive of the call.
struct Call<'a> {
    kind: PrimitiveKind,
    ctx: &'a RenderContext,
    block: &'static FunctionBlock,
    texture: Option<TextureInfo>,
    class: PassClass,
    policy: PassPolicy,
    tiles: TileEncoder,
    shading_flags: u32,
}

/// Turns submission calls into geometry and shading stream records.
///
/// Primitives are set up one at a time into a burst buffer; full bursts are
/// packed into both streams together. When either stream runs out of room
/// the session stops packing until the next [`begin_frame`].
///
/// [`begin_frame`]: SubmissionSession::begin_frame
#[derive(Debug)]
pub struct SubmissionSession<T = TextureMap, R = RegionList> {
    config: SessionConfig,
    geometry: ParameterStream,
    shading: ParameterStream,
    burst: BurstBuffer,
    frame: FrameState,
    textures: T,
    regions: R,
}

impl<T: TextureLookup, R: RegionSink> SubmissionSession<T, R> {
    pub fn new(config: SessionConfig, textures: T, regions: R) -> Result<Self> {
        config.validate()?;
        if !(1..=MAX_BURST_CAPACITY).contains(&config.burst_capacity) {
            warn!(
                "burst capacity {} clamped to 1..={MAX_BURST_CAPACITY}",
                config.burst_capacity
            );
        }
        Ok(Self {
            config,
            geometry: ParameterStream::new(config.geometry),
            shading: ParameterStream::new(config.shading),
            burst: BurstBuffer::new(config.burst_capacity),
            frame: FrameState::default(),
            textures,
            regions,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Resets both streams and all per-frame state.
    pub fn begin_frame(&mut self) {
        self.geometry.reset();
        self.shading.reset();
        self.burst.clear();
        self.frame.stats = FrameStats::default();
        self.frame.saturated = false;
        self.frame.depth.reset();
        self.frame.passes.reset();
        self.regions.begin_frame();
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            page_transitions: self.geometry.page_transitions(),
            passes: self.frame.passes.passes(),
            ..self.frame.stats
        }
    }

    /// Returns `true` once the streams have filled up this frame.
    pub fn is_saturated(&self) -> bool {
        self.frame.saturated
    }

    pub fn geometry_stream(&self) -> &ParameterStream {
        &self.geometry
    }

    pub fn shading_stream(&self) -> &ParameterStream {
        &self.shading
    }

    pub fn regions(&self) -> &R {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut R {
        &mut self.regions
    }

    pub fn textures(&self) -> &T {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut T {
        &mut self.textures
    }

    /// Submits `count` primitives of `kind`.
    ///
    /// With `indices`, primitive `i` uses vertices
    /// `indices[i * arity..(i + 1) * arity]`; without, it uses consecutive
    /// vertices. Invalid arguments are rejected before anything is written.
    pub fn submit(
        &mut self,
        kind: PrimitiveKind,
        ctx: &RenderContext,
        count: usize,
        indices: Option<&[u32]>,
        vertices: &[Vertex],
    ) -> Result<SubmitStatus> {
        validate_call(kind, ctx, count, indices, vertices, &self.config.grid)?;
        if count == 0 {
            return Ok(SubmitStatus::Complete { submitted: 0 });
        }
        if self.frame.saturated {
            tally(&mut self.frame.stats.dropped, count);
            return Ok(SubmitStatus::Truncated {
                submitted: 0,
                dropped: count,
            });
        }

        let classification = classify(kind, ctx, &self.textures);
        if classification.texture_degraded {
            tally(&mut self.frame.stats.degraded_textures, 1);
            debug!("texture {:?} did not resolve, drawing {kind:?}s untextured", ctx.texture);
        }
        let variant = classification.variant;
        let texture_alpha = classification.texture.is_some_and(|t| t.has_alpha);
        let mut shading_flags = 0;
        if ctx.flags.contains(ContextFlags::FOG) {
            shading_flags |= ShadingControl::FOG;
        }
        if variant.textured && ctx.flags.contains(ContextFlags::MIP_OFFSET) {
            shading_flags |= ShadingControl::MIP_OFFSET;
        }
        let call = Call {
            kind,
            ctx,
            block: table(kind).get(variant),
            texture: classification.texture,
            class: pass_class(kind, variant.translucency, texture_alpha),
            policy: PassPolicy::of(kind),
            tiles: TileEncoder::new(
                self.config.grid,
                ctx.clip,
                ctx.flags.contains(ContextFlags::CLIP),
            ),
            shading_flags,
        };
        self.frame.passes.begin_call();

        let arity = kind.arity();
        let mut submitted = 0;
        let mut gathered = [Vertex::default(); 3];
        for i in 0..count {
            let prim = &mut gathered[..arity];
            for (j, v) in prim.iter_mut().enumerate() {
                let ix = match indices {
                    Some(indices) => indices[i * arity + j] as usize,
                    None => i * arity + j,
                };
                *v = vertices[ix];
            }
            self.set_up(&call, prim);
            if self.burst.is_full() {
                let (packed, lost) = self.flush(&call);
                submitted += packed;
                if self.frame.saturated {
                    let dropped = lost + (count - i - 1);
                    tally(&mut self.frame.stats.dropped, dropped);
                    return Ok(SubmitStatus::Truncated { submitted, dropped });
                }
            }
        }
        let (packed, lost) = self.flush(&call);
        submitted += packed;
        if self.frame.saturated {
            tally(&mut self.frame.stats.dropped, lost);
            return Ok(SubmitStatus::Truncated {
                submitted,
                dropped: lost,
            });
        }
        Ok(SubmitStatus::Complete { submitted })
    }

    /// Sets up one primitive and adds it to the burst.
    fn set_up(&mut self, call: &Call<'_>, vertices: &[Vertex]) {
        let depth = if call.ctx.flags.contains(ContextFlags::DISABLE_DEPTH) {
            DepthSource::Synthetic(self.frame.depth.next())
        } else {
            DepthSource::Vertices
        };
        let Some(mut prim) = setup(
            call.kind,
            vertices,
            call.ctx,
            call.block.geometry_control,
            depth,
        ) else {
            tally(&mut self.frame.stats.culled, 1);
            trace!("culled degenerate {:?}", call.kind);
            return;
        };
        let Some(range) = call.tiles.encode(prim.record.bbox) else {
            tally(&mut self.frame.stats.clipped, 1);
            trace!("{:?} outside the clip rectangle", call.kind);
            return;
        };
        prim.record.tag = self.frame.passes.tag(call.policy, call.class, range);

        let mut material = MaterialRecord::default();
        if let Resolver::Resolve(steps) = &call.block.resolver {
            let input = MaterialInput {
                vertices,
                quad: prim.quad,
                texture: call.texture.as_ref(),
            };
            material::resolve(steps, call.ctx, &input, &mut prim.record, &mut material);
        }
        self.burst.push(prim.record, material);
    }

    /// Packs the burst into both streams and registers the packed primitives.
    ///
    /// Returns the number packed and the number lost to saturation.
    fn flush(&mut self, call: &Call<'_>) -> (usize, usize) {
        if self.burst.is_empty() {
            return (0, 0);
        }
        let geometry_words = call.kind.geometry_words();
        let shading_words = call.block.shading_words();
        let total = self.burst.len();
        let mut done = 0;
        while done < total {
            let fit = self
                .geometry
                .records_that_fit(geometry_words)
                .min(self.shading.remaining() / shading_words) as usize;
            if fit == 0 {
                if !self.frame.saturated {
                    warn!(
                        "parameter streams full ({} geometry and {} shading words); \
                         dropping primitives until the next frame",
                        self.geometry.cursor(),
                        self.shading.cursor(),
                    );
                }
                self.frame.saturated = true;
                break;
            }
            let end = total.min(done + fit);
            let geometry_base = self.geometry.cursor();
            let shading_base = self.shading.cursor();
            let records = &self.burst.geometry()[done..end];
            let written = pack::geometry::pack(
                &mut self.geometry,
                records,
                self.config.geometry_format,
                shading_base,
                shading_words,
            );
            if written == 0 {
                // `fit` counted records on later pages.
                if !self.geometry.next_page() {
                    self.frame.saturated = true;
                    break;
                }
                debug!("geometry stream moved to page at {}", self.geometry.cursor());
                continue;
            }
            let end = done + written;
            pack::shading::pack(
                &mut self.shading,
                call.block,
                call.shading_flags,
                &self.burst.geometry()[done..end],
                &self.burst.materials()[done..end],
            );
            for (i, record) in self.burst.geometry()[done..end].iter().enumerate() {
                self.regions.register(
                    record.tag,
                    record.tag.range(),
                    geometry_base + i as u32 * geometry_words,
                    record.depth_hint,
                );
                if record.tag.class().is_some_and(PassClass::is_translucent) {
                    tally(&mut self.frame.stats.translucent, 1);
                } else {
                    tally(&mut self.frame.stats.opaque, 1);
                }
            }
            done = end;
        }
        tally(&mut self.frame.stats.submitted, done);
        tally(&mut self.frame.stats.bursts, 1);
        debug!(
            "packed {done} of {total} {:?}s ({} shading words each)",
            call.kind, shading_words
        );
        self.burst.clear();
        (done, total - done)
    }
}

impl SubmissionSession {
    /// A session with the default sizing, an empty texture table and a
    /// region list.
    pub fn with_defaults() -> Self {
        Self {
            config: SessionConfig::default(),
            geometry: ParameterStream::new(DEFAULT_GEOMETRY_STREAM),
            shading: ParameterStream::new(DEFAULT_SHADING_STREAM),
            burst: BurstBuffer::new(DEFAULT_BURST_CAPACITY),
            frame: FrameState::default(),
            textures: TextureMap::new(),
            regions: RegionList::new(),
        }
    }
}

/// Adds `n` to a frame counter, saturating at `u32::MAX`.
fn tally(counter: &mut u32, n: usize) {
    *counter = counter.saturating_add(u32::try_from(n).unwrap_or(u32::MAX));
}

fn validate_call(
    kind: PrimitiveKind,
    ctx: &RenderContext,
    count: usize,
    indices: Option<&[u32]>,
    vertices: &[Vertex],
    grid: &TileGrid,
) -> Result<()> {
    if let Some(reason) = ctx.validate() {
        return Err(Error::BadParameter(reason));
    }
    if let Some(clip) = ctx.clip {
        if clip.first_x > clip.last_x
            || clip.first_y > clip.last_y
            || clip.last_x >= grid.tiles_x
            || clip.last_y >= grid.tiles_y
        {
            return Err(Error::BadParameter("clip rectangle outside the tile grid"));
        }
    }
    if count == 0 {
        return Ok(());
    }
    let needed = count
        .checked_mul(kind.arity())
        .ok_or(Error::BadParameter("primitive count overflows"))?;
    match indices {
        Some(indices) => {
            if indices.len() < needed {
                return Err(Error::BadParameter("index list shorter than the primitives"));
            }
            if indices[..needed]
                .iter()
                .any(|&ix| ix as usize >= vertices.len())
            {
                return Err(Error::BadParameter("index out of range of the vertex list"));
            }
        }
        None => {
            if vertices.len() < needed {
                return Err(Error::BadParameter("vertex list shorter than the primitives"));
            }
        }
    }
    Ok(())
}
