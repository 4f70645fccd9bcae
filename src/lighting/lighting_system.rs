//! Incremental two-channel voxel lighting engine
//!
//! `LightingSystem` owns the addition/removal work queues, the dirty-chunk set
//! and the light source registry. Voxel storage belongs to the world and is
//! reached through [`LightWorld`]. All work is frame-sliced:
//!
//! 1. removal (clear phase, then re-examination of cleared voxels), at most
//!    `max_light_removes_per_frame` units
//! 2. addition, at most `max_light_adds_per_frame` nodes
//! 3. mesh regeneration of dirty chunks, at most
//!    `max_mesh_regenerations_per_frame`
//!
//! Everything runs on the caller's thread; there is no internal locking.

use std::collections::VecDeque;

use serde::Serialize;

use crate::config::LightingConfig;
use crate::constants::budget;
use crate::error::LightingResult;
use crate::lighting::dirty_chunks::{self, DirtyChunkTracker};
use crate::lighting::{
    DayNightCycle, LightBand, LightLevel, LightNode, LightSources, LightType, TimeOfDay,
};
use crate::world::{ChunkHandle, ChunkMeshUploader, ChunkPos, LightWorld, LocalPos, VoxelPos};

/// Work done during the last `update()`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LightingStats {
    pub frame: u64,
    /// Addition nodes taken off the queue (live or stale)
    pub additions_processed: usize,
    /// Addition nodes skipped because storage no longer matched
    pub stale_additions: usize,
    /// Removal nodes taken off the queue
    pub removals_processed: usize,
    /// Cleared voxels re-examined for remaining light
    pub voxels_reexamined: usize,
    pub chunks_regenerated: usize,
    pub pending_additions: usize,
    pub pending_removals: usize,
    pub dirty_chunks: usize,
}

impl LightingStats {
    /// Removal work units, the quantity bounded by the removal quota
    pub fn removal_work(&self) -> usize {
        self.removals_processed + self.voxels_reexamined
    }
}

pub struct LightingSystem {
    pub(crate) config: LightingConfig,
    pub(crate) additions: VecDeque<LightNode>,
    pub(crate) removals: VecDeque<LightNode>,
    pub(crate) reexamine: VecDeque<(VoxelPos, LightType)>,
    pub(crate) dirty: DirtyChunkTracker,
    pub(crate) sources: LightSources,
    cycle: DayNightCycle,
    viewport_refresh_requested: bool,
    stats: LightingStats,
    frame: u64,
}

impl Default for LightingSystem {
    fn default() -> Self {
        Self::new(LightingConfig::default())
    }
}

impl LightingSystem {
    /// Create a lighting system. Invalid config fields are replaced (zero
    /// quotas become 1, a bad day length or start hour falls back to the
    /// default) so every queue always makes progress.
    pub fn new(config: LightingConfig) -> Self {
        if let Err(err) = config.validate() {
            log::warn!("[lighting] {}; using corrected values", err);
        }
        let config = config.sanitized();
        let cycle = DayNightCycle::new(TimeOfDay::new(config.start_hour), config.day_length_seconds);
        Self {
            config,
            additions: VecDeque::new(),
            removals: VecDeque::new(),
            reexamine: VecDeque::new(),
            dirty: DirtyChunkTracker::new(),
            sources: LightSources::new(),
            cycle,
            viewport_refresh_requested: false,
            stats: LightingStats::default(),
            frame: 0,
        }
    }

    /// Create a lighting system, rejecting an invalid config
    pub fn try_new(config: LightingConfig) -> LightingResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &LightingConfig {
        &self.config
    }

    // ===== LIGHT STORAGE ACCESS =====

    /// Stored level of one channel; 0 for unloaded chunks
    pub(crate) fn read_light(world: &dyn LightWorld, pos: VoxelPos, light_type: LightType) -> u8 {
        world
            .packed_light(pos)
            .map(|packed| LightLevel::from_packed(packed).get(light_type))
            .unwrap_or(0)
    }

    /// Write one channel through to the owning chunk and mark the chunk (and
    /// any face-sharing neighbour) dirty. Returns true if the stored value changed.
    pub(crate) fn write_light(
        &mut self,
        world: &mut dyn LightWorld,
        pos: VoxelPos,
        light_type: LightType,
        level: u8,
    ) -> bool {
        let Some(packed) = world.packed_light(pos) else {
            return false;
        };

        let updated = LightLevel::from_packed(packed).with(light_type, level).to_packed();
        if updated == packed || !world.set_packed_light(pos, updated) {
            return false;
        }

        dirty_chunks::mark_neighbor_chunks_dirty(
            &mut self.dirty,
            &*world,
            pos.to_chunk_pos(),
            pos.to_local_pos(),
        );
        true
    }

    pub fn get_sky_light(&self, world: &dyn LightWorld, pos: VoxelPos) -> u8 {
        Self::read_light(world, pos, LightType::Sky)
    }

    pub fn get_block_light(&self, world: &dyn LightWorld, pos: VoxelPos) -> u8 {
        Self::read_light(world, pos, LightType::Block)
    }

    /// Brightest of the two channels
    pub fn get_combined_light(&self, world: &dyn LightWorld, pos: VoxelPos) -> u8 {
        world
            .packed_light(pos)
            .map(|packed| LightLevel::from_packed(packed).combined())
            .unwrap_or(0)
    }

    // ===== BLOCK-CHANGE INTEGRATION =====

    /// Register a block-light emitter and start flooding its light
    pub fn add_light_source(&mut self, world: &mut dyn LightWorld, pos: VoxelPos, level: u8) {
        self.add_source(world, pos, LightType::Block, level);
    }

    /// Register a sky-light emitter (e.g. a skylight opening) and start flooding
    pub fn add_sky_light_source(&mut self, world: &mut dyn LightWorld, pos: VoxelPos, level: u8) {
        self.add_source(world, pos, LightType::Sky, level);
    }

    fn add_source(
        &mut self,
        world: &mut dyn LightWorld,
        pos: VoxelPos,
        light_type: LightType,
        level: u8,
    ) {
        let previous = self.sources.level(pos, light_type);
        self.sources.insert(pos, light_type, level);
        let level = self.sources.level(pos, light_type).unwrap_or(0);

        if previous.is_some_and(|old| old > level) {
            // Dimmed: clear the old glow, the re-add phase re-emits from the registry
            self.start_removal(world, pos, light_type);
        } else {
            self.raise_light(world, pos, light_type, level);
        }
    }

    /// Remove whatever source is registered at `pos`. Unknown positions are a
    /// no-op: no queue or stored value changes.
    pub fn remove_light_source(&mut self, world: &mut dyn LightWorld, pos: VoxelPos) {
        for light_type in LightType::ALL {
            if self.sources.remove(pos, light_type).is_some() {
                self.start_removal(world, pos, light_type);
            }
        }
    }

    /// Single entry point for block edits.
    ///
    /// Placing an opaque block removes the light passing through it on both
    /// channels; removing one lets light from the neighbours (and open sky)
    /// flood in.
    pub fn on_block_changed(
        &mut self,
        world: &mut dyn LightWorld,
        pos: VoxelPos,
        was_opaque: bool,
        is_opaque: bool,
    ) {
        match (was_opaque, is_opaque) {
            (false, true) => {
                for light_type in LightType::ALL {
                    self.start_removal(world, pos, light_type);
                }
            }
            (true, false) => {
                for light_type in LightType::ALL {
                    let mut level = self.incoming_light(&*world, pos, light_type);
                    if let Some(emission) = self.sources.level(pos, light_type) {
                        level = level.max(emission);
                    }
                    self.raise_light(world, pos, light_type, level);
                }
            }
            _ => {}
        }
    }

    // ===== FRAME UPDATE =====

    /// Run one frame of lighting work, then rebuild a bounded batch of dirty
    /// chunk meshes. Never blocks beyond its quotas.
    pub fn update(
        &mut self,
        delta_time: f32,
        world: &mut dyn LightWorld,
        renderer: Option<&mut dyn ChunkMeshUploader>,
    ) -> LightingStats {
        self.frame += 1;
        let mut stats = LightingStats {
            frame: self.frame,
            ..LightingStats::default()
        };

        if let Some(band) = self.cycle.update(delta_time) {
            log::debug!(
                "[lighting] sky band changed to {:?} (sky level {})",
                band,
                band.sky_level()
            );
            self.viewport_refresh_requested = true;
        }

        // Removal first: clear phase, then re-examination of cleared voxels
        let mut removal_budget = self.config.max_light_removes_per_frame;
        while removal_budget > 0 {
            if let Some(node) = self.removals.pop_front() {
                self.process_removal(world, node);
                stats.removals_processed += 1;
            } else if let Some((pos, light_type)) = self.reexamine.pop_front() {
                self.reexamine_cleared(world, pos, light_type);
                stats.voxels_reexamined += 1;
            } else {
                break;
            }
            removal_budget -= 1;
        }

        // Then additions; nodes a pending removal will clear are skipped as stale
        let mut addition_budget = self.config.max_light_adds_per_frame;
        while addition_budget > 0 {
            let Some(node) = self.additions.pop_front() else {
                break;
            };
            if !self.process_addition(world, node) {
                stats.stale_additions += 1;
            }
            stats.additions_processed += 1;
            addition_budget -= 1;
        }

        stats.chunks_regenerated = self.regenerate_dirty_chunks(
            world,
            self.config.max_mesh_regenerations_per_frame,
            renderer,
        );

        stats.pending_additions = self.pending_additions();
        stats.pending_removals = self.pending_removals();
        stats.dirty_chunks = self.dirty.len();

        if stats.additions_processed + stats.removal_work() + stats.chunks_regenerated > 0 {
            log::debug!(
                "[lighting] frame {}: +{} -{} ~{} meshes {} (pending +{} -{}, dirty {})",
                stats.frame,
                stats.additions_processed,
                stats.removals_processed,
                stats.voxels_reexamined,
                stats.chunks_regenerated,
                stats.pending_additions,
                stats.pending_removals,
                stats.dirty_chunks,
            );
        }

        self.stats = stats;
        stats
    }

    /// Drain every queue to completion. Blocking; meant for world load and tests.
    pub fn flush(&mut self, world: &mut dyn LightWorld) {
        while !self.queues_empty() {
            while let Some(node) = self.removals.pop_front() {
                self.process_removal(world, node);
            }
            while let Some((pos, light_type)) = self.reexamine.pop_front() {
                self.reexamine_cleared(world, pos, light_type);
            }
            while let Some(node) = self.additions.pop_front() {
                self.process_addition(world, node);
            }
        }
    }

    // ===== DIRTY CHUNKS =====

    /// Mark the chunk owning `local` (and face-sharing neighbours) dirty
    pub fn mark_neighbor_chunks_dirty(
        &mut self,
        world: &dyn LightWorld,
        chunk_pos: ChunkPos,
        local: LocalPos,
    ) {
        dirty_chunks::mark_neighbor_chunks_dirty(&mut self.dirty, world, chunk_pos, local);
    }

    /// Rebuild up to `max_per_frame` dirty meshes; the rest stay dirty
    pub fn regenerate_dirty_chunks(
        &mut self,
        world: &mut dyn LightWorld,
        max_per_frame: usize,
        renderer: Option<&mut dyn ChunkMeshUploader>,
    ) -> usize {
        dirty_chunks::regenerate_dirty_chunks(&mut self.dirty, world, max_per_frame, renderer)
    }

    /// Blocking variant used during world load
    pub fn regenerate_all_dirty_chunks(
        &mut self,
        world: &mut dyn LightWorld,
        renderer: Option<&mut dyn ChunkMeshUploader>,
    ) -> usize {
        let count = self.regenerate_dirty_chunks(world, budget::UNBOUNDED, renderer);
        log::info!("[lighting] regenerated {} chunk meshes", count);
        count
    }

    /// Must be called before the world frees a chunk
    pub fn notify_chunk_unload(&mut self, handle: ChunkHandle) {
        if self.dirty.remove(handle) {
            log::trace!("[lighting] dropped unloaded chunk {:?} from dirty set", handle);
        }
    }

    pub fn is_chunk_dirty(&self, handle: ChunkHandle) -> bool {
        self.dirty.contains(handle)
    }

    pub fn dirty_chunk_count(&self) -> usize {
        self.dirty.len()
    }

    // ===== QUERIES =====

    pub fn queues_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty() && self.reexamine.is_empty()
    }

    pub fn pending_additions(&self) -> usize {
        self.additions.len()
    }

    /// Removal nodes plus cleared voxels still awaiting re-examination
    pub fn pending_removals(&self) -> usize {
        self.removals.len() + self.reexamine.len()
    }

    pub fn sources(&self) -> &LightSources {
        &self.sources
    }

    pub fn last_frame_stats(&self) -> LightingStats {
        self.stats
    }

    // ===== DAY/NIGHT =====

    pub fn time_of_day(&self) -> TimeOfDay {
        self.cycle.time
    }

    pub fn set_time_of_day(&mut self, time: TimeOfDay) {
        let before = self.cycle.band();
        self.cycle.time = time;
        if self.cycle.band() != before {
            self.viewport_refresh_requested = true;
        }
    }

    pub fn light_band(&self) -> LightBand {
        self.cycle.band()
    }

    /// Multiplier meshers apply to stored sky light
    pub fn sky_brightness(&self) -> f32 {
        self.cycle.time.sky_brightness()
    }

    pub fn day_night_cycle_mut(&mut self) -> &mut DayNightCycle {
        &mut self.cycle
    }

    /// True once after the sky band changed; answer with
    /// `recalculate_viewport_lighting`
    pub fn take_viewport_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.viewport_refresh_requested)
    }
}
