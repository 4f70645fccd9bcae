/// Sky light seeding for freshly loaded worlds and viewport refreshes.
///
/// A column is open to the sky from the top of the highest loaded chunk above
/// it down to its first opaque (or unloaded) voxel. Every voxel of that span
/// holds full sky light; the flood fill then spills it sideways under
/// overhangs and into caves.

use std::time::Instant;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::constants::chunk::{CHUNK_SIZE, CHUNK_SIZE_I32};
use crate::constants::light::MAX_LIGHT_LEVEL;
use crate::lighting::{LightType, LightingSystem};
use crate::world::{ChunkPos, Direction, LightWorld, LocalPos, VoxelPos};

/// Exposed part of one column, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SkySpan {
    pub x: i32,
    pub z: i32,
    pub bottom: i32,
    pub top: i32,
}

/// Highest loaded chunk y for every loaded (x, z) chunk column
pub(crate) fn chunk_column_tops(world: &dyn LightWorld) -> FxHashMap<(i32, i32), i32> {
    let mut tops: FxHashMap<(i32, i32), i32> = FxHashMap::default();
    for (_, pos) in world.loaded_chunks() {
        tops.entry((pos.x, pos.z))
            .and_modify(|top| *top = (*top).max(pos.y))
            .or_insert(pos.y);
    }
    tops
}

/// Lowest voxel y still open to the sky when walking down from `top_y`, or
/// `None` if the top voxel itself blocks light.
pub fn column_surface(world: &dyn LightWorld, x: i32, z: i32, top_y: i32) -> Option<i32> {
    if !world.is_block_transparent(VoxelPos::new(x, top_y, z)) {
        return None;
    }

    let mut y = top_y;
    while world.is_block_transparent(VoxelPos::new(x, y - 1, z)) {
        y -= 1;
    }
    Some(y)
}

impl LightingSystem {
    /// Write full sky light down one column; returns the lit span
    pub(crate) fn seed_sky_column(
        &mut self,
        world: &mut dyn LightWorld,
        x: i32,
        z: i32,
        top_y: i32,
    ) -> Option<SkySpan> {
        let bottom = column_surface(&*world, x, z, top_y)?;
        for y in bottom..=top_y {
            self.write_light(world, VoxelPos::new(x, y, z), LightType::Sky, MAX_LIGHT_LEVEL);
        }
        Some(SkySpan {
            x,
            z,
            bottom,
            top: top_y,
        })
    }

    /// Queue every exposed voxel that borders a transparent voxel the sky
    /// does not reach directly. Returns the number of seeds queued.
    pub(crate) fn queue_sky_spill(&mut self, world: &dyn LightWorld, spans: &[SkySpan]) -> usize {
        let mut queued = 0;
        for span in spans {
            for y in span.bottom..=span.top {
                let pos = VoxelPos::new(span.x, y, span.z);
                let spills = Direction::HORIZONTAL.iter().any(|&direction| {
                    let neighbor = pos.step(direction);
                    world.is_block_transparent(neighbor)
                        && Self::read_light(world, neighbor, LightType::Sky) < MAX_LIGHT_LEVEL
                });
                if spills {
                    self.queue_spread(pos, LightType::Sky, MAX_LIGHT_LEVEL);
                    queued += 1;
                }
            }
        }
        queued
    }

    /// Seed sky light for every column of the given chunk columns
    pub(crate) fn seed_sky_columns(
        &mut self,
        world: &mut dyn LightWorld,
        tops: &FxHashMap<(i32, i32), i32>,
        columns: &FxHashSet<(i32, i32)>,
    ) -> Vec<SkySpan> {
        let mut spans = Vec::new();
        for &(cx, cz) in columns {
            let Some(&top_cy) = tops.get(&(cx, cz)) else {
                continue;
            };
            let top_y = (top_cy + 1) * CHUNK_SIZE_I32 - 1;
            for lz in 0..CHUNK_SIZE_I32 {
                for lx in 0..CHUNK_SIZE_I32 {
                    let x = cx * CHUNK_SIZE_I32 + lx;
                    let z = cz * CHUNK_SIZE_I32 + lz;
                    if let Some(span) = self.seed_sky_column(world, x, z, top_y) {
                        spans.push(span);
                    }
                }
            }
        }
        spans
    }

    /// Compute lighting for the whole loaded world and block until it settles.
    ///
    /// Seeds sky light column by column, registers every emissive block the
    /// world reports, then drains all queues. Meant for world load only.
    pub fn initialize_world_lighting(&mut self, world: &mut dyn LightWorld) {
        let start = Instant::now();

        let tops = chunk_column_tops(&*world);
        let columns: FxHashSet<(i32, i32)> = tops.keys().copied().collect();
        let spans = self.seed_sky_columns(world, &tops, &columns);
        let spill_seeds = self.queue_sky_spill(&*world, &spans);

        let mut emitters = 0;
        for (_, chunk_pos) in world.loaded_chunks() {
            emitters += self.register_chunk_emitters(world, chunk_pos);
        }

        self.flush(world);

        log::info!(
            "[lighting] initialised {} chunks: {} sky columns, {} spill seeds, {} emitters in {:.2?}",
            world.loaded_chunks().len(),
            spans.len(),
            spill_seeds,
            emitters,
            start.elapsed()
        );
    }

    fn register_chunk_emitters(&mut self, world: &mut dyn LightWorld, chunk_pos: ChunkPos) -> usize {
        let mut registered = 0;
        for y in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    let pos = LocalPos::new(x, y, z).to_voxel_pos(chunk_pos);
                    let emission = world.block_emission(pos);
                    if emission > 0 {
                        self.add_light_source(world, pos, emission);
                        registered += 1;
                    }
                }
            }
        }
        registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{BlockId, VoxelWorld};

    /// Stone below `ground_y` (exclusive), air above, in every given chunk
    fn flat_world(chunks: &[(i32, i32, i32)], ground_y: i32) -> VoxelWorld {
        let mut world = VoxelWorld::new();
        for &(x, y, z) in chunks {
            let pos = ChunkPos::new(x, y, z);
            world.load_chunk(pos);
            let min = pos.min_voxel();
            let max_y = (min.y + CHUNK_SIZE_I32 - 1).min(ground_y - 1);
            if max_y >= min.y {
                world.fill(
                    min,
                    VoxelPos::new(min.x + CHUNK_SIZE_I32 - 1, max_y, min.z + CHUNK_SIZE_I32 - 1),
                    BlockId::STONE,
                );
            }
        }
        world
    }

    #[test]
    fn test_column_surface() {
        let world = flat_world(&[(0, 0, 0)], 10);
        assert_eq!(column_surface(&world, 3, 3, 31), Some(10));

        let solid = flat_world(&[(0, 0, 0)], 32);
        assert_eq!(column_surface(&solid, 3, 3, 31), None);
    }

    #[test]
    fn test_flat_ground_is_lit_above_and_dark_below() {
        let mut world = flat_world(&[(0, 0, 0), (1, 0, 0)], 10);
        let mut system = LightingSystem::default();
        system.initialize_world_lighting(&mut world);

        assert!(system.queues_empty());
        assert_eq!(system.get_sky_light(&world, VoxelPos::new(5, 10, 5)), 15);
        assert_eq!(system.get_sky_light(&world, VoxelPos::new(40, 31, 7)), 15);
        assert_eq!(system.get_sky_light(&world, VoxelPos::new(5, 9, 5)), 0);
        assert_eq!(system.dirty_chunk_count(), 2);
    }

    #[test]
    fn test_open_shaft_holds_full_sky_light() {
        let mut world = flat_world(&[(0, 0, 0), (0, 1, 0)], 64);
        world.fill(VoxelPos::new(7, 0, 7), VoxelPos::new(7, 63, 7), BlockId::AIR);
        let mut system = LightingSystem::default();
        system.initialize_world_lighting(&mut world);

        for y in 0..64 {
            assert_eq!(system.get_sky_light(&world, VoxelPos::new(7, y, 7)), 15, "y = {}", y);
        }
        assert_eq!(system.get_sky_light(&world, VoxelPos::new(8, 40, 7)), 0);
    }

    #[test]
    fn test_sky_spills_under_overhang() {
        let mut world = flat_world(&[(0, 0, 0)], 10);
        // Roof at y = 20 covering x 0..=10
        world.fill(VoxelPos::new(0, 20, 0), VoxelPos::new(10, 20, 31), BlockId::STONE);
        let mut system = LightingSystem::default();
        system.initialize_world_lighting(&mut world);

        assert_eq!(system.get_sky_light(&world, VoxelPos::new(11, 15, 5)), 15);
        assert_eq!(system.get_sky_light(&world, VoxelPos::new(10, 15, 5)), 14);
        assert_eq!(system.get_sky_light(&world, VoxelPos::new(5, 15, 5)), 9);
        assert_eq!(system.get_sky_light(&world, VoxelPos::new(5, 21, 5)), 15);
    }

    #[test]
    fn test_emissive_blocks_are_registered() {
        let mut world = flat_world(&[(0, 0, 0)], 10);
        let lamp = VoxelPos::new(20, 10, 20);
        world.set_block(lamp, BlockId::GLOWSTONE);
        let mut system = LightingSystem::default();
        system.initialize_world_lighting(&mut world);

        assert!(system.sources().contains(lamp));
        assert_eq!(system.get_block_light(&world, lamp), 15);
        assert_eq!(system.get_block_light(&world, VoxelPos::new(20, 11, 20)), 14);
        assert_eq!(system.get_block_light(&world, VoxelPos::new(23, 10, 20)), 12);
    }
}
