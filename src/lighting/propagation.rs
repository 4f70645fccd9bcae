/// Light addition: breadth-first flood fill with write-on-enqueue.
///
/// A queued node means "this voxel holds `level`; spread it". The level is
/// written to storage before the node is queued, so a node whose voxel no
/// longer stores exactly `level` has been superseded (raised by a brighter
/// path or cleared by a removal) and is dropped when dequeued.

use crate::constants::light::MAX_LIGHT_LEVEL;
use crate::lighting::{attenuated, LightNode, LightType, LightingSystem};
use crate::world::{Direction, LightWorld, VoxelPos};

impl LightingSystem {
    /// Raise the stored level at `pos` to `level` and queue it for spreading.
    /// Does nothing when the voxel is already at least as bright.
    ///
    /// Transparency is the caller's concern: sources may sit in opaque voxels.
    pub(crate) fn raise_light(
        &mut self,
        world: &mut dyn LightWorld,
        pos: VoxelPos,
        light_type: LightType,
        level: u8,
    ) -> bool {
        let level = level.min(MAX_LIGHT_LEVEL);
        if level == 0 || Self::read_light(&*world, pos, light_type) >= level {
            return false;
        }
        if !self.write_light(world, pos, light_type, level) {
            return false;
        }
        self.additions
            .push_back(LightNode::new(pos, level, light_type));
        true
    }

    /// Queue a voxel whose stored level is already `level`
    pub(crate) fn queue_spread(&mut self, pos: VoxelPos, light_type: LightType, level: u8) {
        if level > 0 {
            self.additions
                .push_back(LightNode::new(pos, level, light_type));
        }
    }

    /// Spread one addition node to its six neighbours. Returns false for a
    /// stale node.
    pub(crate) fn process_addition(&mut self, world: &mut dyn LightWorld, node: LightNode) -> bool {
        if Self::read_light(&*world, node.pos, node.light_type) != node.level {
            return false;
        }

        for direction in Direction::ALL {
            let level = attenuated(node.level, node.light_type, direction);
            if level == 0 {
                continue;
            }

            let neighbor = node.pos.step(direction);
            if !world.is_block_transparent(neighbor) {
                continue;
            }
            self.raise_light(world, neighbor, node.light_type, level);
        }

        true
    }

    /// Brightest level any neighbour delivers into `pos`.
    ///
    /// For sky light, an unloaded chunk directly above counts as open sky.
    pub(crate) fn incoming_light(
        &self,
        world: &dyn LightWorld,
        pos: VoxelPos,
        light_type: LightType,
    ) -> u8 {
        let mut best = 0;

        for direction in Direction::ALL {
            let neighbor = pos.step(direction);
            let toward_pos = direction.opposite();

            let neighbor_level = if light_type == LightType::Sky
                && direction == Direction::Up
                && !world.is_chunk_loaded(neighbor.to_chunk_pos())
            {
                MAX_LIGHT_LEVEL
            } else {
                Self::read_light(world, neighbor, light_type)
            };

            best = best.max(attenuated(neighbor_level, light_type, toward_pos));
            if best == MAX_LIGHT_LEVEL {
                break;
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use crate::lighting::{LightType, LightingSystem};
    use crate::world::{BlockId, ChunkPos, LightWorld, VoxelPos, VoxelWorld};

    fn world_with_chunks(positions: &[(i32, i32, i32)]) -> VoxelWorld {
        let mut world = VoxelWorld::new();
        for &(x, y, z) in positions {
            world.load_chunk(ChunkPos::new(x, y, z));
        }
        world
    }

    fn manhattan(a: VoxelPos, b: VoxelPos) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs() + (a.z - b.z).abs()
    }

    #[test]
    fn test_torch_falls_off_by_manhattan_distance() {
        let mut world = world_with_chunks(&[(0, 0, 0)]);
        let mut system = LightingSystem::default();
        let torch = VoxelPos::new(16, 16, 16);
        system.add_light_source(&mut world, torch, 14);
        system.flush(&mut world);

        for pos in [
            VoxelPos::new(16, 16, 16),
            VoxelPos::new(17, 16, 16),
            VoxelPos::new(16, 10, 16),
            VoxelPos::new(20, 19, 14),
            VoxelPos::new(30, 16, 16),
        ] {
            let expected = (14 - manhattan(torch, pos)).max(0) as u8;
            assert_eq!(system.get_block_light(&world, pos), expected, "at {:?}", pos);
        }
    }

    #[test]
    fn test_light_crosses_chunk_boundary() {
        let mut world = world_with_chunks(&[(0, 0, 0), (1, 0, 0)]);
        let mut system = LightingSystem::default();
        system.add_light_source(&mut world, VoxelPos::new(30, 5, 5), 10);
        system.flush(&mut world);

        assert_eq!(system.get_block_light(&world, VoxelPos::new(32, 5, 5)), 8);
        assert_eq!(system.get_block_light(&world, VoxelPos::new(35, 5, 5)), 5);

        let east = world.chunk_handle(ChunkPos::new(1, 0, 0)).expect("loaded");
        assert!(system.is_chunk_dirty(east));
    }

    #[test]
    fn test_light_stops_at_unloaded_chunk() {
        let mut world = world_with_chunks(&[(0, 0, 0)]);
        let mut system = LightingSystem::default();
        system.add_light_source(&mut world, VoxelPos::new(31, 5, 5), 15);
        system.flush(&mut world);

        assert_eq!(system.get_block_light(&world, VoxelPos::new(32, 5, 5)), 0);
        assert_eq!(system.get_block_light(&world, VoxelPos::new(30, 5, 5)), 14);
    }

    #[test]
    fn test_opaque_blocks_stop_light() {
        let mut world = world_with_chunks(&[(0, 0, 0)]);
        // Stone wall across the whole x = 10 plane
        world.fill(VoxelPos::new(10, 0, 0), VoxelPos::new(10, 31, 31), BlockId::STONE);
        let mut system = LightingSystem::default();
        system.add_light_source(&mut world, VoxelPos::new(8, 8, 8), 15);
        system.flush(&mut world);

        assert_eq!(system.get_block_light(&world, VoxelPos::new(9, 8, 8)), 14);
        assert_eq!(system.get_block_light(&world, VoxelPos::new(10, 8, 8)), 0);
        assert_eq!(system.get_block_light(&world, VoxelPos::new(11, 8, 8)), 0);
    }

    #[test]
    fn test_brighter_of_two_sources_wins() {
        let mut world = world_with_chunks(&[(0, 0, 0)]);
        let mut system = LightingSystem::default();
        system.add_light_source(&mut world, VoxelPos::new(2, 8, 8), 15);
        system.add_light_source(&mut world, VoxelPos::new(12, 8, 8), 10);
        system.flush(&mut world);

        // Midpoint: 15 - 5 = 10 versus 10 - 5 = 5
        assert_eq!(system.get_block_light(&world, VoxelPos::new(7, 8, 8)), 10);
        assert_eq!(system.get_block_light(&world, VoxelPos::new(12, 8, 8)), 10);
        assert_eq!(system.get_block_light(&world, VoxelPos::new(13, 8, 8)), 9);
    }

    #[test]
    fn test_stale_node_is_skipped() {
        let mut world = world_with_chunks(&[(0, 0, 0)]);
        let mut system = LightingSystem::default();
        let pos = VoxelPos::new(4, 4, 4);
        system.add_light_source(&mut world, pos, 8);
        // Raised again before the first node is processed
        system.add_light_source(&mut world, pos, 12);

        let first = system.additions.pop_front().expect("queued");
        assert_eq!(first.level, 8);
        assert!(!system.process_addition(&mut world, first));
        let second = system.additions.pop_front().expect("queued");
        assert!(system.process_addition(&mut world, second));
    }

    #[test]
    fn test_full_skylight_falls_through_open_air() {
        let mut world = world_with_chunks(&[(0, 0, 0)]);
        let mut system = LightingSystem::default();
        system.add_sky_light_source(&mut world, VoxelPos::new(5, 31, 5), 15);
        system.flush(&mut world);

        assert_eq!(system.get_sky_light(&world, VoxelPos::new(5, 0, 5)), 15);
        assert_eq!(system.get_sky_light(&world, VoxelPos::new(6, 0, 5)), 14);
        assert_eq!(system.get_block_light(&world, VoxelPos::new(5, 0, 5)), 0);
    }

    #[test]
    fn test_incoming_light_treats_unloaded_above_as_sky() {
        let world = world_with_chunks(&[(0, 0, 0)]);
        let system = LightingSystem::default();
        assert_eq!(
            system.incoming_light(&world, VoxelPos::new(3, 31, 3), LightType::Sky),
            15
        );
        assert_eq!(
            system.incoming_light(&world, VoxelPos::new(3, 30, 3), LightType::Sky),
            0
        );
        assert_eq!(
            system.incoming_light(&world, VoxelPos::new(3, 31, 3), LightType::Block),
            0
        );
    }
}
