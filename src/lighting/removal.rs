/// Two-phase light removal.
///
/// Clear phase: starting at the removed voxel, walk outward and zero every
/// neighbour whose stored level could have come from the light being removed
/// (nonzero and no brighter than the attenuated removal level). Brighter
/// neighbours are lit by something else; they are queued for re-spreading
/// instead of cleared.
///
/// Re-add phase: once the clear phase has drained, every cleared voxel is
/// re-examined. Registered sources re-emit and transparent voxels take the
/// best light still arriving from their neighbours. Both push onto the
/// addition queue, which floods the cleared region back to the true maximum.

use crate::lighting::{attenuated, LightNode, LightType, LightingSystem};
use crate::world::{Direction, LightWorld, VoxelPos};

impl LightingSystem {
    /// Clear the light held at `pos` and queue the removal walk.
    /// A voxel that is already dark has nothing to remove.
    pub(crate) fn start_removal(
        &mut self,
        world: &mut dyn LightWorld,
        pos: VoxelPos,
        light_type: LightType,
    ) {
        let old = Self::read_light(&*world, pos, light_type);
        if old == 0 {
            return;
        }

        self.write_light(world, pos, light_type, 0);
        self.removals
            .push_back(LightNode::new(pos, old, light_type));
        self.reexamine.push_back((pos, light_type));
    }

    /// Clear phase for one node
    pub(crate) fn process_removal(&mut self, world: &mut dyn LightWorld, node: LightNode) {
        for direction in Direction::ALL {
            let neighbor = node.pos.step(direction);
            let level = Self::read_light(&*world, neighbor, node.light_type);
            if level == 0 {
                continue;
            }

            let expected = attenuated(node.level, node.light_type, direction);
            if level <= expected {
                self.write_light(world, neighbor, node.light_type, 0);
                self.removals
                    .push_back(LightNode::new(neighbor, level, node.light_type));
                self.reexamine.push_back((neighbor, node.light_type));
            } else {
                // Lit by another source; re-flood the cleared region from here
                self.queue_spread(neighbor, node.light_type, level);
            }
        }
    }

    /// Re-add phase for one cleared voxel
    pub(crate) fn reexamine_cleared(
        &mut self,
        world: &mut dyn LightWorld,
        pos: VoxelPos,
        light_type: LightType,
    ) {
        let mut level = self.sources.level(pos, light_type).unwrap_or(0);
        if world.is_block_transparent(pos) {
            level = level.max(self.incoming_light(&*world, pos, light_type));
        }
        self.raise_light(world, pos, light_type, level);
    }
}
