pub mod dirty_chunks;
pub mod light_map;
pub mod lighting_system;
pub mod propagation;
pub mod removal;
pub mod skylight;
pub mod sources;
pub mod time_of_day;
pub mod viewport;

pub use dirty_chunks::DirtyChunkTracker;
pub use light_map::{LightLevel, LightMap};
pub use lighting_system::{LightingStats, LightingSystem};
pub use sources::LightSources;
pub use time_of_day::{DayNightCycle, LightBand, TimeOfDay};
pub use viewport::{Frustum, Plane};

use crate::constants::light::{LIGHT_FALLOFF, MAX_LIGHT_LEVEL};
use crate::world::{Direction, VoxelPos};

/// Types of light in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    /// Sunlight/skylight that comes from above
    Sky,
    /// Block light from torches, lava, etc.
    Block,
}

impl LightType {
    pub const ALL: [LightType; 2] = [LightType::Sky, LightType::Block];
}

/// Queued propagation or removal work item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightNode {
    pub pos: VoxelPos,
    pub level: u8,
    pub light_type: LightType,
}

impl LightNode {
    pub fn new(pos: VoxelPos, level: u8, light_type: LightType) -> Self {
        Self {
            pos,
            level,
            light_type,
        }
    }
}

/// Level arriving at a neighbour one step in `direction` from a voxel at `level`.
///
/// Full skylight falls straight down without losing strength; every other
/// step loses `LIGHT_FALLOFF`.
pub fn attenuated(level: u8, light_type: LightType, direction: Direction) -> u8 {
    if light_type == LightType::Sky && direction == Direction::Down && level == MAX_LIGHT_LEVEL {
        level
    } else {
        level.saturating_sub(LIGHT_FALLOFF)
    }
}
