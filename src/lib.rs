pub mod config;
pub mod constants;
pub mod error;
pub mod lighting;
pub mod world;

pub use config::LightingConfig;
pub use error::{LightingError, LightingResult};
pub use lighting::{
    DayNightCycle, Frustum, LightBand, LightLevel, LightMap, LightNode, LightType, LightingStats,
    LightingSystem, TimeOfDay,
};
pub use world::{
    BlockId, Chunk, ChunkHandle, ChunkMeshUploader, ChunkPos, LightWorld, LocalPos, VoxelPos,
    VoxelWorld,
};
