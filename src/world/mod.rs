//! World collaborator for the lighting engine
//!
//! - **Positions**: chunk/voxel/local coordinates and face directions
//! - **Interface**: the narrow `LightWorld` trait the engine reads and writes through
//! - **Storage**: generation-checked chunk arena and the in-memory `VoxelWorld`

pub mod block;
pub mod chunk;
pub mod chunk_arena;
pub mod position;
pub mod voxel_world;
pub mod world_interface;

pub use block::BlockId;
pub use chunk::{Chunk, ChunkMesh};
pub use chunk_arena::ChunkArena;
pub use position::{ChunkPos, Direction, LocalPos, VoxelPos};
pub use voxel_world::VoxelWorld;
pub use world_interface::{ChunkHandle, ChunkMeshUploader, LightWorld};
