use crate::world::{ChunkPos, VoxelPos};

/// Handle to a loaded chunk with generation to detect use-after-unload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkHandle {
    /// Index into the chunk arena
    pub index: u32,
    /// Generation counter to detect stale references
    pub generation: u32,
}

impl ChunkHandle {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn idx(self) -> usize {
        self.index as usize
    }
}

/// World/chunk collaborator consumed by the lighting engine.
///
/// The engine never owns voxel storage. It reads transparency and packed light
/// bytes through this trait and writes light back the same way. Queries on
/// unloaded chunks must answer "opaque" and `None` rather than fail.
pub trait LightWorld {
    /// Handle of the chunk at `pos`, if loaded
    fn chunk_handle(&self, pos: ChunkPos) -> Option<ChunkHandle>;

    /// Position of a live chunk; `None` once the handle is stale
    fn chunk_position(&self, handle: ChunkHandle) -> Option<ChunkPos>;

    /// Every loaded chunk
    fn loaded_chunks(&self) -> Vec<(ChunkHandle, ChunkPos)>;

    /// Check if a block lets light through (false when unloaded)
    fn is_block_transparent(&self, pos: VoxelPos) -> bool;

    /// Block light emitted by the block at `pos`
    fn block_emission(&self, _pos: VoxelPos) -> u8 {
        0
    }

    /// Packed light byte (sky high nibble, block low nibble)
    fn packed_light(&self, pos: VoxelPos) -> Option<u8>;

    /// Write a packed light byte; returns false when the chunk is not loaded
    fn set_packed_light(&mut self, pos: VoxelPos, packed: u8) -> bool;

    /// Rebuild the CPU-side mesh of a chunk after its lighting changed
    fn rebuild_chunk_mesh(&mut self, handle: ChunkHandle);

    /// Check if a chunk is loaded
    fn is_chunk_loaded(&self, pos: ChunkPos) -> bool {
        self.chunk_handle(pos).is_some()
    }
}

/// Renderer collaborator that uploads rebuilt chunk meshes to the GPU
pub trait ChunkMeshUploader {
    fn upload_chunk_mesh(&mut self, handle: ChunkHandle, pos: ChunkPos);
}
