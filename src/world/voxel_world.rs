//! In-memory chunk store implementing [`LightWorld`].
//!
//! Used by the demo binary and the tests. Chunk streaming, terrain generation
//! and GPU upload live outside this crate; this world only keeps blocks,
//! packed light and a mesh summary per chunk.

use rustc_hash::FxHashMap;

use crate::world::{
    BlockId, Chunk, ChunkArena, ChunkHandle, ChunkMesh, ChunkPos, LightWorld, VoxelPos,
};

#[derive(Default)]
pub struct VoxelWorld {
    chunks: ChunkArena<Chunk>,
    position_to_handle: FxHashMap<ChunkPos, ChunkHandle>,
}

impl VoxelWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an empty (all air) chunk, replacing any chunk already there
    pub fn load_chunk(&mut self, pos: ChunkPos) -> ChunkHandle {
        self.insert_chunk(Chunk::new(pos))
    }

    /// Load a prepared chunk. The previous chunk at the same position, if
    /// any, is dropped; callers must notify the lighting system first.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> ChunkHandle {
        let pos = chunk.position();
        if let Some(old) = self.position_to_handle.remove(&pos) {
            self.chunks.remove(old);
        }
        let handle = self.chunks.insert(chunk);
        self.position_to_handle.insert(pos, handle);
        handle
    }

    /// Unload a chunk, returning the handle it had.
    ///
    /// Call `LightingSystem::notify_chunk_unload` with this handle.
    pub fn unload_chunk(&mut self, pos: ChunkPos) -> Option<ChunkHandle> {
        let handle = self.position_to_handle.remove(&pos)?;
        self.chunks.remove(handle);
        Some(handle)
    }

    pub fn chunk(&self, handle: ChunkHandle) -> Option<&Chunk> {
        self.chunks.get(handle)
    }

    pub fn chunk_at(&self, pos: ChunkPos) -> Option<&Chunk> {
        let handle = self.position_to_handle.get(&pos)?;
        self.chunks.get(*handle)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Mesh summary of the chunk at `pos`
    pub fn chunk_mesh(&self, pos: ChunkPos) -> Option<ChunkMesh> {
        self.chunk_at(pos).map(Chunk::mesh)
    }

    fn chunk_for_voxel(&self, pos: VoxelPos) -> Option<&Chunk> {
        self.chunk_at(pos.to_chunk_pos())
    }

    fn chunk_for_voxel_mut(&mut self, pos: VoxelPos) -> Option<&mut Chunk> {
        let handle = *self.position_to_handle.get(&pos.to_chunk_pos())?;
        self.chunks.get_mut(handle)
    }

    /// Get a block; unloaded space reads as air
    pub fn get_block(&self, pos: VoxelPos) -> BlockId {
        self.chunk_for_voxel(pos)
            .map(|chunk| chunk.get_block(pos.to_local_pos()))
            .unwrap_or(BlockId::AIR)
    }

    /// Set a block; returns the previous block, or `None` when unloaded.
    ///
    /// Lighting is not touched: pass the opacity change to
    /// `LightingSystem::on_block_changed`.
    pub fn set_block(&mut self, pos: VoxelPos, block: BlockId) -> Option<BlockId> {
        let chunk = self.chunk_for_voxel_mut(pos)?;
        let local = pos.to_local_pos();
        let previous = chunk.get_block(local);
        chunk.set_block(local, block);
        Some(previous)
    }

    /// Fill an inclusive box of voxels with one block (loaded chunks only)
    pub fn fill(&mut self, min: VoxelPos, max: VoxelPos, block: BlockId) {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.set_block(VoxelPos::new(x, y, z), block);
                }
            }
        }
    }
}

impl LightWorld for VoxelWorld {
    fn chunk_handle(&self, pos: ChunkPos) -> Option<ChunkHandle> {
        self.position_to_handle.get(&pos).copied()
    }

    fn chunk_position(&self, handle: ChunkHandle) -> Option<ChunkPos> {
        self.chunks.get(handle).map(Chunk::position)
    }

    fn loaded_chunks(&self) -> Vec<(ChunkHandle, ChunkPos)> {
        self.chunks
            .iter()
            .map(|(handle, chunk)| (handle, chunk.position()))
            .collect()
    }

    fn is_block_transparent(&self, pos: VoxelPos) -> bool {
        self.chunk_for_voxel(pos)
            .map(|chunk| chunk.get_block(pos.to_local_pos()).is_transparent())
            .unwrap_or(false)
    }

    fn block_emission(&self, pos: VoxelPos) -> u8 {
        self.get_block(pos).light_emission()
    }

    fn packed_light(&self, pos: VoxelPos) -> Option<u8> {
        self.chunk_for_voxel(pos)
            .map(|chunk| chunk.light().packed(pos.to_local_pos()))
    }

    fn set_packed_light(&mut self, pos: VoxelPos, packed: u8) -> bool {
        match self.chunk_for_voxel_mut(pos) {
            Some(chunk) => {
                chunk.light_mut().set_packed(pos.to_local_pos(), packed);
                true
            }
            None => false,
        }
    }

    fn rebuild_chunk_mesh(&mut self, handle: ChunkHandle) {
        if let Some(chunk) = self.chunks.get_mut(handle) {
            chunk.rebuild_mesh();
        }
    }
}
