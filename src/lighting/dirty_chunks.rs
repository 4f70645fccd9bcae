/// Dirty-chunk tracking and frame-budgeted mesh regeneration.
///
/// Chunks are queued in the order they first became dirty so a lighting storm
/// in one area cannot starve another. Handles are generation-checked against
/// the world before use; a chunk unloaded without notification is skipped.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::constants::chunk::CHUNK_MAX_LOCAL;
use crate::world::{ChunkHandle, ChunkMeshUploader, ChunkPos, LightWorld, LocalPos};

#[derive(Debug, Default)]
pub struct DirtyChunkTracker {
    order: VecDeque<ChunkHandle>,
    members: FxHashSet<ChunkHandle>,
}

impl DirtyChunkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk; returns false if it was already dirty
    pub fn mark(&mut self, handle: ChunkHandle) -> bool {
        if self.members.insert(handle) {
            self.order.push_back(handle);
            true
        } else {
            false
        }
    }

    /// Drop a chunk from the set; returns true if it was dirty
    pub fn remove(&mut self, handle: ChunkHandle) -> bool {
        if self.members.remove(&handle) {
            self.order.retain(|&h| h != handle);
            true
        } else {
            false
        }
    }

    /// Oldest dirty chunk
    pub fn pop(&mut self) -> Option<ChunkHandle> {
        let handle = self.order.pop_front()?;
        self.members.remove(&handle);
        Some(handle)
    }

    pub fn contains(&self, handle: ChunkHandle) -> bool {
        self.members.contains(&handle)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChunkHandle> {
        self.order.iter()
    }
}

/// Mark the chunk owning `local` dirty, plus every loaded chunk sharing a face
/// the voxel lies on. A corner voxel touches three neighbours.
pub fn mark_neighbor_chunks_dirty(
    tracker: &mut DirtyChunkTracker,
    world: &dyn LightWorld,
    chunk_pos: ChunkPos,
    local: LocalPos,
) {
    if let Some(handle) = world.chunk_handle(chunk_pos) {
        tracker.mark(handle);
    }

    if !local.is_on_boundary() {
        return;
    }

    let axes = [
        (local.x, (1, 0, 0)),
        (local.y, (0, 1, 0)),
        (local.z, (0, 0, 1)),
    ];

    for (coord, (ax, ay, az)) in axes {
        let sign = if coord == 0 {
            -1
        } else if coord == CHUNK_MAX_LOCAL {
            1
        } else {
            continue;
        };

        let neighbor = chunk_pos.offset(ax * sign, ay * sign, az * sign);
        if let Some(handle) = world.chunk_handle(neighbor) {
            tracker.mark(handle);
        }
    }
}

/// Rebuild up to `max_per_frame` dirty chunk meshes, uploading each through
/// `renderer` when one is supplied. Returns the number of meshes rebuilt.
///
/// Chunks past the quota stay dirty for the next call.
pub fn regenerate_dirty_chunks(
    tracker: &mut DirtyChunkTracker,
    world: &mut dyn LightWorld,
    max_per_frame: usize,
    mut renderer: Option<&mut dyn ChunkMeshUploader>,
) -> usize {
    let mut regenerated = 0;

    while regenerated < max_per_frame {
        let Some(handle) = tracker.pop() else {
            break;
        };

        // Stale handle: the chunk was unloaded without notification
        let Some(pos) = world.chunk_position(handle) else {
            continue;
        };

        world.rebuild_chunk_mesh(handle);
        if let Some(renderer) = renderer.as_deref_mut() {
            renderer.upload_chunk_mesh(handle, pos);
        }
        regenerated += 1;
    }

    regenerated
}
