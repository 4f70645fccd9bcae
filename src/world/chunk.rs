use crate::constants::chunk::{CHUNK_SIZE, VOXELS_PER_CHUNK};
use crate::lighting::{LightLevel, LightMap};
use crate::world::{BlockId, ChunkPos, Direction, LocalPos};

/// CPU-side mesh summary rebuilt whenever lighting or blocks change.
///
/// Only faces between an opaque block and a transparent neighbour inside the
/// chunk are counted; the light on each face is the light of the open voxel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkMesh {
    pub face_count: u32,
    pub light_sum: u32,
    /// Incremented on every rebuild
    pub revision: u32,
}

/// A chunk of voxels
#[derive(Clone)]
pub struct Chunk {
    position: ChunkPos,
    blocks: Vec<BlockId>,
    light_map: LightMap,
    mesh: ChunkMesh,
}

impl Chunk {
    pub fn new(position: ChunkPos) -> Self {
        Self {
            position,
            blocks: vec![BlockId::AIR; VOXELS_PER_CHUNK],
            light_map: LightMap::new(),
            mesh: ChunkMesh::default(),
        }
    }

    /// Chunk completely filled with one block
    pub fn filled(position: ChunkPos, block: BlockId) -> Self {
        Self {
            blocks: vec![block; VOXELS_PER_CHUNK],
            ..Self::new(position)
        }
    }

    /// Get the chunk position
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    fn index(pos: LocalPos) -> usize {
        (pos.x + pos.y * CHUNK_SIZE + pos.z * CHUNK_SIZE * CHUNK_SIZE) as usize
    }

    /// Get block at local position
    pub fn get_block(&self, pos: LocalPos) -> BlockId {
        if !pos.is_valid() {
            return BlockId::AIR;
        }
        self.blocks[Self::index(pos)]
    }

    /// Set block at local position
    pub fn set_block(&mut self, pos: LocalPos, block: BlockId) {
        if !pos.is_valid() {
            return;
        }
        self.blocks[Self::index(pos)] = block;
    }

    pub fn light(&self) -> &LightMap {
        &self.light_map
    }

    pub fn light_mut(&mut self) -> &mut LightMap {
        &mut self.light_map
    }

    /// Get light level at local position
    pub fn get_light(&self, pos: LocalPos) -> LightLevel {
        self.light_map.get(pos)
    }

    pub fn mesh(&self) -> ChunkMesh {
        self.mesh
    }

    /// Regenerate the mesh summary from current blocks and light
    pub fn rebuild_mesh(&mut self) {
        let mut face_count = 0;
        let mut light_sum = 0;

        for y in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    let pos = LocalPos::new(x, y, z);
                    if self.get_block(pos).is_transparent() {
                        continue;
                    }

                    for direction in Direction::ALL {
                        let (dx, dy, dz) = direction.offset();
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        let nz = z as i32 + dz;
                        if nx < 0 || ny < 0 || nz < 0 {
                            continue;
                        }
                        let neighbor = LocalPos::new(nx as u32, ny as u32, nz as u32);
                        if !neighbor.is_valid() || !self.get_block(neighbor).is_transparent() {
                            continue;
                        }

                        face_count += 1;
                        light_sum += self.get_light(neighbor).combined() as u32;
                    }
                }
            }
        }

        self.mesh = ChunkMesh {
            face_count,
            light_sum,
            revision: self.mesh.revision.wrapping_add(1),
        };
    }
}
