use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::chunk::{CHUNK_MAX_LOCAL, CHUNK_SIZE, CHUNK_SIZE_F32, CHUNK_SIZE_I32};

/// Position of a chunk in the world (chunk coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// World-space corner with the smallest coordinates
    pub fn to_world_pos(&self) -> Vector3<f32> {
        Vector3::new(
            self.x as f32 * CHUNK_SIZE_F32,
            self.y as f32 * CHUNK_SIZE_F32,
            self.z as f32 * CHUNK_SIZE_F32,
        )
    }

    /// World-space centre of the chunk
    pub fn center(&self) -> Point3<f32> {
        let half = CHUNK_SIZE_F32 / 2.0;
        let corner = self.to_world_pos();
        Point3::new(corner.x + half, corner.y + half, corner.z + half)
    }

    /// First voxel of the chunk
    pub fn min_voxel(&self) -> VoxelPos {
        VoxelPos::new(
            self.x * CHUNK_SIZE_I32,
            self.y * CHUNK_SIZE_I32,
            self.z * CHUNK_SIZE_I32,
        )
    }

    /// Create a new chunk position offset by the given amounts
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Calculate squared distance to another chunk position
    pub fn distance_squared_to(&self, other: ChunkPos) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

/// Position of a voxel in the world (world coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Get the chunk this voxel belongs to
    pub fn to_chunk_pos(&self) -> ChunkPos {
        ChunkPos::new(
            self.x.div_euclid(CHUNK_SIZE_I32),
            self.y.div_euclid(CHUNK_SIZE_I32),
            self.z.div_euclid(CHUNK_SIZE_I32),
        )
    }

    /// Get local position within chunk
    pub fn to_local_pos(&self) -> LocalPos {
        LocalPos {
            x: self.x.rem_euclid(CHUNK_SIZE_I32) as u32,
            y: self.y.rem_euclid(CHUNK_SIZE_I32) as u32,
            z: self.z.rem_euclid(CHUNK_SIZE_I32) as u32,
        }
    }

    /// Neighbouring voxel one step in `direction`
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.offset();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Create VoxelPos from a world-space point
    pub fn from_world_pos(pos: Point3<f32>) -> Self {
        Self {
            x: pos.x.floor() as i32,
            y: pos.y.floor() as i32,
            z: pos.z.floor() as i32,
        }
    }
}

/// Voxel coordinate inside a chunk, each axis in `0..CHUNK_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl LocalPos {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    pub fn is_valid(&self) -> bool {
        self.x < CHUNK_SIZE && self.y < CHUNK_SIZE && self.z < CHUNK_SIZE
    }

    /// True if the voxel touches any face of its chunk
    pub fn is_on_boundary(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .any(|&c| c == 0 || c == CHUNK_MAX_LOCAL)
    }

    /// World position of this local coordinate in `chunk`
    pub fn to_voxel_pos(&self, chunk: ChunkPos) -> VoxelPos {
        let base = chunk.min_voxel();
        VoxelPos::new(
            base.x + self.x as i32,
            base.y + self.y as i32,
            base.z + self.z as i32,
        )
    }
}

/// The six face directions of a voxel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    West,
    Up,
    Down,
    South,
    North,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
        Direction::South,
        Direction::North,
    ];

    pub const HORIZONTAL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::East => (1, 0, 0),
            Direction::West => (-1, 0, 0),
            Direction::Up => (0, 1, 0),
            Direction::Down => (0, -1, 0),
            Direction::South => (0, 0, 1),
            Direction::North => (0, 0, -1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::South => Direction::North,
            Direction::North => Direction::South,
        }
    }
}
