// Voxel Lighting Constants - SINGLE SOURCE OF TRUTH
//
// Every size, light level and per-frame quota used by the lighting engine
// lives here. Do not redefine these values in other modules.

/// Chunk geometry
pub mod chunk {
    /// Chunks are 32×32×32 voxels
    pub const CHUNK_SIZE: u32 = 32;
    pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;
    pub const CHUNK_SIZE_F32: f32 = CHUNK_SIZE as f32;
    pub const VOXELS_PER_CHUNK: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

    /// Highest local coordinate on any axis
    pub const CHUNK_MAX_LOCAL: u32 = CHUNK_SIZE - 1;
}

/// Light level constants
pub mod light {
    /// Maximum light level (full brightness)
    pub const MAX_LIGHT_LEVEL: u8 = 15;

    /// Light falloff per block
    pub const LIGHT_FALLOFF: u8 = 1;

    /// Night-time skylight used for the brightness band
    pub const NIGHT_SKY_LEVEL: u8 = 4;
}

/// Per-frame work quotas
pub mod budget {
    /// Addition nodes processed per `update()`
    pub const MAX_LIGHT_ADDS_PER_FRAME: usize = 500;

    /// Removal work units (clear + re-examine) processed per `update()`
    pub const MAX_LIGHT_REMOVES_PER_FRAME: usize = 300;

    /// Chunk meshes rebuilt per `update()`
    pub const MAX_MESH_REGENERATIONS_PER_FRAME: usize = 10;

    /// Quota used by the blocking regeneration path during world load
    pub const UNBOUNDED: usize = usize::MAX;
}

/// Day/night defaults
pub mod time {
    /// Length of a full day in seconds (20 minute days)
    pub const DEFAULT_DAY_LENGTH_SECONDS: f32 = 20.0 * 60.0;

    /// Hour the cycle starts at
    pub const DEFAULT_START_HOUR: f32 = 12.0;

    pub const SUNRISE_HOUR: f32 = 6.0;
    pub const SUNSET_HOUR: f32 = 18.0;

    /// Width of the dusk/dawn band around sunrise and sunset, in hours
    pub const TWILIGHT_HOURS: f32 = 1.0;
}
