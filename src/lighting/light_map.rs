use crate::constants::chunk::{CHUNK_SIZE, VOXELS_PER_CHUNK};
use crate::constants::light::MAX_LIGHT_LEVEL;
use crate::lighting::LightType;
use crate::world::LocalPos;

/// Light level (0-15) with separate sky and block light components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightLevel {
    /// Skylight level (0-15)
    pub sky: u8,
    /// Block light level (0-15)
    pub block: u8,
}

impl LightLevel {
    pub fn new(sky: u8, block: u8) -> Self {
        Self {
            sky: sky.min(MAX_LIGHT_LEVEL),
            block: block.min(MAX_LIGHT_LEVEL),
        }
    }

    /// Unpack a stored byte: sky in upper 4 bits, block light in lower 4 bits
    pub fn from_packed(packed: u8) -> Self {
        Self {
            sky: (packed >> 4) & 0x0F,
            block: packed & 0x0F,
        }
    }

    pub fn to_packed(self) -> u8 {
        ((self.sky & 0x0F) << 4) | (self.block & 0x0F)
    }

    /// Combined light level for rendering
    pub fn combined(&self) -> u8 {
        self.sky.max(self.block)
    }

    pub fn get(&self, light_type: LightType) -> u8 {
        match light_type {
            LightType::Sky => self.sky,
            LightType::Block => self.block,
        }
    }

    /// Copy with one channel replaced
    pub fn with(self, light_type: LightType, level: u8) -> Self {
        let level = level.min(MAX_LIGHT_LEVEL);
        match light_type {
            LightType::Sky => Self { sky: level, ..self },
            LightType::Block => Self { block: level, ..self },
        }
    }

    /// Create a dark light level
    pub fn dark() -> Self {
        Self { sky: 0, block: 0 }
    }

    /// Create a fully lit skylight level
    pub fn full_sky() -> Self {
        Self {
            sky: MAX_LIGHT_LEVEL,
            block: 0,
        }
    }
}

/// Light storage for a chunk, one packed byte per voxel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightMap {
    data: Vec<u8>,
}

impl Default for LightMap {
    fn default() -> Self {
        Self::new()
    }
}

impl LightMap {
    pub fn new() -> Self {
        Self {
            data: vec![0; VOXELS_PER_CHUNK],
        }
    }

    fn index(pos: LocalPos) -> usize {
        (pos.y * CHUNK_SIZE * CHUNK_SIZE + pos.z * CHUNK_SIZE + pos.x) as usize
    }

    /// Raw packed byte; 0 outside the chunk
    pub fn packed(&self, pos: LocalPos) -> u8 {
        if !pos.is_valid() {
            return 0;
        }
        self.data[Self::index(pos)]
    }

    pub fn set_packed(&mut self, pos: LocalPos, packed: u8) {
        if !pos.is_valid() {
            return;
        }
        self.data[Self::index(pos)] = packed;
    }

    pub fn get(&self, pos: LocalPos) -> LightLevel {
        LightLevel::from_packed(self.packed(pos))
    }

    pub fn set(&mut self, pos: LocalPos, light: LightLevel) {
        self.set_packed(pos, light.to_packed());
    }

    /// Set one channel, leaving the other untouched
    pub fn set_channel(&mut self, pos: LocalPos, light_type: LightType, level: u8) {
        let current = self.get(pos);
        self.set(pos, current.with(light_type, level));
    }

    /// Clear all light data
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Fill with full skylight
    pub fn fill_sky(&mut self) {
        self.data.fill(LightLevel::full_sky().to_packed());
    }

    /// Memory used by the packed light data
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}
