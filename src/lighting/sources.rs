use rustc_hash::FxHashMap;

use crate::constants::light::MAX_LIGHT_LEVEL;
use crate::lighting::LightType;
use crate::world::VoxelPos;

/// Registered emitters, per channel.
///
/// Removal only acts on positions listed here, and the re-add phase re-emits
/// any source whose voxel was cleared.
#[derive(Debug, Default)]
pub struct LightSources {
    block: FxHashMap<VoxelPos, u8>,
    sky: FxHashMap<VoxelPos, u8>,
}

impl LightSources {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, light_type: LightType) -> &FxHashMap<VoxelPos, u8> {
        match light_type {
            LightType::Sky => &self.sky,
            LightType::Block => &self.block,
        }
    }

    fn map_mut(&mut self, light_type: LightType) -> &mut FxHashMap<VoxelPos, u8> {
        match light_type {
            LightType::Sky => &mut self.sky,
            LightType::Block => &mut self.block,
        }
    }

    /// Register (or re-level) a source
    pub fn insert(&mut self, pos: VoxelPos, light_type: LightType, level: u8) {
        self.map_mut(light_type)
            .insert(pos, level.min(MAX_LIGHT_LEVEL));
    }

    pub fn remove(&mut self, pos: VoxelPos, light_type: LightType) -> Option<u8> {
        self.map_mut(light_type).remove(&pos)
    }

    /// Emission of the source at `pos`, if one is registered
    pub fn level(&self, pos: VoxelPos, light_type: LightType) -> Option<u8> {
        self.map(light_type).get(&pos).copied()
    }

    pub fn contains(&self, pos: VoxelPos) -> bool {
        self.block.contains_key(&pos) || self.sky.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.block.len() + self.sky.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_empty() && self.sky.is_empty()
    }
}
