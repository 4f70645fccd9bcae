use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockId(pub u16);

impl Default for BlockId {
    fn default() -> Self {
        BlockId::AIR
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BlockId::AIR => write!(f, "Air"),
            BlockId::GRASS => write!(f, "Grass"),
            BlockId::DIRT => write!(f, "Dirt"),
            BlockId::STONE => write!(f, "Stone"),
            BlockId::WATER => write!(f, "Water"),
            BlockId::LEAVES => write!(f, "Leaves"),
            BlockId::GLASS => write!(f, "Glass"),
            BlockId::TORCH => write!(f, "Torch"),
            BlockId::LAVA => write!(f, "Lava"),
            BlockId::GLOWSTONE => write!(f, "Glowstone"),
            _ => write!(f, "Block({})", self.0),
        }
    }
}

impl BlockId {
    pub const AIR: BlockId = BlockId(0);
    pub const GRASS: BlockId = BlockId(1);
    pub const DIRT: BlockId = BlockId(2);
    pub const STONE: BlockId = BlockId(3);
    pub const WATER: BlockId = BlockId(6);
    pub const LEAVES: BlockId = BlockId(7);
    pub const GLASS: BlockId = BlockId(8);
    pub const TORCH: BlockId = BlockId(19);
    pub const LAVA: BlockId = BlockId(21);
    pub const GLOWSTONE: BlockId = BlockId(40);

    /// Whether light passes through this block
    pub fn is_transparent(self) -> bool {
        matches!(
            self,
            BlockId::AIR | BlockId::WATER | BlockId::LEAVES | BlockId::GLASS | BlockId::TORCH
        )
    }

    /// Block light emitted by this block (0 for non-emitters)
    pub fn light_emission(self) -> u8 {
        match self {
            BlockId::TORCH => 14,
            BlockId::LAVA | BlockId::GLOWSTONE => 15,
            _ => 0,
        }
    }
}
