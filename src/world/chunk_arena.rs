/// Generation-checked chunk storage.
///
/// Slots are recycled through a free list; every time a slot is freed its
/// generation is bumped so handles to the old chunk stop resolving.

use crate::world::ChunkHandle;

struct Slot<T> {
    /// Current generation of this slot
    generation: u32,
    value: Option<T>,
}

pub struct ChunkArena<T> {
    slots: Vec<Slot<T>>,
    /// Free list for recycling slots
    free_list: Vec<u32>,
    count: usize,
}

impl<T> Default for ChunkArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChunkArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            count: 0,
        }
    }

    /// Store a value and return its handle
    pub fn insert(&mut self, value: T) -> ChunkHandle {
        self.count += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return ChunkHandle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        ChunkHandle::new(index, 0)
    }

    /// Remove a value (returns it if the handle was live)
    pub fn remove(&mut self, handle: ChunkHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.idx())?;
        if slot.generation != handle.generation {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.count -= 1;
        Some(value)
    }

    /// Check if a handle still refers to a live value
    pub fn contains(&self, handle: ChunkHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: ChunkHandle) -> Option<&T> {
        let slot = self.slots.get(handle.idx())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: ChunkHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.idx())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate live values with their handles
    pub fn iter(&self) -> impl Iterator<Item = (ChunkHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (ChunkHandle::new(index as u32, slot.generation), value))
        })
    }
}
