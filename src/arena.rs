//! Generational arena backing particle, force and link storage.
//!
//! Handles carry the generation of the slot they were issued for. Removing an
//! entry bumps the slot generation, so a handle kept past removal no longer
//! resolves instead of aliasing whatever reuses the slot.

use alloc::vec::Vec as AllocVec;

/// Raw arena index: slot plus generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Index {
    pub index: u32,
    pub generation: u32,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage with free-list reuse.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    slots: AllocVec<Slot<T>>,
    free: AllocVec<u32>,
    len: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena { slots: AllocVec::new(), free: AllocVec::new(), len: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Arena { slots: AllocVec::with_capacity(capacity), free: AllocVec::new(), len: 0 }
    }

    pub fn insert(&mut self, value: T) -> Index {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return Index { index, generation: slot.generation };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, value: Some(value) });
        Index { index, generation: 0 }
    }

    pub fn remove(&mut self, idx: Index) -> Option<T> {
        let slot = self.slots.get_mut(idx.index as usize)?;
        if slot.generation != idx.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(idx.index);
        self.len -= 1;
        Some(value)
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.get(idx).is_some()
    }

    pub fn get(&self, idx: Index) -> Option<&T> {
        self.slots
            .get(idx.index as usize)
            .filter(|slot| slot.generation == idx.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut T> {
        self.slots
            .get_mut(idx.index as usize)
            .filter(|slot| slot.generation == idx.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value
                .as_ref()
                .map(|v| (Index { index: i as u32, generation: slot.generation }, v))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Index, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(move |v| (Index { index: i as u32, generation }, v))
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every entry, invalidating all outstanding handles.
    pub fn clear(&mut self) {
        self.free.clear();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(i as u32);
        }
        self.free.reverse();
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_handle_goes_stale() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        assert_eq!(arena.remove(a), Some(1));
        let b = arena.insert(2);
        assert_eq!(a.index, b.index);
        assert_ne!(a.generation, b.generation);
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b), Some(&2));
        assert_eq!(arena.remove(a), None);
    }

    #[test]
    fn clear_invalidates_everything() {
        let mut arena = Arena::new();
        let a = arena.insert('a');
        let b = arena.insert('b');
        arena.clear();
        assert!(arena.is_empty());
        assert!(!arena.contains(a));
        assert!(!arena.contains(b));
        let c = arena.insert('c');
        assert_eq!(c.index, 0);
        assert_eq!(arena.len(), 1);
    }
}
