//! Pointer identity and position primitives.

use serde::{Deserialize, Serialize};

/// Highest pointer id a tracker can follow.
pub const MAX_POINTER_ID: u32 = 31;

/// A pointer position in whatever units the input source reports
/// (device-independent pixels, raw sensor units — the tracker is
/// unit-agnostic).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A set of pointer ids in `0..=31`, stored as a bitmask with id = bit index.
///
/// Iteration and the position arrays that accompany a sample are always
/// ordered by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerIdSet {
    bits: u32,
}

impl PointerIdSet {
    /// The empty set.
    pub const EMPTY: Self = Self { bits: 0 };

    /// Build a set from a raw bitmask.
    pub fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Build a set from a list of ids.
    ///
    /// Panics if any id exceeds [`MAX_POINTER_ID`] — an out-of-range id is a
    /// caller bug, not a data condition.
    pub fn from_ids(ids: &[u32]) -> Self {
        let mut set = Self::EMPTY;
        for &id in ids {
            set.insert(id);
        }
        set
    }

    /// Raw bitmask.
    pub fn bits(self) -> u32 {
        self.bits
    }

    /// Add an id to the set. Panics if `id > MAX_POINTER_ID`.
    pub fn insert(&mut self, id: u32) {
        assert!(id <= MAX_POINTER_ID, "pointer id {id} out of range");
        self.bits |= 1 << id;
    }

    /// Remove an id from the set.
    pub fn remove(&mut self, id: u32) {
        if id <= MAX_POINTER_ID {
            self.bits &= !(1 << id);
        }
    }

    /// Whether the set contains `id`.
    pub fn contains(self, id: u32) -> bool {
        id <= MAX_POINTER_ID && self.bits & (1 << id) != 0
    }

    /// Number of ids in the set.
    pub fn count(self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Lowest id in the set, if any.
    pub fn first(self) -> Option<u32> {
        if self.bits == 0 {
            None
        } else {
            Some(self.bits.trailing_zeros())
        }
    }

    /// Number of set ids strictly below `id`; the index of `id`'s position
    /// in an ascending-ordered positions array.
    pub fn index_of(self, id: u32) -> usize {
        debug_assert!(self.contains(id));
        (self.bits & ((1u32 << id) - 1)).count_ones() as usize
    }

    /// The ids of `self` that are not in `other`.
    pub fn without(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    /// Whether the two sets share any id.
    pub fn intersects(self, other: Self) -> bool {
        self.bits & other.bits != 0
    }

    /// Iterate ids in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u32> {
        (0..=MAX_POINTER_ID).filter(move |&id| self.contains(id))
    }
}

impl FromIterator<u32> for PointerIdSet {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for id in iter {
            set.insert(id);
        }
        set
    }
}
