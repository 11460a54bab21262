//! Fixed-capacity movement history shared by the ring-based strategies.

use crate::pointer::{PointerIdSet, Position, MAX_POINTER_ID};

/// One retained sample: a timestamp, the pointer ids present, and a position
/// slot per id.
///
/// Positions are stored in per-id slots (rather than packed by set index) so
/// that removing a pointer from the set never shifts another pointer's data.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Movement {
    pub event_time_ns: u64,
    pub pointer_ids: PointerIdSet,
    positions: [Position; MAX_POINTER_ID as usize + 1],
}

impl Movement {
    /// Scatter an ascending-id positions slice into per-id slots.
    pub fn new(event_time_ns: u64, pointer_ids: PointerIdSet, positions: &[Position]) -> Self {
        debug_assert_eq!(positions.len(), pointer_ids.count());
        let mut slots = [Position::default(); MAX_POINTER_ID as usize + 1];
        for (index, id) in pointer_ids.iter().enumerate() {
            slots[id as usize] = positions[index];
        }
        Self {
            event_time_ns,
            pointer_ids,
            positions: slots,
        }
    }

    /// Position of `id` in this movement. Only meaningful when
    /// `pointer_ids.contains(id)`.
    pub fn position(&self, id: u32) -> Position {
        debug_assert!(self.pointer_ids.contains(id));
        self.positions[id as usize]
    }
}

/// A ring buffer of the last `N` movements.
///
/// Pushing past capacity evicts the oldest entry; iteration runs newest
/// first, which is the order every strategy scans history in.
#[derive(Debug, Clone)]
pub(crate) struct MovementRing<const N: usize> {
    movements: [Movement; N],
    /// Index of the newest entry, meaningful only when `len > 0`.
    head: usize,
    len: usize,
}

impl<const N: usize> MovementRing<N> {
    pub fn new() -> Self {
        Self {
            movements: [Movement::default(); N],
            head: 0,
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn push(&mut self, movement: Movement) {
        if self.len == 0 {
            self.head = 0;
            self.len = 1;
        } else {
            self.head = (self.head + 1) % N;
            self.len = (self.len + 1).min(N);
        }
        self.movements[self.head] = movement;
    }

    /// The most recently pushed movement.
    pub fn newest(&self) -> Option<&Movement> {
        (self.len > 0).then(|| &self.movements[self.head])
    }

    /// Iterate retained movements from newest to oldest.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &Movement> {
        (0..self.len).map(move |age| &self.movements[(self.head + N - age) % N])
    }

    /// Strip the given ids from every retained movement so a cleared (or
    /// reused) pointer id can never contribute stale positions to a fit.
    pub fn remove_pointers(&mut self, ids: PointerIdSet) {
        for age in 0..self.len {
            let slot = (self.head + N - age) % N;
            let movement = &mut self.movements[slot];
            movement.pointer_ids = movement.pointer_ids.without(ids);
        }
    }
}
