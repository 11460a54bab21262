//! The velocity tracker coordinator.

use crate::config::TrackerConfig;
use crate::estimator::{MotionEstimator, Velocity};
use crate::event::PointerEvent;
use crate::pointer::{PointerIdSet, Position};
use crate::strategies::{create_strategy, StrategyKind, VelocityStrategy};

/// Calculates the velocity of pointer movements over time.
///
/// Owns one estimation strategy (fixed at construction) plus the bookkeeping
/// that is independent of the algorithm: the set of pointers present in the
/// most recent movement, the active pointer, and the last event time.
///
/// A tracker conventionally lives for one contiguous gesture: construct it
/// when the first contact goes down, feed every movement, query on lift.
/// [`VelocityTracker::clear`] reuses the instance for the next gesture.
pub struct VelocityTracker {
    strategy: Box<dyn VelocityStrategy>,
    last_event_time_ns: u64,
    current_pointer_ids: PointerIdSet,
    active_pointer_id: Option<u32>,
    assume_stopped_ns: u64,
}

impl VelocityTracker {
    /// Create a tracker using the specified strategy, resolving
    /// [`StrategyKind::Default`] through [`TrackerConfig::default`].
    pub fn new(kind: StrategyKind) -> Self {
        Self::with_config(kind, &TrackerConfig::default())
    }

    /// Create a tracker with an explicit configuration.
    ///
    /// An unsupported selector is replaced by the configured default with a
    /// warning; the returned tracker is always usable.
    pub fn with_config(kind: StrategyKind, config: &TrackerConfig) -> Self {
        Self {
            strategy: create_strategy(kind, config),
            last_event_time_ns: 0,
            current_pointer_ids: PointerIdSet::EMPTY,
            active_pointer_id: None,
            assume_stopped_ns: config.assume_stopped_ns,
        }
    }

    /// Reset all per-pointer state without changing the strategy choice.
    pub fn clear(&mut self) {
        self.last_event_time_ns = 0;
        self.current_pointer_ids = PointerIdSet::EMPTY;
        self.active_pointer_id = None;
        self.strategy.clear();
    }

    /// Reset state for specific pointers only.
    ///
    /// Call this when pointer ids are about to be reused for physically
    /// different contacts, so the old trajectory cannot corrupt the new
    /// one's model. Pointers outside `ids` are unaffected.
    pub fn clear_pointers(&mut self, ids: PointerIdSet) {
        let remaining = self.current_pointer_ids.without(ids);
        self.current_pointer_ids = remaining;
        if let Some(active) = self.active_pointer_id {
            if ids.contains(active) {
                self.active_pointer_id = remaining.first();
            }
        }
        self.strategy.clear_pointers(ids);
    }

    /// Add movement information for a set of pointers.
    ///
    /// `positions` holds one entry per id in `ids`, ordered by ascending id.
    /// A length mismatch is a caller bug and panics.
    pub fn add_movement(
        &mut self,
        event_time_ns: u64,
        ids: PointerIdSet,
        positions: &[Position],
    ) {
        assert_eq!(
            positions.len(),
            ids.count(),
            "positions must align 1:1 with pointer ids"
        );

        if self.current_pointer_ids.intersects(ids)
            && event_time_ns >= self.last_event_time_ns + self.assume_stopped_ns
        {
            // We have not received any movements for too long. Assume that
            // all pointers have stopped.
            tracing::trace!(
                gap_ns = event_time_ns - self.last_event_time_ns,
                "movement gap exceeded, resetting strategy state"
            );
            self.strategy.clear();
        }
        self.last_event_time_ns = event_time_ns;

        self.current_pointer_ids = ids;
        match self.active_pointer_id {
            Some(active) if ids.contains(active) => {}
            _ => self.active_pointer_id = ids.first(),
        }

        self.strategy.add_movement(event_time_ns, ids, positions);
    }

    /// Add movement information from an event, replaying any batched
    /// historical sub-samples oldest first and then the event's own sample.
    ///
    /// Equivalent to calling [`VelocityTracker::add_movement`] for each
    /// sample by hand.
    pub fn add_event(&mut self, event: &PointerEvent) {
        for sample in event.samples() {
            self.add_movement(sample.event_time_ns, sample.pointer_ids, &sample.positions);
        }
    }

    /// The velocity of the specified pointer in position units per second,
    /// or `None` if there is insufficient movement information.
    pub fn velocity(&self, id: u32) -> Option<Velocity> {
        self.estimator(id).and_then(|est| est.velocity())
    }

    /// An estimator describing the recent movements of the specified
    /// pointer, or `None` if no information is available about it.
    pub fn estimator(&self, id: u32) -> Option<MotionEstimator> {
        self.strategy.estimator(id)
    }

    /// The active pointer id: the most recently introduced pointer still
    /// present in the current movement, or `None` between gestures.
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.active_pointer_id
    }

    /// The pointer ids present in the most recent movement.
    pub fn current_pointer_ids(&self) -> PointerIdSet {
        self.current_pointer_ids
    }

    /// The timestamp of the most recent movement, or 0 before the first one.
    pub fn last_event_time_ns(&self) -> u64 {
        self.last_event_time_ns
    }
}
