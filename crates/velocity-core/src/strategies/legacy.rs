//! Pairwise duration-weighted averaging strategy.
//!
//! The oldest algorithm in the set, kept for devices tuned against it. It
//! predates goodness-of-fit reporting: confidence is a coarse binary signal,
//! not a regression statistic.

use crate::estimator::MotionEstimator;
use crate::history::{Movement, MovementRing};
use crate::pointer::{PointerIdSet, Position};
use crate::strategies::VelocityStrategy;

/// Number of samples to keep.
const HISTORY_SIZE: usize = 20;

/// Oldest sample to consider when calculating the velocity.
const HORIZON_NS: u64 = 200_000_000;

/// The minimum duration between samples when estimating velocity; shorter
/// pairs would divide a noisy displacement by a near-zero dt.
const MIN_DURATION_NS: u64 = 10_000_000;

const NANOS_PER_SECOND: f32 = 1_000_000_000.0;

/// Velocity tracker strategy that averages instantaneous pairwise
/// velocities, weighting each pair by the span it covers so that older,
/// shorter pairs fade out of the estimate.
#[derive(Debug, Clone)]
pub struct LegacyStrategy {
    movements: MovementRing<HISTORY_SIZE>,
}

impl LegacyStrategy {
    pub fn new() -> Self {
        Self {
            movements: MovementRing::new(),
        }
    }
}

impl Default for LegacyStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityStrategy for LegacyStrategy {
    fn clear(&mut self) {
        self.movements.clear();
    }

    fn clear_pointers(&mut self, ids: PointerIdSet) {
        self.movements.remove_pointers(ids);
    }

    fn add_movement(&mut self, event_time_ns: u64, ids: PointerIdSet, positions: &[Position]) {
        debug_assert_eq!(positions.len(), ids.count());
        self.movements
            .push(Movement::new(event_time_ns, ids, positions));
    }

    fn estimator(&self, id: u32) -> Option<MotionEstimator> {
        let newest = self.movements.newest()?;
        if !newest.pointer_ids.contains(id) {
            return None;
        }
        let newest_time = newest.event_time_ns;

        // Contiguous in-horizon run for this pointer, newest first.
        let mut samples: Vec<(u64, Position)> = Vec::with_capacity(HISTORY_SIZE);
        for movement in self.movements.iter_newest_first() {
            if !movement.pointer_ids.contains(id) {
                break;
            }
            if newest_time.saturating_sub(movement.event_time_ns) > HORIZON_NS {
                break;
            }
            samples.push((movement.event_time_ns, movement.position(id)));
        }
        samples.reverse();

        // Walk oldest to newest, pairing each qualifying sample against the
        // previous anchor. Pairs closer together than MIN_DURATION keep the
        // anchor in place until enough time has accumulated.
        let mut accum_vx = 0.0f32;
        let mut accum_vy = 0.0f32;
        let mut last_duration = 0.0f32;
        let mut pairs_used = 0u32;
        let (mut anchor_time, mut anchor_position) = samples[0];
        for &(time, position) in &samples[1..] {
            let Some(duration_ns) = time.checked_sub(anchor_time) else {
                continue;
            };
            if duration_ns < MIN_DURATION_NS {
                continue;
            }
            let duration = duration_ns as f32 / NANOS_PER_SECOND;
            let vx = (position.x - anchor_position.x) / duration;
            let vy = (position.y - anchor_position.y) / duration;
            // Duration-weighted running average: newer, longer pairs
            // progressively displace older contributions.
            accum_vx = (accum_vx * last_duration + vx * duration) / (last_duration + duration);
            accum_vy = (accum_vy * last_duration + vy * duration) / (last_duration + duration);
            last_duration = duration;
            pairs_used += 1;
            anchor_time = time;
            anchor_position = position;
        }

        let newest_position = newest.position(id);
        let mut estimator = MotionEstimator {
            time_ns: newest_time,
            degree: 1,
            confidence: if pairs_used > 0 { 1.0 } else { 0.0 },
            ..Default::default()
        };
        estimator.xcoeff[0] = newest_position.x;
        estimator.ycoeff[0] = newest_position.y;
        estimator.xcoeff[1] = accum_vx;
        estimator.ycoeff[1] = accum_vy;
        Some(estimator)
    }
}
