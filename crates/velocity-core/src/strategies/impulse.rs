//! Momentum-based impulse strategy.

use crate::estimator::MotionEstimator;
use crate::history::{Movement, MovementRing};
use crate::pointer::{PointerIdSet, Position};
use crate::strategies::VelocityStrategy;

/// Number of samples to keep.
const HISTORY_SIZE: usize = 20;

/// Sample horizon. We don't use too much history by default since we want to
/// react to quick changes in direction.
const HORIZON_NS: u64 = 100_000_000;

const NANOS_PER_SECOND: f32 = 1_000_000_000.0;

/// Velocity tracker strategy that treats each consecutive sample pair as an
/// impulse proportional to its displacement and normalizes the accumulated
/// impulse by the accumulated elapsed time.
///
/// Unlike a plain average of instantaneous pair velocities, each interval is
/// weighted by its own duration, which makes the estimate robust to
/// irregular sample spacing.
#[derive(Debug, Clone)]
pub struct ImpulseStrategy {
    movements: MovementRing<HISTORY_SIZE>,
}

impl ImpulseStrategy {
    pub fn new() -> Self {
        Self {
            movements: MovementRing::new(),
        }
    }
}

impl Default for ImpulseStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityStrategy for ImpulseStrategy {
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
        if samples.len() < 2 {
            return None;
        }
        samples.reverse();

        // Accumulate displacement and elapsed time over consecutive pairs.
        // Zero or backwards dt pairs carry no usable impulse and are skipped.
        let mut accum_dx = 0.0f32;
        let mut accum_dy = 0.0f32;
        let mut accum_dt_ns = 0u64;
        for pair in samples.windows(2) {
            let (t0, p0) = pair[0];
            let (t1, p1) = pair[1];
            let Some(dt_ns) = t1.checked_sub(t0) else {
                continue;
            };
            if dt_ns == 0 {
                continue;
            }
            accum_dx += p1.x - p0.x;
            accum_dy += p1.y - p0.y;
            accum_dt_ns += dt_ns;
        }
        if accum_dt_ns == 0 {
            return None;
        }

        let accum_dt = accum_dt_ns as f32 / NANOS_PER_SECOND;
        let newest_position = newest.position(id);
        let mut estimator = MotionEstimator {
            time_ns: newest_time,
            degree: 1,
            confidence: 1.0,
            ..Default::default()
        };
        estimator.xcoeff[0] = newest_position.x;
        estimator.ycoeff[0] = newest_position.y;
        estimator.xcoeff[1] = accum_dx / accum_dt;
        estimator.ycoeff[1] = accum_dy / accum_dt;
        Some(estimator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_velocity() {
        let mut strategy = ImpulseStrategy::new();
        for step in 0..4u64 {
            strategy.add_movement(
                step * 16_000_000,
                PointerIdSet::from_ids(&[0]),
                &[Position::new(step as f32 * 16.0, 0.0)],
            );
        }

        let est = strategy.estimator(0).unwrap();
        assert_eq!(est.degree, 1);
        assert_eq!(est.confidence, 1.0);
        assert!((est.xcoeff[1] - 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_irregular_spacing_weighted_by_duration() {
        let mut strategy = ImpulseStrategy::new();
        // Same underlying 1000 units/s motion sampled unevenly.
        for (t_ms, x) in [(0u64, 0.0f32), (5, 5.0), (35, 35.0), (40, 40.0)] {
            strategy.add_movement(
                t_ms * 1_000_000,
                PointerIdSet::from_ids(&[0]),
                &[Position::new(x, 0.0)],
            );
        }

        let est = strategy.estimator(0).unwrap();
        assert!((est.xcoeff[1] - 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_single_sample_fails() {
        let mut strategy = ImpulseStrategy::new();
        strategy.add_movement(0, PointerIdSet::from_ids(&[0]), &[Position::default()]);
        assert!(strategy.estimator(0).is_none());
    }

    #[test]
    fn test_all_duplicate_timestamps_fail() {
        let mut strategy = ImpulseStrategy::new();
        strategy.add_movement(7_000_000, PointerIdSet::from_ids(&[0]), &[Position::new(1.0, 0.0)]);
        strategy.add_movement(7_000_000, PointerIdSet::from_ids(&[0]), &[Position::new(2.0, 0.0)]);
        assert!(strategy.estimator(0).is_none());
    }
}
