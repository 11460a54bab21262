//! Kinematic IIR state estimation strategy.

use crate::estimator::MotionEstimator;
use crate::pointer::{PointerIdSet, Position, MAX_POINTER_ID};
use crate::strategies::VelocityStrategy;

/// IIR low-pass time constant for blending instantaneous velocity (and
/// acceleration) into the running state.
const FILTER_TIME_CONSTANT_SECS: f32 = 0.010;

const NANOS_PER_SECOND: f32 = 1_000_000_000.0;

/// Kinematic state for one pointer.
#[derive(Debug, Clone, Copy)]
struct KinematicState {
    update_time_ns: u64,
    /// How much of the model has been observed so far: 0 after the first
    /// sample (position only), then 1, then 2.
    degree: u32,

    xpos: f32,
    xvel: f32,
    xaccel: f32,
    ypos: f32,
    yvel: f32,
    yaccel: f32,
}

impl KinematicState {
    fn init(event_time_ns: u64, position: Position) -> Self {
        Self {
            update_time_ns: event_time_ns,
            degree: 0,
            xpos: position.x,
            xvel: 0.0,
            xaccel: 0.0,
            ypos: position.y,
            yvel: 0.0,
            yaccel: 0.0,
        }
    }
}

/// Velocity tracker strategy that integrates each pointer's samples into a
/// single kinematic state through an IIR filter, instead of retaining a
/// sample history.
///
/// Degree 1 tracks velocity only; degree 2 additionally tracks acceleration.
/// Blending smooths sample-to-sample jitter while remaining responsive to
/// genuine direction changes: the blend factor grows with the time gap, so a
/// stale state defers to fresh data.
#[derive(Debug, Clone)]
pub struct IntegratingStrategy {
    degree: u32,
    states: [Option<KinematicState>; MAX_POINTER_ID as usize + 1],
}

impl IntegratingStrategy {
    /// Create a strategy of the given degree. Returns `None` unless
    /// `degree` is 1 or 2.
    pub fn new(degree: u32) -> Option<Self> {
        if degree != 1 && degree != 2 {
            return None;
        }
        Some(Self {
            degree,
            states: [None; MAX_POINTER_ID as usize + 1],
        })
    }

    fn update_state(&self, state: &mut KinematicState, event_time_ns: u64, position: Position) {
        let dt = (event_time_ns - state.update_time_ns) as f32 / NANOS_PER_SECOND;
        state.update_time_ns = event_time_ns;

        let xvel = (position.x - state.xpos) / dt;
        let yvel = (position.y - state.ypos) / dt;
        if state.degree == 0 {
            state.xvel = xvel;
            state.yvel = yvel;
            state.degree = 1;
        } else {
            let alpha = dt / (FILTER_TIME_CONSTANT_SECS + dt);
            if self.degree == 1 {
                state.xvel += (xvel - state.xvel) * alpha;
                state.yvel += (yvel - state.yvel) * alpha;
            } else {
                let xaccel = (xvel - state.xvel) / dt;
                let yaccel = (yvel - state.yvel) / dt;
                if state.degree == 1 {
                    state.xaccel = xaccel;
                    state.yaccel = yaccel;
                    state.degree = 2;
                } else {
                    state.xaccel += (xaccel - state.xaccel) * alpha;
                    state.yaccel += (yaccel - state.yaccel) * alpha;
                }
                state.xvel += state.xaccel * dt * alpha;
                state.yvel += state.yaccel * dt * alpha;
            }
        }
        state.xpos = position.x;
        state.ypos = position.y;
    }
}

impl VelocityStrategy for IntegratingStrategy {
    fn clear(&mut self) {
        self.states = [None; MAX_POINTER_ID as usize + 1];
    }

    fn clear_pointers(&mut self, ids: PointerIdSet) {
        for id in ids.iter() {
            self.states[id as usize] = None;
        }
    }

    fn add_movement(&mut self, event_time_ns: u64, ids: PointerIdSet, positions: &[Position]) {
        debug_assert_eq!(positions.len(), ids.count());
        for (index, id) in ids.iter().enumerate() {
            let position = positions[index];
            match self.states[id as usize] {
                // A non-monotonic or duplicate timestamp restarts this
                // pointer's state rather than dividing by a bogus dt.
                Some(mut state) if event_time_ns > state.update_time_ns => {
                    self.update_state(&mut state, event_time_ns, position);
                    self.states[id as usize] = Some(state);
                }
                _ => {
                    self.states[id as usize] = Some(KinematicState::init(event_time_ns, position));
                }
            }
        }
    }

    fn estimator(&self, id: u32) -> Option<MotionEstimator> {
        if id > MAX_POINTER_ID {
            return None;
        }
        let state = self.states[id as usize]?;

        let mut estimator = MotionEstimator {
            time_ns: state.update_time_ns,
            degree: self.degree,
            confidence: 1.0,
            ..Default::default()
        };
        estimator.xcoeff[0] = state.xpos;
        estimator.ycoeff[0] = state.ypos;
        estimator.xcoeff[1] = state.xvel;
        estimator.ycoeff[1] = state.yvel;
        if self.degree == 2 {
            estimator.xcoeff[2] = state.xaccel / 2.0;
            estimator.ycoeff[2] = state.yaccel / 2.0;
        }
        Some(estimator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_velocity_settles() {
        for degree in [1, 2] {
            let mut strategy = IntegratingStrategy::new(degree).unwrap();
            for step in 0..6u64 {
                strategy.add_movement(
                    step * 16_000_000,
                    PointerIdSet::from_ids(&[0]),
                    &[Position::new(step as f32 * 16.0, 0.0)],
                );
            }

            let est = strategy.estimator(0).unwrap();
            assert_eq!(est.degree, degree);
            assert_eq!(est.confidence, 1.0);
            assert!(
                (est.xcoeff[1] - 1000.0).abs() < 10.0,
                "degree {degree}: vx = {}",
                est.xcoeff[1]
            );
        }
    }

    #[test]
    fn test_first_sample_reports_zero_velocity() {
        let mut strategy = IntegratingStrategy::new(1).unwrap();
        strategy.add_movement(0, PointerIdSet::from_ids(&[9]), &[Position::new(3.0, 4.0)]);

        let est = strategy.estimator(9).unwrap();
        assert_eq!(est.degree, 1);
        assert_eq!(est.xcoeff[0], 3.0);
        assert_eq!(est.xcoeff[1], 0.0);
    }

    #[test]
    fn test_backwards_timestamp_reinitializes() {
        let mut strategy = IntegratingStrategy::new(1).unwrap();
        strategy.add_movement(10_000_000, PointerIdSet::from_ids(&[0]), &[Position::new(0.0, 0.0)]);
        strategy.add_movement(26_000_000, PointerIdSet::from_ids(&[0]), &[Position::new(16.0, 0.0)]);

        // Timestamp goes backwards: the state restarts from this sample.
        strategy.add_movement(5_000_000, PointerIdSet::from_ids(&[0]), &[Position::new(100.0, 0.0)]);

        let est = strategy.estimator(0).unwrap();
        assert_eq!(est.xcoeff[0], 100.0);
        assert_eq!(est.xcoeff[1], 0.0);
    }

    #[test]
    fn test_clear_pointers_is_selective() {
        let mut strategy = IntegratingStrategy::new(1).unwrap();
        let ids = PointerIdSet::from_ids(&[1, 2]);
        strategy.add_movement(0, ids, &[Position::new(0.0, 0.0), Position::new(0.0, 0.0)]);
        strategy.add_movement(
            16_000_000,
            ids,
            &[Position::new(16.0, 0.0), Position::new(-16.0, 0.0)],
        );

        strategy.clear_pointers(PointerIdSet::from_ids(&[1]));
        assert!(strategy.estimator(1).is_none());

        let est = strategy.estimator(2).unwrap();
        assert!((est.xcoeff[1] + 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_rejects_invalid_degree() {
        assert!(IntegratingStrategy::new(0).is_none());
        assert!(IntegratingStrategy::new(3).is_none());
    }
}
