//! Weighted least-squares polynomial regression strategy.

use crate::estimator::MotionEstimator;
use crate::fit::solve_weighted_least_squares;
use crate::history::{Movement, MovementRing};
use crate::pointer::{PointerIdSet, Position};
use crate::strategies::{VelocityStrategy, Weighting};

/// Number of samples to keep.
const HISTORY_SIZE: usize = 20;

/// Sample horizon. We don't use too much history by default since we want to
/// react to quick changes in direction.
const HORIZON_NS: u64 = 100_000_000;

const NANOS_PER_SECOND: f32 = 1_000_000_000.0;
const NANOS_PER_MS: f32 = 1_000_000.0;

/// Velocity tracker strategy based on weighted least-squares polynomial
/// regression of position against time, fit independently per axis.
///
/// Raw timestamps can be nanosecond-scale; elapsed times are rescaled to
/// seconds relative to the newest retained sample before the fit so the
/// higher-degree time powers stay well conditioned.
#[derive(Debug, Clone)]
pub struct LeastSquaresStrategy {
    degree: u32,
    weighting: Weighting,
    movements: MovementRing<HISTORY_SIZE>,
}

impl LeastSquaresStrategy {
    /// Create a strategy fitting polynomials of the given degree.
    ///
    /// Returns `None` unless `degree` is in `1..=4`.
    pub fn new(degree: u32, weighting: Weighting) -> Option<Self> {
        if degree < 1 || degree as usize > MotionEstimator::MAX_DEGREE {
            return None;
        }
        Some(Self {
            degree,
            weighting,
            movements: MovementRing::new(),
        })
    }

    /// Per-sample weights for the gathered history, index 0 = newest.
    ///
    /// Ages are in milliseconds relative to the newest sample. The curves
    /// are piecewise linear with the knees chosen so that a typical 60-120 Hz
    /// sample stream lands on the flat, full-weight portions.
    fn choose_weights(&self, ages_ms: &[f32]) -> Vec<f32> {
        match self.weighting {
            Weighting::None => vec![1.0; ages_ms.len()],
            Weighting::Delta => ages_ms
                .iter()
                .enumerate()
                .map(|(index, &age)| {
                    if index == 0 {
                        return 1.0;
                    }
                    // Gap to the adjacent newer sample:
                    //   0ms -> 0.5, 10ms -> 1.0
                    let gap = age - ages_ms[index - 1];
                    if gap < 0.0 {
                        0.5
                    } else if gap < 10.0 {
                        0.5 + gap * 0.05
                    } else {
                        1.0
                    }
                })
                .collect(),
            Weighting::Central => ages_ms
                .iter()
                .map(|&age| {
                    // 0ms -> 0.5, 10ms..50ms -> 1.0, 60ms -> 0.5
                    if age < 0.0 {
                        0.5
                    } else if age < 10.0 {
                        0.5 + age * 0.05
                    } else if age < 50.0 {
                        1.0
                    } else if age < 60.0 {
                        0.5 + (60.0 - age) * 0.05
                    } else {
                        0.5
                    }
                })
                .collect(),
            Weighting::Recent => ages_ms
                .iter()
                .map(|&age| {
                    // 0ms..50ms -> 1.0, 100ms -> 0.5
                    if age < 50.0 {
                        1.0
                    } else if age < 100.0 {
                        0.5 + (100.0 - age) * 0.01
                    } else {
                        0.5
                    }
                })
                .collect(),
        }
    }
}

impl Default for LeastSquaresStrategy {
    /// The platform-default configuration: degree 2, unweighted.
    fn default() -> Self {
        Self {
            degree: 2,
            weighting: Weighting::None,
            movements: MovementRing::new(),
        }
    }
}

impl VelocityStrategy for LeastSquaresStrategy {
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

        // Gather the contiguous run of samples containing this pointer,
        // newest first, stopping at the horizon.
        let mut times = Vec::with_capacity(HISTORY_SIZE);
        let mut ages_ms = Vec::with_capacity(HISTORY_SIZE);
        let mut xs = Vec::with_capacity(HISTORY_SIZE);
        let mut ys = Vec::with_capacity(HISTORY_SIZE);
        for movement in self.movements.iter_newest_first() {
            if !movement.pointer_ids.contains(id) {
                break;
            }
            let age_ns = newest_time.saturating_sub(movement.event_time_ns);
            if age_ns > HORIZON_NS {
                break;
            }
            let position = movement.position(id);
            times.push(-(age_ns as f32) / NANOS_PER_SECOND);
            ages_ms.push(age_ns as f32 / NANOS_PER_MS);
            xs.push(position.x);
            ys.push(position.y);
        }

        let count = times.len() as u32;
        if count == 0 {
            return None;
        }

        let weights = self.choose_weights(&ages_ms);
        let mut estimator = MotionEstimator {
            time_ns: newest_time,
            ..Default::default()
        };

        let mut degree = self
            .degree
            .min(count - 1)
            .min(MotionEstimator::MAX_DEGREE as u32);
        while degree >= 1 {
            let xfit = solve_weighted_least_squares(&times, &xs, &weights, degree as usize);
            let yfit = solve_weighted_least_squares(&times, &ys, &weights, degree as usize);
            if let (Some(xfit), Some(yfit)) = (xfit, yfit) {
                estimator.degree = degree;
                estimator.xcoeff = xfit.coeff;
                estimator.ycoeff = yfit.coeff;
                estimator.confidence = xfit.r_squared * yfit.r_squared;
                return Some(estimator);
            }
            // Degenerate design matrix (for example, duplicate timestamps):
            // retry with a simpler motion model instead of failing.
            degree -= 1;
        }

        // Degree 0: no motion model is tested, so confidence stays 0.
        let position = newest.position(id);
        estimator.xcoeff[0] = position.x;
        estimator.ycoeff[0] = position.y;
        Some(estimator)
    }
}
