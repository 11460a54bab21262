//! The queryable output of a velocity strategy: a fitted motion model.

use serde::{Deserialize, Serialize};

use crate::pointer::Position;

/// A pointer velocity in position units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// A snapshot of a pointer's fitted motion model.
///
/// Motion in each axis is a polynomial in time measured in **seconds**
/// relative to [`MotionEstimator::time_ns`]: coefficient `k` multiplies
/// `t^k`, so coefficient 0 is the position at the time base and coefficient 1
/// is the velocity in position units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionEstimator {
    /// Time base in nanoseconds (typically the newest sample's timestamp).
    pub time_ns: u64,

    /// Polynomial coefficients describing motion in x.
    pub xcoeff: [f32; MotionEstimator::MAX_DEGREE + 1],

    /// Polynomial coefficients describing motion in y.
    pub ycoeff: [f32; MotionEstimator::MAX_DEGREE + 1],

    /// Polynomial degree, or zero if no motion model is available.
    pub degree: u32,

    /// Coefficient of determination, between 0 (no fit) and 1 (perfect fit).
    /// Only the regression strategies compute a real value; the others report
    /// 0 or 1 by convention.
    pub confidence: f32,
}

impl Default for MotionEstimator {
    fn default() -> Self {
        Self {
            time_ns: 0,
            xcoeff: [0.0; Self::MAX_DEGREE + 1],
            ycoeff: [0.0; Self::MAX_DEGREE + 1],
            degree: 0,
            confidence: 0.0,
        }
    }
}

impl MotionEstimator {
    /// Highest polynomial degree any strategy produces.
    pub const MAX_DEGREE: usize = 4;

    /// Reset to the no-data state: degree 0, zero confidence, all
    /// coefficients zero.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The first-order coefficients, if the model carries a velocity term.
    pub fn velocity(&self) -> Option<Velocity> {
        if self.degree >= 1 {
            Some(Velocity {
                x: self.xcoeff[1],
                y: self.ycoeff[1],
            })
        } else {
            None
        }
    }

    /// Evaluate the motion model `dt_secs` seconds after the time base.
    pub fn estimate_at(&self, dt_secs: f32) -> Position {
        let order = self.degree as usize;
        let mut x = 0.0;
        let mut y = 0.0;
        for k in (0..=order).rev() {
            x = x * dt_secs + self.xcoeff[k];
            y = y * dt_secs + self.ycoeff[k];
        }
        Position::new(x, y)
    }
}
