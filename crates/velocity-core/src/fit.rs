//! Weighted polynomial least-squares fitting.
//!
//! Solves for the polynomial `p(t) = b0 + b1 t + ... + bn t^n` minimizing
//! `sum(w_h * (p(t_h) - v_h))^2`. The solver QR-decomposes the weighted
//! Vandermonde matrix with modified Gram–Schmidt rather than forming normal
//! equations, which would square the condition number and is exactly what
//! makes a degree-4 fit on closely spaced timestamps fall apart.
//!
//! Callers are expected to pass times in a small unit (seconds relative to
//! the newest sample), not raw nanosecond magnitudes.

use crate::estimator::MotionEstimator;

/// Columns with a norm below this are treated as linearly dependent.
const DEGENERATE_NORM: f32 = 0.000001;

/// Result of a one-axis polynomial fit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PolyFit {
    /// Coefficients, index = power of t. Entries above the fit degree are 0.
    pub coeff: [f32; MotionEstimator::MAX_DEGREE + 1],

    /// Coefficient of determination of the fit, in [0, 1].
    pub r_squared: f32,
}

/// Fit a polynomial of exactly `degree` through weighted samples.
///
/// Returns `None` when the design matrix is degenerate (for example,
/// duplicate times after rescaling); the caller retries at a lower degree.
pub(crate) fn solve_weighted_least_squares(
    times: &[f32],
    values: &[f32],
    weights: &[f32],
    degree: usize,
) -> Option<PolyFit> {
    debug_assert!(degree >= 1 && degree <= MotionEstimator::MAX_DEGREE);
    debug_assert_eq!(times.len(), values.len());
    debug_assert_eq!(times.len(), weights.len());

    let n = degree + 1;
    let m = times.len();
    if m < n {
        return None;
    }

    // Expand the time vector into a Vandermonde matrix, pre-multiplied by
    // the weights: a[row][h] = w[h] * t[h]^row.
    let mut a = vec![vec![0.0f32; m]; n];
    for h in 0..m {
        a[0][h] = weights[h];
        for row in 1..n {
            a[row][h] = a[row - 1][h] * times[h];
        }
    }

    // Modified Gram-Schmidt QR decomposition of A.
    let mut q = vec![vec![0.0f32; m]; n];
    let mut r = vec![vec![0.0f32; n]; n];
    for j in 0..n {
        q[j].copy_from_slice(&a[j]);
        for i in 0..j {
            let dot = dot(&q[j], &q[i]);
            for h in 0..m {
                q[j][h] -= dot * q[i][h];
            }
        }

        let norm = dot(&q[j], &q[j]).sqrt();
        if norm < DEGENERATE_NORM {
            // Columns are linearly dependent or zero.
            return None;
        }

        let inv_norm = 1.0 / norm;
        for h in 0..m {
            q[j][h] *= inv_norm;
        }
        for i in j..n {
            r[j][i] = dot(&q[j], &a[i]);
        }
    }

    // Solve R b = Q^T (w .* v) by back substitution.
    let weighted_values: Vec<f32> = values
        .iter()
        .zip(weights)
        .map(|(v, w)| v * w)
        .collect();

    let mut coeff = [0.0f32; MotionEstimator::MAX_DEGREE + 1];
    for i in (0..n).rev() {
        let mut b = dot(&q[i], &weighted_values);
        for j in (i + 1..n).rev() {
            b -= r[i][j] * coeff[j];
        }
        coeff[i] = b / r[i][i];
    }

    // Coefficient of determination: 1 - SSerr / SStot, both weighted.
    let mean = values.iter().sum::<f32>() / m as f32;
    let mut ss_err = 0.0f32;
    let mut ss_tot = 0.0f32;
    for h in 0..m {
        let mut fitted = 0.0f32;
        let mut term = 1.0f32;
        for c in coeff.iter().take(n) {
            fitted += term * c;
            term *= times[h];
        }
        let err = weights[h] * (values[h] - fitted);
        ss_err += err * err;
        let spread = weights[h] * (values[h] - mean);
        ss_tot += spread * spread;
    }
    let r_squared = if ss_tot > DEGENERATE_NORM {
        (1.0 - ss_err / ss_tot).clamp(0.0, 1.0)
    } else {
        // No variance to explain; the fit is exact by convention.
        1.0
    };

    Some(PolyFit { coeff, r_squared })
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
