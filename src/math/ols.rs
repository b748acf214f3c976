//! Minimum-norm least squares solver.
//!
//! In this project we repeatedly solve small linear regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! where `x_i` is an indicator row (one `1` per attribute, no intercept).
//!
//! Implementation choices:
//! - Indicator designs with every level of every attribute are rank-deficient
//!   by construction (each attribute's columns sum to the all-ones vector), and
//!   sparse partitions can have fewer rows than columns. We therefore solve via
//!   SVD with a relative singular-value cutoff, which yields the minimum-norm
//!   solution in both cases instead of failing.
//! - Parameter dimension is small (tens of columns), so SVD cost is negligible.

use nalgebra::{DMatrix, DVector};

/// Singular values below `RCOND * σ_max` are treated as zero.
const RCOND: f64 = 1e-10;

/// Result of a least-squares solve.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub beta: DVector<f64>,
    /// Numerical rank of the design matrix.
    pub rank: usize,
}

/// Solve a least squares problem using SVD, returning the minimum-norm solution.
///
/// Returns `None` if the decomposition fails or the solution is not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<LeastSquares> {
    if x.nrows() == 0 || x.ncols() == 0 || x.nrows() != y.len() {
        return None;
    }

    let svd = x.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    if !sigma_max.is_finite() || sigma_max <= 0.0 {
        return None;
    }

    let tol = sigma_max * RCOND;
    let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
    let beta = svd.solve(y, tol).ok()?;

    if beta.iter().all(|v| v.is_finite()) {
        Some(LeastSquares { beta, rank })
    } else {
        None
    }
}
