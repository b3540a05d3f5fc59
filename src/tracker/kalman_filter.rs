//! Reduced-form linear Kalman filter for smoothing detection coordinates or
//! class probabilities.

use ndarray::{Array1, Array2};

/// Linear Kalman filter over a state vector of length `2k`: `k` tracked
/// quantities followed by their `k` derivatives.
///
/// The same type smooths box centroids (`k = 2`, constant-velocity motion)
/// and per-class probabilities (`k = 1`, zero process variance, which makes
/// the estimate a pure exponential-moving average).
///
/// The update is deliberately reduced-form: only the top-left `k x k` block
/// of the covariance is corrected from the measurement, so derivative terms
/// are never corrected directly. This matches the smoothing behaviour the
/// tracker is tuned for and must not be replaced by a full-state update.
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    /// State estimate, e.g. `[x, y, vx, vy]`.
    x: Array1<f32>,
    /// Number of directly measured quantities (half the state length).
    dim: usize,
    /// Uncertainty covariance.
    p: Array2<f32>,
    /// Process noise covariance.
    q: Array2<f32>,
    /// Measurement noise covariance, sized to the measured block only.
    r: Array2<f32>,
}

impl KalmanFilter {
    /// Create a filter seeded at `initial_state` (length `2k`).
    ///
    /// The initial uncertainty is large (`P = 100 I`) so the first few
    /// measurements dominate the seed.
    pub fn new(initial_state: &[f32], process_variance: f32, measurement_variance: f32) -> Self {
        let n = initial_state.len();
        let dim = n / 2;
        Self {
            x: Array1::from_vec(initial_state.to_vec()),
            dim,
            p: Array2::eye(n) * 100.0,
            q: Array2::eye(n) * process_variance,
            r: Array2::eye(dim) * measurement_variance,
        }
    }

    /// Number of directly measured quantities.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Current state estimate.
    pub fn state(&self) -> &Array1<f32> {
        &self.x
    }

    /// Current estimate of the measured quantities (the first `k` state
    /// components).
    pub fn measured_state(&self) -> Vec<f32> {
        self.x.iter().take(self.dim).copied().collect()
    }

    /// Shapes of (P, Q, R), mostly useful for sanity checks.
    pub fn noise_shapes(&self) -> ((usize, usize), (usize, usize), (usize, usize)) {
        (self.p.dim(), self.q.dim(), self.r.dim())
    }

    /// Advance one time step and fold in a measurement of length `k`.
    ///
    /// Returns the full updated state vector. Passing a measurement of the
    /// wrong length is a caller contract violation (guarded at the track
    /// level).
    pub fn update(&mut self, measurement: &[f32]) -> Array1<f32> {
        debug_assert_eq!(measurement.len(), self.dim);

        // Prediction: Euler-integrate velocity into position, inflate P.
        for i in 0..self.dim {
            self.x[i] += self.x[self.dim + i];
        }
        self.p += &self.q;

        // Kalman gain over the measured block only.
        let p_pos = self.p.slice(ndarray::s![..self.dim, ..self.dim]).to_owned();
        let innovation_cov = &p_pos + &self.r;
        let gain = p_pos.dot(&invert_small(&innovation_cov));

        // Correction.
        let residual = Array1::from_iter(
            measurement
                .iter()
                .zip(self.x.iter())
                .map(|(z, x)| z - x),
        );
        let correction = gain.dot(&residual);
        for i in 0..self.dim {
            self.x[i] += correction[i];
        }

        let identity = Array2::<f32>::eye(self.dim);
        let p_pos = self.p.slice(ndarray::s![..self.dim, ..self.dim]).to_owned();
        let corrected = (identity - gain).dot(&p_pos);
        self.p
            .slice_mut(ndarray::s![..self.dim, ..self.dim])
            .assign(&corrected);

        self.x.clone()
    }
}

/// Invert a small (k <= 2 in practice) covariance block via nalgebra to
/// avoid a BLAS/LAPACK dependency. `P + R` is positive definite by
/// construction, so the inverse exists.
fn invert_small(m: &Array2<f32>) -> Array2<f32> {
    let n = m.nrows();
    let nm = nalgebra::DMatrix::from_fn(n, n, |i, j| m[[i, j]] as f64);
    let inv = nm
        .try_inverse()
        .expect("innovation covariance inversion failed");
    Array2::from_shape_fn((n, n), |(i, j)| inv[(i, j)] as f32)
}
