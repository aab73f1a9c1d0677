//! Kernel density estimation for ridgeline plots.
//!
//! ```rust
//! use co2_data::grid::linspace;
//! use co2_data::kde::{kde, Epanechnikov};
//!
//! let estimator = kde(Epanechnikov::new(7.0).unwrap(), linspace(-10.0, 40.0, 50));
//! let curve = estimator.estimate(&[12.0, 15.5, 21.0]);
//! assert_eq!(curve.len(), 50);
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum KdeError {
    #[error("kernel bandwidth must be a positive finite number, got {0}")]
    InvalidBandwidth(f64),
}

/// `(x, density)` pairs over an evaluation grid.
pub type DensityCurve = Vec<(f64, f64)>;

/// A smoothing kernel evaluated at the offset between a grid point and a sample.
pub trait Kernel {
    fn evaluate(&self, u: f64) -> f64;
}

/// Epanechnikov kernel: `0.75 * (1 - (u/k)²) / k` inside `|u/k| ≤ 1`, else 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Epanechnikov {
    bandwidth: f64,
}

impl Epanechnikov {
    pub fn new(bandwidth: f64) -> Result<Self, KdeError> {
        if bandwidth.is_finite() && bandwidth > 0.0 {
            Ok(Epanechnikov { bandwidth })
        } else {
            Err(KdeError::InvalidBandwidth(bandwidth))
        }
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

impl Kernel for Epanechnikov {
    fn evaluate(&self, u: f64) -> f64 {
        let v = u / self.bandwidth;
        if v.abs() <= 1.0 {
            0.75 * (1.0 - v * v) / self.bandwidth
        } else {
            0.0
        }
    }
}

/// A kernel bound to a fixed evaluation grid.
#[derive(Debug, Clone)]
pub struct KernelDensityEstimator<K> {
    kernel: K,
    eval_points: Vec<f64>,
}

/// Bind `kernel` to `eval_points`; call [`KernelDensityEstimator::estimate`]
/// once per sample.
pub fn kde<K: Kernel>(kernel: K, eval_points: Vec<f64>) -> KernelDensityEstimator<K> {
    KernelDensityEstimator {
        kernel,
        eval_points,
    }
}

impl<K: Kernel> KernelDensityEstimator<K> {
    pub fn eval_points(&self) -> &[f64] {
        &self.eval_points
    }

    /// Mean kernel weight of `sample` at every grid point.
    ///
    /// Non-finite observations are ignored; an empty sample gives density 0
    /// everywhere.
    pub fn estimate(&self, sample: &[f64]) -> DensityCurve {
        let finite: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
        self.eval_points
            .iter()
            .map(|&x| {
                if finite.is_empty() {
                    return (x, 0.0);
                }
                let total: f64 = finite.iter().map(|v| self.kernel.evaluate(x - v)).sum();
                (x, total / finite.len() as f64)
            })
            .collect()
    }
}

/// Highest density on a curve, 0 for an empty curve.
pub fn peak(curve: &[(f64, f64)]) -> f64 {
    curve.iter().map(|(_, d)| *d).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::linspace;

    #[test]
    fn test_kernel_shape() {
        let kernel = Epanechnikov::new(2.0).unwrap();
        assert_eq!(kernel.evaluate(0.0), 0.375);
        assert_eq!(kernel.evaluate(2.0), 0.0);
        assert_eq!(kernel.evaluate(-2.0), 0.0);
        assert_eq!(kernel.evaluate(3.0), 0.0);
        assert_eq!(kernel.evaluate(1.0), 0.75 * 0.75 / 2.0);
        assert_eq!(kernel.evaluate(1.0), kernel.evaluate(-1.0));
    }

    #[test]
    fn test_invalid_bandwidth() {
        assert_eq!(Epanechnikov::new(0.0), Err(KdeError::InvalidBandwidth(0.0)));
        assert!(Epanechnikov::new(-1.0).is_err());
        assert!(Epanechnikov::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_empty_sample_is_zero_density() {
        let points = linspace(0.0, 10.0, 50);
        let curve = kde(Epanechnikov::new(7.0).unwrap(), points.clone()).estimate(&[]);
        assert_eq!(curve.len(), points.len());
        assert!(curve.iter().all(|(_, d)| *d == 0.0));
        let xs: Vec<f64> = curve.iter().map(|(x, _)| *x).collect();
        assert_eq!(xs, points);
    }

    #[test]
    fn test_density_is_mean_of_kernels() {
        let estimator = kde(Epanechnikov::new(1.0).unwrap(), vec![0.0, 0.5, 5.0]);
        let curve = estimator.estimate(&[0.0, 1.0]);
        // at 0: (0.75 + 0) / 2
        assert_eq!(curve[0], (0.0, 0.375));
        // at 0.5: both samples half a bandwidth away
        assert_eq!(curve[1], (0.5, 0.75 * 0.75));
        assert_eq!(curve[2], (5.0, 0.0));
    }

    #[test]
    fn test_density_integrates_to_about_one() {
        let points = linspace(-20.0, 40.0, 601);
        let step = points[1] - points[0];
        let curve = kde(Epanechnikov::new(7.0).unwrap(), points).estimate(&[5.0, 10.0, 12.0, 20.0]);
        let area: f64 = curve.iter().map(|(_, d)| d * step).sum();
        assert!((area - 1.0).abs() < 1e-3, "area {area}");
    }

    #[test]
    fn test_non_finite_samples_ignored() {
        let estimator = kde(Epanechnikov::new(1.0).unwrap(), vec![0.0]);
        assert_eq!(estimator.estimate(&[0.0, f64::NAN]), vec![(0.0, 0.75)]);
        assert_eq!(estimator.estimate(&[f64::NAN]), vec![(0.0, 0.0)]);
    }

    #[test]
    fn test_peak() {
        assert_eq!(peak(&[(0.0, 0.1), (1.0, 0.4), (2.0, 0.2)]), 0.4);
        assert_eq!(peak(&[]), 0.0);
    }
}
