//! Straight line fit with errors on both axes
//!
//! The line `y = a x + b` is fitted by minimizing the effective variance χ²
//!
//! ```text
//! χ²(a, b) = Σ (yᵢ - a xᵢ - b)² / (σyᵢ² + a² σxᵢ²)
//! ```
//!
//! For a given slope the best intercept is the weighted mean of `y - a x`, so
//! the minimization reduces to a one dimensional search on the slope.
//! The parameter covariance is the inverse of half the χ² Hessian.

use crate::series::Series;
use nalgebra::Matrix2;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::fmt;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FitError {
    #[error("A line fit needs at least 2 points, found {0}")]
    TooFewPoints(usize),
    #[error("All the x values are identical, the slope is undetermined")]
    Degenerate,
    #[error("Point #{0} has zero uncertainty while others do not")]
    ZeroVariance(usize),
    #[error("The effective variance of point #{point} vanishes at the slope a = {slope}")]
    VanishingVariance { point: usize, slope: f64 },
    #[error("The χ² Hessian is singular")]
    Singular,
    #[error("The slope did not converge after {0} iterations")]
    NoConvergence(usize),
}
type Result<T> = std::result::Result<T, FitError>;

const MAX_ITERATIONS: usize = 100;
const TOLERANCE: f64 = 1e-12;

/// Line fit parameters and their statistics
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// slope
    pub a: f64,
    /// intercept
    pub b: f64,
    /// slope standard error
    pub a_err: f64,
    /// intercept standard error
    pub b_err: f64,
    /// slope-intercept correlation coefficient
    pub correlation: f64,
    pub chi2: f64,
    /// number of degrees of freedom
    pub ndf: usize,
    /// upper tail χ² probability, only for weighted fits with ndf > 0
    pub chi2_probability: Option<f64>,
    pub n_points: usize,
    pub weighted: bool,
}
impl FitResult {
    /// Evaluates the line at `x`
    pub fn eval(&self, x: f64) -> f64 {
        self.a * x + self.b
    }
    /// χ² per degree of freedom
    pub fn reduced_chi2(&self) -> Option<f64> {
        (self.ndf > 0).then(|| self.chi2 / self.ndf as f64)
    }
    /// Samples the line with `factor` times as many points as `series`,
    /// linearly spaced over the series x range
    pub fn line(&self, series: &Series, factor: usize) -> Vec<(f64, f64)> {
        let Some((x_min, x_max)) = series.x_range() else {
            return vec![];
        };
        linspace(x_min, x_max, series.len() * factor)
            .map(|x| (x, self.eval(x)))
            .collect()
    }
}
impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LINEAR FIT y = a x + b:")?;
        writeln!(f, " - # of points: {}", self.n_points)?;
        writeln!(
            f,
            " - weights    : {}",
            if self.weighted {
                "1/(σy² + a²σx²)"
            } else {
                "none (ordinary least squares)"
            }
        )?;
        writeln!(f, " - a          : {:>12.6} ± {:.6}", self.a, self.a_err)?;
        writeln!(f, " - b          : {:>12.6} ± {:.6}", self.b, self.b_err)?;
        writeln!(f, " - corr(a,b)  : {:>12.4}", self.correlation)?;
        write!(f, " - χ²/ndf     : {:.4}/{}", self.chi2, self.ndf)?;
        if let Some(reduced_chi2) = self.reduced_chi2() {
            write!(f, " = {:.4}", reduced_chi2)?;
        }
        writeln!(f)?;
        if let Some(p) = self.chi2_probability {
            writeln!(f, " - χ² prob.   : {:.4}", p)?;
        }
        Ok(())
    }
}

/// `n` points linearly spaced over `[start, end]`
pub fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 {
        (end - start) / (n - 1) as f64
    } else {
        0f64
    };
    (0..n).map(move |k| if k + 1 == n { end } else { start + k as f64 * step })
}

/// Errors-in-variables line fit of a [`Series`]
pub struct Fit<'a> {
    series: &'a Series,
    weighted: bool,
}
impl<'a> Fit<'a> {
    pub fn new(series: &'a Series) -> Self {
        Self {
            series,
            weighted: !series.is_unweighted(),
        }
    }
    /// Returns the effective variance of each point for the slope `a`
    fn variances(&self, a: f64) -> Result<Vec<f64>> {
        if !self.weighted {
            return Ok(vec![1f64; self.series.len()]);
        }
        self.series
            .iter()
            .enumerate()
            .map(|(k, (_, _, ex, ey))| {
                let var = ey * ey + a * a * ex * ex;
                if var > 0f64 {
                    Ok(var)
                } else if ex != 0f64 {
                    Err(FitError::VanishingVariance { point: k, slope: a })
                } else {
                    Err(FitError::ZeroVariance(k))
                }
            })
            .collect()
    }
    /// Weighted least squares `(a, b)` for fixed weights
    fn weighted_line(&self, weights: &[f64]) -> Result<(f64, f64)> {
        let s: f64 = weights.iter().sum();
        let (x_mean, y_mean) = self
            .series
            .iter()
            .zip(weights)
            .fold((0f64, 0f64), |(sx, sy), ((x, y, ..), w)| {
                (sx + w * x, sy + w * y)
            });
        let (x_mean, y_mean) = (x_mean / s, y_mean / s);
        let (sxx, sxy) = self
            .series
            .iter()
            .zip(weights)
            .fold((0f64, 0f64), |(sxx, sxy), ((x, y, ..), w)| {
                let dx = x - x_mean;
                (sxx + w * dx * dx, sxy + w * dx * (y - y_mean))
            });
        if sxx <= 0f64 {
            return Err(FitError::Degenerate);
        }
        let a = sxy / sxx;
        Ok((a, y_mean - a * x_mean))
    }
    /// Best intercept for the slope `a`
    fn intercept(&self, a: f64) -> Result<f64> {
        let weights: Vec<f64> = self.variances(a)?.into_iter().map(|v| 1. / v).collect();
        let s: f64 = weights.iter().sum();
        Ok(self
            .series
            .iter()
            .zip(&weights)
            .map(|((x, y, ..), w)| w * (y - a * x))
            .sum::<f64>()
            / s)
    }
    /// χ² of the line `(a, b)`
    pub fn chi2(&self, a: f64, b: f64) -> Result<f64> {
        Ok(self
            .series
            .iter()
            .zip(self.variances(a)?)
            .map(|((x, y, ..), var)| {
                let r = y - a * x - b;
                r * r / var
            })
            .sum())
    }
    /// Derivative of the profiled χ² with respect to the slope
    fn dchi2_da(&self, a: f64) -> Result<f64> {
        let b = self.intercept(a)?;
        let variances = self.variances(a)?;
        Ok(self
            .series
            .iter()
            .zip(variances)
            .map(|((x, y, ex, _), var)| {
                let r = y - a * x - b;
                let w = 1. / var;
                let dw = if self.weighted {
                    -2. * a * ex * ex * w * w
                } else {
                    0f64
                };
                -2. * w * r * x + dw * r * r
            })
            .sum())
    }
    /// Iterates the effective variance weights until the slope settles
    fn effective_variance_slope(&self) -> Result<f64> {
        let unit = vec![1f64; self.series.len()];
        let (mut a, _) = self.weighted_line(&unit)?;
        if !self.weighted {
            return Ok(a);
        }
        for k in 0..MAX_ITERATIONS {
            let weights: Vec<f64> = self.variances(a)?.into_iter().map(|v| 1. / v).collect();
            let (a_next, _) = self.weighted_line(&weights)?;
            log::debug!("effective variance #{:>3}: a = {:.12}", k, a_next);
            let converged = (a_next - a).abs() <= TOLERANCE * (1. + a.abs());
            a = a_next;
            if converged {
                return Ok(a);
            }
        }
        Err(FitError::NoConvergence(MAX_ITERATIONS))
    }
    /// Newton iterations on dχ²/da from the effective variance slope
    fn polish(&self, a0: f64) -> Result<f64> {
        let mut a = a0;
        for k in 0..MAX_ITERATIONS {
            let h = 1e-6 * (1. + a.abs());
            let g = self.dchi2_da(a)?;
            let dg = (self.dchi2_da(a + h)? - self.dchi2_da(a - h)?) / (2. * h);
            if !(dg > 0f64) {
                log::warn!("χ² is not convex at a = {}, keeping the effective variance slope", a);
                return Ok(a0);
            }
            let step = g / dg;
            a -= step;
            log::debug!("newton #{:>3}: a = {:.12}", k, a);
            if step.abs() <= TOLERANCE * (1. + a.abs()) {
                return Ok(a);
            }
        }
        log::warn!(
            "slope refinement stopped after {} iterations, keeping the effective variance slope",
            MAX_ITERATIONS
        );
        Ok(a0)
    }
    /// Central difference Hessian of χ²(a, b)
    fn hessian(&self, a: f64, b: f64, (ha, hb): (f64, f64)) -> Result<Matrix2<f64>> {
        let chi2 = |da: f64, db: f64| self.chi2(a + da, b + db);
        let c0 = chi2(0., 0.)?;
        let haa = (chi2(ha, 0.)? - 2. * c0 + chi2(-ha, 0.)?) / (ha * ha);
        let hbb = (chi2(0., hb)? - 2. * c0 + chi2(0., -hb)?) / (hb * hb);
        let hab = (chi2(ha, hb)? - chi2(ha, -hb)? - chi2(-ha, hb)? + chi2(-ha, -hb)?)
            / (4. * ha * hb);
        Ok(Matrix2::new(haa, hab, hab, hbb))
    }
    /// Fits the line
    pub fn solve(&self) -> Result<FitResult> {
        let n = self.series.len();
        if n < 2 {
            return Err(FitError::TooFewPoints(n));
        }
        let a = self.effective_variance_slope()?;
        let a = if self.weighted { self.polish(a)? } else { a };
        let b = self.intercept(a)?;
        let chi2 = self.chi2(a, b)?;
        let ndf = n - 2;

        // finite difference steps from the fixed weight parameter errors
        let weights: Vec<f64> = self.variances(a)?.into_iter().map(|v| 1. / v).collect();
        let (sw, swx, swxx) = self
            .series
            .iter()
            .zip(&weights)
            .fold((0f64, 0f64, 0f64), |(s, sx, sxx), ((x, ..), w)| {
                (s + w, sx + w * x, sxx + w * x * x)
            });
        let det = sw * swxx - swx * swx;
        if det <= 0f64 {
            return Err(FitError::Degenerate);
        }
        let steps = (1e-2 * (sw / det).sqrt(), 1e-2 * (swxx / det).sqrt());

        let hessian = self.hessian(a, b, steps)?;
        let mut covariance = (hessian * 0.5).try_inverse().ok_or(FitError::Singular)?;
        if !self.weighted {
            // unit weights: scale by the residual variance
            let s2 = if ndf > 0 { chi2 / ndf as f64 } else { f64::NAN };
            covariance *= s2;
        }
        let (a_err, b_err) = (covariance[(0, 0)].sqrt(), covariance[(1, 1)].sqrt());
        let correlation = covariance[(0, 1)] / (a_err * b_err);

        let chi2_probability = if self.weighted && ndf > 0 {
            ChiSquared::new(ndf as f64).ok().map(|dist| dist.sf(chi2))
        } else {
            None
        };
        Ok(FitResult {
            a,
            b,
            a_err,
            b_err,
            correlation,
            chi2,
            ndf,
            chi2_probability,
            n_points: n,
            weighted: self.weighted,
        })
    }
}
