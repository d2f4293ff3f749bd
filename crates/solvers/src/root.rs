//! Scalar root finders used by the implicit methods.
//!
//! Both finders stop when the last update is at most `tolerance` in absolute
//! value and fail closed as soon as the function leaves its domain.

use skein_core::OutsideDomain;
use thiserror::Error;

use crate::ConfigError;

/// Configuration shared by [`newton`] and [`secant`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    tolerance: f64,
    max_iters: usize,
}

/// Errors that can occur while finding a root.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("function evaluated outside its domain")]
    OutsideDomain(#[from] OutsideDomain),

    #[error("update is not finite")]
    NonFinite,

    #[error("no convergence within the iteration limit")]
    MaxIters,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-12, 100).unwrap()
    }
}

impl Config {
    /// Creates a new config.
    ///
    /// # Errors
    ///
    /// Returns an error if `tolerance` is not finite and positive or if
    /// `max_iters` is zero.
    pub fn new(tolerance: f64, max_iters: usize) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::Tolerance);
        }
        if max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }

        Ok(Self {
            tolerance,
            max_iters,
        })
    }

    /// Returns the absolute tolerance on the last update.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the maximum number of updates.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }
}

/// Finds a root of `f` with Newton's method starting from `guess`.
///
/// Iterates `x <- x - f(x) / df(x)` until `|f(x) / df(x)| <= tolerance`.
///
/// # Errors
///
/// Returns an error if `f` or `df` report [`OutsideDomain`], if an update is
/// not finite (for example `df(x) == 0`), or if the iteration limit is hit.
pub fn newton<F, D>(f: F, df: D, guess: f64, config: &Config) -> Result<f64, Error>
where
    F: Fn(f64) -> Result<f64, OutsideDomain>,
    D: Fn(f64) -> Result<f64, OutsideDomain>,
{
    let mut x = guess;
    for _ in 0..config.max_iters {
        let fx = f(x)?;
        if fx == 0.0 {
            return Ok(x);
        }

        let update = fx / df(x)?;
        if !update.is_finite() {
            return Err(Error::NonFinite);
        }

        x -= update;
        if update.abs() <= config.tolerance {
            return Ok(x);
        }
    }
    Err(Error::MaxIters)
}

/// Finds a root of `f` with the secant method seeded by `x0` and `x1`.
///
/// Uses the same stopping rule as [`newton`], with the slope replaced by the
/// secant through the last two iterates.
///
/// # Errors
///
/// Returns an error if `f` reports [`OutsideDomain`], if an update is not
/// finite (equal function values at two distinct iterates, or equal seeds),
/// or if the iteration limit is hit.
pub fn secant<F>(f: F, x0: f64, x1: f64, config: &Config) -> Result<f64, Error>
where
    F: Fn(f64) -> Result<f64, OutsideDomain>,
{
    let (mut prev, mut f_prev) = (x0, f(x0)?);
    let mut x = x1;
    for _ in 0..config.max_iters {
        let fx = f(x)?;
        if fx == 0.0 {
            return Ok(x);
        }

        let update = fx * (x - prev) / (fx - f_prev);
        if !update.is_finite() {
            return Err(Error::NonFinite);
        }

        (prev, f_prev) = (x, fx);
        x -= update;
        if update.abs() <= config.tolerance {
            return Ok(x);
        }
    }
    Err(Error::MaxIters)
}
