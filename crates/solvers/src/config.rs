use thiserror::Error;

/// Step-size control parameters shared by the adaptive methods.
///
/// The stepper starts with `initial_step`, never exceeds `max_step`, and
/// becomes exhausted when the tolerance would require a step below
/// `min_step`. The tolerance bounds the Euclidean norm of the estimated local
/// error of a step of size `h` by `tolerance * |h|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveConfig {
    initial_step: f64,
    min_step: f64,
    max_step: f64,
    tolerance: f64,
}

/// Errors that can occur when validating method parameters.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("step must be finite and positive")]
    Step,

    #[error("min_step must be finite, positive and at most the initial step")]
    MinStep,

    #[error("max_step must be finite and at least min_step")]
    MaxStep,

    #[error("tolerance must be finite and positive")]
    Tolerance,

    #[error("max_iters must be positive")]
    MaxIters,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-2, 1e-10, 1.0, 1e-6).unwrap()
    }
}

impl AdaptiveConfig {
    /// Creates a new config with validated parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a step or the tolerance is non-finite or
    /// non-positive, or if the steps are not ordered as
    /// `min_step <= initial_step` and `min_step <= max_step`.
    pub fn new(
        initial_step: f64,
        min_step: f64,
        max_step: f64,
        tolerance: f64,
    ) -> Result<Self, ConfigError> {
        check_step(initial_step)?;
        if !min_step.is_finite() || min_step <= 0.0 || min_step > initial_step {
            return Err(ConfigError::MinStep);
        }
        if !max_step.is_finite() || max_step < min_step {
            return Err(ConfigError::MaxStep);
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::Tolerance);
        }

        Ok(Self {
            initial_step,
            min_step,
            max_step,
            tolerance,
        })
    }

    /// Returns the first step tried.
    #[must_use]
    pub fn initial_step(&self) -> f64 {
        self.initial_step
    }

    /// Returns the smallest step magnitude allowed.
    #[must_use]
    pub fn min_step(&self) -> f64 {
        self.min_step
    }

    /// Returns the largest step magnitude allowed.
    #[must_use]
    pub fn max_step(&self) -> f64 {
        self.max_step
    }

    /// Returns the error tolerance per unit of time.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// Validates a fixed step size.
pub(crate) fn check_step(step: f64) -> Result<(), ConfigError> {
    if step.is_finite() && step > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Step)
    }
}
