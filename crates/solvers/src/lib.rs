//! Numerical methods for initial value problems.
//!
//! Every method implements [`skein_core::Method`] and produces steppers that
//! walk the solution in one time direction:
//!
//! - [`FixedStep`] — Euler, modified Euler and RK4 with a constant step
//! - [`Implicit`] — implicit Euler and trapezium for scalar problems
//! - [`Richardson`] — adaptive step control around any fixed-step [`Scheme`]
//! - [`Fehlberg`] — the Runge-Kutta-Fehlberg embedded pair
//! - [`AdamsBashforth`], [`AdamsBashforthMoulton`],
//!   [`AdaptivePredictorCorrector`] — fourth-order multistep methods
//!
//! The adaptive methods share [`AdaptiveConfig`] and the [`update_step`] rule.

mod config;
mod control;
mod fehlberg;
mod fixed;
mod implicit;
mod multistep;
mod richardson;
mod vector;

pub mod root;

pub use config::{AdaptiveConfig, ConfigError};
pub use control::update_step;
pub use fehlberg::{Fehlberg, FehlbergStepper};
pub use fixed::{Euler, FixedStep, FixedStepper, ModifiedEuler, Rk4, Scheme};
pub use implicit::{Implicit, ImplicitStepper, PartialFn, Rule};
pub use multistep::{
    AdamsBashforth, AdamsBashforthMoulton, AdamsStepper, AdaptivePcStepper,
    AdaptivePredictorCorrector,
};
pub use richardson::{Richardson, RichardsonStepper};
