//! Interpolation, events and solution stores built on steppers.
//!
//! - [`Interpolator`] — values between stored points ([`Linear`], [`Hermite`])
//! - [`Event`] and [`step_until`] — crossing detection, localization and
//!   ordered dispatch while driving a stepper
//! - [`DenseSolution`] — computed once over a fixed interval
//! - [`CacheSolution`] — expanded lazily in both directions, with events
//!
//! # Example
//!
//! ```ignore
//! use skein_solution::{CacheSolution, Hermite};
//! use skein_solvers::{AdaptiveConfig, Fehlberg};
//!
//! let method = Fehlberg::new(AdaptiveConfig::default());
//! let mut solution = CacheSolution::new(&method, &ivp, Hermite::for_ivp(&ivp), events);
//! let value = solution.get(2.5)?;
//! ```

mod columns;
mod interpolate;

pub mod cache;
pub mod dense;
pub mod event;

pub use cache::CacheSolution;
pub use dense::DenseSolution;
pub use event::{Action, Event, EventError, Outcome, step_until};
pub use interpolate::{Hermite, Interpolator, Linear};
