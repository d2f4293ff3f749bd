//! Core types and stepping protocol for solving initial value problems.
//!
//! An initial value problem (IVP) has the form
//!
//! ```text
//! x'(t) = f(t, x(t)),  x(t0) = x0
//! ```
//!
//! This crate defines the shared abstractions that methods and solution
//! stores build on:
//!
//! - [`Point`] — a time and the state vector at that time
//! - [`Ivp`] — a derivative function together with its initial point
//! - [`Stepper`] — a one-directional iterator over solution points
//! - [`ConfigurableStepper`] — a stepper that accepts an explicit time delta
//! - [`Method`] — a factory of forward and backward steppers
//! - [`Observer`] — receives points or events and optionally returns actions

mod ivp;
mod observer;
mod point;
mod stepper;

pub use ivp::{DerivativeFn, Ivp, OutsideDomain};
pub use observer::Observer;
pub use point::Point;
pub use stepper::{ConfigurableStepper, Method, Stepper};
