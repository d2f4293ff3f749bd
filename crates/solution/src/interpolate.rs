use std::fmt;

use skein_core::{DerivativeFn, Ivp, Point};

/// Reconstructs solution values between two stored points.
///
/// Interpolation never fails: `p1` and `p2` must have distinct times, and
/// `time` may lie outside the interval they span (extrapolation).
pub trait Interpolator {
    /// Returns the approximate value of the solution at `time`.
    fn interpolate(&self, p1: &Point, p2: &Point, time: f64) -> Vec<f64>;
}

impl<I: Interpolator + ?Sized> Interpolator for &I {
    fn interpolate(&self, p1: &Point, p2: &Point, time: f64) -> Vec<f64> {
        (**self).interpolate(p1, p2, time)
    }
}

impl<I: Interpolator + ?Sized> Interpolator for Box<I> {
    fn interpolate(&self, p1: &Point, p2: &Point, time: f64) -> Vec<f64> {
        (**self).interpolate(p1, p2, time)
    }
}

/// Straight-line interpolation in every component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl Interpolator for Linear {
    fn interpolate(&self, p1: &Point, p2: &Point, time: f64) -> Vec<f64> {
        let ratio = (time - p1.time) / (p2.time - p1.time);
        p1.value
            .iter()
            .zip(&p2.value)
            .map(|(x1, x2)| x1 * (1.0 - ratio) + x2 * ratio)
            .collect()
    }
}

/// Cubic Hermite interpolation from the end values and their derivatives.
///
/// The cubic is built with Newton divided differences over the doubled nodes
/// `t1, t1, t2, t2`. If the derivative is outside its domain at either end,
/// the result degrades to [`Linear`].
#[derive(Clone)]
pub struct Hermite {
    derivative: DerivativeFn,
}

impl Hermite {
    /// Creates an interpolator that evaluates `derivative` at the end points.
    #[must_use]
    pub fn new(derivative: DerivativeFn) -> Self {
        Self { derivative }
    }

    /// Creates an interpolator sharing the derivative of `ivp`.
    #[must_use]
    pub fn for_ivp(ivp: &Ivp) -> Self {
        Self::new(ivp.derivative_fn())
    }
}

impl Interpolator for Hermite {
    fn interpolate(&self, p1: &Point, p2: &Point, time: f64) -> Vec<f64> {
        let (Ok(f1), Ok(f2)) = ((self.derivative)(p1), (self.derivative)(p2)) else {
            return Linear.interpolate(p1, p2, time);
        };

        let diff = p2.time - p1.time;
        let off = time - p1.time;
        p1.value
            .iter()
            .zip(&p2.value)
            .zip(f1.iter().zip(&f2))
            .map(|((x1, x2), (d01, d23))| {
                let d12 = (x2 - x1) / diff;
                let d02 = (d12 - d01) / diff;
                let d13 = (d23 - d12) / diff;
                let d03 = (d13 - d02) / diff;
                x1 + off * (d01 + off * (d02 + (off - diff) * d03))
            })
            .collect()
    }
}

impl fmt::Debug for Hermite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hermite").finish_non_exhaustive()
    }
}
