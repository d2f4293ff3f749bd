use skein_core::{Ivp, OutsideDomain};

use crate::vector::combine;

/// A single-step update rule of known convergence order.
///
/// A scheme advances `ivp.start` by exactly `h` in time. When the derivative
/// leaves its domain partway through the step the error is returned and the
/// state of `ivp.start` is unspecified.
pub trait Scheme {
    /// Returns the global convergence order of the scheme.
    fn order(&self) -> u32;

    /// Advances the problem's start point by `h`.
    ///
    /// # Errors
    ///
    /// Returns [`OutsideDomain`] if any stage evaluates the derivative outside
    /// its domain.
    fn step(&self, ivp: &mut Ivp, h: f64) -> Result<(), OutsideDomain>;
}

/// Explicit Euler: `x += h * f(t, x)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euler;

impl Scheme for Euler {
    fn order(&self) -> u32 {
        1
    }

    fn step(&self, ivp: &mut Ivp, h: f64) -> Result<(), OutsideDomain> {
        let slope = ivp.slope()?;
        ivp.start.step_value(&slope, h);
        ivp.start.time += h;
        Ok(())
    }
}

/// Modified Euler (Heun): averages the slopes at both ends of an Euler step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifiedEuler;

impl Scheme for ModifiedEuler {
    fn order(&self) -> u32 {
        2
    }

    fn step(&self, ivp: &mut Ivp, h: f64) -> Result<(), OutsideDomain> {
        let k1 = ivp.slope()?;
        let k2 = ivp.derivative(&ivp.start.offset(&k1, h))?;

        ivp.start.value = combine(&ivp.start.value, h, &[(0.5, &k1), (0.5, &k2)]);
        ivp.start.time += h;
        Ok(())
    }
}

/// Classical fourth-order Runge-Kutta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rk4;

impl Scheme for Rk4 {
    fn order(&self) -> u32 {
        4
    }

    fn step(&self, ivp: &mut Ivp, h: f64) -> Result<(), OutsideDomain> {
        let start = &ivp.start;
        let k1 = ivp.slope()?;
        let k2 = ivp.derivative(&start.offset(&k1, h / 2.0))?;
        let k3 = ivp.derivative(&start.offset(&k2, h / 2.0))?;
        let k4 = ivp.derivative(&start.offset(&k3, h))?;

        let value = combine(
            &start.value,
            h,
            &[
                (1.0 / 6.0, &k1),
                (2.0 / 6.0, &k2),
                (2.0 / 6.0, &k3),
                (1.0 / 6.0, &k4),
            ],
        );
        ivp.start.value = value;
        ivp.start.time += h;
        Ok(())
    }
}
