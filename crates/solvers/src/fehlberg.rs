//! Runge-Kutta-Fehlberg 4(5).
//!
//! Six stage slopes give a fourth-order update and, from the same stages, an
//! estimate of its local error. Acceptance and the next step follow the same
//! rule as [`Richardson`](crate::Richardson) with order 4.

use log::{debug, trace};
use skein_core::{Ivp, Method, OutsideDomain, Point, Stepper};

use crate::{
    AdaptiveConfig,
    control::update_step,
    vector::{combine, distance},
};

/// Stage times as fractions of the step.
const C: [f64; 6] = [0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0];

/// Fourth-order weights.
const B4: [f64; 6] = [
    25.0 / 216.0,
    0.0,
    1408.0 / 2565.0,
    2197.0 / 4104.0,
    -1.0 / 5.0,
    0.0,
];

/// Difference between the fifth- and fourth-order weights.
const E: [f64; 6] = [
    1.0 / 360.0,
    0.0,
    -128.0 / 4275.0,
    -2197.0 / 75240.0,
    1.0 / 50.0,
    2.0 / 55.0,
];

/// The adaptive Runge-Kutta-Fehlberg method.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fehlberg {
    config: AdaptiveConfig,
}

impl Fehlberg {
    /// Creates the method with the given step control.
    #[must_use]
    pub fn new(config: AdaptiveConfig) -> Self {
        Self { config }
    }

    /// Returns the step control parameters.
    #[must_use]
    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    fn stepper(&self, ivp: &Ivp, direction: f64) -> FehlbergStepper {
        FehlbergStepper {
            config: self.config,
            state: ivp.clone(),
            step: direction * self.config.initial_step().min(self.config.max_step()),
            exhausted: false,
        }
    }
}

impl Method for Fehlberg {
    type Stepper = FehlbergStepper;

    fn forward(&self, ivp: &Ivp) -> Self::Stepper {
        self.stepper(ivp, 1.0)
    }

    fn backward(&self, ivp: &Ivp) -> Self::Stepper {
        self.stepper(ivp, -1.0)
    }
}

/// Stepper produced by [`Fehlberg`].
#[derive(Debug)]
pub struct FehlbergStepper {
    config: AdaptiveConfig,
    state: Ivp,
    step: f64,
    exhausted: bool,
}

impl FehlbergStepper {
    /// Evaluates the six stages for a step of size `h`.
    ///
    /// Returns the fourth-order value and the estimated local error.
    fn trial(&self, h: f64) -> Result<(Vec<f64>, f64), OutsideDomain> {
        let start = &self.state.start;
        let stage = |i: usize, value: Vec<f64>| {
            self.state
                .derivative(&Point::new(start.time + C[i] * h, value))
        };

        let k1 = self.state.slope()?;
        let k2 = stage(1, combine(&start.value, h, &[(1.0 / 4.0, &k1)]))?;
        let k3 = stage(
            2,
            combine(&start.value, h, &[(3.0 / 32.0, &k1), (9.0 / 32.0, &k2)]),
        )?;
        let k4 = stage(
            3,
            combine(
                &start.value,
                h,
                &[
                    (1932.0 / 2197.0, &k1),
                    (-7200.0 / 2197.0, &k2),
                    (7296.0 / 2197.0, &k3),
                ],
            ),
        )?;
        let k5 = stage(
            4,
            combine(
                &start.value,
                h,
                &[
                    (439.0 / 216.0, &k1),
                    (-8.0, &k2),
                    (3680.0 / 513.0, &k3),
                    (-845.0 / 4104.0, &k4),
                ],
            ),
        )?;
        let k6 = stage(
            5,
            combine(
                &start.value,
                h,
                &[
                    (-8.0 / 27.0, &k1),
                    (2.0, &k2),
                    (-3544.0 / 2565.0, &k3),
                    (1859.0 / 4104.0, &k4),
                    (-11.0 / 40.0, &k5),
                ],
            ),
        )?;

        let k = [&k1, &k2, &k3, &k4, &k5, &k6];
        let value = combine(
            &start.value,
            h,
            &B4.iter().copied().zip(k).collect::<Vec<_>>(),
        );

        let zero = vec![0.0; start.value.len()];
        let estimate = combine(&zero, h, &E.iter().copied().zip(k).collect::<Vec<_>>());
        let error = distance(&estimate, &zero);
        Ok((value, error))
    }
}

impl Stepper for FehlbergStepper {
    fn next_point(&mut self) -> Option<&Point> {
        if self.exhausted {
            return None;
        }

        let tolerance = self.config.tolerance();
        loop {
            let h = self.step;
            if h.is_nan() || h.abs() < self.config.min_step() {
                debug!(
                    "fehlberg stepper exhausted at t = {}: step {h:e} below minimum",
                    self.state.start.time
                );
                self.exhausted = true;
                return None;
            }

            let Ok((value, error)) = self.trial(h) else {
                trace!("trial step {h:e} left the domain, halving");
                self.step = h / 2.0;
                continue;
            };

            let next = update_step(h, tolerance, error, self.config.max_step(), 4);
            if error <= tolerance * h.abs() {
                self.state.start.value = value;
                self.state.start.time += h;
                self.step = next;
                return Some(&self.state.start);
            }

            trace!("rejected step {h:e} with error {error:e}, retrying with {next:e}");
            self.step = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn config(tolerance: f64) -> AdaptiveConfig {
        AdaptiveConfig::new(0.1, 1e-8, 0.5, tolerance).expect("valid config")
    }

    fn oscillator() -> Ivp {
        Ivp::new(Point::new(0.0, [1.0, 0.0]), |p| {
            Ok(vec![p.value[1], -p.value[0]])
        })
    }

    #[test]
    fn weights_are_consistent() {
        assert_relative_eq!(B4.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(E.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn cubic_slope_is_exact() {
        // Both members of the pair integrate x' = 4t^3 exactly.
        let ivp = Ivp::new(Point::new(0.0, [0.0]), |p| Ok(vec![p.time.powi(3) * 4.0]));
        let stepper = Fehlberg::new(config(1e-6)).forward(&ivp);

        let (value, error) = stepper.trial(1.0).expect("in domain");
        assert_relative_eq!(value[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(error, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn tracks_oscillator_both_ways() {
        let method = Fehlberg::new(config(1e-8));
        let ivp = oscillator();

        for mut stepper in [method.forward(&ivp), method.backward(&ivp)] {
            for _ in 0..100 {
                let point = stepper.next_point().expect("oscillator never ends");
                assert_relative_eq!(point.value[0], point.time.cos(), epsilon = 1e-5);
                assert_relative_eq!(point.value[1], -point.time.sin(), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn halves_on_domain_exit() {
        // The solution tan(t) blows up at pi/2; the domain stops at x = 20.
        let ivp = Ivp::new(Point::new(0.0, [0.0]), |p| {
            if p.value[0].abs() < 20.0 {
                Ok(vec![1.0 + p.value[0] * p.value[0]])
            } else {
                Err(OutsideDomain)
            }
        });
        let mut stepper = Fehlberg::new(config(1e-6)).forward(&ivp);

        let mut last = Point::new(0.0, [0.0]);
        while let Some(point) = stepper.next_point() {
            assert_relative_eq!(point.value[0], point.time.tan(), max_relative = 1e-3);
            last = point.clone();
        }
        assert!(last.time > 1.4);
        assert!(last.time < std::f64::consts::FRAC_PI_2);
        assert!(stepper.next_point().is_none());
    }

    #[test]
    fn overflow_exhausts_instead_of_looping() {
        // Any step from x = 1e150 overflows to infinity, so the error is NaN.
        let ivp = Ivp::new(Point::new(0.0, [1e150]), |p| Ok(vec![p.value[0] * p.value[0]]));
        let mut stepper = Fehlberg::new(AdaptiveConfig::default()).forward(&ivp);

        assert!(stepper.next_point().is_none());
        assert!(stepper.next_point().is_none());
    }
}
