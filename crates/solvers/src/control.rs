//! Step-size update rule shared by the adaptive methods.

/// Smallest factor a single update may scale the step by.
const MIN_FACTOR: f64 = 0.1;

/// Largest factor a single update may scale the step by.
const MAX_FACTOR: f64 = 4.0;

/// Returns the next step for an adaptive method of the given order.
///
/// `step` produced an estimated local error `error`; the method wants that
/// error to stay below `tolerance * |step|`. The scale factor is
///
/// ```text
/// q = tolerance * |step| / (2 * error)            if order == 1
/// q = (tolerance * |step| / (2 * error))^(1/order) otherwise
/// ```
///
/// saturated into `[0.1, 4]`. The result keeps the sign of `step` and its
/// magnitude is saturated at `max_step`.
#[must_use]
pub fn update_step(step: f64, tolerance: f64, error: f64, max_step: f64, order: u32) -> f64 {
    let adjust = tolerance * step.abs() / (2.0 * error);
    let q = if order == 1 {
        adjust
    } else {
        adjust.powf(1.0 / f64::from(order))
    };
    let next = q.clamp(MIN_FACTOR, MAX_FACTOR) * step;

    if next.abs() > max_step {
        max_step.copysign(next)
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn fourth_order_takes_root() {
        let next = update_step(1.0, 0.01, 0.02, 10.0, 4);
        assert_relative_eq!(next, 0.25_f64.powf(0.25), epsilon = 1e-12);
        assert_relative_eq!(next, 0.707_106_781, epsilon = 1e-9);
    }

    #[test]
    fn first_order_uses_ratio() {
        let next = update_step(1.0, 0.01, 0.02, 10.0, 1);
        assert_relative_eq!(next, 0.25);
    }

    #[test]
    fn saturates_factor() {
        // Tiny error asks for a huge step; growth is capped at 4x.
        assert_relative_eq!(update_step(0.5, 1.0, 1e-12, 100.0, 4), 2.0);
        // Huge error asks for a tiny step; shrink is capped at 0.1x.
        assert_relative_eq!(update_step(0.5, 1e-6, 1e6, 100.0, 1), 0.05);
        // Zero error grows as much as allowed.
        assert_relative_eq!(update_step(0.5, 1e-3, 0.0, 100.0, 2), 2.0);
    }

    #[test]
    fn saturates_at_max_step_keeping_sign() {
        assert_relative_eq!(update_step(1.0, 1.0, 1e-9, 1.5, 4), 1.5);
        assert_relative_eq!(update_step(-1.0, 1.0, 1e-9, 1.5, 4), -1.5);
    }

    #[test]
    fn backward_steps_stay_negative() {
        let next = update_step(-1.0, 0.01, 0.02, 10.0, 4);
        assert_relative_eq!(next, -(0.25_f64.powf(0.25)), epsilon = 1e-12);
    }
}
