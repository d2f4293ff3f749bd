//! Fourth-order Adams multistep methods.
//!
//! Every method keeps a window of the four most recent equally spaced nodes
//! `(x_i, f_i)`, newest first, and bootstraps it with three RK4 steps:
//!
//! ```text
//! predictor (Bashforth):  x_p = x_0 + h/24 * (55 f_0 - 59 f_1 + 37 f_2 - 9 f_3)
//! corrector (Moulton):    x_c = x_0 + h/24 * (9 f(t + h, x_p) + 19 f_0 - 5 f_1 + f_2)
//! ```
//!
//! - [`AdamsBashforth`] takes the predictor as the next value.
//! - [`AdamsBashforthMoulton`] corrects the predictor once.
//! - [`AdaptivePredictorCorrector`] also estimates the local error as
//!   `‖x_c - x_p‖ * 19/270` and rebuilds its window whenever the step changes.

mod adams;
mod adaptive;
mod window;

pub use adams::{AdamsBashforth, AdamsBashforthMoulton, AdamsStepper};
pub use adaptive::{AdaptivePcStepper, AdaptivePredictorCorrector};

use window::Window;

use crate::vector::combine;

/// Number of nodes the formulas read.
const WINDOW: usize = 4;

const BASHFORTH: [f64; 4] = [55.0 / 24.0, -59.0 / 24.0, 37.0 / 24.0, -9.0 / 24.0];

const MOULTON: [f64; 4] = [9.0 / 24.0, 19.0 / 24.0, -5.0 / 24.0, 1.0 / 24.0];

/// Milne's estimate of the corrector's error from the predictor difference.
const MILNE: f64 = 19.0 / 270.0;

/// Explicit Adams-Bashforth value one step of size `h` past the newest node.
fn bashforth(window: &Window<WINDOW>, h: f64) -> Vec<f64> {
    let slope = |age: usize| window.get(age).slope.as_slice();
    combine(
        &window.get(0).value,
        h,
        &[
            (BASHFORTH[0], slope(0)),
            (BASHFORTH[1], slope(1)),
            (BASHFORTH[2], slope(2)),
            (BASHFORTH[3], slope(3)),
        ],
    )
}

/// Adams-Moulton correction given the slope at the predicted point.
fn moulton(window: &Window<WINDOW>, predicted: &[f64], h: f64) -> Vec<f64> {
    let slope = |age: usize| window.get(age).slope.as_slice();
    combine(
        &window.get(0).value,
        h,
        &[
            (MOULTON[0], predicted),
            (MOULTON[1], slope(0)),
            (MOULTON[2], slope(1)),
            (MOULTON[3], slope(2)),
        ],
    )
}
