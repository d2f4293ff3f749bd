/// A point of the solution of an IVP.
///
/// Every point belonging to one problem has the same dimension. Points are
/// plain values: anything that keeps a point around for later use stores its
/// own clone, since steppers are free to overwrite the point they return.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// The independent variable.
    pub time: f64,

    /// The dependent variable at `time`.
    pub value: Vec<f64>,
}

impl Point {
    /// Creates a point from a time and a state vector.
    pub fn new(time: f64, value: impl Into<Vec<f64>>) -> Self {
        Self {
            time,
            value: value.into(),
        }
    }

    /// Returns the number of components in the state vector.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.value.len()
    }

    /// Adds `slope * delta` to the value, leaving the time untouched.
    ///
    /// # Panics
    ///
    /// Panics if `slope` and the value have different lengths.
    pub fn step_value(&mut self, slope: &[f64], delta: f64) {
        assert_eq!(self.value.len(), slope.len(), "dimension mismatch");
        for (x, d) in self.value.iter_mut().zip(slope) {
            *x += d * delta;
        }
    }

    /// Returns a copy advanced by `delta` in time and `slope * delta` in value.
    ///
    /// This is the point an explicit Euler stage would evaluate next.
    #[must_use]
    pub fn offset(&self, slope: &[f64], delta: f64) -> Self {
        let mut next = self.clone();
        next.time += delta;
        next.step_value(slope, delta);
        next
    }
}
