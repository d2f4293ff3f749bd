use skein_core::Point;

/// Rearranges points into `[times, x0 values, x1 values, ...]`.
///
/// The points must already be in the desired order.
pub(crate) fn columns<'a>(points: impl IntoIterator<Item = &'a Point>) -> Vec<Vec<f64>> {
    let mut columns: Vec<Vec<f64>> = Vec::new();
    for point in points {
        if columns.is_empty() {
            columns.resize(point.dimension() + 1, Vec::new());
        }
        columns[0].push(point.time);
        for (column, x) in columns[1..].iter_mut().zip(&point.value) {
            column.push(*x);
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transposes_points() {
        let points = [Point::new(0.0, [1.0, 2.0]), Point::new(0.5, [3.0, 4.0])];
        assert_eq!(
            columns(&points),
            vec![vec![0.0, 0.5], vec![1.0, 3.0], vec![2.0, 4.0]]
        );
    }

    #[test]
    fn no_points_no_columns() {
        let none: [Point; 0] = [];
        assert!(columns(&none).is_empty());
    }
}
