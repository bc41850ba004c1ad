use std::cmp::Ordering;

/// Compares floating point numbers with a total order.
pub fn compare_floats(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}
