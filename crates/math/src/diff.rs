//! Period-over-period changes.

/// Scaled first differences of a series.
///
/// The first element, and any element whose value or predecessor is
/// missing, is `None`.
///
/// # Arguments
/// * `values` - Series in time order
/// * `scale` - Multiplier applied to each difference (e.g. 100 for basis points)
#[must_use]
pub fn first_differences(values: &[Option<f64>], scale: f64) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(values.len());
    if values.is_empty() {
        return changes;
    }

    changes.push(None);
    changes.extend(values.windows(2).map(|pair| match (pair[0], pair[1]) {
        (Some(previous), Some(current)) => Some((current - previous) * scale),
        _ => None,
    }));
    changes
}
