//! Nearest-maturity resolution.

/// Find the available maturity closest to `target`.
///
/// Candidates are scanned in ascending maturity order and only a strictly
/// smaller distance replaces the current best, so equidistant candidates
/// resolve to the smaller maturity regardless of input order. NaN candidates
/// are ignored.
///
/// # Arguments
/// * `available` - Available maturities, in any order
/// * `target` - Requested maturity
/// * `max_gap` - Largest accepted absolute distance, unlimited if `None`
///
/// # Returns
/// Index into `available` of the resolved maturity, or `None` when no
/// candidate exists or the closest one lies farther than `max_gap`.
#[must_use]
pub fn nearest_maturity(available: &[f64], target: f64, max_gap: Option<f64>) -> Option<usize> {
    if target.is_nan() {
        return None;
    }

    let mut order: Vec<usize> = (0..available.len()).filter(|&i| !available[i].is_nan()).collect();
    order.sort_by(|&a, &b| available[a].total_cmp(&available[b]));

    let mut best: Option<(usize, f64)> = None;
    for idx in order {
        let distance = (available[idx] - target).abs();
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((idx, distance));
        }
    }

    let (idx, distance) = best?;
    match max_gap {
        Some(gap) if distance > gap => None,
        _ => Some(idx),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn exact_match() {
        assert_eq!(nearest_maturity(&[2.0, 5.0, 10.0], 5.0, None), Some(1));
    }

    #[test]
    fn ties_resolve_to_smaller_maturity() {
        assert_eq!(nearest_maturity(&[2.0, 8.0], 5.0, None), Some(0));
        assert_eq!(nearest_maturity(&[8.0, 2.0], 5.0, None), Some(1));
        for _ in 0..10 {
            assert_eq!(nearest_maturity(&[8.0, 2.0], 5.0, None), Some(1));
        }
    }

    #[rstest]
    #[case(Some(1.0), None)]
    #[case(Some(3.0), Some(0))]
    #[case(None, Some(0))]
    fn max_gap_excludes_distant(#[case] max_gap: Option<f64>, #[case] expected: Option<usize>) {
        assert_eq!(nearest_maturity(&[7.0], 10.0, max_gap), expected);
    }

    #[test]
    fn no_candidates() {
        assert_eq!(nearest_maturity(&[], 10.0, None), None);
        assert_eq!(nearest_maturity(&[f64::NAN], 10.0, None), None);
    }

    #[test]
    fn nan_target_is_unresolved() {
        assert_eq!(nearest_maturity(&[2.0, 10.0], f64::NAN, None), None);
    }
}
