//! Canonical ordering of facet values.

/// Sort `values` by their position in `priority`.
///
/// Values absent from `priority` come after every known value and keep their
/// relative order.
pub fn order_by_priority<T: PartialEq>(mut values: Vec<T>, priority: &[T]) -> Vec<T> {
    // sort_by_key is stable, so unknowns (all usize::MAX) keep input order
    values.sort_by_key(|v| {
        priority
            .iter()
            .position(|p| p == v)
            .unwrap_or(usize::MAX)
    });
    values
}

/// Remove duplicates while keeping the first occurrence of each value
pub fn dedup_stable<T: PartialEq>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ClimateScenario;

    #[test]
    fn test_known_values_follow_priority() {
        let values = vec![
            ClimateScenario::Ssp585,
            ClimateScenario::Ssp126,
            ClimateScenario::Ssp370,
        ];
        let ordered = order_by_priority(values, &ClimateScenario::ALL);
        assert_eq!(
            ordered,
            vec![
                ClimateScenario::Ssp126,
                ClimateScenario::Ssp370,
                ClimateScenario::Ssp585
            ]
        );
    }

    #[test]
    fn test_unknown_values_sort_last_in_input_order() {
        let values = vec!["zeta", "b", "alpha", "a"];
        let ordered = order_by_priority(values, &["a", "b"]);
        assert_eq!(ordered, vec!["a", "b", "zeta", "alpha"]);
    }

    #[test]
    fn test_dedup_stable() {
        assert_eq!(dedup_stable([3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
