use std::collections::BTreeSet;

use crate::reading::Reading;

/// Keeps readings whose city or station name contains `text`, ignoring case.
///
/// Blank `text` keeps everything. Order is preserved.
pub fn filter_by_location<'a>(readings: &'a [Reading], text: &str) -> Vec<&'a Reading> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return readings.iter().collect();
    }
    readings
        .iter()
        .filter(|r| {
            r.city.to_lowercase().contains(&needle) || r.location.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Distinct city names, sorted, for quick-filter suggestions.
pub fn unique_cities(readings: &[Reading]) -> Vec<&str> {
    readings
        .iter()
        .map(|r| r.city.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
