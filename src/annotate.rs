//! Region join and aggregate removal.

use crate::models::{ClassificationEntry, CuratedRecord, SelectedRow};
use log::warn;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Region label the provider uses for multi-country groupings ("Arab World", ...).
pub const AGGREGATE_REGION: &str = "Aggregates";

/// Number of leading characters of the region kept as its short code.
pub const SHORT_CODE_LEN: usize = 3;

/// First [`SHORT_CODE_LEN`] characters of a region label.
pub fn region_short_code(region: &str) -> String {
    region.chars().take(SHORT_CODE_LEN).collect()
}

/// Left-join selected rows with the classification by exact country name.
///
/// Countries without a classification entry are kept with `region: None`.
/// If the classification lists a name twice, the first entry wins.
pub fn annotate(
    selected: BTreeMap<String, SelectedRow>,
    classifications: &[ClassificationEntry],
) -> Vec<CuratedRecord> {
    let mut regions: BTreeMap<&str, &str> = BTreeMap::new();
    for c in classifications {
        match regions.entry(c.country_name.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(c.region.as_str());
            }
            Entry::Occupied(_) => {
                warn!("duplicate classification entry for '{}'", c.country_name);
            }
        }
    }

    selected
        .into_iter()
        .map(|(country, row)| {
            let region = regions.get(country.as_str()).map(|r| r.to_string());
            if region.is_none() {
                warn!("no classification for '{country}', region left empty");
            }
            CuratedRecord {
                region_short_code: region.as_deref().map(region_short_code),
                country,
                year: row.year,
                values: row.values,
                region,
            }
        })
        .collect()
}

/// Drop records classified as [`AGGREGATE_REGION`]. Unclassified records stay.
pub fn filter_aggregates(records: Vec<CuratedRecord>) -> Vec<CuratedRecord> {
    records
        .into_iter()
        .filter(|r| r.region.as_deref() != Some(AGGREGATE_REGION))
        .collect()
}
