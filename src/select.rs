//! Latest complete row per country.
//!
//! A row is complete when every catalog indicator has a value for that
//! (country, year). Each country keeps only its greatest complete year;
//! countries with no complete year are left out.

use crate::catalog::Catalog;
use crate::models::{ObservationSeries, SelectedRow};
use log::debug;
use std::collections::BTreeMap;

/// Pick, for each country, the most recent year in which every catalog
/// indicator is present.
pub fn latest_complete_rows(
    series: &ObservationSeries,
    catalog: &Catalog,
) -> BTreeMap<String, SelectedRow> {
    series
        .countries()
        .filter_map(|(country, years)| {
            let picked = years.iter().rev().find_map(|(&year, observed)| {
                catalog
                    .names()
                    .map(|name| observed.get(name).map(|v| (name.to_string(), *v)))
                    .collect::<Option<Vec<_>>>()
                    .map(|values| SelectedRow { year, values })
            });
            if picked.is_none() {
                debug!("{country}: no complete year, skipped");
            }
            picked.map(|row| (country.to_string(), row))
        })
        .collect()
}
