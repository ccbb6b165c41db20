#![allow(dead_code)]

use wbi_bubbles::error::{Error, Result};
use wbi_bubbles::{
    Catalog, ClassificationEntry, IndicatorDef, ObservationSeries, Provider, ValueType, YearRange,
};

/// In-memory provider: fixed classification and (country, year, indicator, value) cells.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    pub classifications: Vec<ClassificationEntry>,
    pub cells: Vec<(String, i32, String, f64)>,
    pub fail_observations: bool,
}

impl StaticProvider {
    pub fn classify(mut self, country: &str, region: &str) -> Self {
        self.classifications.push(ClassificationEntry {
            country_name: country.into(),
            region: region.into(),
        });
        self
    }

    pub fn cell(mut self, country: &str, year: i32, indicator: &str, value: f64) -> Self {
        self.cells
            .push((country.into(), year, indicator.into(), value));
        self
    }

    /// One complete row for `country` in `year` across `names`.
    pub fn row(mut self, country: &str, year: i32, names: &[&str], value: f64) -> Self {
        for n in names {
            self = self.cell(country, year, n, value);
        }
        self
    }
}

impl Provider for StaticProvider {
    fn fetch_classifications(&self) -> Result<Vec<ClassificationEntry>> {
        Ok(self.classifications.clone())
    }

    fn fetch_observations(
        &self,
        _catalog: &Catalog,
        years: YearRange,
        _source: Option<u32>,
    ) -> Result<ObservationSeries> {
        if self.fail_observations {
            return Err(Error::ProviderFetch {
                url: "mem://observations".into(),
                message: "connection refused".into(),
            });
        }
        let mut series = ObservationSeries::new(years);
        for (c, y, i, v) in &self.cells {
            series.insert(c, *y, i, *v);
        }
        Ok(series)
    }
}

/// Catalog of plain-number indicators; the last one named `pop` is tooltip-only if present.
pub fn catalog(names: &[&str]) -> Catalog {
    Catalog {
        indicators: names
            .iter()
            .map(|n| IndicatorDef::new(n, &format!("CODE.{}", n.to_uppercase()), ValueType::Number, &format!("{n} label")))
            .collect(),
        tooltip_only: names.contains(&"pop").then(|| "pop".to_string()),
    }
}

pub fn years(start: i32, end: i32) -> YearRange {
    YearRange { start, end }
}
