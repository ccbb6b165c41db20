use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// How an indicator's values should be formatted by the chart client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Number,
    Dollar,
    Percent,
}

/// One entry of the indicator catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorDef {
    /// Short key used in the emitted records (e.g. `"gni"`).
    pub name: String,
    /// World Bank indicator id (e.g. `"NY.GNP.PCAP.PP.CD"`).
    pub source_code: String,
    pub value_type: ValueType,
    pub label: String,
}

impl IndicatorDef {
    pub fn new(name: &str, source_code: &str, value_type: ValueType, label: &str) -> Self {
        Self {
            name: name.into(),
            source_code: source_code.into(),
            value_type,
            label: label.into(),
        }
    }
}

/// Inclusive year window for the time-series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    pub fn to_query_param(&self) -> String {
        format!("{}:{}", self.start, self.end)
    }
}

/// Metadata section returned by the API (position 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub page: u32,
    pub pages: u32,
    /// Some responses encode `per_page` as a string, others as a number.
    /// Accept both and normalize to `u32`.
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub per_page: u32,
    pub total: u32,
}

/// Serde helper: parse `u32` from either a JSON number or a string.
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a non-negative number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(|_| E::custom("value out of range for u32"))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<u32>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeName {
    pub id: String,
    pub value: String,
}

/// Raw observation from the indicator endpoint (position 1 array).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub indicator: CodeName,
    pub country: CodeName,
    #[serde(default)]
    pub countryiso3code: String,
    pub date: String,
    pub value: Option<f64>,
}

/// Raw country record from the `country` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryRecord {
    pub id: String,
    pub name: String,
    pub region: CodeName,
}

/// Country name and its (normalized) region label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    pub country_name: String,
    pub region: String,
}

/// Observed values keyed by country, then year, then indicator name.
///
/// Only years inside the configured window are ever stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    years: YearRange,
    rows: BTreeMap<String, BTreeMap<i32, BTreeMap<String, f64>>>,
}

impl ObservationSeries {
    pub fn new(years: YearRange) -> Self {
        Self {
            years,
            rows: BTreeMap::new(),
        }
    }

    pub fn years(&self) -> YearRange {
        self.years
    }

    /// Record one value. Returns `false` (and stores nothing) when the year is
    /// outside the window.
    pub fn insert(&mut self, country: &str, year: i32, indicator: &str, value: f64) -> bool {
        if !self.years.contains(year) {
            return false;
        }
        self.rows
            .entry(country.to_string())
            .or_default()
            .entry(year)
            .or_default()
            .insert(indicator.to_string(), value);
        true
    }

    /// Value for one (country, year, indicator) cell, if observed.
    pub fn get(&self, country: &str, year: i32, indicator: &str) -> Option<f64> {
        self.rows.get(country)?.get(&year)?.get(indicator).copied()
    }

    /// Countries in name order, each with its rows in ascending year order.
    pub fn countries(&self) -> impl Iterator<Item = (&str, &BTreeMap<i32, BTreeMap<String, f64>>)> {
        self.rows.iter().map(|(c, years)| (c.as_str(), years))
    }

    pub fn country_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The row chosen for one country: its latest year with every indicator present.
/// `values` follows catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRow {
    pub year: i32,
    pub values: Vec<(String, f64)>,
}

/// A fully curated record, ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct CuratedRecord {
    pub country: String,
    pub year: i32,
    /// One value per catalog indicator, in catalog order.
    pub values: Vec<(String, f64)>,
    /// `None` when the country had no classification entry.
    pub region: Option<String>,
    pub region_short_code: Option<String>,
}

impl CuratedRecord {
    pub fn value(&self, indicator: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == indicator)
            .map(|(_, v)| *v)
    }
}

/// Serializes as one flat object: `country`, `year`, each indicator, `region`,
/// `regionvar` (the key the bubble-plot client groups on).
impl Serialize for CuratedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 4))?;
        map.serialize_entry("country", &self.country)?;
        map.serialize_entry("year", &self.year)?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("region", &self.region)?;
        map.serialize_entry("regionvar", &self.region_short_code)?;
        map.end()
    }
}
