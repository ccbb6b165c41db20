//! Synchronous client for the **World Bank Indicators API (v2)**.
//!
//! Two endpoints are used: `country` (names and region classification for every
//! country and aggregate) and `country/all/indicator/{codes}` (observations).
//! Both return `[Meta, [record, ...]]`; pagination is followed until
//! `meta.pages` is reached.
//!
//! ### Notes
//! - The API sometimes serializes `per_page` as a **string**; we accept both string/number.
//! - Requesting **multiple indicators** in one call requires a `source` id
//!   (e.g. `2` for WDI). Without one, each indicator is fetched separately.
//! - Each request is issued exactly once. A failure aborts the run.
//!
//! Typical usage:
//! ```no_run
//! # use wbi_bubbles::{Client, PipelineConfig, Provider};
//! let client = Client::new()?;
//! let cfg = PipelineConfig::default();
//! let regions = client.fetch_classifications()?;
//! let series = client.fetch_observations(&cfg.catalog, cfg.years, cfg.source)?;
//! # Ok::<(), wbi_bubbles::Error>(())
//! ```

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::models::{ClassificationEntry, CountryRecord, Entry, Meta, ObservationSeries, YearRange};
use log::{debug, info};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";

/// Large enough that the country list fits in a single page.
const COUNTRY_PAGE_SIZE: u32 = 500;
const OBSERVATION_PAGE_SIZE: u32 = 1000;

// Safety cap to avoid pathological jobs
const MAX_PAGES: u32 = 1000;

static INCOME_QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" \(all income levels\)").expect("static regex"));

/// Source of classification and observation data.
///
/// [`Client`] talks to the World Bank; tests substitute in-memory providers.
pub trait Provider {
    /// Every country/entity the provider knows, with its region already normalized.
    fn fetch_classifications(&self) -> Result<Vec<ClassificationEntry>>;

    /// Observations for all countries and every catalog indicator within `years`.
    fn fetch_observations(
        &self,
        catalog: &Catalog,
        years: YearRange,
        source: Option<u32>,
    ) -> Result<ObservationSeries>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

// Allow -, _, . unescaped in codes (common for indicator ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc_join<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(|s| percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string())
        .collect::<Vec<_>>()
        .join(";")
}

/// Strip the "(all income levels)" qualifier the API appends to some region names.
pub fn normalize_region(raw: &str) -> String {
    INCOME_QUALIFIER.replace_all(raw, "").into_owned()
}

/// Split one API response into its metadata and records.
///
/// A response whose first element carries a `message` key is an API error.
/// A missing or `null` second element means the page has no records.
pub fn parse_page<T: DeserializeOwned>(url: &str, v: &Value) -> Result<(Meta, Vec<T>)> {
    let arr = v
        .as_array()
        .ok_or_else(|| Error::payload(url, "not a top-level array"))?;
    let first = arr
        .first()
        .ok_or_else(|| Error::payload(url, "empty array"))?;
    if first.get("message").is_some() {
        return Err(Error::payload(url, format!("world bank api error: {first}")));
    }
    let meta: Meta = serde_json::from_value(first.clone())
        .map_err(|e| Error::payload(url, format!("parse meta: {e}")))?;
    let records = match arr.get(1) {
        None | Some(Value::Null) => Vec::new(),
        Some(records) => serde_json::from_value(records.clone())
            .map_err(|e| Error::payload(url, format!("parse records: {e}")))?,
    };
    Ok((meta, records))
}

/// Turn raw country records into classification entries with normalized regions.
pub fn classifications_from_records(records: Vec<CountryRecord>) -> Vec<ClassificationEntry> {
    records
        .into_iter()
        .map(|r| ClassificationEntry {
            country_name: r.name,
            region: normalize_region(&r.region.value),
        })
        .collect()
}

/// Fold raw observations into `series`, keyed by country name and catalog name.
///
/// Null values are skipped (they are "missing"), as are years outside the
/// series window. Returns the number of values stored.
pub fn add_entries(
    series: &mut ObservationSeries,
    catalog: &Catalog,
    entries: &[Entry],
    url: &str,
) -> Result<usize> {
    let mut stored = 0;
    for e in entries {
        let Some(value) = e.value else { continue };
        let year = e.date.trim().parse::<i32>().map_err(|_| {
            Error::payload(url, format!("unparsable year '{}' for {}", e.date, e.country.value))
        })?;
        let def = catalog.by_source_code(&e.indicator.id).ok_or_else(|| {
            Error::payload(url, format!("indicator '{}' was not requested", e.indicator.id))
        })?;
        if series.insert(&e.country.value, year, &def.name, value) {
            stored += 1;
        } else {
            debug!("dropping {} {} {}: outside {:?}", e.country.value, def.name, year, series.years());
        }
    }
    Ok(stored)
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let base_url: String = base_url.into();
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("wbi_bubbles/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::fetch(&base_url, format!("build http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {url}");
        let resp = self
            .http
            .get(url)
            .send()
            .map_err(|e| Error::fetch(url, e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Error::fetch(url, format!("HTTP {}", resp.status())));
        }
        resp.json()
            .map_err(|e| Error::payload(url, format!("decode json: {e}")))
    }

    /// Fetch every page of a listing endpoint. `url` must already carry a query string.
    fn get_all_pages<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let mut page = 1u32;
        let mut out: Vec<T> = Vec::new();
        loop {
            if page > MAX_PAGES {
                return Err(Error::payload(url, format!("page limit exceeded ({MAX_PAGES})")));
            }
            let page_url = format!("{url}&page={page}");
            let v = self.get_json(&page_url)?;
            let (meta, records) = parse_page::<T>(&page_url, &v)?;
            out.extend(records);
            if page >= meta.pages {
                break;
            }
            page += 1;
        }
        Ok(out)
    }
}

impl Provider for Client {
    fn fetch_classifications(&self) -> Result<Vec<ClassificationEntry>> {
        let url = format!(
            "{}/country?format=json&per_page={}",
            self.base_url, COUNTRY_PAGE_SIZE
        );
        let records: Vec<CountryRecord> = self.get_all_pages(&url)?;
        info!("fetched classification for {} entities", records.len());
        Ok(classifications_from_records(records))
    }

    fn fetch_observations(
        &self,
        catalog: &Catalog,
        years: YearRange,
        source: Option<u32>,
    ) -> Result<ObservationSeries> {
        let batches: Vec<Vec<&str>> = match source {
            Some(_) => vec![catalog.indicators.iter().map(|i| i.source_code.as_str()).collect()],
            None => catalog
                .indicators
                .iter()
                .map(|i| vec![i.source_code.as_str()])
                .collect(),
        };

        let mut series = ObservationSeries::new(years);
        for codes in batches {
            let mut url = format!(
                "{}/country/all/indicator/{}?format=json&per_page={}&date={}",
                self.base_url,
                enc_join(codes.iter().copied()),
                OBSERVATION_PAGE_SIZE,
                years.to_query_param()
            );
            if let Some(s) = source {
                url.push_str(&format!("&source={s}"));
            }
            let entries: Vec<Entry> = self.get_all_pages(&url)?;
            let stored = add_entries(&mut series, catalog, &entries, &url)?;
            info!("{}: {} observations, {} with values", codes.join(";"), entries.len(), stored);
        }
        Ok(series)
    }
}
