//! Indicator catalog and run configuration.
//!
//! The default configuration reproduces the reference chart: seven health and
//! income indicators plus population (tooltip only), years 2005 through 2013.

use crate::error::{Error, Result};
use crate::models::{IndicatorDef, ValueType, YearRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Record keys the serializer writes itself; indicators may not reuse them.
const RESERVED_NAMES: [&str; 4] = ["country", "year", "region", "regionvar"];

/// Ordered set of indicators to fetch and emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub indicators: Vec<IndicatorDef>,
    /// Name of an indicator that is fetched and required like the others but
    /// only shown in the tooltip, never offered as an axis.
    #[serde(default)]
    pub tooltip_only: Option<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        use ValueType::*;
        Self {
            indicators: vec![
                IndicatorDef::new(
                    "gni",
                    "NY.GNP.PCAP.PP.CD",
                    Dollar,
                    "GNI per capita, PPP (current international $)",
                ),
                IndicatorDef::new(
                    "lifeexp",
                    "SP.DYN.LE00.IN",
                    Number,
                    "Life Expectancy at Birth (years)",
                ),
                IndicatorDef::new(
                    "under5",
                    "SH.DYN.MORT",
                    Number,
                    "Mortality Rate, under 5 (per 1,000 live births)",
                ),
                IndicatorDef::new(
                    "prenatal",
                    "SH.STA.ANVC.ZS",
                    Percent,
                    "Pregnant women receiving prenatal care (%)",
                ),
                IndicatorDef::new(
                    "impsan",
                    "SH.STA.ACSN",
                    Percent,
                    "Improved sanitation facilities (% of population with access)",
                ),
                IndicatorDef::new(
                    "dpt",
                    "SH.IMM.IDPT",
                    Percent,
                    "Immunization, DPT (% of children ages 12-23 months)",
                ),
                IndicatorDef::new(
                    "healthexp",
                    "SH.XPD.PCAP",
                    Dollar,
                    "Health expenditure per capita (current US$)",
                ),
                IndicatorDef::new("pop", "SP.POP.TOTL", Number, "Population"),
            ],
            tooltip_only: Some("pop".into()),
        }
    }
}

impl Catalog {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.indicators.iter().map(|i| i.name.as_str())
    }

    /// Indicators offered in the axis selection controls, in catalog order.
    pub fn selectable(&self) -> impl Iterator<Item = &IndicatorDef> {
        self.indicators
            .iter()
            .filter(move |i| self.tooltip_only.as_deref() != Some(i.name.as_str()))
    }

    /// Catalog entry for a World Bank indicator id.
    pub fn by_source_code(&self, code: &str) -> Option<&IndicatorDef> {
        self.indicators
            .iter()
            .find(|i| i.source_code.eq_ignore_ascii_case(code))
    }

    pub fn validate(&self) -> Result<()> {
        if self.indicators.is_empty() {
            return Err(Error::Config("catalog has no indicators".into()));
        }
        let mut names = BTreeSet::new();
        let mut codes = BTreeSet::new();
        for ind in &self.indicators {
            if ind.name.trim().is_empty() || ind.source_code.trim().is_empty() {
                return Err(Error::Config(
                    "indicator name and source code must be non-empty".into(),
                ));
            }
            if RESERVED_NAMES.contains(&ind.name.as_str()) {
                return Err(Error::Config(format!(
                    "indicator name '{}' collides with a record field",
                    ind.name
                )));
            }
            if !names.insert(ind.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate indicator name '{}'",
                    ind.name
                )));
            }
            if !codes.insert(ind.source_code.to_ascii_uppercase()) {
                return Err(Error::Config(format!(
                    "duplicate source code '{}'",
                    ind.source_code
                )));
            }
        }
        if let Some(t) = &self.tooltip_only
            && !names.contains(t.as_str())
        {
            return Err(Error::Config(format!(
                "tooltip_only '{t}' is not in the catalog"
            )));
        }
        Ok(())
    }
}

/// Everything the pipeline needs besides a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default = "default_years")]
    pub years: YearRange,
    /// World Bank source id. When set, all indicators are requested in one
    /// batched call; otherwise one request chain per indicator.
    #[serde(default)]
    pub source: Option<u32>,
}

fn default_years() -> YearRange {
    YearRange {
        start: 2005,
        end: 2013,
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            years: default_years(),
            source: None,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.years.start > self.years.end {
            return Err(Error::Config(format!(
                "start year {} is after end year {}",
                self.years.start, self.years.end
            )));
        }
        self.catalog.validate()
    }

    /// Load a JSON config file. Missing sections fall back to the defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: PipelineConfig =
            serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
