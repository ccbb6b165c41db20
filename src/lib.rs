//! wbi_bubbles
//!
//! Curates a cross-country World Bank snapshot for a D3 bubble chart. Pairs
//! with the `wbi-bubbles` CLI.
//!
//! ### Pipeline
//! - Fetch the region classification of every country and aggregate
//! - Fetch every catalog indicator for all countries over a year window
//! - Keep, per country, the latest year in which every indicator is present
//! - Attach the region and its 3-letter short code, drop aggregates
//! - Emit `data.js` (records + indicator schema) and `index.html` (controls)
//!
//! ### Example
//! ```no_run
//! use wbi_bubbles::{Client, PipelineConfig, pipeline};
//!
//! let client = Client::new()?;
//! let config = PipelineConfig::default();
//! let records = pipeline::curate(&client, &config)?;
//! let today = chrono::Local::now().date_naive();
//! pipeline::write_outputs(&records, &config, std::path::Path::new("."), today)?;
//! # Ok::<(), wbi_bubbles::Error>(())
//! ```

pub mod annotate;
pub mod api;
pub mod catalog;
pub mod error;
pub mod models;
pub mod page;
pub mod pipeline;
pub mod select;
pub mod storage;

pub use api::{Client, Provider};
pub use catalog::{Catalog, PipelineConfig};
pub use error::{Error, Result};
pub use models::{
    ClassificationEntry, CuratedRecord, IndicatorDef, ObservationSeries, ValueType, YearRange,
};
