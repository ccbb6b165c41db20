//! The curation run: fetch → select → annotate → filter, then write both assets.
//!
//! Stages run strictly in sequence. Every output is rendered in memory before
//! anything touches the filesystem, so a failed run leaves no partial output.

use crate::annotate::{annotate, filter_aggregates};
use crate::api::Provider;
use crate::catalog::PipelineConfig;
use crate::error::Result;
use crate::models::CuratedRecord;
use crate::page::{self, DATA_SCRIPT};
use crate::select::latest_complete_rows;
use crate::storage;
use chrono::NaiveDate;
use log::info;
use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "index.html";

/// Fetch from `provider` and produce the final record set, ordered by country name.
pub fn curate<P: Provider + ?Sized>(
    provider: &P,
    config: &PipelineConfig,
) -> Result<Vec<CuratedRecord>> {
    config.validate()?;

    let classifications = provider.fetch_classifications()?;
    let series = provider.fetch_observations(&config.catalog, config.years, config.source)?;
    info!(
        "fetched {} classification entries and observations for {} entities",
        classifications.len(),
        series.country_count()
    );

    let selected = latest_complete_rows(&series, &config.catalog);
    info!("{} entities have a complete year", selected.len());

    let annotated = annotate(selected, &classifications);
    let records = filter_aggregates(annotated);
    info!("{} records after removing aggregates", records.len());
    Ok(records)
}

/// Paths of the files written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub data_js: PathBuf,
    pub index_html: PathBuf,
}

/// Write `data.js` and `index.html` into `out_dir`.
pub fn write_outputs(
    records: &[CuratedRecord],
    config: &PipelineConfig,
    out_dir: &Path,
    retrieved: NaiveDate,
) -> Result<OutputPaths> {
    write_outputs_with_exports(records, config, out_dir, retrieved, Vec::new())
}

/// Like [`write_outputs`], committing already rendered `exports` in the same
/// all-or-nothing step.
pub fn write_outputs_with_exports(
    records: &[CuratedRecord],
    config: &PipelineConfig,
    out_dir: &Path,
    retrieved: NaiveDate,
    exports: Vec<(PathBuf, String)>,
) -> Result<OutputPaths> {
    let js = storage::render_data_js(records, &config.catalog)?;
    let html = page::render_index_html(&config.catalog, retrieved);

    let paths = OutputPaths {
        data_js: out_dir.join(DATA_SCRIPT),
        index_html: out_dir.join(INDEX_FILE),
    };
    let mut files = vec![
        (paths.data_js.clone(), js),
        (paths.index_html.clone(), html),
    ];
    files.extend(exports);
    storage::write_all_or_nothing(&files)?;
    Ok(paths)
}

/// [`curate`] followed by [`write_outputs`].
pub fn run<P: Provider + ?Sized>(
    provider: &P,
    config: &PipelineConfig,
    out_dir: &Path,
    retrieved: NaiveDate,
) -> Result<(Vec<CuratedRecord>, OutputPaths)> {
    let records = curate(provider, config)?;
    let paths = write_outputs(&records, config, out_dir, retrieved)?;
    Ok((records, paths))
}
