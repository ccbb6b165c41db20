use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use wbi_bubbles::{Client, PipelineConfig, YearRange};
use wbi_bubbles::{pipeline, storage};

#[derive(Parser, Debug)]
#[command(
    name = "wbi-bubbles",
    version,
    about = "Curate the latest complete World Bank indicators per country for a D3 bubble chart"
)]
struct Cli {
    /// JSON file with `catalog`, `years` and `source` (defaults apply to missing keys).
    #[arg(long)]
    config: Option<PathBuf>,
    /// First year to consider (overrides the config).
    #[arg(long)]
    start_year: Option<i32>,
    /// Last year to consider (overrides the config).
    #[arg(long)]
    end_year: Option<i32>,
    /// Source id (e.g., 2 for WDI). Fetches all indicators in one batched request.
    #[arg(long)]
    source: Option<u32>,
    /// Directory receiving data.js and index.html.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// API base URL.
    #[arg(long, default_value = wbi_bubbles::api::DEFAULT_BASE_URL)]
    base_url: String,
    /// Also export the curated records as CSV (written together with the chart assets).
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Also export the curated records as pretty JSON (written together with the chart assets).
    #[arg(long)]
    json: Option<PathBuf>,
}

fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    config.years = YearRange {
        start: cli.start_year.unwrap_or(config.years.start),
        end: cli.end_year.unwrap_or(config.years.end),
    };
    if cli.source.is_some() {
        config.source = cli.source;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let client = Client::with_base_url(&cli.base_url)?;
    let records = pipeline::curate(&client, &config).context("curation failed")?;
    let today = chrono::Local::now().date_naive();

    let mut exports = Vec::new();
    if let Some(path) = cli.csv.as_ref() {
        exports.push((path.clone(), storage::render_csv(&records, &config.catalog)?));
    }
    if let Some(path) = cli.json.as_ref() {
        exports.push((path.clone(), storage::render_json(&records)?));
    }
    let export_paths: Vec<PathBuf> = exports.iter().map(|(p, _)| p.clone()).collect();

    let paths =
        pipeline::write_outputs_with_exports(&records, &config, &cli.out_dir, today, exports)
            .with_context(|| format!("write outputs to {}", cli.out_dir.display()))?;
    eprintln!(
        "Wrote {} records to {} and {}",
        records.len(),
        paths.data_js.display(),
        paths.index_html.display()
    );
    for path in export_paths {
        eprintln!("Saved {} rows to {}", records.len(), path.display());
    }

    Ok(())
}
