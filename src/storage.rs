//! Serialization of curated records for the chart client, plus CSV/JSON export.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::models::{CuratedRecord, ValueType};
use csv::WriterBuilder;
use log::warn;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Display metadata for one indicator as the chart client reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaEntry {
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub label: String,
}

/// Indicator name → [`SchemaEntry`], serialized as an object in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSchema(pub Vec<(String, SchemaEntry)>);

impl Serialize for IndicatorSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entry) in &self.0 {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

pub fn indicator_schema(catalog: &Catalog) -> IndicatorSchema {
    IndicatorSchema(
        catalog
            .indicators
            .iter()
            .map(|i| {
                (
                    i.name.clone(),
                    SchemaEntry {
                        value_type: i.value_type,
                        label: i.label.clone(),
                    },
                )
            })
            .collect(),
    )
}

/// Render the script-loadable payload: `var data = [...];var indicators = {...};`
pub fn render_data_js(records: &[CuratedRecord], catalog: &Catalog) -> Result<String> {
    let data = serde_json::to_string(records)?;
    let indicators = serde_json::to_string(&indicator_schema(catalog))?;
    Ok(format!("var data = {data};var indicators = {indicators};"))
}

pub(crate) fn write_text(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| Error::io(path, e))
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Write every `(path, contents)` pair or none of them.
///
/// Each file is staged as a temporary file next to its target and only
/// renamed into place once all of them are staged. If a rename fails, the
/// files already renamed by this call are removed again.
pub fn write_all_or_nothing(files: &[(PathBuf, String)]) -> Result<()> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, contents) in files {
        let mut tmp =
            NamedTempFile::new_in(parent_dir(path)).map_err(|e| Error::io(path, e))?;
        tmp.write_all(contents.as_bytes())
            .map_err(|e| Error::io(path, e))?;
        tmp.flush().map_err(|e| Error::io(path, e))?;
        staged.push((path, tmp));
    }

    let mut committed: Vec<&Path> = Vec::with_capacity(staged.len());
    for (path, tmp) in staged {
        if let Err(e) = tmp.persist(path) {
            for done in &committed {
                if let Err(rm) = std::fs::remove_file(done) {
                    warn!("could not remove {} after failed write: {rm}", done.display());
                }
            }
            return Err(Error::io(path, e.error));
        }
        committed.push(path);
    }
    Ok(())
}

/// Render and write `data.js`.
pub fn save_data_js<P: AsRef<Path>>(
    records: &[CuratedRecord],
    catalog: &Catalog,
    path: P,
) -> Result<()> {
    let js = render_data_js(records, catalog)?;
    write_text(path.as_ref(), &js)
}

/// Prefix text cells that a spreadsheet would evaluate as a formula.
fn neutralize_formula(cell: &str) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{cell}"),
        _ => cell.to_string(),
    }
}

/// Render curated records as CSV with the same columns as the chart payload.
pub fn render_csv(records: &[CuratedRecord], catalog: &Catalog) -> Result<String> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    let mut header = vec!["country".to_string(), "year".to_string()];
    header.extend(catalog.names().map(String::from));
    header.extend(["region".to_string(), "regionvar".to_string()]);
    wtr.write_record(&header)?;

    for r in records {
        let mut row = vec![neutralize_formula(&r.country), r.year.to_string()];
        for name in catalog.names() {
            row.push(r.value(name).map(|v| v.to_string()).unwrap_or_default());
        }
        row.push(r.region.as_deref().map(neutralize_formula).unwrap_or_default());
        row.push(
            r.region_short_code
                .as_deref()
                .map(neutralize_formula)
                .unwrap_or_default(),
        );
        wtr.write_record(&row)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Save curated records as CSV.
pub fn save_csv<P: AsRef<Path>>(
    records: &[CuratedRecord],
    catalog: &Catalog,
    path: P,
) -> Result<()> {
    let csv = render_csv(records, catalog)?;
    write_text(path.as_ref(), &csv)
}

/// Render curated records as a pretty JSON array.
pub fn render_json(records: &[CuratedRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Save curated records as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(records: &[CuratedRecord], path: P) -> Result<()> {
    write_text(path.as_ref(), &render_json(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record() -> CuratedRecord {
        CuratedRecord {
            country: "=Landia".into(),
            year: 2010,
            values: vec![("gni".into(), -1.5)],
            region: Some("South Asia".into()),
            region_short_code: Some("Sou".into()),
        }
    }

    #[test]
    fn csv_neutralizes_text_but_not_numbers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.csv");
        let cat = Catalog {
            indicators: vec![crate::models::IndicatorDef::new(
                "gni",
                "G",
                ValueType::Dollar,
                "GNI",
            )],
            tooltip_only: None,
        };
        save_csv(&[record()], &cat, &path).unwrap();
        let txt = std::fs::read_to_string(&path).unwrap();
        let mut lines = txt.lines();
        assert_eq!(lines.next(), Some("country,year,gni,region,regionvar"));
        assert_eq!(lines.next(), Some("'=Landia,2010,-1.5,South Asia,Sou"));
    }

    #[test]
    fn json_export_is_an_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.json");
        save_json(&[record()], &path).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v.as_array().unwrap().len(), 1);
        assert_eq!(v[0]["regionvar"], "Sou");
    }

    #[test]
    fn failed_commit_removes_files_already_written() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let blocked = dir.path().join("b.txt");
        std::fs::create_dir(&blocked).unwrap();

        let err = write_all_or_nothing(&[
            (first.clone(), "one".into()),
            (blocked.clone(), "two".into()),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(!first.exists());
        assert!(blocked.is_dir());
        // No staged temporaries are left behind either.
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, [std::ffi::OsString::from("b.txt")]);
    }

    #[test]
    fn commits_all_files() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        write_all_or_nothing(&[(a.clone(), "one".into()), (b.clone(), "two".into())]).unwrap();
        assert_eq!(std::fs::read_to_string(a).unwrap(), "one");
        assert_eq!(std::fs::read_to_string(b).unwrap(), "two");
    }
}
