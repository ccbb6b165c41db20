use std::io::Write;
use wbi_bubbles::{Error, PipelineConfig, ValueType, YearRange};

#[test]
fn empty_object_gives_reference_defaults() {
    let cfg = PipelineConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, PipelineConfig::default());
}

#[test]
fn custom_catalog_and_years() {
    let cfg = PipelineConfig::from_json_str(
        r#"{
          "catalog": {
            "indicators": [
              {"name":"gdp","source_code":"NY.GDP.PCAP.CD","value_type":"dollar","label":"GDP per capita"},
              {"name":"pop","source_code":"SP.POP.TOTL","value_type":"number","label":"Population"}
            ],
            "tooltip_only": "pop"
          },
          "years": {"start": 2015, "end": 2020},
          "source": 2
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.years, YearRange { start: 2015, end: 2020 });
    assert_eq!(cfg.source, Some(2));
    assert_eq!(cfg.catalog.indicators[0].value_type, ValueType::Dollar);
    assert_eq!(cfg.catalog.selectable().count(), 1);
}

#[test]
fn bad_value_type_is_a_config_error() {
    let err = PipelineConfig::from_json_str(
        r#"{"catalog":{"indicators":[{"name":"x","source_code":"X","value_type":"euro","label":"X"}]}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn empty_catalog_is_rejected() {
    let err = PipelineConfig::from_json_str(r#"{"catalog":{"indicators":[]}}"#).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn loads_from_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, r#"{{"years":{{"start":2000,"end":2001}}}}"#).unwrap();
    let cfg = PipelineConfig::from_json_file(f.path()).unwrap();
    assert_eq!(cfg.years, YearRange { start: 2000, end: 2001 });
}

#[test]
fn missing_file_is_an_io_error() {
    let err = PipelineConfig::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}
