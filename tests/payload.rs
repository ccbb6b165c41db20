use wbi_bubbles::storage::{indicator_schema, render_data_js};
use wbi_bubbles::{Catalog, CuratedRecord};

fn landia() -> CuratedRecord {
    CuratedRecord {
        country: "Landia".into(),
        year: 2010,
        values: vec![("gni".into(), 1200.5), ("lifeexp".into(), 71.0)],
        region: Some("South Asia".into()),
        region_short_code: Some("Sou".into()),
    }
}

fn two_indicator_catalog() -> Catalog {
    let mut cat = Catalog::default();
    cat.indicators.truncate(2);
    cat.tooltip_only = None;
    cat
}

#[test]
fn data_js_defines_both_variables() {
    let js = render_data_js(&[landia()], &two_indicator_catalog()).unwrap();
    assert_eq!(
        js,
        concat!(
            r#"var data = [{"country":"Landia","year":2010,"gni":1200.5,"lifeexp":71.0,"region":"South Asia","regionvar":"Sou"}];"#,
            r#"var indicators = {"gni":{"type":"dollar","label":"GNI per capita, PPP (current international $)"},"lifeexp":{"type":"number","label":"Life Expectancy at Birth (years)"}};"#
        )
    );
}

#[test]
fn unmatched_region_serializes_as_null() {
    let mut r = landia();
    r.region = None;
    r.region_short_code = None;
    let v = serde_json::to_value(&r).unwrap();
    assert!(v["region"].is_null());
    assert!(v["regionvar"].is_null());
    assert_eq!(v["country"], "Landia");
}

#[test]
fn schema_follows_catalog_order() {
    let cat = Catalog::default();
    let json = serde_json::to_string(&indicator_schema(&cat)).unwrap();
    let positions: Vec<usize> = cat
        .names()
        .map(|n| json.find(&format!("\"{n}\":")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(json.contains(r#""pop":{"type":"number","label":"Population"}"#));
}

#[test]
fn payload_is_valid_json_after_stripping_assignments() {
    let js = render_data_js(&[landia(), landia()], &two_indicator_catalog()).unwrap();
    let (data, indicators) = js.split_once(";var indicators = ").unwrap();
    let data: serde_json::Value =
        serde_json::from_str(data.strip_prefix("var data = ").unwrap()).unwrap();
    let indicators: serde_json::Value =
        serde_json::from_str(indicators.strip_suffix(';').unwrap()).unwrap();
    assert_eq!(data.as_array().unwrap().len(), 2);
    assert_eq!(indicators["lifeexp"]["type"], "number");
}
