//! Axis-selection controls and the static `index.html` that hosts the chart.

use crate::annotate::region_short_code;
use crate::catalog::Catalog;
use chrono::NaiveDate;

/// Regions offered as filter checkboxes, all checked on load.
pub const CANONICAL_REGIONS: [&str; 7] = [
    "East Asia & Pacific",
    "Europe & Central Asia",
    "Latin America & Caribbean",
    "Middle East & North Africa",
    "North America",
    "South Asia",
    "Sub-Saharan Africa",
];

pub const DATA_SCRIPT: &str = "data.js";
pub const CHART_SCRIPT: &str = "D3bubbleplot.js";

/// One `<option>` of an axis selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlOption {
    pub value: String,
    pub label: String,
}

/// The x- and y-axis selectors, each listing every selectable indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisControls {
    pub x: Vec<ControlOption>,
    pub y: Vec<ControlOption>,
}

/// Options for the axis selectors, in catalog order, skipping the tooltip-only indicator.
pub fn control_options(catalog: &Catalog) -> AxisControls {
    let options: Vec<ControlOption> = catalog
        .selectable()
        .map(|i| ControlOption {
            value: i.name.clone(),
            label: i.label.clone(),
        })
        .collect();
    AxisControls {
        x: options.clone(),
        y: options,
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_select(html: &mut String, id: &str, caption: &str, options: &[ControlOption]) {
    html.push_str("      <div class=\"form-block\">\n");
    html.push_str(&format!("        <label for=\"{id}\">{caption}</label>\n"));
    html.push_str(&format!(
        "        <select id=\"{id}\" name=\"{id}_select\" class=\"form-control\">\n"
    ));
    html.push_str(
        "          <option value=\"empty\" selected disabled style=\"display: none;\">Select an option</option>\n",
    );
    for o in options {
        html.push_str(&format!(
            "          <option value=\"{}\">{}</option>\n",
            escape_html(&o.value),
            escape_html(&o.label)
        ));
    }
    html.push_str("        </select>\n");
    html.push_str("      </div>\n");
}

fn push_region_filters(html: &mut String) {
    html.push_str("      <div class=\"form-block\">\n");
    html.push_str("        <label for=\"regionCheck\">Regions</label>\n");
    html.push_str("        <fieldset id=\"regionCheck\" class=\"form-control\">\n");
    for (i, region) in CANONICAL_REGIONS.iter().enumerate() {
        let code = region_short_code(region);
        let sep = if i + 1 < CANONICAL_REGIONS.len() { "<br>" } else { "" };
        html.push_str(&format!(
            "          <input class=\"regionFilter\" type=\"checkbox\" id=\"{code}\" value=\"{code}\" checked><label for=\"{code}\">{}</label>{sep}\n",
            escape_html(region)
        ));
    }
    html.push_str("        </fieldset>\n");
    html.push_str("      </div>\n");
}

/// Render the full page. `retrieved` is stamped into the footnote as DD/MM/YYYY.
pub fn render_index_html(catalog: &Catalog, retrieved: NaiveDate) -> String {
    let controls = control_options(catalog);
    let mut html = String::new();
    html.push_str(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>World Bank Indicators</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/normalize/3.0.2/normalize.min.css" />
  <link rel="stylesheet" type="text/css" href="styles.css">
  <script src="https://d3js.org/d3.v3.min.js" charset="utf-8"></script>
</head>
<body>
  <div id="page-wrapper">
    <div id="controls-wrapper">
      <h1>Plot Controls</h1>
      <hr>
"#,
    );
    push_select(&mut html, "xvar", "Variable on X axis", &controls.x);
    push_select(&mut html, "yvar", "Variable on Y axis", &controls.y);
    push_region_filters(&mut html);
    html.push_str(
        r#"      <div class="form-block">
        <input id="labelsCheck" type="checkbox" class="form-control" checked><label for="labelsCheck">Labels</label><br>
      </div>
      <div class="form-block">
        <label for="labelsSize">Label Size</label><br>
        <input id="labelsSize" type="range" value="10" min="6" max="16" step="2" class="form-control">
      </div>
    </div>
    <div id="chart-wrapper">
      <div id="chart-div">
        <div id="tooltip">
          <p id="countryname"></p>
          <p>Population: <span id="pop"></span></p>
          <p id="xvartip"></p>
          <p id="yvartip"></p>
        </div>
      </div>
"#,
    );
    html.push_str(&format!(
        "      <p id=\"footnote\">Data from World Bank Open Data: <a href=\"https://data.worldbank.org\" target=\"_blank\">https://data.worldbank.org</a>. Retrieved on {}.</p>\n",
        retrieved.format("%d/%m/%Y")
    ));
    html.push_str("    </div>\n  </div>\n");
    html.push_str(&format!("  <script src=\"{DATA_SCRIPT}\"></script>\n"));
    html.push_str(&format!("  <script src=\"{CHART_SCRIPT}\"></script>\n"));
    html.push_str("</body>\n</html>\n");
    html
}
