use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::config::ChartConfig;
use crate::series::{ChartInput, SeriesPoint};

/// Highcharts options object.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions<'a> {
    pub title: Title<'a>,
    pub chart: Chart,
    pub legend: Legend,
    pub x_axis: XAxis,
    pub series: Vec<Series<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Title<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub zoom_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub layout: &'static str,
    pub align: &'static str,
    pub vertical_align: &'static str,
}

#[derive(Debug, Serialize)]
pub struct XAxis {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Series<'a> {
    pub name: &'static str,
    pub data: &'a [SeriesPoint],
}

impl<'a> ChartOptions<'a> {
    pub fn new(title: &'a str, input: &'a ChartInput) -> Self {
        ChartOptions {
            title: Title { text: title },
            chart: Chart { zoom_type: "x" },
            legend: Legend {
                layout: "vertical",
                align: "right",
                vertical_align: "middle",
            },
            x_axis: XAxis { kind: "datetime" },
            series: input
                .iter()
                .map(|(metric, data)| Series {
                    name: metric.name(),
                    data,
                })
                .collect(),
        }
    }
}

pub fn render_page(config: &ChartConfig, options: &ChartOptions) -> Result<String, anyhow::Error> {
    let options = serde_json::to_string(options)
        .context("Failed to serialize chart options")?
        .replace("</", "<\\/");
    let container = serde_json::to_string(&config.container_id)
        .context("Failed to serialize container id")?;

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{script_src}"></script>
</head>
<body>
<div id="{container_id}"></div>
<script>
Highcharts.chart({container}, {options});
</script>
</body>
</html>
"#,
        title = escape_html(&config.title),
        script_src = escape_html(&config.script_src),
        container_id = escape_html(&config.container_id),
    ))
}

pub fn write_page<P: AsRef<Path>>(path: P, html: &str) -> Result<(), anyhow::Error> {
    let path = path.as_ref();
    std::fs::write(path, html)
        .with_context(|| format!("Failed to write chart to {}", path.display()))?;
    Ok(())
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
