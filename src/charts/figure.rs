//! Declarative chart description, serialized in the Plotly JSON schema.

use crate::charts::regions::{GeoScope, LocationMode};
use crate::charts::theme::{ColorScale, Template};
use serde::Serialize;
use serde_json::Value;

/// A complete chart: traces plus layout. Rebuilt from scratch on every selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// Number of plotted points across all traces.
    pub fn point_count(&self) -> usize {
        self.data.iter().map(Trace::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    Scatter(LineTrace),
    Choropleth(ChoroplethTrace),
}

impl Trace {
    fn len(&self) -> usize {
        match self {
            Trace::Bar(t) => t.x.len(),
            Trace::Scatter(t) => t.x.len(),
            Trace::Choropleth(t) => t.locations.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub x: Vec<Value>,
    pub y: Vec<Value>,
    pub name: String,
    pub orientation: &'static str,
    pub marker: Marker,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub customdata: Vec<Vec<Value>>,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    pub x: Vec<Value>,
    pub y: Vec<Value>,
    pub mode: &'static str,
    pub name: String,
    pub legendgroup: String,
    pub showlegend: bool,
    pub line: LineStyle,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub customdata: Vec<Vec<Value>>,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    pub locations: Vec<String>,
    pub z: Vec<Value>,
    pub locationmode: LocationMode,
    pub geo: &'static str,
    pub coloraxis: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub customdata: Vec<Vec<Value>>,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
    pub dash: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
    pub tracegroupgap: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geo {
    pub scope: GeoScope,
    pub domain: Domain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Domain {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            x: [0.0, 1.0],
            y: [0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorAxis {
    pub colorscale: ColorScale,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub template: Template,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coloraxis: Option<ColorAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    pub margin: Margin,
}

impl Layout {
    pub fn new(template: Template) -> Self {
        Self {
            template,
            title: None,
            xaxis: None,
            yaxis: None,
            legend: None,
            geo: None,
            coloraxis: None,
            barmode: None,
            margin: Margin { t: 60 },
        }
    }
}
