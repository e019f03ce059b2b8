//! Chart Renderer
//! Turns a filtered table into a figure with fixed encoding rules.
//!
//! Geometry:
//! - Bar: one trace, x/y straight from the table
//! - Line: one trace per distinct color value, first-appearance order
//! - Choropleth: one trace, rows with unrecognized region codes dropped

use crate::charts::figure::*;
use crate::charts::regions::{GeoScope, LocationMode};
use crate::charts::theme::{ColorScale, Template};
use polars::prelude::*;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Field not in table: {0}")]
    MissingField(String),
    #[error("Field is not numeric: {0}")]
    NonNumeric(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Geometry of a chart and the fields it is drawn from.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    Bar {
        x: String,
        y: String,
    },
    Line {
        x: String,
        y: String,
        color: Option<String>,
    },
    Choropleth {
        locations: String,
        value: String,
        mode: LocationMode,
        scope: GeoScope,
    },
}

impl ChartKind {
    pub fn bar(x: &str, y: &str) -> Self {
        ChartKind::Bar {
            x: x.to_string(),
            y: y.to_string(),
        }
    }

    pub fn line(x: &str, y: &str, color: Option<&str>) -> Self {
        ChartKind::Line {
            x: x.to_string(),
            y: y.to_string(),
            color: color.map(str::to_string),
        }
    }

    pub fn usa_choropleth(locations: &str, value: &str) -> Self {
        ChartKind::Choropleth {
            locations: locations.to_string(),
            value: value.to_string(),
            mode: LocationMode::UsaStates,
            scope: GeoScope::Usa,
        }
    }

    /// Table fields the geometry reads.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ChartKind::Bar { x, y } => vec![x.as_str(), y.as_str()],
            ChartKind::Line { x, y, color } => {
                let mut fields = vec![x.as_str(), y.as_str()];
                fields.extend(color.as_deref());
                fields
            }
            ChartKind::Choropleth {
                locations, value, ..
            } => vec![locations.as_str(), value.as_str()],
        }
    }
}

/// Fixed presentation parameters shared by every geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartEncoding {
    pub title: Option<String>,
    pub hover: Vec<String>,
    pub labels: BTreeMap<String, String>,
    pub template: Template,
    pub color_scale: ColorScale,
}

impl ChartEncoding {
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    pub fn with_color_scale(mut self, color_scale: ColorScale) -> Self {
        self.color_scale = color_scale;
        self
    }

    pub fn with_label(mut self, field: &str, label: &str) -> Self {
        self.labels.insert(field.to_string(), label.to_string());
        self
    }

    pub fn with_hover<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hover = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Display label of a field, falling back to the field name.
    pub fn label<'a>(&'a self, field: &'a str) -> &'a str {
        self.labels.get(field).map(String::as_str).unwrap_or(field)
    }

    /// Hover fields not already shown by the geometry, in declaration order.
    fn extra_hover<'a>(&'a self, shown: &[&str]) -> Vec<&'a str> {
        self.hover
            .iter()
            .map(String::as_str)
            .filter(|f| !shown.contains(f))
            .collect()
    }

    fn hover_parts(&self, extras: &[&str]) -> Vec<String> {
        extras
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{}=%{{customdata[{i}]}}", self.label(f)))
            .collect()
    }
}

/// Builds figures from filtered tables.
pub struct ChartRenderer;

impl ChartRenderer {
    pub fn render(
        kind: &ChartKind,
        encoding: &ChartEncoding,
        df: &DataFrame,
    ) -> Result<Figure, ChartError> {
        let mut figure = match kind {
            ChartKind::Bar { x, y } => Self::bar(x, y, encoding, df)?,
            ChartKind::Line { x, y, color } => Self::line(x, y, color.as_deref(), encoding, df)?,
            ChartKind::Choropleth {
                locations,
                value,
                mode,
                scope,
            } => Self::choropleth(locations, value, *mode, *scope, encoding, df)?,
        };
        figure.layout.title = encoding.title.as_deref().map(Title::new);
        Ok(figure)
    }

    fn bar(x: &str, y: &str, enc: &ChartEncoding, df: &DataFrame) -> Result<Figure, ChartError> {
        let xs = column_values(df, x)?;
        let ys = numeric_values(df, y)?;
        let extras = enc.extra_hover(&[x, y]);
        let customdata = custom_data(df, &extras, &(0..df.height()).collect::<Vec<_>>())?;

        let mut parts = vec![
            format!("{}=%{{x}}", enc.label(x)),
            format!("{}=%{{y}}", enc.label(y)),
        ];
        parts.extend(enc.hover_parts(&extras));

        let trace = Trace::Bar(BarTrace {
            x: xs,
            y: ys,
            name: String::new(),
            orientation: "v",
            marker: Marker {
                color: enc.template.trace_color(0),
            },
            customdata,
            hovertemplate: hover_template(&parts),
        });

        let mut layout = Layout::new(enc.template);
        layout.xaxis = Some(Axis {
            title: Title::new(enc.label(x)),
        });
        layout.yaxis = Some(Axis {
            title: Title::new(enc.label(y)),
        });
        layout.legend = Some(Legend {
            title: Title::new(""),
            tracegroupgap: 0,
        });
        layout.barmode = Some("relative");

        Ok(Figure {
            data: vec![trace],
            layout,
        })
    }

    fn line(
        x: &str,
        y: &str,
        color: Option<&str>,
        enc: &ChartEncoding,
        df: &DataFrame,
    ) -> Result<Figure, ChartError> {
        let xs = column_values(df, x)?;
        let ys = numeric_values(df, y)?;

        let mut shown = vec![x, y];
        shown.extend(color);
        let extras = enc.extra_hover(&shown);

        // Series in first-appearance order of their color value
        let series: Vec<(String, Vec<usize>)> = match color {
            Some(field) => {
                let keys = column_values(df, field)?;
                let mut order: Vec<(String, Vec<usize>)> = Vec::new();
                let mut index: HashMap<String, usize> = HashMap::new();
                for (row, key) in keys.iter().enumerate() {
                    let name = value_label(key);
                    let slot = *index.entry(name.clone()).or_insert_with(|| {
                        order.push((name, Vec::new()));
                        order.len() - 1
                    });
                    order[slot].1.push(row);
                }
                order
            }
            None => vec![(String::new(), (0..df.height()).collect())],
        };

        let mut data = Vec::with_capacity(series.len());
        for (i, (name, rows)) in series.into_iter().enumerate() {
            let mut parts = Vec::new();
            if let Some(field) = color {
                parts.push(format!("{}={}", enc.label(field), name));
            }
            parts.push(format!("{}=%{{x}}", enc.label(x)));
            parts.push(format!("{}=%{{y}}", enc.label(y)));
            parts.extend(enc.hover_parts(&extras));

            data.push(Trace::Scatter(LineTrace {
                x: pick(&xs, &rows),
                y: pick(&ys, &rows),
                mode: "lines",
                legendgroup: name.clone(),
                showlegend: color.is_some(),
                name,
                line: LineStyle {
                    color: enc.template.trace_color(i),
                    dash: "solid",
                },
                customdata: custom_data(df, &extras, &rows)?,
                hovertemplate: hover_template(&parts),
            }));
        }

        let mut layout = Layout::new(enc.template);
        layout.xaxis = Some(Axis {
            title: Title::new(enc.label(x)),
        });
        layout.yaxis = Some(Axis {
            title: Title::new(enc.label(y)),
        });
        layout.legend = Some(Legend {
            title: Title::new(color.map(|c| enc.label(c)).unwrap_or_default()),
            tracegroupgap: 0,
        });

        Ok(Figure { data, layout })
    }

    fn choropleth(
        locations: &str,
        value: &str,
        mode: LocationMode,
        scope: GeoScope,
        enc: &ChartEncoding,
        df: &DataFrame,
    ) -> Result<Figure, ChartError> {
        let codes = column_values(df, locations)?;
        let zs = numeric_values(df, value)?;

        let rows: Vec<usize> = codes
            .iter()
            .enumerate()
            .filter(|(_, code)| code.as_str().is_some_and(|c| mode.recognizes(c)))
            .map(|(row, _)| row)
            .collect();
        if rows.len() < codes.len() {
            debug!(
                dropped = codes.len() - rows.len(),
                field = locations,
                "rows with unrecognized region codes left off the map"
            );
        }

        let extras = enc.extra_hover(&[locations, value]);
        let mut parts = vec![format!("{}=%{{location}}", enc.label(locations))];
        parts.extend(enc.hover_parts(&extras));
        parts.push(format!("{}=%{{z}}", enc.label(value)));

        let trace = Trace::Choropleth(ChoroplethTrace {
            locations: rows.iter().map(|&r| value_label(&codes[r])).collect(),
            z: pick(&zs, &rows),
            locationmode: mode,
            geo: "geo",
            coloraxis: "coloraxis",
            name: String::new(),
            customdata: custom_data(df, &extras, &rows)?,
            hovertemplate: hover_template(&parts),
        });

        let mut layout = Layout::new(enc.template);
        layout.geo = Some(Geo {
            scope,
            domain: Domain::default(),
        });
        layout.coloraxis = Some(ColorAxis {
            colorscale: enc.color_scale,
            colorbar: ColorBar {
                title: Title::new(enc.label(value)),
            },
        });
        layout.legend = Some(Legend {
            title: Title::new(""),
            tracegroupgap: 0,
        });

        Ok(Figure {
            data: vec![trace],
            layout,
        })
    }
}

fn hover_template(parts: &[String]) -> String {
    format!("{}<extra></extra>", parts.join("<br>"))
}

fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn pick(values: &[Value], rows: &[usize]) -> Vec<Value> {
    rows.iter().map(|&r| values[r].clone()).collect()
}

/// Per-row hover values for `fields`; empty when there are no extra fields.
fn custom_data(
    df: &DataFrame,
    fields: &[&str],
    rows: &[usize],
) -> Result<Vec<Vec<Value>>, ChartError> {
    if fields.is_empty() {
        return Ok(Vec::new());
    }
    let columns = fields
        .iter()
        .map(|f| column_values(df, f))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows
        .iter()
        .map(|&r| columns.iter().map(|c| c[r].clone()).collect())
        .collect())
}

/// Column cells as JSON scalars. Integers stay integers so years render as `2015`.
fn column_values(df: &DataFrame, name: &str) -> Result<Vec<Value>, ChartError> {
    let column = df
        .column(name)
        .map_err(|_| ChartError::MissingField(name.to_string()))?;
    let dtype = column.dtype();

    let values: Vec<Value> = if dtype.is_integer() {
        let cast = column.cast(&DataType::Int64)?;
        cast.i64()?
            .into_iter()
            .map(|v| v.map(Value::from).unwrap_or(Value::Null))
            .collect()
    } else if dtype.is_float() {
        let cast = column.cast(&DataType::Float64)?;
        cast.f64()?
            .into_iter()
            .map(|v| v.map(Value::from).unwrap_or(Value::Null))
            .collect()
    } else {
        let cast = column.cast(&DataType::String)?;
        cast.str()?
            .into_iter()
            .map(|v| v.map(Value::from).unwrap_or(Value::Null))
            .collect()
    };
    Ok(values)
}

fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Value>, ChartError> {
    let column = df
        .column(name)
        .map_err(|_| ChartError::MissingField(name.to_string()))?;
    if !(column.dtype().is_integer() || column.dtype().is_float()) {
        return Err(ChartError::NonNumeric(name.to_string()));
    }
    column_values(df, name)
}
