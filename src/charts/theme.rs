//! Visual themes and color scales.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{json, Value};

/// Discrete trace colors, in the order traces receive them.
pub const COLORWAY: [&str; 10] = [
    "#636efa", // Blue
    "#EF553B", // Red
    "#00cc96", // Green
    "#ab63fa", // Purple
    "#FFA15A", // Orange
    "#19d3f3", // Cyan
    "#FF6692", // Pink
    "#B6E880", // Light Green
    "#FF97FF", // Light Pink
    "#FECB52", // Yellow
];

/// Page-level look of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Template {
    #[default]
    Plotly,
    PlotlyDark,
}

impl Template {
    /// Color assigned to the trace at `index`.
    pub fn trace_color(self, index: usize) -> &'static str {
        COLORWAY[index % COLORWAY.len()]
    }

    /// Layout defaults applied by the browser-side plotting library.
    pub fn layout_defaults(self) -> Value {
        let (paper, plot, font, grid, land, subunit) = match self {
            Template::Plotly => ("white", "#E5ECF6", "#2a3f5f", "white", "#E5ECF6", "white"),
            Template::PlotlyDark => (
                "rgb(17,17,17)",
                "rgb(17,17,17)",
                "#f2f5fa",
                "#283442",
                "rgb(17,17,17)",
                "#506784",
            ),
        };

        json!({
            "paper_bgcolor": paper,
            "plot_bgcolor": plot,
            "font": { "color": font },
            "colorway": COLORWAY,
            "hovermode": "closest",
            "xaxis": { "gridcolor": grid, "zerolinecolor": grid, "automargin": true },
            "yaxis": { "gridcolor": grid, "zerolinecolor": grid, "automargin": true },
            "geo": {
                "bgcolor": paper,
                "landcolor": land,
                "lakecolor": paper,
                "subunitcolor": subunit,
                "showland": true,
                "showlakes": true,
            },
        })
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("layout", &self.layout_defaults())?;
        map.end()
    }
}

/// Continuous color scale for value-shaded geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScale {
    #[default]
    Plasma,
    YlOrRd,
}

impl ColorScale {
    pub fn colors(self) -> &'static [&'static str] {
        match self {
            ColorScale::Plasma => &[
                "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953",
                "#fb9f3a", "#fdca26", "#f0f921",
            ],
            ColorScale::YlOrRd => &[
                "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c",
                "#bd0026", "#800026",
            ],
        }
    }

    /// Evenly spaced `[position, color]` stops from 0 to 1.
    pub fn stops(self) -> Vec<(f64, &'static str)> {
        let colors = self.colors();
        let last = (colors.len() - 1) as f64;
        colors
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as f64 / last, c))
            .collect()
    }
}

impl Serialize for ColorScale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.stops().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_scale_spans_unit_interval() {
        let stops = ColorScale::YlOrRd.stops();
        assert_eq!(stops.first(), Some(&(0.0, "#ffffcc")));
        assert_eq!(stops.last(), Some(&(1.0, "#800026")));
        assert_eq!(
            serde_json::to_value(ColorScale::YlOrRd).unwrap()[0],
            json!([0.0, "#ffffcc"])
        );
    }

    #[test]
    fn dark_template_has_dark_paper() {
        let value = serde_json::to_value(Template::PlotlyDark).unwrap();
        assert_eq!(value["layout"]["paper_bgcolor"], "rgb(17,17,17)");
        assert_eq!(Template::Plotly.trace_color(10), COLORWAY[0]);
    }
}
