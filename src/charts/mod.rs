//! Charts module - Plotly figures and rendering

pub(crate) mod figure;
mod regions;
mod renderer;
mod theme;

pub use figure::Figure;
pub use renderer::{ChartEncoding, ChartError, ChartKind, ChartRenderer};
pub use theme::{ColorScale, Template};
