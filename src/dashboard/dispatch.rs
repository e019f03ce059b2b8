//! Event dispatch table: (selector id, event kind) to the handler and slots it refreshes.

use crate::charts::ChartRenderer;
use crate::dashboard::view::ViewState;
use crate::dashboard::{DashboardError, DashboardSpec, SlotContent};
use polars::prelude::DataFrame;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ValueChanged,
}

/// Everything a handler may read. Handlers never mutate it.
pub struct RenderContext<'a> {
    pub spec: &'a DashboardSpec,
    pub table: &'a DataFrame,
    pub view: &'a ViewState,
}

pub type SlotHandler = fn(&RenderContext<'_>, &str) -> Result<SlotContent, DashboardError>;

#[derive(Debug, Clone)]
pub struct Route {
    pub outputs: Vec<String>,
    pub handler: SlotHandler,
}

#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    routes: HashMap<(String, EventKind), Route>,
}

impl DispatchTable {
    /// One route per selector: its caption plus every chart filtered by it.
    pub fn for_spec(spec: &DashboardSpec) -> Self {
        let routes = spec
            .selectors
            .iter()
            .map(|selector| {
                let mut outputs = vec![selector.caption_slot.clone()];
                outputs.extend(
                    spec.charts
                        .iter()
                        .filter(|c| c.depends_on(&selector.id))
                        .map(|c| c.slot.clone()),
                );
                (
                    (selector.id.clone(), EventKind::ValueChanged),
                    Route {
                        outputs,
                        handler: render_slot,
                    },
                )
            })
            .collect();
        Self { routes }
    }

    pub fn route(&self, selector: &str, kind: EventKind) -> Option<&Route> {
        self.routes.get(&(selector.to_string(), kind))
    }
}

/// Rebuild one slot from the current selection.
pub fn render_slot(ctx: &RenderContext<'_>, slot: &str) -> Result<SlotContent, DashboardError> {
    if let Some(selector) = ctx.spec.selectors.iter().find(|s| s.caption_slot == slot) {
        let value = ctx
            .view
            .get(&selector.id)
            .cloned()
            .unwrap_or_else(|| selector.default.clone());
        return Ok(SlotContent::Caption {
            text: selector.caption(&value),
        });
    }

    let chart = ctx
        .spec
        .charts
        .iter()
        .find(|c| c.slot == slot)
        .ok_or_else(|| DashboardError::UnknownSlot(slot.to_string()))?;

    let query = chart.query(ctx.view);
    let rows = query.apply(ctx.table)?;
    let figure = ChartRenderer::render(&chart.kind, &chart.encoding, &rows)?;
    debug!(
        dashboard = %ctx.spec.id,
        slot,
        predicates = query.predicates().len(),
        rows = rows.height(),
        points = figure.point_count(),
        "chart rendered"
    );
    Ok(SlotContent::Figure {
        figure: Box::new(figure),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::catalog;

    #[test]
    fn routes_cover_caption_and_dependent_charts() {
        let table = DispatchTable::for_spec(&catalog::impact_dashboard());

        let year = table.route("slct_year", EventKind::ValueChanged).unwrap();
        assert_eq!(
            year.outputs,
            ["output_container_year", "bee_bar_plot", "bee_choropleth"]
        );

        let impact = table.route("slct_impact", EventKind::ValueChanged).unwrap();
        assert_eq!(impact.outputs, ["output_container_impact", "bee_line_plot"]);

        assert!(table.route("slct_period", EventKind::ValueChanged).is_none());
    }
}
