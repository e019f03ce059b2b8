//! Dashboard module - view tree, selection state, event dispatch

pub mod catalog;
mod dispatch;
mod layout;
mod shell;
mod view;

pub use dispatch::DispatchTable;
pub use layout::{escape_html, LayoutNode};
pub use shell::{SelectorEvent, Shell};
pub use view::{ChartBinding, SelectorSpec};

use crate::charts::{ChartError, Figure};
use crate::data::Aggregator;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Dashboard {dashboard} references unknown column {column}")]
    UnknownColumn { dashboard: String, column: String },
    #[error("Dashboard {dashboard} has no layout slot {slot}")]
    MissingSlot { dashboard: String, slot: String },
    #[error("Unknown selector: {0}")]
    UnknownSelector(String),
    #[error("Unknown slot: {0}")]
    UnknownSlot(String),
    #[error("No selection change is being processed")]
    NotFiltering,
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Published content of one layout slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SlotContent {
    Caption { text: String },
    Figure { figure: Box<Figure> },
}

/// Static definition of one dashboard.
#[derive(Debug, Clone)]
pub struct DashboardSpec {
    pub id: String,
    pub title: String,
    pub aggregator: Aggregator,
    pub selectors: Vec<SelectorSpec>,
    pub charts: Vec<ChartBinding>,
    pub layout: LayoutNode,
}

impl DashboardSpec {
    pub fn selector(&self, id: &str) -> Option<&SelectorSpec> {
        self.selectors.iter().find(|s| s.id == id)
    }

    /// Every output slot, captions first, in declaration order.
    pub fn output_slots(&self) -> Vec<String> {
        self.selectors
            .iter()
            .map(|s| s.caption_slot.clone())
            .chain(self.charts.iter().map(|c| c.slot.clone()))
            .collect()
    }
}

/// A dashboard bound to its summarized table. Immutable after `build`.
#[derive(Debug, Clone)]
pub struct Dashboard {
    spec: DashboardSpec,
    table: Arc<DataFrame>,
    dispatch: DispatchTable,
}

impl Dashboard {
    /// Aggregate the observations for this dashboard and check every column and slot it uses.
    pub fn build(spec: DashboardSpec, observations: &DataFrame) -> Result<Self, DashboardError> {
        let table = spec.aggregator.aggregate(observations)?;
        Self::from_table(spec, table)
    }

    /// Bind an already summarized table.
    pub fn from_table(spec: DashboardSpec, table: DataFrame) -> Result<Self, DashboardError> {
        let available: BTreeSet<&str> = table
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        for chart in &spec.charts {
            if let Some(column) = chart.columns().into_iter().find(|c| !available.contains(c)) {
                return Err(DashboardError::UnknownColumn {
                    dashboard: spec.id.clone(),
                    column: column.to_string(),
                });
            }
        }

        let slots = spec.layout.slot_ids();
        if let Some(slot) = spec
            .output_slots()
            .into_iter()
            .find(|s| !slots.contains(&s.as_str()))
        {
            return Err(DashboardError::MissingSlot {
                dashboard: spec.id.clone(),
                slot,
            });
        }

        info!(
            dashboard = %spec.id,
            rows = table.height(),
            keys = ?spec.aggregator.keys(),
            target = spec.aggregator.target(),
            "summarized table ready"
        );

        let dispatch = DispatchTable::for_spec(&spec);
        Ok(Self {
            spec,
            table: Arc::new(table),
            dispatch,
        })
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn title(&self) -> &str {
        &self.spec.title
    }

    pub fn spec(&self) -> &DashboardSpec {
        &self.spec
    }

    pub fn table(&self) -> &DataFrame {
        &self.table
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::data::columns::*;
    use polars::prelude::*;

    /// Observations covering 2015-2019 for a handful of states.
    pub fn observations() -> DataFrame {
        let mut state = Vec::new();
        let mut ansi = Vec::new();
        let mut code = Vec::new();
        let mut year = Vec::new();
        let mut period = Vec::new();
        let mut stressor = Vec::new();
        let mut pct = Vec::new();

        let states = [
            ("Idaho", 16i64, "ID"),
            ("New York", 36, "NY"),
            ("New Mexico", 35, "NM"),
            ("Texas", 48, "TX"),
            ("Other States", 99, "OT"),
        ];
        for (s, (name, a, c)) in states.into_iter().enumerate() {
            for y in 2015i64..=2019 {
                for (p, per) in ["JAN THRU MAR", "APR THRU JUN"].into_iter().enumerate() {
                    for (k, st) in ["Varroa_mites", "Pests_excl_Varroa", "Disease"]
                        .into_iter()
                        .enumerate()
                    {
                        state.push(name);
                        ansi.push(a);
                        code.push(c);
                        year.push(y);
                        period.push(per);
                        stressor.push(st);
                        pct.push((s * 10 + k * 3 + p) as f64 + (y - 2015) as f64);
                    }
                }
            }
        }

        df!(
            STATE => state,
            ANSI => ansi,
            STATE_CODE => code,
            YEAR => year,
            PERIOD => period,
            AFFECTED_BY => stressor,
            PCT_IMPACTED => pct
        )
        .unwrap()
    }
}
