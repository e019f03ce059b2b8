//! Presentation shell state machine.
//!
//! `Idle` -> `Filtering` on a selector change (or the initial render), then
//! `Rendered` once every bound slot has been rebuilt. A failed render drops back
//! to `Idle`. There is no terminal state.

use crate::dashboard::dispatch::{render_slot, EventKind, RenderContext, SlotHandler};
use crate::dashboard::view::ViewState;
use crate::dashboard::{Dashboard, DashboardError, SlotContent};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Recompute in progress. `None` is the initial render of every slot.
    Filtering { selector: Option<String> },
    Rendered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorEvent {
    pub selector: String,
    pub kind: EventKind,
    pub value: Value,
}

impl SelectorEvent {
    pub fn changed(selector: &str, value: Value) -> Self {
        Self {
            selector: selector.to_string(),
            kind: EventKind::ValueChanged,
            value,
        }
    }
}

/// Owns the selection of one dashboard view and drives its recomputes.
pub struct Shell<'a> {
    dashboard: &'a Dashboard,
    view: ViewState,
    phase: Phase,
}

impl<'a> Shell<'a> {
    pub fn new(dashboard: &'a Dashboard) -> Self {
        Self {
            dashboard,
            view: ViewState::defaults(&dashboard.spec().selectors),
            phase: Phase::Idle,
        }
    }

    /// Seed the selection from the values a client currently shows.
    /// Unknown ids are ignored; out-of-domain values fall back to defaults.
    pub fn with_inputs(dashboard: &'a Dashboard, inputs: &Map<String, Value>) -> Self {
        let mut shell = Self::new(dashboard);
        for selector in &dashboard.spec().selectors {
            if let Some(raw) = inputs.get(&selector.id) {
                shell.view.set(selector, raw);
            }
        }
        shell
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Render every slot from the current selection.
    pub fn render_all(&mut self) -> Result<BTreeMap<String, SlotContent>, DashboardError> {
        self.phase = Phase::Filtering { selector: None };
        self.complete()
    }

    /// Accept a selector event and move to `Filtering`.
    pub fn begin(&mut self, event: &SelectorEvent) -> Result<(), DashboardError> {
        let spec = self.dashboard.spec();
        let selector = spec
            .selector(&event.selector)
            .ok_or_else(|| DashboardError::UnknownSelector(event.selector.clone()))?;
        if self.dashboard.dispatch().route(&selector.id, event.kind).is_none() {
            return Err(DashboardError::UnknownSelector(event.selector.clone()));
        }

        let value = self.view.set(selector, &event.value);
        debug!(
            dashboard = %spec.id,
            selector = %selector.id,
            %value,
            "selection changed"
        );
        self.phase = Phase::Filtering {
            selector: Some(selector.id.clone()),
        };
        Ok(())
    }

    /// Run the pending recompute and move to `Rendered`, returning the refreshed slots.
    pub fn complete(&mut self) -> Result<BTreeMap<String, SlotContent>, DashboardError> {
        let Phase::Filtering { selector } = &self.phase else {
            return Err(DashboardError::NotFiltering);
        };

        let (outputs, handler) = match selector {
            Some(id) => {
                let route = self
                    .dashboard
                    .dispatch()
                    .route(id, EventKind::ValueChanged)
                    .ok_or_else(|| DashboardError::UnknownSelector(id.clone()))?;
                (route.outputs.clone(), route.handler)
            }
            None => (self.dashboard.spec().output_slots(), render_slot as SlotHandler),
        };

        let ctx = RenderContext {
            spec: self.dashboard.spec(),
            table: self.dashboard.table(),
            view: &self.view,
        };
        let rendered: Result<BTreeMap<_, _>, _> = outputs
            .into_iter()
            .map(|slot| handler(&ctx, &slot).map(|content| (slot, content)))
            .collect();

        match rendered {
            Ok(updates) => {
                self.phase = Phase::Rendered;
                Ok(updates)
            }
            Err(e) => {
                self.phase = Phase::Idle;
                Err(e)
            }
        }
    }

    /// `begin` then `complete`.
    pub fn handle(
        &mut self,
        event: &SelectorEvent,
    ) -> Result<BTreeMap<String, SlotContent>, DashboardError> {
        self.begin(event)?;
        self.complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::figure::Trace;
    use crate::dashboard::{catalog, fixtures};
    use crate::data::Scalar;
    use serde_json::json;

    fn impact() -> Dashboard {
        Dashboard::build(catalog::impact_dashboard(), &fixtures::observations()).unwrap()
    }

    fn figure<'m>(slots: &'m BTreeMap<String, SlotContent>, id: &str) -> &'m crate::charts::Figure {
        match slots.get(id) {
            Some(SlotContent::Figure { figure }) => &**figure,
            other => panic!("slot {id} is not a figure: {other:?}"),
        }
    }

    fn caption<'m>(slots: &'m BTreeMap<String, SlotContent>, id: &str) -> &'m str {
        match slots.get(id) {
            Some(SlotContent::Caption { text }) => text.as_str(),
            other => panic!("slot {id} is not a caption: {other:?}"),
        }
    }

    #[test]
    fn initial_render_uses_defaults_for_every_slot() {
        let dashboard = impact();
        let mut shell = Shell::new(&dashboard);
        assert_eq!(shell.phase(), &Phase::Idle);

        let slots = shell.render_all().unwrap();

        assert_eq!(shell.phase(), &Phase::Rendered);
        assert_eq!(slots.len(), 5);
        assert_eq!(
            caption(&slots, "output_container_impact"),
            "The bee-killer chosen by the user was: Other"
        );
        assert_eq!(
            caption(&slots, "output_container_year"),
            "The year chosen by the user was: 2015"
        );
    }

    #[test]
    fn year_change_refreshes_only_year_bound_slots() {
        let dashboard = impact();
        let mut shell = Shell::new(&dashboard);
        shell.render_all().unwrap();

        let event = SelectorEvent::changed("slct_year", json!(2017));
        shell.begin(&event).unwrap();
        assert_eq!(
            shell.phase(),
            &Phase::Filtering {
                selector: Some("slct_year".into())
            }
        );

        let updates = shell.complete().unwrap();
        assert_eq!(shell.phase(), &Phase::Rendered);
        let ids: Vec<_> = updates.keys().map(String::as_str).collect();
        assert_eq!(ids, ["bee_bar_plot", "bee_choropleth", "output_container_year"]);

        let Trace::Bar(bar) = &figure(&updates, "bee_bar_plot").data[0] else {
            panic!("expected bar");
        };
        // Idaho, New Mexico, New York, Other States, Texas for 2017 only
        assert_eq!(bar.x.len(), 5);

        let Trace::Choropleth(map) = &figure(&updates, "bee_choropleth").data[0] else {
            panic!("expected choropleth");
        };
        assert!(!map.locations.contains(&"OT".to_string()));
        assert_eq!(map.locations.len(), 4);
    }

    #[test]
    fn stressor_without_rows_in_listed_states_renders_empty_line_chart() {
        let dashboard = impact();
        let mut shell = Shell::new(&dashboard);

        let updates = shell
            .handle(&SelectorEvent::changed("slct_impact", json!("Pesticides")))
            .unwrap();

        assert!(figure(&updates, "bee_line_plot").data.is_empty());
        assert_eq!(shell.phase(), &Phase::Rendered);
    }

    #[test]
    fn line_chart_plots_the_three_listed_states() {
        let dashboard = impact();
        let mut shell = Shell::new(&dashboard);

        let updates = shell
            .handle(&SelectorEvent::changed("slct_impact", json!("Varroa_mites")))
            .unwrap();

        let names: Vec<_> = figure(&updates, "bee_line_plot")
            .data
            .iter()
            .map(|t| match t {
                Trace::Scatter(line) => line.name.clone(),
                _ => panic!("expected line"),
            })
            .collect();
        assert_eq!(names, ["Idaho", "New Mexico", "New York"]);
    }

    #[test]
    fn out_of_domain_value_falls_back_to_default() {
        let dashboard = impact();
        let mut shell = Shell::new(&dashboard);

        let updates = shell
            .handle(&SelectorEvent::changed("slct_year", json!(1987)))
            .unwrap();

        assert_eq!(shell.view().get("slct_year"), Some(&Scalar::Int(2015)));
        assert_eq!(
            caption(&updates, "output_container_year"),
            "The year chosen by the user was: 2015"
        );
    }

    #[test]
    fn unknown_selector_is_rejected_without_leaving_idle() {
        let dashboard = impact();
        let mut shell = Shell::new(&dashboard);

        let err = shell
            .handle(&SelectorEvent::changed("slct_period", json!("JAN THRU MAR")))
            .unwrap_err();

        assert!(matches!(err, DashboardError::UnknownSelector(_)));
        assert_eq!(shell.phase(), &Phase::Idle);
        assert!(matches!(shell.complete(), Err(DashboardError::NotFiltering)));
    }

    #[test]
    fn same_selection_yields_identical_figures() {
        let dashboard = impact();
        let inputs = json!({"slct_impact": "Disease", "slct_year": 2016});
        let inputs = inputs.as_object().unwrap();

        let first = Shell::with_inputs(&dashboard, inputs).render_all().unwrap();
        let second = Shell::with_inputs(&dashboard, inputs).render_all().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn period_dashboard_filters_period_and_fixed_stressor() {
        let dashboard =
            Dashboard::build(catalog::period_dashboard(), &fixtures::observations()).unwrap();
        let mut shell = Shell::new(&dashboard);

        let updates = shell
            .handle(&SelectorEvent::changed("slct_period", json!("APR THRU JUN")))
            .unwrap();

        assert_eq!(
            caption(&updates, "output_container"),
            "The period chosen by the user was: APR THRU JUN"
        );
        let fig = figure(&updates, "period_analysis");
        let Trace::Bar(bar) = &fig.data[0] else {
            panic!("expected bar");
        };
        // five states times five years, one bar each
        assert_eq!(bar.x.len(), 25);
        assert_eq!(updates.len(), 2);
    }
}
