//! The bee survey dashboards.
//!
//! Grouping keys, fixed filters and the line chart's state list are configuration
//! of each dashboard, not behavior of the engine.

use crate::charts::{ChartEncoding, ChartKind, ColorScale, Template};
use crate::dashboard::view::{ChartBinding, DropdownOption, FilterSpec, SelectorSpec};
use crate::dashboard::{DashboardSpec, LayoutNode};
use crate::data::columns::*;
use crate::data::{Aggregator, Scalar};

pub const SURVEY_YEARS: [i64; 5] = [2015, 2016, 2017, 2018, 2019];

/// States plotted on the impact line chart.
pub const LINE_STATES: [&str; 3] = ["Idaho", "New York", "New Mexico"];

const PCT_LABEL: &str = "% of Bee Colonies";

pub fn all() -> Vec<DashboardSpec> {
    vec![period_dashboard(), impact_dashboard()]
}

/// Mean impact of non-Varroa pests per state for one calendar quarter.
pub fn period_dashboard() -> DashboardSpec {
    let period = SelectorSpec {
        id: "slct_period".into(),
        dimension: "period".into(),
        caption_slot: "output_container".into(),
        options: Period::ALL
            .iter()
            .map(|p| DropdownOption::new(p.label(), p.as_str()))
            .collect(),
        default: Scalar::from(Period::JanMar.as_str()),
    };

    let chart = ChartBinding {
        slot: "period_analysis".into(),
        kind: ChartKind::bar(STATE, PCT_IMPACTED),
        encoding: ChartEncoding::default(),
        filters: vec![
            FilterSpec::selected(PERIOD, &period.id),
            FilterSpec::fixed(AFFECTED_BY, Stressor::PestsExclVarroa.as_str()),
        ],
    };

    let layout = LayoutNode::div(vec![
        LayoutNode::heading("Bees Survey Dashboard").styled([("text-align", "center")]),
        dropdown(&period).styled([("width", "50%")]),
        LayoutNode::text(&period.caption_slot),
        LayoutNode::Break,
        LayoutNode::graph(&chart.slot),
    ]);

    DashboardSpec {
        id: "period".into(),
        title: "Bees Survey Dashboard".into(),
        aggregator: Aggregator::new(
            [STATE, ANSI, YEAR, STATE_CODE, AFFECTED_BY, PERIOD],
            PCT_IMPACTED,
        ),
        selectors: vec![period],
        charts: vec![chart],
        layout,
    }
}

/// Stressor trend for three states, plus Varroa-mite impact by year as bars and a map.
pub fn impact_dashboard() -> DashboardSpec {
    let impact = SelectorSpec {
        id: "slct_impact".into(),
        dimension: "bee-killer".into(),
        caption_slot: "output_container_impact".into(),
        options: Stressor::ALL
            .iter()
            .map(|s| DropdownOption::new(s.as_str(), s.as_str()))
            .collect(),
        default: Scalar::from(Stressor::Other.as_str()),
    };
    let year = SelectorSpec {
        id: "slct_year".into(),
        dimension: "year".into(),
        caption_slot: "output_container_year".into(),
        options: SURVEY_YEARS
            .iter()
            .map(|&y| DropdownOption::new(y.to_string(), y))
            .collect(),
        default: Scalar::Int(SURVEY_YEARS[0]),
    };

    let dark = ChartEncoding::default().with_template(Template::PlotlyDark);
    let varroa_in_year = vec![
        FilterSpec::selected(YEAR, &year.id),
        FilterSpec::fixed(AFFECTED_BY, Stressor::VarroaMites.as_str()),
    ];

    let line = ChartBinding {
        slot: "bee_line_plot".into(),
        kind: ChartKind::line(YEAR, PCT_IMPACTED, Some(STATE)),
        encoding: dark.clone(),
        filters: vec![
            FilterSpec::selected(AFFECTED_BY, &impact.id),
            FilterSpec::one_of(STATE, LINE_STATES),
        ],
    };
    let bar = ChartBinding {
        slot: "bee_bar_plot".into(),
        kind: ChartKind::bar(STATE, PCT_IMPACTED),
        encoding: dark
            .clone()
            .with_hover([STATE, PCT_IMPACTED])
            .with_label(PCT_IMPACTED, PCT_LABEL),
        filters: varroa_in_year.clone(),
    };
    let map = ChartBinding {
        slot: "bee_choropleth".into(),
        kind: ChartKind::usa_choropleth(STATE_CODE, PCT_IMPACTED),
        encoding: dark
            .with_hover([STATE, PCT_IMPACTED])
            .with_label(PCT_IMPACTED, PCT_LABEL)
            .with_color_scale(ColorScale::YlOrRd),
        filters: varroa_in_year,
    };

    let half = [
        ("width", "45%"),
        ("display", "inline-block"),
        ("vertical-align", "top"),
    ];
    let side_by_side = [("width", "49%"), ("display", "inline-block")];
    let full = [
        ("width", "100%"),
        ("display", "inline-block"),
        ("padding", "10px"),
    ];

    let layout = LayoutNode::div(vec![
        LayoutNode::heading("Bee Colonies Impact Dashboard").styled([("text-align", "center")]),
        LayoutNode::div(vec![
            LayoutNode::div(vec![
                dropdown(&impact).styled([("width", "90%")]),
                LayoutNode::Break,
                LayoutNode::text(&impact.caption_slot),
            ])
            .styled(half),
            LayoutNode::div(vec![
                dropdown(&year).styled([("width", "90%")]),
                LayoutNode::Break,
                LayoutNode::text(&year.caption_slot),
            ])
            .styled(half),
        ]),
        LayoutNode::Break,
        LayoutNode::div(vec![
            LayoutNode::div(vec![LayoutNode::graph(&line.slot)]).styled(side_by_side),
            LayoutNode::div(vec![LayoutNode::graph(&bar.slot)]).styled(side_by_side),
        ]),
        LayoutNode::div(vec![LayoutNode::graph(&map.slot)]).styled(full),
    ]);

    DashboardSpec {
        id: "impact".into(),
        title: "Bee Colonies Impact Dashboard".into(),
        aggregator: Aggregator::new(
            [STATE, ANSI, AFFECTED_BY, YEAR, STATE_CODE],
            PCT_IMPACTED,
        ),
        selectors: vec![impact, year],
        charts: vec![line, bar, map],
        layout,
    }
}

fn dropdown(selector: &SelectorSpec) -> LayoutNode {
    LayoutNode::Dropdown {
        id: selector.id.clone(),
        options: selector.options.clone(),
        value: selector.default.clone(),
        style: Default::default(),
    }
}
