//! Selectors, the selection state they drive, and the charts bound to them.

use crate::charts::{ChartEncoding, ChartKind};
use crate::data::{Predicate, Query, Scalar};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: Scalar,
}

impl DropdownOption {
    pub fn new(label: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A dropdown with a fixed option list, plus the caption slot that echoes its value.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorSpec {
    pub id: String,
    /// Noun used in the caption, e.g. "year".
    pub dimension: String,
    pub caption_slot: String,
    pub options: Vec<DropdownOption>,
    pub default: Scalar,
}

impl SelectorSpec {
    /// Map a raw event value onto the option list, falling back to the default.
    pub fn coerce(&self, raw: &Value) -> Scalar {
        let direct = Scalar::from_json(raw).filter(|v| self.options.iter().any(|o| &o.value == v));
        let by_text = || {
            let text = raw.as_str()?;
            self.options
                .iter()
                .find(|o| o.value.to_string() == text)
                .map(|o| o.value.clone())
        };

        match direct.or_else(by_text) {
            Some(value) => value,
            None => {
                debug!(selector = %self.id, value = %raw, "value outside option list, using default");
                self.default.clone()
            }
        }
    }

    pub fn caption(&self, value: &Scalar) -> String {
        format!("The {} chosen by the user was: {}", self.dimension, value)
    }
}

/// Current value of every selector of one dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    values: BTreeMap<String, Scalar>,
}

impl ViewState {
    pub fn defaults(selectors: &[SelectorSpec]) -> Self {
        Self {
            values: selectors
                .iter()
                .map(|s| (s.id.clone(), s.default.clone()))
                .collect(),
        }
    }

    pub fn get(&self, selector: &str) -> Option<&Scalar> {
        self.values.get(selector)
    }

    /// Store the coerced value and return it.
    pub fn set(&mut self, selector: &SelectorSpec, raw: &Value) -> Scalar {
        let value = selector.coerce(raw);
        self.values.insert(selector.id.clone(), value.clone());
        value
    }
}

/// Where a predicate gets its value from.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Fixed(Scalar),
    Selector(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    Equals { column: String, value: Binding },
    OneOf { column: String, values: Vec<Scalar> },
}

impl FilterSpec {
    pub fn fixed(column: &str, value: impl Into<Scalar>) -> Self {
        FilterSpec::Equals {
            column: column.to_string(),
            value: Binding::Fixed(value.into()),
        }
    }

    pub fn selected(column: &str, selector: &str) -> Self {
        FilterSpec::Equals {
            column: column.to_string(),
            value: Binding::Selector(selector.to_string()),
        }
    }

    pub fn one_of<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        FilterSpec::OneOf {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            FilterSpec::Equals { column, .. } | FilterSpec::OneOf { column, .. } => column,
        }
    }

    pub fn selector(&self) -> Option<&str> {
        match self {
            FilterSpec::Equals {
                value: Binding::Selector(id),
                ..
            } => Some(id),
            _ => None,
        }
    }

    /// Concrete predicate for the current selection. `None` if the selector has no value.
    fn resolve(&self, view: &ViewState) -> Option<Predicate> {
        match self {
            FilterSpec::Equals { column, value } => {
                let value = match value {
                    Binding::Fixed(v) => v.clone(),
                    Binding::Selector(id) => view.get(id)?.clone(),
                };
                Some(Predicate::equals(column, value))
            }
            FilterSpec::OneOf { column, values } => {
                Some(Predicate::one_of(column, values.iter().cloned()))
            }
        }
    }
}

/// A chart slot, its geometry and the filters that select its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBinding {
    pub slot: String,
    pub kind: ChartKind,
    pub encoding: ChartEncoding,
    pub filters: Vec<FilterSpec>,
}

impl ChartBinding {
    pub fn depends_on(&self, selector: &str) -> bool {
        self.filters.iter().any(|f| f.selector() == Some(selector))
    }

    pub fn query(&self, view: &ViewState) -> Query {
        Query::new(self.filters.iter().filter_map(|f| f.resolve(view)).collect())
    }

    /// Every table column the chart touches.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = self.kind.fields();
        columns.extend(self.encoding.hover.iter().map(String::as_str));
        columns.extend(self.filters.iter().map(FilterSpec::column));
        columns
    }
}
