//! Filter Engine
//! Selects rows of the summarized table by equality and membership predicates.

use polars::prelude::*;
use serde::Serialize;
use std::fmt;

/// A single cell value a predicate compares against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Convert a JSON scalar. Arrays, objects, booleans and null have no counterpart.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Scalar::Str(s.clone())),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Scalar::Int)
                .or_else(|| n.as_f64().map(Scalar::Float)),
            _ => None,
        }
    }

    fn to_lit(&self) -> Expr {
        match self {
            Scalar::Int(v) => lit(*v),
            Scalar::Float(v) => lit(*v),
            Scalar::Str(v) => lit(v.as_str()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Column equals the value.
    Eq { column: String, value: Scalar },
    /// Column is one of the values. An empty set matches nothing.
    In { column: String, values: Vec<Scalar> },
}

impl Predicate {
    pub fn equals(column: &str, value: impl Into<Scalar>) -> Self {
        Predicate::Eq {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn one_of<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        Predicate::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn to_expr(&self) -> Expr {
        match self {
            Predicate::Eq { column, value } => col(column.as_str()).eq(value.to_lit()),
            Predicate::In { column, values } => values
                .iter()
                .map(|v| col(column.as_str()).eq(v.to_lit()))
                .reduce(|acc, e| acc.or(e))
                .unwrap_or_else(|| lit(false)),
        }
    }
}

/// Conjunction of predicates over one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    predicates: Vec<Predicate>,
}

impl Query {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Rows satisfying every predicate. An empty result is a valid answer.
    pub fn apply(&self, df: &DataFrame) -> PolarsResult<DataFrame> {
        let Some(condition) = self
            .predicates
            .iter()
            .map(Predicate::to_expr)
            .reduce(|acc, e| acc.and(e))
        else {
            return Ok(df.clone());
        };

        df.clone().lazy().filter(condition).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::{AFFECTED_BY, PCT_IMPACTED, STATE, YEAR};

    fn summarized() -> DataFrame {
        df!(
            STATE => ["Idaho", "Idaho", "Idaho", "New York", "Texas", "Texas"],
            YEAR => [2015i64, 2016, 2019, 2015, 2015, 2017],
            AFFECTED_BY => ["Varroa_mites", "Varroa_mites", "Disease", "Varroa_mites", "Other", "Varroa_mites"],
            PCT_IMPACTED => [30.0, 25.0, 4.0, 41.5, 2.0, 33.0]
        )
        .unwrap()
    }

    #[test]
    fn year_and_stressor_select_only_matching_rows() {
        let query = Query::new(vec![
            Predicate::equals(YEAR, 2015i64),
            Predicate::equals(AFFECTED_BY, "Varroa_mites"),
        ]);

        let out = query.apply(&summarized()).unwrap();

        assert_eq!(out.height(), 2);
        let years = out.column(YEAR).unwrap().i64().unwrap();
        assert!(years.into_iter().all(|y| y == Some(2015)));
        let stressors = out.column(AFFECTED_BY).unwrap().str().unwrap();
        assert!(stressors.into_iter().all(|s| s == Some("Varroa_mites")));
    }

    #[test]
    fn membership_limits_to_listed_values() {
        let query = Query::new(vec![
            Predicate::equals(AFFECTED_BY, "Varroa_mites"),
            Predicate::one_of(STATE, ["Idaho", "New York", "New Mexico"]),
        ]);

        let out = query.apply(&summarized()).unwrap();

        let states: Vec<_> = out
            .column(STATE)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        assert_eq!(states, ["Idaho", "Idaho", "New York"]);
    }

    #[test]
    fn no_match_is_an_empty_table() {
        let out = Query::new(vec![Predicate::equals(AFFECTED_BY, "Pesticides")])
            .apply(&summarized())
            .unwrap();
        assert_eq!(out.height(), 0);

        let none_listed = Query::new(vec![Predicate::one_of(STATE, Vec::<&str>::new())])
            .apply(&summarized())
            .unwrap();
        assert_eq!(none_listed.height(), 0);
    }

    #[test]
    fn empty_query_keeps_every_row() {
        let out = Query::default().apply(&summarized()).unwrap();
        assert_eq!(out.height(), 6);
    }

    #[test]
    fn json_scalars_convert() {
        assert_eq!(Scalar::from_json(&serde_json::json!(2015)), Some(Scalar::Int(2015)));
        assert_eq!(
            Scalar::from_json(&serde_json::json!("Other")),
            Some(Scalar::Str("Other".into()))
        );
        assert_eq!(Scalar::from_json(&serde_json::json!(null)), None);
        assert_eq!(Scalar::Int(2015).to_string(), "2015");
    }
}
