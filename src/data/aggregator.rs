//! Group-and-mean summarization of the survey table.

use polars::prelude::*;

/// Groups rows by a fixed key tuple and averages one numeric column per group.
#[derive(Debug, Clone)]
pub struct Aggregator {
    keys: Vec<String>,
    target: String,
}

impl Aggregator {
    pub fn new<K, S>(keys: K, target: &str) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            target: target.to_string(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// One row per distinct key tuple, target replaced by its mean, sorted by the keys.
    ///
    /// Rows with a null key or a null target are left out before grouping, so a
    /// group with nothing to average produces no row at all.
    pub fn aggregate(&self, df: &DataFrame) -> PolarsResult<DataFrame> {
        let key_exprs: Vec<Expr> = self.keys.iter().map(|k| col(k.as_str())).collect();

        let usable = self
            .keys
            .iter()
            .chain(std::iter::once(&self.target))
            .map(|c| col(c.as_str()).is_not_null())
            .reduce(|acc, e| acc.and(e))
            .unwrap_or_else(|| lit(true));

        df.clone()
            .lazy()
            .filter(usable)
            .group_by_stable(key_exprs.clone())
            .agg([col(self.target.as_str()).mean()])
            .sort_by_exprs(key_exprs, SortMultipleOptions::default())
            .collect()
    }
}
