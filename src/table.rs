//! Reshaping of chunk responses into one table.
//!
//! A [`TableBuilder`] is fed every chunk response from a fetch and merges
//! them as it goes: wide shape outer-joins each series on (year, period,
//! periodName), long shape stacks rows tagged with the series ID.
//! [`TableBuilder::finish`] applies the final sort.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{ApiResponse, Footnote, GapFill, Shape};

/// A fetched table in either shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Table {
    Wide(WideTable),
    Long(LongTable),
}

impl Table {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Table::Wide(t) => t.rows.len(),
            Table::Long(t) => t.rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_wide(&self) -> Option<&WideTable> {
        match self {
            Table::Wide(t) => Some(t),
            Table::Long(_) => None,
        }
    }

    pub fn as_long(&self) -> Option<&LongTable> {
        match self {
            Table::Long(t) => Some(t),
            Table::Wide(_) => None,
        }
    }
}

/// One row per (year, period); one value column per series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideTable {
    /// Series IDs in order of first appearance across the responses.
    pub columns: Vec<String>,
    /// Rows sorted ascending by (year, period).
    pub rows: Vec<WideRow>,
}

impl WideTable {
    /// All values of one series column, in row order.
    pub fn column(&self, series_id: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.columns.iter().position(|c| c == series_id)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// Fill outer-join gaps per series column. Gaps before a column's
    /// first observation are left alone in both modes.
    pub fn fill_gaps(&mut self, method: GapFill) {
        for col in 0..self.columns.len() {
            let mut last: Option<(usize, f64)> = None;
            for i in 0..self.rows.len() {
                match self.rows[i].values[col] {
                    Some(value) => {
                        if method == GapFill::Linear
                            && let Some((prev_i, prev)) = last
                            && i - prev_i > 1
                        {
                            for j in prev_i + 1..i {
                                let frac = (j - prev_i) as f64 / (i - prev_i) as f64;
                                self.rows[j].values[col] = Some(prev + (value - prev) * frac);
                            }
                        }
                        last = Some((i, value));
                    }
                    None => {
                        if method == GapFill::Forward
                            && let Some((_, prev)) = last
                        {
                            self.rows[i].values[col] = Some(prev);
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideRow {
    pub year: i32,
    pub period: String,
    pub period_name: String,
    /// Parallel to [`WideTable::columns`]; `None` where the outer join had
    /// no observation for that series.
    pub values: Vec<Option<f64>>,
    /// Present only when footnotes were retained (single-series fetch).
    pub footnotes: Option<Vec<Footnote>>,
}

/// One row per (series, year, period).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongTable {
    /// Rows sorted ascending by (series_id, year, period).
    pub rows: Vec<LongRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow {
    pub series_id: String,
    pub year: i32,
    pub period: String,
    pub period_name: String,
    pub value: f64,
    pub footnotes: Option<Vec<Footnote>>,
}

/// Accumulates chunk responses into a single table.
#[derive(Debug)]
pub struct TableBuilder {
    shape: Shape,
    keep_footnotes: bool,
    columns: Vec<String>,
    wide: BTreeMap<(i32, String, String), WideAccum>,
    long: Vec<LongRow>,
}

#[derive(Debug, Default)]
struct WideAccum {
    values: Vec<Option<f64>>,
    footnotes: Option<Vec<Footnote>>,
}

impl TableBuilder {
    pub fn new(shape: Shape, keep_footnotes: bool) -> Self {
        Self {
            shape,
            keep_footnotes,
            columns: Vec::new(),
            wide: BTreeMap::new(),
            long: Vec::new(),
        }
    }

    /// Merge one chunk response into the running table. Coerces year and
    /// value; the upstream `latest` flag is never copied over.
    pub fn push_response(&mut self, resp: &ApiResponse) -> Result<()> {
        for series in &resp.results.series {
            let col = self.column_index(&series.series_id);
            for obs in &series.data {
                let year = obs.year_num()?;
                let value = obs.value_num()?;
                let footnotes = self
                    .keep_footnotes
                    .then(|| real_footnotes(&obs.footnotes));
                match self.shape {
                    Shape::Wide => {
                        let key = (year, obs.period.clone(), obs.period_name.clone());
                        let row = self.wide.entry(key).or_default();
                        if row.values.len() <= col {
                            row.values.resize(col + 1, None);
                        }
                        row.values[col] = Some(value);
                        if footnotes.is_some() {
                            row.footnotes = footnotes;
                        }
                    }
                    Shape::Long => self.long.push(LongRow {
                        series_id: series.series_id.clone(),
                        year,
                        period: obs.period.clone(),
                        period_name: obs.period_name.clone(),
                        value,
                        footnotes,
                    }),
                }
            }
        }
        Ok(())
    }

    /// Final sort and assembly.
    pub fn finish(self) -> Table {
        match self.shape {
            Shape::Wide => {
                let ncols = self.columns.len();
                let rows = self
                    .wide
                    .into_iter()
                    .map(|((year, period, period_name), mut accum)| {
                        accum.values.resize(ncols, None);
                        WideRow {
                            year,
                            period,
                            period_name,
                            values: accum.values,
                            footnotes: accum.footnotes,
                        }
                    })
                    .collect();
                Table::Wide(WideTable {
                    columns: self.columns,
                    rows,
                })
            }
            Shape::Long => {
                let mut rows = self.long;
                rows.sort_by(|a, b| {
                    (&a.series_id, a.year, &a.period).cmp(&(&b.series_id, b.year, &b.period))
                });
                Table::Long(LongTable { rows })
            }
        }
    }

    fn column_index(&mut self, series_id: &str) -> usize {
        match self.columns.iter().position(|c| c == series_id) {
            Some(idx) => idx,
            None => {
                self.columns.push(series_id.to_string());
                self.columns.len() - 1
            }
        }
    }
}

/// The API pads empty footnote lists with `{}` entries; drop those.
fn real_footnotes(footnotes: &[Footnote]) -> Vec<Footnote> {
    footnotes
        .iter()
        .filter(|f| f.code.is_some() || f.text.is_some())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiResponse;

    fn resp(json: &str) -> ApiResponse {
        serde_json::from_str(json).unwrap()
    }

    const TWO_SERIES: &str = r#"{
        "status": "REQUEST_SUCCEEDED",
        "responseTime": 120,
        "message": [],
        "Results": {"series": [
            {"seriesID": "A", "data": [
                {"year": "2000", "period": "M02", "periodName": "February",
                 "value": "2.0", "footnotes": [{}], "latest": "true"},
                {"year": "2000", "period": "M01", "periodName": "January",
                 "value": "1.0", "footnotes": [{}]}
            ]},
            {"seriesID": "B", "data": [
                {"year": "2000", "period": "M01", "periodName": "January",
                 "value": "10.0", "footnotes": [{"code": "R", "text": "Revised"}]}
            ]}
        ]}
    }"#;

    #[test]
    fn wide_outer_join_unions_periods() {
        let mut builder = TableBuilder::new(Shape::Wide, false);
        builder.push_response(&resp(TWO_SERIES)).unwrap();
        let table = builder.finish();
        let wide = table.as_wide().unwrap();

        assert_eq!(wide.columns, vec!["A", "B"]);
        assert_eq!(wide.rows.len(), 2);
        // sorted by period; B has no February observation
        assert_eq!(wide.rows[0].period, "M01");
        assert_eq!(wide.rows[0].values, vec![Some(1.0), Some(10.0)]);
        assert_eq!(wide.rows[1].period, "M02");
        assert_eq!(wide.rows[1].values, vec![Some(2.0), None]);
        assert!(wide.rows.iter().all(|r| r.footnotes.is_none()));
    }

    #[test]
    fn long_stacks_and_sorts_by_series() {
        let mut builder = TableBuilder::new(Shape::Long, false);
        builder.push_response(&resp(TWO_SERIES)).unwrap();
        let table = builder.finish();
        let long = table.as_long().unwrap();

        assert_eq!(long.rows.len(), 3);
        let keys: Vec<(&str, i32, &str)> = long
            .rows
            .iter()
            .map(|r| (r.series_id.as_str(), r.year, r.period.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("A", 2000, "M01"), ("A", 2000, "M02"), ("B", 2000, "M01")]
        );
    }

    #[test]
    fn footnotes_kept_only_on_request() {
        let mut builder = TableBuilder::new(Shape::Long, true);
        builder.push_response(&resp(TWO_SERIES)).unwrap();
        let table = builder.finish();
        let long = table.as_long().unwrap();

        // empty {} footnotes become an empty list, real ones survive
        assert_eq!(long.rows[0].footnotes, Some(vec![]));
        let b_row = long.rows.iter().find(|r| r.series_id == "B").unwrap();
        assert_eq!(
            b_row.footnotes.as_ref().unwrap()[0].code.as_deref(),
            Some("R")
        );
    }

    #[test]
    fn chunks_merge_in_chronological_order() {
        let newest = r#"{"message": [], "Results": {"series": [
            {"seriesID": "A", "data": [
                {"year": "2001", "period": "M01", "periodName": "January", "value": "3.0"}
            ]}
        ]}}"#;
        let oldest = r#"{"message": [], "Results": {"series": [
            {"seriesID": "A", "data": [
                {"year": "1999", "period": "M01", "periodName": "January", "value": "1.0"}
            ]}
        ]}}"#;

        // chunks arrive newest-first
        let mut builder = TableBuilder::new(Shape::Wide, false);
        builder.push_response(&resp(newest)).unwrap();
        builder.push_response(&resp(oldest)).unwrap();
        let table = builder.finish();
        let wide = table.as_wide().unwrap();

        let years: Vec<i32> = wide.rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![1999, 2001]);
    }

    #[test]
    fn bad_value_is_an_error() {
        let bad = r#"{"message": [], "Results": {"series": [
            {"seriesID": "A", "data": [
                {"year": "2001", "period": "M01", "periodName": "January", "value": "-"}
            ]}
        ]}}"#;
        let mut builder = TableBuilder::new(Shape::Wide, false);
        assert!(builder.push_response(&resp(bad)).is_err());
    }
}
