use crate::model::{CellKey, CommitRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Commit counts for every `(date, hour)` cell, broken down by source.
///
/// A key is present only when its count is positive; absence means zero.
/// Every inner map of `by_source_by_cell` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridAggregate {
    total_by_cell: BTreeMap<CellKey, u64>,
    by_source_by_cell: BTreeMap<CellKey, BTreeMap<String, u64>>,
    total_by_source: BTreeMap<String, u64>,
}

impl GridAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CommitRecord>,
    {
        let mut grid = Self::new();
        for record in records {
            grid.record(record);
        }
        grid
    }

    pub fn record(&mut self, record: &CommitRecord) {
        self.add(record.key(), &record.source, 1);
    }

    /// Field-wise sum of `other` into `self`.
    pub fn merge(&mut self, other: GridAggregate) {
        for (key, sources) in other.by_source_by_cell {
            for (source, count) in sources {
                self.add(key, &source, count);
            }
        }
    }

    pub fn merged(mut self, other: GridAggregate) -> Self {
        self.merge(other);
        self
    }

    fn add(&mut self, key: CellKey, source: &str, count: u64) {
        if count == 0 {
            return;
        }
        *self.total_by_cell.entry(key).or_insert(0) += count;
        *self
            .by_source_by_cell
            .entry(key)
            .or_default()
            .entry(source.to_string())
            .or_insert(0) += count;
        *self.total_by_source.entry(source.to_string()).or_insert(0) += count;
    }

    pub fn is_empty(&self) -> bool {
        self.total_by_cell.is_empty()
    }

    pub fn count(&self, key: &CellKey) -> u64 {
        self.total_by_cell.get(key).copied().unwrap_or(0)
    }

    pub fn sources_at(&self, key: &CellKey) -> Option<&BTreeMap<String, u64>> {
        self.by_source_by_cell.get(key)
    }

    pub fn total_by_cell(&self) -> &BTreeMap<CellKey, u64> {
        &self.total_by_cell
    }

    pub fn by_source_by_cell(&self) -> &BTreeMap<CellKey, BTreeMap<String, u64>> {
        &self.by_source_by_cell
    }

    pub fn total_by_source(&self) -> &BTreeMap<String, u64> {
        &self.total_by_source
    }

    pub fn total(&self) -> u64 {
        self.total_by_cell.values().sum()
    }

    /// Largest cell count, or 1 for an empty grid.
    pub fn max_count(&self) -> u64 {
        self.total_by_cell.values().copied().max().unwrap_or(1)
    }

    /// Distinct dates with at least one commit, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.total_by_cell.keys().map(|k| k.date).collect();
        dates.dedup();
        dates
    }
}
