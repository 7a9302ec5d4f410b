use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// One commit reduced to the cell it falls into and the repository it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitRecord {
    pub date: NaiveDate,
    pub hour: u8,
    pub source: String,
}

impl CommitRecord {
    pub fn new(date: NaiveDate, hour: u8, source: impl Into<String>) -> Self {
        Self {
            date,
            hour,
            source: source.into(),
        }
    }

    pub fn key(&self) -> CellKey {
        CellKey {
            date: self.date,
            hour: self.hour,
        }
    }
}

/// A `(date, hour)` coordinate in the grid.
///
/// Ordering is by date, then hour, which is also the order used to break ties
/// when picking the busiest cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub date: NaiveDate,
    pub hour: u8,
}

impl CellKey {
    pub fn new(date: NaiveDate, hour: u8) -> Self {
        Self { date, hour }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCell {
    pub date: NaiveDate,
    pub hour: u8,
    pub total: u64,
    pub level: u8,
    pub sources: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceShare {
    pub source: String,
    pub commits: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusiestCell {
    pub date: NaiveDate,
    pub hour: u8,
    pub commits: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSummary {
    pub total_commits: u64,
    pub sources: Vec<SourceShare>,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub active_days: usize,
    pub busiest: BusiestCell,
    pub max_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repositories: Vec<String>,
    pub days: Option<u32>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub author: Option<String>,
    pub cells: Vec<GridCell>,
    pub totals_by_source: BTreeMap<String, u64>,
    pub summary: Option<GridSummary>,
}

/// Which commits of a repository take part in the grid.
#[derive(Debug, Clone, Default)]
pub struct CommitFilter {
    /// Only commits from the last N days.
    pub days: Option<u32>,
    pub since: Option<String>,
    pub until: Option<String>,
    /// Matched against `"Name <email>"` of the commit author.
    pub author: Option<Regex>,
    pub skip_merges: bool,
    /// Walk only what is reachable from HEAD instead of every reference.
    pub head_only: bool,
}

#[derive(Debug, Clone)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new() -> Self {
        Self { since: None, until: None }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Raise the lower bound to `cutoff` unless the existing bound is already later.
    pub fn narrow_since(mut self, cutoff: DateTime<Utc>) -> Self {
        self.since = Some(match self.since {
            Some(since) if since > cutoff => since,
            _ => cutoff,
        });
        self
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        if let Some(since) = self.since {
            if timestamp < &since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if timestamp > &until {
                return false;
            }
        }
        true
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn narrow_since_keeps_the_later_bound() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let range = DateRange::new().with_since(late).narrow_since(early);
        assert_eq!(range.since, Some(late));

        let range = DateRange::new().with_since(early).narrow_since(late);
        assert_eq!(range.since, Some(late));

        let range = DateRange::new().narrow_since(early);
        assert_eq!(range.since, Some(early));
    }

    #[test]
    fn contains_is_inclusive() {
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let range = DateRange::new().with_since(since).with_until(until);

        assert!(range.contains(&since));
        assert!(range.contains(&until));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()));
    }

    #[test]
    fn cell_keys_order_by_date_then_hour() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(CellKey::new(d1, 23) < CellKey::new(d2, 0));
        assert!(CellKey::new(d1, 3) < CellKey::new(d1, 4));
    }
}
