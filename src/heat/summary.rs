use super::aggregate::GridAggregate;
use crate::model::{BusiestCell, GridSummary, SourceShare};
use crate::util::percent;

/// Summary statistics for a non-empty grid, `None` when there is nothing to summarize.
///
/// Sources are ordered by descending commit count, ties by name. The busiest cell
/// is the one with the highest count; ties go to the earliest date, then hour.
pub fn summarize(grid: &GridAggregate) -> Option<GridSummary> {
    let cells = grid.total_by_cell();
    let first_date = cells.keys().next()?.date;
    let last_date = cells.keys().next_back()?.date;
    let total_commits = grid.total();

    let mut sources: Vec<SourceShare> = grid
        .total_by_source()
        .iter()
        .map(|(source, &commits)| SourceShare {
            source: source.clone(),
            commits,
            percent: percent(commits, total_commits),
        })
        .collect();
    sources.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.source.cmp(&b.source)));

    let mut busiest: Option<BusiestCell> = None;
    for (key, &commits) in cells {
        if busiest.as_ref().map_or(true, |b| commits > b.commits) {
            busiest = Some(BusiestCell {
                date: key.date,
                hour: key.hour,
                commits,
            });
        }
    }

    Some(GridSummary {
        total_commits,
        sources,
        first_date,
        last_date,
        active_days: grid.dates().len(),
        busiest: busiest?,
        max_count: grid.max_count(),
    })
}

impl GridSummary {
    /// Per-source shares are only worth showing when more than one source contributed.
    pub fn has_breakdown(&self) -> bool {
        self.sources.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommitRecord;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn summarizes_sample_batch() {
        let records = vec![
            CommitRecord::new(day(1), 9, "repoA"),
            CommitRecord::new(day(1), 9, "repoA"),
            CommitRecord::new(day(1), 14, "repoB"),
            CommitRecord::new(day(2), 9, "repoA"),
        ];
        let summary = summarize(&GridAggregate::from_records(&records)).unwrap();

        assert_eq!(summary.total_commits, 4);
        assert_eq!(summary.first_date, day(1));
        assert_eq!(summary.last_date, day(2));
        assert_eq!(summary.active_days, 2);
        assert_eq!((summary.busiest.date, summary.busiest.hour, summary.busiest.commits), (day(1), 9, 2));
        assert_eq!(summary.max_count, 2);
        assert!(summary.has_breakdown());
        assert_eq!(summary.sources[0].source, "repoA");
        assert_eq!(summary.sources[0].commits, 3);
        assert_eq!(summary.sources[0].percent, 75.0);
        assert_eq!(summary.sources[1].source, "repoB");
    }

    #[test]
    fn busiest_tie_goes_to_earliest_cell() {
        let records = vec![
            CommitRecord::new(day(3), 1, "r"),
            CommitRecord::new(day(2), 20, "r"),
            CommitRecord::new(day(2), 5, "r"),
        ];
        let summary = summarize(&GridAggregate::from_records(&records)).unwrap();
        assert_eq!((summary.busiest.date, summary.busiest.hour), (day(2), 5));
    }

    #[test]
    fn source_ties_sort_by_name() {
        let records = vec![
            CommitRecord::new(day(1), 1, "zeta"),
            CommitRecord::new(day(1), 1, "alpha"),
        ];
        let summary = summarize(&GridAggregate::from_records(&records)).unwrap();
        let names: Vec<_> = summary.sources.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn empty_grid_has_no_summary() {
        assert!(summarize(&GridAggregate::new()).is_none());
    }
}
