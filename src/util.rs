use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};
use console::style;

/// Convert a unix timestamp and its recorded UTC offset into the
/// `(calendar date, hour of day)` seen by the person who made the commit.
pub fn cell_of(seconds: i64, offset_seconds: i32) -> Option<(NaiveDate, u8)> {
    let offset = FixedOffset::east_opt(offset_seconds)?;
    let local = DateTime::<Utc>::from_timestamp(seconds, 0)?.with_timezone(&offset);
    Some((local.date_naive(), local.hour() as u8))
}

pub fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// User-facing warning on stderr; never aborts the run.
pub fn warn(message: impl std::fmt::Display) {
    eprintln!("{} {message}", style("warning:").yellow().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_uses_commit_offset() {
        // 2024-01-01T23:30:00Z
        let secs = 1_704_151_800;
        assert_eq!(
            cell_of(secs, 0),
            Some((NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 23))
        );
        assert_eq!(
            cell_of(secs, 8 * 3600),
            Some((NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 7))
        );
        assert_eq!(
            cell_of(secs, -5 * 3600),
            Some((NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 18))
        );
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        assert_eq!(cell_of(0, 48 * 3600), None);
    }

    #[test]
    fn percent_guards_zero_total() {
        assert_eq!(percent(3, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
