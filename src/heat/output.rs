use super::aggregate::GridAggregate;
use super::scale::Scale;
use super::summary::summarize;
use crate::error::Result;
use crate::model::{CellKey, GridCell, GridOutput, GridSummary, SCHEMA_VERSION};
use chrono::{NaiveDate, Utc};
use console::Style;
use std::fmt::Display;

pub const NO_DATA: &str = "No data to display";

/// 256-color foreground for each intensity level, darkest to brightest green.
pub(crate) const LEVEL_COLORS: [u8; 5] = [232, 22, 28, 34, 40];

/// Render the grid as a date-by-hour table followed by the summary lines.
///
/// With `color` each cell is a fixed two-character block tinted by intensity;
/// without it every count is printed verbatim so the output stays greppable.
pub fn render_terminal(grid: &GridAggregate, color: bool) -> String {
    let Some(summary) = summarize(grid) else {
        return format!("{NO_DATA}\n");
    };
    let dates = grid.dates();

    let mut out = String::new();
    if color {
        render_color_table(&mut out, grid, &dates);
    } else {
        render_plain_table(&mut out, grid, &dates);
    }
    render_summary(&mut out, &summary, color);
    out
}

fn render_color_table(out: &mut String, grid: &GridAggregate, dates: &[NaiveDate]) {
    let scale = Scale::for_grid(grid);

    out.push('\n');
    out.push_str(&" ".repeat(6));
    for date in dates {
        out.push_str(&format!("{:>6}", date.format("%m-%d").to_string()));
    }
    out.push('\n');

    for hour in 0..24u8 {
        out.push_str(&format!("{hour:2} "));
        for date in dates {
            let count = grid.count(&CellKey::new(*date, hour));
            let paint = Style::new()
                .color256(LEVEL_COLORS[scale.level(count) as usize])
                .force_styling(true);
            out.push_str(&format!("{}  ", paint.apply_to(cell_block(count))));
        }
        out.push('\n');
    }
}

fn render_plain_table(out: &mut String, grid: &GridAggregate, dates: &[NaiveDate]) {
    out.push('\n');
    out.push_str(&" ".repeat(6));
    for date in dates {
        out.push_str(&format!("{:>8}", date.format("%m-%d").to_string()));
    }
    out.push('\n');

    for hour in 0..24u8 {
        out.push_str(&format!("{hour:2} "));
        for date in dates {
            let count = grid.count(&CellKey::new(*date, hour));
            out.push_str(&format!("{count:>8}"));
        }
        out.push('\n');
    }
}

/// Two-character cell body: blank, the count itself, or `++` once it no longer fits.
pub fn cell_block(count: u64) -> String {
    match count {
        0 => "  ".to_string(),
        1..=9 => format!("{count:2}"),
        _ => "++".to_string(),
    }
}

fn emphasize<D: Display>(value: D, color: bool) -> String {
    if color {
        Style::new()
            .cyan()
            .bold()
            .force_styling(true)
            .apply_to(value)
            .to_string()
    } else {
        value.to_string()
    }
}

fn render_summary(out: &mut String, summary: &GridSummary, color: bool) {
    out.push_str(&format!(
        "\nTotal commits: {}\n",
        emphasize(summary.total_commits, color)
    ));

    if summary.has_breakdown() {
        out.push_str("\nCommits by repository:\n");
        for share in &summary.sources {
            out.push_str(&format!(
                "  {}: {} commits ({:.1}%)\n",
                share.source, share.commits, share.percent
            ));
        }
    }

    out.push_str(&format!(
        "Date range: {} to {}\n",
        summary.first_date.format("%Y-%m-%d"),
        summary.last_date.format("%Y-%m-%d")
    ));
    out.push_str(&format!(
        "{} days with commits\n",
        emphasize(summary.active_days, color)
    ));
    out.push_str(&format!(
        "Busiest hour: {} {}:00 ({} commits)\n",
        summary.busiest.date.format("%Y-%m-%d"),
        summary.busiest.hour,
        summary.busiest.commits
    ));
}

/// Filters and repositories echoed into the JSON document.
#[derive(Debug, Clone, Default)]
pub struct OutputMeta {
    pub repositories: Vec<String>,
    pub days: Option<u32>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub author: Option<String>,
}

pub fn grid_output(grid: &GridAggregate, meta: OutputMeta) -> GridOutput {
    let scale = Scale::for_grid(grid);
    let cells = grid
        .total_by_cell()
        .iter()
        .map(|(key, &total)| GridCell {
            date: key.date,
            hour: key.hour,
            total,
            level: scale.level(total),
            sources: grid.sources_at(key).cloned().unwrap_or_default(),
        })
        .collect();

    GridOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repositories: meta.repositories,
        days: meta.days,
        since: meta.since,
        until: meta.until,
        author: meta.author,
        cells,
        totals_by_source: grid.total_by_source().clone(),
        summary: summarize(grid),
    }
}

pub fn render_json(grid: &GridAggregate, meta: OutputMeta) -> Result<String> {
    Ok(serde_json::to_string_pretty(&grid_output(grid, meta))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommitRecord;
    use pretty_assertions::assert_eq;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn sample() -> GridAggregate {
        GridAggregate::from_records(&[
            CommitRecord::new(day(1, 1), 9, "repoA"),
            CommitRecord::new(day(1, 1), 9, "repoA"),
            CommitRecord::new(day(1, 1), 14, "repoB"),
            CommitRecord::new(day(1, 2), 9, "repoA"),
        ])
    }

    #[test]
    fn cell_blocks_saturate() {
        assert_eq!(cell_block(0), "  ");
        assert_eq!(cell_block(7), " 7");
        assert_eq!(cell_block(9), " 9");
        assert_eq!(cell_block(10), "++");
        assert_eq!(cell_block(250), "++");
    }

    #[test]
    fn empty_grid_prints_notice() {
        let grid = GridAggregate::new();
        assert_eq!(render_terminal(&grid, true), "No data to display\n");
        assert_eq!(render_terminal(&grid, false), "No data to display\n");
    }

    #[test]
    fn plain_table_layout() {
        let text = render_terminal(&sample(), false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "         01-01   01-02");
        assert_eq!(lines[2], " 0        0       0");
        assert_eq!(lines[11], " 9        2       1");
        assert_eq!(lines[16], "14        1       0");
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn plain_summary_lines() {
        let text = render_terminal(&sample(), false);
        assert!(text.contains("\nTotal commits: 4\n"));
        assert!(text.contains("Commits by repository:\n  repoA: 3 commits (75.0%)\n  repoB: 1 commits (25.0%)\n"));
        assert!(text.contains("Date range: 2024-01-01 to 2024-01-02\n"));
        assert!(text.contains("2 days with commits\n"));
        assert!(text.contains("Busiest hour: 2024-01-01 9:00 (2 commits)\n"));
    }

    #[test]
    fn single_source_hides_breakdown() {
        let grid = GridAggregate::from_records(&[CommitRecord::new(day(3, 4), 1, "solo")]);
        let text = render_terminal(&grid, false);
        assert!(!text.contains("Commits by repository"));
    }

    #[test]
    fn color_table_uses_level_colors() {
        let text = render_terminal(&sample(), true);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "       01-01 01-02");
        // max is 2: the 2-commit cell is level 4, the 1-commit cells level 2.
        assert!(lines[11].starts_with(" 9 "));
        assert!(lines[11].contains("\u{1b}[38;5;40m 2"));
        assert!(lines[11].contains("\u{1b}[38;5;28m 1"));
        assert!(lines[2].contains("\u{1b}[38;5;232m  "));
    }

    #[test]
    fn saturated_cell_is_brightest() {
        let records: Vec<_> = (0..10).map(|_| CommitRecord::new(day(5, 5), 3, "r")).collect();
        let grid = GridAggregate::from_records(&records);
        let text = render_terminal(&grid, true);
        assert!(text.contains("\u{1b}[38;5;40m++"));
    }

    #[test]
    fn json_output_carries_cells_and_summary() {
        let meta = OutputMeta {
            repositories: vec!["repoA".into(), "repoB".into()],
            ..OutputMeta::default()
        };
        let json = render_json(&sample(), meta).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["cells"].as_array().unwrap().len(), 3);
        assert_eq!(value["cells"][0]["date"], "2024-01-01");
        assert_eq!(value["cells"][0]["hour"], 9);
        assert_eq!(value["cells"][0]["level"], 4);
        assert_eq!(value["cells"][0]["sources"]["repoA"], 2);
        assert_eq!(value["totals_by_source"]["repoB"], 1);
        assert_eq!(value["summary"]["busiest"]["commits"], 2);
    }

    #[test]
    fn json_output_for_empty_grid() {
        let json = render_json(&GridAggregate::new(), OutputMeta::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["cells"].as_array().unwrap().is_empty());
        assert!(value["summary"].is_null());
    }
}
