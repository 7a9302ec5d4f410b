//! Self-contained HTML rendering of the commit grid.
//!
//! The document inlines its styles and script, so the written file works offline.
//! Year labels in the sticky header float: a small script keeps each label centered
//! inside the visible part of its year span while the date axis scrolls.

use super::aggregate::GridAggregate;
use super::scale::Scale;
use super::summary::summarize;
use crate::error::{GridError, Result};
use crate::model::{CellKey, GridSummary};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::path::Path;

const TITLE: &str = "Git Commit Hour Grid";

/// Render the full HTML document, or `None` when the grid holds no commits.
pub fn render_html(grid: &GridAggregate) -> Option<String> {
    let summary = summarize(grid)?;
    let dates = grid.dates();

    let mut html = Html::new();
    html.raw("<!DOCTYPE html>")
        .nl(0)
        .start("html", &[("lang", "en")])
        .nl(0)
        .start("head", &[])
        .nl(1)
        .start("meta", &[("charset", "UTF-8")])
        .nl(1)
        .start(
            "meta",
            &[
                ("name", "viewport"),
                ("content", "width=device-width, initial-scale=1.0"),
            ],
        )
        .nl(1)
        .leaf("title", &[], TITLE)
        .nl(1)
        .start("style", &[])
        .raw(STYLE)
        .end("style")
        .nl(0)
        .end("head")
        .nl(0)
        .start("body", &[])
        .nl(1)
        .start("div", &[("class", "container")])
        .nl(2)
        .leaf("h1", &[], TITLE)
        .nl(2);

    write_table(&mut html, grid, &dates);
    html.nl(2);
    write_stats(&mut html, &summary);
    html.nl(2);
    write_legend(&mut html);

    html.nl(1)
        .end("div")
        .nl(1)
        .start("script", &[])
        .raw(SCRIPT)
        .end("script")
        .nl(0)
        .end("body")
        .nl(0)
        .end("html")
        .nl(0);

    Some(html.finish())
}

/// Write `document` to `path`, replacing any previous file.
pub fn write_html(path: &Path, document: &str) -> Result<()> {
    std::fs::write(path, document).map_err(|source| GridError::HtmlWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Contiguous runs of dates sharing a calendar year, as `(year, run length)`.
pub fn year_spans(dates: &[NaiveDate]) -> Vec<(i32, usize)> {
    let mut spans: Vec<(i32, usize)> = Vec::new();
    for date in dates {
        match spans.last_mut() {
            Some((year, len)) if *year == date.year() => *len += 1,
            _ => spans.push((date.year(), 1)),
        }
    }
    spans
}

fn write_table(html: &mut Html, grid: &GridAggregate, dates: &[NaiveDate]) {
    let scale = Scale::for_grid(grid);

    html.start("div", &[("class", "heatmap-wrapper")])
        .nl(3)
        .start("div", &[("class", "heatmap")])
        .nl(4)
        .start("table", &[])
        .nl(5)
        .start("thead", &[])
        .nl(6)
        .start("tr", &[])
        .nl(7)
        .start("th", &[("class", "year-header")])
        .end("th");

    for (year, span) in year_spans(dates) {
        let colspan = span.to_string();
        html.nl(7)
            .start(
                "th",
                &[("class", "year-header"), ("colspan", colspan.as_str())],
            )
            .leaf("span", &[("class", "year-text")], &year.to_string())
            .end("th");
    }

    html.nl(6).end("tr").nl(6).start("tr", &[]).nl(7).start("th", &[]).end("th");

    let mut prev_year: Option<i32> = None;
    for date in dates {
        let label = date.format("%m-%d").to_string();
        let boundary = prev_year.is_some_and(|y| y != date.year());
        html.nl(7);
        if boundary {
            html.leaf("th", &[("class", "date-header")], &label);
        } else {
            html.leaf("th", &[], &label);
        }
        prev_year = Some(date.year());
    }

    html.nl(6).end("tr").nl(5).end("thead").nl(5).start("tbody", &[]);

    for hour in 0..24u8 {
        html.nl(6).start("tr", &[]).leaf("td", &[], &format!("{hour:2}"));
        for date in dates {
            let key = CellKey::new(*date, hour);
            let count = grid.count(&key);
            let class = format!("cell level-{}", scale.level(count));
            html.nl(7)
                .start("td", &[])
                .start("div", &[("class", class.as_str())])
                .start("div", &[("class", "tooltip")]);
            write_tooltip(html, &key, count, grid.sources_at(&key));
            html.end("div").end("div").end("td");
        }
        html.nl(6).end("tr");
    }

    html.nl(5)
        .end("tbody")
        .nl(4)
        .end("table")
        .nl(3)
        .end("div")
        .nl(2)
        .end("div");
}

fn write_tooltip(
    html: &mut Html,
    key: &CellKey,
    count: u64,
    sources: Option<&BTreeMap<String, u64>>,
) {
    let header = format!("{} {}h", key.date.format("%Y-%m-%d"), key.hour);
    html.leaf("div", &[("class", "tooltip-header")], &header)
        .leaf(
            "div",
            &[("class", "tooltip-total")],
            &format!("Total: {count} commits"),
        );

    let Some(sources) = sources else {
        return;
    };
    html.start("div", &[("class", "tooltip-repos")]);
    for (source, commits) in sources {
        html.start("div", &[("class", "tooltip-row")])
            .leaf("span", &[("class", "tooltip-repo")], source)
            .leaf(
                "span",
                &[("class", "tooltip-count")],
                &format!("{commits} commits"),
            )
            .end("div");
    }
    html.end("div");
}

fn write_stats(html: &mut Html, summary: &GridSummary) {
    html.start("div", &[("class", "stats")])
        .nl(3)
        .start("p", &[])
        .text("Total commits: ")
        .leaf("strong", &[], &summary.total_commits.to_string())
        .end("p");

    if summary.has_breakdown() {
        html.nl(3).leaf("p", &[], "Commits by repository:").start("ul", &[]);
        for share in &summary.sources {
            html.nl(4)
                .start("li", &[])
                .leaf("strong", &[], &share.source)
                .text(&format!(": {} commits ({:.1}%)", share.commits, share.percent))
                .end("li");
        }
        html.nl(3).end("ul");
    }

    html.nl(3)
        .start("p", &[])
        .text("Date range: ")
        .leaf("strong", &[], &summary.first_date.format("%Y-%m-%d").to_string())
        .text(" to ")
        .leaf("strong", &[], &summary.last_date.format("%Y-%m-%d").to_string())
        .end("p")
        .nl(3)
        .start("p", &[])
        .leaf("strong", &[], &summary.active_days.to_string())
        .text(" days with commits")
        .end("p")
        .nl(3)
        .start("p", &[])
        .text("Busiest hour: ")
        .leaf(
            "strong",
            &[],
            &format!(
                "{} {}:00",
                summary.busiest.date.format("%Y-%m-%d"),
                summary.busiest.hour
            ),
        )
        .text(&format!(" ({} commits)", summary.busiest.commits))
        .end("p")
        .nl(2)
        .end("div");
}

fn write_legend(html: &mut Html) {
    const LABELS: [&str; 5] = ["0 commits", "Few", "Some", "Many", "Most"];

    html.start("div", &[("class", "legend")])
        .nl(3)
        .leaf("span", &[], "Legend:");
    for (level, label) in LABELS.iter().enumerate() {
        let class = format!("cell level-{level}");
        html.nl(3)
            .start("div", &[("class", "legend-item")])
            .start("div", &[("class", class.as_str())])
            .end("div")
            .leaf("span", &[], label)
            .end("div");
    }
    html.nl(2).end("div");
}

/// Minimal markup writer. Text and attribute values are always escaped;
/// only `raw` bypasses escaping and is reserved for the static style and script blocks.
#[derive(Debug, Default)]
struct Html {
    out: String,
}

impl Html {
    fn new() -> Self {
        Self::default()
    }

    fn start(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in attrs {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&html_escape(value));
            self.out.push('"');
        }
        self.out.push('>');
        self
    }

    fn end(&mut self, tag: &str) -> &mut Self {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
        self
    }

    fn leaf(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) -> &mut Self {
        self.start(tag, attrs).text(text).end(tag)
    }

    fn text(&mut self, text: &str) -> &mut Self {
        self.out.push_str(&html_escape(text));
        self
    }

    fn raw(&mut self, markup: &str) -> &mut Self {
        self.out.push_str(markup);
        self
    }

    /// Newline followed by `depth` levels of indentation.
    fn nl(&mut self, depth: usize) -> &mut Self {
        self.out.push('\n');
        self.out.push_str(&"    ".repeat(depth));
        self
    }

    fn finish(self) -> String {
        self.out
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
        * {
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Consolas', 'Monaco', monospace;
            margin: 0;
            padding: 20px;
            background: linear-gradient(135deg, #0d1117 0%, #161b22 100%);
            color: #c9d1d9;
            min-height: 100vh;
        }

        .container {
            max-width: 1400px;
            margin: 0 auto;
        }

        h1 {
            color: #58a6ff;
            margin: 0 0 20px 0;
            font-size: clamp(24px, 4vw, 32px);
            font-weight: 600;
        }

        .heatmap-wrapper {
            background-color: #161b22;
            border-radius: 8px;
            padding: 20px;
            margin-bottom: 30px;
            box-shadow: 0 4px 6px rgba(0, 0, 0, 0.3);
        }

        .heatmap {
            overflow-x: auto;
            overflow-y: visible;
            -webkit-overflow-scrolling: touch;
        }

        .heatmap::-webkit-scrollbar {
            height: 8px;
        }

        .heatmap::-webkit-scrollbar-track {
            background: #0d1117;
            border-radius: 4px;
        }

        .heatmap::-webkit-scrollbar-thumb {
            background: #30363d;
            border-radius: 4px;
        }

        table {
            border-collapse: collapse;
            width: 100%;
            min-width: 600px;
        }

        thead {
            position: sticky;
            top: 0;
            z-index: 10;
            background-color: #161b22;
        }

        th {
            padding: 8px 4px;
            text-align: center;
            color: #8b949e;
            font-weight: 500;
            font-size: clamp(10px, 1.2vw, 12px);
            white-space: nowrap;
            border-bottom: 2px solid #30363d;
            border-right: 1px solid #21262d;
        }

        th.date-header {
            border-left: 2px solid #30363d;
        }

        th:last-child {
            border-right: none;
        }

        th:first-child {
            text-align: left;
            padding-left: 0;
            min-width: 35px;
        }

        th.year-header {
            background-color: #0d1117;
            border-bottom: 1px solid #30363d;
            border-right: 1px solid #30363d;
            padding: 10px 0;
            position: relative;
            overflow: visible;
        }

        th.year-header .year-text {
            font-weight: 600;
            font-size: clamp(11px, 1.4vw, 14px);
            color: #58a6ff;
            white-space: nowrap;
            position: absolute;
            top: 50%;
            transform: translateY(-50%);
            pointer-events: none;
            opacity: 0;
            transition: opacity 0.2s;
        }

        th.year-header .year-text.visible {
            opacity: 1;
        }

        td {
            padding: 3px 2px;
            text-align: center;
            vertical-align: middle;
            border-right: 1px solid #21262d;
            line-height: 1;
        }

        td:last-child {
            border-right: none;
        }

        tbody tr:nth-child(even) {
            background-color: #0d1117;
        }

        td:first-child {
            color: #8b949e;
            font-weight: 500;
            padding: 3px 6px 3px 0;
            font-size: clamp(11px, 1.3vw, 13px);
            position: sticky;
            left: 0;
            background-color: #161b22;
            z-index: 5;
            text-align: right;
            width: 30px;
            max-width: 30px;
        }

        tbody tr:nth-child(even) td:first-child {
            background-color: #0d1117;
        }

        .cell {
            width: clamp(14px, 1.8vw, 20px);
            height: clamp(14px, 1.8vw, 20px);
            display: inline-block;
            vertical-align: middle;
            border-radius: 2px;
            margin: 0 1px;
            transition: transform 0.2s ease;
            cursor: pointer;
            position: relative;
        }

        .cell:hover {
            transform: scale(1.1);
            z-index: 10;
        }

        .tooltip {
            position: absolute;
            background-color: #161b22;
            color: #c9d1d9;
            padding: 10px 12px;
            border-radius: 6px;
            font-size: 13px;
            line-height: 1.5;
            white-space: normal;
            box-shadow: 0 4px 12px rgba(0, 0, 0, 0.5);
            border: 1px solid #30363d;
            z-index: 1000;
            pointer-events: none;
            opacity: 0;
            visibility: hidden;
            transition: opacity 0.2s ease, visibility 0.2s ease;
            max-width: 320px;
            min-width: 180px;
            bottom: calc(100% + 8px);
            left: 50%;
            transform: translateX(-50%);
        }

        .tooltip::before {
            content: '';
            position: absolute;
            border: 6px solid transparent;
            border-top-color: #161b22;
            top: 100%;
            left: 50%;
            transform: translateX(-50%);
        }

        .tooltip-header {
            font-weight: 600;
            color: #58a6ff;
            margin-bottom: 6px;
            font-size: 14px;
        }

        .tooltip-total {
            color: #8b949e;
            margin-bottom: 8px;
            padding-bottom: 8px;
            border-bottom: 1px solid #21262d;
            font-size: 12px;
        }

        .tooltip-repos {
            display: flex;
            flex-direction: column;
            gap: 4px;
        }

        .tooltip-row {
            display: flex;
            justify-content: space-between;
            gap: 16px;
        }

        .tooltip-repo {
            text-align: left;
            flex: 1;
        }

        .tooltip-count {
            color: #58a6ff;
            font-weight: 500;
            white-space: nowrap;
        }

        .cell:hover .tooltip,
        .cell.active .tooltip {
            opacity: 1;
            visibility: visible;
        }

        .level-0 { background-color: #161b22; border: 1px solid #21262d; }
        .level-1 { background-color: #0e4429; }
        .level-2 { background-color: #006d32; }
        .level-3 { background-color: #26a641; }
        .level-4 { background-color: #39d353; }

        .stats {
            background-color: #161b22;
            border-radius: 8px;
            padding: 24px;
            margin-bottom: 20px;
            box-shadow: 0 4px 6px rgba(0, 0, 0, 0.3);
        }

        .stats p, .stats li {
            margin: 12px 0;
            font-size: clamp(14px, 1.5vw, 16px);
            line-height: 1.6;
        }

        .stats strong {
            color: #58a6ff;
            font-weight: 600;
        }

        .legend {
            background-color: #161b22;
            border-radius: 8px;
            padding: 20px;
            display: flex;
            align-items: center;
            gap: 16px;
            flex-wrap: wrap;
        }

        .legend > span {
            font-weight: 600;
        }

        .legend-item {
            display: flex;
            align-items: center;
            gap: 8px;
            color: #8b949e;
        }

        @media (max-width: 768px) {
            body { padding: 12px; }
            .heatmap-wrapper, .stats, .legend { padding: 12px; }
            th { padding: 6px 3px; }
            td:first-child { width: 25px; max-width: 25px; }
            .tooltip { font-size: 12px; max-width: 280px; min-width: 160px; }
        }
    "#;

const SCRIPT: &str = r#"
        let rafId = null;

        function updateYearPositions() {
            if (rafId) {
                cancelAnimationFrame(rafId);
            }
            rafId = requestAnimationFrame(() => {
                rafId = null;
                const heatmap = document.querySelector('.heatmap');
                if (!heatmap) return;

                const viewport = heatmap.getBoundingClientRect();
                const viewportWidth = viewport.width;

                document.querySelectorAll('th.year-header').forEach(header => {
                    const text = header.querySelector('.year-text');
                    if (!text) return;

                    const rect = header.getBoundingClientRect();
                    const headerLeft = rect.left - viewport.left;
                    const headerRight = headerLeft + rect.width;
                    const textWidth = text.scrollWidth;

                    if (headerRight < 0 || headerLeft > viewportWidth || textWidth > rect.width) {
                        text.classList.remove('visible');
                        return;
                    }

                    const visibleLeft = Math.max(0, headerLeft);
                    const visibleRight = Math.min(viewportWidth, headerRight);
                    const visibleWidth = visibleRight - visibleLeft;
                    if (visibleWidth < textWidth) {
                        text.classList.remove('visible');
                        return;
                    }

                    // Shift from the span's own center to the center of its visible part.
                    const offsetX = (visibleLeft + visibleWidth / 2) - (headerLeft + rect.width / 2);
                    text.style.left = '50%';
                    text.style.transform = `translate(calc(-50% + ${offsetX}px), -50%)`;
                    text.classList.add('visible');
                });
            });
        }

        (function() {
            const heatmap = document.querySelector('.heatmap');
            if (!heatmap) return;

            let ticking = false;
            const throttledUpdate = () => {
                if (ticking) return;
                ticking = true;
                updateYearPositions();
                requestAnimationFrame(() => { ticking = false; });
            };

            heatmap.addEventListener('scroll', throttledUpdate, { passive: true });
            window.addEventListener('resize', throttledUpdate);
            updateYearPositions();
        })();

        (function() {
            let activeCell = null;

            function hideTooltip() {
                if (activeCell) {
                    activeCell.classList.remove('active');
                    activeCell = null;
                }
            }

            function showTooltip(cell) {
                hideTooltip();
                cell.classList.add('active');
                activeCell = cell;
            }

            document.querySelectorAll('.heatmap .cell').forEach(cell => {
                cell.addEventListener('mouseenter', () => showTooltip(cell));
                cell.addEventListener('mouseleave', () => {
                    cell.classList.remove('active');
                    if (activeCell === cell) activeCell = null;
                });
                cell.addEventListener('click', e => {
                    e.stopPropagation();
                    if (activeCell === cell) {
                        hideTooltip();
                    } else {
                        showTooltip(cell);
                    }
                });
            });

            document.addEventListener('click', e => {
                if (!e.target.closest('.cell')) hideTooltip();
            });
        })();
    "#;
