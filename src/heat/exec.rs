use super::output::OutputMeta;
use super::{fetch, fetch_grid, render_html, render_json, render_terminal, resolve_repositories, write_html, NO_DATA};
use crate::cli::{CommonArgs, OutputArgs};
use crate::git::source_name;
use crate::model::CommitFilter;
use anyhow::Context;
use console::style;
use indicatif::{MultiProgress, ProgressDrawTarget};
use tracing::debug;

pub fn exec(common: CommonArgs, output: OutputArgs) -> anyhow::Result<()> {
    let filter = CommitFilter {
        days: common.days,
        since: common.since.clone(),
        until: common.until.clone(),
        author: fetch::author_pattern(common.author.as_deref())
            .context("Invalid --author pattern")?,
        skip_merges: common.no_merges,
        head_only: common.head_only,
    };

    let repos = resolve_repositories(&common.repos).context("Failed to resolve repositories")?;
    debug!(count = repos.len(), "repositories resolved");

    // Keep stdout clean for JSON consumers.
    let progress = if output.json {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    } else {
        MultiProgress::new()
    };

    let grid = match common.jobs {
        Some(jobs) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .context("Failed to build worker pool")?;
            pool.install(|| fetch_grid(&repos, &filter, &progress))
        }
        None => fetch_grid(&repos, &filter, &progress),
    };
    debug!(cells = grid.total_by_cell().len(), commits = grid.total(), "grid aggregated");

    if output.json {
        let meta = OutputMeta {
            repositories: repos.iter().map(|p| source_name(p)).collect(),
            days: common.days,
            since: common.since,
            until: common.until,
            author: common.author,
        };
        println!("{}", render_json(&grid, meta)?);
        return Ok(());
    }

    if grid.is_empty() {
        println!("No commits found");
        return Ok(());
    }

    if let Some(path) = &output.html {
        match render_html(&grid) {
            Some(document) => {
                write_html(path, &document)?;
                println!("{} {}", style("HTML written to:").green(), path.display());
            }
            None => println!("{NO_DATA}"),
        }
        return Ok(());
    }

    print!("{}", render_terminal(&grid, output.color.enabled()));
    Ok(())
}
