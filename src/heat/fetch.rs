use super::aggregate::GridAggregate;
use crate::error::{GridError, Result};
use crate::git::{repo::ago, source_name, GitRepo};
use crate::model::{CommitFilter, CommitRecord};
use crate::util::warn;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Turn the `--repo` arguments into repository directories.
///
/// Paths that do not exist or have no `.git` entry are skipped with a warning.
/// With no arguments the current directory must itself be a repository.
pub fn resolve_repositories(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if paths.is_empty() {
        let cwd = std::env::current_dir()?;
        if cwd.join(".git").exists() {
            return Ok(vec![cwd]);
        }
        return Err(GridError::NotARepository(cwd));
    }

    let mut resolved = Vec::with_capacity(paths.len());
    for path in paths {
        let Ok(canonical) = std::fs::canonicalize(path) else {
            warn(format!("repository path does not exist: {}", path.display()));
            continue;
        };
        if !canonical.join(".git").exists() {
            warn(format!("not a git repository: {}", canonical.display()));
            continue;
        }
        resolved.push(canonical);
    }

    if resolved.is_empty() {
        return Err(GridError::NoRepositories);
    }
    Ok(resolved)
}

pub fn author_pattern(pattern: Option<&str>) -> Result<Option<Regex>> {
    Ok(pattern.map(Regex::new).transpose()?)
}

/// Read the commit records of one repository.
pub fn fetch_records(
    path: &Path,
    filter: &CommitFilter,
    progress: &ProgressBar,
) -> Result<Vec<CommitRecord>> {
    let repo = GitRepo::open(Some(path))?;
    let mut range = repo.resolve_range(filter.since.as_deref(), filter.until.as_deref())?;
    if let Some(days) = filter.days {
        let cutoff = ago(Duration::from_secs(u64::from(days) * 86_400), "--days")?;
        range = range.narrow_since(cutoff);
    }
    debug!(repo = %repo.path().display(), since = ?range.since, until = ?range.until, "resolved range");

    repo.collect_records(&range, filter, progress)
}

/// Like [`fetch_records`], but a failing repository only produces a warning
/// and contributes nothing.
pub fn fetch_records_or_warn(
    path: &Path,
    filter: &CommitFilter,
    progress: &ProgressBar,
) -> Vec<CommitRecord> {
    match fetch_records(path, filter, progress) {
        Ok(records) => records,
        Err(e) => {
            warn(format!("cannot read commit history of {}: {e}", path.display()));
            Vec::new()
        }
    }
}

/// Aggregate all repositories, one rayon task per repository.
///
/// Every task builds its own partial grid and the partials are summed, so the
/// result does not depend on which repository finishes first.
pub fn fetch_grid(paths: &[PathBuf], filter: &CommitFilter, progress: &MultiProgress) -> GridAggregate {
    paths
        .par_iter()
        .map(|path| {
            let name = source_name(path);
            let bar = progress.add(ProgressBar::new_spinner());
            start_spinner(&bar, &name);
            let records = fetch_records_or_warn(path, filter, &bar);
            bar.finish_with_message(format!("{name}: found {} commits", records.len()));
            info!(repo = %path.display(), commits = records.len(), "repository analyzed");
            GridAggregate::from_records(&records)
        })
        .reduce(GridAggregate::new, GridAggregate::merged)
}

fn start_spinner(pb: &ProgressBar, name: &str) {
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Analyzing {name}..."));
    pb.enable_steady_tick(Duration::from_millis(100));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_plain_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain");
        std::fs::create_dir(&plain).unwrap();
        let repo = dir.path().join("repo");
        std::fs::create_dir_all(repo.join(".git")).unwrap();

        let resolved = resolve_repositories(&[
            dir.path().join("missing"),
            plain,
            repo.clone(),
        ])
        .unwrap();
        assert_eq!(resolved, vec![std::fs::canonicalize(repo).unwrap()]);
    }

    #[test]
    fn nothing_resolvable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_repositories(&[dir.path().join("missing")]).unwrap_err();
        assert!(matches!(err, GridError::NoRepositories));
    }

    #[test]
    fn invalid_author_pattern_is_rejected() {
        assert!(matches!(
            author_pattern(Some("(unclosed")),
            Err(GridError::AuthorPattern(_))
        ));
        assert!(author_pattern(None).unwrap().is_none());
        assert!(author_pattern(Some("^Jane")).unwrap().unwrap().is_match("Jane Doe <j@x>"));
    }

    #[test]
    fn broken_repository_contributes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let bar = ProgressBar::hidden();
        let records = fetch_records_or_warn(dir.path(), &CommitFilter::default(), &bar);
        assert!(records.is_empty());
    }
}
