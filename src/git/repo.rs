use crate::error::{GridError, Result};
use crate::model::{CommitFilter, CommitRecord, DateRange};
use crate::util::cell_of;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use gix::{discover, ObjectId, Repository};
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source id used in breakdowns: the repository directory name.
    pub fn name(&self) -> String {
        source_name(&self.path)
    }

    pub fn resolve_range(&self, since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
        let mut range = DateRange::new();

        let since_dt = since.map(|s| self.parse_commit_or_date(s)).transpose()?;
        let until_dt = until.map(|u| self.parse_commit_or_date(u)).transpose()?;

        if let (Some(s), Some(u)) = (since_dt, until_dt) {
            if s > u {
                return Err(GridError::InvalidDate(format!(
                    "Invalid range: since ({s}) is after until ({u})"
                )));
            }
        }

        if let Some(s) = since_dt {
            range = range.with_since(s);
        }
        if let Some(u) = until_dt {
            range = range.with_until(u);
        }

        Ok(range)
    }

    fn parse_commit_or_date(&self, input: &str) -> Result<DateTime<Utc>> {
        if let Some(dt) = parse_date(input)? {
            return Ok(dt);
        }

        // Fallback to Git ref
        let id = self
            .repo
            .rev_parse_single(input)
            .map_err(|e| GridError::Parse(format!("Invalid commit or date '{input}': {e}")))?;

        let commit = id
            .object()?
            .try_into_commit()
            .map_err(|_| GridError::Parse(format!("Not a commit: {input}")))?;

        let secs = commit.time()?.seconds;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| GridError::InvalidDate(format!("Invalid timestamp: {secs}")))
    }

    /// Walk the history and reduce every commit that passes `filter` to a grid record.
    pub fn collect_records(
        &self,
        range: &DateRange,
        filter: &CommitFilter,
        progress: &ProgressBar,
    ) -> Result<Vec<CommitRecord>> {
        let source = self.name();
        let mut records = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack = self.tips(filter.head_only)?;

        while let Some(commit_id) = stack.pop() {
            if !seen.insert(commit_id) {
                continue;
            }

            // Tags may point at trees or blobs.
            let Ok(commit) = self.repo.find_commit(commit_id) else {
                debug!(%commit_id, "skipping non-commit object");
                continue;
            };

            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.detach()).collect();
            let is_merge = parents.len() > 1;
            stack.extend(parents);

            let time = commit.time()?;
            let timestamp = DateTime::from_timestamp(time.seconds, 0).ok_or_else(|| {
                GridError::InvalidDate(format!("Invalid timestamp: {}", time.seconds))
            })?;

            if !range.contains(&timestamp) || (filter.skip_merges && is_merge) {
                continue;
            }

            let author = commit.author()?;
            if let Some(pattern) = &filter.author {
                let ident = format!("{} <{}>", author.name, author.email);
                if !pattern.is_match(&ident) {
                    continue;
                }
            }

            // Range filters use committer time; the cell is the author's wall clock.
            let authored = author.time()?;
            match cell_of(authored.seconds, authored.offset) {
                Some((date, hour)) => {
                    records.push(CommitRecord::new(date, hour, source.clone()));
                    progress.inc(1);
                }
                None => debug!(%commit_id, offset = authored.offset, "unrepresentable author time"),
            }
        }

        debug!(repo = %self.path.display(), visited = seen.len(), kept = records.len(), "history walk finished");
        Ok(records)
    }

    /// Starting points of the walk: HEAD, plus every reference unless `head_only`.
    fn tips(&self, head_only: bool) -> Result<Vec<ObjectId>> {
        let mut head = self.repo.head()?;
        let mut tips = vec![head.peel_to_commit_in_place()?.id];

        if head_only {
            return Ok(tips);
        }

        let platform = self
            .repo
            .references()
            .map_err(|e| GridError::GitRepo(format!("Failed to list references: {e}")))?;
        let references = platform
            .all()
            .map_err(|e| GridError::GitRepo(format!("Failed to list references: {e}")))?;

        for mut reference in references.flatten() {
            match reference.peel_to_id_in_place() {
                Ok(id) => tips.push(id.detach()),
                Err(e) => debug!("cannot peel reference: {e}"),
            }
        }

        Ok(tips)
    }
}

pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse a date bound that does not need a repository: RFC3339, `YYYY-MM-DD`,
/// `"N days/weeks/months ago"`, or a compact duration such as `90days`.
/// `Ok(None)` means the input should be tried as a git revision.
pub fn parse_date(input: &str) -> Result<Option<DateTime<Utc>>> {
    // RFC3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    // YYYY-MM-DD
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(Utc.from_utc_datetime(&datetime)));
        }
    }

    // Relative duration (e.g., "90days", "2 weeks ago")
    if let Some(duration) = parse_natural_duration(input) {
        return ago(duration, input).map(Some);
    }

    Ok(None)
}

/// `now - duration`, as a UTC timestamp.
pub fn ago(duration: Duration, input: &str) -> Result<DateTime<Utc>> {
    let target = SystemTime::now()
        .checked_sub(duration)
        .ok_or_else(|| GridError::InvalidDate(format!("Duration overflow for '{input}'")))?;
    Ok(DateTime::<Utc>::from(target))
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    let units = [
        (" days ago", 86_400),
        (" weeks ago", 7 * 86_400),
        (" months ago", 30 * 86_400),
    ];
    for (suffix, secs) in units {
        if let Some(n) = input.strip_suffix(suffix) {
            if let Ok(n) = n.trim().parse::<u64>() {
                return Some(Duration::from_secs(n * secs));
            }
        }
    }

    humantime::parse_duration(&input).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn parses_calendar_dates() {
        let dt = parse_date("2024-03-01").unwrap().unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        let dt = parse_date("2024-03-01T12:00:00+02:00").unwrap().unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn parses_relative_phrases() {
        let now = Utc::now();
        for input in ["2 weeks ago", "14days", "14 days ago"] {
            let dt = parse_date(input).unwrap().unwrap();
            let delta = now - dt;
            assert!(
                delta > ChronoDuration::days(13) && delta < ChronoDuration::days(15),
                "{input} gave {dt}"
            );
        }
    }

    #[test]
    fn unknown_input_falls_through_to_revision() {
        assert!(parse_date("main").unwrap().is_none());
        assert!(parse_date("HEAD~3").unwrap().is_none());
    }

    #[test]
    fn source_name_is_last_component() {
        assert_eq!(source_name(Path::new("/work/projects/alpha")), "alpha");
    }
}
