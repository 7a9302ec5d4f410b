use anyhow::Result;
use clap::{Args, Parser, ValueEnum};
use console::Term;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  # Current repository
  commitgrid

  # Several repositories in one grid
  commitgrid --repo ../repo1 --repo ../repo2 --repo ../repo3

  # Only the last 90 days
  commitgrid --days 90

  # Explicit time window
  commitgrid --since 2024-01-01 --until 2024-12-31

  # One author, written to an HTML page
  commitgrid --repo ../repo1 --author \"John\" --since 2024-01-01 --html grid.html";

#[derive(Parser)]
#[command(name = "commitgrid")]
#[command(about = "Commit activity grid: calendar date by hour of day, for one or more git repositories")]
#[command(version)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Clone, Debug, Default)]
pub struct CommonArgs {
    #[arg(long = "repo", value_name = "PATH", help = "Repository to include (repeat for several; defaults to the current directory)")]
    pub repos: Vec<PathBuf>,

    #[arg(long, value_name = "N", help = "Only commits from the last N days")]
    pub days: Option<u32>,

    #[arg(long, value_name = "DATE", help = "Only commits after this date (RFC3339, YYYY-MM-DD, \"2 weeks ago\", 90days, or a revision)")]
    pub since: Option<String>,

    #[arg(long, value_name = "DATE", help = "Only commits before this date (same formats as --since)")]
    pub until: Option<String>,

    #[arg(long, value_name = "PATTERN", help = "Only commits whose author \"Name <email>\" matches this regular expression")]
    pub author: Option<String>,

    #[arg(long, help = "Skip merge commits")]
    pub no_merges: bool,

    #[arg(long, help = "Walk only history reachable from HEAD instead of all references")]
    pub head_only: bool,

    #[arg(long, value_name = "N", help = "Number of repositories analyzed in parallel")]
    pub jobs: Option<usize>,
}

#[derive(Args, Clone, Debug)]
pub struct OutputArgs {
    #[arg(long, value_name = "FILE", conflicts_with = "json", help = "Write an HTML page to FILE instead of printing the grid")]
    pub html: Option<PathBuf>,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, help = "Colorize the terminal grid")]
    pub color: ColorChoice,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal.
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => Term::stdout().is_term(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::heat::exec(self.common, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repeated_repo_flags_accumulate() {
        let cli = Cli::try_parse_from([
            "commitgrid", "--repo", "a", "--repo", "b", "--days", "30", "--color", "never",
        ])
        .unwrap();
        assert_eq!(cli.common.repos, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(cli.common.days, Some(30));
        assert_eq!(cli.output.color, ColorChoice::Never);
        assert!(!cli.output.color.enabled());
    }

    #[test]
    fn html_and_json_are_exclusive() {
        assert!(Cli::try_parse_from(["commitgrid", "--html", "x.html", "--json"]).is_err());
    }
}
