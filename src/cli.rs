// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Command-line surface and its normalization into a validated EffectiveConfig
// role: cli/config
// inputs: argv (clap derive)
// outputs: Cli (raw flags), EffectiveConfig (queries, filters, diff options, output path)
// invariants:
// - every FatalConfig error is raised here, before any network call
// - --include-repo and --exclude-repo never both reach the filter
// - diff extensions are normalized (trimmed, dot-less, lower-case); "*" disables the filter
// errors: ConfigError wrapped in anyhow for the binary boundary
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::filter::{ExtensionSet, FilterConfig};
use crate::query::{build_queries, parse_date, SearchQueries};
use crate::report::ReportOptions;
use crate::util;

#[derive(Parser, Debug)]
#[command(
  name = "gh-summary",
  version,
  about = "Render a GitHub user's merged pull requests and commits into a PDF report",
  long_about = None
)]
pub struct Cli {
  /// GitHub login whose activity is reported
  #[arg(short = 'a', long, required_unless_present = "gen_man")]
  pub author: Option<String>,

  /// First day to include (YYYY-MM-DD)
  #[arg(short = 's', long = "start-date", value_name = "YYYY-MM-DD")]
  pub start_date: Option<String>,

  /// Last day to include (YYYY-MM-DD)
  #[arg(short = 'e', long = "end-date", value_name = "YYYY-MM-DD")]
  pub end_date: Option<String>,

  /// Output file name (".pdf" is appended)
  #[arg(short = 'f', long, default_value = "summary")]
  pub filename: String,

  /// Output directory (created when missing)
  #[arg(short = 'p', long, default_value = "./")]
  pub filepath: PathBuf,

  /// Render each record's unified diff under its entry
  #[arg(short = 'd', long)]
  pub include_diff: bool,

  /// Per-record cap on rendered diff lines (0 = no limit)
  #[arg(long, default_value_t = 200)]
  pub max_diff_lines: usize,

  /// File extensions whose diffs are rendered; space or comma separated, dot optional ("*" = all)
  #[arg(
    short = 'D',
    long = "diff-extensions",
    num_args = 1..,
    default_values = ["py", "c", "cpp", "md"]
  )]
  pub diff_extensions: Vec<String>,

  /// Only include these repositories (owner/name)
  #[arg(short = 'i', long = "include-repo", num_args = 1.., conflicts_with = "exclude_repo")]
  pub include_repo: Vec<String>,

  /// Exclude these repositories (owner/name)
  #[arg(short = 'x', long = "exclude-repo", num_args = 1..)]
  pub exclude_repo: Vec<String>,

  /// GitHub API token (default: GITHUB_TOKEN, GH_TOKEN, then `gh auth token`)
  #[arg(long)]
  pub token: Option<String>,

  /// Verbose logging on stderr (RUST_LOG overrides)
  #[arg(short = 'v', long)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub author: String,
  pub queries: SearchQueries,
  pub filters: FilterConfig,
  pub report: ReportOptions,
  pub output: PathBuf,
  pub token: Option<String>,
  pub verbose: bool,
}

fn extension_set(values: &[String]) -> ExtensionSet {
  if values.iter().any(|v| v.trim() == "*") {
    return ExtensionSet::default();
  }

  ExtensionSet::parse(values)
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let author = cli.author.as_deref().unwrap_or_default().trim().to_string();

  let start = cli
    .start_date
    .as_deref()
    .map(|v| parse_date("--start-date", v))
    .transpose()?;
  let end = cli
    .end_date
    .as_deref()
    .map(|v| parse_date("--end-date", v))
    .transpose()?;

  let queries = build_queries(&author, start, end)?;

  let extensions = extension_set(&cli.diff_extensions);
  let filters = FilterConfig::new(cli.include_repo, cli.exclude_repo, extensions.clone())?;

  Ok(EffectiveConfig {
    author,
    queries,
    filters,
    report: ReportOptions {
      include_diff: cli.include_diff,
      max_diff_lines: cli.max_diff_lines,
      extensions,
    },
    output: util::output_path(&cli.filepath, &cli.filename),
    token: cli.token,
    verbose: cli.verbose,
  })
}
