// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed error taxonomy for configuration, GitHub capabilities, record normalization, diff parsing and output
// role: errors/types
// outputs: ConfigError, ApiError, RecordError, DiffParseError, OutputError (thiserror enums)
// invariants:
// - ConfigError and OutputError are fatal; RecordError and DiffParseError are per-record warnings
// - ApiError is fatal on the primary search calls only; per-record on diff fetches
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

use thiserror::Error;

use crate::model::RecordKind;

/// Problems detected before any network call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("--author is required")]
  MissingAuthor,
  #[error("invalid {flag} '{value}', expected YYYY-MM-DD")]
  InvalidDate { flag: &'static str, value: String },
  #[error("invalid date range: end date {end} precedes start date {start}")]
  InvalidDateRange { start: String, end: String },
  #[error("--include-repo and --exclude-repo are mutually exclusive")]
  ConflictingRepoFilters,
}

/// Failures reported by the search and diff-fetch capabilities.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
  #[error("unauthorized (check the token or repository visibility)")]
  Unauthorized,
  #[error("not found")]
  NotFound,
  #[error("rate limited by the GitHub API")]
  RateLimited,
  #[error("search result ceiling reached")]
  ResultCeiling,
  #[error("network error: {0}")]
  Network(String),
  #[error("unexpected response: {0}")]
  Decode(String),
}

impl ApiError {
  /// Unauthorized and NotFound are indistinguishable for private repositories.
  pub fn is_access_denied(&self) -> bool {
    matches!(self, ApiError::Unauthorized | ApiError::NotFound)
  }
}

/// A raw search item that cannot become an `ActivityRecord`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
  #[error("malformed {kind} record: missing `{field}`")]
  MissingField { kind: RecordKind, field: &'static str },
  #[error("malformed {kind} record: unparsable timestamp '{value}'")]
  BadTimestamp { kind: RecordKind, value: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffParseError {
  #[error("malformed hunk header in {path}: '{header}'")]
  MalformedHunkHeader { path: String, header: String },
}

#[derive(Debug, Error)]
pub enum OutputError {
  #[error("cannot write report to {}: {source}", path.display())]
  OutputWrite {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("PDF backend failed while writing {}: {message}", path.display())]
  Pdf { path: PathBuf, message: String },
}
