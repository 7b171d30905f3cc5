// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build GitHub search query strings for an author's commits and merged pull requests over a date range
// role: query/builder
// inputs: author login; optional start/end dates (YYYY-MM-DD)
// outputs: SearchQueries { commits, pull_requests, range }
// invariants:
// - end < start is rejected with ConfigError::InvalidDateRange
// - a single bound yields an open-ended qualifier (>=start or <=end); no bounds yields no qualifier
// errors: ConfigError (fatal, raised before any network call)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDate;

use crate::error::ConfigError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
  pub start: Option<NaiveDate>,
  pub end: Option<NaiveDate>,
}

impl DateRange {
  pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ConfigError> {
    if let (Some(s), Some(e)) = (start, end) {
      if e < s {
        return Err(ConfigError::InvalidDateRange {
          start: s.format(DATE_FORMAT).to_string(),
          end: e.format(DATE_FORMAT).to_string(),
        });
      }
    }

    Ok(Self { start, end })
  }

  /// Search qualifier value: `a..b`, `>=a`, `<=b`, or None when unbounded.
  pub fn qualifier(&self) -> Option<String> {
    match (self.start, self.end) {
      (Some(s), Some(e)) => Some(format!("{}..{}", s.format(DATE_FORMAT), e.format(DATE_FORMAT))),
      (Some(s), None) => Some(format!(">={}", s.format(DATE_FORMAT))),
      (None, Some(e)) => Some(format!("<={}", e.format(DATE_FORMAT))),
      (None, None) => None,
    }
  }

  /// Human description for the report header.
  pub fn describe(&self) -> String {
    match (self.start, self.end) {
      (Some(s), Some(e)) => format!("{} .. {}", s.format(DATE_FORMAT), e.format(DATE_FORMAT)),
      (Some(s), None) => format!("since {}", s.format(DATE_FORMAT)),
      (None, Some(e)) => format!("until {}", e.format(DATE_FORMAT)),
      (None, None) => "all time".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQueries {
  pub commits: String,
  pub pull_requests: String,
  pub range: DateRange,
}

/// Parse a `YYYY-MM-DD` flag value.
pub fn parse_date(flag: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
  NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ConfigError::InvalidDate {
    flag,
    value: value.to_string(),
  })
}

pub fn build_queries(
  author: &str,
  start: Option<NaiveDate>,
  end: Option<NaiveDate>,
) -> Result<SearchQueries, ConfigError> {
  let author = author.trim();

  if author.is_empty() {
    return Err(ConfigError::MissingAuthor);
  }

  let range = DateRange::new(start, end)?;

  let mut commits = format!("author:{}", author);
  let mut pull_requests = format!("type:pr is:merged author:{}", author);

  if let Some(q) = range.qualifier() {
    commits.push_str(&format!(" author-date:{}", q));
    pull_requests.push_str(&format!(" merged:{}", q));
  }

  Ok(SearchQueries {
    commits,
    pull_requests,
    range,
  })
}
