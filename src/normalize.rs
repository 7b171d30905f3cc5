// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Map raw commit/PR search items into uniform ActivityRecords
// role: normalize/records
// inputs: serde_json::Value items from /search/commits and /search/issues
// outputs: ActivityRecord (or RecordError for a single malformed item)
// invariants:
// - commits: identifier = first 7 chars of sha; timestamp = commit.author.date
// - pull requests: identifier = "#<number>"; timestamp = pull_request.merged_at
// - a malformed item never aborts the run; callers turn RecordError into a warning
// errors: RecordError::{MissingField, BadTimestamp}
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, FixedOffset};

use crate::error::RecordError;
use crate::ext::serde_json::JsonFetch;
use crate::model::{ActivityRecord, DiffLocator, RecordKind};

/// Repository "owner/name" of a raw search item, used by RepoFilter before normalization.
pub fn raw_repository(kind: RecordKind, item: &serde_json::Value) -> Option<String> {
  match kind {
    RecordKind::Commit => item.fetch("repository.full_name").str().map(str::to_string),
    RecordKind::PullRequest => item.fetch("repository_url").str().and_then(repo_from_api_url),
  }
}

/// "https://api.github.com/repos/octo/site" -> "octo/site"
fn repo_from_api_url(url: &str) -> Option<String> {
  let mut parts = url.trim_end_matches('/').rsplit('/');
  let name = parts.next().filter(|s| !s.is_empty())?;
  let owner = parts.next().filter(|s| !s.is_empty())?;

  Some(format!("{}/{}", owner, name))
}

pub fn normalize(kind: RecordKind, item: &serde_json::Value) -> Result<ActivityRecord, RecordError> {
  match kind {
    RecordKind::Commit => normalize_commit(item),
    RecordKind::PullRequest => normalize_pull_request(item),
  }
}

pub fn normalize_commit(item: &serde_json::Value) -> Result<ActivityRecord, RecordError> {
  let kind = RecordKind::Commit;

  let sha = required_str(item, kind, "sha")?;
  let repository = raw_repository(kind, item).ok_or(RecordError::MissingField {
    kind,
    field: "repository.full_name",
  })?;
  let message = required_str(item, kind, "commit.message")?;
  let date = required_str(item, kind, "commit.author.date")?;
  let url = required_str(item, kind, "html_url")?;

  let (title, body) = split_message(message);

  Ok(ActivityRecord {
    kind,
    repository,
    title,
    identifier: sha.chars().take(7).collect(),
    timestamp: parse_timestamp(kind, date)?,
    url: url.to_string(),
    author: item.fetch("commit.author.name").str().map(str::to_string),
    body,
    locator: DiffLocator::Commit { sha: sha.to_string() },
  })
}

pub fn normalize_pull_request(item: &serde_json::Value) -> Result<ActivityRecord, RecordError> {
  let kind = RecordKind::PullRequest;

  let number = item.fetch("number").to::<u64>().ok_or(RecordError::MissingField { kind, field: "number" })?;
  let title = required_str(item, kind, "title")?;
  let repository = raw_repository(kind, item).ok_or(RecordError::MissingField {
    kind,
    field: "repository_url",
  })?;
  let merged_at = required_str(item, kind, "pull_request.merged_at")?;
  let url = item
    .fetch("html_url")
    .str()
    .or_else(|| item.fetch("pull_request.html_url").str())
    .ok_or(RecordError::MissingField { kind, field: "html_url" })?;

  let body = item
    .fetch("body")
    .str()
    .map(|b| b.replace('\r', ""))
    .filter(|b| !b.trim().is_empty());

  Ok(ActivityRecord {
    kind,
    repository,
    title: title.trim().to_string(),
    identifier: format!("#{}", number),
    timestamp: parse_timestamp(kind, merged_at)?,
    url: url.to_string(),
    author: item.fetch("user.login").str().map(str::to_string),
    body,
    locator: DiffLocator::PullRequest { number },
  })
}

fn required_str<'a>(item: &'a serde_json::Value, kind: RecordKind, field: &'static str) -> Result<&'a str, RecordError> {
  item
    .fetch(field)
    .str()
    .filter(|s| !s.trim().is_empty())
    .ok_or(RecordError::MissingField { kind, field })
}

fn parse_timestamp(kind: RecordKind, value: &str) -> Result<DateTime<FixedOffset>, RecordError> {
  DateTime::parse_from_rfc3339(value).map_err(|_| RecordError::BadTimestamp {
    kind,
    value: value.to_string(),
  })
}

/// First line is the title; the rest (trimmed) is the body.
fn split_message(message: &str) -> (String, Option<String>) {
  let message = message.replace('\r', "");
  let mut parts = message.splitn(2, '\n');
  let title = parts.next().unwrap_or("").trim().to_string();
  let body = parts.next().map(|b| b.trim().to_string()).filter(|b| !b.is_empty());

  (title, body)
}
