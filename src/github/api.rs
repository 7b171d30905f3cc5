// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub search and diff-fetch capabilities behind one trait (HTTP backend + env fixture backend)
// role: github/api
// inputs: search kind/query/page; repository + DiffLocator; token from flag, env GITHUB_TOKEN/GH_TOKEN, or `gh auth token`
// outputs: SearchPage (raw JSON items + paging hints); raw unified diff text
// side_effects: Network calls to api.github.com; spawns `gh` subprocess during token discovery
// invariants:
// - Never panic; every HTTP/transport failure maps to an ApiError variant
// - Token discovery prefers the explicit flag, then GITHUB_TOKEN, then GH_TOKEN, then `gh auth token`
// - Diff bodies decode as UTF-8, falling back to a byte-for-byte Latin-1 mapping
// - Any GHS_TEST_* variable selects the env fixture backend (no network)
// errors: ApiError::{Unauthorized, NotFound, RateLimited, ResultCeiling, Network, Decode}
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Read;

use tracing::debug;

use crate::error::ApiError;
use crate::ext::serde_json::JsonFetch;
use crate::model::DiffLocator;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "gh-summary";
const API_VERSION: &str = "2022-11-28";

pub const ENV_COMMITS_JSON: &str = "GHS_TEST_COMMITS_JSON";
pub const ENV_PRS_JSON: &str = "GHS_TEST_PRS_JSON";
pub const ENV_DIFFS_JSON: &str = "GHS_TEST_DIFFS_JSON";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
  Commits,
  Issues,
}

impl SearchKind {
  fn path(self) -> &'static str {
    match self {
      SearchKind::Commits => "search/commits",
      SearchKind::Issues => "search/issues",
    }
  }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
  pub items: Vec<serde_json::Value>,
  pub total_count: u64,
  pub incomplete_results: bool,
  /// Explicit "more pages" signal when the backend provides one (HTTP `Link` header).
  pub has_next: Option<bool>,
}

impl SearchPage {
  fn from_body(body: &serde_json::Value, has_next: Option<bool>) -> Result<Self, ApiError> {
    let items = body
      .fetch("items")
      .to::<Vec<serde_json::Value>>()
      .ok_or_else(|| ApiError::Decode("search response without `items` array".into()))?;

    Ok(Self {
      total_count: body.fetch("total_count").to::<u64>().unwrap_or(items.len() as u64),
      incomplete_results: body.fetch("incomplete_results").to_or_default::<bool>(),
      items,
      has_next,
    })
  }
}

// --- Trait seam for GitHub API ---
pub trait GithubApi {
  /// `page` is 1-based.
  fn search(&self, kind: SearchKind, query: &str, page: u32, per_page: u32) -> Result<SearchPage, ApiError>;
  /// Unified diff text for a commit or pull request; empty when there is no content.
  fn fetch_diff(&self, repository: &str, locator: &DiffLocator) -> Result<String, ApiError>;
}

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn get_github_token() -> Option<String> {
  if let Ok(t) = std::env::var("GITHUB_TOKEN") {
    if !t.trim().is_empty() {
      return Some(t.trim().to_string());
    }
  }

  if let Ok(gh_token) = std::env::var("GH_TOKEN") {
    if !gh_token.trim().is_empty() {
      return Some(gh_token.trim().to_string());
    }
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

/// Explicit `--token` wins over discovery.
pub fn resolve_token(explicit: Option<&str>) -> Option<String> {
  explicit
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_string)
    .or_else(get_github_token)
}

/// Map a non-2xx status to the error taxonomy.
pub fn map_status(code: u16, rate_limit_remaining: Option<&str>, is_search: bool) -> ApiError {
  match code {
    401 => ApiError::Unauthorized,
    403 if rate_limit_remaining.map(str::trim) == Some("0") => ApiError::RateLimited,
    403 => ApiError::Unauthorized,
    404 => ApiError::NotFound,
    422 if is_search => ApiError::ResultCeiling,
    429 => ApiError::RateLimited,
    other => ApiError::Network(format!("HTTP {}", other)),
  }
}

/// `Link: <...&page=3>; rel="next", <...>; rel="last"`
pub fn link_has_next(link: Option<&str>) -> Option<bool> {
  link.map(|l| l.split(',').any(|part| part.contains("rel=\"next\"")))
}

pub fn decode_diff_bytes(bytes: Vec<u8>) -> String {
  match String::from_utf8(bytes) {
    Ok(s) => s,
    Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
  }
}

pub struct GithubHttpApi {
  agent: ureq::Agent,
  base: String,
  token: Option<String>,
}

impl GithubHttpApi {
  pub fn new(token: Option<String>) -> Self {
    Self::with_base(DEFAULT_API_BASE, token)
  }

  pub fn with_base(base: &str, token: Option<String>) -> Self {
    Self {
      agent: ureq::AgentBuilder::new().build(),
      base: base.trim_end_matches('/').to_string(),
      token,
    }
  }

  fn request(&self, url: &str, accept: &str) -> ureq::Request {
    let req = self
      .agent
      .get(url)
      .set("Accept", accept)
      .set("User-Agent", USER_AGENT)
      .set("X-GitHub-Api-Version", API_VERSION);

    match &self.token {
      Some(t) => req.set("Authorization", &format!("Bearer {}", t)),
      None => req,
    }
  }
}

fn call(req: ureq::Request, is_search: bool) -> Result<ureq::Response, ApiError> {
  match req.call() {
    Ok(resp) => Ok(resp),
    Err(ureq::Error::Status(code, resp)) => {
      debug!(code, url = resp.get_url(), "github request failed");
      Err(map_status(code, resp.header("x-ratelimit-remaining"), is_search))
    }
    Err(ureq::Error::Transport(t)) => Err(ApiError::Network(t.to_string())),
  }
}

impl GithubApi for GithubHttpApi {
  fn search(&self, kind: SearchKind, query: &str, page: u32, per_page: u32) -> Result<SearchPage, ApiError> {
    let url = format!("{}/{}", self.base, kind.path());
    let req = self
      .request(&url, "application/vnd.github+json")
      .query("q", query)
      .query("per_page", &per_page.to_string())
      .query("page", &page.to_string());

    let resp = call(req, true)?;
    let has_next = link_has_next(resp.header("link"));
    let body = resp
      .into_json::<serde_json::Value>()
      .map_err(|e| ApiError::Decode(e.to_string()))?;

    SearchPage::from_body(&body, has_next)
  }

  fn fetch_diff(&self, repository: &str, locator: &DiffLocator) -> Result<String, ApiError> {
    let url = match locator {
      DiffLocator::Commit { sha } => format!("{}/repos/{}/commits/{}", self.base, repository, sha),
      DiffLocator::PullRequest { number } => format!("{}/repos/{}/pulls/{}", self.base, repository, number),
    };

    let resp = call(self.request(&url, "application/vnd.github.diff"), false)?;
    let mut bytes = Vec::new();
    resp
      .into_reader()
      .read_to_end(&mut bytes)
      .map_err(|e| ApiError::Network(e.to_string()))?;

    Ok(decode_diff_bytes(bytes))
  }
}

/// Fixture backend: search results and diffs come from GHS_TEST_* variables.
///
/// - `GHS_TEST_COMMITS_JSON` / `GHS_TEST_PRS_JSON`: a search response object
///   (`{"total_count", "incomplete_results", "items"}`) or a bare array of items;
///   pages are sliced from the item list.
/// - `GHS_TEST_DIFFS_JSON`: object keyed by `owner/name@<sha>` or `owner/name#<number>`;
///   a string value is the diff text, a number is an HTTP status to fail with.
///   Unknown keys yield an empty diff.
pub struct GithubEnvApi;

fn env_json(key: &str) -> Result<Option<serde_json::Value>, ApiError> {
  let Ok(s) = std::env::var(key) else {
    return Ok(None);
  };

  serde_json::from_str::<serde_json::Value>(&s)
    .map(Some)
    .map_err(|e| ApiError::Decode(format!("{}: {}", key, e)))
}

impl GithubApi for GithubEnvApi {
  fn search(&self, kind: SearchKind, _query: &str, page: u32, per_page: u32) -> Result<SearchPage, ApiError> {
    let key = match kind {
      SearchKind::Commits => ENV_COMMITS_JSON,
      SearchKind::Issues => ENV_PRS_JSON,
    };

    let body = env_json(key)?.unwrap_or_else(|| serde_json::json!([]));
    let full = if body.is_array() {
      SearchPage::from_body(&serde_json::json!({ "items": body }), None)?
    } else {
      SearchPage::from_body(&body, None)?
    };

    let per_page = per_page.max(1) as usize;
    let start = (page.saturating_sub(1) as usize).saturating_mul(per_page);
    let items: Vec<serde_json::Value> = full.items.iter().skip(start).take(per_page).cloned().collect();
    let has_next = start + items.len() < full.items.len();

    Ok(SearchPage {
      items,
      total_count: full.total_count,
      incomplete_results: full.incomplete_results,
      has_next: Some(has_next),
    })
  }

  fn fetch_diff(&self, repository: &str, locator: &DiffLocator) -> Result<String, ApiError> {
    let Some(map) = env_json(ENV_DIFFS_JSON)? else {
      return Ok(String::new());
    };

    let key = match locator {
      DiffLocator::Commit { sha } => format!("{}@{}", repository, sha),
      DiffLocator::PullRequest { number } => format!("{}#{}", repository, number),
    };

    match map.get(&key) {
      Some(serde_json::Value::String(s)) => Ok(s.clone()),
      Some(serde_json::Value::Number(n)) => {
        let code = n.as_u64().and_then(|c| u16::try_from(c).ok()).unwrap_or(500);
        Err(map_status(code, None, false))
      }
      _ => Ok(String::new()),
    }
  }
}

pub fn env_wants_mock() -> bool {
  [ENV_COMMITS_JSON, ENV_PRS_JSON, ENV_DIFFS_JSON]
    .iter()
    .any(|k| std::env::var(k).is_ok())
}

pub fn build_api(token: Option<String>) -> Box<dyn GithubApi> {
  if env_wants_mock() {
    debug!("using GHS_TEST_* fixture backend");
    Box::new(GithubEnvApi)
  } else {
    Box::new(GithubHttpApi::new(token))
  }
}
