// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drive a search query across result pages as a lazy, single-use sequence
// role: github/paginate
// inputs: &dyn GithubApi, SearchKind, query string
// outputs: SearchPages iterator; SearchResults { items, total_count, capped, incomplete }
// invariants:
// - pages are requested in order starting at 1; server ordering is preserved (no re-sorting)
// - stops on a short page, an explicit "no next page" signal, or the 1000-result ceiling
// - hitting the ceiling (or a 422 past it) is a partial result, never a failure
// errors: ApiError from the first failing page (other than ResultCeiling) is returned as-is
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use tracing::debug;

use crate::error::ApiError;
use crate::github::api::{GithubApi, SearchKind, SearchPage};

pub const PER_PAGE: u32 = 100;
/// GitHub search never returns more than this many results for one query.
pub const RESULT_CEILING: usize = 1000;

pub struct SearchPages<'a> {
  api: &'a dyn GithubApi,
  kind: SearchKind,
  query: String,
  per_page: u32,
  next_page: u32,
  fetched: usize,
  done: bool,
}

impl<'a> SearchPages<'a> {
  pub fn new(api: &'a dyn GithubApi, kind: SearchKind, query: impl Into<String>) -> Self {
    Self::with_page_size(api, kind, query, PER_PAGE)
  }

  pub fn with_page_size(api: &'a dyn GithubApi, kind: SearchKind, query: impl Into<String>, per_page: u32) -> Self {
    Self {
      api,
      kind,
      query: query.into(),
      per_page: per_page.max(1),
      next_page: 1,
      fetched: 0,
      done: false,
    }
  }
}

impl Iterator for SearchPages<'_> {
  type Item = Result<SearchPage, ApiError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }

    let page = match self.api.search(self.kind, &self.query, self.next_page, self.per_page) {
      Ok(p) => p,
      Err(e) => {
        self.done = true;
        return Some(Err(e));
      }
    };

    debug!(
      kind = ?self.kind,
      page = self.next_page,
      items = page.items.len(),
      total = page.total_count,
      "search page"
    );

    self.fetched += page.items.len();
    self.next_page += 1;

    let short_page = page.items.len() < self.per_page as usize;
    let no_next = page.has_next == Some(false);
    // total_count is only a hint and undercounts when results are incomplete.
    let at_ceiling = self.fetched >= RESULT_CEILING;

    if short_page || no_next || at_ceiling {
      self.done = true;
    }

    Some(Ok(page))
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
  pub items: Vec<serde_json::Value>,
  pub total_count: u64,
  /// The server reports more matches than could be paged through.
  pub capped: bool,
  /// The server flagged at least one page as incomplete (search timeout).
  pub incomplete: bool,
}

impl SearchResults {
  pub fn is_partial(&self) -> bool {
    self.capped || self.incomplete
  }
}

pub fn collect_search(api: &dyn GithubApi, kind: SearchKind, query: &str) -> Result<SearchResults, ApiError> {
  collect_pages(SearchPages::new(api, kind, query))
}

pub fn collect_pages(pages: SearchPages<'_>) -> Result<SearchResults, ApiError> {
  let mut out = SearchResults::default();

  for page in pages {
    match page {
      Ok(p) => {
        out.total_count = out.total_count.max(p.total_count);
        out.incomplete |= p.incomplete_results;
        out.items.extend(p.items);
      }
      Err(ApiError::ResultCeiling) => {
        out.capped = true;
        break;
      }
      Err(e) => return Err(e),
    }
  }

  if out.total_count > out.items.len() as u64 && out.items.len() >= RESULT_CEILING {
    out.capped = true;
  }

  Ok(out)
}
