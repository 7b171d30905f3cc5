// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Repository allow/deny filtering and diff file-extension matching
// role: filter/config
// inputs: include/exclude repository lists; raw extension arguments (space or comma separated, dot optional)
// outputs: FilterConfig (validated), ExtensionSet
// invariants:
// - include_repos and exclude_repos are never both non-empty (rejected by FilterConfig::new)
// - repository comparison is exact on "owner/name"
// - extension matching is case-insensitive and dot-agnostic; an empty set matches every path
// errors: ConfigError::ConflictingRepoFilters
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::ConfigError;

/// Normalized file extensions (lower-case, no leading dot).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
  exts: BTreeSet<String>,
}

impl ExtensionSet {
  /// Accepts values like `["py,MD", ".cpp", " c "]`.
  pub fn parse<S: AsRef<str>>(values: &[S]) -> Self {
    let exts = values
      .iter()
      .flat_map(|v| {
        v.as_ref()
          .split(|c: char| c == ',' || c.is_whitespace())
          .map(normalize_extension)
          .filter(|e| !e.is_empty())
          .collect::<Vec<_>>()
      })
      .collect();

    Self { exts }
  }

  pub fn is_empty(&self) -> bool {
    self.exts.is_empty()
  }

  #[cfg(test)]
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.exts.iter().map(String::as_str)
  }

  pub fn matches(&self, path: &str) -> bool {
    if self.exts.is_empty() {
      return true;
    }

    Path::new(path)
      .extension()
      .and_then(|e| e.to_str())
      .map(|e| self.exts.contains(&e.to_ascii_lowercase()))
      .unwrap_or(false)
  }
}

fn normalize_extension(raw: &str) -> String {
  raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
  include_repos: BTreeSet<String>,
  exclude_repos: BTreeSet<String>,
  pub diff_extensions: ExtensionSet,
}

impl FilterConfig {
  pub fn new(
    include_repos: impl IntoIterator<Item = String>,
    exclude_repos: impl IntoIterator<Item = String>,
    diff_extensions: ExtensionSet,
  ) -> Result<Self, ConfigError> {
    let include_repos: BTreeSet<String> = clean_repos(include_repos);
    let exclude_repos: BTreeSet<String> = clean_repos(exclude_repos);

    if !include_repos.is_empty() && !exclude_repos.is_empty() {
      return Err(ConfigError::ConflictingRepoFilters);
    }

    Ok(Self {
      include_repos,
      exclude_repos,
      diff_extensions,
    })
  }

  /// RepoFilter: keep/drop decision for a record's "owner/name".
  pub fn keeps_repo(&self, repository: &str) -> bool {
    if !self.include_repos.is_empty() {
      return self.include_repos.contains(repository);
    }

    if !self.exclude_repos.is_empty() {
      return !self.exclude_repos.contains(repository);
    }

    true
  }
}

fn clean_repos(repos: impl IntoIterator<Item = String>) -> BTreeSet<String> {
  repos
    .into_iter()
    .flat_map(|r| r.split(',').map(|s| s.trim().to_string()).collect::<Vec<_>>())
    .filter(|r| !r.is_empty())
    .collect()
}
