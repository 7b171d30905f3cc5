// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the display model (activity records) and the parsed diff model (files, hunks, typed lines)
// role: model/types
// outputs: ActivityRecord, RecordKind, DiffLocator, DiffFile, Hunk, DiffLine, LineKind
// invariants:
// - ActivityRecord is immutable once normalized
// - Added lines carry new_line_no only; Removed lines old_line_no only; Context lines both; markers neither
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use chrono::{DateTime, FixedOffset};

/// Text of the synthetic line appended when a record's diff budget runs out.
pub const TRUNCATION_MARKER: &str = "\u{2026} truncated \u{2026}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
  PullRequest,
  Commit,
}

impl fmt::Display for RecordKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RecordKind::PullRequest => f.write_str("pull request"),
      RecordKind::Commit => f.write_str("commit"),
    }
  }
}

/// What the diff-fetch capability needs to locate a record's diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLocator {
  Commit { sha: String },
  PullRequest { number: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
  pub kind: RecordKind,
  /// "owner/name"
  pub repository: String,
  pub title: String,
  /// "#123" for pull requests, 7-char short SHA for commits.
  pub identifier: String,
  /// Merge time for pull requests, author date for commits.
  pub timestamp: DateTime<FixedOffset>,
  pub url: String,
  pub author: Option<String>,
  pub body: Option<String>,
  pub locator: DiffLocator,
}

impl ActivityRecord {
  /// Short label used in warnings and logs, e.g. `octo/site#12` or `octo/site@abc1234`.
  pub fn label(&self) -> String {
    match self.kind {
      RecordKind::PullRequest => format!("{}{}", self.repository, self.identifier),
      RecordKind::Commit => format!("{}@{}", self.repository, self.identifier),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
  Context,
  Added,
  Removed,
  Truncated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
  pub kind: LineKind,
  pub old_line_no: Option<u32>,
  pub new_line_no: Option<u32>,
  pub text: String,
}

impl DiffLine {
  pub fn context(old: u32, new: u32, text: impl Into<String>) -> Self {
    Self {
      kind: LineKind::Context,
      old_line_no: Some(old),
      new_line_no: Some(new),
      text: text.into(),
    }
  }

  pub fn added(new: u32, text: impl Into<String>) -> Self {
    Self {
      kind: LineKind::Added,
      old_line_no: None,
      new_line_no: Some(new),
      text: text.into(),
    }
  }

  pub fn removed(old: u32, text: impl Into<String>) -> Self {
    Self {
      kind: LineKind::Removed,
      old_line_no: Some(old),
      new_line_no: None,
      text: text.into(),
    }
  }

  pub fn truncation_marker() -> Self {
    Self {
      kind: LineKind::Truncated,
      old_line_no: None,
      new_line_no: None,
      text: TRUNCATION_MARKER.to_string(),
    }
  }

  pub fn is_marker(&self) -> bool {
    self.kind == LineKind::Truncated
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
  /// Raw header line, e.g. "@@ -1,4 +1,5 @@ fn main()".
  pub header: String,
  pub lines: Vec<DiffLine>,
}

impl Hunk {
  pub fn new(header: impl Into<String>) -> Self {
    Self {
      header: header.into(),
      lines: Vec::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffFile {
  pub path: String,
  pub hunks: Vec<Hunk>,
}

impl DiffFile {
  pub fn new(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      hunks: Vec::new(),
    }
  }

  pub fn additions(&self) -> usize {
    self.count(LineKind::Added)
  }

  pub fn deletions(&self) -> usize {
    self.count(LineKind::Removed)
  }

  /// Diff lines excluding truncation markers.
  pub fn line_count(&self) -> usize {
    self.lines().filter(|l| !l.is_marker()).count()
  }

  pub fn lines(&self) -> impl Iterator<Item = &DiffLine> {
    self.hunks.iter().flat_map(|h| h.lines.iter())
  }

  fn count(&self, kind: LineKind) -> usize {
    self.lines().filter(|l| l.kind == kind).count()
  }
}
