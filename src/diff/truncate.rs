// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Keep only diff files with allowed extensions and cap a record's rendered diff lines
// role: diff/truncate
// inputs: parsed file sequence (Result<DiffFile, DiffParseError>), ExtensionSet, per-record line limit (0 = unlimited)
// outputs: DiffSelection { files, truncated, parse_errors, filtered_out }
// invariants:
// - rendered lines (markers excluded) never exceed the limit
// - exactly one truncation marker when truncated, none otherwise
// - once the budget is exhausted no later file is taken, even one that would fit
// - input is consumed lazily; files after exhaustion are never parsed
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::error::DiffParseError;
use crate::filter::ExtensionSet;
use crate::model::{DiffFile, DiffLine, Hunk};

/// Per-record counter of rendered diff lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderBudget {
  limit: Option<usize>,
  used: usize,
}

impl RenderBudget {
  /// `max_lines == 0` means no limit.
  pub fn new(max_lines: usize) -> Self {
    Self {
      limit: (max_lines > 0).then_some(max_lines),
      used: 0,
    }
  }

  pub fn remaining(&self) -> usize {
    match self.limit {
      Some(l) => l.saturating_sub(self.used),
      None => usize::MAX,
    }
  }

  pub fn is_exhausted(&self) -> bool {
    self.remaining() == 0
  }

  #[cfg(test)]
  pub fn used(&self) -> usize {
    self.used
  }

  /// Take up to `n` lines; returns how many were granted.
  pub fn try_consume(&mut self, n: usize) -> usize {
    let granted = n.min(self.remaining());
    self.used += granted;
    granted
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffSelection {
  pub files: Vec<DiffFile>,
  pub truncated: bool,
  pub parse_errors: Vec<DiffParseError>,
  /// Files dropped by the extension filter.
  pub filtered_out: usize,
}

impl DiffSelection {
  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }

  pub fn rendered_lines(&self) -> usize {
    self.files.iter().map(DiffFile::line_count).sum()
  }
}

pub fn filter_and_truncate<I>(files: I, extensions: &ExtensionSet, max_lines: usize) -> DiffSelection
where
  I: IntoIterator<Item = Result<DiffFile, DiffParseError>>,
{
  let mut budget = RenderBudget::new(max_lines);
  let mut out = DiffSelection::default();

  for item in files {
    let file = match item {
      Ok(f) => f,
      Err(e) => {
        out.parse_errors.push(e);
        continue;
      }
    };

    if !extensions.matches(&file.path) {
      out.filtered_out += 1;
      continue;
    }

    if budget.is_exhausted() {
      // Budget ran out exactly at the previous file boundary.
      out.truncated = true;
      append_marker(&mut out.files);
      break;
    }

    let needed = file.line_count();

    if needed <= budget.remaining() {
      budget.try_consume(needed);
      out.files.push(file);
      continue;
    }

    out.files.push(cut_file(file, &mut budget));
    out.truncated = true;
    break;
  }

  out
}

/// Keep as many leading lines as the budget allows, then append the marker to the cut hunk.
fn cut_file(file: DiffFile, budget: &mut RenderBudget) -> DiffFile {
  let mut cut = DiffFile::new(file.path);

  for hunk in file.hunks {
    if budget.is_exhausted() {
      break;
    }

    let take = budget.try_consume(hunk.lines.len());
    let mut kept = Hunk::new(hunk.header);
    kept.lines.extend(hunk.lines.into_iter().take(take));
    cut.hunks.push(kept);
  }

  if let Some(last) = cut.hunks.last_mut() {
    last.lines.push(DiffLine::truncation_marker());
  }

  cut
}

fn append_marker(files: &mut [DiffFile]) {
  if let Some(hunk) = files.iter_mut().rev().find_map(|f| f.hunks.last_mut()) {
    hunk.lines.push(DiffLine::truncation_marker());
  }
}
