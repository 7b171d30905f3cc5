// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Assemble the report document: header, Pull Requests and Commits sections, per-record diffs, warnings
// role: report/assembler
// inputs: Canvas, &dyn GithubApi (diff fetch), ReportOptions, normalized records, pre-collected warnings
// outputs: finished canvas + ReportSummary (counts, warnings)
// side_effects: Network calls for diffs (one record at a time, in document order)
// invariants:
// - sections are written PRs first, then Commits; records keep the order they were given
// - every record is listed even when its diff is unavailable, empty, or unparsable
// - per-record diff problems become warnings: annotated on the record and listed in the Warnings section
// - a record's diff budget is independent of every other record's
// errors: none fatal here; ApiError/DiffParseError on diffs degrade to ReportWarning
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::diff::{filter_and_truncate, parse_unified_diff, DiffSelection};
use crate::error::{ApiError, DiffParseError, RecordError};
use crate::filter::ExtensionSet;
use crate::github::GithubApi;
use crate::model::{ActivityRecord, RecordKind};
use crate::pdf::{render_selection, Canvas, DocumentWriter, TextStyle};
use crate::query::DateRange;
use crate::util::format_date;

pub const REPORT_TITLE: &str = "GitHub Activity Summary";

/// A non-fatal problem surfaced in the report and on stderr.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportWarning {
  MalformedRecord {
    error: RecordError,
  },
  PartialResults {
    kind: RecordKind,
    fetched: usize,
    total: u64,
  },
  IncompleteResults {
    kind: RecordKind,
  },
  DiffUnavailable {
    label: String,
    error: ApiError,
  },
  MalformedHunk {
    label: String,
    error: DiffParseError,
  },
}

impl ReportWarning {
  /// Short text shown under the affected record, when the warning belongs to one.
  pub fn annotation(&self) -> Option<String> {
    match self {
      ReportWarning::DiffUnavailable { error, .. } => Some(format!("Warning: diff unavailable ({})", error)),
      ReportWarning::MalformedHunk { error, .. } => Some(format!("Warning: part of the diff was skipped ({})", error)),
      _ => None,
    }
  }
}

impl fmt::Display for ReportWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReportWarning::MalformedRecord { error } => write!(f, "skipped {}", error),
      ReportWarning::PartialResults { kind, fetched, total } => write!(
        f,
        "partial {} results: listed {} of {} matches (search result ceiling)",
        kind, fetched, total
      ),
      ReportWarning::IncompleteResults { kind } => {
        write!(f, "{} search reported incomplete results (server timeout)", kind)
      }
      ReportWarning::DiffUnavailable { label, error } => write!(f, "{}: diff unavailable: {}", label, error),
      ReportWarning::MalformedHunk { label, error } => write!(f, "{}: {}", label, error),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
  pub include_diff: bool,
  /// Per-record cap on rendered diff lines (0 = unlimited).
  pub max_diff_lines: usize,
  pub extensions: ExtensionSet,
}

#[derive(Debug, Clone)]
pub struct ReportMeta {
  pub author: String,
  pub range: DateRange,
  pub generated_on: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
  pub pull_requests: usize,
  pub commits: usize,
  /// Records whose diff produced at least one rendered file.
  pub diffs_rendered: usize,
  pub diff_rows: usize,
  pub pages: usize,
  pub warnings: Vec<ReportWarning>,
}

impl ReportSummary {
  pub fn skipped_records(&self) -> usize {
    self
      .warnings
      .iter()
      .filter(|w| matches!(w, ReportWarning::MalformedRecord { .. }))
      .count()
  }
}

pub struct ReportAssembler<'a, C: Canvas> {
  doc: DocumentWriter<C>,
  api: &'a dyn GithubApi,
  options: &'a ReportOptions,
  summary: ReportSummary,
}

impl<'a, C: Canvas> ReportAssembler<'a, C> {
  pub fn new(canvas: C, api: &'a dyn GithubApi, options: &'a ReportOptions) -> Self {
    Self {
      doc: DocumentWriter::new(canvas),
      api,
      options,
      summary: ReportSummary::default(),
    }
  }

  pub fn add_warnings(&mut self, warnings: impl IntoIterator<Item = ReportWarning>) {
    self.summary.warnings.extend(warnings);
  }

  pub fn write_header(&mut self, meta: &ReportMeta) {
    self.doc.line(REPORT_TITLE, TextStyle::TITLE);
    self.doc.gap(1.0);
    self.doc.line(&format!("Author: {}", meta.author), TextStyle::BODY);
    self.doc.line(&format!("Period: {}", meta.range.describe()), TextStyle::BODY);
    self.doc.line(
      &format!("Generated: {}", meta.generated_on.format("%Y-%m-%d")),
      TextStyle::SMALL,
    );
    self.doc.rule();
  }

  pub fn write_section(&mut self, kind: RecordKind, records: &[ActivityRecord]) {
    let (title, empty) = match kind {
      RecordKind::PullRequest => ("Pull Requests", "No merged pull requests found."),
      RecordKind::Commit => ("Commits", "No commits found."),
    };

    self.doc.ensure_space(TextStyle::HEADING.line_height() * 3.0);
    self.doc.gap(2.0);
    self.doc.line(title, TextStyle::HEADING);
    self.doc.line(&format!("Total: {}", records.len()), TextStyle::SMALL);
    self.doc.gap(2.0);

    if records.is_empty() {
      self.doc.line(empty, TextStyle::BODY);
      return;
    }

    for (i, record) in records.iter().enumerate() {
      self.write_record(i + 1, record);
    }

    match kind {
      RecordKind::PullRequest => self.summary.pull_requests += records.len(),
      RecordKind::Commit => self.summary.commits += records.len(),
    }
  }

  fn write_record(&mut self, index: usize, record: &ActivityRecord) {
    let (selection, warnings) = if self.options.include_diff {
      self.fetch_selection(record)
    } else {
      (None, Vec::new())
    };

    // Keep the heading with the first metadata lines.
    self
      .doc
      .ensure_space(TextStyle::SUBHEADING.line_height() + 3.0 * TextStyle::BODY.line_height());
    self.doc.line(&format!("{}. {}", index, record.title), TextStyle::SUBHEADING);

    let date_label = match record.kind {
      RecordKind::PullRequest => "Merged",
      RecordKind::Commit => "Committed",
    };
    let id_label = match record.kind {
      RecordKind::PullRequest => "Pull request",
      RecordKind::Commit => "Commit",
    };

    self.doc.line(&format!("Repository: {}", record.repository), TextStyle::BODY);
    self.doc.line(
      &format!(
        "{}: {}    {}: {}",
        date_label,
        format_date(&record.timestamp),
        id_label,
        record.identifier
      ),
      TextStyle::BODY,
    );
    if let Some(author) = &record.author {
      self.doc.line(&format!("Author: {}", author), TextStyle::BODY);
    }
    if let Some(body) = &record.body {
      self.doc.gap(1.0);
      self.doc.wrapped(body, TextStyle::SMALL);
      self.doc.gap(1.0);
    }
    self.doc.line(&format!("URL: {}", record.url), TextStyle::SMALL);

    for w in &warnings {
      if let Some(note) = w.annotation() {
        self.doc.line(&note, TextStyle::SUBHEADING);
      }
    }

    if let Some(sel) = selection {
      self.write_diff(&sel);
    }

    self.summary.warnings.extend(warnings);
    self.doc.rule();
  }

  fn write_diff(&mut self, selection: &DiffSelection) {
    self.doc.gap(1.5);
    let rows = render_selection(&mut self.doc, selection);

    if selection.truncated {
      let note = if self.options.max_diff_lines > 0 {
        format!("Diff truncated to {} lines.", self.options.max_diff_lines)
      } else {
        "Diff truncated.".to_string()
      };
      self.doc.line(&note, TextStyle::SMALL);
    }

    self.summary.diffs_rendered += 1;
    self.summary.diff_rows += rows;
  }

  /// DiffFetcher + parse + filter/truncate for one record. `None` means nothing to render.
  pub fn fetch_selection(&self, record: &ActivityRecord) -> (Option<DiffSelection>, Vec<ReportWarning>) {
    let label = record.label();

    let text = match self.api.fetch_diff(&record.repository, &record.locator) {
      Ok(t) => t,
      Err(error) => {
        if error.is_access_denied() {
          warn!(record = %label, %error, "diff unavailable; the token may lack access to this repository");
        } else {
          warn!(record = %label, %error, "diff unavailable");
        }
        return (None, vec![ReportWarning::DiffUnavailable { label, error }]);
      }
    };

    if text.trim().is_empty() {
      debug!(record = %label, "empty diff");
      return (None, Vec::new());
    }

    let selection = filter_and_truncate(
      parse_unified_diff(&text),
      &self.options.extensions,
      self.options.max_diff_lines,
    );

    debug!(
      record = %label,
      files = selection.files.len(),
      lines = selection.rendered_lines(),
      filtered_out = selection.filtered_out,
      truncated = selection.truncated,
      "diff selected"
    );

    let warnings = selection
      .parse_errors
      .iter()
      .cloned()
      .map(|error| ReportWarning::MalformedHunk {
        label: label.clone(),
        error,
      })
      .collect();

    if selection.is_empty() {
      return (None, warnings);
    }

    (Some(selection), warnings)
  }

  fn write_warnings_section(&mut self) {
    if self.summary.warnings.is_empty() {
      return;
    }

    self.doc.ensure_space(TextStyle::HEADING.line_height() * 3.0);
    self.doc.gap(2.0);
    self.doc.line("Warnings", TextStyle::HEADING);
    self.doc.line(
      &format!("{} item(s) were skipped or degraded.", self.summary.warnings.len()),
      TextStyle::SMALL,
    );
    self.doc.gap(1.0);

    let lines: Vec<String> = self.summary.warnings.iter().map(|w| format!("- {}", w)).collect();
    for l in lines {
      self.doc.wrapped(&l, TextStyle::BODY);
    }
  }

  /// Close the document: append the Warnings section and hand back the canvas.
  pub fn finish(mut self) -> (C, ReportSummary) {
    self.write_warnings_section();
    self.summary.pages = self.doc.page_count();

    (self.doc.into_canvas(), self.summary)
  }
}
