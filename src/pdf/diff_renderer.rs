// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Lay out filtered diff files as GitHub-style rows (old/new gutters, +/- marker, tinted background)
// role: pdf/diff-renderer
// inputs: DocumentWriter (shared cursor/page state), DiffSelection
// outputs: rows drawn on the document; count of rows rendered
// invariants:
// - gutters follow the DiffLine number invariant (blank where a number does not apply)
// - Added rows are light green, Removed rows light red, Context rows unfilled
// - file and hunk headers are shaded bands and never end up alone at a page bottom
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::diff::DiffSelection;
use crate::model::{DiffFile, DiffLine, LineKind};
use crate::pdf::canvas::{Canvas, Rgb, TextStyle};
use crate::pdf::layout::{clip_chars, DocumentWriter};

pub const ADDED_BG: Rgb = Rgb::hex(0xe6ffec);
pub const REMOVED_BG: Rgb = Rgb::hex(0xffebe9);
pub const HUNK_BG: Rgb = Rgb::hex(0xddf4ff);
pub const FILE_BG: Rgb = Rgb::hex(0xf6f8fa);

const ROW_STYLE: TextStyle = TextStyle::MONO;
const HEADER_STYLE: TextStyle = TextStyle::MONO_BOLD;
/// Narrowest line-number column; widened when a number needs more digits.
const MIN_GUTTER: usize = 5;
const TAB: &str = "    ";

fn gutter(n: Option<u32>) -> String {
  n.map(|v| v.to_string()).unwrap_or_default()
}

/// Digits needed by the largest line number in the selection.
pub fn gutter_width(selection: &DiffSelection) -> usize {
  selection
    .files
    .iter()
    .flat_map(|f| f.lines())
    .flat_map(|l| [l.old_line_no, l.new_line_no])
    .flatten()
    .max()
    .map(|n| n.to_string().len())
    .unwrap_or(0)
    .max(MIN_GUTTER)
}

/// Characters ahead of the text column: two gutters, the marker and three separators.
fn row_prefix(gutter_width: usize) -> usize {
  2 * gutter_width + 4
}

/// Fixed-width row text: `old new marker text`.
pub fn format_row(line: &DiffLine, gutter_width: usize, text_width: usize) -> String {
  let marker = match line.kind {
    LineKind::Added => '+',
    LineKind::Removed => '-',
    LineKind::Context | LineKind::Truncated => ' ',
  };

  let text = clip_chars(&line.text.replace('\t', TAB), text_width);

  format!(
    "{:>w$} {:>w$} {} {}",
    gutter(line.old_line_no),
    gutter(line.new_line_no),
    marker,
    text,
    w = gutter_width
  )
  .trim_end()
  .to_string()
}

pub fn row_fill(kind: LineKind) -> Option<Rgb> {
  match kind {
    LineKind::Added => Some(ADDED_BG),
    LineKind::Removed => Some(REMOVED_BG),
    LineKind::Context | LineKind::Truncated => None,
  }
}

pub fn file_header(file: &DiffFile) -> String {
  format!("{}   +{} -{}", file.path, file.additions(), file.deletions())
}

/// Render every file in `selection`; returns the number of line rows drawn.
pub fn render_selection<C: Canvas>(doc: &mut DocumentWriter<C>, selection: &DiffSelection) -> usize {
  let row_h = DocumentWriter::<C>::band_height(ROW_STYLE);
  let header_h = DocumentWriter::<C>::band_height(HEADER_STYLE);
  let gutter_w = gutter_width(selection);
  let text_width = doc.band_chars(ROW_STYLE).saturating_sub(row_prefix(gutter_w)).max(8);

  let mut rows = 0;

  for file in &selection.files {
    // Keep the file header with its first hunk header and first row.
    doc.ensure_space(2.0 * header_h + row_h);
    doc.band(&file_header(file), HEADER_STYLE, Some(FILE_BG));

    if file.hunks.is_empty() {
      doc.band("      (binary or metadata-only change)", ROW_STYLE, None);
    }

    for hunk in &file.hunks {
      doc.ensure_space(header_h + row_h);
      doc.band(&hunk.header, HEADER_STYLE, Some(HUNK_BG));

      for line in &hunk.lines {
        doc.band(&format_row(line, gutter_w, text_width), ROW_STYLE, row_fill(line.kind));
        rows += 1;
      }
    }

    doc.gap(1.5);
  }

  rows
}
