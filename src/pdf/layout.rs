// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Flowing document layout over a Canvas: vertical cursor, margins, page breaks, text lines, bands, rules
// role: pdf/layout
// inputs: Canvas implementation; text and styles from the report and diff renderer
// outputs: DocumentWriter (owns the canvas and the shared cursor/page state)
// invariants:
// - nothing is drawn below the bottom margin; a block that does not fit starts a new page first
// - a single row or band is never split across pages
// - all text passes through asciify() right before reaching the canvas
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::pdf::ascii::asciify;
use crate::pdf::canvas::{Canvas, Rgb, TextStyle};
use crate::util::wrap_text;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
  pub top: f32,
  pub bottom: f32,
  pub side: f32,
}

impl Default for Margins {
  fn default() -> Self {
    Self {
      top: 15.0,
      bottom: 15.0,
      side: 10.0,
    }
  }
}

pub const RULE_COLOR: Rgb = Rgb::hex(0xd0d7de);
const BAND_PADDING: f32 = 1.0;

pub struct DocumentWriter<C: Canvas> {
  canvas: C,
  margins: Margins,
  /// Millimetres from the top edge of the current page.
  cursor: f32,
}

impl<C: Canvas> DocumentWriter<C> {
  pub fn new(canvas: C) -> Self {
    Self::with_margins(canvas, Margins::default())
  }

  pub fn with_margins(canvas: C, margins: Margins) -> Self {
    Self {
      canvas,
      cursor: margins.top,
      margins,
    }
  }

  pub fn into_canvas(self) -> C {
    self.canvas
  }

  pub fn page_count(&self) -> usize {
    self.canvas.page_count()
  }

  pub fn content_width(&self) -> f32 {
    self.canvas.page_size().0 - 2.0 * self.margins.side
  }

  fn bottom_limit(&self) -> f32 {
    self.canvas.page_size().1 - self.margins.bottom
  }

  pub fn remaining(&self) -> f32 {
    self.bottom_limit() - self.cursor
  }

  pub fn new_page(&mut self) {
    self.canvas.new_page();
    self.cursor = self.margins.top;
  }

  /// Start a new page unless `height` still fits; returns true when a page was added.
  pub fn ensure_space(&mut self, height: f32) -> bool {
    let at_top = (self.cursor - self.margins.top).abs() < f32::EPSILON;

    if self.cursor + height > self.bottom_limit() && !at_top {
      self.new_page();
      return true;
    }

    false
  }

  pub fn gap(&mut self, height: f32) {
    if self.cursor + height > self.bottom_limit() {
      self.new_page();
    } else {
      self.cursor += height;
    }
  }

  /// One unwrapped line at an x offset from the left margin; text past the width is clipped.
  pub fn line_at(&mut self, indent: f32, text: &str, style: TextStyle) {
    let h = style.line_height();
    self.ensure_space(h);

    let max_chars = style.chars_fitting(self.content_width() - indent);
    let ascii = asciify(text);
    let clipped = clip_chars(&ascii, max_chars);

    self
      .canvas
      .text(self.margins.side + indent, self.cursor + style.baseline_offset(), &clipped, style);
    self.cursor += h;
  }

  pub fn line(&mut self, text: &str, style: TextStyle) {
    self.line_at(0.0, text, style);
  }

  /// Word-wrapped paragraph; explicit newlines are kept.
  pub fn wrapped(&mut self, text: &str, style: TextStyle) {
    let width = style.chars_fitting(self.content_width());
    let ascii = asciify(text);

    for l in wrap_text(&ascii, width) {
      self.line(&l, style);
    }
  }

  /// Full-width filled row with a single line of text.
  pub fn band(&mut self, text: &str, style: TextStyle, fill: Option<Rgb>) {
    let h = style.line_height() + BAND_PADDING;
    self.ensure_space(h);

    if let Some(color) = fill {
      let (x, w) = (self.margins.side, self.content_width());
      self.canvas.fill_rect(x, self.cursor, w, h, color);
    }

    let max_chars = self.band_chars(style);
    let ascii = asciify(text);
    let clipped = clip_chars(&ascii, max_chars);
    let baseline = self.cursor + BAND_PADDING / 2.0 + style.baseline_offset();

    self
      .canvas
      .text(self.margins.side + BAND_PADDING, baseline, &clipped, style);
    self.cursor += h;
  }

  /// Characters of `style` that fit inside a band.
  pub fn band_chars(&self, style: TextStyle) -> usize {
    style.chars_fitting(self.content_width() - 2.0 * BAND_PADDING)
  }

  pub fn band_height(style: TextStyle) -> f32 {
    style.line_height() + BAND_PADDING
  }

  /// Thin horizontal separator.
  pub fn rule(&mut self) {
    self.gap(1.5);
    let (x, w) = (self.margins.side, self.content_width());
    self.canvas.fill_rect(x, self.cursor, w, 0.3, RULE_COLOR);
    self.gap(2.0);
  }
}

/// Clip to `max` characters, ending with "..." when anything was cut.
pub fn clip_chars(text: &str, max: usize) -> String {
  if text.chars().count() <= max {
    return text.to_string();
  }

  if max <= 3 {
    return text.chars().take(max).collect();
  }

  let mut out: String = text.chars().take(max - 3).collect();
  out.push_str("...");
  out
}
