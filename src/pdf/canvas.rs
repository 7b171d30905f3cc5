// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drawing primitive seam (text cell, filled rectangle, page break) used by the layout engine
// role: pdf/canvas
// inputs: top-down millimetre coordinates within the current page
// outputs: Canvas trait; Font, TextStyle, Rgb; RecordingCanvas (tests)
// invariants:
// - y grows downward from the page's top edge; backends convert to their own origin
// - text handed to a canvas is already printable ASCII
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

/// Points to millimetres.
pub const PT_TO_MM: f32 = 0.352_778;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
  Regular,
  Bold,
  Mono,
  MonoBold,
}

impl Font {
  pub fn is_mono(self) -> bool {
    matches!(self, Font::Mono | Font::MonoBold)
  }

  /// Average glyph advance as a fraction of the font size.
  fn advance(self) -> f32 {
    if self.is_mono() {
      0.6
    } else {
      0.55
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
  pub font: Font,
  /// Size in points.
  pub size: f32,
}

impl TextStyle {
  pub const TITLE: TextStyle = TextStyle::new(Font::Bold, 18.0);
  pub const HEADING: TextStyle = TextStyle::new(Font::Bold, 14.0);
  pub const SUBHEADING: TextStyle = TextStyle::new(Font::Bold, 11.0);
  pub const BODY: TextStyle = TextStyle::new(Font::Regular, 10.0);
  pub const SMALL: TextStyle = TextStyle::new(Font::Regular, 8.0);
  pub const MONO: TextStyle = TextStyle::new(Font::Mono, 7.0);
  pub const MONO_BOLD: TextStyle = TextStyle::new(Font::MonoBold, 7.0);

  pub const fn new(font: Font, size: f32) -> Self {
    Self { font, size }
  }

  pub fn line_height(&self) -> f32 {
    self.size * PT_TO_MM * 1.4
  }

  /// Distance from the top of a line box to the text baseline.
  pub fn baseline_offset(&self) -> f32 {
    self.size * PT_TO_MM * 1.05
  }

  pub fn char_width(&self) -> f32 {
    self.size * PT_TO_MM * self.font.advance()
  }

  /// How many characters fit in `width_mm` (exact for monospace, conservative otherwise).
  pub fn chars_fitting(&self, width_mm: f32) -> usize {
    ((width_mm / self.char_width()).floor() as usize).max(1)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

impl Rgb {
  pub const fn hex(v: u32) -> Self {
    Self {
      r: ((v >> 16) & 0xff) as u8,
      g: ((v >> 8) & 0xff) as u8,
      b: (v & 0xff) as u8,
    }
  }

  pub fn unit(self) -> (f32, f32, f32) {
    (self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0)
  }
}

pub trait Canvas {
  /// (width, height) in millimetres.
  fn page_size(&self) -> (f32, f32);
  /// Draw `text` with its baseline at `baseline_y` (mm from the top edge).
  fn text(&mut self, x: f32, baseline_y: f32, text: &str, style: TextStyle);
  /// Filled rectangle whose top-left corner is (x, y).
  fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb);
  fn new_page(&mut self);
  fn page_count(&self) -> usize;
}

#[cfg(test)]
pub use recording::{DrawOp, RecordingCanvas};
