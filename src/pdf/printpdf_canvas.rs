// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: printpdf-backed Canvas (A4 pages, built-in Helvetica/Courier, filled rects)
// role: pdf/backend
// inputs: Canvas calls in top-down millimetres
// outputs: PDF bytes written to the report path
// side_effects: save() creates/truncates the output file
// invariants:
// - one layer per page; fill colour is reset to black after every rectangle so text stays black
// - fonts are the four built-in Type1 fonts (single-byte encoding, nothing embedded)
// errors: OutputError::{OutputWrite, Pdf} naming the target path
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use printpdf::{
  BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Rect,
  Rgb as PdfRgb,
};

use crate::error::OutputError;
use crate::pdf::canvas::{Canvas, Font, Rgb, TextStyle};

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
const LAYER: &str = "Layer 1";

struct Fonts {
  regular: IndirectFontRef,
  bold: IndirectFontRef,
  mono: IndirectFontRef,
  mono_bold: IndirectFontRef,
}

impl Fonts {
  fn get(&self, font: Font) -> &IndirectFontRef {
    match font {
      Font::Regular => &self.regular,
      Font::Bold => &self.bold,
      Font::Mono => &self.mono,
      Font::MonoBold => &self.mono_bold,
    }
  }
}

pub struct PdfCanvas {
  doc: PdfDocumentReference,
  layer: PdfLayerReference,
  fonts: Fonts,
  pages: usize,
}

impl PdfCanvas {
  pub fn a4(title: &str) -> Result<Self> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER);

    let builtin = |f: BuiltinFont| {
      doc
        .add_builtin_font(f)
        .map_err(|e| anyhow::anyhow!("{:?}", e))
        .context("loading built-in PDF font")
    };

    let fonts = Fonts {
      regular: builtin(BuiltinFont::Helvetica)?,
      bold: builtin(BuiltinFont::HelveticaBold)?,
      mono: builtin(BuiltinFont::Courier)?,
      mono_bold: builtin(BuiltinFont::CourierBold)?,
    };

    let layer = doc.get_page(page).get_layer(layer);

    Ok(Self {
      doc,
      layer,
      fonts,
      pages: 1,
    })
  }

  /// Serialize the document to `path` (parent directory must exist).
  pub fn save(self, path: &Path) -> Result<(), OutputError> {
    let file = File::create(path).map_err(|source| OutputError::OutputWrite {
      path: path.to_path_buf(),
      source,
    })?;

    self
      .doc
      .save(&mut BufWriter::new(file))
      .map_err(|e| OutputError::Pdf {
        path: path.to_path_buf(),
        message: format!("{:?}", e),
      })
  }

  fn set_fill(&self, color: Rgb) {
    let (r, g, b) = color.unit();
    self.layer.set_fill_color(Color::Rgb(PdfRgb::new(r, g, b, None)));
  }
}

impl Canvas for PdfCanvas {
  fn page_size(&self) -> (f32, f32) {
    (A4_WIDTH_MM, A4_HEIGHT_MM)
  }

  fn text(&mut self, x: f32, baseline_y: f32, text: &str, style: TextStyle) {
    self.layer.use_text(
      text,
      style.size,
      Mm(x),
      Mm(A4_HEIGHT_MM - baseline_y),
      self.fonts.get(style.font),
    );
  }

  fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
    self.set_fill(color);
    self.layer.add_rect(Rect::new(
      Mm(x),
      Mm(A4_HEIGHT_MM - y - height),
      Mm(x + width),
      Mm(A4_HEIGHT_MM - y),
    ));
    self.set_fill(Rgb::hex(0x000000));
  }

  fn new_page(&mut self) {
    let (page, layer) = self.doc.add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER);
    self.layer = self.doc.get_page(page).get_layer(layer);
    self.pages += 1;
  }

  fn page_count(&self) -> usize {
    self.pages
  }
}
