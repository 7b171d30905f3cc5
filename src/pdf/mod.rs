// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: PDF output: drawing seam, printpdf backend, ASCII mapping, page layout, diff rows
// role: module/aggregation
// outputs: Canvas, PdfCanvas, DocumentWriter, render_selection
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod ascii;
pub mod canvas;
pub mod diff_renderer;
pub mod layout;
pub mod printpdf_canvas;

pub use canvas::{Canvas, TextStyle};
pub use diff_renderer::render_selection;
pub use layout::DocumentWriter;
pub use printpdf_canvas::PdfCanvas;
