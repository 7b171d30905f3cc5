// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Unified diff parsing and per-record filtering/truncation
// role: module/aggregation
// outputs: parse_unified_diff, filter_and_truncate, RenderBudget, DiffSelection
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod parser;
pub mod truncate;

pub use parser::parse_unified_diff;
pub use truncate::{filter_and_truncate, DiffSelection};
