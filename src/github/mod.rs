// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub capabilities (search, diff fetch) and search pagination
// role: module/aggregation
// outputs: GithubApi trait and backends; SearchPages / collect_search
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod api;
pub mod paginate;

pub use api::{build_api, env_wants_mock, resolve_token, GithubApi, SearchKind, SearchPage};
pub use paginate::collect_search;
