// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate a run: search + paginate, filter repositories, normalize, assemble the PDF, write it, print the summary
// role: processing/orchestrator
// inputs: EffectiveConfig, &dyn GithubApi
// outputs: PDF at cfg.output; stdout success line + counts; stderr warning summary
// side_effects: Network calls via the api; creates the output directory; writes the PDF
// invariants:
// - pull requests are searched before commits; each list keeps server order
// - a failing primary search aborts; partial (capped/incomplete) results only warn
// - a malformed record is skipped with a warning, never aborting the run
// - the output file is written only after the whole document is assembled
// errors: Search ApiError and OutputError propagate with context; everything else degrades to warnings
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::EffectiveConfig;
use crate::filter::FilterConfig;
use crate::github::{collect_search, GithubApi, SearchKind};
use crate::model::{ActivityRecord, RecordKind};
use crate::normalize::{normalize, raw_repository};
use crate::pdf::{Canvas, PdfCanvas};
use crate::report::{ReportAssembler, ReportMeta, ReportSummary, ReportWarning, REPORT_TITLE};
use crate::util;

/// Records for one section plus the non-fatal problems met while collecting them.
#[derive(Debug, Default)]
pub struct Collected {
  pub records: Vec<ActivityRecord>,
  pub warnings: Vec<ReportWarning>,
  /// Items dropped by the include/exclude repository lists.
  pub filtered_out: usize,
}

pub fn collect_records(
  api: &dyn GithubApi,
  kind: RecordKind,
  query: &str,
  filters: &FilterConfig,
) -> Result<Collected> {
  let search_kind = match kind {
    RecordKind::PullRequest => SearchKind::Issues,
    RecordKind::Commit => SearchKind::Commits,
  };

  info!(%kind, query, "searching");
  let results = collect_search(api, search_kind, query).with_context(|| format!("searching {}s failed", kind))?;

  let mut out = Collected::default();

  if results.is_partial() {
    warn!(%kind, fetched = results.items.len(), total = results.total_count, "search results are partial");
  }
  if results.capped {
    out.warnings.push(ReportWarning::PartialResults {
      kind,
      fetched: results.items.len(),
      total: results.total_count,
    });
  }
  if results.incomplete {
    out.warnings.push(ReportWarning::IncompleteResults { kind });
  }

  for item in &results.items {
    // Items without a recognizable repository fall through to the normalizer, which reports them.
    if let Some(repo) = raw_repository(kind, item) {
      if !filters.keeps_repo(&repo) {
        debug!(%kind, repo, "dropped by repository filter");
        out.filtered_out += 1;
        continue;
      }
    }

    match normalize(kind, item) {
      Ok(record) => out.records.push(record),
      Err(error) => {
        warn!(%error, "skipping record");
        out.warnings.push(ReportWarning::MalformedRecord { error });
      }
    }
  }

  Ok(out)
}

/// Build the whole document on `canvas`; no file is written here.
pub fn build_report<C: Canvas>(canvas: C, cfg: &EffectiveConfig, api: &dyn GithubApi) -> Result<(C, ReportSummary)> {
  let prs = collect_records(api, RecordKind::PullRequest, &cfg.queries.pull_requests, &cfg.filters)?;
  let commits = collect_records(api, RecordKind::Commit, &cfg.queries.commits, &cfg.filters)?;

  info!(
    pull_requests = prs.records.len(),
    commits = commits.records.len(),
    filtered_out = prs.filtered_out + commits.filtered_out,
    "records collected"
  );

  let meta = ReportMeta {
    author: cfg.author.clone(),
    range: cfg.queries.range,
    generated_on: util::today(),
  };

  let mut asm = ReportAssembler::new(canvas, api, &cfg.report);
  asm.add_warnings(prs.warnings);
  asm.add_warnings(commits.warnings);
  asm.write_header(&meta);
  asm.write_section(RecordKind::PullRequest, &prs.records);
  asm.write_section(RecordKind::Commit, &commits.records);

  Ok(asm.finish())
}

pub fn run(cfg: &EffectiveConfig, api: &dyn GithubApi) -> Result<ReportSummary> {
  let canvas = PdfCanvas::a4(REPORT_TITLE)?;
  let (canvas, summary) = build_report(canvas, cfg, api)?;

  util::ensure_parent_dir(&cfg.output)?;
  canvas.save(&cfg.output)?;

  print_summary(cfg, &summary);

  Ok(summary)
}

fn print_summary(cfg: &EffectiveConfig, summary: &ReportSummary) {
  if !summary.warnings.is_empty() {
    eprintln!(
      "[report] {} warning(s); {} record(s) skipped",
      summary.warnings.len(),
      summary.skipped_records()
    );
    for w in &summary.warnings {
      eprintln!("[report] warning: {}", w);
    }
  }

  println!("PDF generated successfully: {}", cfg.output.display());
  println!(
    "{} pull request(s), {} commit(s), {} diff(s) rendered, {} diff row(s), {} page(s)",
    summary.pull_requests, summary.commits, summary.diffs_rendered, summary.diff_rows, summary.pages
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ApiError;
  use crate::filter::ExtensionSet;
  use crate::github::SearchPage;
  use crate::model::DiffLocator;
  use crate::pdf::canvas::RecordingCanvas;
  use crate::query::build_queries;
  use crate::report::ReportOptions;
  use serde_json::json;

  struct Fixed {
    prs: Result<Vec<serde_json::Value>, ApiError>,
    commits: Vec<serde_json::Value>,
  }

  impl GithubApi for Fixed {
    fn search(&self, kind: SearchKind, _query: &str, page: u32, _per_page: u32) -> Result<SearchPage, ApiError> {
      let items = match kind {
        SearchKind::Issues => self.prs.clone()?,
        SearchKind::Commits => self.commits.clone(),
      };
      let items = if page == 1 { items } else { Vec::new() };
      Ok(SearchPage {
        total_count: items.len() as u64,
        items,
        incomplete_results: false,
        has_next: Some(false),
      })
    }

    fn fetch_diff(&self, _repository: &str, _locator: &DiffLocator) -> Result<String, ApiError> {
      Ok(String::new())
    }
  }

  fn pr_item(n: u64, repo: &str) -> serde_json::Value {
    json!({
      "number": n,
      "title": format!("PR {n}"),
      "html_url": format!("https://github.com/{repo}/pull/{n}"),
      "repository_url": format!("https://api.github.com/repos/{repo}"),
      "user": { "login": "octocat" },
      "pull_request": { "merged_at": "2024-03-06T12:00:00Z" }
    })
  }

  fn commit_item(sha: &str, repo: &str) -> serde_json::Value {
    json!({
      "sha": sha,
      "html_url": format!("https://github.com/{repo}/commit/{sha}"),
      "commit": { "message": "Tweak", "author": { "name": "Mona", "date": "2024-03-04T09:30:00Z" } },
      "repository": { "full_name": repo }
    })
  }

  fn config(filters: FilterConfig) -> EffectiveConfig {
    EffectiveConfig {
      author: "octocat".into(),
      queries: build_queries("octocat", None, None).unwrap(),
      filters,
      report: ReportOptions::default(),
      output: "unused.pdf".into(),
      token: None,
      verbose: false,
    }
  }

  #[test]
  fn repo_filter_and_malformed_records() {
    let api = Fixed {
      prs: Ok(vec![pr_item(1, "octo/site"), pr_item(2, "octo/infra"), json!({ "number": 3 })]),
      commits: vec![],
    };
    let filters = FilterConfig::new(vec![], vec!["octo/infra".into()], ExtensionSet::default()).unwrap();

    let got = collect_records(&api, RecordKind::PullRequest, "q", &filters).unwrap();
    assert_eq!(got.records.len(), 1);
    assert_eq!(got.records[0].identifier, "#1");
    assert_eq!(got.filtered_out, 1);
    assert_eq!(got.warnings.len(), 1);
    assert!(matches!(got.warnings[0], ReportWarning::MalformedRecord { .. }));
  }

  #[test]
  fn end_to_end_on_recording_canvas() {
    let api = Fixed {
      prs: Ok(vec![pr_item(3, "octo/site"), pr_item(1, "octo/site"), pr_item(2, "octo/api")]),
      commits: vec![commit_item("aaaaaaa1", "octo/site"), commit_item("bbbbbbb2", "octo/api")],
    };

    let (canvas, summary) = build_report(RecordingCanvas::a4(), &config(FilterConfig::default()), &api).unwrap();
    assert_eq!((summary.pull_requests, summary.commits), (3, 2));
    assert_eq!(summary.diffs_rendered, 0);

    let text = canvas.joined_text();
    let p3 = text.find("1. PR 3").unwrap();
    let p1 = text.find("2. PR 1").unwrap();
    let commits = text.find("Commits").unwrap();
    assert!(p3 < p1 && p1 < commits);
  }

  #[test]
  fn failing_primary_search_is_fatal() {
    let api = Fixed {
      prs: Err(ApiError::Unauthorized),
      commits: vec![],
    };
    let err = build_report(RecordingCanvas::a4(), &config(FilterConfig::default()), &api).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("searching pull requests failed"), "{msg}");
    assert!(msg.contains("unauthorized"));
  }
}
