use anyhow::Result;
use clap::Parser;
use tracing::warn;

mod cli;
mod diff;
mod error;
mod ext;
mod filter;
mod github;
mod logging;
mod model;
mod normalize;
mod pdf;
mod processor;
mod query;
mod report;
mod util;

use crate::cli::{normalize, Cli};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: validate flags; every config error surfaces before any network call
  let cfg = normalize(cli)?;

  logging::init_logging(cfg.verbose);

  // Phase 2: pick the backend (env fixtures or HTTP) and resolve auth
  let token = if github::env_wants_mock() {
    None
  } else {
    let token = github::resolve_token(cfg.token.as_deref());
    if token.is_none() {
      warn!("no GitHub token found; continuing unauthenticated with lower rate limits");
      eprintln!("[github] no token found (GITHUB_TOKEN, GH_TOKEN, gh auth token); continuing unauthenticated");
    }
    token
  };
  let api = github::build_api(token);

  // Phase 3: collect, assemble, write
  processor::run(&cfg, api.as_ref())?;

  Ok(())
}
