use predicates::prelude::*;
use test_support::{cmd_with_fixtures, tempdir};

// Config errors must surface before any search, so the fixture backend is wired but never read.
fn fixture_cmd() -> assert_cmd::Command {
  cmd_with_fixtures("gh-summary", "prs.json", "commits.json", None)
}

#[test]
fn include_and_exclude_are_mutually_exclusive() {
  let td = tempdir();
  fixture_cmd()
    .args(["-a", "octocat", "-i", "octo/site", "-x", "octo/api", "-p"])
    .arg(td.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("cannot be used with"));
  assert!(!td.path().join("summary.pdf").exists());
}

#[test]
fn reversed_date_range_fails_without_output() {
  let td = tempdir();
  fixture_cmd()
    .args(["-a", "octocat", "-s", "2024-03-10", "-e", "2024-03-01", "-p"])
    .arg(td.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("end date 2024-03-01 precedes start date 2024-03-10"));
  assert!(!td.path().join("summary.pdf").exists());
}

#[test]
fn malformed_date_names_the_flag() {
  let td = tempdir();
  fixture_cmd()
    .args(["-a", "octocat", "-e", "03/01/2024", "-p"])
    .arg(td.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid --end-date '03/01/2024'"));
}

#[test]
fn author_is_required() {
  fixture_cmd().assert().failure().stderr(predicate::str::contains("--author"));
}
