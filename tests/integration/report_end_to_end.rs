use predicates::prelude::*;
use test_support::{cmd_with_fixtures, read_fixture_json, tempdir};

fn read_pdf(path: &std::path::Path) -> Vec<u8> {
  std::fs::read(path).unwrap_or_else(|e| panic!("missing {}: {e}", path.display()))
}

#[test]
fn fixtures_describe_three_prs_and_two_commits() {
  let prs: serde_json::Value = read_fixture_json("prs.json");
  let commits: serde_json::Value = read_fixture_json("commits.json");
  assert_eq!(prs["items"].as_array().map(Vec::len), Some(3));
  assert_eq!(commits.as_array().map(Vec::len), Some(2));
}

#[test]
fn writes_pdf_without_diffs() {
  let td = tempdir();
  let out_dir = td.path().join("reports").join("march");

  cmd_with_fixtures("gh-summary", "prs.json", "commits.json", None)
    .args(["-a", "octocat", "-s", "2024-02-01", "-e", "2024-03-31", "-f", "octo", "-p"])
    .arg(&out_dir)
    .assert()
    .success()
    .stdout(predicate::str::contains("PDF generated successfully"))
    .stdout(predicate::str::contains("octo.pdf"))
    .stdout(predicate::str::contains("3 pull request(s), 2 commit(s), 0 diff(s) rendered, 0 diff row(s)"));

  let bytes = read_pdf(&out_dir.join("octo.pdf"));
  assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn unavailable_diff_degrades_to_warning() {
  let td = tempdir();

  cmd_with_fixtures("gh-summary", "prs.json", "commits.json", Some("diffs.json"))
    .args(["-a", "octocat", "-d", "-p"])
    .arg(td.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("3 pull request(s), 2 commit(s), 3 diff(s) rendered"))
    .stderr(predicate::str::contains("octo/api#7: diff unavailable: not found"));

  assert!(read_pdf(&td.path().join("summary.pdf")).starts_with(b"%PDF"));
}

#[test]
fn extension_filter_selects_which_diffs_render() {
  let td = tempdir();

  // Only app.js in octo/site#12 matches.
  cmd_with_fixtures("gh-summary", "prs.json", "commits.json", Some("diffs.json"))
    .args(["-a", "octocat", "-d", "-D", "js", "-p"])
    .arg(td.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("1 diff(s) rendered"));
}

#[test]
fn repository_include_list_limits_both_sections() {
  let td = tempdir();

  cmd_with_fixtures("gh-summary", "prs.json", "commits.json", None)
    .args(["-a", "octocat", "-i", "octo/site", "-p"])
    .arg(td.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("1 pull request(s), 1 commit(s)"));
}

#[test]
fn tiny_line_budget_still_succeeds() {
  let td = tempdir();

  cmd_with_fixtures("gh-summary", "prs.json", "commits.json", Some("diffs.json"))
    .args(["-a", "octocat", "-d", "--max-diff-lines", "1", "-D", "*", "-p"])
    .arg(td.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("3 diff(s) rendered"));
}
