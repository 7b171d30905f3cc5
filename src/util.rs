// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for output paths, text wrapping, date formatting, and man page rendering
// role: utilities/helpers
// inputs: Various primitives; DateTime; paths; clap CommandFactory
// outputs: Output file path, wrapped lines, formatted dates, directories ensured, man page text
// side_effects: ensure_parent_dir creates directories
// invariants:
// - output_path always ends in ".pdf" exactly once
// - wrap_text never returns a line longer than the width; explicit newlines are kept
// errors: IO errors bubble with the offending path
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use clap::CommandFactory;

use crate::error::OutputError;

/// `<dir>/<name>.pdf`; a trailing ".pdf" on `name` is not doubled.
pub fn output_path(dir: &Path, name: &str) -> PathBuf {
  let stem = name.trim();
  let stem = stem
    .strip_suffix(".pdf")
    .or_else(|| stem.strip_suffix(".PDF"))
    .unwrap_or(stem);

  dir.join(format!("{}.pdf", stem))
}

/// Create the directory that will hold `path` when it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
  match path.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir).map_err(|source| OutputError::OutputWrite {
      path: path.to_path_buf(),
      source,
    }),
    _ => Ok(()),
  }
}

/// Greedy word wrap to `width` characters; over-long words are hard-split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let width = width.max(1);
  let mut out = Vec::new();

  for para in text.split('\n') {
    let para = para.trim_end_matches('\r');
    let mut line = String::new();

    for word in para.split_whitespace() {
      let mut word = word.to_string();

      while word.chars().count() > width {
        if !line.is_empty() {
          out.push(std::mem::take(&mut line));
        }
        let head: String = word.chars().take(width).collect();
        word = word.chars().skip(width).collect();
        out.push(head);
      }

      if word.is_empty() {
        continue;
      }

      let needed = if line.is_empty() {
        word.chars().count()
      } else {
        line.chars().count() + 1 + word.chars().count()
      };

      if needed > width {
        out.push(std::mem::take(&mut line));
      }

      if !line.is_empty() {
        line.push(' ');
      }
      line.push_str(&word);
    }

    out.push(line);
  }

  out
}

/// `2024-03-06` for record dates.
pub fn format_date(ts: &DateTime<FixedOffset>) -> String {
  ts.format("%Y-%m-%d").to_string()
}

pub fn today() -> NaiveDate {
  Local::now().date_naive()
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  #[test]
  fn output_path_appends_extension_once() {
    assert_eq!(output_path(Path::new("./"), "summary"), PathBuf::from("./summary.pdf"));
    assert_eq!(output_path(Path::new("out"), "report.pdf"), PathBuf::from("out/report.pdf"));
  }

  #[test]
  fn ensure_parent_dir_creates_missing_dirs() {
    let td = tempfile::TempDir::new().unwrap();
    let target = td.path().join("a").join("b").join("x.pdf");
    ensure_parent_dir(&target).unwrap();
    assert!(target.parent().unwrap().is_dir());
    ensure_parent_dir(Path::new("x.pdf")).unwrap();
  }

  #[cfg(unix)]
  #[test]
  fn ensure_parent_dir_reports_path_on_failure() {
    let td = tempfile::TempDir::new().unwrap();
    let blocker = td.path().join("file");
    std::fs::write(&blocker, "x").unwrap();
    let err = ensure_parent_dir(&blocker.join("sub").join("r.pdf")).unwrap_err();
    assert!(err.to_string().contains("r.pdf"));
  }

  #[test]
  fn wrap_keeps_paragraphs_and_width() {
    let lines = wrap_text("one two three four\n\nfive", 9);
    assert_eq!(lines, vec!["one two", "three", "four", "", "five"]);
  }

  #[test]
  fn wrap_splits_long_words() {
    let lines = wrap_text("https://example.com/very/long/url end", 10);
    assert!(lines.iter().all(|l| l.chars().count() <= 10), "{lines:?}");
    assert_eq!(lines.concat().replace(' ', ""), "https://example.com/very/long/urlend");
  }

  #[test]
  fn format_date_is_calendar_day() {
    let ts = DateTime::parse_from_rfc3339("2024-03-06T23:59:00-05:00").unwrap();
    assert_eq!(format_date(&ts), "2024-03-06");
  }

  #[derive(Parser, Debug)]
  #[command(name = "dummy", version, about = "Dummy CLI", long_about = None)]
  struct DummyCli;

  #[test]
  fn render_man_page_produces_troff_text() {
    let page = render_man_page::<DummyCli>().expect("render manpage");
    assert!(page.contains(".TH"));
    assert!(page.to_lowercase().contains("dummy"));
  }
}
