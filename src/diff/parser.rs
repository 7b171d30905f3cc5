// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Parse unified diff text into DiffFiles with typed, numbered lines (single pass, lazy)
// role: diff/parser
// inputs: unified diff text as returned by GitHub (`application/vnd.github.diff`) or `git diff`
// outputs: Iterator of Result<DiffFile, DiffParseError>, one item per file section
// invariants:
// - explicit states: SeekingFileHeader -> InHunkHeader -> InHunkBody; no backtracking
// - hunk headers seed old/new counters; `+` consumes new, `-` consumes old, ` `/empty consume both, `\` is ignored
// - a header whose start + length overflows u32 is malformed; line numbers saturate instead of wrapping
// - post-image path wins unless the file was deleted (`+++ /dev/null`), then the pre-image path
// - a malformed hunk header fails only its file; parsing resumes at the next `diff --git`
// errors: DiffParseError::MalformedHunkHeader (yielded, never panics)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::DiffParseError;
use crate::model::{DiffFile, DiffLine, Hunk};

static RE_HUNK_HEADER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap());

const DEV_NULL: &str = "/dev/null";

/// Start positions and lengths parsed from `@@ -a,b +c,d @@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
  pub old_start: u32,
  pub old_len: u32,
  pub new_start: u32,
  pub new_len: u32,
}

pub fn parse_hunk_header(line: &str) -> Option<HunkRange> {
  let caps = RE_HUNK_HEADER.captures(line)?;
  let num = |i: usize, default: u32| -> Option<u32> {
    match caps.get(i) {
      Some(m) => m.as_str().parse::<u32>().ok(),
      None => Some(default),
    }
  };

  let range = HunkRange {
    old_start: num(1, 0)?,
    old_len: num(2, 1)?,
    new_start: num(3, 0)?,
    new_len: num(4, 1)?,
  };

  // A range that runs past u32::MAX cannot number its lines.
  range.old_start.checked_add(range.old_len)?;
  range.new_start.checked_add(range.new_len)?;

  Some(range)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
  /// Outside any file. `resync` is set after a malformed hunk: only `diff --git` restarts parsing.
  SeekingFileHeader { resync: bool },
  /// Inside a file's extended header (`index`, `---`, `+++`, modes), waiting for `@@`.
  InHunkHeader,
  InHunkBody {
    old: u32,
    new: u32,
    old_left: u32,
    new_left: u32,
  },
}

#[derive(Debug, Default)]
struct PendingFile {
  git_path: Option<String>,
  old_path: Option<String>,
  new_path: Option<String>,
  hunks: Vec<Hunk>,
}

impl PendingFile {
  fn from_git_header(line: &str) -> Self {
    // "diff --git a/src/x.py b/src/x.py": the b/ side is the best guess until ---/+++ arrive.
    let rest = line.trim_start_matches("diff --git ");
    let git_path = rest
      .rfind(" b/")
      .map(|i| rest[i + 3..].to_string())
      .or_else(|| rest.split_whitespace().last().map(|s| strip_side_prefix(s).to_string()));

    Self {
      git_path,
      ..Self::default()
    }
  }

  fn path(&self) -> String {
    let new = self.new_path.as_deref().filter(|p| *p != DEV_NULL);
    let old = self.old_path.as_deref().filter(|p| *p != DEV_NULL);

    let deleted = self.new_path.as_deref() == Some(DEV_NULL);
    let chosen = if deleted { old.or(new) } else { new.or(old) };

    chosen
      .map(str::to_string)
      .or_else(|| self.git_path.clone())
      .unwrap_or_default()
  }

  fn finish(self) -> DiffFile {
    DiffFile {
      path: self.path(),
      hunks: self.hunks,
    }
  }
}

/// Value of a `---`/`+++` header without the side prefix or trailing timestamp.
fn header_path(line: &str) -> String {
  let raw = &line[4..];
  let raw = raw.split('\t').next().unwrap_or(raw).trim_end();

  strip_side_prefix(raw).to_string()
}

fn strip_side_prefix(path: &str) -> &str {
  path
    .strip_prefix("a/")
    .or_else(|| path.strip_prefix("b/"))
    .unwrap_or(path)
}

/// Lazy, single-pass unified diff parser.
pub struct DiffFiles<'a> {
  lines: std::str::Lines<'a>,
  state: State,
  pending: Option<PendingFile>,
}

pub fn parse_unified_diff(text: &str) -> DiffFiles<'_> {
  DiffFiles {
    lines: text.lines(),
    state: State::SeekingFileHeader { resync: false },
    pending: None,
  }
}

impl<'a> DiffFiles<'a> {
  /// Begin a new file section, returning the previous one if any.
  fn start_file(&mut self, file: PendingFile) -> Option<DiffFile> {
    let finished = self.pending.take().map(PendingFile::finish);
    self.pending = Some(file);
    self.state = State::InHunkHeader;
    finished
  }

  fn start_hunk(&mut self, line: &str) -> Result<(), DiffParseError> {
    let Some(range) = parse_hunk_header(line) else {
      let path = self.pending.take().map(|p| p.path()).unwrap_or_default();
      self.state = State::SeekingFileHeader { resync: true };
      return Err(DiffParseError::MalformedHunkHeader {
        path,
        header: line.to_string(),
      });
    };

    let pending = self.pending.get_or_insert_with(PendingFile::default);
    pending.hunks.push(Hunk::new(line));

    self.state = State::InHunkBody {
      old: range.old_start,
      new: range.new_start,
      old_left: range.old_len,
      new_left: range.new_len,
    };

    Ok(())
  }

  fn push_line(&mut self, line: DiffLine) {
    if let Some(hunk) = self.pending.as_mut().and_then(|p| p.hunks.last_mut()) {
      hunk.lines.push(line);
    }
  }

  /// Classify one body line; returns the updated counters.
  fn body_line(&mut self, line: &str, old: u32, new: u32, old_left: u32, new_left: u32) -> State {
    let mut next = State::InHunkBody {
      old,
      new,
      old_left,
      new_left,
    };

    match line.chars().next() {
      Some('+') => {
        self.push_line(DiffLine::added(new, &line[1..]));
        next = State::InHunkBody {
          old,
          new: new.saturating_add(1),
          old_left,
          new_left: new_left.saturating_sub(1),
        };
      }
      Some('-') => {
        self.push_line(DiffLine::removed(old, &line[1..]));
        next = State::InHunkBody {
          old: old.saturating_add(1),
          new,
          old_left: old_left.saturating_sub(1),
          new_left,
        };
      }
      Some(' ') | None => {
        let text = line.get(1..).unwrap_or("");
        self.push_line(DiffLine::context(old, new, text));
        next = State::InHunkBody {
          old: old.saturating_add(1),
          new: new.saturating_add(1),
          old_left: old_left.saturating_sub(1),
          new_left: new_left.saturating_sub(1),
        };
      }
      // "\ No newline at end of file" and anything unrecognized
      _ => {}
    }

    next
  }
}

impl<'a> Iterator for DiffFiles<'a> {
  type Item = Result<DiffFile, DiffParseError>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let Some(raw) = self.lines.next() else {
        self.state = State::SeekingFileHeader { resync: false };
        return self.pending.take().map(|p| Ok(p.finish()));
      };
      let line = raw.strip_suffix('\r').unwrap_or(raw);

      if line.starts_with("diff --git ") {
        if let Some(done) = self.start_file(PendingFile::from_git_header(line)) {
          return Some(Ok(done));
        }
        continue;
      }

      match self.state {
        State::SeekingFileHeader { resync } => {
          if !resync && line.starts_with("--- ") {
            let file = PendingFile {
              old_path: Some(header_path(line)),
              ..PendingFile::default()
            };
            self.start_file(file);
          }
        }
        State::InHunkHeader => {
          if line.starts_with("--- ") {
            if let Some(p) = self.pending.as_mut() {
              p.old_path = Some(header_path(line));
            }
          } else if line.starts_with("+++ ") {
            if let Some(p) = self.pending.as_mut() {
              p.new_path = Some(header_path(line));
            }
          } else if line.starts_with("@@") {
            if let Err(e) = self.start_hunk(line) {
              return Some(Err(e));
            }
          }
        }
        State::InHunkBody {
          old,
          new,
          old_left,
          new_left,
        } => {
          if line.starts_with("@@") {
            if let Err(e) = self.start_hunk(line) {
              return Some(Err(e));
            }
          } else if old_left == 0 && new_left == 0 {
            // Hunk complete: only a new plain `---` file header is meaningful here.
            if line.starts_with("--- ") {
              let file = PendingFile {
                old_path: Some(header_path(line)),
                ..PendingFile::default()
              };
              if let Some(done) = self.start_file(file) {
                return Some(Ok(done));
              }
            }
          } else {
            self.state = self.body_line(line, old, new, old_left, new_left);
          }
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::LineKind;
  use proptest::prelude::*;

  const TWO_FILES: &str = "diff --git a/src/app.py b/src/app.py
index 3b18e51..a9c2f10 100644
--- a/src/app.py
+++ b/src/app.py
@@ -1,4 +1,5 @@ def main():
 import os
-import sys
+import sys, json
+import re

 def main():
diff --git a/README.md b/README.md
index 1111111..2222222 100644
--- a/README.md
+++ b/README.md
@@ -10,3 +10,2 @@
 # Title
-old line
 tail
\\ No newline at end of file
";

  fn parse_ok(text: &str) -> Vec<DiffFile> {
    parse_unified_diff(text).map(|r| r.unwrap()).collect()
  }

  #[test]
  fn hunk_header_variants() {
    assert_eq!(
      parse_hunk_header("@@ -1,4 +1,5 @@ fn main()"),
      Some(HunkRange {
        old_start: 1,
        old_len: 4,
        new_start: 1,
        new_len: 5
      })
    );
    assert_eq!(
      parse_hunk_header("@@ -3 +3 @@"),
      Some(HunkRange {
        old_start: 3,
        old_len: 1,
        new_start: 3,
        new_len: 1
      })
    );
    assert_eq!(parse_hunk_header("@@ -x,1 +1 @@"), None);
    assert_eq!(parse_hunk_header("@@ -99999999999,1 +1 @@"), None);
  }

  #[test]
  fn parses_files_hunks_and_numbers() {
    let files = parse_ok(TWO_FILES);
    assert_eq!(files.len(), 2);

    let app = &files[0];
    assert_eq!(app.path, "src/app.py");
    assert_eq!(app.hunks.len(), 1);
    assert_eq!(app.hunks[0].header, "@@ -1,4 +1,5 @@ def main():");

    let lines = &app.hunks[0].lines;
    let kinds: Vec<LineKind> = lines.iter().map(|l| l.kind).collect();
    assert_eq!(
      kinds,
      vec![
        LineKind::Context,
        LineKind::Removed,
        LineKind::Added,
        LineKind::Added,
        LineKind::Context,
        LineKind::Context
      ]
    );
    assert_eq!(lines[0], DiffLine::context(1, 1, "import os"));
    assert_eq!(lines[1], DiffLine::removed(2, "import sys"));
    assert_eq!(lines[2], DiffLine::added(2, "import sys, json"));
    assert_eq!(lines[3], DiffLine::added(3, "import re"));
    assert_eq!(lines[4], DiffLine::context(3, 4, ""));
    assert_eq!(lines[5], DiffLine::context(4, 5, "def main():"));

    let readme = &files[1];
    assert_eq!(readme.path, "README.md");
    assert_eq!(readme.additions(), 0);
    assert_eq!(readme.deletions(), 1);
    assert_eq!(readme.hunks[0].lines[2], DiffLine::context(11, 10, "tail"));
  }

  #[test]
  fn deleted_file_uses_pre_image_path() {
    let text = "diff --git a/old.c b/old.c
deleted file mode 100644
index abc1234..0000000
--- a/old.c
+++ /dev/null
@@ -1,2 +0,0 @@
-int x;
-int y;
";
    let files = parse_ok(text);
    assert_eq!(files[0].path, "old.c");
    assert_eq!(files[0].deletions(), 2);
  }

  #[test]
  fn new_file_uses_post_image_path() {
    let text = "diff --git a/new.cpp b/new.cpp
new file mode 100644
--- /dev/null
+++ b/new.cpp
@@ -0,0 +1,1 @@
+int main() {}
";
    let files = parse_ok(text);
    assert_eq!(files[0].path, "new.cpp");
    assert_eq!(files[0].hunks[0].lines[0], DiffLine::added(1, "int main() {}"));
  }

  #[test]
  fn binary_file_has_path_but_no_hunks() {
    let text = "diff --git a/logo.png b/logo.png
index 1234567..89abcde 100644
Binary files a/logo.png and b/logo.png differ
";
    let files = parse_ok(text);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "logo.png");
    assert!(files[0].hunks.is_empty());
  }

  #[test]
  fn plain_unified_diff_without_git_headers() {
    let text = "--- a/one.py\t2024-01-01 00:00:00
+++ b/one.py\t2024-01-02 00:00:00
@@ -1 +1 @@
-a = 1
+a = 2
--- a/two.py
+++ b/two.py
@@ -5,2 +5,2 @@
 keep
-b = 1
+b = 2
";
    let files = parse_ok(text);
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, "one.py");
    assert_eq!(files[1].path, "two.py");
    assert_eq!(files[1].hunks[0].lines[2], DiffLine::added(6, "b = 2"));
  }

  #[test]
  fn removed_line_starting_with_dashes_is_not_a_header() {
    let text = "--- a/notes.md
+++ b/notes.md
@@ -1,2 +1,1 @@
--- a horizontal rule
 text
";
    let files = parse_ok(text);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].hunks[0].lines[0], DiffLine::removed(1, "-- a horizontal rule"));
  }

  #[test]
  fn overflowing_ranges_are_rejected_and_numbers_saturate() {
    assert_eq!(parse_hunk_header("@@ -4294967295,2 +1,2 @@"), None);
    assert_eq!(parse_hunk_header("@@ -1,2 +4294967295,1 @@"), None);

    let text = "--- a/x.c\n+++ b/x.c\n@@ -4294967295,2 +1,2 @@\n a\n b\n";
    let results: Vec<_> = parse_unified_diff(text).collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(DiffParseError::MalformedHunkHeader { .. })));

    // The old side ends at u32::MAX; the trailing context line keeps advancing the new side only.
    let text = "--- a/x.c\n+++ b/x.c\n@@ -4294967294,1 +1,2 @@\n a\n b\n";
    let files = parse_ok(text);
    let lines = &files[0].hunks[0].lines;
    assert_eq!(lines[0], DiffLine::context(4294967294, 1, "a"));
    assert_eq!(lines[1], DiffLine::context(u32::MAX, 2, "b"));
  }

  #[test]
  fn no_newline_marker_inside_counted_hunk_is_skipped() {
    let text = "--- a/v.txt
+++ b/v.txt
@@ -1 +1 @@
-a
\\ No newline at end of file
+b
\\ No newline at end of file
";
    let files = parse_ok(text);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].hunks[0].lines, vec![DiffLine::removed(1, "a"), DiffLine::added(1, "b")]);
  }

  #[test]
  fn malformed_hunk_skips_only_that_file() {
    let text = "diff --git a/bad.py b/bad.py
--- a/bad.py
+++ b/bad.py
@@ -a,b +c,d @@
+ignored
--- a/looks-like-header.py
diff --git a/good.py b/good.py
--- a/good.py
+++ b/good.py
@@ -1 +1 @@
-x
+y
";
    let results: Vec<_> = parse_unified_diff(text).collect();
    assert_eq!(results.len(), 2);
    assert_eq!(
      results[0],
      Err(DiffParseError::MalformedHunkHeader {
        path: "bad.py".into(),
        header: "@@ -a,b +c,d @@".into()
      })
    );
    let good = results[1].as_ref().unwrap();
    assert_eq!(good.path, "good.py");
    assert_eq!(good.line_count(), 2);
  }

  #[test]
  fn crlf_and_preamble_are_tolerated() {
    let text = "From 123 Mon Sep 17 00:00:00 2001\r\nSubject: x\r\n\r\ndiff --git a/a.md b/a.md\r\n--- a/a.md\r\n+++ b/a.md\r\n@@ -1 +1 @@\r\n-old\r\n+new\r\n";
    let files = parse_ok(text);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].hunks[0].lines[1], DiffLine::added(1, "new"));
  }

  #[test]
  fn parsing_is_lazy() {
    let mut it = parse_unified_diff(TWO_FILES);
    let first = it.next().unwrap().unwrap();
    assert_eq!(first.path, "src/app.py");
    // The second file is only materialized on demand.
    assert_eq!(it.next().unwrap().unwrap().path, "README.md");
    assert!(it.next().is_none());
  }

  #[test]
  fn empty_input_yields_nothing() {
    assert_eq!(parse_unified_diff("").count(), 0);
  }

  #[derive(Debug, Clone, Copy)]
  enum Op {
    Add,
    Del,
    Ctx,
  }

  fn op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Add), Just(Op::Del), Just(Op::Ctx)]
  }

  proptest! {
    #[test]
    fn counts_and_numbering_hold(ops in proptest::collection::vec(op(), 1..60), old_start in 1u32..500, new_start in 1u32..500) {
      let adds = ops.iter().filter(|o| matches!(o, Op::Add)).count() as u32;
      let dels = ops.iter().filter(|o| matches!(o, Op::Del)).count() as u32;
      let ctx = ops.iter().filter(|o| matches!(o, Op::Ctx)).count() as u32;

      let mut text = format!(
        "diff --git a/f.py b/f.py\n--- a/f.py\n+++ b/f.py\n@@ -{},{} +{},{} @@\n",
        old_start, dels + ctx, new_start, adds + ctx
      );
      for (i, o) in ops.iter().enumerate() {
        let prefix = match o { Op::Add => '+', Op::Del => '-', Op::Ctx => ' ' };
        text.push_str(&format!("{}line {}\n", prefix, i));
      }

      let files = parse_ok(&text);
      prop_assert_eq!(files.len(), 1);
      let lines = &files[0].hunks[0].lines;
      prop_assert_eq!(lines.len(), ops.len());

      let (mut old, mut new) = (old_start, new_start);
      let (mut n_add, mut n_del, mut n_ctx) = (0u32, 0u32, 0u32);
      for line in lines {
        match line.kind {
          LineKind::Added => {
            n_add += 1;
            prop_assert_eq!((line.old_line_no, line.new_line_no), (None, Some(new)));
            new += 1;
          }
          LineKind::Removed => {
            n_del += 1;
            prop_assert_eq!((line.old_line_no, line.new_line_no), (Some(old), None));
            old += 1;
          }
          LineKind::Context => {
            n_ctx += 1;
            prop_assert_eq!((line.old_line_no, line.new_line_no), (Some(old), Some(new)));
            old += 1;
            new += 1;
          }
          LineKind::Truncated => prop_assert!(false, "parser never emits markers"),
        }
      }
      prop_assert_eq!((n_add, n_del, n_ctx), (adds, dels, ctx));
    }
  }
}
