// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Map arbitrary Unicode text to printable ASCII for the single-byte built-in PDF fonts
// role: pdf/ascii
// inputs: &str (titles, bodies, diff text)
// outputs: Cow<str> containing only printable ASCII
// invariants:
// - pure function; upstream data stays untouched and is converted only when handed to the canvas
// - already-ASCII input is borrowed, not copied
// - characters without a known equivalent become '?'; control characters become a space
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::borrow::Cow;

fn is_printable_ascii(c: char) -> bool {
  (' '..='~').contains(&c)
}

fn substitute(c: char) -> &'static str {
  match c {
    '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => "'",
    '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' | '\u{00AB}' | '\u{00BB}' => "\"",
    '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2212}' => "-",
    '\u{2014}' | '\u{2015}' => "--",
    '\u{2026}' => "...",
    '\u{2022}' | '\u{00B7}' | '\u{2023}' | '\u{25CF}' => "*",
    '\u{2192}' | '\u{27F6}' => "->",
    '\u{2190}' | '\u{27F5}' => "<-",
    '\u{21D2}' => "=>",
    '\u{2264}' => "<=",
    '\u{2265}' => ">=",
    '\u{2260}' => "!=",
    '\u{00D7}' => "x",
    '\u{00A0}' | '\u{2002}' | '\u{2003}' | '\u{2009}' | '\u{200A}' | '\u{202F}' => " ",
    '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => "",
    '\u{00A9}' => "(c)",
    '\u{00AE}' => "(R)",
    '\u{2122}' => "(TM)",
    '\u{00B0}' => "deg",
    '\u{20AC}' => "EUR",
    '\u{00A3}' => "GBP",
    '\u{2713}' | '\u{2714}' => "v",
    '\u{2717}' | '\u{2718}' => "x",
    'À'..='Å' => "A",
    'à'..='å' => "a",
    'Æ' => "AE",
    'æ' => "ae",
    'Ç' => "C",
    'ç' => "c",
    'È'..='Ë' => "E",
    'è'..='ë' => "e",
    'Ì'..='Ï' => "I",
    'ì'..='ï' => "i",
    'Ð' => "D",
    'ð' => "d",
    'Ñ' => "N",
    'ñ' => "n",
    'Ò'..='Ö' | 'Ø' => "O",
    'ò'..='ö' | 'ø' => "o",
    'Ù'..='Ü' => "U",
    'ù'..='ü' => "u",
    'Ý' => "Y",
    'ý' | 'ÿ' => "y",
    'ß' => "ss",
    'Œ' => "OE",
    'œ' => "oe",
    'Š' => "S",
    'š' => "s",
    'Ž' => "Z",
    'ž' => "z",
    'Ł' => "L",
    'ł' => "l",
    _ if c.is_control() => " ",
    _ => "?",
  }
}

pub fn asciify(text: &str) -> Cow<'_, str> {
  if text.chars().all(is_printable_ascii) {
    return Cow::Borrowed(text);
  }

  let mut out = String::with_capacity(text.len());

  for c in text.chars() {
    if is_printable_ascii(c) {
      out.push(c);
    } else {
      out.push_str(substitute(c));
    }
  }

  Cow::Owned(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ascii_is_borrowed() {
    assert!(matches!(asciify("plain text"), Cow::Borrowed(_)));
  }

  #[test]
  fn typography_is_substituted() {
    assert_eq!(asciify("\u{201C}quoted\u{201D} \u{2014} it\u{2019}s \u{2026}"), "\"quoted\" -- it's ...");
    assert_eq!(asciify("a \u{2192} b \u{2022} c"), "a -> b * c");
  }

  #[test]
  fn accents_fold_to_base_letters() {
    assert_eq!(asciify("Caf\u{e9} na\u{ef}ve \u{c5}ngstr\u{f6}m Stra\u{df}e"), "Cafe naive Angstrom Strasse");
  }

  #[test]
  fn unknown_and_control_chars() {
    assert_eq!(asciify("\u{4e2d}\u{6587}"), "??");
    assert_eq!(asciify("a\u{7}b"), "a b");
    assert_eq!(asciify("\u{1F680} launch"), "? launch");
  }

  #[test]
  fn output_is_always_printable_ascii() {
    let sample = "\u{feff}\u{00a0}x\u{2013}y\u{0301}\u{00e9}\t";
    assert!(asciify(sample).chars().all(is_printable_ascii));
  }
}
