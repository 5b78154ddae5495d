//! OCR text cleanup.

use std::sync::LazyLock;

use regex::Regex;

/// A leading weekday name directly followed by a day number.
static LEADING_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?i)^(?:lunes|martes|mi[eé]rcoles|jueves|viernes|s[aá]bado|domingo)[\s,.:;-]*(\d)",
  )
  .expect("valid weekday regex")
});

/// Turn a raw OCR blob into trimmed, non-empty lines.
///
/// Non-breaking and narrow spaces become plain spaces, typographic quotes and
/// dashes become their ASCII forms, and runs of whitespace inside a line
/// collapse to one space. Never fails; empty input yields no lines.
pub fn normalize(raw: &str) -> Vec<String> {
  let cleaned: String = raw.chars().map(replace_char).collect();
  cleaned
    .lines()
    .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
    .filter(|line| !line.is_empty())
    .collect()
}

fn replace_char(c: char) -> char {
  match c {
    '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{2009}' => ' ',
    '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{00B4}' => '\'',
    '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '«' | '»' => '"',
    '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
    other => other,
  }
}

/// Lowercase `s` and strip Spanish diacritics, for keyword matching.
///
/// OCR frequently drops or mangles accents, so every keyword comparison runs
/// on folded text.
pub fn fold(s: &str) -> String {
  s.chars()
    .flat_map(char::to_lowercase)
    .map(|c| match c {
      'á' | 'à' | 'â' | 'ä' => 'a',
      'é' | 'è' | 'ê' | 'ë' => 'e',
      'í' | 'ì' | 'î' | 'ï' => 'i',
      'ó' | 'ò' | 'ô' | 'ö' => 'o',
      'ú' | 'ù' | 'û' | 'ü' => 'u',
      'ñ' => 'n',
      other => other,
    })
    .collect()
}

/// Drop a leading weekday name (`Lunes 6 ...`, `viernes, 17/04 ...`).
///
/// Only a weekday followed by a day number is removed, so holiday names that
/// start with one (`Viernes Santo`, `Lunes de Pascua`) are left intact.
pub fn strip_weekday(line: &str) -> &str {
  match LEADING_WEEKDAY.captures(line).and_then(|c| c.get(1)) {
    Some(day) => &line[day.start()..],
    None => line,
  }
}
