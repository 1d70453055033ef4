//! Free-text answer normalization.
//!
//! Maps a learner's typed answer to a canonical string so that equivalent
//! spellings compare equal: full-width input, unit suffixes, composite units
//! ("2m50cm"), remainder words, and order-insensitive forms (prime-factor
//! products, factor pairs, congruence equalities).
//!
//! `normalize_once` is the ordered single pass. `normalize` repeats it until
//! the string stops changing, which makes it idempotent for every input.

use lazy_static::lazy_static;
use regex::Regex;

/// Full-width and symbol variants folded to their ASCII spelling. Full-width
/// capitals go straight to lowercase.
static FULL_WIDTH: &[(char, char)] = &[
  ('０', '0'), ('１', '1'), ('２', '2'), ('３', '3'), ('４', '4'),
  ('５', '5'), ('６', '6'), ('７', '7'), ('８', '8'), ('９', '9'),
  ('ａ', 'a'), ('ｂ', 'b'), ('ｃ', 'c'), ('ｄ', 'd'), ('ｅ', 'e'), ('ｆ', 'f'), ('ｇ', 'g'),
  ('ｈ', 'h'), ('ｉ', 'i'), ('ｊ', 'j'), ('ｋ', 'k'), ('ｌ', 'l'), ('ｍ', 'm'), ('ｎ', 'n'),
  ('ｏ', 'o'), ('ｐ', 'p'), ('ｑ', 'q'), ('ｒ', 'r'), ('ｓ', 's'), ('ｔ', 't'), ('ｕ', 'u'),
  ('ｖ', 'v'), ('ｗ', 'w'), ('ｘ', 'x'), ('ｙ', 'y'), ('ｚ', 'z'),
  ('Ａ', 'a'), ('Ｂ', 'b'), ('Ｃ', 'c'), ('Ｄ', 'd'), ('Ｅ', 'e'), ('Ｆ', 'f'), ('Ｇ', 'g'),
  ('Ｈ', 'h'), ('Ｉ', 'i'), ('Ｊ', 'j'), ('Ｋ', 'k'), ('Ｌ', 'l'), ('Ｍ', 'm'), ('Ｎ', 'n'),
  ('Ｏ', 'o'), ('Ｐ', 'p'), ('Ｑ', 'q'), ('Ｒ', 'r'), ('Ｓ', 's'), ('Ｔ', 't'), ('Ｕ', 'u'),
  ('Ｖ', 'v'), ('Ｗ', 'w'), ('Ｘ', 'x'), ('Ｙ', 'y'), ('Ｚ', 'z'),
  ('（', '('), ('）', ')'), ('＋', '+'), ('－', '-'), ('＊', '*'), ('＝', '='), ('，', ','),
  ('．', '.'), ('／', '/'), ('：', ':'), ('＾', '^'), ('～', '-'),
];

/// Unit suffixes stripped from single-value answers, longest first.
static UNIT_SUFFIXES: &[&str] = &[
  "km/時", "km/h", "cm²", "cm³", "m²", "m³", "時間", "km", "cm", "mm", "ml", "kg", "m", "g", "l",
  "分", "秒", "度", "°", "円", "個", "人", "%",
];

lazy_static! {
  static ref MIXED_NUMBER: Regex = Regex::new(r"([0-9])\s+([0-9]+/[0-9]+)").unwrap();
  static ref COMPOUND_UNITS: Vec<Regex> = vec![
    Regex::new(r"([0-9]+(?:\.[0-9]+)?)(?:m|メートル)([0-9]+(?:\.[0-9]+)?)(?:cm|センチ)?").unwrap(),
    Regex::new(r"([0-9]+(?:\.[0-9]+)?)(?:kg|キログラム)([0-9]+(?:\.[0-9]+)?)(?:g|グラム)?").unwrap(),
    Regex::new(r"([0-9]+(?:\.[0-9]+)?)(?:l|リットル)([0-9]+(?:\.[0-9]+)?)(?:ml|ミリリットル)?").unwrap(),
    Regex::new(r"([0-9]+)分([0-9]+)秒?").unwrap(),
  ];
  static ref PRODUCT: Regex = Regex::new(r"^[0-9^*]+$").unwrap();
  static ref FACTOR_GROUP: Regex = Regex::new(r"\([^)]+\)").unwrap();
  static ref SOLVED_FOR: Regex = Regex::new(r"^[xy]=").unwrap();
}

pub fn fold_width(s: &str) -> String {
  s.chars()
    .map(|c| FULL_WIDTH.iter().find(|(from, _)| *from == c).map_or(c, |(_, to)| *to))
    .collect()
}

/// Lowercases, keeps "w r/d" mixed numbers as "wとr/d", then drops all whitespace.
pub fn fold_case_and_space(s: &str) -> String {
  let lower = s.to_lowercase();
  let mixed = MIXED_NUMBER.replace_all(&lower, "${1}と${2}");
  mixed.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn apply_synonyms(s: &str) -> String {
  s.replace('角', "").replace("sqrt", "√").replace('・', "*")
}

/// "2m50cm" → "2,50", "1kg500g" → "1,500", "5分30秒" → "5,30".
pub fn collapse_compound_units(s: &str) -> String {
  COMPOUND_UNITS
    .iter()
    .fold(s.to_string(), |acc, re| re.replace_all(&acc, "${1},${2}").into_owned())
}

pub fn fold_remainder(s: &str) -> String {
  s.replace("あまり", "r").replace("余り", "r")
}

/// Strips one trailing unit from answers without a comma.
pub fn strip_trailing_unit(s: &str) -> String {
  if s.contains(',') {
    return s.to_string();
  }
  match UNIT_SUFFIXES.iter().find(|u| s.ends_with(*u)) {
    Some(unit) => s[..s.len() - unit.len()].to_string(),
    None => s.to_string(),
  }
}

/// "3*2^2" → "2^2*3". Tokens sort as strings, so "2*11" → "11*2".
fn canonical_product(s: &str) -> Option<String> {
  if !s.contains('*') || !PRODUCT.is_match(s) {
    return None;
  }
  let mut tokens: Vec<&str> = s.split('*').collect();
  tokens.sort();
  Some(tokens.join("*"))
}

/// "(x+3)(x+2)" → "(x+2)(x+3)" when the whole string is two or more groups.
fn canonical_factor_groups(s: &str) -> Option<String> {
  let mut groups: Vec<&str> = FACTOR_GROUP.find_iter(s).map(|m| m.as_str()).collect();
  if groups.len() < 2 || groups.concat() != s {
    return None;
  }
  groups.sort_unstable();
  Some(groups.concat())
}

/// "df=ca" → "ac=df". Solved-variable answers such as "x=5" are left alone.
fn canonical_equality(s: &str) -> Option<String> {
  if !s.contains('=') || SOLVED_FOR.is_match(s) {
    return None;
  }
  let parts: Vec<&str> = s.split('=').collect();
  if parts.len() != 2 {
    return None;
  }
  let mut sides: Vec<String> = parts
    .iter()
    .map(|p| {
      let mut chars: Vec<char> = p.chars().collect();
      chars.sort_unstable();
      chars.into_iter().collect()
    })
    .collect();
  sides.sort_unstable();
  Some(sides.join("="))
}

/// One ordered pass of the pipeline.
pub fn normalize_once(input: &str) -> String {
  let s = fold_width(input);
  let s = fold_case_and_space(&s);
  let s = apply_synonyms(&s);
  let s = collapse_compound_units(&s);
  let s = fold_remainder(&s);
  let s = strip_trailing_unit(&s);
  canonical_product(&s)
    .or_else(|| canonical_factor_groups(&s))
    .or_else(|| canonical_equality(&s))
    .unwrap_or(s)
}

/// Canonical form of `input`; `normalize(normalize(s)) == normalize(s)` for every `s`.
pub fn normalize(input: &str) -> String {
  let mut current = normalize_once(input);
  // After the first pass a change either shortens the string, consumes a unit
  // word, or sorts; the bound covers all of them.
  for _ in 0..2 * current.chars().count() + 4 {
    let next = normalize_once(&current);
    if next == current {
      break;
    }
    current = next;
  }
  current
}

/// Scores a submission. Empty input never matches.
pub fn answers_match(input: &str, expected: &str) -> bool {
  let got = normalize(input);
  !got.is_empty() && got == normalize(expected)
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::{rngs::StdRng, Rng, SeedableRng};

  #[test]
  fn full_width_and_case() {
    assert_eq!(normalize("１２３"), "123");
    assert_eq!(normalize("Ｘ＝５"), "x=5");
    assert_eq!(normalize(" 1 2 "), "12");
    assert_eq!(normalize("（ｘ＋２）（ｘ＋３）"), "(x+2)(x+3)");
  }

  #[test]
  fn units_are_stripped_once() {
    assert_eq!(normalize_once("15cm"), "15");
    assert_eq!(normalize_once("78.5cm²"), "78.5");
    assert_eq!(normalize_once("500ml"), "500");
    assert_eq!(normalize_once("60km/時"), "60");
    assert_eq!(normalize_once("108°"), "108");
    assert_eq!(normalize_once("3人"), "3");
    assert_eq!(normalize_once("5cmcm"), "5cm");
    assert_eq!(normalize("5cmcm"), "5");
  }

  #[test]
  fn unit_list_is_longest_first_where_suffixes_overlap() {
    for (i, a) in UNIT_SUFFIXES.iter().enumerate() {
      for b in &UNIT_SUFFIXES[i + 1..] {
        assert!(!b.ends_with(a) || a == b, "'{b}' is shadowed by earlier '{a}'");
      }
    }
  }

  #[test]
  fn compound_units() {
    assert_eq!(normalize("2m50cm"), "2,50");
    assert_eq!(normalize("2m50"), "2,50");
    assert_eq!(normalize("1kg500g"), "1,500");
    assert_eq!(normalize("1L500mL"), "1,500");
    assert_eq!(normalize("5分30秒"), "5,30");
    assert_eq!(normalize("５分３０秒"), "5,30");
  }

  #[test]
  fn remainder_words() {
    assert_eq!(normalize("12あまり5"), "12r5");
    assert_eq!(normalize("12余り5"), "12r5");
    assert_eq!(normalize("12 R 5"), "12r5");
  }

  #[test]
  fn mixed_numbers_accept_space_or_to() {
    assert_eq!(normalize("1 1/3"), "1と1/3");
    assert_eq!(normalize("1と1/3"), "1と1/3");
    assert_eq!(normalize("11/3"), "11/3");
  }

  #[test]
  fn order_insensitive_forms() {
    assert_eq!(normalize("3*2^2"), "2^2*3");
    assert_eq!(normalize("3・2^2"), "2^2*3");
    assert_eq!(normalize("2^3*11"), "11*2^3");
    assert_eq!(normalize("11*2^3"), "11*2^3");
    assert_eq!(normalize("(x+3)(x+2)"), normalize("(x+2)(x+3)"));
    assert_eq!(normalize("(x-5)(x+5)"), "(x+5)(x-5)");
    assert_eq!(normalize("DF=AC"), "ac=df");
    assert_eq!(normalize("ca=fd"), "ac=df");
    assert_eq!(normalize("角D=角A"), "a=d");
    assert_eq!(normalize("x=5"), "x=5");
    assert_eq!(normalize("y=2x+3"), "y=2x+3");
    assert_eq!(normalize("x=3,y=-2"), "x=3,y=-2");
  }

  #[test]
  fn factor_groups_need_the_whole_string() {
    assert_eq!(normalize("2(x+3)"), "2(x+3)");
    assert_eq!(normalize("(x+3)^2"), "(x+3)^2");
  }

  #[test]
  fn sqrt_spelling() {
    assert_eq!(normalize("2sqrt3"), "2√3");
    assert_eq!(normalize("2 SQRT 3"), "2√3");
  }

  #[test]
  fn scenario_circle_area_with_unit() {
    assert!(answers_match("78.5cm²", "78.5"));
    assert!(answers_match("７８．５", "78.5"));
  }

  #[test]
  fn empty_input_never_matches() {
    assert_eq!(normalize(""), "");
    assert!(!answers_match("", "5"));
    assert!(!answers_match("   ", "5"));
    assert!(!answers_match("cm", ""));
  }

  #[test]
  fn idempotent_on_random_strings() {
    let alphabet: Vec<char> = "0123456789xyac=*^()+-/,.mlgk分秒角あまりsqrt と%ＡＸ１２（）cm²"
      .chars()
      .collect();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..5000 {
      let len = rng.gen_range(0..12);
      let s: String = (0..len).map(|_| alphabet[rng.gen_range(0..alphabet.len())]).collect();
      let once = normalize(&s);
      assert_eq!(normalize(&once), once, "input {s:?}");
    }
  }
}
