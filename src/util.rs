//! Small formatting helpers used across generators and handlers.

/// Renders the fixed-point value `value / 10^decimals` with trailing zeros stripped.
/// `scaled(161, 1)` is "16.1", `scaled(150, 2)` is "1.5".
pub fn scaled(value: i64, decimals: u32) -> String {
  let pow = 10i64.pow(decimals);
  let sign = if value < 0 { "-" } else { "" };
  let abs = value.abs();
  let (int_part, frac_part) = (abs / pow, abs % pow);
  if frac_part == 0 {
    return format!("{sign}{int_part}");
  }
  let frac = format!("{:0width$}", frac_part, width = decimals as usize);
  format!("{sign}{int_part}.{}", frac.trim_end_matches('0'))
}

/// Negative numbers are parenthesized: `signed(-3)` is "(-3)".
pub fn signed(n: i64) -> String {
  if n < 0 { format!("({n})") } else { n.to_string() }
}

/// Coefficient-and-variable term with 1/-1 elided: `term(1, "x")` is "x", `term(-1, "x")` is "-x".
pub fn term(coef: i64, var: &str) -> String {
  match coef {
    1 => var.to_string(),
    -1 => format!("-{var}"),
    _ => format!("{coef}{var}"),
  }
}

/// Compact `coef·x + constant` without spaces, as answers are written: "2x+3", "-x", "4".
pub fn linear_expr(coef: i64, var: &str, constant: i64) -> String {
  if coef == 0 {
    return constant.to_string();
  }
  let mut s = term(coef, var);
  if constant != 0 {
    s.push_str(&format!("{constant:+}"));
  }
  s
}

/// Spaced signed tail for problem text: " + 3", " - 3".
pub fn plus_minus(n: i64) -> String {
  if n < 0 { format!(" - {}", -n) } else { format!(" + {n}") }
}

/// Spaced polynomial for problem text: `poly_text(&[(1, "x^2"), (-5, "x"), (6, "")])` is
/// "x^2 - 5x + 6". Zero terms are skipped.
pub fn poly_text(terms: &[(i64, &str)]) -> String {
  let mut out = String::new();
  for &(coef, var) in terms {
    if coef == 0 {
      continue;
    }
    let magnitude = if var.is_empty() { coef.abs().to_string() } else { term(coef.abs(), var) };
    if out.is_empty() {
      if coef < 0 {
        out.push('-');
      }
    } else {
      out.push_str(if coef < 0 { " - " } else { " + " });
    }
    out.push_str(&magnitude);
  }
  if out.is_empty() { "0".to_string() } else { out }
}

/// Same as `poly_text` without spaces, for answers: "x^2-5x+6".
pub fn poly_compact(terms: &[(i64, &str)]) -> String {
  poly_text(terms).replace(' ', "")
}

/// Answer as shown to the learner: `*` becomes `×`.
pub fn display_answer(answer: &str) -> String {
  answer.replace('*', "×")
}

/// Turns `base^exp` markup into HTML superscripts: "x^2" becomes "x<sup>2</sup>".
pub fn render_superscripts(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut chars = text.chars().peekable();
  while let Some(c) = chars.next() {
    if c == '^' && chars.peek().map_or(false, |n| n.is_ascii_digit()) {
      out.push_str("<sup>");
      while let Some(&d) = chars.peek() {
        if !d.is_ascii_digit() {
          break;
        }
        out.push(d);
        chars.next();
      }
      out.push_str("</sup>");
    } else {
      out.push(c);
    }
  }
  out
}

/// Log-safe truncation for large strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} chars total)", head, s.chars().count())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scaled_strips_trailing_zeros() {
    assert_eq!(scaled(161, 1), "16.1");
    assert_eq!(scaled(150, 2), "1.5");
    assert_eq!(scaled(7850, 2), "78.5");
    assert_eq!(scaled(400, 2), "4");
    assert_eq!(scaled(5, 3), "0.005");
    assert_eq!(scaled(-25, 1), "-2.5");
  }

  #[test]
  fn terms_and_polynomials() {
    assert_eq!(signed(-3), "(-3)");
    assert_eq!(signed(4), "4");
    assert_eq!(linear_expr(2, "x", 3), "2x+3");
    assert_eq!(linear_expr(-1, "x", -4), "-x-4");
    assert_eq!(linear_expr(0, "x", 5), "5");
    assert_eq!(poly_text(&[(1, "x^2"), (-5, "x"), (6, "")]), "x^2 - 5x + 6");
    assert_eq!(poly_text(&[(-2, "x^2"), (0, "x"), (-1, "")]), "-2x^2 - 1");
    assert_eq!(poly_compact(&[(1, "x^2"), (1, "x"), (-6, "")]), "x^2+x-6");
  }

  #[test]
  fn superscripts_and_display() {
    assert_eq!(render_superscripts("x^2 + 3^12"), "x<sup>2</sup> + 3<sup>12</sup>");
    assert_eq!(render_superscripts("a^b"), "a^b");
    assert_eq!(display_answer("2^2*3"), "2^2×3");
  }
}
