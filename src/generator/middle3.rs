//! 中3: factorization, square roots, quadratic equations and the
//! Pythagorean theorem.

use super::{GenContext, Problem, TopicFn};
use crate::domain::Difficulty;
use crate::error::GenerateError;
use crate::figure;
use crate::numeric::{gcd, sqrt_string, Fraction};
use crate::util::{poly_text, term};

pub(super) fn lookup(topic_id: &str) -> Option<TopicFn> {
  let f: TopicFn = match topic_id {
    "m3_factorization_basic" => factorization_basic,
    "m3_factorization_common_factor" => factorization_common_factor,
    "m3_factorization_formula" => factorization_formula,
    "m3_square_roots_simplify" => square_roots_simplify,
    "m3_square_roots_calculation" => square_roots_calculation,
    "m3_quadratic_equations_factorization" => quadratic_factorization,
    "m3_quadratic_equations_formula" => quadratic_formula,
    "m3_pythagorean_theorem" => pythagorean_theorem,
    _ => return None,
  };
  Some(f)
}

/// Factor groups concatenated in sorted order, the order answers compare in.
fn factor_answer(mut groups: Vec<String>) -> String {
  groups.sort_unstable();
  groups.concat()
}

/// "(x+2)", "(x-3)".
fn root_group(r: i64) -> String {
  format!("(x{r:+})")
}

/// `coef√radicand` for square-free radicands, with 0 and ±1 rendered plainly.
fn root_term(coef: i64, radicand: u64) -> String {
  if coef == 0 { "0".to_string() } else { sqrt_string(coef, radicand) }
}

/// "x=-3,2", or "x=2" for a double root. Roots are sorted ascending.
fn roots_answer(mut roots: Vec<Fraction>) -> String {
  roots.sort();
  roots.dedup();
  let parts: Vec<String> = roots.iter().map(Fraction::to_string).collect();
  format!("x={}", parts.join(","))
}

fn factorization_basic(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let (r1, r2) = match d {
    Difficulty::Basic => (ctx.int(1, 5), ctx.int(1, 5)),
    Difficulty::Standard => {
      let r1 = ctx.int_excl(-7, 7, &[0]);
      (r1, ctx.int_excl(-7, 7, &[0, r1, -r1]))
    }
    Difficulty::Advanced => {
      let r1 = ctx.int_excl(-12, 12, &[0, 1, -1]);
      (r1, ctx.int_excl(-12, 12, &[0, r1, -r1]))
    }
  };
  let (b, c) = (r1 + r2, r1 * r2);
  let (g1, g2) = (root_group(r1), root_group(r2));
  let answer = factor_answer(vec![g1.clone(), g2.clone()]);
  Ok(Problem::new(
    format!("{} を因数分解しなさい。", poly_text(&[(1, "x^2"), (b, "x"), (c, "")])),
    answer,
    format!("足して {b}、かけて {c} になる2つの数は {r1} と {r2} です。したがって、{g1}{g2} と因数分解できます。"),
  ))
}

fn factorization_common_factor(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let common = ctx.int(2, 5);
      let (a, b) = ctx.resample("m3_factorization_common_factor", |ctx| {
        let a = ctx.int(1, 5);
        let b = ctx.int_excl(1, 5, &[a]);
        (gcd(a, b) == 1).then_some((a, b))
      })?;
      let answer = format!("{common}({}+{b})", term(a, "x"));
      Ok(Problem::new(
        format!("{}x + {} を因数分解しなさい。", common * a, common * b),
        answer.clone(),
        format!("共通因数 {common} でくくります。答えは {answer}。"),
      ))
    }
    Difficulty::Standard => {
      let common = ctx.int(2, 5);
      let (var, other) = if ctx.coin() { ("x", "y") } else { ("y", "x") };
      let (a, b) = ctx.resample("m3_factorization_common_factor", |ctx| {
        let a = ctx.int(1, 5);
        let b = ctx.int(1, 5);
        (gcd(a, b) == 1).then_some((a, b))
      })?;
      let answer = format!("{common}{var}({}+{b})", term(a, other));
      Ok(Problem::new(
        format!("{}{var}{other} + {}{var} を因数分解しなさい。", common * a, common * b),
        answer.clone(),
        format!("共通因数 {common}{var} でくくります。答えは {answer}。"),
      ))
    }
    Difficulty::Advanced => {
      let letter = ctx.pick(&["a", "b", "c"]);
      let p1 = ctx.int(2, 5);
      let p2 = ctx.int(2, 5);
      let answer = format!("{letter}(x^{p1}+y^{p2})");
      Ok(Problem::new(
        format!("{letter}x^{p1} + {letter}y^{p2} を因数分解しなさい。"),
        answer.clone(),
        format!("共通因数 {letter} でくくります。答えは {answer}。"),
      ))
    }
  }
}

fn factorization_formula(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let a = ctx.int(2, 9);
  match d {
    Difficulty::Basic => {
      let s = ctx.sign();
      let answer = format!("(x{:+})^2", s * a);
      let rule = if s > 0 { "a^2+2ab+b^2 = (a+b)^2" } else { "a^2-2ab+b^2 = (a-b)^2" };
      Ok(Problem::new(
        format!("{} を因数分解しなさい。", poly_text(&[(1, "x^2"), (2 * s * a, "x"), (a * a, "")])),
        answer.clone(),
        format!("公式 {rule} を使います。答えは {answer}。"),
      ))
    }
    Difficulty::Standard => {
      let answer = factor_answer(vec![format!("(x+{a})"), format!("(x-{a})")]);
      Ok(Problem::new(
        format!("x^2 - {} を因数分解しなさい。", a * a),
        answer,
        format!("公式 a^2-b^2 = (a+b)(a-b) を使います。答えは (x+{a})(x-{a})。"),
      ))
    }
    Difficulty::Advanced => {
      let k = ctx.int(2, 4);
      let m = ctx.int(2, 5);
      let (p1, p2) = (format!("({k}x+{m}y)"), format!("({k}x-{m}y)"));
      let answer = factor_answer(vec![p1.clone(), p2.clone()]);
      Ok(Problem::new(
        format!("{}x^2 - {}y^2 を因数分解しなさい。", k * k, m * m),
        answer,
        format!("公式 a^2-b^2 = (a+b)(a-b) を使います。この場合 a={k}x, b={m}y です。答えは {p1}{p2}。"),
      ))
    }
  }
}

fn square_roots_simplify(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let n = ctx.int(2, 12);
      Ok(Problem::new(
        format!("√{} を計算しなさい。", n * n),
        n.to_string(),
        format!("√{} は2乗すると{}になる正の数なので、答えは {n} です。", n * n, n * n),
      ))
    }
    Difficulty::Standard => {
      let inside = ctx.pick(&[2, 3, 5, 6, 7]);
      let outside = ctx.int(2, 5);
      let n = outside * outside * inside;
      let answer = format!("{outside}√{inside}");
      Ok(Problem::new(
        format!("√{n} を簡単にしなさい。(a√bの形で)"),
        answer.clone(),
        format!("{n}を素因数分解すると {outside}^2 × {inside} となります。√の外に出せるのは{outside}です。答えは {answer}。"),
      ))
    }
    Difficulty::Advanced => {
      let num = ctx.int(2, 7);
      // 4 would rationalize to a whole number
      let den = ctx.int_excl(2, 7, &[num, 4]);
      let g = gcd(num, den);
      let (s_num, s_den) = (num / g, den / g);
      let numerator = root_term(s_num, den as u64);
      let answer = if s_den == 1 { numerator } else { format!("{numerator}/{s_den}") };
      Ok(Problem::new(
        format!("{num}/√{den} の分母を有理化しなさい。"),
        answer.clone(),
        format!("分母と分子に√{den}を掛けます。({num}×√{den})/(√{den}×√{den}) = {num}√{den}/{den}。約分して {answer}。"),
      ))
    }
  }
}

fn square_roots_calculation(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let a = ctx.int(2, 7);
      let b = ctx.int_excl(2, 7, &[a]);
      let answer = sqrt_string(1, (a * b) as u64);
      Ok(Problem::new(
        format!("√{a} × √{b} = ?"),
        answer.clone(),
        format!("√a × √b = √(ab) です。√({a} × {b}) = √{}。これを簡単にして {answer} となります。", a * b),
      ))
    }
    Difficulty::Standard => {
      let a = ctx.int(1, 5);
      let b = ctx.int(1, 5);
      let c = ctx.pick(&[2u64, 3, 5, 7]);
      if ctx.coin() {
        let answer = root_term(a + b, c);
        Ok(Problem::new(
          format!("{} + {} = ?", root_term(a, c), root_term(b, c)),
          answer.clone(),
          format!("√の中が同じなので、係数を足し算します。({a}+{b})√{c} = {answer}。"),
        ))
      } else {
        let (big, small) = (a.max(b), a.min(b));
        let answer = root_term(big - small, c);
        Ok(Problem::new(
          format!("{} - {} = ?", root_term(big, c), root_term(small, c)),
          answer.clone(),
          format!("√の中が同じなので、係数を引き算します。({big}-{small})√{c} = {answer}。"),
        ))
      }
    }
    Difficulty::Advanced => {
      let root = ctx.pick(&[2i64, 3, 5]);
      let c1 = ctx.int(1, 3);
      let c2 = ctx.int(2, 4);
      let c3 = ctx.int_excl(2, 4, &[c2]);
      let (n2, n3) = (c2 * c2 * root, c3 * c3 * root);
      let answer = root_term(c1 + c2 - c3, root as u64);
      Ok(Problem::new(
        format!("{} + √{n2} - √{n3} = ?", root_term(c1, root as u64)),
        answer.clone(),
        format!(
          "まず√を簡単にします。√{n2}={c2}√{root}, √{n3}={c3}√{root}。係数を計算して({c1}+{c2}-{c3})√{root} = {answer}。"
        ),
      ))
    }
  }
}

fn quadratic_factorization(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let r1 = ctx.int(1, 5);
      let r2 = ctx.int(-5, -1);
      let answer = roots_answer(vec![Fraction::whole(r1), Fraction::whole(r2)]);
      Ok(Problem::new(
        format!("二次方程式 {} = 0 を解きなさい。(例: x=2,3)", poly_text(&[(1, "x^2"), (-(r1 + r2), "x"), (r1 * r2, "")])),
        answer.clone(),
        format!("因数分解すると {}{} = 0 となります。したがって、解は x = {r1} と x = {r2} です。", root_group(-r1), root_group(-r2)),
      ))
    }
    Difficulty::Standard => {
      let root = ctx.int(2, 9) * ctx.sign();
      let answer = roots_answer(vec![Fraction::whole(0), Fraction::whole(root)]);
      Ok(Problem::new(
        format!("{} = 0 を解きなさい。(例: x=0,2)", poly_text(&[(1, "x^2"), (-root, "x")])),
        answer.clone(),
        format!("共通因数xでくくると x{} = 0 となります。したがって、解は x=0 と x={root} です。", root_group(-root)),
      ))
    }
    Difficulty::Advanced => {
      // (a·x + p)(x + q) = 0
      let (a, p, q) = ctx.resample("m3_quadratic_equations_factorization", |ctx| {
        let a = ctx.int(2, 3);
        let p = ctx.int(1, 5) * ctx.sign();
        let q = ctx.int(1, 5) * ctx.sign();
        let distinct = Fraction::new(-p, a) != Fraction::whole(-q);
        (a * q + p != 0 && distinct).then_some((a, p, q))
      })?;
      let r1 = Fraction::new(-p, a);
      let answer = roots_answer(vec![r1, Fraction::whole(-q)]);
      Ok(Problem::new(
        format!("{} = 0 を解きなさい。(例: x=2,3/2)", poly_text(&[(a, "x^2"), (a * q + p, "x"), (p * q, "")])),
        answer.clone(),
        format!(
          "因数分解すると ({})(x{:+}) = 0。解は x={r1} と x={} です。",
          poly_text(&[(a, "x"), (p, "")]).replace(' ', ""),
          q,
          -q
        ),
      ))
    }
  }
}

/// Coefficient triples for the tier, restricted to rational roots.
fn formula_draws(d: Difficulty) -> Vec<(i64, i64, i64)> {
  let nonzero = |lo: i64, hi: i64| (lo..=hi).filter(|v| *v != 0).collect::<Vec<_>>();
  let mut out = Vec::new();
  match d {
    Difficulty::Basic => {
      for b in nonzero(-7, 7) {
        for c in nonzero(-10, 10) {
          out.push((1, b, c));
        }
      }
    }
    Difficulty::Standard => {
      for a in [2, 3] {
        for b in nonzero(-9, 9) {
          for c in nonzero(-9, 9) {
            out.push((a, b, c));
          }
        }
      }
    }
    Difficulty::Advanced => {
      for a in 1..=4 {
        for k in 1..=5 {
          out.push((a, 2 * a * k, a * k * k));
          out.push((a, -2 * a * k, a * k * k));
        }
      }
    }
  }
  out.retain(|&(a, b, c)| perfect_square_root(b * b - 4 * a * c).is_some());
  out
}

fn perfect_square_root(n: i64) -> Option<i64> {
  if n < 0 {
    return None;
  }
  let r = (n as f64).sqrt().round() as i64;
  (r * r == n).then_some(r)
}

fn quadratic_formula(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  // Irrational-root draws are discarded up front; picking uniformly from the
  // survivors matches redrawing until one is rational.
  let (a, b, c) = ctx.pick(&formula_draws(d));
  let disc = b * b - 4 * a * c;
  let s = perfect_square_root(disc).unwrap_or(0);
  let answer = roots_answer(vec![Fraction::new(-b + s, 2 * a), Fraction::new(-b - s, 2 * a)]);
  let note = if disc == 0 { "判別式D=b^2-4ac=0なので、解は1つ(重解)です。" } else { "" };
  Ok(Problem::new(
    format!(
      "二次方程式 {} = 0 を解の公式を使って解きなさい。(例: x=2,3)",
      poly_text(&[(a, "x^2"), (b, "x"), (c, "")])
    ),
    answer.clone(),
    format!("解の公式 x = (-b ± √(b^2-4ac))/2a を使います。b^2-4ac = {disc}。{note}答えは {answer} です。"),
  ))
}

fn pythagorean_theorem(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  const TEXT: &str = "図の直角三角形について、xの長さを求めなさい。";
  match d {
    Difficulty::Basic => {
      let (a, b, c) = ctx.pick(&[(3, 4, 5), (5, 12, 13)]);
      Ok(
        Problem::new(
          TEXT,
          c.to_string(),
          format!("三平方の定理 a^2 + b^2 = c^2 より、x^2 = {a}^2 + {b}^2 = {}。よって x = {c}。", a * a + b * b),
        )
        .with_figure(figure::right_triangle(a as f64, b as f64, &a.to_string(), &b.to_string(), "x")),
      )
    }
    Difficulty::Standard => {
      let m = ctx.int(1, 2);
      let (a, b, c) = ctx.pick(&[(8, 15, 17), (7, 24, 25)]);
      let (a, b, c) = (a * m, b * m, c * m);
      if ctx.coin() {
        Ok(
          Problem::new(
            TEXT,
            a.to_string(),
            format!("三平方の定理 a^2 + b^2 = c^2 より、x^2 + {b}^2 = {c}^2。 x^2 = {}。よって x = {a}。", c * c - b * b),
          )
          .with_figure(figure::right_triangle(b as f64, a as f64, &b.to_string(), "x", &c.to_string())),
        )
      } else {
        Ok(
          Problem::new(
            TEXT,
            b.to_string(),
            format!("三平方の定理 a^2 + b^2 = c^2 より、{a}^2 + x^2 = {c}^2。 x^2 = {}。よって x = {b}。", c * c - a * a),
          )
          .with_figure(figure::right_triangle(a as f64, b as f64, &a.to_string(), "x", &c.to_string())),
        )
      }
    }
    Difficulty::Advanced => {
      // perfect squares would show as "√4"
      let s1 = ctx.int_excl(2, 11, &[4, 9]);
      let s2 = ctx.int_excl(2, 11, &[s1, 4, 9]);
      let (l1, l2) = ((s1 as f64).sqrt(), (s2 as f64).sqrt());
      if ctx.coin() {
        let sum = s1 + s2;
        let answer = sqrt_string(1, sum as u64);
        Ok(
          Problem::new(
            TEXT,
            answer.clone(),
            format!("三平方の定理 a^2 + b^2 = c^2 より、x^2 = (√{s1})^2 + (√{s2})^2 = {s1} + {s2} = {sum}。よって x = {answer}。"),
          )
          .with_figure(figure::right_triangle(l1, l2, &format!("√{s1}"), &format!("√{s2}"), "x")),
        )
      } else {
        let hyp = s1 + s2;
        let hyp_label = sqrt_string(1, hyp as u64);
        let answer = sqrt_string(1, s2 as u64);
        Ok(
          Problem::new(
            TEXT,
            answer.clone(),
            format!("三平方の定理 a^2 + b^2 = c^2 より、(√{s1})^2 + x^2 = ({hyp_label})^2。x^2 = {hyp}-{s1} = {s2}。よって x = {answer}。"),
          )
          .with_figure(figure::right_triangle(l1, l2, &format!("√{s1}"), "x", &hyp_label)),
        )
      }
    }
  }
}
