//! 小5: decimal multiplication and division, same-denominator fractions,
//! common denominators, percentages, lcm/gcd and triangle area.

use super::{GenContext, Problem, TopicFn};
use crate::domain::Difficulty;
use crate::error::GenerateError;
use crate::figure::{self, Apex};
use crate::numeric::{gcd, lcm, Fraction};
use crate::util::scaled;

pub(super) fn lookup(topic_id: &str) -> Option<TopicFn> {
  let f: TopicFn = match topic_id {
    "g5_decimals_multiplication" => decimals_multiplication,
    "g5_decimals_division" => decimals_division,
    "g5_fractions_simplify" => fractions_simplify,
    "g5_fractions_common_denominator" => fractions_common_denominator,
    "g5_fractions_addition" => fractions_addition,
    "g5_fractions_subtraction" => fractions_subtraction,
    "g5_percentages" => percentages,
    "g5_common_multiples" => common_multiples,
    "g5_common_divisors" => common_divisors,
    "g5_triangle_area" => triangle_area,
    _ => return None,
  };
  Some(f)
}

// Decimal operands are drawn as scaled integers: (value, decimal places).

fn decimals_multiplication(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let ((a, a_dp), (b, b_dp), lead) = match d {
    Difficulty::Basic => ((ctx.int(11, 49), 1), (ctx.int(2, 9), 0), "基礎：小数×整数の計算です。"),
    Difficulty::Standard => ((ctx.int(1, 99), 1), (ctx.int(1, 9), 1), "標準：小数×小数の計算です。"),
    Difficulty::Advanced => ((ctx.int(101, 999), 2), (ctx.int(1, 99), 1), "発展：桁数の大きい小数のかけ算です。"),
  };
  let answer = scaled(a * b, a_dp + b_dp);
  Ok(Problem::new(
    format!("{} × {} = ?", scaled(a, a_dp), scaled(b, b_dp)),
    answer.clone(),
    format!("{lead}整数と同じように計算し、小数点の位置を調整します。答えは {answer} です。"),
  ))
}

fn decimals_division(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let divisor = ctx.int(2, 9);
      let quotient = ctx.int(2, 20);
      Ok(Problem::new(
        format!("{} ÷ {} = ?", scaled(divisor * quotient, 1), scaled(divisor, 1)),
        quotient.to_string(),
        format!("基礎：整数÷小数の計算です。小数点の位置をずらして整数で計算します。答えは {quotient} です。"),
      ))
    }
    Difficulty::Standard => {
      let divisor = ctx.int(2, 9);
      let quotient = ctx.int(2, 20);
      let answer = scaled(quotient, 1);
      Ok(Problem::new(
        format!("{} ÷ {divisor} = ?", scaled(divisor * quotient, 1)),
        answer.clone(),
        format!("標準：小数÷整数の計算です。答えは {answer} です。"),
      ))
    }
    Difficulty::Advanced => {
      let divisor = ctx.int(2, 50);
      let quotient = ctx.int(2, 20);
      Ok(Problem::new(
        format!("{} ÷ {} = ?", scaled(divisor * quotient, 2), scaled(divisor, 2)),
        quotient.to_string(),
        format!("発展：小数÷小数の計算です。小数点の位置をずらして整数で計算します。答えは {quotient} です。"),
      ))
    }
  }
}

fn fractions_simplify(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let (common, num, den) = match d {
    Difficulty::Basic => {
      let common = ctx.int(2, 5);
      let num = ctx.int(1, 5);
      (common, num, ctx.int(num + 1, 9))
    }
    Difficulty::Standard => {
      let common = ctx.int(2, 9);
      let num = ctx.int(2, 9);
      (common, num, ctx.int(num + 1, 15))
    }
    Difficulty::Advanced => {
      let common = ctx.int(10, 25);
      let num = ctx.int(2, 9);
      (common, num, ctx.int(num + 1, 12))
    }
  };
  let (top, bottom) = (num * common, den * common);
  let g = gcd(top, bottom);
  let answer = Fraction::new(top, bottom).to_string();
  let lead = match d {
    Difficulty::Basic => format!("基礎：分子と分母を最大公約数である{g}で割ります。"),
    Difficulty::Standard => "標準：分子と分母の最大公約数を見つけて割ります。".to_string(),
    Difficulty::Advanced => format!("発展：数が大きいですが、同じように最大公約数{g}で割ります。"),
  };
  Ok(Problem::new(
    format!("{top}/{bottom} を約分しなさい。"),
    answer.clone(),
    format!("{lead}答えは {answer} です。"),
  ))
}

fn fractions_common_denominator(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let (d1, d2) = match d {
    Difficulty::Basic => {
      let d1 = ctx.int(2, 5);
      (d1, ctx.int_excl(3, 6, &[d1]))
    }
    Difficulty::Standard => {
      let d1 = ctx.int(4, 9);
      (d1, ctx.int_excl(6, 12, &[d1]))
    }
    Difficulty::Advanced => {
      let (b1, b2, b3) = (ctx.int(2, 4), ctx.int(2, 4), ctx.int(2, 4));
      let d1 = b1 * b2 * ctx.int(1, 2);
      let d2 = b2 * b3 * ctx.int(1, 2);
      (d1, if d1 == d2 { d2 + b1 } else { d2 })
    }
  };
  let n1 = ctx.int(1, d1 - 1);
  let n2 = ctx.int(1, d2 - 1);
  let common = lcm(d1, d2);
  let answer = format!("{}/{common},{}/{common}", n1 * (common / d1), n2 * (common / d2));
  Ok(Problem::new(
    format!("{n1}/{d1} と {n2}/{d2} を通分しなさい。(例: 3/4,5/6)"),
    answer.clone(),
    format!(
      "{d1}と{d2}の最小公倍数は{common}です。それぞれ分母が{common}になるように分子を調整します。答えは {answer} です。"
    ),
  ))
}

fn fractions_addition(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  if d == Difficulty::Advanced {
    let den = ctx.int(3, 9);
    let whole = ctx.int(1, 3);
    let n1 = ctx.int(1, den - 1);
    let n2 = ctx.int_excl(1, den - 1, &[den - n1]);
    let answer = Fraction::new(whole * den + n1 + n2, den).to_string();
    return Ok(Problem::new(
      format!("{whole}と{n1}/{den} + {n2}/{den} = ? (仮分数で答えなさい)"),
      answer.clone(),
      format!(
        "発展：帯分数を仮分数に直して計算します。{whole}と{n1}/{den} = {}/{den} なので、答えは {answer} です。",
        whole * den + n1
      ),
    ));
  }
  let den = if d == Difficulty::Basic { ctx.int(3, 9) } else { ctx.int(10, 20) };
  let n1 = ctx.int(1, den - 1);
  let n2 = ctx.int_excl(1, den - 1, &[den - n1]);
  let num = n1 + n2;
  let answer = Fraction::new(num, den).to_string();
  Ok(Problem::new(
    format!("{n1}/{den} + {n2}/{den} = ? (仮分数で答えなさい)"),
    answer.clone(),
    format!("分母が同じなので分子を足します。{n1}+{n2}={num}。{num}/{den}を約分して {answer}。"),
  ))
}

fn fractions_subtraction(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  if d == Difficulty::Advanced {
    let den = ctx.int(3, 9);
    let whole = ctx.int(2, 4);
    let n1 = ctx.int(1, den - 1);
    let n2 = ctx.int(1, den - 1);
    let answer = Fraction::new(whole * den + n1 - n2, den).to_string();
    return Ok(Problem::new(
      format!("{whole}と{n1}/{den} - {n2}/{den} = ? (仮分数で答えなさい)"),
      answer.clone(),
      format!(
        "発展：帯分数を仮分数に直して計算します。{whole}と{n1}/{den} = {}/{den} なので、答えは {answer} です。",
        whole * den + n1
      ),
    ));
  }
  let den = if d == Difficulty::Basic { ctx.int(3, 9) } else { ctx.int(10, 20) };
  let (n1, n2) = (ctx.int(1, den - 1), ctx.int(1, den - 1));
  let (big, small) = (n1.max(n2), n1.min(n2));
  let num = big - small;
  let answer = Fraction::new(num, den).to_string();
  Ok(Problem::new(
    format!("{big}/{den} - {small}/{den} = ? (仮分数で答えなさい)"),
    answer.clone(),
    format!("分母が同じなので分子を引きます。{big}-{small}={num}。{num}/{den}を約分して {answer}。"),
  ))
}

fn percentages(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let total = ctx.int(1, 9) * 10;
      let pct = ctx.pick(&[10, 20, 25, 50, 75]);
      let answer = scaled(total * pct, 2);
      Ok(Problem::new(
        format!("{total} の {pct}% はいくらですか？"),
        answer.clone(),
        format!(
          "基礎：{total}に割合({pct}/100)をかけると計算できます。{total} × {} = {answer}。",
          scaled(pct, 2)
        ),
      ))
    }
    Difficulty::Standard => {
      let total_tenths = ctx.int(1, 49);
      let pct = ctx.int(1, 9) * 10;
      let total = scaled(total_tenths, 1);
      let answer = scaled(total_tenths * pct, 3);
      Ok(Problem::new(
        format!("{total} の {pct}% はいくらですか？"),
        answer.clone(),
        format!("標準：小数でも同じように計算します。{total} × {} = {answer}。", scaled(pct, 2)),
      ))
    }
    Difficulty::Advanced => {
      let pct = ctx.pick(&[10, 20, 25, 50]);
      let part = ctx.int(2, 9);
      let total = part * (100 / pct);
      Ok(Problem::new(
        format!("{part} は {total} の何%ですか？"),
        pct.to_string(),
        format!("発展：(部分 ÷ 全体) × 100 で百分率を求めます。({part} ÷ {total}) × 100 = {pct}%。"),
      ))
    }
  }
}

fn common_multiples(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic | Difficulty::Standard => {
      let (lo, hi) = if d == Difficulty::Basic { (3, 9) } else { (10, 25) };
      let n1 = ctx.int(lo, hi);
      let n2 = ctx.int_excl(lo, hi, &[n1]);
      let answer = lcm(n1, n2);
      let how = if d == Difficulty::Basic {
        format!("基礎：{n1}と{n2}の倍数をリストアップし、最初の共通のものを探します。")
      } else {
        "標準：数が大きくても同じように計算します。素因数分解を使うと便利です。".to_string()
      };
      Ok(Problem::new(format!("{n1}と{n2}の最小公倍数は？"), answer.to_string(), format!("{how}答えは{answer}です。")))
    }
    Difficulty::Advanced => {
      let n1 = ctx.int(4, 9);
      let n2 = ctx.int_excl(4, 9, &[n1]);
      let n3 = ctx.int_excl(4, 9, &[n1, n2]);
      let answer = lcm(lcm(n1, n2), n3);
      Ok(Problem::new(
        format!("{n1}, {n2}, {n3}の最小公倍数は？"),
        answer.to_string(),
        format!("発展：3つの数の最小公倍数を求めます。まず{n1}と{n2}の最小公倍数{}を求め、それと{n3}の最小公倍数を求めます。答えは{answer}です。", lcm(n1, n2)),
      ))
    }
  }
}

fn common_divisors(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic | Difficulty::Standard => {
      let (common, hi) = if d == Difficulty::Basic { (ctx.int(2, 5), 5) } else { (ctx.int(3, 8), 8) };
      let k1 = ctx.int(2, hi);
      let k2 = ctx.int_excl(2, hi, &[k1]);
      let (n1, n2) = (common * k1, common * k2);
      let answer = gcd(n1, n2);
      let how = if d == Difficulty::Basic {
        format!("基礎：{n1}と{n2}の約数をリストアップし、最大のものを探します。")
      } else {
        "標準：数が大きくても同じように計算します。素因数分解を使うと便利です。".to_string()
      };
      Ok(Problem::new(format!("{n1}と{n2}の最大公約数は？"), answer.to_string(), format!("{how}答えは{answer}です。")))
    }
    Difficulty::Advanced => {
      let common = ctx.int(2, 6);
      let k1 = ctx.int(2, 4);
      let k2 = ctx.int_excl(2, 4, &[k1]);
      let k3 = ctx.int_excl(2, 4, &[k1, k2]);
      let (n1, n2, n3) = (common * k1, common * k2, common * k3);
      let answer = gcd(gcd(n1, n2), n3);
      Ok(Problem::new(
        format!("{n1}, {n2}, {n3}の最大公約数は？"),
        answer.to_string(),
        format!("発展：3つの数の最大公約数を求めます。答えは{answer}です。"),
      ))
    }
  }
}

fn triangle_area(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  if d == Difficulty::Advanced {
    let rect_w = ctx.int(10, 20);
    let rect_h = ctx.int(10, 20);
    let base = ctx.int(5, rect_w - 2);
    let answer = scaled(base * rect_h * 5, 1);
    let base_px = base as f64 * 140.0 / rect_w.max(rect_h) as f64;
    let split = ctx.int(1, base_px as i64 - 1);
    return Ok(
      Problem::new(
        format!("たて{rect_h}cm, よこ{rect_w}cmの長方形の中に、図のように三角形があります。この三角形の面積を求めなさい。"),
        answer.clone(),
        format!(
          "発展：図から三角形の底辺と高さを読み取ります。底辺={base}cm, 高さ={rect_h}cm。面積は {base}×{rect_h}÷2 = {answer}cm²。"
        ),
      )
      .with_figure(figure::triangle_in_rectangle(
        rect_w as f64,
        rect_h as f64,
        base as f64,
        split as f64,
        &format!("{rect_w}cm"),
        &format!("{rect_h}cm"),
        &format!("{base}cm"),
      )),
    );
  }

  let (base_scaled, base_dp) = if d == Difficulty::Basic { (ctx.int(4, 20), 0) } else { (ctx.int(5, 50), 1) };
  let height = ctx.int(4, 20);
  let base = scaled(base_scaled, base_dp);
  // base × height ÷ 2, kept exact by working in one more decimal place
  let answer = scaled(base_scaled * height * 5, base_dp + 1);
  let lead = if d == Difficulty::Basic { "基礎：三角形の面積 = 底辺 × 高さ ÷ 2。" } else { "標準：底辺が小数でも同じように計算します。" };

  let base_f = base_scaled as f64 / 10f64.powi(base_dp as i32);
  let apex = if ctx.coin() {
    Apex::Right
  } else {
    let base_px = base_f * 140.0 / base_f.max(height as f64);
    Apex::Skewed(ctx.int((base_px * 0.2).ceil() as i64, (base_px * 0.8).floor() as i64) as f64)
  };
  Ok(
    Problem::new(
      format!("図の三角形の面積を求めなさい。(底辺{base}cm, 高さ{height}cm)"),
      answer.clone(),
      format!("{lead} {base} × {height} ÷ 2 = {answer}cm²。"),
    )
    .with_figure(figure::triangle(base_f, height as f64, apex, &format!("{base}cm"), &format!("{height}cm"))),
  )
}

#[cfg(test)]
mod tests {
  use super::super::testkit::forced;
  use super::*;
  use crate::normalizer::answers_match;

  #[test]
  fn decimal_products_are_exact() {
    // 2.3 × 0.7
    let p = forced("g5_decimals_multiplication", Difficulty::Standard, &[23, 7], &[]);
    assert_eq!(p.text, "2.3 × 0.7 = ?");
    assert_eq!(p.answer, "1.61");
    let p = forced("g5_decimals_multiplication", Difficulty::Advanced, &[125, 40], &[]);
    assert_eq!(p.text, "1.25 × 4 = ?");
    assert_eq!(p.answer, "5");
  }

  #[test]
  fn decimal_division_texts() {
    let p = forced("g5_decimals_division", Difficulty::Basic, &[4, 12], &[]);
    assert_eq!(p.text, "4.8 ÷ 0.4 = ?");
    assert_eq!(p.answer, "12");
    let p = forced("g5_decimals_division", Difficulty::Advanced, &[25, 3], &[]);
    assert_eq!(p.text, "0.75 ÷ 0.25 = ?");
  }

  #[test]
  fn simplify_reduces_fully_even_when_the_drawn_pair_is_not_coprime() {
    // common 3, 2/4 drawn: 6/12 must reduce to 1/2
    let p = forced("g5_fractions_simplify", Difficulty::Basic, &[3, 2, 4], &[]);
    assert_eq!(p.text, "6/12 を約分しなさい。");
    assert_eq!(p.answer, "1/2");
    assert!(p.explanation.contains("最大公約数である6"));
  }

  #[test]
  fn common_denominator_answer_pair() {
    let p = forced("g5_fractions_common_denominator", Difficulty::Basic, &[4, 6, 3, 5], &[]);
    assert_eq!(p.answer, "9/12,10/12");
    assert!(answers_match("９／１２，１０／１２", &p.answer));
  }

  #[test]
  fn improper_sums() {
    let p = forced("g5_fractions_addition", Difficulty::Advanced, &[4, 1, 3, 2], &[]);
    assert_eq!(p.text, "1と3/4 + 2/4 = ? (仮分数で答えなさい)");
    assert_eq!(p.answer, "9/4");
  }

  #[test]
  fn percentage_of_decimal() {
    let p = forced("g5_percentages", Difficulty::Standard, &[25, 4], &[]);
    assert_eq!(p.text, "2.5 の 40% はいくらですか？");
    assert_eq!(p.answer, "1");
  }

  #[test]
  fn triangle_halves_stay_exact() {
    let p = forced("g5_triangle_area", Difficulty::Standard, &[75, 5], &[0.1]);
    assert_eq!(p.text, "図の三角形の面積を求めなさい。(底辺7.5cm, 高さ5cm)");
    assert_eq!(p.answer, "18.75");
    assert!(p.figure.is_some());
    let p = forced("g5_triangle_area", Difficulty::Basic, &[7, 5], &[0.1]);
    assert_eq!(p.answer, "17.5");
  }
}
