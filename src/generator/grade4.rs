//! 小4: column arithmetic, division with remainder, fraction comparison,
//! rounding, unit conversion and rectangle area.

use super::{GenContext, Problem, TopicFn};
use crate::domain::Difficulty;
use crate::error::GenerateError;
use crate::figure;
use crate::util::scaled;

pub(super) fn lookup(topic_id: &str) -> Option<TopicFn> {
  let f: TopicFn = match topic_id {
    "g4_addition_subtraction" => addition_subtraction,
    "g4_multiplication" => multiplication,
    "g4_division" => division,
    "g4_fractions_intro" => fractions_intro,
    "g4_rounding" => rounding,
    "g4_unit_conversion" => unit_conversion,
    "g4_rectangle_area" => rectangle_area,
    _ => return None,
  };
  Some(f)
}

/// Operands whose column digits never sum past 9.
fn no_carry_pair(ctx: &mut GenContext<'_>, digits: u32) -> (i64, i64) {
  let (mut a, mut b) = (0, 0);
  for i in 0..digits {
    let place = 10i64.pow(i);
    let d1 = ctx.int(1, 8);
    let d2 = ctx.int(1, 9 - d1);
    a += d1 * place;
    b += d2 * place;
  }
  (a, b)
}

/// `(large, small)` where every column of `large` exceeds the one in `small`.
fn no_borrow_pair(ctx: &mut GenContext<'_>, digits: u32) -> (i64, i64) {
  let (mut a, mut b) = (0, 0);
  for i in 0..digits {
    let place = 10i64.pow(i);
    let d2 = ctx.int(1, 8);
    let d1 = ctx.int(d2 + 1, 9);
    a += d1 * place;
    b += d2 * place;
  }
  (a, b)
}

fn ordered_pair(ctx: &mut GenContext<'_>, min: i64, max: i64) -> (i64, i64) {
  let (n1, n2) = (ctx.int(min, max), ctx.int(min, max));
  (n1.max(n2), n1.min(n2))
}

fn addition_subtraction(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  if ctx.coin() {
    let ((a, b), lead) = match d {
      Difficulty::Basic => (no_carry_pair(ctx, 3), "基礎：繰り上がりのない足し算です。"),
      Difficulty::Standard => ((ctx.int(100, 999), ctx.int(100, 999)), "標準：繰り上がりのある足し算です。"),
      Difficulty::Advanced => (
        (ctx.int(1000, 9999), ctx.int(1000, 9999)),
        "発展：桁数が多く、複数回繰り上がる可能性がある足し算です。",
      ),
    };
    let answer = a + b;
    Ok(Problem::new(
      format!("{a} + {b} = ?"),
      answer.to_string(),
      format!("{lead}{a} + {b} を筆算で計算します。答えは {answer} です。"),
    ))
  } else {
    let ((large, small), lead) = match d {
      Difficulty::Basic => (no_borrow_pair(ctx, 3), "基礎：繰り下がりのない引き算です。"),
      Difficulty::Standard => (ordered_pair(ctx, 100, 999), "標準：繰り下がりのある引き算です。"),
      Difficulty::Advanced => (
        ordered_pair(ctx, 1000, 9999),
        "発展：桁数が多く、複数回繰り下がる可能性がある引き算です。",
      ),
    };
    let answer = large - small;
    Ok(Problem::new(
      format!("{large} - {small} = ?"),
      answer.to_string(),
      format!("{lead}{large} - {small} を筆算で計算します。答えは {answer} です。"),
    ))
  }
}

fn multiplication(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let (a, b, lead) = match d {
    Difficulty::Basic => {
      let (d1, d2, e1, e2) = (ctx.int(1, 4), ctx.int(0, 4), ctx.int(1, 4), ctx.int(0, 4));
      let (a, b) = if d2 * e2 > 9 || d1 * e2 + d2 * e1 > 9 {
        (ctx.pick(&[12, 13, 21, 23, 31, 32]), ctx.pick(&[11, 12, 21]))
      } else {
        (d1 * 10 + d2, e1 * 10 + e2)
      };
      (a, b, "基礎：繰り上がりが少ない、またはないかけ算です。")
    }
    Difficulty::Standard => (ctx.int(10, 99), ctx.int(10, 99), "標準：繰り上がりのあるかけ算です。"),
    Difficulty::Advanced => (ctx.int(50, 99), ctx.int(50, 99), "発展：数が大きいかけ算です。"),
  };
  let answer = a * b;
  Ok(Problem::new(
    format!("{a} × {b} = ?"),
    answer.to_string(),
    format!("{lead}{a} × {b} を筆算で計算します。答えは {answer} です。"),
  ))
}

fn division(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let divisor = ctx.int(2, 9);
      let quotient = ctx.int(10, 99 / divisor);
      let dividend = divisor * quotient;
      Ok(Problem::new(
        format!("{dividend} ÷ {divisor} = ?"),
        quotient.to_string(),
        format!("基礎：余りのないわり算です。答えは {quotient} です。"),
      ))
    }
    Difficulty::Standard => {
      let divisor = ctx.int(6, 9);
      let multiples: Vec<i64> = (20..=99).filter(|n| n % divisor == 0).collect();
      let dividend = ctx.int_excl(20, 99, &multiples);
      let (quotient, remainder) = (dividend / divisor, dividend % divisor);
      Ok(Problem::new(
        format!("{dividend} ÷ {divisor} の商と余りを求めなさい。(例: 15r5)"),
        format!("{quotient}r{remainder}"),
        format!("標準：余りのあるわり算です。{dividend} ÷ {divisor}は、商が{quotient}で余りが{remainder}になります。"),
      ))
    }
    Difficulty::Advanced => {
      let divisor = ctx.int(4, 9);
      let quotient = ctx.int(11, 199 / divisor);
      let dividend = divisor * quotient;
      Ok(Problem::new(
        format!("{dividend} ÷ {divisor} = ?"),
        quotient.to_string(),
        format!("発展：割られる数が3桁のわり算です。筆算で計算すると答えは {quotient} です。"),
      ))
    }
  }
}

/// The larger of `n1/d1` and `n2/d2`, written as given.
fn larger(n1: i64, d1: i64, n2: i64, d2: i64) -> String {
  if n1 * d2 > n2 * d1 { format!("{n1}/{d1}") } else { format!("{n2}/{d2}") }
}

fn compare_text(n1: i64, d1: i64, n2: i64, d2: i64) -> String {
  format!("{n1}/{d1} と {n2}/{d2} のうち、大きい方の分数を答えなさい。")
}

fn fractions_intro(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let den = ctx.int(3, 10);
      let n1 = ctx.int(1, den - 1);
      let n2 = ctx.int_excl(1, den - 1, &[n1]);
      let answer = larger(n1, den, n2, den);
      Ok(Problem::new(
        compare_text(n1, den, n2, den),
        answer.clone(),
        format!("基礎：分母が同じ分数は、分子が大きい方が大きくなります。したがって、{answer}が大きいです。"),
      ))
    }
    Difficulty::Standard => {
      let n2 = ctx.int_excl(1, 3, &[2]);
      let answer = larger(1, 2, n2, 4);
      Ok(Problem::new(
        compare_text(1, 2, n2, 4),
        answer.clone(),
        format!("標準：分母が違うので通分して比べます。1/2は2/4なので、{answer}の方が大きいです。"),
      ))
    }
    Difficulty::Advanced => {
      let (d1, d2) = ctx.pick(&[(6, 12), (9, 12), (8, 6)]);
      let n1 = ctx.int(1, d1 - 1);
      // An equal pair has no larger member.
      let ties: Vec<i64> = (1..d2).filter(|n2| n1 * d2 == n2 * d1).collect();
      let n2 = ctx.int_excl(1, d2 - 1, &ties);
      let answer = larger(n1, d1, n2, d2);
      let common = crate::numeric::lcm(d1, d2);
      Ok(Problem::new(
        compare_text(n1, d1, n2, d2),
        answer.clone(),
        format!(
          "発展：分母が違うので通分して比べます。{n1}/{d1} = {}/{common}、{n2}/{d2} = {}/{common} なので、答えは{answer}です。",
          n1 * (common / d1),
          n2 * (common / d2)
        ),
      ))
    }
  }
}

/// Half-up rounding of a non-negative integer to a multiple of `unit`.
fn round_to(n: i64, unit: i64) -> i64 {
  (n + unit / 2) / unit * unit
}

fn rounding(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let num = ctx.int(100, 999);
      let answer = round_to(num, 10);
      Ok(Problem::new(
        format!("{num}を十の位までの概数（一の位を四捨五入）にしなさい。"),
        answer.to_string(),
        format!("{num}の一の位は{}です。これを四捨五入すると、答えは{answer}になります。", num % 10),
      ))
    }
    Difficulty::Standard => {
      let (num, unit, place, dropped) = if ctx.coin() {
        (ctx.int(1000, 9999), 100, "百", "十")
      } else {
        (ctx.int(10000, 99999), 1000, "千", "百")
      };
      let answer = round_to(num, unit);
      Ok(Problem::new(
        format!("{num}を{place}の位までの概数（{dropped}の位を四捨五入）にしなさい。"),
        answer.to_string(),
        format!("{place}の位までの概数なので、{dropped}の位を四捨五入します。答えは{answer}です。"),
      ))
    }
    Difficulty::Advanced => {
      let (a, b) = (ctx.int(100, 999), ctx.int(100, 999));
      let (ra, rb) = (round_to(a, 100), round_to(b, 100));
      let answer = ra + rb;
      Ok(Problem::new(
        format!("{a} + {b} の計算を、百の位までの概数にしてから答えなさい。"),
        answer.to_string(),
        format!(
          "発展：まずそれぞれの数を百の位までの概数にします。{a}は約{ra}、{b}は約{rb}になります。{ra} + {rb} = {answer}。"
        ),
      ))
    }
  }
}

fn unit_conversion(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      if ctx.coin() {
        let m = ctx.int(2, 9);
        let answer = m * 100;
        Ok(Problem::new(
          format!("{m}m は何cmですか？"),
          answer.to_string(),
          format!("1mは100cmなので、{m}mは{answer}cmです。"),
        ))
      } else {
        let cm = ctx.int(2, 9) * 100 + ctx.int(1, 9) * 10;
        let (m, rest) = (cm / 100, cm % 100);
        Ok(Problem::new(
          format!("{cm}cm は何m何cmですか？(例: 2,50)"),
          format!("{m},{rest}"),
          format!("100cmが1mです。{cm}cmは{m}m{rest}cmです。"),
        ))
      }
    }
    Difficulty::Standard => {
      let (big, small) = ctx.pick(&[("kg", "g"), ("L", "mL")]);
      let val = ctx.int(1, 4) * 1000 + ctx.int(1, 9) * 100;
      let (whole, rest) = (val / 1000, val % 1000);
      Ok(Problem::new(
        format!("{val}{small} は何{big}何{small}ですか？(例: 1,500)"),
        format!("{whole},{rest}"),
        format!("1{big}は1000{small}です。答えは{whole}{big}{rest}{small}です。"),
      ))
    }
    Difficulty::Advanced => {
      let (from, to, factor) = ctx.pick(&[("m", "cm", 100), ("kg", "g", 1000)]);
      let tenths = ctx.int(11, 49);
      let val = scaled(tenths, 1);
      let answer = tenths * factor / 10;
      Ok(Problem::new(
        format!("{val}{from} は何{to}ですか？"),
        answer.to_string(),
        format!("発展：小数でも同じように計算します。1{from}は{factor}{to}なので、{val}×{factor}={answer}{to}。"),
      ))
    }
  }
}

fn rectangle_area(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let problem = match d {
    Difficulty::Basic => {
      let width = ctx.int(2, 12);
      let height = ctx.int_excl(2, 12, &[width]);
      let answer = width * height;
      Problem::new(
        format!("たて{height}cm, よこ{width}cmの長方形の面積を求めなさい。(単位はcm²)"),
        answer.to_string(),
        format!("長方形の面積 = たて × よこ。 {height} × {width} = {answer}cm²。"),
      )
      .with_figure(figure::rectangle(width as f64, height as f64, &format!("{width}cm"), &format!("{height}cm")))
    }
    Difficulty::Standard if ctx.coin() => {
      let (width, height) = (ctx.int(10, 25), ctx.int(5, 15));
      let answer = width * height;
      Problem::new(
        format!("たて{height}cm, よこ{width}cmの長方形の面積を求めなさい。(単位はcm²)"),
        answer.to_string(),
        format!("長方形の面積 = たて × よこ。 {height} × {width} = {answer}cm²。"),
      )
      .with_figure(figure::rectangle(width as f64, height as f64, &format!("{width}cm"), &format!("{height}cm")))
    }
    Difficulty::Standard => {
      let width_tenths = ctx.int(15, 50);
      let height = ctx.int(2, 10);
      let width = scaled(width_tenths, 1);
      let answer = scaled(width_tenths * height, 1);
      Problem::new(
        format!("たて{height}m, よこ{width}mの長方形の面積を求めなさい。(単位はm²)"),
        answer.clone(),
        format!("小数でも同様に計算します。 {height} × {width} = {answer}m²。"),
      )
      .with_figure(figure::rectangle(width_tenths as f64 / 10.0, height as f64, &format!("{width}m"), &format!("{height}m")))
    }
    Difficulty::Advanced => {
      let width = ctx.int(2, 5);
      let height_cm = ctx.int(200, 500);
      let height_m = scaled(height_cm, 2);
      let answer = scaled(width * height_cm, 2);
      Problem::new(
        format!("たて{height_cm}cm, よこ{width}mの長方形の面積を求めなさい。(単位はm²)"),
        answer.clone(),
        format!(
          "発展：単位を揃えてから計算します。{height_cm}cmは{height_m}mです。面積 = {height_m}m × {width}m = {answer}m²。"
        ),
      )
      .with_figure(figure::rectangle(width as f64, height_cm as f64 / 100.0, &format!("{width}m"), &format!("{height_cm}cm")))
    }
  };
  Ok(problem)
}
