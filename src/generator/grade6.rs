//! 小6: fraction arithmetic with mixed numbers, speed/time/distance,
//! ratios, per-unit quantities and circle area.

use super::{GenContext, Problem, TopicFn};
use crate::domain::Difficulty;
use crate::error::GenerateError;
use crate::figure;
use crate::numeric::{gcd, lcm, round_div, Fraction};
use crate::util::scaled;

pub(super) fn lookup(topic_id: &str) -> Option<TopicFn> {
  let f: TopicFn = match topic_id {
    "g6_fractions_addition" => fractions_addition,
    "g6_fractions_subtraction" => fractions_subtraction,
    "g6_fractions_multiplication" => fractions_multiplication,
    "g6_fractions_division" => fractions_division,
    "g6_speed" => speed,
    "g6_time" => time,
    "g6_distance" => distance,
    "g6_ratios" => ratios,
    "g6_per_unit_quantity" => per_unit_quantity,
    "g6_circle_area" => circle_area,
    _ => return None,
  };
  Some(f)
}

/// A fraction operand as drawn: optional whole part plus a proper fraction.
#[derive(Clone, Copy)]
struct Operand {
  whole: i64,
  num: i64,
  den: i64,
}

impl Operand {
  fn proper(num: i64, den: i64) -> Self {
    Self { whole: 0, num, den }
  }

  fn value(&self) -> Fraction {
    Fraction::new(self.whole * self.den + self.num, self.den)
  }

  fn text(&self) -> String {
    if self.whole > 0 {
      format!("{}と{}/{}", self.whole, self.num, self.den)
    } else {
      format!("{}/{}", self.num, self.den)
    }
  }
}

fn draw_proper(ctx: &mut GenContext<'_>, den_min: i64, den_max: i64) -> Operand {
  let den = ctx.int(den_min, den_max);
  Operand::proper(ctx.int(1, den - 1), den)
}

/// Two operands with distinct denominators. Advanced draws mixed numbers,
/// the second whole part drawn by `whole2`.
fn draw_pair(
  ctx: &mut GenContext<'_>,
  d: Difficulty,
  whole1: (i64, i64),
  whole2: fn(&mut GenContext<'_>, i64) -> i64,
) -> (Operand, Operand) {
  match d {
    Difficulty::Basic => {
      let d1 = ctx.int(2, 5);
      let d2 = ctx.int(d1 + 1, 7);
      (Operand::proper(ctx.int(1, d1 - 1), d1), Operand::proper(ctx.int(1, d2 - 1), d2))
    }
    Difficulty::Standard => {
      let d1 = ctx.int(5, 12);
      let d2 = ctx.int_excl(5, 12, &[d1]);
      (Operand::proper(ctx.int(1, d1 - 1), d1), Operand::proper(ctx.int(1, d2 - 1), d2))
    }
    Difficulty::Advanced => {
      let w1 = ctx.int(whole1.0, whole1.1);
      let d1 = ctx.int(2, 5);
      let n1 = ctx.int(1, d1 - 1);
      let w2 = whole2(ctx, w1);
      let d2 = ctx.int_excl(2, 5, &[d1]);
      let n2 = ctx.int(1, d2 - 1);
      (Operand { whole: w1, num: n1, den: d1 }, Operand { whole: w2, num: n2, den: d2 })
    }
  }
}

fn fractions_addition(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let (a, b) = draw_pair(ctx, d, (1, 3), |ctx, _| ctx.int(1, 3));
  let common = lcm(a.den, b.den);
  let sum = a.value().add(b.value());
  let answer = sum.to_mixed_string();
  let explanation = match d {
    Difficulty::Basic => {
      let (x, y) = (a.num * (common / a.den), b.num * (common / b.den));
      format!(
        "基礎：通分して計算します。分母を{common}に揃えると、{x}/{common} + {y}/{common} = {}/{common}。答えは {answer}。",
        x + y
      )
    }
    Difficulty::Standard => format!("標準：分母が大きめの分数の足し算です。分母を{common}に揃えて計算します。答えは {answer}。"),
    Difficulty::Advanced => {
      format!("発展：帯分数を仮分数に直して計算します。{} + {} を通分して足し算すると、答えは {answer} となります。", a.value(), b.value())
    }
  };
  Ok(Problem::new(format!("{} + {} = ?", a.text(), b.text()), answer, explanation))
}

fn fractions_subtraction(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let (a, b) = ctx.resample("g6_fractions_subtraction", |ctx| {
    let (a, b) = draw_pair(ctx, d, (2, 4), |ctx, w1| ctx.int(1, w1 - 1));
    (a.value() != b.value()).then_some((a, b))
  })?;
  let (big, small) = if a.value() > b.value() { (a, b) } else { (b, a) };
  let answer = big.value().sub(small.value()).to_mixed_string();
  Ok(Problem::new(
    format!("{} - {} = ?", big.text(), small.text()),
    answer.clone(),
    format!(
      "{}と{}の最小公倍数{}で通分して引き算をします。大きい分数から小さい分数を引きます。答えは {answer}。",
      big.den,
      small.den,
      lcm(big.den, small.den)
    ),
  ))
}

fn fractions_multiplication(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let (a, b) = (draw_proper(ctx, 2, 5), draw_proper(ctx, 2, 5));
      let (num, den) = (a.num * b.num, a.den * b.den);
      let answer = Fraction::new(num, den).to_mixed_string();
      Ok(Problem::new(
        format!("{} × {} = ?", a.text(), b.text()),
        answer.clone(),
        format!("基礎：分子同士、分母同士をかけます。({}×{})/({}×{})={num}/{den}。約分して {answer}。", a.num, b.num, a.den, b.den),
      ))
    }
    Difficulty::Standard => {
      if ctx.coin() {
        let int = ctx.int(2, 5);
        let f = draw_proper(ctx, 2, 7);
        let answer = Fraction::new(int * f.num, f.den).to_mixed_string();
        Ok(Problem::new(
          format!("{int} × {} = ?", f.text()),
          answer.clone(),
          format!("標準：整数を分数と考えて計算します。({int}/1) × ({}) = {}/{}。答えは {answer}。", f.text(), int * f.num, f.den),
        ))
      } else {
        let whole = ctx.int(1, 2);
        let mut a = draw_proper(ctx, 2, 4);
        a.whole = whole;
        let b = draw_proper(ctx, 2, 4);
        let answer = a.value().mul(b.value()).to_mixed_string();
        Ok(Problem::new(
          format!("{} × {} = ?", a.text(), b.text()),
          answer.clone(),
          format!("標準：帯分数を仮分数に直して計算します。({}/{}) × ({})。答えは {answer}。", whole * a.den + a.num, a.den, b.text()),
        ))
      }
    }
    Difficulty::Advanced => {
      let common = ctx.int(2, 4);
      let n1 = ctx.int(2, 5) * common;
      let d1 = ctx.int(2, 5);
      let n2 = ctx.int(2, 5);
      let d2 = ctx.int(2, 5) * common;
      let answer = Fraction::new(n1 * n2, d1 * d2).to_mixed_string();
      Ok(Problem::new(
        format!("{n1}/{d1} × {n2}/{d2} = ?"),
        answer.clone(),
        format!("発展：かけ算の途中で約分すると計算が簡単になります。{n1}と{d2}は{common}で約分できます。答えは {answer}。"),
      ))
    }
  }
}

fn fractions_division(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let (a, b) = (draw_proper(ctx, 2, 5), draw_proper(ctx, 2, 5));
      let answer = a.value().div(b.value()).to_mixed_string();
      Ok(Problem::new(
        format!("{} ÷ {} = ?", a.text(), b.text()),
        answer.clone(),
        format!("基礎：わる数の分母と分子を入れ替えた逆数をかけます。{} × {}/{}。答えは {answer}。", a.text(), b.den, b.num),
      ))
    }
    Difficulty::Standard => {
      if ctx.coin() {
        let int = ctx.int(2, 5);
        let f = draw_proper(ctx, 2, 7);
        let answer = Fraction::new(int * f.den, f.num).to_mixed_string();
        Ok(Problem::new(
          format!("{int} ÷ {} = ?", f.text()),
          answer.clone(),
          format!("標準：わる数の逆数をかけます。{int} × {}/{}。答えは {answer}。", f.den, f.num),
        ))
      } else {
        let whole = ctx.int(1, 2);
        let mut a = draw_proper(ctx, 2, 4);
        a.whole = whole;
        let b = draw_proper(ctx, 2, 4);
        let answer = a.value().div(b.value()).to_mixed_string();
        Ok(Problem::new(
          format!("{} ÷ {} = ?", a.text(), b.text()),
          answer.clone(),
          format!("標準：帯分数を仮分数に直し、わる数の逆数をかけます。{} × {}/{}。答えは {answer}。", a.value(), b.den, b.num),
        ))
      }
    }
    Difficulty::Advanced => {
      let common = ctx.int(2, 4);
      let n1 = ctx.int(2, 5) * common;
      let d1 = ctx.int(2, 5);
      let n2 = ctx.int(2, 5) * common;
      let d2 = ctx.int(2, 5);
      let answer = Fraction::new(n1 * d2, d1 * n2).to_mixed_string();
      Ok(Problem::new(
        format!("{n1}/{d1} ÷ {n2}/{d2} = ?"),
        answer.clone(),
        format!("発展：逆数をかけるときに約分すると計算が簡単になります。{n1}/{d1} × {d2}/{n2}。答えは {answer}。"),
      ))
    }
  }
}

/// Speed in km/h, time in tenths of an hour, distance in tenths of a km.
struct Trip {
  speed: i64,
  hours_tenths: i64,
  km_tenths: i64,
}

fn draw_trip(ctx: &mut GenContext<'_>, d: Difficulty) -> Trip {
  let (hours_tenths, speed) = if d == Difficulty::Basic {
    (ctx.int(2, 5) * 10, ctx.int(10, 50))
  } else {
    (ctx.int(5, 25), ctx.int(4, 20) * 10)
  };
  Trip { speed, hours_tenths, km_tenths: speed * hours_tenths }
}

fn speed(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  if d == Difficulty::Advanced {
    let seconds = ctx.int(120, 300);
    let meters = ctx.int(500, 2000);
    // m/s × 3.6 = km/h, to one decimal place
    let answer = scaled(round_div(meters * 36, seconds), 1);
    return Ok(Problem::new(
      format!("{meters}mを{}分{}秒で進むと、時速何kmですか？(小数第2位を四捨五入)", seconds / 60, seconds % 60),
      answer.clone(),
      format!("発展：単位を揃えます。{seconds}秒で{meters}m進むので、秒速は{meters}÷{seconds}m。これを3.6倍すると時速{answer}kmです。"),
    ));
  }
  let t = draw_trip(ctx, d);
  let (dist, hours) = (scaled(t.km_tenths, 1), scaled(t.hours_tenths, 1));
  Ok(Problem::new(
    format!("{dist}kmを{hours}時間で進むと、時速何kmですか？"),
    t.speed.to_string(),
    format!("速さ = 距離 ÷ 時間。 {dist} ÷ {hours} = {}km/時。", t.speed),
  ))
}

fn time(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  if d == Difficulty::Advanced {
    // seconds = meters / (speed × 1000 / 3600), floored; both parts nonzero
    let (speed, meters, total) = ctx.resample("g6_time", |ctx| {
      let speed = ctx.int(40, 100);
      let meters = ctx.int(1000, 5000);
      let total = meters * 36 / (speed * 10);
      (total >= 60 && total % 60 != 0).then_some((speed, meters, total))
    })?;
    let answer = format!("{},{}", total / 60, total % 60);
    return Ok(Problem::new(
      format!("時速{speed}kmで{meters}m進むには何分何秒かかりますか？(秒未満は切り捨て)(例: 5,30)"),
      answer,
      format!(
        "発展：時間 = 距離 ÷ 速さ。単位をmと秒に揃えて計算すると{total}秒、分秒に直すと{}分{}秒です。",
        total / 60,
        total % 60
      ),
    ));
  }
  let t = draw_trip(ctx, d);
  let (dist, hours) = (scaled(t.km_tenths, 1), scaled(t.hours_tenths, 1));
  Ok(Problem::new(
    format!("時速{}kmで{dist}km進むと、何時間かかりますか？", t.speed),
    hours.clone(),
    format!("時間 = 距離 ÷ 速さ。 {dist} ÷ {} = {hours}時間。", t.speed),
  ))
}

fn distance(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  if d == Difficulty::Advanced {
    let speed = ctx.int(30, 90);
    let minutes = ctx.int(10, 50);
    let answer = scaled(round_div(speed * minutes, 6), 1);
    return Ok(Problem::new(
      format!("時速{speed}kmで{minutes}分進むと、何km進みますか？(小数第2位を四捨五入)"),
      answer.clone(),
      format!("発展：距離 = 速さ × 時間。{minutes}分を時間に直すと{minutes}/60時間なので、{speed} × {minutes}/60 = {answer}km。"),
    ));
  }
  let t = draw_trip(ctx, d);
  let (dist, hours) = (scaled(t.km_tenths, 1), scaled(t.hours_tenths, 1));
  Ok(Problem::new(
    format!("時速{}kmで{hours}時間進むと、何km進みますか？", t.speed),
    dist.clone(),
    format!("距離 = 速さ × 時間。 {} × {hours} = {dist}km。", t.speed),
  ))
}

fn ratios(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let common = ctx.int(2, 5);
  match d {
    Difficulty::Basic => {
      let a = ctx.int(1, 5);
      let b = ctx.int_excl(1, 5, &[a]);
      let g = gcd(a, b);
      let answer = format!("{}:{}", a / g, b / g);
      Ok(Problem::new(
        format!("{}:{} の比を最も簡単な整数の比にしなさい。(a:bの形で)", a * common, b * common),
        answer.clone(),
        format!("基礎：両方の数を最大公約数である{}でわります。答えは {answer}。", common * g),
      ))
    }
    Difficulty::Standard => {
      if ctx.coin() {
        let a = ctx.int(1, 9);
        let b = ctx.int_excl(1, 9, &[a]);
        let g = gcd(a, b);
        let answer = format!("{}:{}", a / g, b / g);
        Ok(Problem::new(
          format!("{}:{} の比を最も簡単な整数の比にしなさい。(a:bの形で)", scaled(a, 1), scaled(b, 1)),
          answer.clone(),
          format!("標準：まず両方を10倍して整数にします({a}:{b})。次に最大公約数でわります。答えは {answer}。"),
        ))
      } else {
        let (f1, f2) = (draw_proper(ctx, 2, 7), draw_proper(ctx, 2, 7));
        let den = lcm(f1.den, f2.den);
        let (x, y) = (f1.num * (den / f1.den), f2.num * (den / f2.den));
        let g = gcd(x, y);
        let answer = format!("{}:{}", x / g, y / g);
        Ok(Problem::new(
          format!("{}:{} の比を最も簡単な整数の比にしなさい。(a:bの形で)", f1.text(), f2.text()),
          answer.clone(),
          format!("標準：両方に分母の最小公倍数({den})をかけて整数にします({x}:{y})。次に最大公約数でわります。答えは {answer}。"),
        ))
      }
    }
    Difficulty::Advanced => {
      let a = ctx.int(1, 4);
      let b = ctx.int_excl(1, 4, &[a]);
      let c = ctx.int_excl(1, 4, &[a, b]);
      let g = gcd(gcd(a, b), c);
      let answer = format!("{}:{}:{}", a / g, b / g, c / g);
      Ok(Problem::new(
        format!("{}:{}:{} の比を最も簡単な整数の比にしなさい。(a:b:cの形で)", a * common, b * common, c * common),
        answer.clone(),
        format!("発展：3つの数の最大公約数である{}でわります。答えは {answer}。", common * g),
      ))
    }
  }
}

fn per_unit_quantity(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let quantity = ctx.int(2, 9);
      let unit_value = ctx.int(10, 50);
      let total = quantity * unit_value;
      Ok(Problem::new(
        format!("{total}円で{quantity}個のお菓子を買いました。1個あたり何円ですか？"),
        unit_value.to_string(),
        format!("基礎：合計の値段を個数で割ります。{total} ÷ {quantity} = {unit_value}円。"),
      ))
    }
    Difficulty::Standard => {
      let people = ctx.int(2, 5);
      let halves = ctx.int(1, 10);
      let total = scaled(halves * 5, 1);
      let exact = (halves * 50) % people == 0;
      let answer = scaled(round_div(halves * 50, people), 2);
      let hint = if exact { "" } else { "(小数第3位を四捨五入)" };
      Ok(Problem::new(
        format!("{total}Lのジュースを{people}人で分けます。1人あたり何Lですか？{hint}"),
        answer.clone(),
        format!("標準：合計の量を人数で割ります。{total} ÷ {people} = {answer}L。"),
      ))
    }
    Difficulty::Advanced => {
      let area = ctx.int(20, 50);
      let people = ctx.int(10, area - 5);
      let answer = scaled(round_div(area * 10, people), 1);
      Ok(Problem::new(
        format!("広さ{area}m²の部屋に{people}人います。1人あたりの面積は何m²ですか？(小数第2位を四捨五入)"),
        answer.clone(),
        format!("発展：人口密度の逆の考え方です。全体の面積を人数で割ります。{area} ÷ {people} ≒ {answer}m²。"),
      ))
    }
  }
}

fn circle_area(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Advanced => {
      let radius = ctx.int(4, 12);
      // r × r × 3.14 ÷ 2 in hundredths
      let answer = scaled(radius * radius * 157, 2);
      Ok(
        Problem::new(
          format!("図の半円の面積を求めなさい。直径は{}cmです。(円周率は3.14とする)", radius * 2),
          answer.clone(),
          format!("発展：まず円全体の面積を計算し、それを2で割ります。半径は{radius}cmです。面積 = {radius}×{radius}×3.14 ÷ 2 = {answer}cm²。"),
        )
        .with_figure(figure::circle(&format!("{}cm", radius * 2), true)),
      )
    }
    _ => {
      let (r_scaled, dp) = if d == Difficulty::Basic { (ctx.int(2, 10), 0) } else { (ctx.int(5, 50), 1) };
      let radius = scaled(r_scaled, dp);
      let answer = scaled(r_scaled * r_scaled * 314, 2 * dp + 2);
      Ok(
        Problem::new(
          format!("半径{radius}cmの円の面積を求めなさい。(円周率は3.14とする)"),
          answer.clone(),
          format!("円の面積 = 半径 × 半径 × 3.14。 {radius} × {radius} × 3.14 = {answer}cm²。"),
        )
        .with_figure(figure::circle(&format!("{radius}cm"), false)),
      )
    }
  }
}

#[cfg(test)]
mod tests {
  use super::super::testkit::forced;
  use super::*;
  use crate::normalizer::answers_match;
  use rand::{rngs::StdRng, SeedableRng};

  #[test]
  fn circle_area_with_radius_five() {
    let p = forced("g6_circle_area", Difficulty::Standard, &[50], &[]);
    assert_eq!(p.text, "半径5cmの円の面積を求めなさい。(円周率は3.14とする)");
    assert_eq!(p.answer, "78.5");
    let p = forced("g6_circle_area", Difficulty::Standard, &[15], &[]);
    assert_eq!(p.answer, "7.065");
    let p = forced("g6_circle_area", Difficulty::Advanced, &[4], &[]);
    assert_eq!(p.answer, "25.12");
    assert!(p.text.contains("直径は8cm"));
  }

  #[test]
  fn mixed_sums_use_the_canonical_separator() {
    // 1と1/2 + 1と2/3 = 19/6 = 3と1/6
    let p = forced("g6_fractions_addition", Difficulty::Advanced, &[1, 2, 1, 1, 3, 2], &[]);
    assert_eq!(p.text, "1と1/2 + 1と2/3 = ?");
    assert_eq!(p.answer, "3と1/6");
    assert!(answers_match("3 1/6", &p.answer));
  }

  #[test]
  fn subtraction_puts_larger_operand_first() {
    // 1/3 and 3/4 drawn; 3/4 - 1/3 = 5/12
    let p = forced("g6_fractions_subtraction", Difficulty::Basic, &[3, 4, 1, 3], &[]);
    assert_eq!(p.text, "3/4 - 1/3 = ?");
    assert_eq!(p.answer, "5/12");
  }

  #[test]
  fn division_by_fraction() {
    let p = forced("g6_fractions_division", Difficulty::Basic, &[4, 3, 2, 1], &[]);
    assert_eq!(p.text, "3/4 ÷ 1/2 = ?");
    assert_eq!(p.answer, "1と1/2");
  }

  #[test]
  fn advanced_time_uses_comma_answer() {
    // 60km/h over 4500m: 270 s
    let p = forced("g6_time", Difficulty::Advanced, &[60, 4500], &[]);
    assert_eq!(p.answer, "4,30");
    assert!(answers_match("4分30秒", &p.answer));
  }

  #[test]
  fn advanced_time_has_minutes_and_seconds() {
    // 100km/h over 1000m is 36 s; 40km/h over 4000m is exactly 6 min
    let p = forced("g6_time", Difficulty::Advanced, &[100, 1000, 40, 4000, 60, 4500], &[]);
    assert_eq!(p.answer, "4,30");
    for seed in 0..300 {
      let mut rng = StdRng::seed_from_u64(seed);
      let mut ctx = GenContext::new(&mut rng, 64);
      let p = time(&mut ctx, Difficulty::Advanced).unwrap();
      assert!(p.answer.split(',').all(|part| part != "0"), "{}", p.answer);
    }
  }

  #[test]
  fn standard_trip_uses_decimal_hours() {
    let p = forced("g6_distance", Difficulty::Standard, &[15, 6], &[]);
    assert_eq!(p.text, "時速60kmで1.5時間進むと、何km進みますか？");
    assert_eq!(p.answer, "90");
  }

  #[test]
  fn ratios_are_fully_reduced() {
    // 2:4 scaled by 3 must reduce to 1:2
    let p = forced("g6_ratios", Difficulty::Basic, &[3, 2, 4], &[]);
    assert_eq!(p.text, "6:12 の比を最も簡単な整数の比にしなさい。(a:bの形で)");
    assert_eq!(p.answer, "1:2");
  }

  #[test]
  fn per_unit_rounding_hint_only_when_inexact() {
    let p = forced("g6_per_unit_quantity", Difficulty::Standard, &[3, 1], &[]);
    assert_eq!(p.answer, "0.17");
    assert!(p.text.contains("四捨五入"));
    let p = forced("g6_per_unit_quantity", Difficulty::Standard, &[2, 3], &[]);
    assert_eq!(p.answer, "0.75");
    assert!(!p.text.contains("四捨五入"));
  }
}
