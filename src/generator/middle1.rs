//! 中1: signed integers, literal expressions, linear equations,
//! proportionality, prime factorization and solid volume.

use super::{GenContext, Problem, TopicFn};
use crate::domain::Difficulty;
use crate::error::GenerateError;
use crate::figure;
use crate::numeric::{gcd, lcm, prime_factorize, Fraction};
use crate::util::{linear_expr, plus_minus, poly_text, scaled, signed, term};

pub(super) fn lookup(topic_id: &str) -> Option<TopicFn> {
  let f: TopicFn = match topic_id {
    "m1_int_addition" => int_addition,
    "m1_int_subtraction" => int_subtraction,
    "m1_int_multiplication" => int_multiplication,
    "m1_int_division" => int_division,
    "m1_algebra_simplify" => algebra_simplify,
    "m1_algebra_distributive" => algebra_distributive,
    "m1_linear_equations_basic" => linear_equations_basic,
    "m1_linear_equations_parentheses" => linear_equations_parentheses,
    "m1_direct_proportion" => direct_proportion,
    "m1_inverse_proportion" => inverse_proportion,
    "m1_prime_factorization" => prime_factorization,
    "m1_solid_volume" => solid_volume,
    _ => return None,
  };
  Some(f)
}

fn int_addition(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let positive = ctx.coin();
      let (a, b) = if positive {
        (ctx.int(1, 10), ctx.int(1, 10))
      } else {
        let a = ctx.int(-10, -1);
        (a, ctx.int(-10, -1))
      };
      let answer = (a + b).to_string();
      let kind = if a > 0 { "正の数同士" } else { "負の数同士" };
      Ok(Problem::new(
        format!("{} + {} = ?", signed(a), signed(b)),
        answer.clone(),
        format!("基礎：{kind}の足し算です。答えは {answer} です。"),
      ))
    }
    Difficulty::Standard => {
      let a = ctx.int(1, 10);
      let b = ctx.int(-10, -1);
      let (x, y) = if ctx.coin() { (a, b) } else { (b, a) };
      let answer = (x + y).to_string();
      Ok(Problem::new(
        format!("{} + {} = ?", signed(x), signed(y)),
        answer.clone(),
        format!("標準：正の数と負の数の足し算です。絶対値の大きい方から小さい方を引き、大きい方の符号をつけます。答えは {answer} です。"),
      ))
    }
    Difficulty::Advanced => {
      let (a, b, c) = (ctx.int_excl(-9, 9, &[0]), ctx.int_excl(-9, 9, &[0]), ctx.int_excl(-9, 9, &[0]));
      let answer = (a + b + c).to_string();
      Ok(Problem::new(
        format!("{} + {} + {} = ?", signed(a), signed(b), signed(c)),
        answer.clone(),
        format!("発展：3つの数の足し算です。前から順番に計算します。{} + {} = {}。答えは {answer} です。", signed(a), signed(b), a + b),
      ))
    }
  }
}

fn int_subtraction(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  if d == Difficulty::Advanced {
    let (a, b, c) = (ctx.int_excl(-9, 9, &[0]), ctx.int_excl(-9, 9, &[0]), ctx.int_excl(-9, 9, &[0]));
    let answer = (a - b + c).to_string();
    return Ok(Problem::new(
      format!("{} - {} + {} = ?", signed(a), signed(b), signed(c)),
      answer.clone(),
      format!("発展：3つの数の計算です。引き算を足し算に直して前から順番に計算します。{} + {} + {} = {answer}。", signed(a), signed(-b), signed(c)),
    ));
  }
  let same_sign = ctx.coin();
  let (a, b, lead) = match (d, same_sign) {
    (Difficulty::Basic, true) => (ctx.int(1, 20), ctx.int(1, 20), "基礎"),
    (Difficulty::Basic, false) => (ctx.int(-20, -1), ctx.int(-20, -1), "基礎"),
    (_, true) => (ctx.int(1, 10), ctx.int(-10, -1), "標準"),
    (_, false) => (ctx.int(-10, -1), ctx.int(1, 10), "標準"),
  };
  let answer = (a - b).to_string();
  Ok(Problem::new(
    format!("{} - {} = ?", signed(a), signed(b)),
    answer.clone(),
    format!("{lead}：引き算は、引く数の符号を変えて足し算に直します。{} + {} = {answer}。", signed(a), signed(-b)),
  ))
}

fn int_multiplication(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let (a, b) = if ctx.coin() { (ctx.int(2, 9), ctx.int(2, 9)) } else { (ctx.int(-9, -2), ctx.int(-9, -2)) };
      let answer = (a * b).to_string();
      Ok(Problem::new(
        format!("{} × {} = ?", signed(a), signed(b)),
        answer.clone(),
        format!("基礎：同符号のかけ算は、答えが正の数になります。答えは {answer} です。"),
      ))
    }
    Difficulty::Standard => {
      let a = ctx.int(2, 9);
      let b = ctx.int(-9, -2);
      let (x, y) = if ctx.coin() { (a, b) } else { (b, a) };
      let answer = (a * b).to_string();
      Ok(Problem::new(
        format!("{} × {} = ?", signed(x), signed(y)),
        answer.clone(),
        format!("標準：異符号のかけ算は、答えが負の数になります。答えは {answer} です。"),
      ))
    }
    Difficulty::Advanced => {
      let a = ctx.int_excl(-4, 4, &[0, 1, -1]);
      let exp = ctx.int(2, 3) as u32;
      let b = ctx.int_excl(-5, 5, &[0, 1, -1]);
      let power = a.pow(exp);
      let answer = (power * b).to_string();
      Ok(Problem::new(
        format!("{}^{exp} × {} = ?", signed(a), signed(b)),
        answer.clone(),
        format!("発展：累乗を含む計算です。先に累乗を計算します。{}^{exp}は{power}です。答えは {answer} です。", signed(a)),
      ))
    }
  }
}

fn int_division(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let (quotient, divisor) = if ctx.coin() { (ctx.int(2, 9), ctx.int(2, 9)) } else { (ctx.int(-9, -2), ctx.int(-9, -2)) };
      Ok(Problem::new(
        format!("{} ÷ {} = ?", signed(quotient * divisor), signed(divisor)),
        quotient.to_string(),
        format!("基礎：同符号のわり算は、答えが正の数になります。答えは {quotient} です。"),
      ))
    }
    Difficulty::Standard => {
      let quotient = ctx.int(-9, -2);
      let divisor = ctx.int(2, 9);
      let dividend = quotient * divisor;
      let (by, answer) = if ctx.coin() { (divisor, quotient) } else { (quotient, divisor) };
      Ok(Problem::new(
        format!("{} ÷ {} = ?", signed(dividend), signed(by)),
        answer.to_string(),
        format!("標準：異符号のわり算は、答えが負の数になります。答えは {answer} です。"),
      ))
    }
    Difficulty::Advanced => {
      let a = ctx.int(2, 5);
      let b = ctx.int(2, 5);
      let dividend = a * b * ctx.int(2, 5) * ctx.sign();
      let step = dividend / a;
      let answer = step / b;
      Ok(Problem::new(
        format!("{} ÷ {a} ÷ {b} = ?", signed(dividend)),
        answer.to_string(),
        format!("発展：3つの数のわり算です。前から順に計算します。{dividend} ÷ {a} = {step}。次に {step} ÷ {b} = {answer}。"),
      ))
    }
  }
}

fn algebra_simplify(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let var = if ctx.coin() { "x" } else { "a" };
  match d {
    Difficulty::Basic => {
      let a = ctx.int(1, 9);
      let b = ctx.int_excl(1, 9, &[a]);
      let (text, coef) = if ctx.coin() {
        (format!("{} + {} = ?", term(a, var), term(b, var)), a + b)
      } else {
        let (big, small) = (a.max(b), a.min(b));
        (format!("{} - {} = ?", term(big, var), term(small, var)), big - small)
      };
      let answer = term(coef, var);
      Ok(Problem::new(
        text,
        answer.clone(),
        format!("基礎：同じ文字の項（同類項）は、係数を計算してまとめることができます。答えは {answer} です。"),
      ))
    }
    Difficulty::Standard => {
      let a = ctx.int(1, 5);
      let b = ctx.int(-5, 5);
      let c = ctx.int(1, 5);
      let e = ctx.int(-5, 5);
      let answer = linear_expr(a - c, var, b - e);
      Ok(Problem::new(
        format!("({}) - ({}) = ?", poly_text(&[(a, var), (b, "")]), poly_text(&[(c, var), (e, "")])),
        answer.clone(),
        format!("標準：かっこを外して同類項をまとめます。-(...)のかっこを外すときは符号が変わることに注意。答えは {answer}。"),
      ))
    }
    Difficulty::Advanced => {
      let f1 = {
        let den = ctx.int(2, 5);
        Fraction::new(ctx.int(1, den - 1), den)
      };
      let f2 = {
        let den = ctx.int(2, 5);
        Fraction::new(ctx.int(1, den - 1), den)
      };
      let sum = f1.add(f2);
      let answer = if sum.is_integer() { term(sum.num(), var) } else { format!("({sum}){var}") };
      Ok(Problem::new(
        format!("({f1}){var} + ({f2}){var} = ?"),
        answer.clone(),
        format!("発展：分数の係数を通分して計算します。分母を{}に揃えて足すと、答えは {answer}。", lcm(f1.den(), f2.den())),
      ))
    }
  }
}

fn algebra_distributive(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let a = ctx.int(2, 9);
      let b = ctx.int(2, 9);
      let answer = format!("{}xy", a * b);
      Ok(Problem::new(
        format!("{a}x × {b}y = ?"),
        answer.clone(),
        format!("基礎：単項式同士の積は、係数同士、文字同士を掛け合わせます。{a}×{b}={}、x×y=xy。答えは {answer}。", a * b),
      ))
    }
    Difficulty::Standard => {
      let a = ctx.int(2, 9) * ctx.sign();
      let b = ctx.int(1, 5);
      let c = ctx.int_excl(-5, 5, &[0]);
      let answer = linear_expr(a * b, "x", a * c);
      Ok(Problem::new(
        format!("{a}({}) = ?", poly_text(&[(b, "x"), (c, "")])),
        answer.clone(),
        format!("標準：分配法則を使ってかっこを外します。{a}をかっこの中の各項に掛けます。答えは {answer}。"),
      ))
    }
    Difficulty::Advanced => {
      let a = ctx.int(2, 5);
      let b = ctx.int(1, 5);
      let c = ctx.int(1, 5);
      let k = ctx.int(2, 5);
      let e = ctx.int_excl(-5, 5, &[0]);
      let f = ctx.int_excl(-5, 5, &[0]);
      let answer = linear_expr(a * b + k * c, "x", a * e + k * f);
      Ok(Problem::new(
        format!("{a}({}) + {k}({}) = ?", poly_text(&[(b, "x"), (e, "")]), poly_text(&[(c, "x"), (f, "")])),
        answer.clone(),
        format!(
          "発展：分配法則でかっこを外し、同類項をまとめます。{} + {}。答えは {answer}。",
          poly_text(&[(a * b, "x"), (a * e, "")]),
          poly_text(&[(k * c, "x"), (k * f, "")])
        ),
      ))
    }
  }
}

fn linear_equations_basic(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let x = ctx.int(1, 9);
  let answer = format!("x={x}");
  match d {
    Difficulty::Basic => {
      if ctx.coin() {
        let a = ctx.int(1, 10);
        Ok(Problem::new(
          format!("x + {a} = {} を解きなさい。(x=の形で)", x + a),
          answer,
          format!("基礎：両辺から{a}を引くと x = {x} となります。"),
        ))
      } else {
        let a = ctx.int(2, 5);
        Ok(Problem::new(
          format!("{a}x = {} を解きなさい。(x=の形で)", a * x),
          answer,
          format!("基礎：両辺を{a}で割ると x = {x} となります。"),
        ))
      }
    }
    Difficulty::Standard => {
      let a = ctx.int(2, 5);
      let b = ctx.int_excl(-10, 10, &[0]);
      let c = a * x + b;
      Ok(Problem::new(
        format!("{a}x{} = {c} を解きなさい。(x=の形で)", plus_minus(b)),
        answer,
        format!("標準：移項して整理します。{b}を右辺に移項して {a}x = {}。両辺を{a}で割ると x = {x}。", c - b),
      ))
    }
    Difficulty::Advanced => {
      let a = ctx.int(2, 5);
      let c = ctx.int(1, a - 1);
      let b = ctx.int_excl(-10, 10, &[0]);
      let rhs = (a - c) * x + b;
      Ok(Problem::new(
        format!("{}{} = {}{} を解きなさい。(x=の形で)", term(a, "x"), plus_minus(b), term(c, "x"), plus_minus(rhs)),
        answer,
        format!(
          "発展：文字の項を左辺に、数の項を右辺に移項して整理します。({a}-{c})x = {rhs}-{}。{} = {}。よって x={x}。",
          signed(b),
          term(a - c, "x"),
          rhs - b
        ),
      ))
    }
  }
}

fn linear_equations_parentheses(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let x = ctx.int_excl(-5, 5, &[0]);
      let a = ctx.int(2, 5);
      let b = ctx.int_excl(-5, 5, &[0]);
      let c = a * (x + b);
      Ok(Problem::new(
        format!("{a}(x{}) = {c} を解きなさい。(x=の形で)", plus_minus(b)),
        format!("x={x}"),
        format!("基礎：まず両辺を{a}で割るか、分配法則でかっこを外します。x{} = {}。移項して x = {x}。", plus_minus(b), x + b),
      ))
    }
    Difficulty::Standard => {
      let x = ctx.int_excl(-5, 5, &[0]);
      let a = ctx.int(2, 5);
      let b = ctx.int_excl(-3, 3, &[0]);
      let c = ctx.int_excl(2, 5, &[a]);
      let e = ctx.int_excl(-3, 3, &[0, b]);
      let rhs = a * (x + b) - c * (x + e);
      Ok(Problem::new(
        format!("{a}(x{}) - {c}(x{}) = {rhs} を解きなさい。(x=の形で)", plus_minus(b), plus_minus(e)),
        format!("x={x}"),
        format!(
          "標準：分配法則でかっこを外し、同類項をまとめて解きます。{} = {rhs}。答えは x={x}。",
          poly_text(&[(a - c, "x"), (a * b - c * e, "")])
        ),
      ))
    }
    Difficulty::Advanced => {
      // (x + b) / k must come out whole
      let (x, k, b) = ctx.resample("m1_linear_equations_parentheses", |ctx| {
        let x = ctx.int_excl(-5, 5, &[0]);
        let k = ctx.int(2, 5);
        let b = ctx.int_excl(-5, 5, &[0]);
        ((x + b) % k == 0).then_some((x, k, b))
      })?;
      let rhs = (x + b) / k;
      Ok(Problem::new(
        format!("(x{}) / {k} = {rhs} を解きなさい。(x=の形で)", plus_minus(b)),
        format!("x={x}"),
        format!("発展：分数の方程式です。両辺に分母の{k}を掛けて分数をなくします。x{} = {}。移項して x={x}。", plus_minus(b), rhs * k),
      ))
    }
  }
}

fn direct_proportion(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let a = ctx.int(2, 5) * ctx.sign();
  match d {
    Difficulty::Basic => {
      let x = ctx.int(2, 5);
      let answer = (a * x).to_string();
      Ok(Problem::new(
        format!("y = {a}x について、x={x}のときのyの値を求めなさい。"),
        answer.clone(),
        format!("基礎：y={a}xの式にx={x}を代入します。y = {a} × {x} = {answer}。"),
      ))
    }
    Difficulty::Standard => {
      let x = ctx.int(2, 5);
      let y = a * x;
      let answer = format!("y={a}x");
      Ok(Problem::new(
        format!("yはxに比例し、x={x}のときy={y}です。yをxの式で表しなさい。(y=axの形で)"),
        answer.clone(),
        format!("標準：y=axにx={x}, y={y}を代入し、比例定数aを求めます。a = y/x = {y}/{x} = {a}。よって {answer}。"),
      ))
    }
    Difficulty::Advanced => {
      let x1 = ctx.int(2, 5);
      let x2 = ctx.int(6, 10);
      let (y1, y2) = (a * x1, a * x2);
      Ok(Problem::new(
        format!("yはxに比例し、x={x1}のときy={y1}です。x={x2}のとき、yはいくつですか？"),
        y2.to_string(),
        format!("発展：まず比例定数を求めます。a = {y1}/{x1} = {a}。式はy={a}x。これにx={x2}を代入して y={y2}。"),
      ))
    }
  }
}

fn inverse_proportion(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let k = ctx.pick(&[12, 18, 24, 30, 36]) * ctx.sign();
  let divisors: Vec<i64> = [2, 3, 4, 6].into_iter().filter(|n| k % n == 0).collect();
  let x = ctx.pick(&divisors);
  let y = k / x;
  match d {
    Difficulty::Basic => Ok(Problem::new(
      format!("y = {k}/x について、x={x}のときのyの値を求めなさい。"),
      y.to_string(),
      format!("基礎：y={k}/xの式にx={x}を代入します。y = {k} / {x} = {y}。"),
    )),
    Difficulty::Standard => {
      let answer = format!("y={k}/x");
      Ok(Problem::new(
        format!("yはxに反比例し、x={x}のときy={y}です。yをxの式で表しなさい。(y=k/xの形で)"),
        answer.clone(),
        format!("標準：y=k/xにx={x}, y={y}を代入し、比例定数kを求めます。k = xy = {x} × {} = {k}。よって {answer}。", signed(y)),
      ))
    }
    Difficulty::Advanced => {
      let others: Vec<i64> = divisors.iter().copied().filter(|&n| n != x).collect();
      let x2 = ctx.pick(&others);
      let y2 = k / x2;
      Ok(Problem::new(
        format!("yはxに反比例し、x={x}のときy={y}です。x={x2}のとき、yはいくつですか？"),
        y2.to_string(),
        format!("発展：まず比例定数を求めます。k = {x} × {} = {k}。式はy={k}/x。これにx={x2}を代入して y={y2}。", signed(y)),
      ))
    }
  }
}

fn prime_factorization(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let (n, lead) = match d {
    Difficulty::Basic => (ctx.pick(&[12u64, 18, 20, 28, 30, 45, 50]), "基礎"),
    Difficulty::Standard => (ctx.pick(&[72u64, 80, 90, 100, 120, 150]), "標準"),
    Difficulty::Advanced => {
      let n1 = ctx.int(12, 30);
      let n2 = ctx.int_excl(12, 30, &[n1]);
      return Ok(if ctx.coin() {
        let answer = gcd(n1, n2);
        Problem::new(
          format!("{n1}と{n2}の最大公約数を求めなさい。"),
          answer.to_string(),
          format!("発展：{n1} = {}、{n2} = {}。共通する素因数を掛け合わせます。答えは{answer}。", factor_text(n1 as u64), factor_text(n2 as u64)),
        )
      } else {
        let answer = lcm(n1, n2);
        Problem::new(
          format!("{n1}と{n2}の最小公倍数を求めなさい。"),
          answer.to_string(),
          format!(
            "発展：{n1} = {}、{n2} = {}。すべての素因数を最も多く含むように掛け合わせます。答えは{answer}。",
            factor_text(n1 as u64),
            factor_text(n2 as u64)
          ),
        )
      });
    }
  };
  let answer = factor_answer(n);
  Ok(Problem::new(
    format!("{n} を素因数分解しなさい。 (例: 2^2*3)"),
    answer.clone(),
    format!("{lead}：{n}を小さい素数で順番に割っていきます。答えは {} となります。", factor_text(n)),
  ))
}

fn factor_tokens(n: u64) -> Vec<String> {
  prime_factorize(n)
    .into_iter()
    .map(|(p, e)| if e > 1 { format!("{p}^{e}") } else { p.to_string() })
    .collect()
}

/// Canonical answer form: tokens in string order, so 44 → "11*2^2".
fn factor_answer(n: u64) -> String {
  let mut tokens = factor_tokens(n);
  tokens.sort();
  tokens.join("*")
}

/// Display form with bases ascending.
fn factor_text(n: u64) -> String {
  factor_tokens(n).join(" × ")
}

fn solid_volume(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let (l, w, h) = (ctx.int(3, 8), ctx.int(3, 8), ctx.int(3, 8));
      let answer = (l * w * h).to_string();
      Ok(Problem::new(
        format!("たて{l}cm, よこ{w}cm, 高さ{h}cmの直方体の体積を求めなさい。"),
        answer.clone(),
        format!("基礎：直方体の体積 = たて × よこ × 高さ。 {l} × {w} × {h} = {answer}cm³。"),
      ))
    }
    Difficulty::Standard => {
      let h = ctx.int(5, 10);
      if ctx.coin() {
        let base = ctx.int(4, 8);
        let base_h = ctx.int(3, 6);
        let face = scaled(base * base_h * 5, 1);
        let answer = scaled(base * base_h * h * 5, 1);
        Ok(Problem::new(
          format!("底辺{base}cm, 高さ{base_h}cmの三角形を底面とし、高さが{h}cmの三角柱の体積を求めなさい。"),
          answer.clone(),
          format!("標準：三角柱の体積 = 底面積 × 高さ。底面積は {base}×{base_h}÷2 = {face}cm²。体積は {face} × {h} = {answer}cm³。"),
        ))
      } else {
        let r = ctx.int(2, 5);
        let answer = format!("{}π", r * r * h);
        Ok(Problem::new(
          format!("半径{r}cmの円を底面とし、高さが{h}cmの円柱の体積を求めなさい。(円周率はπとする)"),
          answer.clone(),
          format!("標準：円柱の体積 = 底面積 × 高さ = (半径)²×π × 高さ。 ({r})²×π × {h} = {answer}cm³。"),
        ))
      }
    }
    Difficulty::Advanced => {
      let l1 = ctx.int(6, 10);
      let w1 = ctx.int(6, 10);
      let h1 = ctx.int(3, 5);
      let l2 = ctx.int(3, l1 - 2);
      let w2 = ctx.int(3, w1 - 2);
      let h2 = ctx.int(3, 5);
      let (lower, upper) = (l1 * w1 * h1, l2 * w2 * h2);
      let answer = (lower + upper).to_string();
      Ok(
        Problem::new(
          format!(
            "図のように、大きな直方体(たて{l1},よこ{w1},高さ{h1})の上に小さな直方体(たて{l2},よこ{w2},高さ{h2})が乗っている立体の体積を求めなさい。(単位:cm)"
          ),
          answer.clone(),
          format!("発展：2つの直方体の体積をそれぞれ計算して足し合わせます。下の体積: {lower}。上の体積: {upper}。合計: {lower}+{upper}={answer}cm³。"),
        )
        .with_figure(figure::stacked_boxes(
          (w1 as f64, h1 as f64),
          (w2 as f64, h2 as f64),
          (&format!("{w1}cm"), &format!("{h1}cm")),
          (&format!("{w2}cm"), &format!("{h2}cm")),
        )),
      )
    }
  }
}

#[cfg(test)]
mod tests {
  use super::super::testkit::forced;
  use super::*;
  use crate::normalizer::{answers_match, normalize};
  use rand::{rngs::StdRng, SeedableRng};

  #[test]
  fn positive_addition() {
    let p = forced("m1_int_addition", Difficulty::Basic, &[7, 3], &[0.1]);
    assert_eq!(p.text, "7 + 3 = ?");
    assert_eq!(p.answer, "10");
  }

  #[test]
  fn negatives_are_parenthesized() {
    let p = forced("m1_int_subtraction", Difficulty::Standard, &[-4, 6], &[0.9]);
    assert_eq!(p.text, "(-4) - 6 = ?");
    assert_eq!(p.answer, "-10");
    let p = forced("m1_int_multiplication", Difficulty::Advanced, &[-3, 3, 2], &[]);
    assert_eq!(p.text, "(-3)^3 × 2 = ?");
    assert_eq!(p.answer, "-54");
  }

  #[test]
  fn unit_coefficients_are_elided() {
    // a=3, b=2 subtracted: 3x - 2x = x
    let p = forced("m1_algebra_simplify", Difficulty::Basic, &[3, 2], &[0.1, 0.9]);
    assert_eq!(p.text, "3x - 2x = ?");
    assert_eq!(p.answer, "x");
  }

  #[test]
  fn fractional_coefficients() {
    let p = forced("m1_algebra_simplify", Difficulty::Advanced, &[2, 1, 3, 1], &[0.1]);
    assert_eq!(p.text, "(1/2)x + (1/3)x = ?");
    assert_eq!(p.answer, "(5/6)x");
  }

  #[test]
  fn parentheses_division_form_is_exact() {
    for seed in 0..200 {
      let mut rng = StdRng::seed_from_u64(seed);
      let mut ctx = GenContext::new(&mut rng, 64);
      let p = linear_equations_parentheses(&mut ctx, Difficulty::Advanced).unwrap();
      assert!(p.answer.starts_with("x="));
      assert!(!p.text.contains('.'), "{}", p.text);
    }
  }

  #[test]
  fn prime_factors_ascending() {
    let p = forced("m1_prime_factorization", Difficulty::Standard, &[0], &[]);
    assert_eq!(p.text, "72 を素因数分解しなさい。 (例: 2^2*3)");
    assert_eq!(p.answer, "2^3*3^2");
    assert!(answers_match("3^2・2^3", &p.answer));
  }

  #[test]
  fn prime_factor_answer_is_canonical_for_two_digit_bases() {
    assert_eq!(factor_answer(44), "11*2^2");
    assert_eq!(factor_text(44), "2^2 × 11");
    assert_eq!(normalize(&factor_answer(88)), factor_answer(88));
    assert!(answers_match("2^3*11", &factor_answer(88)));
  }

  #[test]
  fn inverse_proportion_uses_a_divisor() {
    for seed in 0..100 {
      let mut rng = StdRng::seed_from_u64(seed);
      let mut ctx = GenContext::new(&mut rng, 64);
      let p = inverse_proportion(&mut ctx, Difficulty::Basic).unwrap();
      assert!(p.answer.parse::<i64>().is_ok(), "{}", p.answer);
    }
  }

  #[test]
  fn composite_solid_has_figure() {
    let p = forced("m1_solid_volume", Difficulty::Advanced, &[6, 6, 3, 3, 3, 3], &[]);
    assert_eq!(p.answer, "135");
    assert!(p.figure.is_some());
  }
}
