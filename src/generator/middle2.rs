//! 中2: simultaneous equations, linear functions, expansion,
//! polygon angles and congruence conditions.

use super::{GenContext, Problem, TopicFn};
use crate::domain::Difficulty;
use crate::error::GenerateError;
use crate::util::{linear_expr, plus_minus, poly_compact, poly_text, signed, term};

pub(super) fn lookup(topic_id: &str) -> Option<TopicFn> {
  let f: TopicFn = match topic_id {
    "m2_simultaneous_equations_elimination" => simultaneous_elimination,
    "m2_simultaneous_equations_substitution" => simultaneous_substitution,
    "m2_linear_functions_value" => linear_functions_value,
    "m2_linear_functions_equation" => linear_functions_equation,
    "m2_expression_expansion_basic" => expansion_basic,
    "m2_expression_expansion_formula" => expansion_formula,
    "m2_angle_problems" => angle_problems,
    "m2_proof_fill_in_the_blank" => proof_fill_in_the_blank,
    _ => return None,
  };
  Some(f)
}

/// `a·x + b·y = c` as problem text.
fn equation(a: i64, b: i64, c: i64) -> String {
  format!("{} = {c}", poly_text(&[(a, "x"), (b, "y")]))
}

/// Solution pair for the simultaneous-equation topics; y is never 0 or equal to x.
fn draw_solution(ctx: &mut GenContext<'_>) -> (i64, i64) {
  let x = ctx.int_excl(-5, 5, &[0]);
  (x, ctx.int_excl(-5, 5, &[0, x]))
}

fn system_text(first: &str, second: &str) -> String {
  format!("連立方程式を解きなさい: {first},  {second} (x= ,y= の形で)")
}

fn simultaneous_elimination(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let (x, y) = draw_solution(ctx);
  // (a1, b1, a2, b2)
  let ((a1, b1, a2, b2), how) = match d {
    Difficulty::Basic => {
      let second = if ctx.coin() { (-1, 1) } else { (1, -1) };
      ((1, 1, second.0, second.1), "基礎：2つの式をそのまま足すか引くことで、どちらかの文字を消去できます。".to_string())
    }
    Difficulty::Standard => {
      let coeffs = ctx.resample("m2_simultaneous_equations_elimination", |ctx| {
        let mult = ctx.int(2, 3);
        let a1 = ctx.int(1, 3);
        let a2 = ctx.int_excl(1, 3, &[a1]);
        (a1 * mult != a2).then_some((a1, 1, a2, mult))
      })?;
      (coeffs, format!("標準：1つ目の式を{}倍してyの係数をそろえ、加減法で解きます。", coeffs.3))
    }
    Difficulty::Advanced => {
      let a1 = ctx.int(2, 3);
      let b1 = ctx.int(2, 3);
      let a2 = ctx.int_excl(2, 3, &[a1]);
      let b2 = ctx.int(-3, -2);
      ((a1, b1, a2, b2), "発展：両方の式を適切な数で倍分し、係数をそろえてから加減法で解きます。".to_string())
    }
  };
  let (c1, c2) = (a1 * x + b1 * y, a2 * x + b2 * y);
  let answer = format!("x={x},y={y}");
  Ok(Problem::new(
    system_text(&equation(a1, b1, c1), &equation(a2, b2, c2)),
    answer,
    format!("{how}答えは x={x}, y={y} です。"),
  ))
}

fn simultaneous_substitution(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let (x, y) = draw_solution(ctx);
  let answer = format!("x={x},y={y}");
  match d {
    Difficulty::Basic => {
      let solve_for_x = ctx.coin();
      let (k, a2, b2) = ctx.resample("m2_simultaneous_equations_substitution", |ctx| {
        let a2 = ctx.int(2, 4);
        let b2 = ctx.int(2, 4);
        let k = ctx.int(1, 3) * ctx.sign();
        // x = k·y + B against a2·x + b2·y has determinant b2 + k·a2
        let det = if solve_for_x { b2 + k * a2 } else { a2 + k * b2 };
        (det != 0).then_some((k, a2, b2))
      })?;
      let first = if solve_for_x {
        format!("x = {}", poly_text(&[(k, "y"), (x - k * y, "")]))
      } else {
        format!("y = {}", poly_text(&[(k, "x"), (y - k * x, "")]))
      };
      Ok(Problem::new(
        system_text(&first, &equation(a2, b2, a2 * x + b2 * y)),
        answer,
        format!("基礎：最初の式を2番目の式に代入して解きます。答えは x={x}, y={y} です。"),
      ))
    }
    _ => {
      let (a1, b1, a2, b2) = ctx.resample("m2_simultaneous_equations_substitution", |ctx| {
        let a1 = ctx.int(2, 4);
        let b1 = if d == Difficulty::Standard { 1 } else { ctx.int(2, 4) };
        let a2 = ctx.int_excl(2, 4, &[a1]);
        let b2 = if d == Difficulty::Standard { ctx.int(2, 4) } else { ctx.int_excl(2, 4, &[b1]) };
        (a1 * b2 != a2 * b1).then_some((a1, b1, a2, b2))
      })?;
      let how = if d == Difficulty::Standard {
        format!("標準：最初の式を y = {} の形に変形し、2番目の式に代入します。", poly_text(&[(-a1, "x"), (a1 * x + y, "")]))
      } else {
        "発展：どちらかの式を x=... または y=... の形に変形して代入します。分数が出てくることもあります。".to_string()
      };
      Ok(Problem::new(
        system_text(&equation(a1, b1, a1 * x + b1 * y), &equation(a2, b2, a2 * x + b2 * y)),
        answer,
        format!("{how}答えは x={x}, y={y} です。"),
      ))
    }
  }
}

fn linear_functions_value(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let a = ctx.int_excl(-3, 3, &[0]);
  let b = ctx.int(-5, 5);
  let func = format!("y = {}", poly_text(&[(a, "x"), (b, "")]));
  match d {
    Difficulty::Basic | Difficulty::Standard => {
      let x = if d == Difficulty::Basic { ctx.int(1, 5) } else { ctx.int(-5, -1) };
      let y = a * x + b;
      Ok(Problem::new(
        format!("一次関数 {func} について、x={x}のときのyの値を求めなさい。"),
        y.to_string(),
        format!("{func} の式に x={x} を代入します。y = {a} × {}{} = {y}。", signed(x), plus_or_nothing(b)),
      ))
    }
    Difficulty::Advanced => {
      let x1 = ctx.int(-4, 0);
      let x2 = ctx.int(1, 5);
      let (y1, y2) = (a * x1 + b, a * x2 + b);
      Ok(Problem::new(
        format!("一次関数 {func} で、xの値が{x1}から{x2}まで増加するときの変化の割合を求めなさい。"),
        a.to_string(),
        format!(
          "変化の割合は一次関数の傾きと同じです。計算すると (yの増加量)/(xの増加量) = ({y2} - {}) / ({x2} - {}) = {}/{} = {a}。",
          signed(y1),
          signed(x1),
          y2 - y1,
          x2 - x1
        ),
      ))
    }
  }
}

fn plus_or_nothing(b: i64) -> String {
  if b == 0 { String::new() } else { plus_minus(b) }
}

fn linear_functions_equation(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let a = ctx.int_excl(-3, 3, &[0]);
  let b = ctx.int(-5, 5);
  let answer = format!("y={}", linear_expr(a, "x", b));
  match d {
    Difficulty::Basic => {
      let x1 = ctx.int_excl(-5, 5, &[0]);
      let y1 = a * x1 + b;
      Ok(Problem::new(
        format!("傾きが{a}で、点({x1}, {y1})を通る一次関数の式を求めなさい。(y=ax+bの形で)"),
        answer.clone(),
        format!(
          "y=ax+b に傾き{a}を代入し y={}+b。次に点({x1}, {y1})を代入して {y1}={a}×{}+b を解き、b={b}を求めます。答えは {answer}。",
          term(a, "x"),
          signed(x1)
        ),
      ))
    }
    _ => {
      let x1 = ctx.int(-5, 0);
      let x2 = ctx.int(1, 5);
      let (y1, y2) = (a * x1 + b, a * x2 + b);
      let (text, how) = if d == Difficulty::Standard {
        (
          format!("2点({x1}, {y1}), ({x2}, {y2})を通る一次関数の式を求めなさい。(y=ax+bの形で)"),
          format!(
            "まず傾きを求めます。a = ({y2} - {}) / ({x2} - {}) = {a}。次にy={}+bにどちらかの点を代入してbを求めます。",
            signed(y1),
            signed(x1),
            term(a, "x")
          ),
        )
      } else {
        (
          format!("yはxの一次関数で、x={x1}のときy={y1}、x={x2}のときy={y2}です。この一次関数の式を求めなさい。(y=ax+bの形で)"),
          format!("これは2点({x1}, {y1}), ({x2}, {y2})を通る直線の式を求めるのと同じです。傾きa={a}、切片b={b}となります。"),
        )
      };
      Ok(Problem::new(text, answer.clone(), format!("{how}答えは {answer}。")))
    }
  }
}

fn expansion_basic(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let a = ctx.int(2, 5) * ctx.sign();
      let b = ctx.int(1, 5);
      let c = ctx.int_excl(-5, 5, &[0]);
      let answer = linear_expr(a * b, "x", a * c);
      Ok(Problem::new(
        format!("{a}({}) を展開しなさい。", poly_text(&[(b, "x"), (c, "")])),
        answer.clone(),
        format!("分配法則を使ってかっこを外します。{a}をかっこの中の各項に掛けます。答えは {answer}。"),
      ))
    }
    Difficulty::Standard => {
      let a = ctx.int_excl(-7, 7, &[0]);
      let b = ctx.int_excl(-7, 7, &[0, -a]);
      let answer = poly_compact(&[(1, "x^2"), (a + b, "x"), (a * b, "")]);
      Ok(Problem::new(
        format!("(x{})(x{}) を展開しなさい。", plus_minus(a), plus_minus(b)),
        answer.clone(),
        format!("公式 (x+a)(x+b) = x^2+(a+b)x+ab を使います。a+b = {}、ab = {}。答えは {answer}。", a + b, a * b),
      ))
    }
    Difficulty::Advanced => {
      let a = ctx.int_excl(-3, 3, &[0, 1, -1]);
      let b = ctx.int_excl(-5, 5, &[0]);
      let c = ctx.int_excl(-3, 3, &[0, 1, -1]);
      let e = ctx.int_excl(-5, 5, &[0, b]);
      let answer = poly_compact(&[(a * c, "x^2"), (a * e + b * c, "x"), (b * e, "")]);
      Ok(Problem::new(
        format!("({})({}) を展開しなさい。", poly_text(&[(a, "x"), (b, "")]), poly_text(&[(c, "x"), (e, "")])),
        answer.clone(),
        format!(
          "1つずつ分配法則で展開します。({a}x)×({c}x) + ({a}x)×({e}) + ({b})×({c}x) + ({b})×({e}) を計算し、まとめます。答えは {answer}。"
        ),
      ))
    }
  }
}

fn expansion_formula(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  let a = ctx.int(2, 9);
  match d {
    Difficulty::Basic => {
      let answer = format!("x^2+{}x+{}", 2 * a, a * a);
      Ok(Problem::new(
        format!("(x + {a})^2 を展開しなさい。"),
        answer.clone(),
        format!("公式 (a+b)^2 = a^2+2ab+b^2 を使います。答えは {answer}。"),
      ))
    }
    Difficulty::Standard => {
      if ctx.coin() {
        let answer = format!("x^2-{}x+{}", 2 * a, a * a);
        Ok(Problem::new(
          format!("(x - {a})^2 を展開しなさい。"),
          answer.clone(),
          format!("公式 (a-b)^2 = a^2-2ab+b^2 を使います。答えは {answer}。"),
        ))
      } else {
        let answer = format!("x^2-{}", a * a);
        Ok(Problem::new(
          format!("(x + {a})(x - {a}) を展開しなさい。"),
          answer.clone(),
          format!("公式 (a+b)(a-b) = a^2-b^2 を使います。答えは {answer}。"),
        ))
      }
    }
    Difficulty::Advanced => {
      let k = ctx.int(2, 4);
      let answer = format!("{}x^2+{}x+{}", k * k, 2 * k * a, a * a);
      Ok(Problem::new(
        format!("({k}x + {a})^2 を展開しなさい。"),
        answer.clone(),
        format!("公式 (a+b)^2 = a^2+2ab+b^2 を使います。この場合 a={k}x, b={a} です。答えは {answer}。"),
      ))
    }
  }
}

fn angle_problems(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let a1 = ctx.int(30, 80);
      let a2 = ctx.int(30, 80);
      let a3 = 180 - a1 - a2;
      Ok(Problem::new(
        format!("三角形の2つの内角が {a1}° と {a2}° のとき、残りの1つの内角の大きさは何度ですか？"),
        a3.to_string(),
        format!("三角形の内角の和は180°です。180 - {a1} - {a2} = {a3}°。"),
      ))
    }
    Difficulty::Standard => {
      let sides = ctx.int(5, 8);
      let total = (sides - 2) * 180;
      Ok(Problem::new(
        format!("{sides}角形の内角の和を求めなさい。"),
        total.to_string(),
        format!("n角形の内角の和は (n-2)×180° で求められます。({sides} - 2) × 180° = {total}°。"),
      ))
    }
    Difficulty::Advanced => {
      let sides = ctx.pick(&[5, 6, 8, 9, 10]);
      if ctx.coin() {
        let one = (sides - 2) * 180 / sides;
        Ok(Problem::new(
          format!("正{sides}角形の1つの内角の大きさを求めなさい。"),
          one.to_string(),
          format!("正{sides}角形の内角の和は {}°。これを{sides}で割ると、1つの内角は {one}°。", (sides - 2) * 180),
        ))
      } else {
        let one = 360 / sides;
        Ok(Problem::new(
          format!("正{sides}角形の1つの外角の大きさを求めなさい。"),
          one.to_string(),
          format!("多角形の外角の和は常に360°です。正{sides}角形なので、360 ÷ {sides} = {one}°。"),
        ))
      }
    }
  }
}

/// Congruence conditions with the blank each one asks for.
const CONDITIONS: &[(&str, &str)] = &[
  ("[ ]がそれぞれ等しい", "3組の辺"),
  ("2組の辺とその[ ]の角がそれぞれ等しい", "間"),
  ("1組の辺とその[ ]の角がそれぞれ等しい", "両端"),
];

fn proof_fill_in_the_blank(ctx: &mut GenContext<'_>, d: Difficulty) -> Result<Problem, GenerateError> {
  match d {
    Difficulty::Basic => {
      let (condition, blank) = ctx.pick(CONDITIONS);
      Ok(Problem::new(
        format!("三角形の合同条件「{condition}」の、[ ]にあてはまる言葉を答えなさい。"),
        blank,
        "三角形の合同条件は、「3組の辺」「2組の辺とその間の角」「1組の辺とその両端の角」がそれぞれ等しい、の3つです。",
      ))
    }
    Difficulty::Standard => Ok(Problem::new(
      "△ABCと△DEFで、AB=DE, BC=EFのとき、あと1つ「辺」に関する条件を追加して合同にするには、何が等しければよいですか？(〇=△の形で)",
      "ac=df",
      "2組の辺が等しいので、残りの1組の辺(AC=DF)が等しければ「3組の辺がそれぞれ等しい」で合同になります。",
    )),
    Difficulty::Advanced => Ok(Problem::new(
      "△ABCと△DEFで、AB=DE, ∠B=∠Eのとき、合同条件「1組の辺とその両端の角がそれぞれ等しい」を使うには、あとどの「角」が等しい必要がありますか？(角〇=角△の形で)",
      "a=d",
      "辺ABの両端の角は∠Aと∠Bです。辺DEの両端の角は∠Dと∠Eです。∠B=∠Eがわかっているので、残りの∠A=∠Dが等しければ合同が証明できます。",
    )),
  }
}

#[cfg(test)]
mod tests {
  use super::super::testkit::forced;
  use super::*;
  use crate::normalizer::answers_match;
  use rand::{rngs::StdRng, SeedableRng};

  #[test]
  fn elimination_basic_system() {
    // x=2, y=-3; second equation x - y
    let p = forced("m2_simultaneous_equations_elimination", Difficulty::Basic, &[2, -3], &[0.9]);
    assert_eq!(p.text, "連立方程式を解きなさい: x + y = -1,  x - y = 5 (x= ,y= の形で)");
    assert_eq!(p.answer, "x=2,y=-3");
    assert!(answers_match("ｘ＝２，ｙ＝－３", &p.answer));
  }

  #[test]
  fn systems_are_never_singular() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut ctx = GenContext::new(&mut rng, 64);
    for _ in 0..500 {
      for d in Difficulty::ALL {
        simultaneous_elimination(&mut ctx, d).unwrap();
        simultaneous_substitution(&mut ctx, d).unwrap();
      }
    }
  }

  #[test]
  fn slope_intercept_answer() {
    // a=-1, b=0
    let p = forced("m2_linear_functions_equation", Difficulty::Standard, &[-1, 0, -2, 3], &[]);
    assert_eq!(p.text, "2点(-2, 2), (3, -3)を通る一次関数の式を求めなさい。(y=ax+bの形で)");
    assert_eq!(p.answer, "y=-x");
  }

  #[test]
  fn binomial_product() {
    let p = forced("m2_expression_expansion_basic", Difficulty::Standard, &[3, -2], &[]);
    assert_eq!(p.text, "(x + 3)(x - 2) を展開しなさい。");
    assert_eq!(p.answer, "x^2+x-6");
  }

  #[test]
  fn proof_answers_accept_angle_notation() {
    let p = forced("m2_proof_fill_in_the_blank", Difficulty::Advanced, &[], &[]);
    assert!(answers_match("角A=角D", &p.answer));
    assert!(answers_match("角D=角A", &p.answer));
    let p = forced("m2_proof_fill_in_the_blank", Difficulty::Standard, &[], &[]);
    assert!(answers_match("AC=DF", &p.answer));
    assert!(answers_match("DF = CA", &p.answer));
    let p = forced("m2_proof_fill_in_the_blank", Difficulty::Basic, &[1], &[]);
    assert_eq!(p.text, "三角形の合同条件「2組の辺とその[ ]の角がそれぞれ等しい」の、[ ]にあてはまる言葉を答えなさい。");
    assert_eq!(p.answer, "間");
  }

  #[test]
  fn regular_polygon_angles_are_whole() {
    let p = forced("m2_angle_problems", Difficulty::Advanced, &[2], &[0.1]);
    assert_eq!(p.answer, "135");
    let p = forced("m2_angle_problems", Difficulty::Advanced, &[3], &[0.9]);
    assert_eq!(p.answer, "40");
  }
}
