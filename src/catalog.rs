//! Curriculum catalog: the built-in topics per grade plus any configured extras.

use tracing::warn;

use crate::config::TopicCfg;
use crate::domain::{Grade, Topic};

static BUILTIN: &[(Grade, &str, &str)] = &[
  (Grade::G4, "g4_addition_subtraction", "3桁以上の筆算（足し算・引き算）"),
  (Grade::G4, "g4_multiplication", "かけ算（2桁×2桁）"),
  (Grade::G4, "g4_division", "わり算（2桁÷1桁）"),
  (Grade::G4, "g4_fractions_intro", "分数の大小比較"),
  (Grade::G4, "g4_rounding", "がい算（概数）"),
  (Grade::G4, "g4_unit_conversion", "単位換算"),
  (Grade::G4, "g4_rectangle_area", "長方形の面積"),
  (Grade::G5, "g5_decimals_multiplication", "小数のかけ算"),
  (Grade::G5, "g5_decimals_division", "小数のわり算"),
  (Grade::G5, "g5_fractions_simplify", "分数の約分"),
  (Grade::G5, "g5_fractions_common_denominator", "分数の通分"),
  (Grade::G5, "g5_fractions_addition", "分数の足し算（同分母）"),
  (Grade::G5, "g5_fractions_subtraction", "分数の引き算（同分母）"),
  (Grade::G5, "g5_percentages", "割合（百分率）"),
  (Grade::G5, "g5_common_multiples", "最小公倍数"),
  (Grade::G5, "g5_common_divisors", "最大公約数"),
  (Grade::G5, "g5_triangle_area", "三角形の面積"),
  (Grade::G6, "g6_fractions_addition", "分数の足し算（異分母）"),
  (Grade::G6, "g6_fractions_subtraction", "分数の引き算（異分母）"),
  (Grade::G6, "g6_fractions_multiplication", "分数のかけ算"),
  (Grade::G6, "g6_fractions_division", "分数のわり算"),
  (Grade::G6, "g6_speed", "速さを求める計算"),
  (Grade::G6, "g6_time", "時間を求める計算"),
  (Grade::G6, "g6_distance", "距離を求める計算"),
  (Grade::G6, "g6_ratios", "比の計算"),
  (Grade::G6, "g6_per_unit_quantity", "単位量あたりの大きさ"),
  (Grade::G6, "g6_circle_area", "円の面積"),
  (Grade::M1, "m1_int_addition", "正負の数：足し算"),
  (Grade::M1, "m1_int_subtraction", "正負の数：引き算"),
  (Grade::M1, "m1_int_multiplication", "正負の数：かけ算"),
  (Grade::M1, "m1_int_division", "正負の数：わり算"),
  (Grade::M1, "m1_algebra_simplify", "文字式：同類項の整理"),
  (Grade::M1, "m1_algebra_distributive", "文字式：分配法則"),
  (Grade::M1, "m1_linear_equations_basic", "一次方程式：基本"),
  (Grade::M1, "m1_linear_equations_parentheses", "一次方程式：かっこ"),
  (Grade::M1, "m1_direct_proportion", "比例の計算"),
  (Grade::M1, "m1_inverse_proportion", "反比例の計算"),
  (Grade::M1, "m1_prime_factorization", "素因数分解"),
  (Grade::M1, "m1_solid_volume", "立体の体積"),
  (Grade::M2, "m2_simultaneous_equations_elimination", "連立方程式（加減法）"),
  (Grade::M2, "m2_simultaneous_equations_substitution", "連立方程式（代入法）"),
  (Grade::M2, "m2_linear_functions_value", "一次関数（値の計算）"),
  (Grade::M2, "m2_linear_functions_equation", "一次関数（式の決定）"),
  (Grade::M2, "m2_expression_expansion_basic", "式の展開（基本）"),
  (Grade::M2, "m2_expression_expansion_formula", "式の展開（公式）"),
  (Grade::M2, "m2_angle_problems", "多角形の角度"),
  (Grade::M2, "m2_proof_fill_in_the_blank", "合同の証明（穴埋め）"),
  (Grade::M3, "m3_factorization_basic", "因数分解（x²+bx+c）"),
  (Grade::M3, "m3_factorization_common_factor", "因数分解（共通因数）"),
  (Grade::M3, "m3_factorization_formula", "因数分解（公式）"),
  (Grade::M3, "m3_square_roots_simplify", "平方根の簡略化"),
  (Grade::M3, "m3_square_roots_calculation", "平方根の計算"),
  (Grade::M3, "m3_quadratic_equations_factorization", "二次方程式（因数分解）"),
  (Grade::M3, "m3_quadratic_equations_formula", "二次方程式（解の公式）"),
  (Grade::M3, "m3_pythagorean_theorem", "三平方の定理"),
];

#[derive(Clone, Debug)]
pub struct Catalog {
  entries: Vec<(Grade, Topic)>,
}

impl Default for Catalog {
  fn default() -> Self {
    Self::builtin()
  }
}

impl Catalog {
  pub fn builtin() -> Self {
    let entries = BUILTIN.iter().map(|(g, id, name)| (*g, Topic::new(*id, *name))).collect();
    Self { entries }
  }

  /// Appends configured topics; ids already in the catalog are ignored.
  /// An id whose prefix names another grade ("g4_..." filed under 中3) is
  /// skipped, since generators are resolved by that prefix.
  pub fn with_extra(mut self, extra: &[TopicCfg]) -> Self {
    for t in extra {
      let prefix = t.id.split('_').next().unwrap_or_default();
      if let Some(owner) = Grade::from_prefix(prefix).filter(|g| *g != t.grade) {
        warn!(
          target: "keisan_backend",
          id = %t.id,
          configured = t.grade.label(),
          owner = owner.label(),
          "Extra topic filed under the wrong grade; skipped"
        );
        continue;
      }
      if self.find(&t.id).is_none() {
        self.entries.push((t.grade, Topic::new(t.id.clone(), t.name.clone())));
      }
    }
    self
  }

  pub fn all(&self) -> impl Iterator<Item = (Grade, &Topic)> {
    self.entries.iter().map(|(g, t)| (*g, t))
  }

  pub fn topics_for(&self, grade: Grade) -> Vec<&Topic> {
    self.entries.iter().filter(|(g, _)| *g == grade).map(|(_, t)| t).collect()
  }

  pub fn find(&self, id: &str) -> Option<(Grade, &Topic)> {
    self.entries.iter().find(|(_, t)| t.id == id).map(|(g, t)| (*g, t))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtin_topics_carry_their_grade_prefix() {
    let c = Catalog::builtin();
    assert_eq!(c.len(), 55);
    for (grade, topic) in c.all() {
      assert!(topic.id.starts_with(grade.prefix()), "{} filed under {}", topic.id, grade.label());
    }
    assert_eq!(c.topics_for(Grade::M1).len(), 12);
    assert_eq!(c.topics_for(Grade::G4)[0].id, "g4_addition_subtraction");
  }

  #[test]
  fn extras_append_without_overriding() {
    let extra = vec![
      TopicCfg { grade: Grade::M3, id: "m3_statistics".into(), name: "標本調査".into() },
      TopicCfg { grade: Grade::G4, id: "g4_division".into(), name: "dup".into() },
    ];
    let c = Catalog::builtin().with_extra(&extra);
    assert_eq!(c.len(), 56);
    assert_eq!(c.find("m3_statistics").map(|(g, _)| g), Some(Grade::M3));
    assert_eq!(c.find("g4_division").map(|(_, t)| t.name.as_str()), Some("わり算（2桁÷1桁）"));
  }

  #[test]
  fn extras_must_match_their_grade_prefix() {
    let extra = vec![
      TopicCfg { grade: Grade::M3, id: "g4_long_division".into(), name: "筆算".into() },
      TopicCfg { grade: Grade::M2, id: "stats_boxplot".into(), name: "箱ひげ図".into() },
    ];
    let c = Catalog::builtin().with_extra(&extra);
    assert!(c.find("g4_long_division").is_none());
    assert_eq!(c.find("stats_boxplot").map(|(g, _)| g), Some(Grade::M2));
    assert_eq!(c.len(), 56);
  }
}
