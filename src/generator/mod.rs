//! Procedural question generation.
//!
//! Each topic id maps to one generator function. The first two characters of
//! the id select a grade-level module through `GRADE_TABLE`; the module then
//! resolves the full id. Ids nobody claims produce the "not ready" placeholder.
//!
//! Generators are pure functions of (difficulty, draws). All randomness goes
//! through `GenContext`, and draws that would produce a degenerate problem are
//! rejected and redrawn via `GenContext::resample` up to a fixed cap.

use tracing::{debug, instrument, warn};

use crate::domain::{Difficulty, Question, Topic, NOT_READY_ID};
use crate::error::GenerateError;
use crate::figure::Figure;
use crate::numeric::{self, RandomSource};

mod grade4;
mod grade5;
mod grade6;
mod middle1;
mod middle2;
mod middle3;

pub const DEFAULT_MAX_RETRIES: usize = 64;

/// One generated problem instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Problem {
  pub text: String,
  pub answer: String,
  pub explanation: String,
  pub figure: Option<Figure>,
}

impl Problem {
  pub fn new(text: impl Into<String>, answer: impl Into<String>, explanation: impl Into<String>) -> Self {
    Self { text: text.into(), answer: answer.into(), explanation: explanation.into(), figure: None }
  }

  pub fn with_figure(mut self, figure: Figure) -> Self {
    self.figure = Some(figure);
    self
  }

  /// Placeholder for a topic without a generator: fixed text, empty answer.
  pub fn not_ready(topic: &Topic) -> Self {
    Self::new(format!("「{}」の問題は準備中です。", topic.name), "", "")
  }

  pub fn is_not_ready(&self) -> bool {
    self.answer.is_empty()
  }

  pub fn into_question(self, id: i64) -> Question {
    Question { id, text: self.text, answer: self.answer, explanation: self.explanation, figure: self.figure }
  }
}

/// Draw helpers handed to every generator.
pub struct GenContext<'a> {
  rng: &'a mut dyn RandomSource,
  max_retries: usize,
}

impl<'a> GenContext<'a> {
  pub fn new(rng: &'a mut dyn RandomSource, max_retries: usize) -> Self {
    Self { rng, max_retries: max_retries.max(1) }
  }

  pub fn int(&mut self, min: i64, max: i64) -> i64 {
    numeric::rand_int(&mut *self.rng, min, max, &[])
  }

  pub fn int_excl(&mut self, min: i64, max: i64, exclude: &[i64]) -> i64 {
    numeric::rand_int(&mut *self.rng, min, max, exclude)
  }

  pub fn coin(&mut self) -> bool {
    numeric::coin(&mut *self.rng)
  }

  /// +1 or -1 with equal odds.
  pub fn sign(&mut self) -> i64 {
    if self.coin() { 1 } else { -1 }
  }

  pub fn pick<T: Clone>(&mut self, items: &[T]) -> T {
    numeric::pick(&mut *self.rng, items)
  }

  /// Repeats `draw` until it returns `Some`, at most `max_retries` times.
  pub fn resample<T>(&mut self, topic: &str, mut draw: impl FnMut(&mut Self) -> Option<T>) -> Result<T, GenerateError> {
    for attempt in 0..self.max_retries {
      if let Some(v) = draw(self) {
        if attempt > 0 {
          debug!(target: "generator", %topic, rejected = attempt, "Degenerate draws rejected");
        }
        return Ok(v);
      }
    }
    warn!(target: "generator", %topic, tries = self.max_retries, "Rejection sampling exhausted");
    Err(GenerateError::RetriesExhausted { topic: topic.to_string(), tries: self.max_retries })
  }
}

pub type TopicFn = fn(&mut GenContext<'_>, Difficulty) -> Result<Problem, GenerateError>;

type GradeLookup = fn(&str) -> Option<TopicFn>;

static GRADE_TABLE: &[(&str, GradeLookup)] = &[
  ("g4", grade4::lookup),
  ("g5", grade5::lookup),
  ("g6", grade6::lookup),
  ("m1", middle1::lookup),
  ("m2", middle2::lookup),
  ("m3", middle3::lookup),
];

/// Generator for `topic_id`, if any grade module claims it.
pub fn resolve(topic_id: &str) -> Option<TopicFn> {
  let prefix = topic_id.get(..2)?;
  GRADE_TABLE
    .iter()
    .find(|(p, _)| *p == prefix)
    .and_then(|(_, lookup)| lookup(topic_id))
}

pub fn is_supported(topic_id: &str) -> bool {
  resolve(topic_id).is_some()
}

/// One problem for `topic`. A missing difficulty means `Standard`.
pub fn generate(topic: &Topic, difficulty: Option<Difficulty>, ctx: &mut GenContext<'_>) -> Result<Problem, GenerateError> {
  match resolve(&topic.id) {
    Some(f) => f(ctx, difficulty.unwrap_or_default()),
    None => {
      debug!(target: "generator", topic = %topic.id, "No generator; serving placeholder");
      Ok(Problem::not_ready(topic))
    }
  }
}

/// `count` questions with ids `0..count`. When every one of them is a
/// placeholder the set collapses to the single sentinel question.
#[instrument(level = "debug", target = "generator", skip(topic, rng), fields(topic = %topic.id))]
pub fn generate_question_set(
  topic: &Topic,
  count: usize,
  difficulty: Option<Difficulty>,
  rng: &mut dyn RandomSource,
  max_retries: usize,
) -> Result<Vec<Question>, GenerateError> {
  let mut ctx = GenContext::new(rng, max_retries);
  let mut problems = Vec::with_capacity(count);
  for _ in 0..count {
    problems.push(generate(topic, difficulty, &mut ctx)?);
  }

  if !problems.is_empty() && problems.iter().all(Problem::is_not_ready) {
    warn!(target: "generator", topic = %topic.id, "Topic not ready; collapsing to sentinel question");
    return Ok(vec![Problem::not_ready(topic).into_question(NOT_READY_ID)]);
  }

  Ok(problems.into_iter().enumerate().map(|(i, p)| p.into_question(i as i64)).collect())
}

#[cfg(test)]
pub(crate) mod testkit {
  use super::*;
  use crate::numeric::scripted::Scripted;

  /// Runs `topic_id` at `difficulty` with the given forced draws.
  pub fn forced(topic_id: &str, difficulty: Difficulty, ints: &[i64], units: &[f64]) -> Problem {
    let mut rng = Scripted::new(ints, units);
    let mut ctx = GenContext::new(&mut rng, DEFAULT_MAX_RETRIES);
    let f = resolve(topic_id).expect("topic has a generator");
    f(&mut ctx, difficulty).expect("generation succeeds")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Catalog;
  use crate::normalizer::normalize;
  use crate::numeric::gcd;
  use lazy_static::lazy_static;
  use rand::{rngs::StdRng, SeedableRng};
  use regex::Regex;

  lazy_static! {
    static ref PLAIN_FRACTION: Regex = Regex::new(r"(?:^|[^0-9√^])(\d+)/(\d+)").unwrap();
  }

  /// Topics whose answers are arithmetic results and must be fully reduced.
  const REDUCED_FRACTION_TOPICS: &[&str] = &[
    "g5_fractions_simplify",
    "g5_fractions_addition",
    "g5_fractions_subtraction",
    "g6_fractions_addition",
    "g6_fractions_subtraction",
    "g6_fractions_multiplication",
    "g6_fractions_division",
    "m1_algebra_simplify",
    "m1_direct_proportion",
    "m3_quadratic_equations_factorization",
    "m3_quadratic_equations_formula",
  ];

  #[test]
  fn every_catalog_topic_has_a_generator() {
    for (_, topic) in Catalog::builtin().all() {
      assert!(is_supported(&topic.id), "{} has no generator", topic.id);
    }
    assert!(!is_supported("g4"));
    assert!(!is_supported("x"));
    assert!(!is_supported("h1_calculus"));
    assert!(!is_supported("g4_calculus"));
  }

  #[test]
  fn generated_answers_are_canonical() {
    let mut rng = StdRng::seed_from_u64(2024);
    for (_, topic) in Catalog::builtin().all() {
      for difficulty in Difficulty::ALL {
        let mut ctx = GenContext::new(&mut rng, DEFAULT_MAX_RETRIES);
        for _ in 0..1000 {
          let p = generate(topic, Some(difficulty), &mut ctx)
            .unwrap_or_else(|e| panic!("{} {:?}: {e}", topic.id, difficulty));
          let ctx_msg = format!("{} {:?}: {:?}", topic.id, difficulty, p);
          assert!(!p.answer.is_empty(), "{ctx_msg}");
          assert_eq!(normalize(&p.answer), p.answer, "{ctx_msg}");
          assert!(!p.text.is_empty() && !p.explanation.is_empty(), "{ctx_msg}");
          for bad in ["{", "}", "NaN", "inf", "undefined"] {
            assert!(!p.text.contains(bad), "{ctx_msg}");
            assert!(!p.answer.contains(bad), "{ctx_msg}");
          }
          if REDUCED_FRACTION_TOPICS.contains(&topic.id.as_str()) {
            for cap in PLAIN_FRACTION.captures_iter(&p.answer) {
              let (n, d): (i64, i64) = (cap[1].parse().unwrap(), cap[2].parse().unwrap());
              assert_eq!(gcd(n, d), 1, "{ctx_msg}");
              assert!(d > 1, "{ctx_msg}");
            }
          }
        }
      }
    }
  }

  #[test]
  fn missing_difficulty_defaults_to_standard() {
    let topic = Topic::new("g6_circle_area", "円の面積");
    let mut a = StdRng::seed_from_u64(5);
    let mut b = StdRng::seed_from_u64(5);
    let p1 = generate(&topic, None, &mut GenContext::new(&mut a, 8)).unwrap();
    let p2 = generate(&topic, Some(Difficulty::Standard), &mut GenContext::new(&mut b, 8)).unwrap();
    assert_eq!(p1, p2);
  }

  #[test]
  fn question_ids_follow_generation_order() {
    let topic = Topic::new("m1_int_addition", "正負の数：足し算");
    let mut rng = StdRng::seed_from_u64(9);
    let qs = generate_question_set(&topic, 10, Some(Difficulty::Basic), &mut rng, 8).unwrap();
    assert_eq!(qs.iter().map(|q| q.id).collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
  }

  #[test]
  fn unknown_topic_collapses_to_sentinel() {
    let topic = Topic::new("m3_statistics", "標本調査");
    let mut rng = StdRng::seed_from_u64(1);
    let qs = generate_question_set(&topic, 5, None, &mut rng, 8).unwrap();
    assert_eq!(qs.len(), 1);
    assert_eq!(qs[0].id, NOT_READY_ID);
    assert!(qs[0].answer.is_empty());
    assert!(qs[0].is_not_ready());
    assert_eq!(qs[0].text, "「標本調査」の問題は準備中です。");
  }

  #[test]
  fn resample_gives_up_after_cap() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut ctx = GenContext::new(&mut rng, 4);
    let mut calls = 0;
    let r: Result<(), _> = ctx.resample("test_topic", |_| {
      calls += 1;
      None
    });
    assert_eq!(calls, 4);
    assert_eq!(r, Err(GenerateError::RetriesExhausted { topic: "test_topic".into(), tries: 4 }));
  }
}
