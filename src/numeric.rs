//! Integer arithmetic and randomness primitives shared by the generators.
//!
//! Generators never touch a concrete RNG. They draw through `RandomSource`,
//! which any `rand::Rng` satisfies, so tests can script exact draws.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;

/// Source of uniform draws.
pub trait RandomSource {
  /// Uniform integer in `[min, max]`, both ends inclusive.
  fn int_in(&mut self, min: i64, max: i64) -> i64;
  /// Uniform float in `[0, 1)`.
  fn unit(&mut self) -> f64;
}

impl<R: Rng> RandomSource for R {
  fn int_in(&mut self, min: i64, max: i64) -> i64 {
    self.gen_range(min..=max)
  }

  fn unit(&mut self) -> f64 {
    self.gen::<f64>()
  }
}

/// Uniform integer in `[min, max]` that is not in `exclude`.
///
/// Panics when the range is empty or fully excluded; that is a caller bug,
/// not a sampling outcome.
pub fn rand_int(rng: &mut dyn RandomSource, min: i64, max: i64, exclude: &[i64]) -> i64 {
  assert!(min <= max, "rand_int: empty range {min}..={max}");
  assert!(
    (min..=max).any(|v| !exclude.contains(&v)),
    "rand_int: exclusion list {exclude:?} covers {min}..={max}"
  );
  loop {
    let n = rng.int_in(min, max);
    if !exclude.contains(&n) {
      return n;
    }
  }
}

/// Fair coin: true when the unit draw falls below one half.
pub fn coin(rng: &mut dyn RandomSource) -> bool {
  rng.unit() < 0.5
}

/// Uniformly chosen element. Panics on an empty slice.
pub fn pick<T: Clone>(rng: &mut dyn RandomSource, items: &[T]) -> T {
  assert!(!items.is_empty(), "pick from an empty slice");
  let i = rng.int_in(0, items.len() as i64 - 1);
  items[i as usize].clone()
}

pub fn gcd(a: i64, b: i64) -> i64 {
  let (a, b) = (a.abs(), b.abs());
  if b == 0 { a } else { gcd(b, a % b) }
}

pub fn lcm(a: i64, b: i64) -> i64 {
  if a == 0 || b == 0 {
    return 0;
  }
  (a / gcd(a, b) * b).abs()
}

/// Trial-division factorization; keys are primes in ascending order.
pub fn prime_factorize(mut n: u64) -> BTreeMap<u64, u32> {
  let mut factors = BTreeMap::new();
  let mut d = 2;
  while d * d <= n {
    while n % d == 0 {
      *factors.entry(d).or_insert(0) += 1;
      n /= d;
    }
    d += 1;
  }
  if n > 1 {
    *factors.entry(n).or_insert(0) += 1;
  }
  factors
}

/// Splits `n` into `(outside, inside)` with `outside^2 * inside == n` and `inside` square-free.
pub fn simplify_sqrt(n: u64) -> (u64, u64) {
  let mut outside = 1;
  let mut inside = 1;
  for (p, e) in prime_factorize(n) {
    outside *= p.pow(e / 2);
    inside *= p.pow(e % 2);
  }
  (outside, inside)
}

/// Renders `coef√radicand` after pulling out square factors: 8 → "2√2", 9 → "3", 5 → "√5".
pub fn sqrt_string(coef: i64, radicand: u64) -> String {
  let (out, inside) = simplify_sqrt(radicand);
  let k = coef * out as i64;
  if inside == 1 {
    return k.to_string();
  }
  match k {
    1 => format!("√{inside}"),
    -1 => format!("-√{inside}"),
    _ => format!("{k}√{inside}"),
  }
}

/// Rounds the positive quotient `num / den` half-up to an integer.
pub fn round_div(num: i64, den: i64) -> i64 {
  (2 * num + den) / (2 * den)
}

/// Exact rational number, always stored reduced with a positive denominator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fraction {
  num: i64,
  den: i64,
}

impl Fraction {
  pub fn new(num: i64, den: i64) -> Self {
    assert!(den != 0, "Fraction with zero denominator");
    let g = gcd(num, den).max(1);
    let sign = if den < 0 { -1 } else { 1 };
    Self { num: sign * num / g, den: sign * den / g }
  }

  pub fn whole(n: i64) -> Self {
    Self { num: n, den: 1 }
  }

  pub fn num(&self) -> i64 {
    self.num
  }

  pub fn den(&self) -> i64 {
    self.den
  }

  pub fn is_integer(&self) -> bool {
    self.den == 1
  }

  pub fn add(self, o: Fraction) -> Fraction {
    Fraction::new(self.num * o.den + o.num * self.den, self.den * o.den)
  }

  pub fn sub(self, o: Fraction) -> Fraction {
    Fraction::new(self.num * o.den - o.num * self.den, self.den * o.den)
  }

  pub fn mul(self, o: Fraction) -> Fraction {
    Fraction::new(self.num * o.num, self.den * o.den)
  }

  /// Panics on division by zero.
  pub fn div(self, o: Fraction) -> Fraction {
    Fraction::new(self.num * o.den, self.den * o.num)
  }

  /// Mixed-number rendering: "1と1/3", "-2と1/2". Proper fractions and integers
  /// render as with `Display`.
  pub fn to_mixed_string(&self) -> String {
    let abs = self.num.abs();
    if self.den == 1 || abs < self.den {
      return self.to_string();
    }
    let sign = if self.num < 0 { "-" } else { "" };
    format!("{sign}{}と{}/{}", abs / self.den, abs % self.den, self.den)
  }
}

impl fmt::Display for Fraction {
  /// Improper-fraction rendering: "4/3", "-1/2", "3".
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.den == 1 {
      write!(f, "{}", self.num)
    } else {
      write!(f, "{}/{}", self.num, self.den)
    }
  }
}

impl PartialOrd for Fraction {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Fraction {
  fn cmp(&self, other: &Self) -> Ordering {
    (self.num as i128 * other.den as i128).cmp(&(other.num as i128 * self.den as i128))
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use rand::{rngs::StdRng, SeedableRng};

  #[test]
  fn rand_int_respects_exclusions() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..500 {
      let n = rand_int(&mut rng, -3, 3, &[0, 1, -1]);
      assert!((-3..=3).contains(&n));
      assert!(![0, 1, -1].contains(&n));
    }
  }

  #[test]
  #[should_panic(expected = "covers")]
  fn rand_int_rejects_fully_excluded_range() {
    let mut rng = StdRng::seed_from_u64(1);
    rand_int(&mut rng, 1, 2, &[1, 2]);
  }

  #[test]
  fn gcd_lcm_basics() {
    assert_eq!(gcd(12, 18), 6);
    assert_eq!(gcd(-12, 18), 6);
    assert_eq!(gcd(7, 0), 7);
    assert_eq!(lcm(4, 6), 12);
    assert_eq!(lcm(lcm(4, 6), 9), 36);
  }

  #[test]
  fn factorization_and_sqrt() {
    let f = prime_factorize(72);
    assert_eq!(f.into_iter().collect::<Vec<_>>(), vec![(2, 3), (3, 2)]);
    assert_eq!(simplify_sqrt(12), (2, 3));
    assert_eq!(sqrt_string(1, 8), "2√2");
    assert_eq!(sqrt_string(1, 9), "3");
    assert_eq!(sqrt_string(1, 5), "√5");
    assert_eq!(sqrt_string(3, 2), "3√2");
  }

  #[test]
  fn fractions_reduce_and_render() {
    assert_eq!(Fraction::new(6, 8).to_string(), "3/4");
    assert_eq!(Fraction::new(3, -6).to_string(), "-1/2");
    assert_eq!(Fraction::new(8, 4).to_string(), "2");
    assert_eq!(Fraction::new(0, 5).to_string(), "0");
    assert_eq!(Fraction::new(4, 3).to_mixed_string(), "1と1/3");
    assert_eq!(Fraction::new(-5, 2).to_mixed_string(), "-2と1/2");
    assert_eq!(Fraction::new(2, 3).to_mixed_string(), "2/3");
    assert_eq!(Fraction::new(1, 2).add(Fraction::new(1, 3)).to_string(), "5/6");
    assert_eq!(Fraction::new(3, 4).div(Fraction::new(3, 8)).to_string(), "2");
    assert!(Fraction::new(-3, 2) < Fraction::whole(-1));
  }

  #[test]
  fn round_div_is_half_up() {
    assert_eq!(round_div(5, 2), 3);
    assert_eq!(round_div(7, 3), 2);
    assert_eq!(round_div(10, 4), 3);
  }
}
