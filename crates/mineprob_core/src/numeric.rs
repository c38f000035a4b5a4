//! Exact numeric kernel
//!
//! A rational number type over `BigInt`, plus significand/exponent helpers
//! for turning astronomically large integers into floats without overflow.
//!
//! The ordering on [`Rational`] is exact cross-multiplication. Move selection
//! and probability comparisons go through it; floating point is only ever
//! produced at the very edge for display and diagnostics.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Exact rational number (numerator / denominator)
///
/// Always held in lowest terms with a strictly positive denominator, so the
/// derived equality is structural equality of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rational {
    pub numerator: BigInt,
    pub denominator: BigInt,
}

impl Rational {
    /// Create a new rational number from numerator and denominator
    pub fn new(num: BigInt, den: BigInt) -> Self {
        let mut r = Self {
            numerator: num,
            denominator: den,
        };
        r.reduce();
        r
    }

    /// Create a rational from an integer
    pub fn from_int<T: Into<BigInt>>(n: T) -> Self {
        Self {
            numerator: n.into(),
            denominator: BigInt::one(),
        }
    }

    /// Exact quotient of two unsigned big integers
    pub fn from_biguint_ratio(num: &BigUint, den: &BigUint) -> Self {
        Self::new(BigInt::from(num.clone()), BigInt::from(den.clone()))
    }

    /// Create zero
    pub fn zero() -> Self {
        Self {
            numerator: BigInt::zero(),
            denominator: BigInt::one(),
        }
    }

    /// Create one
    pub fn one() -> Self {
        Self {
            numerator: BigInt::one(),
            denominator: BigInt::one(),
        }
    }

    /// Check if this rational is zero
    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    /// Check if this rational is exactly one
    pub fn is_one(&self) -> bool {
        self.numerator == self.denominator
    }

    /// Approximate as `f64` through the significand/exponent split.
    ///
    /// Both halves of the fraction may be thousands of bits wide; neither is
    /// ever cast to a float directly.
    pub fn to_f64(&self) -> f64 {
        let mag = big_ratio_f64(self.numerator.magnitude(), self.denominator.magnitude());
        if self.numerator.is_negative() {
            -mag
        } else {
            mag
        }
    }

    /// Reduce to lowest terms
    fn reduce(&mut self) {
        if self.numerator.is_zero() {
            self.denominator = BigInt::one();
            return;
        }

        let g = self.numerator.gcd(&self.denominator);
        self.numerator = &self.numerator / &g;
        self.denominator = &self.denominator / &g;

        // Keep the denominator positive so comparisons need no sign fixups
        if self.denominator.is_negative() {
            self.numerator = -&self.numerator;
            self.denominator = -&self.denominator;
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == BigInt::one() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_int(n)
    }
}

impl Ord for Rational {
    /// Exact comparison by cross-multiplication. Denominators are positive
    /// by construction, so no sign adjustment is needed.
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Rational {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let num = &self.numerator * &other.denominator + &other.numerator * &self.denominator;
        let den = &self.denominator * &other.denominator;
        Self::new(num, den)
    }
}

impl Add for &Rational {
    type Output = Rational;

    fn add(self, other: Self) -> Rational {
        let num = &self.numerator * &other.denominator + &other.numerator * &self.denominator;
        let den = &self.denominator * &other.denominator;
        Rational::new(num, den)
    }
}

impl AddAssign<&Rational> for Rational {
    fn add_assign(&mut self, other: &Rational) {
        *self = &*self + other;
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        let num = &self.numerator * &other.denominator - &other.numerator * &self.denominator;
        let den = &self.denominator * &other.denominator;
        Self::new(num, den)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let num = &self.numerator * &other.numerator;
        let den = &self.denominator * &other.denominator;
        Self::new(num, den)
    }
}

impl Mul for &Rational {
    type Output = Rational;

    fn mul(self, other: Self) -> Rational {
        let num = &self.numerator * &other.numerator;
        let den = &self.denominator * &other.denominator;
        Rational::new(num, den)
    }
}

impl Div for Rational {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        let num = &self.numerator * &other.denominator;
        let den = &self.denominator * &other.numerator;
        Self::new(num, den)
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            numerator: -self.numerator,
            denominator: self.denominator,
        }
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |acc, r| acc + r)
    }
}

/// Top 64 bits of `a` plus the count of bits shifted away.
fn split_top_bits(a: &BigUint) -> (u64, u64) {
    let bits = a.bits();
    if bits <= 64 {
        (a.to_u64().expect("value fits in 64 bits"), 0)
    } else {
        let shift = bits - 64;
        let top = (a >> (shift as usize))
            .to_u64()
            .expect("top bits fit in 64 bits");
        (top, shift)
    }
}

/// `a / b` as `f64` for unsigned integers of unbounded width.
///
/// Splits each operand into a 64-bit significand and a power-of-two exponent
/// and recombines with `powi`, so the result stays finite and accurate to
/// float precision even when both operands overflow `f64` on their own.
pub fn big_ratio_f64(a: &BigUint, b: &BigUint) -> f64 {
    if a.is_zero() {
        return 0.0;
    }
    debug_assert!(!b.is_zero(), "ratio denominator must be nonzero");
    let (ma, ea) = split_top_bits(a);
    let (mb, eb) = split_top_bits(b);
    (ma as f64 / mb as f64) * 2f64.powi(ea as i32 - eb as i32)
}

/// Base-2 logarithm of an unsigned integer of unbounded width.
pub fn big_log2(a: &BigUint) -> f64 {
    if a.is_zero() {
        return f64::NEG_INFINITY;
    }
    let (m, e) = split_top_bits(a);
    (m as f64).log2() + e as f64
}
