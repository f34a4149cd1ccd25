// Copyright 2024 The Qubla Developers
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except
// in compliance with the License.You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License
// is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express
// or implied. See the License for the specific language governing permissions and limitations under
// the License.

use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

fn gcd(mut x: i64, mut y: i64) -> i64 {
    while y != 0 {
        let t = x % y;
        x = y;
        y = t;
    }
    x.abs()
}

/// An exact rational value carrying the representation it was written in.
///
/// Three source shapes are distinguished (`Int`, `Decimal`, `Frac`) because
/// the surrounding language keeps literals in the form the programmer wrote
/// them for display purposes; arithmetic always normalizes denominators but
/// a `Decimal` numerator/denominator pair stays a power of ten rather than
/// being reduced like a general fraction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Rational {
    Int(i64),
    /// Numerator over a power-of-ten denominator, e.g. `3.14` → `(314, 100)`.
    Decimal(i64, i64),
    Frac(i64, i64),
}

impl Rational {
    pub const ZERO: Rational = Rational::Int(0);
    pub const ONE: Rational = Rational::Int(1);

    #[must_use]
    pub fn int(value: i64) -> Self {
        Rational::Int(value)
    }

    /// Build a decimal rational from a numerator/denominator pair, reducing
    /// trailing factors of ten and collapsing to `Int` when possible.
    #[must_use]
    pub fn decimal(mut numer: i64, mut denom: i64) -> Self {
        if numer == 0 {
            return Rational::Int(0);
        }
        if denom < 0 {
            numer = -numer;
            denom = -denom;
        }
        while numer % 10 == 0 && denom > 1 {
            numer /= 10;
            denom /= 10;
        }
        if denom == 1 {
            Rational::Int(numer)
        } else {
            Rational::Decimal(numer, denom)
        }
    }

    /// Build a fraction, reducing by the gcd and collapsing to `Int` when
    /// the denominator becomes 1.
    #[must_use]
    pub fn frac(mut numer: i64, mut denom: i64) -> Self {
        if numer == 0 {
            return Rational::Int(0);
        }
        if denom < 0 {
            numer = -numer;
            denom = -denom;
        }
        let div = gcd(numer, denom);
        numer /= div;
        denom /= div;
        if denom == 1 {
            Rational::Int(numer)
        } else {
            Rational::Frac(numer, denom)
        }
    }

    /// Parse the shortest exact decimal expansion of `x`, mirroring the
    /// source language's decimal-literal lowering (`RationalValue.fromdec`).
    #[must_use]
    pub fn from_f64_decimal(x: f64) -> Self {
        let mut denom: i64 = 1;
        let mut numer: i64 = x.floor() as i64;
        for _ in 0..400 {
            let scaled = x * denom as f64;
            let truncated = scaled.floor();
            if (scaled - truncated).abs() < f64::EPSILON {
                numer = truncated as i64;
                break;
            }
            denom *= 10;
            numer = (x * denom as f64).floor() as i64;
        }
        Rational::decimal(numer, denom)
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        match *self {
            Rational::Int(v) => v < 0,
            Rational::Decimal(n, _) | Rational::Frac(n, _) => n < 0,
        }
    }

    #[must_use]
    pub fn evaluate(&self) -> f64 {
        match *self {
            Rational::Int(v) => v as f64,
            Rational::Decimal(n, d) | Rational::Frac(n, d) => n as f64 / d as f64,
        }
    }

    fn parts(&self) -> (i64, i64) {
        match *self {
            Rational::Int(v) => (v, 1),
            Rational::Decimal(n, d) | Rational::Frac(n, d) => (n, d),
        }
    }

    fn is_decimal_like(&self) -> bool {
        matches!(self, Rational::Decimal(..))
    }

    fn is_frac_like(&self) -> bool {
        matches!(self, Rational::Frac(..))
    }
}

impl Add for Rational {
    type Output = Rational;
    fn add(self, rhs: Rational) -> Rational {
        addsub(self, rhs, true)
    }
}

impl Sub for Rational {
    type Output = Rational;
    fn sub(self, rhs: Rational) -> Rational {
        addsub(self, rhs, false)
    }
}

fn addsub(lhs: Rational, rhs: Rational, add: bool) -> Rational {
    if let (Rational::Int(a), Rational::Int(b)) = (lhs, rhs) {
        return Rational::Int(if add { a + b } else { a - b });
    }
    let (n1, d1) = lhs.parts();
    let (n2, d2) = rhs.parts();
    let x1 = n1 * d2;
    let x2 = n2 * d1;
    let numer = if add { x1 + x2 } else { x1 - x2 };
    let denom = d1 * d2;
    if lhs.is_frac_like() || rhs.is_frac_like() {
        Rational::frac(numer, denom)
    } else if lhs.is_decimal_like() || rhs.is_decimal_like() {
        Rational::decimal(numer, denom)
    } else {
        Rational::frac(numer, denom)
    }
}

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        match self {
            Rational::Int(v) => Rational::Int(-v),
            Rational::Decimal(n, d) => Rational::Decimal(-n, d),
            Rational::Frac(n, d) => Rational::Frac(-n, d),
        }
    }
}

impl Mul for Rational {
    type Output = Rational;
    fn mul(self, rhs: Rational) -> Rational {
        if let (Rational::Int(a), Rational::Int(b)) = (self, rhs) {
            return Rational::Int(a * b);
        }
        let (n1, d1) = self.parts();
        let (n2, d2) = rhs.parts();
        let numer = n1 * n2;
        let denom = d1 * d2;
        if self.is_frac_like() || rhs.is_frac_like() {
            Rational::frac(numer, denom)
        } else {
            Rational::decimal(numer, denom)
        }
    }
}

impl Div for Rational {
    type Output = Rational;
    /// # Panics
    /// Panics if `rhs` is zero. Callers at the value-model boundary should
    /// check for zero beforehand and raise `CoreError::DivisionByZero`.
    fn div(self, rhs: Rational) -> Rational {
        let (n2, d2) = rhs.parts();
        assert!(n2 != 0, "division by zero");
        let (n1, d1) = self.parts();
        Rational::frac(n1 * d2, d1 * n2)
    }
}

impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        let (n1, d1) = self.parts();
        let (n2, d2) = other.parts();
        n1 * d2 == n2 * d1
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Rational::ZERO
    }
    fn is_zero(&self) -> bool {
        *self == Rational::ZERO
    }
}

impl One for Rational {
    fn one() -> Self {
        Rational::ONE
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Rational::Int(v) => write!(f, "{v}"),
            Rational::Decimal(n, d) => write!(f, "{}", n as f64 / d as f64),
            Rational::Frac(n, d) => {
                if n < 0 {
                    write!(f, "-({}/{})", -n, d)
                } else {
                    write!(f, "{n}/{d}")
                }
            }
        }
    }
}
