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

use crate::rational::Rational;
use num_complex::Complex64;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A lazily-evaluated complex expression tree.
///
/// Two rational operands combine eagerly into a new `Rect` node (exact
/// arithmetic, no floating point); an operand built from `sqrt`, `exp` or
/// `pi` keeps the whole expression symbolic until [`ComplexExpr::evaluate`]
/// is called by the unitarity test or the simulator.
#[derive(Debug, Clone)]
pub enum ComplexExpr {
    /// Exact real/imaginary rational pair.
    Rect(Rational, Rational),
    Add(Box<ComplexExpr>, Box<ComplexExpr>),
    Sub(Box<ComplexExpr>, Box<ComplexExpr>),
    Neg(Box<ComplexExpr>),
    Mul(Box<ComplexExpr>, Box<ComplexExpr>),
    Div(Box<ComplexExpr>, Box<ComplexExpr>),
    Sqrt(Box<ComplexExpr>),
    Exp(Box<ComplexExpr>),
    Pi,
}

impl ComplexExpr {
    pub const ZERO: ComplexExpr = ComplexExpr::Rect(Rational::ZERO, Rational::ZERO);

    #[must_use]
    pub fn one() -> Self {
        ComplexExpr::Rect(Rational::ONE, Rational::ZERO)
    }

    #[must_use]
    pub fn real(r: Rational) -> Self {
        ComplexExpr::Rect(r, Rational::ZERO)
    }

    #[must_use]
    pub fn rect(re: Rational, im: Rational) -> Self {
        ComplexExpr::Rect(re, im)
    }

    #[must_use]
    pub fn is_func(&self) -> bool {
        !matches!(self, ComplexExpr::Rect(..))
    }

    #[must_use]
    pub fn sqrt(self) -> Self {
        ComplexExpr::Sqrt(Box::new(self))
    }

    #[must_use]
    pub fn exp(self) -> Self {
        ComplexExpr::Exp(Box::new(self))
    }

    /// Evaluate the tree down to a floating-point complex number.
    #[must_use]
    pub fn evaluate(&self) -> Complex64 {
        match self {
            ComplexExpr::Rect(re, im) => Complex64::new(re.evaluate(), im.evaluate()),
            ComplexExpr::Add(a, b) => a.evaluate() + b.evaluate(),
            ComplexExpr::Sub(a, b) => a.evaluate() - b.evaluate(),
            ComplexExpr::Neg(a) => -a.evaluate(),
            ComplexExpr::Mul(a, b) => a.evaluate() * b.evaluate(),
            ComplexExpr::Div(a, b) => a.evaluate() / b.evaluate(),
            ComplexExpr::Sqrt(a) => a.evaluate().sqrt(),
            ComplexExpr::Exp(a) => a.evaluate().exp(),
            ComplexExpr::Pi => Complex64::new(std::f64::consts::PI, 0.0),
        }
    }
}

impl Add for ComplexExpr {
    type Output = ComplexExpr;
    fn add(self, rhs: ComplexExpr) -> ComplexExpr {
        match (self, rhs) {
            (ComplexExpr::Rect(r1, i1), ComplexExpr::Rect(r2, i2)) => {
                ComplexExpr::Rect(r1 + r2, i1 + i2)
            }
            (a, b) => ComplexExpr::Add(Box::new(a), Box::new(b)),
        }
    }
}

impl Sub for ComplexExpr {
    type Output = ComplexExpr;
    fn sub(self, rhs: ComplexExpr) -> ComplexExpr {
        match (self, rhs) {
            (ComplexExpr::Rect(r1, i1), ComplexExpr::Rect(r2, i2)) => {
                ComplexExpr::Rect(r1 - r2, i1 - i2)
            }
            (a, b) => ComplexExpr::Sub(Box::new(a), Box::new(b)),
        }
    }
}

impl Neg for ComplexExpr {
    type Output = ComplexExpr;
    fn neg(self) -> ComplexExpr {
        match self {
            ComplexExpr::Rect(r, i) => ComplexExpr::Rect(-r, -i),
            other => ComplexExpr::Neg(Box::new(other)),
        }
    }
}

impl Mul for ComplexExpr {
    type Output = ComplexExpr;
    fn mul(self, rhs: ComplexExpr) -> ComplexExpr {
        match (self, rhs) {
            (ComplexExpr::Rect(r1, i1), ComplexExpr::Rect(r2, i2)) => {
                ComplexExpr::Rect(r1 * r2 - i1 * i2, i1 * r2 + r1 * i2)
            }
            (a, b) => ComplexExpr::Mul(Box::new(a), Box::new(b)),
        }
    }
}

impl Div for ComplexExpr {
    type Output = ComplexExpr;
    fn div(self, rhs: ComplexExpr) -> ComplexExpr {
        match (self, rhs) {
            (ComplexExpr::Rect(r1, i1), ComplexExpr::Rect(r2, i2)) => {
                let denom = r2 * r2 + i2 * i2;
                ComplexExpr::Rect((r1 * r2 + i1 * i2) / denom, (i1 * r2 - r1 * i2) / denom)
            }
            (a, b) => ComplexExpr::Div(Box::new(a), Box::new(b)),
        }
    }
}

impl PartialEq for ComplexExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ComplexExpr::Rect(r1, i1), ComplexExpr::Rect(r2, i2)) => r1 == r2 && i1 == i2,
            (ComplexExpr::Add(a1, b1), ComplexExpr::Add(a2, b2))
            | (ComplexExpr::Sub(a1, b1), ComplexExpr::Sub(a2, b2))
            | (ComplexExpr::Mul(a1, b1), ComplexExpr::Mul(a2, b2))
            | (ComplexExpr::Div(a1, b1), ComplexExpr::Div(a2, b2)) => a1 == a2 && b1 == b2,
            (ComplexExpr::Neg(a1), ComplexExpr::Neg(a2))
            | (ComplexExpr::Sqrt(a1), ComplexExpr::Sqrt(a2))
            | (ComplexExpr::Exp(a1), ComplexExpr::Exp(a2)) => a1 == a2,
            (ComplexExpr::Pi, ComplexExpr::Pi) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ComplexExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexExpr::Rect(re, im) => {
                if *im == Rational::ZERO {
                    write!(f, "{re}")
                } else if *re == Rational::ZERO {
                    write!(f, "{im}i")
                } else if im.is_negative() {
                    write!(f, "{re}{im}i")
                } else {
                    write!(f, "{re}+{im}i")
                }
            }
            ComplexExpr::Add(a, b) => write!(f, "({a}+{b})"),
            ComplexExpr::Sub(a, b) => write!(f, "({a}-{b})"),
            ComplexExpr::Neg(a) => write!(f, "-{a}"),
            ComplexExpr::Mul(a, b) => write!(f, "({a}*{b})"),
            ComplexExpr::Div(a, b) => write!(f, "({a}/{b})"),
            ComplexExpr::Sqrt(a) => write!(f, "sqrt({a})"),
            ComplexExpr::Exp(a) => write!(f, "exp({a})"),
            ComplexExpr::Pi => write!(f, "\u{03c0}"),
        }
    }
}

impl Default for ComplexExpr {
    fn default() -> Self {
        ComplexExpr::ZERO
    }
}
