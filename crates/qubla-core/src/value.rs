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

use crate::complex_expr::ComplexExpr;
use crate::qubit_id::QubitId;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A single bit position inside a [`Word`] or [`StructuredWord`]: either a
/// known classical value or a wire into the qubit pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordBit {
    Classical(bool),
    Quantum(QubitId),
}

impl WordBit {
    #[must_use]
    pub fn as_qubit(self) -> Option<QubitId> {
        match self {
            WordBit::Quantum(q) => Some(q),
            WordBit::Classical(_) => None,
        }
    }

    #[must_use]
    pub fn is_quantum(self) -> bool {
        matches!(self, WordBit::Quantum(_))
    }
}

/// A fixed-width, uniformly-typed bit vector with a sign convention,
/// possibly entirely quantum.
#[derive(Debug, Clone)]
pub struct Word {
    /// Little-endian: `bits[0]` is the least-significant bit.
    pub bits: Vec<WordBit>,
    pub signed: bool,
}

impl Word {
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[must_use]
    pub fn is_all_quantum(&self) -> bool {
        self.bits.iter().all(|b| b.is_quantum())
    }

    /// Value of the bits interpreted as a classical integer, if none of
    /// them are quantum.
    #[must_use]
    pub fn as_classical(&self) -> Option<i64> {
        let mut acc: i64 = 0;
        for (i, b) in self.bits.iter().enumerate() {
            match b {
                WordBit::Classical(true) => acc |= 1 << i,
                WordBit::Classical(false) => {}
                WordBit::Quantum(_) => return None,
            }
        }
        if self.signed {
            let width = self.bits.len();
            if width > 0 && width < 64 && (acc >> (width - 1)) & 1 == 1 {
                acc -= 1 << width;
            }
        }
        Some(acc)
    }
}

/// A bit vector whose per-position classical/quantum layout is explicit and
/// need not correspond to any integer encoding (no sign convention).
#[derive(Debug, Clone)]
pub struct StructuredWord {
    pub bits: Vec<WordBit>,
}

/// A declared-width, integer-keyed mutable map.
#[derive(Debug, Clone)]
pub struct Dict {
    pub entries: Rc<RefCell<BTreeMap<i64, Value>>>,
    pub bit_width: usize,
}

/// A compiled table function's classical truth table, addressed by the
/// concatenation of its classical and qubit-enumeration input bits.
pub trait TableFunction {
    fn eval(&self, key: u64) -> u64;
    fn in_bits(&self) -> usize;
    fn out_bits(&self) -> usize;
}

/// The tagged value model. Lists, dicts and func-lists are mutable
/// containers referenced by handle; everything else is immutable w.r.t.
/// identity.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Cplx(ComplexExpr),
    Str(Rc<String>),
    Bit(bool),
    QBit(QubitId),
    Word(Word),
    StructuredWord(StructuredWord),
    List(Rc<RefCell<Vec<Value>>>),
    Dict(Dict),
    FuncList(Rc<RefCell<Vec<Value>>>),
    Func(Rc<dyn TableFunction>),
}

/// Type tag used by `cast` and by error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjType {
    Int,
    Cplx,
    Str,
    Bit,
    QBit,
    Word,
    StructuredWord,
    List,
    Dict,
    FuncList,
    Func,
}

impl fmt::Display for ObjType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjType::Int => "int",
            ObjType::Cplx => "cplx",
            ObjType::Str => "str",
            ObjType::Bit => "bit",
            ObjType::QBit => "qbit",
            ObjType::Word => "word",
            ObjType::StructuredWord => "strword",
            ObjType::List => "list",
            ObjType::Dict => "dict",
            ObjType::FuncList => "funclist",
            ObjType::Func => "func",
        };
        write!(f, "{name}")
    }
}

impl Value {
    #[must_use]
    pub fn obj_type(&self) -> ObjType {
        match self {
            Value::Int(_) => ObjType::Int,
            Value::Cplx(_) => ObjType::Cplx,
            Value::Str(_) => ObjType::Str,
            Value::Bit(_) => ObjType::Bit,
            Value::QBit(_) => ObjType::QBit,
            Value::Word(_) => ObjType::Word,
            Value::StructuredWord(_) => ObjType::StructuredWord,
            Value::List(_) => ObjType::List,
            Value::Dict(_) => ObjType::Dict,
            Value::FuncList(_) => ObjType::FuncList,
            Value::Func(_) => ObjType::Func,
        }
    }

    /// Every qubit directly reachable from this value (not recursing into
    /// list/dict contents — callers that need the full tree walk containers
    /// themselves).
    #[must_use]
    pub fn direct_qubits(&self) -> Vec<QubitId> {
        match self {
            Value::QBit(q) => vec![*q],
            Value::Word(w) => w.bits.iter().filter_map(|b| b.as_qubit()).collect(),
            Value::StructuredWord(w) => w.bits.iter().filter_map(|b| b.as_qubit()).collect(),
            _ => Vec::new(),
        }
    }

    /// Total cast function: never panics, returns `None` for unsupported
    /// source/target pairs.
    #[must_use]
    pub fn cast(&self, target: ObjType) -> Option<Value> {
        if self.obj_type() == target {
            return Some(self.clone());
        }
        match (self, target) {
            (Value::Bit(b), ObjType::Int) => Some(Value::Int(i64::from(*b))),
            (Value::Int(i), ObjType::Bit) => Some(Value::Bit(*i != 0)),
            (Value::Int(i), ObjType::Cplx) => {
                Some(Value::Cplx(ComplexExpr::real(crate::rational::Rational::int(*i))))
            }
            (Value::Bit(b), ObjType::Cplx) => Some(Value::Cplx(ComplexExpr::real(
                crate::rational::Rational::int(i64::from(*b)),
            ))),
            (Value::QBit(q), ObjType::Word) => Some(Value::Word(Word {
                bits: vec![WordBit::Quantum(*q)],
                signed: false,
            })),
            (Value::Bit(b), ObjType::Word) => Some(Value::Word(Word {
                bits: vec![WordBit::Classical(*b)],
                signed: false,
            })),
            // The bit-by-bit layout path: build the position-indexed bit
            // vector previously assembled for the word and hand it to the
            // structured form unchanged.
            (Value::Bit(b), ObjType::StructuredWord) => {
                let bitlst = vec![WordBit::Classical(*b)];
                Some(Value::StructuredWord(StructuredWord { bits: bitlst }))
            }
            (Value::QBit(q), ObjType::StructuredWord) => {
                let bitlst = vec![WordBit::Quantum(*q)];
                Some(Value::StructuredWord(StructuredWord { bits: bitlst }))
            }
            (Value::Word(w), ObjType::StructuredWord) => Some(Value::StructuredWord(StructuredWord {
                bits: w.bits.clone(),
            })),
            (Value::StructuredWord(w), ObjType::Word) => Some(Value::Word(Word {
                bits: w.bits.clone(),
                signed: false,
            })),
            (Value::Word(w), ObjType::Int) => w.as_classical().map(Value::Int),
            (Value::List(items), ObjType::FuncList) => Some(Value::FuncList(Rc::clone(items))),
            (Value::FuncList(items), ObjType::List) => Some(Value::List(Rc::clone(items))),
            _ => {
                log::trace!("no cast from {} to {target}", self.obj_type());
                None
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Cplx(c) => write!(f, "Cplx({c})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Bit(b) => write!(f, "Bit({b})"),
            Value::QBit(q) => write!(f, "QBit({q})"),
            Value::Word(w) => write!(f, "Word(len={})", w.len()),
            Value::StructuredWord(w) => write!(f, "StructuredWord(len={})", w.bits.len()),
            Value::List(items) => write!(f, "List(len={})", items.borrow().len()),
            Value::Dict(d) => write!(f, "Dict(width={})", d.bit_width),
            Value::FuncList(items) => write!(f, "FuncList(len={})", items.borrow().len()),
            Value::Func(_) => write!(f, "Func(..)"),
        }
    }
}
