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

use std::error::Error;
use std::fmt;

/// A position in the source text, supplied by the lexer/parser collaborator.
///
/// The core never constructs one of these beyond the default; real
/// positions are stamped on by whatever front end drives the compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePos {
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, col {}", self.line, self.col)
    }
}

/// Runtime/compile error taxonomy for the Qubla core (spec.md §7).
///
/// Syntax errors belong to the lexer/parser collaborator and are not
/// represented here.
#[derive(Debug, Clone)]
pub enum CoreError {
    TypeMismatch {
        pos: Option<SourcePos>,
        msg: String,
    },
    ShapeMismatch {
        pos: Option<SourcePos>,
        msg: String,
    },
    Initialisation {
        pos: Option<SourcePos>,
        msg: String,
    },
    Unitarity {
        pos: Option<SourcePos>,
        msg: String,
    },
    Overflow {
        pos: Option<SourcePos>,
        msg: String,
    },
    Target {
        pos: Option<SourcePos>,
        msg: String,
    },
    Import {
        pos: Option<SourcePos>,
        msg: String,
    },
    DivisionByZero {
        pos: Option<SourcePos>,
    },
    IndexOutOfRange {
        pos: Option<SourcePos>,
        index: i64,
    },
    UnknownName {
        pos: Option<SourcePos>,
        name: String,
    },
}

impl CoreError {
    #[must_use]
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        CoreError::TypeMismatch {
            pos: None,
            msg: msg.into(),
        }
    }

    #[must_use]
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        CoreError::ShapeMismatch {
            pos: None,
            msg: msg.into(),
        }
    }

    #[must_use]
    pub fn initialisation(msg: impl Into<String>) -> Self {
        CoreError::Initialisation {
            pos: None,
            msg: msg.into(),
        }
    }

    #[must_use]
    pub fn unitarity(msg: impl Into<String>) -> Self {
        CoreError::Unitarity {
            pos: None,
            msg: msg.into(),
        }
    }

    #[must_use]
    pub fn overflow(msg: impl Into<String>) -> Self {
        CoreError::Overflow {
            pos: None,
            msg: msg.into(),
        }
    }

    /// Attach a source position, the way `QBLRuntimeError` does in the
    /// original. Call-stack formatting belongs to the evaluator
    /// collaborator, which has the frames to format; the core only ever
    /// carries the position of the statement that raised.
    #[must_use]
    pub fn with_context(self, pos: SourcePos) -> Self {
        match self {
            CoreError::TypeMismatch { msg, .. } => CoreError::TypeMismatch {
                pos: Some(pos),
                msg,
            },
            CoreError::ShapeMismatch { msg, .. } => CoreError::ShapeMismatch {
                pos: Some(pos),
                msg,
            },
            CoreError::Initialisation { msg, .. } => CoreError::Initialisation {
                pos: Some(pos),
                msg,
            },
            CoreError::Unitarity { msg, .. } => CoreError::Unitarity {
                pos: Some(pos),
                msg,
            },
            CoreError::Overflow { msg, .. } => CoreError::Overflow {
                pos: Some(pos),
                msg,
            },
            CoreError::Target { msg, .. } => CoreError::Target {
                pos: Some(pos),
                msg,
            },
            CoreError::Import { msg, .. } => CoreError::Import {
                pos: Some(pos),
                msg,
            },
            CoreError::DivisionByZero { .. } => CoreError::DivisionByZero { pos: Some(pos) },
            CoreError::IndexOutOfRange { index, .. } => CoreError::IndexOutOfRange {
                pos: Some(pos),
                index,
            },
            CoreError::UnknownName { name, .. } => CoreError::UnknownName {
                pos: Some(pos),
                name,
            },
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::TypeMismatch { pos, msg } => {
                write!(f, "type mismatch: {msg}")?;
                write_pos(f, pos)
            }
            CoreError::ShapeMismatch { pos, msg } => {
                write!(f, "shape mismatch: {msg}")?;
                write_pos(f, pos)
            }
            CoreError::Initialisation { pos, msg } => {
                write!(f, "initialisation error: {msg}")?;
                write_pos(f, pos)
            }
            CoreError::Unitarity { pos, msg } => {
                write!(f, "{msg}")?;
                write_pos(f, pos)
            }
            CoreError::Overflow { pos, msg } => {
                write!(f, "overflow: {msg}")?;
                write_pos(f, pos)
            }
            CoreError::Target { pos, msg } => {
                write!(f, "invalid assignment target: {msg}")?;
                write_pos(f, pos)
            }
            CoreError::Import { pos, msg } => {
                write!(f, "import error: {msg}")?;
                write_pos(f, pos)
            }
            CoreError::DivisionByZero { pos } => {
                write!(f, "division by zero")?;
                write_pos(f, pos)
            }
            CoreError::IndexOutOfRange { pos, index } => {
                write!(f, "index {index} out of range")?;
                write_pos(f, pos)
            }
            CoreError::UnknownName { pos, name } => {
                write!(f, "name '{name}' is not found")?;
                write_pos(f, pos)
            }
        }
    }
}

fn write_pos(f: &mut fmt::Formatter<'_>, pos: &Option<SourcePos>) -> fmt::Result {
    if let Some(pos) = pos {
        write!(f, " at {pos}")?;
    }
    Ok(())
}

impl Error for CoreError {}

pub type CoreResult<T> = Result<T, CoreError>;
