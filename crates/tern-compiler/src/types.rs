//! The C-like value type model.
//!
//! Types are immutable values compared structurally; `const`-ness is part of
//! the structure. Type information exists only at compile time: the virtual
//! machine sees untyped 64-bit cells, and the type recorded here decides
//! which opcode family the compiler emits.

use std::fmt;

/// Primitive type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prim {
    Void,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl fmt::Display for Prim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Prim::Void => "void",
            Prim::Char => "char",
            Prim::Int => "int",
            Prim::Long => "long",
            Prim::Float => "float",
            Prim::Double => "double",
        })
    }
}

/// A value type: a primitive or a pointer, each optionally `const`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Simple { prim: Prim, is_const: bool },
    Pointer { to: Box<ValueType>, is_const: bool },
}

impl ValueType {
    pub fn simple(prim: Prim) -> Self {
        ValueType::Simple {
            prim,
            is_const: false,
        }
    }

    pub fn const_simple(prim: Prim) -> Self {
        ValueType::Simple {
            prim,
            is_const: true,
        }
    }

    pub fn pointer(to: ValueType) -> Self {
        ValueType::Pointer {
            to: Box::new(to),
            is_const: false,
        }
    }

    /// The type of string literals: `const char*`.
    pub fn string() -> Self {
        Self::pointer(Self::const_simple(Prim::Char))
    }

    /// The type of function references: `void*`.
    pub fn void_ptr() -> Self {
        Self::pointer(Self::simple(Prim::Void))
    }

    pub fn is_void(&self) -> bool {
        matches!(
            self,
            ValueType::Simple {
                prim: Prim::Void,
                ..
            }
        )
    }

    pub fn is_double(&self) -> bool {
        matches!(
            self,
            ValueType::Simple {
                prim: Prim::Double,
                ..
            }
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(
            self,
            ValueType::Simple {
                prim: Prim::Float,
                ..
            }
        )
    }

    /// Whether cells of this type hold a plain two's-complement integer.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ValueType::Simple {
                prim: Prim::Char | Prim::Int | Prim::Long,
                ..
            }
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueType::Simple {
                prim: Prim::Char | Prim::Int | Prim::Long | Prim::Float | Prim::Double,
                ..
            }
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Simple { prim, is_const } => {
                if *is_const {
                    write!(f, "const {prim}")
                } else {
                    write!(f, "{prim}")
                }
            }
            ValueType::Pointer { to, is_const } => {
                if *is_const {
                    write!(f, "{to}* const")
                } else {
                    write!(f, "{to}*")
                }
            }
        }
    }
}
