//! Compilation errors.

use tern_bytecode::CapacityError;

use crate::types::ValueType;

/// A fatal error raised while lowering a module to bytecode.
///
/// Compilation stops at the first error; there is no recovery or
/// multi-diagnostic collection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// A global variable name was declared twice at file scope.
    #[error("global variable `{name}` already declared")]
    DuplicateGlobal { name: String },

    /// A local variable name was declared twice in the same function body.
    #[error("local variable `{name}` already declared")]
    DuplicateLocal { name: String },

    /// Two arguments of one function share a name.
    #[error("duplicate argument `{name}`")]
    DuplicateArgument { name: String },

    /// A variable or argument was declared with type `void`.
    #[error("variable `{name}` cannot have type void")]
    VoidVariable { name: String },

    /// A referenced name resolved to nothing in any scope.
    #[error("unknown symbol `{name}`")]
    UnknownSymbol { name: String },

    /// An assignment target resolved to something other than a variable.
    #[error("cannot assign to `{name}`")]
    InvalidAssignTarget { name: String },

    /// No overload of the named function matches the argument types.
    #[error("no function `{name}({args})`")]
    UnknownFunction { name: String, args: String },

    /// Structural type equality was required and not met.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
    },

    /// An arithmetic operand was not a numeric type.
    #[error("operand of type {ty} is not numeric")]
    NonNumeric { ty: ValueType },

    /// An operand needed promotion to double and no conversion exists.
    #[error("no conversion from {ty} to double")]
    NoPromotion { ty: ValueType },

    /// No zero-argument `main` function was defined.
    #[error("main function not found")]
    MissingMain,

    /// A function body outgrew the emission ceiling.
    #[error("function code too large: {0}")]
    CodeTooLarge(#[from] CapacityError),
}
