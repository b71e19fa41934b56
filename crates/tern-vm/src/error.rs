//! Runtime errors.

/// A fatal error raised during execution.
///
/// Execution stops at the first error; the machine makes no attempt to
/// unwind or resume.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The operand stack outgrew its configured ceiling.
    #[error("operand stack overflow: limit of {limit} words reached")]
    StackOverflow { limit: usize },

    /// The call stack outgrew its configured depth.
    #[error("call stack overflow: limit of {limit} frames reached")]
    CallStackOverflow { limit: usize },

    /// An instruction popped more values than the stack held. Compiled
    /// programs never do this; it indicates a corrupt or hand-made program.
    #[error("operand stack underflow")]
    StackUnderflow,

    /// An instruction word decoded to no known opcode.
    #[error("unknown opcode: {word}")]
    UnknownOpcode { word: u64 },

    /// An `INVOKE` target (or the entry index) is out of range.
    #[error("unknown function index: {index}")]
    UnknownFunction { index: u64 },

    /// A local slot operand is outside the current frame.
    #[error("invalid local slot: {slot}")]
    InvalidSlot { slot: u64 },

    /// A global slot operand is outside the program's globals.
    #[error("invalid global slot: {slot}")]
    InvalidGlobalSlot { slot: u64 },

    /// A string-print index is outside the constant pool.
    #[error("invalid constant index: {index}")]
    InvalidConstant { index: u64 },

    /// The code ended in the middle of an instruction.
    #[error("truncated instruction at offset {offset}")]
    TruncatedInstruction { offset: usize },

    /// Integer division or remainder by zero. The double variants follow
    /// IEEE instead and never raise this.
    #[error("integer division by zero")]
    DivisionByZero,

    /// Writing to the output sink failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}
