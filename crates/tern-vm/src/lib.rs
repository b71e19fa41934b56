//! Stack-based virtual machine for Tern bytecode.
//!
//! The machine interprets a [`tern_bytecode::CompiledProgram`] directly:
//! an operand stack of untyped 64-bit cells, a call-frame stack, and a
//! private copy of the global slots. All resources are bounded up front by
//! [`ExecLimits`]; exceeding a bound is a [`RuntimeError`], never an
//! allocation blowup.

pub mod error;
pub mod frame;
pub mod vm;

pub use error::RuntimeError;
pub use frame::Frame;
pub use vm::{ExecLimits, Vm};
