//! Bytecode representation for the Tern language.
//!
//! This crate defines the word-oriented instruction format shared by the
//! compiler and the virtual machine:
//!
//! - [`opcode`] - Opcode definitions and operand-count metadata
//! - [`buffer`] - The generic growable buffer with a bounded capacity policy
//! - [`emit`] - The bytecode emission buffer used during compilation
//! - [`program`] - The [`CompiledProgram`] object format
//!
//! # Encoding
//!
//! Bytecode is a flat sequence of 64-bit words. Every instruction occupies
//! one word for its opcode followed by a fixed number of operand words known
//! to both emitter and interpreter. Integer literals are stored as their
//! plain two's-complement value; floating-point literals are stored as their
//! IEEE bit pattern. Values are untyped 64-bit cells at runtime: type exists
//! only at compile time and governs which opcode is emitted.

pub mod buffer;
pub mod emit;
pub mod opcode;
pub mod program;

pub use buffer::{CapacityError, GrowBuf};
pub use emit::{CodeBuf, MAX_CODE_WORDS};
pub use opcode::Op;
pub use program::CompiledProgram;
