//! Compiler for the Tern language: typed AST in, bytecode out.
//!
//! The crate consumes an immutable [`ast::Module`] produced by an external
//! front end and lowers it to a [`tern_bytecode::CompiledProgram`]:
//!
//! - [`types`] - The C-like value type model
//! - [`ast`] - The typed syntax tree the front end hands over
//! - [`symbols`] - Program- and function-level symbol scopes
//! - [`codegen`] - Statement and expression lowering
//! - [`compile`] - The whole-module compilation driver
//!
//! Type checking is structural and happens entirely here; the emitted
//! bytecode carries no type information beyond the choice of opcode.

pub mod ast;
pub mod codegen;
pub mod compile;
pub mod error;
pub mod symbols;
pub mod types;

pub use compile::compile;
pub use error::CompileError;
pub use types::{Prim, ValueType};
