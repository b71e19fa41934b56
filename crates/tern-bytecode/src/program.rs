//! The compiled-program object format.

use serde::{Deserialize, Serialize};

/// A fully compiled program, ready for execution or serialization.
///
/// Function bodies start with one header word holding the frame's local
/// slot count; instruction decoding begins at the following word. Global
/// slots hold the raw cell values the globals were initialized to; string
/// constants live in a deduplicated pool referenced by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledProgram {
    /// Index into `functions` of the entry point.
    pub main: u32,
    /// Deduplicated string constant pool.
    pub constants: Vec<String>,
    /// Initial values of the global slots.
    pub globals: Vec<u64>,
    /// Function bodies, indexed by function id.
    pub functions: Vec<Box<[u64]>>,
}

impl CompiledProgram {
    /// The entry-point function body.
    pub fn entry(&self) -> &[u64] {
        &self.functions[self.main as usize]
    }
}
