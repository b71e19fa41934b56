//! Opcode definitions and operand metadata.
//!
//! Opcodes are encoded as one 64-bit word each, followed by a fixed number
//! of operand words. The discriminant values are part of the object format
//! and must not be renumbered.

use serde::{Deserialize, Serialize};

/// Bytecode instructions for the Tern VM.
///
/// Instructions operate on a stack of untyped 64-bit words. The `L*` family
/// reinterprets cells as two's-complement integers, the `D*` family as IEEE
/// double bit patterns; which family is emitted is decided entirely at
/// compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u64)]
pub enum Op {
    /// Push the literal operand word onto the operand stack.
    Push = 1,
    /// Discard the top of the operand stack.
    Pop = 2,
    /// Push a constant-pool index (consumed later by [`Op::SPrint`]).
    Ldc = 3,

    /// Pop into the local slot given by the operand word.
    Store = 15,
    /// Push the local slot given by the operand word.
    Load = 25,

    /// Reinterpret top of stack as an integer and convert it to double bits.
    L2d = 30,
    /// Reinterpret top of stack as double bits and convert it to an integer.
    D2l = 31,

    /// 64-bit integer addition of the top two cells.
    LAdd = 50,
    /// 64-bit integer subtraction.
    LSub = 51,
    /// 64-bit integer multiplication.
    LMul = 52,
    /// 64-bit integer division; division by zero is a runtime error.
    LDiv = 53,
    /// 64-bit integer remainder; remainder by zero is a runtime error.
    LRem = 54,
    /// 64-bit integer negation of the top cell.
    LNeg = 55,

    /// IEEE double addition of the top two cells.
    DAdd = 60,
    /// IEEE double subtraction.
    DSub = 61,
    /// IEEE double multiplication.
    DMul = 62,
    /// IEEE double division; by-zero follows IEEE (infinity/NaN).
    DDiv = 63,
    /// IEEE double remainder; by-zero follows IEEE (NaN).
    DRem = 64,

    /// Call the function whose index is the operand word.
    Invoke = 101,
    /// Terminate the current frame's execution.
    Return = 102,

    /// Pop into the global slot given by the operand word.
    GStore = 120,
    /// Push the global slot given by the operand word.
    GLoad = 121,

    /// Pop a constant-pool index and print that string constant.
    SPrint = 200,
    /// Pop a cell and print it as a signed integer.
    LPrint = 201,
}

impl Op {
    /// The encoded word value of this opcode.
    pub fn word(self) -> u64 {
        self as u64
    }

    /// Decode a word into an opcode, or `None` for an unknown value.
    pub fn from_word(word: u64) -> Option<Self> {
        Some(match word {
            1 => Op::Push,
            2 => Op::Pop,
            3 => Op::Ldc,
            15 => Op::Store,
            25 => Op::Load,
            30 => Op::L2d,
            31 => Op::D2l,
            50 => Op::LAdd,
            51 => Op::LSub,
            52 => Op::LMul,
            53 => Op::LDiv,
            54 => Op::LRem,
            55 => Op::LNeg,
            60 => Op::DAdd,
            61 => Op::DSub,
            62 => Op::DMul,
            63 => Op::DDiv,
            64 => Op::DRem,
            101 => Op::Invoke,
            102 => Op::Return,
            120 => Op::GStore,
            121 => Op::GLoad,
            200 => Op::SPrint,
            201 => Op::LPrint,
            _ => return None,
        })
    }

    /// Number of operand words following this opcode.
    pub fn operand_count(self) -> usize {
        match self {
            Op::Push | Op::Ldc | Op::Store | Op::Load | Op::GStore | Op::GLoad | Op::Invoke => 1,
            _ => 0,
        }
    }
}
