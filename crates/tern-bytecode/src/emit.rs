//! Bytecode emission buffer.
//!
//! [`CodeBuf`] accumulates opcodes and operand words in emission order. It
//! supports patching an already-written word (used for the local-slot-count
//! header) and splicing one fully built buffer into another (used to insert
//! a type-coercion instruction between two operand subsequences without
//! re-evaluating either).

use crate::buffer::{CapacityError, GrowBuf};
use crate::opcode::Op;

/// Hard ceiling on a single function's code, in words.
pub const MAX_CODE_WORDS: usize = 8192;

/// A growable buffer of bytecode words.
#[derive(Debug, Clone)]
pub struct CodeBuf {
    words: GrowBuf<u64>,
}

impl CodeBuf {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            words: GrowBuf::with_limit(MAX_CODE_WORDS),
        }
    }

    /// Number of words written so far.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Append a raw word.
    pub fn write(&mut self, word: u64) -> Result<(), CapacityError> {
        self.words.push(word)
    }

    /// Append an opcode word.
    pub fn write_op(&mut self, op: Op) -> Result<(), CapacityError> {
        self.write(op.word())
    }

    /// Append a signed integer as its two's-complement word.
    pub fn write_i64(&mut self, value: i64) -> Result<(), CapacityError> {
        self.write(value as u64)
    }

    /// Append a double as its IEEE bit pattern.
    pub fn write_f64(&mut self, value: f64) -> Result<(), CapacityError> {
        self.write(value.to_bits())
    }

    /// Overwrite the word at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` has not been written yet; patching is only valid
    /// for words the emitter has already laid down.
    pub fn write_at(&mut self, index: usize, word: u64) {
        *self
            .words
            .get_mut(index)
            .expect("patch index beyond emitted code") = word;
    }

    /// Splice another buffer's contents onto the end of this one.
    pub fn append(&mut self, other: &CodeBuf) -> Result<(), CapacityError> {
        self.words.extend_from_slice(other.as_slice())
    }

    /// View the emitted words.
    pub fn as_slice(&self) -> &[u64] {
        self.words.as_slice()
    }

    /// Finish emission, returning the words trimmed to length.
    pub fn finish(self) -> Box<[u64]> {
        self.words.into_boxed_slice()
    }
}

impl Default for CodeBuf {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_opcodes_and_operands_in_order() {
        let mut code = CodeBuf::new();
        code.write_op(Op::Push).unwrap();
        code.write_i64(-3).unwrap();
        code.write_op(Op::LNeg).unwrap();
        assert_eq!(code.as_slice(), &[Op::Push.word(), (-3i64) as u64, 55]);
    }

    #[test]
    fn float_literals_are_bit_patterns() {
        let mut code = CodeBuf::new();
        code.write_f64(1.5).unwrap();
        assert_eq!(code.as_slice(), &[1.5f64.to_bits()]);
    }

    #[test]
    fn patches_header_word() {
        let mut code = CodeBuf::new();
        code.write(0).unwrap();
        code.write_op(Op::Return).unwrap();
        code.write_at(0, 4);
        assert_eq!(code.finish().as_ref(), &[4, Op::Return.word()]);
    }

    #[test]
    fn splices_a_sub_buffer() {
        let mut lhs = CodeBuf::new();
        lhs.write_op(Op::Push).unwrap();
        lhs.write_i64(2).unwrap();
        lhs.write_op(Op::L2d).unwrap();

        let mut rhs = CodeBuf::new();
        rhs.write_op(Op::Push).unwrap();
        rhs.write_f64(1.5).unwrap();

        lhs.append(&rhs).unwrap();
        lhs.write_op(Op::DAdd).unwrap();
        assert_eq!(
            lhs.as_slice(),
            &[1, 2, 30, 1, 1.5f64.to_bits(), 60],
        );
    }
}
