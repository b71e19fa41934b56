//! The interpreter.
//!
//! Execution pushes a frame for the entry function and loops over one
//! dispatch per instruction. The instruction pointer resting at or past the
//! end of the code is the sole return path: `RETURN` simply parks it there,
//! and a body that falls off its end returns implicitly. A callee deposits
//! its return value on the shared operand stack, so the caller finds it in
//! place after resuming.
//!
//! Cells are untyped `u64` words. Integer instructions reinterpret them as
//! two's-complement with wrapping semantics; double instructions go through
//! the IEEE bit pattern.

use std::io::{self, Write};

use tracing::{debug, trace};

use tern_bytecode::{CompiledProgram, GrowBuf, Op};

use crate::error::RuntimeError;
use crate::frame::Frame;

/// Resource bounds for one execution.
#[derive(Debug, Clone, Copy)]
pub struct ExecLimits {
    /// Operand stack ceiling in bytes; divides by the cell size into words.
    pub max_stack_bytes: usize,
    /// Call stack ceiling in frames.
    pub max_call_depth: usize,
    /// Reserved: accepted but unenforced, no heap exists yet.
    pub max_heap_bytes: usize,
}

impl ExecLimits {
    fn max_stack_words(&self) -> usize {
        self.max_stack_bytes / std::mem::size_of::<u64>()
    }
}

impl Default for ExecLimits {
    fn default() -> Self {
        Self {
            max_stack_bytes: 1024 * 1024,
            max_call_depth: 100,
            max_heap_bytes: 0,
        }
    }
}

/// A virtual machine bound to one compiled program.
///
/// The machine owns its stacks and a private copy of the global slots; the
/// program itself is never mutated. One execution at a time.
pub struct Vm<'p> {
    program: &'p CompiledProgram,
    stack: GrowBuf<u64>,
    frames: GrowBuf<Frame>,
    globals: Vec<u64>,
}

impl<'p> Vm<'p> {
    pub fn new(program: &'p CompiledProgram) -> Self {
        Self::with_limits(program, ExecLimits::default())
    }

    pub fn with_limits(program: &'p CompiledProgram, limits: ExecLimits) -> Self {
        Self {
            program,
            stack: GrowBuf::with_limit(limits.max_stack_words()),
            frames: GrowBuf::with_limit(limits.max_call_depth),
            globals: program.globals.clone(),
        }
    }

    /// The machine's view of the global slots.
    pub fn globals(&self) -> &[u64] {
        &self.globals
    }

    /// Current operand stack depth in words.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Execute the program, printing to stdout.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuntimeError`]; execution does not resume.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let mut stdout = io::stdout().lock();
        self.run_with_output(&mut stdout)
    }

    /// Execute the program, printing to `out`.
    ///
    /// Stacks and globals are reset first, so a `Vm` may run its program
    /// more than once from a clean slate.
    pub fn run_with_output(&mut self, out: &mut dyn Write) -> Result<(), RuntimeError> {
        let program = self.program;
        self.stack.clear();
        self.frames.clear();
        self.globals.clone_from(&program.globals);
        debug!(main = program.main, "executing program");

        let entry = enter_function(program, u64::from(program.main))?;
        push_frame(&mut self.frames, entry)?;

        loop {
            let depth = self.frames.len();
            let Some(frame) = self.frames.last_mut() else {
                debug!("execution finished");
                return Ok(());
            };
            // the frame was entered through enter_function, so the index
            // is in range
            let code = program.functions[frame.function as usize].as_ref();
            if frame.ip >= code.len() {
                self.frames.pop();
                continue;
            }

            let word = code[frame.ip];
            let op = Op::from_word(word).ok_or(RuntimeError::UnknownOpcode { word })?;
            match op {
                Op::Push | Op::Ldc => {
                    let value = operand(code, frame.ip)?;
                    spush(&mut self.stack, value)?;
                    frame.ip += 2;
                }
                Op::Pop => {
                    spop(&mut self.stack)?;
                    frame.ip += 1;
                }
                Op::Store => {
                    let slot = operand(code, frame.ip)?;
                    let value = spop(&mut self.stack)?;
                    *frame
                        .locals
                        .get_mut(slot as usize)
                        .ok_or(RuntimeError::InvalidSlot { slot })? = value;
                    frame.ip += 2;
                }
                Op::Load => {
                    let slot = operand(code, frame.ip)?;
                    let value = *frame
                        .locals
                        .get(slot as usize)
                        .ok_or(RuntimeError::InvalidSlot { slot })?;
                    spush(&mut self.stack, value)?;
                    frame.ip += 2;
                }
                Op::L2d => {
                    let cell = stop_mut(&mut self.stack)?;
                    *cell = ((*cell as i64) as f64).to_bits();
                    frame.ip += 1;
                }
                Op::D2l => {
                    let cell = stop_mut(&mut self.stack)?;
                    *cell = (f64::from_bits(*cell) as i64) as u64;
                    frame.ip += 1;
                }
                Op::LAdd => {
                    let b = spop(&mut self.stack)? as i64;
                    let a = stop_mut(&mut self.stack)?;
                    *a = (*a as i64).wrapping_add(b) as u64;
                    frame.ip += 1;
                }
                Op::LSub => {
                    let b = spop(&mut self.stack)? as i64;
                    let a = stop_mut(&mut self.stack)?;
                    *a = (*a as i64).wrapping_sub(b) as u64;
                    frame.ip += 1;
                }
                Op::LMul => {
                    let b = spop(&mut self.stack)? as i64;
                    let a = stop_mut(&mut self.stack)?;
                    *a = (*a as i64).wrapping_mul(b) as u64;
                    frame.ip += 1;
                }
                Op::LDiv => {
                    let b = spop(&mut self.stack)? as i64;
                    if b == 0 {
                        return Err(RuntimeError::DivisionByZero);
                    }
                    let a = stop_mut(&mut self.stack)?;
                    *a = (*a as i64).wrapping_div(b) as u64;
                    frame.ip += 1;
                }
                Op::LRem => {
                    let b = spop(&mut self.stack)? as i64;
                    if b == 0 {
                        return Err(RuntimeError::DivisionByZero);
                    }
                    let a = stop_mut(&mut self.stack)?;
                    *a = (*a as i64).wrapping_rem(b) as u64;
                    frame.ip += 1;
                }
                Op::LNeg => {
                    let cell = stop_mut(&mut self.stack)?;
                    *cell = (*cell as i64).wrapping_neg() as u64;
                    frame.ip += 1;
                }
                Op::DAdd => {
                    let b = f64::from_bits(spop(&mut self.stack)?);
                    let a = stop_mut(&mut self.stack)?;
                    *a = (f64::from_bits(*a) + b).to_bits();
                    frame.ip += 1;
                }
                Op::DSub => {
                    let b = f64::from_bits(spop(&mut self.stack)?);
                    let a = stop_mut(&mut self.stack)?;
                    *a = (f64::from_bits(*a) - b).to_bits();
                    frame.ip += 1;
                }
                Op::DMul => {
                    let b = f64::from_bits(spop(&mut self.stack)?);
                    let a = stop_mut(&mut self.stack)?;
                    *a = (f64::from_bits(*a) * b).to_bits();
                    frame.ip += 1;
                }
                Op::DDiv => {
                    let b = f64::from_bits(spop(&mut self.stack)?);
                    let a = stop_mut(&mut self.stack)?;
                    *a = (f64::from_bits(*a) / b).to_bits();
                    frame.ip += 1;
                }
                Op::DRem => {
                    let b = f64::from_bits(spop(&mut self.stack)?);
                    let a = stop_mut(&mut self.stack)?;
                    *a = (f64::from_bits(*a) % b).to_bits();
                    frame.ip += 1;
                }
                Op::Invoke => {
                    let index = operand(code, frame.ip)?;
                    frame.ip += 2;
                    trace!(function = index, depth, "invoke");
                    let callee = enter_function(program, index)?;
                    push_frame(&mut self.frames, callee)?;
                }
                Op::Return => {
                    frame.ip = code.len();
                }
                Op::GStore => {
                    let slot = operand(code, frame.ip)?;
                    let value = spop(&mut self.stack)?;
                    *self
                        .globals
                        .get_mut(slot as usize)
                        .ok_or(RuntimeError::InvalidGlobalSlot { slot })? = value;
                    frame.ip += 2;
                }
                Op::GLoad => {
                    let slot = operand(code, frame.ip)?;
                    let value = *self
                        .globals
                        .get(slot as usize)
                        .ok_or(RuntimeError::InvalidGlobalSlot { slot })?;
                    spush(&mut self.stack, value)?;
                    frame.ip += 2;
                }
                Op::LPrint => {
                    let value = spop(&mut self.stack)? as i64;
                    write!(out, "{value}")?;
                    frame.ip += 1;
                }
                Op::SPrint => {
                    let index = spop(&mut self.stack)?;
                    let constant = program
                        .constants
                        .get(index as usize)
                        .ok_or(RuntimeError::InvalidConstant { index })?;
                    write!(out, "{constant}")?;
                    frame.ip += 1;
                }
            }
        }
    }
}

fn spush(stack: &mut GrowBuf<u64>, value: u64) -> Result<(), RuntimeError> {
    stack
        .push(value)
        .map_err(|e| RuntimeError::StackOverflow { limit: e.limit })
}

fn spop(stack: &mut GrowBuf<u64>) -> Result<u64, RuntimeError> {
    stack.pop().ok_or(RuntimeError::StackUnderflow)
}

fn stop_mut(stack: &mut GrowBuf<u64>) -> Result<&mut u64, RuntimeError> {
    stack.last_mut().ok_or(RuntimeError::StackUnderflow)
}

fn operand(code: &[u64], ip: usize) -> Result<u64, RuntimeError> {
    code.get(ip + 1)
        .copied()
        .ok_or(RuntimeError::TruncatedInstruction { offset: ip })
}

fn push_frame(frames: &mut GrowBuf<Frame>, frame: Frame) -> Result<(), RuntimeError> {
    frames
        .push(frame)
        .map_err(|e| RuntimeError::CallStackOverflow { limit: e.limit })
}

/// Build a frame for `index`: locals sized from the header word, execution
/// starting just past it.
fn enter_function(program: &CompiledProgram, index: u64) -> Result<Frame, RuntimeError> {
    let code = program
        .functions
        .get(index as usize)
        .ok_or(RuntimeError::UnknownFunction { index })?;
    let slots = code
        .first()
        .copied()
        .ok_or(RuntimeError::TruncatedInstruction { offset: 0 })?;
    Ok(Frame {
        function: index as u32,
        ip: 1,
        locals: vec![0; slots as usize].into_boxed_slice(),
    })
}

#[cfg(test)]
mod tests;
