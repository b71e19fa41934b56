//! Call frames.

/// One entry on the call stack.
#[derive(Debug)]
pub struct Frame {
    /// Index of the executing function.
    pub function: u32,
    /// Offset of the next instruction in the function's code. While a
    /// callee runs, this holds the caller's resume point.
    pub ip: usize,
    /// Frame slots, sized from the function's header word. Arguments and
    /// body locals share this array.
    pub locals: Box<[u64]>,
}
