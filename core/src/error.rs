use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// The two stack variants are the only failures `Machine::cycle` can report;
/// a well-formed program never triggers them, but a mismatched call/return
/// sequence must be caught rather than allowed to index outside the stack.
#[derive(Debug, Error)]
pub enum Error {
    /// The program image doesn't fit between 0x200 and the end of memory.
    #[error("program is {len} bytes but only {capacity} bytes of memory are available")]
    CapacityExceeded { len: usize, capacity: usize },

    /// The program source couldn't be read.
    #[error("failed to read program")]
    Io(#[from] std::io::Error),

    /// A 17th nested call would overflow the call stack.
    #[error("call stack overflow at {pc:#06X}")]
    StackOverflow { pc: u16 },

    /// A return was executed with no call outstanding.
    #[error("return with an empty call stack at {pc:#06X}")]
    StackUnderflow { pc: u16 },
}
