use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading or running a program.
///
/// All of these are local and recoverable from the caller's point of view; the
/// driver decides whether to halt or to skip the offending instruction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("stack overflow: more than {0} nested subroutine calls")]
    StackOverflow(usize),

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("invalid register V{0:X}")]
    InvalidRegister(u8),

    #[error("invalid key {0:#04X}")]
    InvalidKey(u8),

    #[error("unmapped opcode {0:#06X}")]
    UnmappedOpcode(u16),

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("unable to read ROM")]
    Io(#[from] std::io::Error),
}
