//! A Chip-8 interpreter core.
//!
//! The machine state, instruction set and keypad model live here; windows,
//! host input events and ROM files are left to whoever drives a [`Chip8`].

pub use chip8::Chip8;
pub use error::{Error, Result};
pub use frame_buffer::{FrameBuffer, Pixels};
pub use instruction::Status;
pub use keyboard::{KeyWait, Keyboard, Keymap, MappedKeys, NoInput};
pub use memory::Memory;
pub use opcode::Opcode;
pub use registers::Registers;
pub use stack::Stack;
pub use state::State;

mod chip8;
pub mod constants;
mod error;
mod frame_buffer;
mod instruction;
mod keyboard;
mod memory;
mod opcode;
mod operations;
mod registers;
mod stack;
mod state;
