use log::info;

use crate::constants::{MAX_ROM_SIZE, PROGRAM_START};
use crate::error::{Error, Result};
use crate::frame_buffer::FrameBuffer;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::stack::Stack;

/// A snapshot of the machine's internal state.
///
/// ## CPU
/// - `registers`: V0..VF, I, PC and the two timers
/// - `stack`: return addresses and the stack pointer
///
/// ## Memory
/// - 4096 bytes of addressable memory, font at 0x000, programs at 0x200
/// - 64x32 frame buffer holding the contents of the next frame to be drawn
/// - `draw_flag` set whenever the frame buffer changes
///
/// Keys aren't part of the snapshot; they belong to the host, not the program.
#[derive(Clone)]
pub struct State {
    pub registers: Registers,
    pub stack: Stack,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
}

impl State {
    /// Power-on state: everything zeroed and the font loaded.
    pub fn new() -> Self {
        State {
            registers: Registers::new(),
            stack: Stack::new(),
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
        }
    }

    /// Copies `rom` into memory at `PROGRAM_START` and points PC at it.
    pub fn load(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.memory.write(usize::from(PROGRAM_START), rom)?;
        self.registers.pc = PROGRAM_START;
        info!("loaded {} byte ROM at {:#05X}", rom.len(), PROGRAM_START);
        Ok(())
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
