/// Addressable memory in bytes (0x000..=0xFFF).
pub const MEMORY_SIZE: usize = 4096;

/// Programs are loaded here and execution starts here after a load.
pub const PROGRAM_START: u16 = 0x200;

/// The largest image that fits between `PROGRAM_START` and the end of memory.
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize - 1;

/// Number of levels of nested subroutine calls.
pub const STACK_SIZE: usize = 16;

/// Number of general purpose registers (V0..VF) and of keypad keys (0..F).
pub const REGISTER_COUNT: usize = 16;
pub const KEY_COUNT: usize = 16;

/// VF is both the ALU carry/borrow flag and the sprite collision flag.
pub const FLAG_REGISTER: u8 = 0xF;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// How many pre-step states are kept for rewinding.
pub const MAX_SAVED_STATES: usize = 600;

/// The font lives at the very start of memory.
pub const FONT_ADDR: u16 = 0x000;

/// Each glyph is 5 rows of 4 pixels stored in the high nibble.
pub const FONT_HEIGHT: u16 = 5;

/// # Font
/// One 4x5 glyph per hexadecimal digit, `0` first.
///
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
