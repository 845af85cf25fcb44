use clap::ValueEnum;
use sdl2::keyboard::Keycode;

use c8vm::Keymap;

/// Host keyboard layouts for the hexadecimal keypad.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Each key is the host key with the same label.
    Hex,
    /// The keypad's shape mapped onto the left 4 alphanumeric columns.
    Qwerty,
}

impl Layout {
    pub fn keymap(self) -> Keymap<Keycode> {
        match self {
            Layout::Hex => hex(),
            Layout::Qwerty => qwerty(),
        }
    }
}

/// Keys `0`-`9` and `A`-`F` are keypad keys 0x0-0xF.
fn hex() -> Keymap<Keycode> {
    Keymap::new([
        Keycode::Num0,
        Keycode::Num1,
        Keycode::Num2,
        Keycode::Num3,
        Keycode::Num4,
        Keycode::Num5,
        Keycode::Num6,
        Keycode::Num7,
        Keycode::Num8,
        Keycode::Num9,
        Keycode::A,
        Keycode::B,
        Keycode::C,
        Keycode::D,
        Keycode::E,
        Keycode::F,
    ])
}

/// The keypad layout mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
fn qwerty() -> Keymap<Keycode> {
    Keymap::new([
        Keycode::X,
        Keycode::Num1,
        Keycode::Num2,
        Keycode::Num3,
        Keycode::Q,
        Keycode::W,
        Keycode::E,
        Keycode::A,
        Keycode::S,
        Keycode::D,
        Keycode::Z,
        Keycode::C,
        Keycode::Num4,
        Keycode::R,
        Keycode::F,
        Keycode::V,
    ])
}
