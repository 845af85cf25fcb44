use std::collections::VecDeque;
use std::io::Read;

use log::{info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::MAX_SAVED_STATES;
use crate::error::{Error, Result};
use crate::frame_buffer::FrameBuffer;
use crate::instruction::{self, Context, Status};
use crate::keyboard::{KeyWait, Keyboard};
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - `keyboard` with public interfaces for pressing and releasing keys
///  - `rng`, seeded once, for the random opcode
///
/// Supplies interfaces for:
/// - loading roms
/// - executing single opcodes, or fetching and executing the next one
/// - reversing the CPU
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
///
/// ## Program counter
/// `execute` never moves PC past the opcode it runs. `step` is the fetch loop:
/// it reads the word at PC, advances PC by 2 straight after the fetch and only
/// then executes. So ordinary opcodes move on by one instruction, jumps, calls
/// and returns land exactly where they point, and a taken skip moves on by two.
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    keyboard: Keyboard,
    rng: StdRng,
}

impl Chip8 {
    /// A powered-on machine whose random opcode is seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A powered-on machine whose random opcode replays the same sequence for the same seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8 {
            state: State::new(),
            previous_states: VecDeque::with_capacity(MAX_SAVED_STATES),
            keyboard: Keyboard::new(),
            rng,
        }
    }

    /// Back to the power-on state; the loaded program is gone as well.
    pub fn reset(&mut self) {
        self.state = State::new();
        self.previous_states.clear();
        self.keyboard = Keyboard::new();
        info!("reset");
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a reader that yields the whole ROM image
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.state.load(&rom)
    }

    /// Returns the FrameBuffer if the display should be redrawn, and unsets the draw flag
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the logical key 0x0..=0xF that was pressed
    pub fn key_press(&mut self, key: u8) -> Result<()> {
        self.keyboard.set_down(key)
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the logical key 0x0..=0xF that was released
    pub fn key_release(&mut self, key: u8) -> Result<()> {
        self.keyboard.set_up(key)
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    /// Decodes and executes a single opcode against the current state.
    ///
    /// Unmapped opcodes change nothing and are reported as `UnmappedOpcode`.
    pub fn execute(&mut self, op: u16, input: &mut dyn KeyWait) -> Result<Status> {
        let operation = match instruction::decode(op) {
            Some(operation) => operation,
            None => {
                warn!("unmapped opcode {:04X} at pc{:04X}", op, self.state.registers.pc);
                return Err(Error::UnmappedOpcode(op));
            }
        };
        let registers = &self.state.registers;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X} sp{}",
            op,
            registers.v,
            registers.i,
            registers.pc,
            self.state.stack.sp()
        );
        let mut cx = Context {
            state: &mut self.state,
            keyboard: &self.keyboard,
            rng: &mut self.rng,
            input,
        };
        operation(op, &mut cx)
    }

    /// Advances the CPU by a single instruction
    /// - fetches the opcode at PC and moves PC on to the next instruction
    /// - executes the opcode
    /// - if it is still awaiting a keypress, points PC back at it so it runs again
    /// - otherwise saves the state from before the fetch for rewinding
    ///
    /// On error PC has already moved past the offending instruction, so carrying on skips it.
    pub fn step(&mut self, input: &mut dyn KeyWait) -> Result<Status> {
        let pc = self.state.registers.pc;
        let op = self.get_op()?;
        let snapshot = self.state.clone();
        self.state.registers.pc = pc.wrapping_add(2);
        let status = self.execute(op, input);
        if let Ok(Status::AwaitingKey) = status {
            // a retried key wait leaves the state as it was, so there's nothing to save
            self.state.registers.pc = pc;
        } else {
            self.save_state(snapshot);
        }
        status
    }

    /// Reverses the CPU by a single instruction if possible
    /// - if there are previous_states, pops the most recent one and restores it
    /// - flags the restored frame for redrawing
    pub fn rewind(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                self.state = state;
                self.state.draw_flag = true;
                true
            }
            None => false,
        }
    }

    /// Decrements the delay and sound timers; call this at 60Hz.
    pub fn tick_timers(&mut self) {
        self.state.registers.tick_timers();
    }

    /// Whether a beep should be sounding.
    pub fn sound_active(&self) -> bool {
        self.state.registers.sound_timer > 0
    }

    /// Puts a state in previous_states
    /// - if there are already MAX_SAVED_STATES saved then the oldest is dropped
    fn save_state(&mut self, state: State) {
        if self.previous_states.len() == MAX_SAVED_STATES {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(state);
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<u16> {
        self.state.memory.word(usize::from(self.state.registers.pc))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{Keymap, MappedKeys, NoInput};

    fn loaded(rom: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::with_seed(0x8);
        chip8.load_rom(&mut &rom[..]).unwrap();
        chip8
    }

    #[test]
    fn test_chip8_gets_op() {
        let chip8 = loaded(&[0xAA, 0xBB]);
        assert_eq!(chip8.get_op().unwrap(), 0xAABB);
    }

    #[test]
    fn test_load_rom_too_large() {
        let mut chip8 = Chip8::with_seed(0x8);
        let rom = vec![0x0; 0xE00];
        assert!(matches!(
            chip8.load_rom(&mut &rom[..]),
            Err(Error::RomTooLarge { .. })
        ));
    }

    #[test]
    fn test_step_advances_pc() {
        let mut chip8 = loaded(&[0x00, 0xE0, 0x61, 0x22]);
        chip8.step(&mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.pc, 0x202);
        chip8.step(&mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.pc, 0x204);
        assert_eq!(chip8.state.registers.v[0x1], 0x22);
    }

    #[test]
    fn test_execute_leaves_pc() {
        let mut chip8 = loaded(&[]);
        chip8.execute(0x6122, &mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.pc, 0x200);
    }

    #[test]
    fn test_step_jump_doesnt_double_advance() {
        let mut chip8 = loaded(&[0x12, 0x08]);
        chip8.step(&mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.pc, 0x208);
    }

    #[test]
    fn test_step_skip_skips_next_instruction() {
        // V1 = 5; skip if V1 == 5; V2 = 1; V3 = 1
        let mut chip8 = loaded(&[0x61, 0x05, 0x31, 0x05, 0x62, 0x01, 0x63, 0x01]);
        chip8.step(&mut NoInput).unwrap();
        chip8.step(&mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.pc, 0x206);
        chip8.step(&mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.v[0x2], 0x0);
        assert_eq!(chip8.state.registers.v[0x3], 0x1);
    }

    #[test]
    fn test_step_call_and_return() {
        // 0x200: call 0x206; 0x202: V1 = 1; 0x204: jump 0x204; 0x206: return
        let mut chip8 = loaded(&[0x22, 0x06, 0x61, 0x01, 0x12, 0x04, 0x00, 0xEE]);
        chip8.step(&mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.pc, 0x206);
        assert_eq!(chip8.state.stack.sp(), 1);
        chip8.step(&mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.pc, 0x202);
        chip8.step(&mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.v[0x1], 0x1);
    }

    #[test]
    fn test_step_fetch_out_of_bounds() {
        let mut chip8 = loaded(&[]);
        chip8.state.registers.pc = 0xFFF;
        assert!(matches!(
            chip8.step(&mut NoInput),
            Err(Error::MemoryOutOfBounds { .. })
        ));
        assert_eq!(chip8.state.registers.pc, 0xFFF);
    }

    #[test]
    fn test_unmapped_opcode_is_a_noop() {
        let mut chip8 = loaded(&[0xFF, 0xFF]);
        let before = chip8.state.registers;
        assert!(matches!(
            chip8.execute(0xFFFF, &mut NoInput),
            Err(Error::UnmappedOpcode(0xFFFF))
        ));
        assert_eq!(chip8.state.registers, before);
    }

    #[test]
    fn test_step_skips_unmapped_opcode() {
        let mut chip8 = loaded(&[0x01, 0x23, 0x61, 0x22]);
        assert!(matches!(
            chip8.step(&mut NoInput),
            Err(Error::UnmappedOpcode(0x0123))
        ));
        chip8.step(&mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.v[0x1], 0x22);
    }

    #[test]
    fn test_doesnt_advance_while_awaiting_key() {
        let mut chip8 = loaded(&[0xF1, 0x0A]);
        assert_eq!(chip8.step(&mut NoInput).unwrap(), Status::AwaitingKey);
        assert_eq!(chip8.state.registers.pc, 0x200);
    }

    #[test]
    fn test_captures_key_presses() {
        let keymap: Keymap<char> = Keymap::default();
        let mut input = MappedKeys::new(&keymap, "ge".chars());
        let mut chip8 = loaded(&[0xF1, 0x0A]);
        assert_eq!(chip8.step(&mut input).unwrap(), Status::Continue);
        assert_eq!(chip8.state.registers.v[0x1], 0xE);
        assert_eq!(chip8.state.registers.pc, 0x202);
    }

    #[test]
    fn test_key_press_and_release() {
        let mut chip8 = loaded(&[0xE1, 0x9E]);
        chip8.state.registers.v[0x1] = 0xA;
        chip8.key_press(0xA).unwrap();
        assert!(chip8.keyboard().is_down(0xA).unwrap());
        chip8.step(&mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.pc, 0x204);
        chip8.key_release(0xA).unwrap();
        assert!(!chip8.keyboard().is_down(0xA).unwrap());
        assert!(matches!(chip8.key_press(0x10), Err(Error::InvalidKey(0x10))));
    }

    #[test]
    fn test_random_is_reproducible() {
        let rom = [0xC1, 0xFF, 0xC2, 0xFF, 0xC3, 0xFF];
        let mut a = loaded(&rom);
        let mut b = loaded(&rom);
        for _ in 0..3 {
            a.step(&mut NoInput).unwrap();
            b.step(&mut NoInput).unwrap();
        }
        assert_eq!(a.state.registers.v, b.state.registers.v);
    }

    #[test]
    fn test_take_frame_once() {
        let mut chip8 = loaded(&[0x00, 0xE0]);
        assert!(chip8.take_frame().is_none());
        chip8.step(&mut NoInput).unwrap();
        assert!(chip8.take_frame().is_some());
        assert!(chip8.take_frame().is_none());
    }

    #[test]
    fn test_timers() {
        let mut chip8 = loaded(&[]);
        chip8.state.registers.delay_timer = 0x2;
        chip8.state.registers.sound_timer = 0x1;
        assert!(chip8.sound_active());
        chip8.tick_timers();
        assert_eq!(chip8.state.registers.delay_timer, 0x1);
        assert!(!chip8.sound_active());
    }

    #[test]
    fn test_rewind() {
        let mut chip8 = loaded(&[0x61, 0x01, 0x71, 0x01]);
        chip8.step(&mut NoInput).unwrap();
        chip8.step(&mut NoInput).unwrap();
        assert_eq!(chip8.state.registers.v[0x1], 0x2);
        assert!(chip8.rewind());
        assert_eq!(chip8.state.registers.v[0x1], 0x1);
        assert_eq!(chip8.state.registers.pc, 0x202);
        assert!(chip8.rewind());
        assert_eq!(chip8.state.registers.pc, 0x200);
        assert!(!chip8.rewind());
    }

    #[test]
    fn test_rewind_redraws_restored_frame() {
        let mut chip8 = loaded(&[0xA0, 0x00, 0xD0, 0x05]);
        chip8.step(&mut NoInput).unwrap();
        chip8.step(&mut NoInput).unwrap();
        assert!(chip8.take_frame().is_some());
        assert!(chip8.rewind());
        assert!(!chip8.frame_buffer().pixel(0, 0));
        let frame = chip8.take_frame().expect("rewind should redraw");
        assert!(!frame.pixel(0, 0));
    }

    #[test]
    fn test_key_wait_retries_arent_saved() {
        let mut chip8 = loaded(&[0x61, 0x01, 0xF2, 0x0A]);
        chip8.step(&mut NoInput).unwrap();
        for _ in 0..3 {
            assert_eq!(chip8.step(&mut NoInput).unwrap(), Status::AwaitingKey);
        }
        assert_eq!(chip8.previous_states.len(), 1);
        assert!(chip8.rewind());
        assert_eq!(chip8.state.registers.pc, 0x200);
        assert_eq!(chip8.state.registers.v[0x1], 0x0);
    }

    #[test]
    fn test_chip8_drops_old_saved_states() {
        let mut chip8 = loaded(&[]);
        for _ in 0..MAX_SAVED_STATES {
            chip8.save_state(chip8.state.clone());
        }
        assert_eq!(MAX_SAVED_STATES, chip8.previous_states.len());
        chip8.save_state(chip8.state.clone());
        assert_eq!(MAX_SAVED_STATES, chip8.previous_states.len());
    }

    #[test]
    fn test_reset() {
        let mut chip8 = loaded(&[0x61, 0x01]);
        chip8.step(&mut NoInput).unwrap();
        chip8.key_press(0x3).unwrap();
        chip8.reset();
        assert_eq!(chip8.state.registers.pc, 0x0);
        assert_eq!(chip8.state.registers.v[0x1], 0x0);
        assert_eq!(chip8.state.memory.get(0x200).unwrap(), 0x0);
        assert_eq!(chip8.state.memory.get(0x0).unwrap(), 0xF0);
        assert!(!chip8.keyboard().is_down(0x3).unwrap());
        assert!(!chip8.rewind());
    }
}
