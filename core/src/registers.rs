use crate::constants::REGISTER_COUNT;
use crate::error::{Error, Result};

/// # Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow flag and the sprite collision flag
/// - (i) a 16-bit memory address register
/// - (pc) a 16-bit program counter
/// - 2 8-bit timers (delay & sound), decremented by whoever drives the machine
///
/// The stack pointer lives with the stack it indexes, see `Stack::sp`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of register `Vx`.
    pub fn v(&self, x: u8) -> Result<u8> {
        self.v
            .get(usize::from(x))
            .copied()
            .ok_or(Error::InvalidRegister(x))
    }

    pub fn set_v(&mut self, x: u8, value: u8) -> Result<()> {
        let register = self
            .v
            .get_mut(usize::from(x))
            .ok_or(Error::InvalidRegister(x))?;
        *register = value;
        Ok(())
    }

    /// Decrements both timers towards zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_zeroed() {
        let registers = Registers::new();
        assert_eq!(registers.v, [0; 16]);
        assert_eq!((registers.i, registers.pc), (0, 0));
    }

    #[test]
    fn test_set_v() {
        let mut registers = Registers::new();
        registers.set_v(0xF, 0x1).unwrap();
        assert_eq!(registers.v(0xF).unwrap(), 0x1);
    }

    #[test]
    fn test_invalid_register() {
        let mut registers = Registers::new();
        assert!(matches!(registers.v(0x10), Err(Error::InvalidRegister(0x10))));
        assert!(matches!(
            registers.set_v(0x10, 0x1),
            Err(Error::InvalidRegister(0x10))
        ));
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut registers = Registers::new();
        registers.delay_timer = 0x2;
        registers.sound_timer = 0x1;
        registers.tick_timers();
        assert_eq!((registers.delay_timer, registers.sound_timer), (0x1, 0x0));
        registers.tick_timers();
        assert_eq!((registers.delay_timer, registers.sound_timer), (0x0, 0x0));
    }
}
