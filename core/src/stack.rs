use log::debug;

use crate::constants::STACK_SIZE;
use crate::error::{Error, Result};

/// # Stack
/// Return addresses of the subroutines currently being executed.
///
/// `sp` is the number of addresses on the stack, so it never exceeds
/// `STACK_SIZE` and the top of the stack is at `sp - 1`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stack {
    addresses: [u16; STACK_SIZE],
    sp: u8,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, address: u16) -> Result<()> {
        let sp = usize::from(self.sp);
        if sp == STACK_SIZE {
            return Err(Error::StackOverflow(STACK_SIZE));
        }
        self.addresses[sp] = address;
        self.sp += 1;
        debug!("push {:04X} sp{}", address, self.sp);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow);
        }
        self.sp -= 1;
        let address = self.addresses[usize::from(self.sp)];
        debug!("pop {:04X} sp{}", address, self.sp);
        Ok(address)
    }

    /// The stack pointer, i.e. the current call depth.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut stack = Stack::new();
        stack.push(0x123).unwrap();
        stack.push(0x456).unwrap();
        assert_eq!(stack.sp(), 2);
        assert_eq!(stack.pop().unwrap(), 0x456);
        assert_eq!(stack.pop().unwrap(), 0x123);
        assert!(matches!(stack.pop(), Err(Error::StackUnderflow)));
    }

    #[test]
    fn test_empty_underflows() {
        let mut stack = Stack::new();
        assert!(stack.is_empty());
        assert!(matches!(stack.pop(), Err(Error::StackUnderflow)));
        assert_eq!(stack.sp(), 0);
    }

    #[test]
    fn test_overflow() {
        let mut stack = Stack::new();
        for address in 0..STACK_SIZE as u16 {
            stack.push(address).unwrap();
        }
        assert!(matches!(stack.push(0xFFF), Err(Error::StackOverflow(16))));
        assert_eq!(usize::from(stack.sp()), STACK_SIZE);
        assert_eq!(stack.pop().unwrap(), STACK_SIZE as u16 - 1);
    }
}
