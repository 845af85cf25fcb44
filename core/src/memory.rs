use crate::constants::{FONT_ADDR, MEMORY_SIZE, SPRITE_SHEET};
use crate::error::{Error, Result};

/// # Memory
/// A flat, bounds checked store of `MEMORY_SIZE` bytes.
///
/// ```text
/// 0x000..0x050  font (16 glyphs x 5 bytes)
/// 0x050..0x200  unused, historically the interpreter itself
/// 0x200..0x1000 program and data
/// ```
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the font loaded at `FONT_ADDR`.
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let font = usize::from(FONT_ADDR);
        bytes[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    pub fn get(&self, address: usize) -> Result<u8> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(Error::MemoryOutOfBounds { address })
    }

    pub fn set(&mut self, address: usize, value: u8) -> Result<()> {
        let byte = self
            .bytes
            .get_mut(address)
            .ok_or(Error::MemoryOutOfBounds { address })?;
        *byte = value;
        Ok(())
    }

    /// Reads the big-endian word at `address..=address + 1`.
    pub fn word(&self, address: usize) -> Result<u16> {
        let bytes = self.slice(address, 2)?;
        Ok(u16::from(bytes[0]) << 8 | u16::from(bytes[1]))
    }

    /// `len` bytes starting at `address`; fails if any of them is out of bounds.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8]> {
        let end = Self::end(address, len)?;
        Ok(&self.bytes[address..end])
    }

    pub fn slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8]> {
        let end = Self::end(address, len)?;
        Ok(&mut self.bytes[address..end])
    }

    /// Copies `data` into memory starting at `address`.
    pub fn write(&mut self, address: usize, data: &[u8]) -> Result<()> {
        self.slice_mut(address, data.len())?.copy_from_slice(data);
        Ok(())
    }

    // The first address past the range, reporting the first offending address on failure.
    fn end(address: usize, len: usize) -> Result<usize> {
        match address.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(end),
            _ => Err(Error::MemoryOutOfBounds {
                address: address.max(MEMORY_SIZE),
            }),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
