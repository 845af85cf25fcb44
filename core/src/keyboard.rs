use log::debug;

use crate::constants::KEY_COUNT;
use crate::error::{Error, Result};

/// # Keyboard
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
///
/// Tracks which of the 16 logical keys are currently held down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_down(&mut self, key: u8) -> Result<()> {
        *self.key_mut(key)? = true;
        Ok(())
    }

    pub fn set_up(&mut self, key: u8) -> Result<()> {
        *self.key_mut(key)? = false;
        Ok(())
    }

    pub fn is_down(&self, key: u8) -> Result<bool> {
        self.keys
            .get(usize::from(key))
            .copied()
            .ok_or(Error::InvalidKey(key))
    }

    fn key_mut(&mut self, key: u8) -> Result<&mut bool> {
        self.keys
            .get_mut(usize::from(key))
            .ok_or(Error::InvalidKey(key))
    }
}

/// # Keymap
/// Translates host key identifiers into logical keys.
///
/// `table[k]` is the host key for logical key `k`, so the table reads in
/// keypad order `0, 1, .., F`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keymap<K> {
    table: [K; KEY_COUNT],
}

impl<K: PartialEq> Keymap<K> {
    pub fn new(table: [K; KEY_COUNT]) -> Self {
        Keymap { table }
    }

    /// The logical key bound to `host`, or `None` if `host` isn't bound.
    pub fn map(&self, host: &K) -> Option<u8> {
        self.table
            .iter()
            .position(|bound| bound == host)
            .map(|key| key as u8)
    }

    /// The host key bound to logical key `key`.
    pub fn host_key(&self, key: u8) -> Option<&K> {
        self.table.get(usize::from(key))
    }
}

/// Digits `0`-`9` then letters `a`-`f`.
impl Default for Keymap<char> {
    fn default() -> Self {
        Keymap::new([
            '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
        ])
    }
}

/// A source of key presses for the blocking `Fx0A` instruction.
pub trait KeyWait {
    /// Blocks until a logical key goes down and returns it.
    ///
    /// `None` means the source was closed or the wait was cancelled; the
    /// instruction is then retried on the next step.
    fn wait_for_key(&mut self) -> Option<u8>;
}

/// Never yields a key, for hosts that can't block.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoInput;

impl KeyWait for NoInput {
    fn wait_for_key(&mut self) -> Option<u8> {
        None
    }
}

/// Turns a stream of host key-down events into logical keys.
///
/// Unmapped host keys are skipped, so a wait only ends on a bound key or when
/// the stream does.
pub struct MappedKeys<'a, K, I> {
    keymap: &'a Keymap<K>,
    events: I,
}

impl<'a, K, I> MappedKeys<'a, K, I>
where
    K: PartialEq,
    I: Iterator<Item = K>,
{
    pub fn new(keymap: &'a Keymap<K>, events: I) -> Self {
        MappedKeys { keymap, events }
    }
}

impl<'a, K, I> KeyWait for MappedKeys<'a, K, I>
where
    K: PartialEq,
    I: Iterator<Item = K>,
{
    fn wait_for_key(&mut self) -> Option<u8> {
        let keymap = self.keymap;
        let key = self.events.find_map(|host| keymap.map(&host));
        debug!("key wait ended with {:?}", key);
        key
    }
}
