use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Pixel rows, indexed as `[y][x]`.
pub type Pixels = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # FrameBuffer
/// The 64x32 monochrome screen.
///
/// Sprites are XORed onto the screen and wrap around both edges. A draw that
/// turns any lit pixel off reports a collision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Pixels,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    /// XORs `sprite` onto the screen with its top left corner at `(x, y)`.
    ///
    /// Each byte is one row of 8 pixels, most significant bit leftmost.
    /// Returns true if any pixel went from lit to unlit.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            let py = (y + row) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let px = (x + bit) % DISPLAY_WIDTH;
                let pixel = &mut self.pixels[py][px];
                collision |= *pixel;
                *pixel ^= true;
            }
        }
        collision
    }

    /// Whether the pixel at `(x, y)` is lit; coordinates wrap like sprites do.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }

    pub fn rows(&self) -> &Pixels {
        &self.pixels
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
