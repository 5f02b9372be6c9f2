//! The capabilities a Chip-8 needs from the machine it runs on.
//!
//! They are injected into the CPU when it is built and are only ever handed data to observe;
//! none of them can reach back into the CPU's state. The CPU runs on the driver's worker
//! thread, so every implementation has to be `Send`.

use crate::state::FrameBuffer;

/// Draws the Chip-8 display somewhere.
pub trait Renderer: Send {
    /// Blank the screen.
    fn clear(&mut self);

    /// Present a whole frame; it's indexed `[y][x]` and every pixel is 0 or 1.
    fn draw(&mut self, frame: &FrameBuffer);
}

/// Plays the single tone of the Chip-8 buzzer.
pub trait Sound: Send {
    fn set_tone(&mut self, on: bool);
}

/// Reports the state of the 16 key hexadecimal keypad.
pub trait Input: Send {
    /// Whether `key` is currently held down. Keys above 0xF are never pressed.
    fn is_pressed(&mut self, key: u8) -> bool;

    /// Block until a key is pressed and return it (0x0..=0xF).
    fn wait_for_key(&mut self) -> u8;
}
