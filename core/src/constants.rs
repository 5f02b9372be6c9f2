/// Width of the display in pixels
pub const DISPLAY_WIDTH: usize = 64;

/// Height of the display in pixels
pub const DISPLAY_HEIGHT: usize = 32;

/// Size of addressable memory; the last 12-bit address (0xFFF) is not backed
pub const MEMORY_SIZE: usize = 0x0FFF;

/// Where ROMs are loaded into memory and where the PC starts
pub const PROGRAM_START: u16 = 0x200;

/// The largest program that fits between `PROGRAM_START` and the end of memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Number of return addresses the stack can hold
pub const STACK_SIZE: usize = 0xFF;

/// Number of general purpose registers (V0..VF)
pub const REGISTER_COUNT: usize = 16;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: u8 = 16;

/// Nanoseconds between two ticks of the CPU (~60Hz)
/// One instruction is executed and both timers are decremented per tick.
pub const CLOCK_SPEED: u64 = 16_666_667;

/// Bytes of memory shown on either side of the PC in a state dump
pub const DUMP_WINDOW: u16 = 20;

/// Number of bytes used by each glyph of the sprite sheet
pub const GLYPH_SIZE: u8 = 5;

/// # Sprite sheet
/// Sprites for the hexadecimal digits 0..F, loaded at address 0x000.
///
/// Each glyph is 5 rows of 8 bits where only the high nibble is used, e.g. for `0`:
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
