use snafu::prelude::*;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT, SPRITE_SHEET,
    STACK_SIZE,
};
use crate::error::{Error, MemoryOutOfBoundsSnafu, StackOutOfBoundsSnafu};

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// The Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) a 16-bit stack pointer; it is never range checked when it moves, only when the
///   stack is indexed with it
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented once per tick
///
/// ## Memory
/// - 255 entry stack of return addresses
/// - 4095 bytes of addressable memory
///     - 0x000..0x050 holds the sprite sheet
///     - programs are loaded from 0x200
/// - 32x64 byte frame buffer
#[derive(Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
}

impl State {
    /// Power-on state with the sprite sheet and `program` in memory.
    /// The caller is responsible for checking that `program` fits.
    pub fn new(program: &[u8]) -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[0..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        let start = PROGRAM_START as usize;
        memory[start..start + program.len()].copy_from_slice(program);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub fn read(&self, address: usize) -> Result<u8, Error> {
        self.memory
            .get(address)
            .copied()
            .context(MemoryOutOfBoundsSnafu { address })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), Error> {
        let cell = self
            .memory
            .get_mut(address)
            .context(MemoryOutOfBoundsSnafu { address })?;
        *cell = value;
        Ok(())
    }

    /// Skips the next instruction
    pub fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    /// Stack[SP] = address; SP += 1
    pub fn push(&mut self, address: u16) -> Result<(), Error> {
        let sp = self.sp;
        let slot = self
            .stack
            .get_mut(usize::from(sp))
            .context(StackOutOfBoundsSnafu { sp })?;
        *slot = address;
        self.sp = sp.wrapping_add(1);
        Ok(())
    }

    /// SP -= 1; Stack[SP]
    pub fn pop(&mut self) -> Result<u16, Error> {
        self.sp = self.sp.wrapping_sub(1);
        let sp = self.sp;
        self.stack
            .get(usize::from(sp))
            .copied()
            .context(StackOutOfBoundsSnafu { sp })
    }
}
