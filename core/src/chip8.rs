use log::trace;
use rand::rngs::StdRng;
use rand::RngCore;
use snafu::prelude::*;

use crate::builder::Builder;
use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, GLYPH_SIZE, MEMORY_SIZE, REGISTER_COUNT,
};
use crate::dump::StateDump;
use crate::error::{Error, MemoryOutOfBoundsSnafu};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::peripherals::{Input, Renderer, Sound};
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Owns:
///  - its `state`; nothing else ever mutates it
///  - the `renderer`, `sound` and `input` it reports to and queries
///  - the generator behind RND
///
/// Each call to `step` executes exactly one instruction and then ticks both timers.
pub struct Chip8 {
    state: State,
    renderer: Box<dyn Renderer>,
    sound: Box<dyn Sound>,
    input: Box<dyn Input>,
    rng: StdRng,
}

impl Chip8 {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn new(
        state: State,
        renderer: Box<dyn Renderer>,
        sound: Box<dyn Sound>,
        input: Box<dyn Input>,
        rng: StdRng,
    ) -> Self {
        Chip8 {
            state,
            renderer,
            sound,
            input,
            rng,
        }
    }

    /// Advances the CPU by a single tick
    /// - fetches the opcode at the PC and moves the PC past it
    /// - decodes and executes it
    /// - decrements the timers
    ///
    /// Any error is fatal: the state is left exactly as it was when the fault happened.
    pub fn step(&mut self) -> Result<(), Error> {
        let address = self.state.pc;
        let op = self.fetch(address)?;
        self.state.pc = address.wrapping_add(2);

        let instruction = Instruction::decode(op, address)?;
        trace!("{:04X}: {} {}", address, op, instruction);
        self.execute(instruction)?;

        self.tick_timers();
        Ok(())
    }

    /// Gets the opcode at `address`.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn fetch(&self, address: u16) -> Result<Opcode, Error> {
        let high = self.state.read(usize::from(address))?;
        let low = self.state.read(usize::from(address.wrapping_add(1)))?;
        Ok(Opcode::from_bytes(high, low))
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), Error> {
        use Instruction::*;

        let state = &mut self.state;
        match instruction {
            Cls => {
                state.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
                self.renderer.clear();
            }
            Ret => state.pc = state.pop()?,
            Sys { nnn } | Jp { nnn } => state.pc = nnn,
            Call { nnn } => {
                state.push(state.pc)?;
                state.pc = nnn;
            }
            SeByte { x, kk } => state.skip_if(state.v[x] == kk),
            SneByte { x, kk } => state.skip_if(state.v[x] != kk),
            SeReg { x, y } => state.skip_if(state.v[x] == state.v[y]),
            LdByte { x, kk } => state.v[x] = kk,
            AddByte { x, kk } => state.v[x] = state.v[x].wrapping_add(kk),
            LdReg { x, y } => state.v[x] = state.v[y],
            Or { x, y } => state.v[x] |= state.v[y],
            And { x, y } => state.v[x] &= state.v[y],
            Xor { x, y } => state.v[x] ^= state.v[y],
            // The flag is written after the result for ADD, but before it for the others;
            // the order matters when x or y is VF.
            AddReg { x, y } => {
                let sum = u16::from(state.v[x]) + u16::from(state.v[y]);
                state.v[x] = (sum & 0xFF) as u8;
                state.v[0xF] = u8::from(sum > 0xFF);
            }
            Sub { x, y } => {
                state.v[0xF] = u8::from(state.v[x] > state.v[y]);
                state.v[x] = state.v[x].wrapping_sub(state.v[y]);
            }
            Shr { x } => {
                state.v[0xF] = state.v[x] & 0x1;
                state.v[x] >>= 2;
            }
            Subn { x, y } => {
                state.v[0xF] = u8::from(state.v[y] > state.v[x]);
                state.v[x] = state.v[y].wrapping_sub(state.v[x]);
            }
            Shl { x } => {
                state.v[0xF] = state.v[x] >> 7;
                state.v[x] <<= 2;
            }
            SneReg { x, y } => state.skip_if(state.v[x] != state.v[y]),
            LdI { nnn } => state.i = nnn,
            JpV0 { nnn } => state.pc = nnn + u16::from(state.v[0x0]),
            Rnd { x, kk } => state.v[x] = (self.rng.next_u32() & 0xFF) as u8 & kk,
            Drw { x, y, n } => {
                draw_sprite(state, x, y, n)?;
                self.renderer.draw(&state.frame_buffer);
            }
            Skp { x } => {
                let pressed = self.input.is_pressed(state.v[x]);
                state.skip_if(pressed);
            }
            Sknp { x } => {
                let pressed = self.input.is_pressed(state.v[x]);
                state.skip_if(!pressed);
            }
            LdVxDt { x } => state.v[x] = state.delay_timer,
            LdVxK { x } => state.v[x] = self.input.wait_for_key(),
            LdDtVx { x } => state.delay_timer = state.v[x],
            LdStVx { x } => state.sound_timer = state.v[x],
            AddI { x } => state.i = state.i.wrapping_add(u16::from(state.v[x])),
            LdF { x } => state.i = u16::from(state.v[x].wrapping_mul(GLYPH_SIZE)),
            LdB { x } => {
                let value = state.v[x];
                let i = state.i;
                state.write(usize::from(i), value / 100 % 10)?;
                state.write(usize::from(i.wrapping_add(1)), value / 10 % 10)?;
                state.write(usize::from(i.wrapping_add(2)), value % 10)?;
            }
            StoreRegs { x } => {
                // Registers that would land past the end of memory are dropped
                let start = usize::from(state.i);
                ensure!(
                    start <= MEMORY_SIZE,
                    MemoryOutOfBoundsSnafu { address: start }
                );
                let destination = &mut state.memory[start..];
                let count = destination.len().min(x + 1);
                destination[..count].copy_from_slice(&state.v[..count]);
            }
            LoadRegs { x } => {
                // Faults on the first address past the end of memory, with V left untouched
                let mut loaded = [0; REGISTER_COUNT];
                for (offset, register) in (0..).zip(loaded[..=x].iter_mut()) {
                    *register = state.read(usize::from(state.i.wrapping_add(offset)))?;
                }
                state.v[..=x].copy_from_slice(&loaded[..=x]);
            }
        }
        Ok(())
    }

    /// Decrements both timers if they're running.
    /// The tone is reported on every tick the sound timer is running; it turns off on the
    /// tick the timer reaches 0.
    fn tick_timers(&mut self) {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }

        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
            self.sound.set_tone(self.state.sound_timer != 0);
        }
    }

    pub fn dump(&self) -> StateDump {
        StateDump::capture(&self.state)
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn i(&self) -> u16 {
        self.state.i
    }

    pub fn sp(&self) -> u16 {
        self.state.sp
    }

    pub fn v(&self) -> &[u8] {
        &self.state.v
    }

    pub fn stack(&self) -> &[u16] {
        &self.state.stack
    }

    pub fn memory(&self) -> &[u8] {
        &self.state.memory
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }
}

/// draw_sprite(x=Vx y=Vy height=n)
/// XORs the sprite in memory I..I+n at position Vx, Vy on the FrameBuffer with wrapping.
/// Sets VF if any pixel was erased.
fn draw_sprite(state: &mut State, x: usize, y: usize, n: u8) -> Result<(), Error> {
    let left = usize::from(state.v[x]);
    let top = usize::from(state.v[y]);
    let mut collision = false;

    for row in 0..u16::from(n) {
        let line = state.read(usize::from(state.i.wrapping_add(row)))?;
        let py = (top + usize::from(row)) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let px = (left + bit) % DISPLAY_WIDTH;
            let sprite_pixel = (line >> (7 - bit)) & 0x1;
            let pixel = &mut state.frame_buffer[py][px];
            collision |= *pixel == 1 && sprite_pixel == 1;
            *pixel ^= sprite_pixel;
        }
    }

    state.v[0xF] = u8::from(collision);
    Ok(())
}
