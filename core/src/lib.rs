//! # chip8-core
//! A Chip-8 CPU that talks to the outside world through three small traits:
//! - `Renderer` draws the 64x32 display
//! - `Sound` turns the buzzer on and off
//! - `Input` reads the hexadecimal keypad
//!
//! Build a `Chip8` with `Chip8::builder()`, then either call `Chip8::step` yourself or hand
//! it to a `Driver` to have it ticked at 60Hz on its own thread.
pub use builder::Builder;
pub use chip8::Chip8;
pub use constants::CLOCK_SPEED;
pub use driver::{Driver, Fault, Running};
pub use dump::StateDump;
pub use error::Error;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use peripherals::{Input, Renderer, Sound};
pub use rom::load_rom;
pub use state::FrameBuffer;

mod builder;
mod chip8;
pub mod constants;
mod driver;
mod dump;
mod error;
#[cfg(test)]
mod fakes;
mod instruction;
mod opcode;
mod peripherals;
mod rom;
mod state;
