use std::path::Path;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use snafu::prelude::*;

use crate::chip8::Chip8;
use crate::constants::MAX_PROGRAM_SIZE;
use crate::error::{Error, InvalidCollaboratorSnafu, InvalidProgramSnafu};
use crate::peripherals::{Input, Renderer, Sound};
use crate::rom::load_rom;
use crate::state::State;

/// Collects everything a Chip8 needs before it can be powered on.
///
/// ```no_run
/// # use chip8_core::{Chip8, Error, FrameBuffer, Input, Renderer, Sound};
/// # struct Screen; impl Renderer for Screen { fn clear(&mut self) {} fn draw(&mut self, _: &FrameBuffer) {} }
/// # struct Buzzer; impl Sound for Buzzer { fn set_tone(&mut self, _: bool) {} }
/// # struct Keypad; impl Input for Keypad { fn is_pressed(&mut self, _: u8) -> bool { false } fn wait_for_key(&mut self) -> u8 { 0 } }
/// # fn main() -> Result<(), Error> {
/// let chip8 = Chip8::builder()
///     .renderer(Screen)
///     .sound(Buzzer)
///     .input(Keypad)
///     .rom("roms/pong.ch8")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Builder {
    renderer: Option<Box<dyn Renderer>>,
    sound: Option<Box<dyn Sound>>,
    input: Option<Box<dyn Input>>,
    program: Option<Vec<u8>>,
    seed: Option<u64>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn sound(mut self, sound: impl Sound + 'static) -> Self {
        self.sound = Some(Box::new(sound));
        self
    }

    pub fn input(mut self, input: impl Input + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Use `program` as the ROM; it is loaded at 0x200.
    pub fn program(mut self, program: impl Into<Vec<u8>>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Read the ROM from a file
    pub fn rom(self, path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(self.program(load_rom(path)?))
    }

    /// Seed the generator behind RND so that runs can be replayed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Powers on a Chip8.
    ///
    /// Fails with `InvalidCollaborator` if the renderer, sound or input is missing, and
    /// with `InvalidProgram` if there's no program or it doesn't fit in memory.
    pub fn build(self) -> Result<Chip8, Error> {
        let renderer = self.renderer.context(InvalidCollaboratorSnafu {
            collaborator: "renderer",
        })?;
        let sound = self.sound.context(InvalidCollaboratorSnafu {
            collaborator: "sound",
        })?;
        let input = self.input.context(InvalidCollaboratorSnafu {
            collaborator: "input",
        })?;
        let program = self.program.context(InvalidProgramSnafu {
            len: 0usize,
            reason: "no program was provided",
        })?;
        ensure!(
            program.len() <= MAX_PROGRAM_SIZE,
            InvalidProgramSnafu {
                len: program.len(),
                reason: "it does not fit in program memory",
            }
        );

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!("powering on with a {} byte program", program.len());

        Ok(Chip8::new(
            State::new(&program),
            renderer,
            sound,
            input,
            rng,
        ))
    }
}
