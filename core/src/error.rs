use std::path::PathBuf;

use snafu::prelude::*;

/// Everything that can go wrong while building or running a Chip-8.
///
/// `InvalidCollaborator`, `InvalidProgram` and `RomLoad` are raised before a CPU exists.
/// The remaining variants are raised by `Chip8::step` and end the session.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Invalid {} collaborator: none was provided", collaborator))]
    InvalidCollaborator { collaborator: &'static str },

    #[snafu(display("Invalid program ({} bytes): {}", len, reason))]
    InvalidProgram { len: usize, reason: &'static str },

    #[snafu(display("Unable to load ROM from {}: {}", path.display(), source))]
    RomLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Invalid instruction ({:04X}) at address: ${:04X}", opcode, address))]
    InvalidInstruction { opcode: u16, address: u16 },

    #[snafu(display("Out of bounds memory access at address: ${:04X}", address))]
    MemoryOutOfBounds { address: usize },

    #[snafu(display("Out of bounds stack access with SP: {:04X}", sp))]
    StackOutOfBounds { sp: u16 },
}
