use std::fs;
use std::path::Path;

use log::info;
use snafu::prelude::*;

use crate::error::{Error, RomLoadSnafu};

/// Read a whole ROM file.
///
/// ROMs are raw big-endian opcodes with no header; the first byte ends up at 0x200.
pub fn load_rom(path: impl AsRef<Path>) -> Result<Vec<u8>, Error> {
    let path = path.as_ref();
    let rom = fs::read(path).context(RomLoadSnafu { path })?;
    info!("loaded {} byte ROM from {}", rom.len(), path.display());
    Ok(rom)
}
