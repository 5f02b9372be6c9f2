use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, LevelFilter};

mod keymap;
mod peripherals;
mod run;

/// Play a Chip-8 ROM
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions (and timer ticks) per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    hz: u32,

    /// Size of each Chip-8 pixel on screen
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=40))]
    scale: u32,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    /// Seed for RND, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn setup_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = setup_logger(args.log_level) {
        eprintln!("unable to set up logging: {}", e);
        return ExitCode::FAILURE;
    }

    let interval = if args.hz == 60 {
        Duration::from_nanos(chip8_core::CLOCK_SPEED)
    } else {
        Duration::from_secs(1) / args.hz
    };
    let options = run::Options {
        rom: args.rom,
        interval,
        scale: args.scale,
        seed: args.seed,
    };

    match run::run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
