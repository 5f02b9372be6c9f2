use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{bounded, select, tick, Sender};
use log::{error, info};
use snafu::prelude::*;

use crate::chip8::Chip8;
use crate::constants::CLOCK_SPEED;
use crate::dump::StateDump;
use crate::error::Error;

/// A Chip8 that stopped because `step` failed.
#[derive(Debug, Snafu)]
#[snafu(display("Chip-8 halted at ${:04X}: {}", dump.pc, source))]
pub struct Fault {
    source: Error,
    dump: StateDump,
}

impl Fault {
    pub fn error(&self) -> &Error {
        &self.source
    }

    /// The state of the CPU at the moment it failed
    pub fn dump(&self) -> &StateDump {
        &self.dump
    }
}

/// Steps a Chip8 on its own thread at a fixed rate.
///
/// One instruction is executed per tick, so `interval` sets both the instruction rate and
/// the timer rate.
#[derive(Copy, Clone, Debug)]
pub struct Driver {
    interval: Duration,
}

impl Default for Driver {
    fn default() -> Self {
        Driver::new(Duration::from_nanos(CLOCK_SPEED))
    }
}

impl Driver {
    pub fn new(interval: Duration) -> Self {
        Driver { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Moves `chip8` onto a worker thread and starts ticking it.
    pub fn start(&self, mut chip8: Chip8) -> Running {
        let running = Arc::new(AtomicBool::new(true));
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let ticker = tick(self.interval);
        let interval = self.interval;

        let worker = {
            let running = running.clone();
            thread::spawn(move || {
                info!("ticking every {:?}", interval);
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {}
                    }
                    if !running.load(Ordering::SeqCst) {
                        break;
                    }
                    if let Err(source) = chip8.step() {
                        let dump = chip8.dump();
                        error!("{}\n{}", source, dump);
                        return Err(Fault { source, dump });
                    }
                }
                info!("stopped at ${:04X}", chip8.pc());
                Ok(chip8)
            })
        };

        Running {
            running,
            stop_tx,
            worker,
        }
    }
}

/// Handle to a Chip8 being ticked by a `Driver`.
pub struct Running {
    running: Arc<AtomicBool>,
    stop_tx: Sender<()>,
    worker: JoinHandle<Result<Chip8, Fault>>,
}

impl Running {
    /// No tick starts after this returns.
    ///
    /// A step that is already blocked waiting for a key stays blocked until the key comes.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        // Wakes the worker up early; if the buffer is full it's already being told to stop
        let _ = self.stop_tx.try_send(());
    }

    /// Whether the worker has exited, either because it was stopped or because it faulted.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the worker to exit and hands back the Chip8, or the fault that halted it.
    pub fn join(self) -> Result<Chip8, Fault> {
        match self.worker.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}
