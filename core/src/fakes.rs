//! Collaborators that record what the CPU asked of them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam::channel::{unbounded, Receiver, Sender};

use crate::peripherals::{Input, Renderer, Sound};
use crate::state::FrameBuffer;

#[derive(Default)]
pub struct Calls {
    pub clears: usize,
    pub frames: Vec<FrameBuffer>,
    pub tones: Vec<bool>,
}

/// Renderer and sound sink in one; clones share their record.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Calls>>);

impl Recorder {
    pub fn calls(&self) -> MutexGuard<'_, Calls> {
        self.0.lock().unwrap()
    }
}

impl Renderer for Recorder {
    fn clear(&mut self) {
        self.calls().clears += 1;
    }

    fn draw(&mut self, frame: &FrameBuffer) {
        self.calls().frames.push(*frame);
    }
}

impl Sound for Recorder {
    fn set_tone(&mut self, on: bool) {
        self.calls().tones.push(on);
    }
}

/// Input whose keys are pressed from the test through a `KeypadHandle`.
pub struct Keypad {
    held: Arc<Mutex<[bool; 16]>>,
    waiting: Arc<AtomicBool>,
    presses: Receiver<u8>,
}

#[derive(Clone)]
pub struct KeypadHandle {
    held: Arc<Mutex<[bool; 16]>>,
    waiting: Arc<AtomicBool>,
    presses: Sender<u8>,
}

pub fn keypad() -> (Keypad, KeypadHandle) {
    let held = Arc::new(Mutex::new([false; 16]));
    let waiting = Arc::new(AtomicBool::new(false));
    let (tx, rx) = unbounded();
    (
        Keypad {
            held: held.clone(),
            waiting: waiting.clone(),
            presses: rx,
        },
        KeypadHandle {
            held,
            waiting,
            presses: tx,
        },
    )
}

impl KeypadHandle {
    pub fn hold(&self, key: u8) {
        self.held.lock().unwrap()[key as usize] = true;
    }

    /// Satisfies one pending (or future) wait for a key
    pub fn press(&self, key: u8) {
        self.presses.send(key).unwrap();
    }

    /// Whether the CPU is blocked in `wait_for_key`
    pub fn is_waiting(&self) -> bool {
        self.waiting.load(Ordering::SeqCst)
    }
}

impl Input for Keypad {
    fn is_pressed(&mut self, key: u8) -> bool {
        self.held
            .lock()
            .unwrap()
            .get(key as usize)
            .copied()
            .unwrap_or(false)
    }

    fn wait_for_key(&mut self) -> u8 {
        self.waiting.store(true, Ordering::SeqCst);
        let key = self.presses.recv().unwrap_or(0);
        self.waiting.store(false, Ordering::SeqCst);
        key
    }
}
