//! Collaborators that connect a `Chip8` on the driver thread to SDL on the main thread.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam::channel::{bounded, unbounded, Receiver, Sender};
use log::debug;
use sdl2::audio::AudioCallback;

use chip8_core::constants::KEY_COUNT;
use chip8_core::{FrameBuffer, Input, Renderer, Sound};

/// A request for the window
pub enum Video {
    Clear,
    Draw(Box<FrameBuffer>),
}

/// Forwards everything the Chip-8 draws to the SDL thread.
pub struct ChannelRenderer {
    video: Sender<Video>,
}

pub fn video() -> (ChannelRenderer, Receiver<Video>) {
    let (tx, rx) = unbounded();
    (ChannelRenderer { video: tx }, rx)
}

impl Renderer for ChannelRenderer {
    fn clear(&mut self) {
        // Nobody is listening once the window has closed
        let _ = self.video.send(Video::Clear);
    }

    fn draw(&mut self, frame: &FrameBuffer) {
        let _ = self.video.send(Video::Draw(Box::new(*frame)));
    }
}

/// Switches the `SquareWave` playing on the SDL audio thread on and off.
pub struct Buzzer {
    tone: Arc<AtomicBool>,
}

impl Sound for Buzzer {
    fn set_tone(&mut self, on: bool) {
        if self.tone.swap(on, Ordering::Relaxed) != on {
            debug!("tone {}", if on { "on" } else { "off" });
        }
    }
}

pub struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
    tone: Arc<AtomicBool>,
}

/// A 440Hz square wave for a device sampling at `freq`, with the `Buzzer` that gates it.
pub fn buzzer(freq: i32) -> (Buzzer, SquareWave) {
    let tone = Arc::new(AtomicBool::new(false));
    (
        Buzzer { tone: tone.clone() },
        SquareWave {
            phase_inc: 440.0 / freq as f32,
            phase: 0.0,
            volume: 0.25,
            tone,
        },
    )
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        let on = self.tone.load(Ordering::Relaxed);
        for sample in out.iter_mut() {
            *sample = match (on, self.phase <= 0.5) {
                (false, _) => 0.0,
                (true, true) => self.volume,
                (true, false) => -self.volume,
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// The keyboard as the SDL thread sees it.
pub struct Keyboard {
    held: Arc<[AtomicBool; KEY_COUNT as usize]>,
    presses: Sender<u8>,
}

/// The keyboard as the Chip-8 sees it.
pub struct Keypad {
    held: Arc<[AtomicBool; KEY_COUNT as usize]>,
    presses: Receiver<u8>,
}

pub fn keyboard() -> (Keyboard, Keypad) {
    let held: Arc<[AtomicBool; KEY_COUNT as usize]> =
        Arc::new(std::array::from_fn(|_| AtomicBool::new(false)));
    let (tx, rx) = bounded(1);
    (
        Keyboard {
            held: held.clone(),
            presses: tx,
        },
        Keypad { held, presses: rx },
    )
}

impl Keyboard {
    pub fn key_down(&self, key: u8) {
        if let Some(held) = self.held.get(key as usize) {
            held.store(true, Ordering::SeqCst);
        }
        // Only the most recent press can satisfy a wait
        let _ = self.presses.try_send(key);
    }

    pub fn key_up(&self, key: u8) {
        if let Some(held) = self.held.get(key as usize) {
            held.store(false, Ordering::SeqCst);
        }
    }
}

impl Input for Keypad {
    fn is_pressed(&mut self, key: u8) -> bool {
        self.held
            .get(key as usize)
            .map(|held| held.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Blocks until a key goes down. Returns key 0 once the keyboard is gone so a stopping
    /// driver isn't held up.
    fn wait_for_key(&mut self) -> u8 {
        // A press from before the wait started doesn't count
        while self.presses.try_recv().is_ok() {}
        self.presses.recv().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_held_keys() {
        let (keyboard, mut keypad) = keyboard();
        keyboard.key_down(0xA);
        assert!(keypad.is_pressed(0xA));
        assert!(!keypad.is_pressed(0xB));
        keyboard.key_up(0xA);
        assert!(!keypad.is_pressed(0xA));
        assert!(!keypad.is_pressed(0x20));
    }

    #[test]
    fn test_wait_ignores_earlier_presses() {
        let (keyboard, mut keypad) = keyboard();
        keyboard.key_down(0x1);
        let waiter = thread::spawn(move || keypad.wait_for_key());
        thread::sleep(std::time::Duration::from_millis(50));
        keyboard.key_down(0x2);
        assert_eq!(waiter.join().unwrap(), 0x2);
    }

    #[test]
    fn test_wait_gives_up_when_keyboard_is_dropped() {
        let (keyboard, mut keypad) = keyboard();
        drop(keyboard);
        assert_eq!(keypad.wait_for_key(), 0);
    }

    #[test]
    fn test_renderer_forwards_in_order() {
        let (mut renderer, rx) = video();
        let mut frame: FrameBuffer = [[0; 64]; 32];
        frame[3][4] = 1;
        renderer.clear();
        renderer.draw(&frame);
        let sent: Vec<Video> = rx.try_iter().collect();
        assert!(matches!(sent[0], Video::Clear));
        match &sent[1] {
            Video::Draw(drawn) => assert_eq!(**drawn, frame),
            Video::Clear => panic!("expected a frame"),
        }
    }

    #[test]
    fn test_square_wave_is_silent_until_toned() {
        let (mut buzzer, mut wave) = buzzer(44_100);
        let mut out = [1.0f32; 64];
        wave.callback(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));

        buzzer.set_tone(true);
        wave.callback(&mut out);
        assert!(out.iter().all(|&s| s == 0.25 || s == -0.25));
        assert!(out.iter().any(|&s| s == 0.25));
    }
}
