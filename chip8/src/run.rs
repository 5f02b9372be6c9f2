use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use crossbeam::channel::RecvTimeoutError;
use log::{info, warn};
use sdl2::audio::AudioSpecDesired;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chip8_core::{Chip8, Driver};
use chip8_display::Display;

use crate::keymap::keymap;
use crate::peripherals::{buzzer, keyboard, video, Video};

const FRAME_TIME: Duration = Duration::from_millis(16);
const SAMPLE_RATE: i32 = 44_100;

pub struct Options {
    pub rom: PathBuf,
    pub interval: Duration,
    pub scale: u32,
    pub seed: Option<u64>,
}

/// Plays a ROM until the window is closed or the Chip-8 faults.
pub fn run(options: Options) -> Result<(), Box<dyn Error>> {
    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl, options.scale)?;
    let mut events = sdl.event_pump()?;

    let audio = sdl.audio()?;
    let spec = AudioSpecDesired {
        freq: Some(SAMPLE_RATE),
        channels: Some(1),
        samples: None,
    };
    let mut sound = None;
    let device = audio.open_playback(None, &spec, |obtained| {
        let (buzzer, wave) = buzzer(obtained.freq);
        sound = Some(buzzer);
        wave
    })?;
    device.resume();
    let sound = sound.ok_or("audio device opened without a callback")?;

    let (renderer, frames) = video();
    let (keyboard, keypad) = keyboard();

    let mut builder = Chip8::builder()
        .renderer(renderer)
        .sound(sound)
        .input(keypad)
        .rom(&options.rom)?;
    if let Some(seed) = options.seed {
        builder = builder.seed(seed);
    }
    let chip8 = builder.build()?;

    let running = Driver::new(options.interval).start(chip8);

    'event: loop {
        // Only the latest request matters, a Clear followed by a Draw is just the Draw
        let latest = match frames.recv_timeout(FRAME_TIME) {
            Ok(video) => Some(video),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        };
        match frames.try_iter().last().or(latest) {
            Some(Video::Draw(frame)) => display.render(&frame)?,
            Some(Video::Clear) => display.clear(),
            None => {}
        }

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => {
                    if let Some(kc) = keymap(key) {
                        keyboard.key_down(kc)
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        keyboard.key_up(kc)
                    }
                }
                _ => continue,
            };
        }

        if running.is_finished() {
            warn!("the Chip-8 stopped on its own");
            break;
        }
    }

    running.stop();
    // Releases a step blocked on LD Vx, K
    drop(keyboard);
    let chip8 = running.join()?;
    info!("quit at ${:04X}", chip8.pc());
    Ok(())
}
