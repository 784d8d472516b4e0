use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use sdl2::event::Event;

use chip8_core::{Machine, CLOCK_SPEED};
use chip8_display::Display;

use crate::audio::Beeper;
use crate::keymap::keymap;

pub fn run(rom: PathBuf) -> Result<(), Box<dyn Error>> {
    let mut machine = Machine::new();

    // Load ROM
    let file = File::open(rom)?;
    let mut reader = BufReader::new(file);
    machine.load_rom(&mut reader)?;

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl)?;
    let mut events = sdl.event_pump()?;

    // The machine starts the tone; the loop below stops it again
    let beeper = Rc::new(Beeper::new(&sdl)?);
    let hook = Rc::clone(&beeper);
    machine.set_beep(move || hook.start());

    // Set initial timing
    let cycle_time = Duration::new(0, CLOCK_SPEED);
    let mut last_cycle = Instant::now();

    'event: loop {
        // If a redraw is pending, consume it and render the frame
        if let Some(frame) = machine.frame() {
            display.render(&frame)?;
        }

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        machine.set_key(kc, true);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        machine.set_key(kc, false);
                    }
                }
                _ => continue,
            };
        }

        // Update state
        machine.cycle()?;
        if machine.sound_timer() == 0 {
            beeper.stop();
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = current_time;
    }

    Ok(())
}
