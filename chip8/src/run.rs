use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::{debug, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::EventPump;

use c8vm::{Chip8, Error, Keymap, MappedKeys};
use c8vm_display::Display;

use crate::keymap::Layout;

/// Everything the front end can be configured with.
#[derive(Debug)]
pub struct Settings {
    pub rom: PathBuf,
    pub scale: u32,
    pub clock_hz: u32,
    pub timer_hz: u32,
    pub layout: Layout,
    pub seed: Option<u64>,
}

pub fn run(settings: Settings) -> anyhow::Result<()> {
    let mut chip8 = match settings.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };

    // Load ROM
    let file = File::open(&settings.rom)
        .with_context(|| format!("unable to open {}", settings.rom.display()))?;
    let mut reader = BufReader::new(file);
    chip8
        .load_rom(&mut reader)
        .with_context(|| format!("unable to load {}", settings.rom.display()))?;
    info!("running {}", settings.rom.display());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
    let mut display = Display::new(&sdl, "Chip-8", settings.scale).map_err(anyhow::Error::msg)?;
    let mut events = sdl.event_pump().map_err(anyhow::Error::msg)?;
    let keymap = settings.layout.keymap();

    // Set initial timing
    let cycle_time = Duration::from_secs(1) / settings.clock_hz.max(1);
    let cycles_per_timer_cycle = (settings.clock_hz / settings.timer_hz.max(1)).max(1);
    let mut timer_counter = 0;
    let mut last_cycle = Instant::now();

    let mut controls = Controls::default();
    // Events seen while blocked on a key wait, replayed before the next poll
    let mut waited: Vec<Event> = Vec::new();

    'event: loop {
        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            display.render(&frame).map_err(anyhow::Error::msg)?;
        }

        // Handle input
        for event in waited.drain(..).chain(events.poll_iter()) {
            if !handle_event(event, &keymap, &mut chip8, &mut controls)? {
                break 'event;
            }
        }

        // Update state
        if controls.rewind {
            chip8.rewind();
        } else {
            let step = {
                let mut input = MappedKeys::new(&keymap, key_downs(&mut events, &mut waited));
                chip8.step(&mut input)
            };
            match step {
                Ok(_) => {}
                Err(Error::UnmappedOpcode(op)) => debug!("skipping {:04X}", op),
                Err(e) => {
                    let pc = chip8.state().registers.pc;
                    return Err(e).with_context(|| format!("halted before pc{:04X}", pc));
                }
            }

            timer_counter += 1;
            if timer_counter == cycles_per_timer_cycle {
                timer_counter = 0;
                chip8.tick_timers();
            }
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if !controls.fast_forward && cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = Instant::now();
    }

    Ok(())
}

/// Host-side toggles driven by keys outside the keypad.
#[derive(Debug, Default)]
struct Controls {
    // Whether or not the clock speed should be respected
    fast_forward: bool,
    // Whether the program's state should be cycled forwards or backwards
    rewind: bool,
}

/// Applies an event to the keypad or the controls; `false` once the window is closed.
fn handle_event(
    event: Event,
    keymap: &Keymap<Keycode>,
    chip8: &mut Chip8,
    controls: &mut Controls,
) -> c8vm::Result<bool> {
    match event {
        Event::Quit { .. } => return Ok(false),
        Event::KeyDown {
            keycode: Some(key), ..
        } => match (key, keymap.map(&key)) {
            (_, Some(kc)) => chip8.key_press(kc)?,
            (Keycode::Space, _) => controls.fast_forward = true,
            (Keycode::Escape, _) => controls.rewind = true,
            _ => {}
        },
        Event::KeyUp {
            keycode: Some(key), ..
        } => match (key, keymap.map(&key)) {
            (_, Some(kc)) => chip8.key_release(kc)?,
            (Keycode::Space, _) => controls.fast_forward = false,
            (Keycode::Escape, _) => controls.rewind = false,
            _ => {}
        },
        _ => {}
    }
    Ok(true)
}

/// Blocks for each key going down; ends when the window is closed.
///
/// Every event it sees, including the key that ends the wait, is kept in
/// `waited` so the main loop still applies it.
fn key_downs<'a>(
    events: &'a mut EventPump,
    waited: &'a mut Vec<Event>,
) -> impl Iterator<Item = Keycode> + 'a {
    std::iter::from_fn(move || loop {
        let event = events.wait_event();
        let outcome = match event {
            Event::Quit { .. } => Some(None),
            Event::KeyDown {
                keycode: Some(key), ..
            } => Some(Some(key)),
            _ => None,
        };
        waited.push(event);
        if let Some(key) = outcome {
            return key;
        }
    })
}

#[cfg(test)]
mod tests {
    use sdl2::keyboard::Mod;

    use super::*;
    use crate::keymap::Layout;

    fn key_down(key: Keycode) -> Event {
        Event::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: Some(key),
            scancode: None,
            keymod: Mod::empty(),
            repeat: false,
        }
    }

    fn key_up(key: Keycode) -> Event {
        Event::KeyUp {
            timestamp: 0,
            window_id: 0,
            keycode: Some(key),
            scancode: None,
            keymod: Mod::empty(),
            repeat: false,
        }
    }

    #[test]
    fn test_events_from_a_key_wait_are_applied() {
        let keymap = Layout::Hex.keymap();
        let mut chip8 = Chip8::with_seed(0x8);
        let mut controls = Controls::default();
        for event in [key_down(Keycode::Num5), key_down(Keycode::Space)] {
            assert!(handle_event(event, &keymap, &mut chip8, &mut controls).unwrap());
        }

        // released during the wait, then the wait ends on 7
        let waited = vec![
            key_up(Keycode::Num5),
            key_up(Keycode::Space),
            key_down(Keycode::Num7),
        ];
        for event in waited {
            assert!(handle_event(event, &keymap, &mut chip8, &mut controls).unwrap());
        }
        assert!(!chip8.keyboard().is_down(0x5).unwrap());
        assert!(chip8.keyboard().is_down(0x7).unwrap());
        assert!(!controls.fast_forward);
    }

    #[test]
    fn test_escape_toggles_rewind() {
        let keymap = Layout::Hex.keymap();
        let mut chip8 = Chip8::with_seed(0x8);
        let mut controls = Controls::default();
        handle_event(key_down(Keycode::Escape), &keymap, &mut chip8, &mut controls).unwrap();
        assert!(controls.rewind);
        handle_event(key_up(Keycode::Escape), &keymap, &mut chip8, &mut controls).unwrap();
        assert!(!controls.rewind);
    }

    #[test]
    fn test_quit_stops() {
        let keymap = Layout::Hex.keymap();
        let mut chip8 = Chip8::with_seed(0x8);
        let mut controls = Controls::default();
        let quit = Event::Quit { timestamp: 0 };
        assert!(!handle_event(quit, &keymap, &mut chip8, &mut controls).unwrap());
    }
}
