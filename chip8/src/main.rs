use std::path::PathBuf;

use clap::Parser;

use crate::keymap::Layout;
use crate::run::Settings;

mod keymap;
mod run;

/// Runs a Chip-8 program in an SDL2 window.
///
/// Hold Space to run as fast as possible and Escape to rewind.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Size in screen pixels of each Chip-8 pixel
    #[arg(short, long, default_value_t = 10)]
    scale: u32,

    /// Instructions executed per second
    #[arg(short, long, default_value_t = 500)]
    clock_hz: u32,

    /// Delay and sound timer decrements per second
    #[arg(short, long, default_value_t = 60)]
    timer_hz: u32,

    /// Which host keys stand in for the hexadecimal keypad
    #[arg(short, long, value_enum, default_value_t = Layout::Hex)]
    layout: Layout,

    /// Seed for the random number instruction; seeded from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let settings = Settings {
        rom: args.rom,
        scale: args.scale,
        clock_hz: args.clock_hz,
        timer_hz: args.timer_hz,
        layout: args.layout,
        seed: args.seed,
    };
    run::run(settings)
}
