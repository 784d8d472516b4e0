use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

mod audio;
mod keymap;
mod run;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rom = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("usage: chip8 <rom>");
            process::exit(1);
        }
    };

    if let Err(e) = run::run(rom) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
