//! `bytebrain`: drive a byte network through the two-player grid game.
//!
//! Examples:
//!   bytebrain
//!   bytebrain play --turns 200 --seed 7 --render
//!   bytebrain play --topology 1200-256-256-5 --json
//!   bytebrain assays --seeds 16
//!
//! The seed falls back to `BYTEBRAIN_SEED`, then to the wall clock.

mod assays;
mod config;
mod error;
mod play;

use std::process;

use tracing::error;

use config::{parse_args, Command, SEED_ENV};
use error::CliError;

fn main() {
    tracing_subscriber::fmt::init();

    let env_seed = std::env::var(SEED_ENV).ok();
    let result = parse_args(std::env::args().skip(1), env_seed).and_then(|cmd| match cmd {
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Play(cfg) => play::run(&cfg),
        Command::Assays(cfg) => assays::run(&cfg),
    });

    match result {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            print_help();
            process::exit(2);
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

fn print_help() {
    println!("bytebrain (byte-valued reward-trained network on a grid game)");
    println!("usage:");
    println!("  bytebrain [play] [options]");
    println!("  bytebrain assays [--seeds N] [options]");
    println!("  bytebrain --help");
    println!("options:");
    println!("  --turns N             game turns; the network moves every other turn (default 1000)");
    println!("  --seed S              RNG seed (else ${SEED_ENV}, else wall clock)");
    println!("  --topology A-B-...    layer widths (default 1200-1000-1000-5)");
    println!("  --offset N            input index of the 3x3 environment (default 500)");
    println!("  --prefix C            byte at input index 0 (default 's')");
    println!("  --reward-valid N      reward for a legal move (default 100)");
    println!("  --reward-invalid N    reward for a blocked move (default -500)");
    println!("  --render              print the grid and network dump each decision");
    println!("  --json                print the final summary as JSON");
}
