//! Find and print a path through an ASCII map or a generated cave.
//!
//! Run: cargo run --bin findpath -- demos/maps/room.txt --diagonal
//!
//! Set `RUST_LOG=debug` to see the search outcome, or `trace` for every
//! relaxation.

use clap::Parser;
use waypath_demos::{Options, run};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Options::parse();
    match run(&opts) {
        Ok(report) => print!("{report}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
