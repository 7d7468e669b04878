//! Pulse - Module Network Simulator
//!
//! Presses the button of a pulse module network and reports how many high
//! and low pulses were sent.
//!
//! # Usage
//!
//! ```bash
//! pulse network.txt --presses 1000
//! RUST_LOG=info pulse network.txt --debug 2> trace.txt
//! ```

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use pulse_core::{
    circuit::Circuit,
    dsl,
    error::{PulseError, Result},
    sim::{run_presses, PressConfig},
    Engine, DEFAULT_PRESSES,
};

/// Pulse module network simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the module network description
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Number of button presses
    #[arg(short = 'n', long, default_value_t = DEFAULT_PRESSES)]
    presses: u64,

    /// Print every pulse to stderr
    #[arg(short, long)]
    debug: bool,

    /// Simulate every press instead of extrapolating from a repeating state
    #[arg(long)]
    no_cycle: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    // Parse the network description
    let ast = dsl::parse_file(&args.input_file)?;

    // Build the module graph
    let circuit = Circuit::from_ast(ast)?;

    // Validate
    pulse_core::circuit::validate_circuit(&circuit)?;

    let mut engine = Engine::new(circuit);
    let config = PressConfig::new()
        .with_presses(args.presses)
        .with_cycle_detection(!args.no_cycle);

    let mut stderr = std::io::stderr();
    let trace = args.debug.then_some(&mut stderr as &mut dyn Write);
    let total = run_presses(&mut engine, &config, trace)?;
    let product = total.product().ok_or(PulseError::CountOverflow {
        presses: args.presses,
    })?;

    eprintln!("{}", total);
    println!("{}", product);

    Ok(())
}
