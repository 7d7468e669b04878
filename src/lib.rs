//! # Pulse Core
//!
//! A simulator for networks of pulse-exchanging logic modules.
//!
//! This library provides:
//! - A line-oriented description language for module networks
//! - A graph builder that assigns every module and sink a stable index
//! - A breadth-first pulse engine with persistent flip-flop and conjunction state
//! - A press driver that sums pulse counts over many button presses
//!
//! ## Architecture
//!
//! - [`dsl`] - Parser for the `name -> a, b` description format
//! - [`circuit`] - Module graph representation and validation
//! - [`sim`] - Pulse engine and press driver
//!
//! ## Usage
//!
//! ```bash
//! pulse circuit.txt --presses 1000
//! ```
//!
//! ```
//! use pulse_core::{circuit::Circuit, dsl, Engine};
//!
//! let ast = dsl::parse("broadcaster -> a\n%a -> out").unwrap();
//! let circuit = Circuit::from_ast(ast).unwrap();
//! let mut engine = Engine::new(circuit);
//! let count = engine.run();
//! assert_eq!((count.high, count.low), (1, 2));
//! ```
//!
//! ## Propagation Model
//!
//! Each press seeds one low pulse at the broadcast module. Pulses are
//! delivered in strict FIFO order:
//!
//! 1. Flip-flops ignore high pulses and toggle on low pulses, emitting their new state
//! 2. Conjunctions remember the last level from each input edge and emit low
//!    only when every remembered level is high
//! 3. The broadcast module relays whatever it receives
//!
//! Module state is never reset between presses.

pub mod circuit;
pub mod dsl;
pub mod error;
pub mod sim;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{PulseError, Result};
pub use sim::{Engine, PulseCount};

/// Default number of button presses performed by the CLI.
pub const DEFAULT_PRESSES: u64 = 1000;
