//! Pulse propagation.
//!
//! The [`Engine`] simulates one button press at a time: a low pulse is
//! delivered to the broadcast module and every resulting pulse is
//! processed in FIFO order until none remain. The [`driver`] functions
//! build on it for long press sequences.

pub mod driver;
mod engine;

pub use driver::{detect_cycle, press_many, run_presses, Cycle, PressConfig};
pub use engine::{Engine, PulseCount};
