//! Module network representation and validation.
//!
//! This module provides the indexed representation of a network after
//! parsing. The [`Circuit`] struct holds every declared module with its
//! ordered fan-out, plus the name table covering sink-only modules.

mod graph;
mod types;
mod validate;

pub use graph::Circuit;
pub use types::*;
pub use validate::validate_circuit;
