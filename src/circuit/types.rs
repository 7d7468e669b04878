//! Core types for module network representation.

use std::fmt;

/// A stable identifier for a module (or sink) in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub usize);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Index of a single-bit state cell owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub usize);

impl CellId {
    /// Placeholder cell addressed by pulses into the broadcast module.
    /// It never takes part in any logic and stays low.
    pub const BROADCAST: CellId = CellId(0);
}

/// Behavioural type of a declared module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// Relays every pulse; the unique entry point of a press
    Broadcast,
    /// Toggles on low pulses, ignores high pulses
    FlipFlop,
    /// Emits low only when every input edge was last seen high
    Conjunction,
}

/// Pulse level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Level {
    /// Low pulse (0)
    #[default]
    Low,
    /// High pulse (1)
    High,
}

impl Level {
    /// The opposite level.
    pub fn toggled(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => write!(f, "low"),
            Level::High => write!(f, "high"),
        }
    }
}

/// A declared module: its type and ordered fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDef {
    /// Module type
    pub kind: ModuleKind,
    /// Output targets in declared order, repeats included
    pub outputs: Vec<ModuleId>,
}

impl ModuleDef {
    /// Create a module definition.
    pub fn new(kind: ModuleKind, outputs: Vec<ModuleId>) -> Self {
        Self { kind, outputs }
    }
}
