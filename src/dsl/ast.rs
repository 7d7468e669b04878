//! Abstract Syntax Tree types for the module description language.

use crate::circuit::ModuleKind;

/// Complete AST representation of a parsed module network.
#[derive(Debug, Clone, Default)]
pub struct CircuitAst {
    /// Module declarations in source order
    pub modules: Vec<ModuleDecl>,
}

impl CircuitAst {
    /// Create a new empty circuit AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A single `[%|&]name -> a, b, ...` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDecl {
    /// Module type, taken from the name prefix
    pub kind: ModuleKind,
    /// Module name without its prefix
    pub name: String,
    /// Output module names in declared order
    pub outputs: Vec<String>,
    /// Source line number for error reporting
    pub line: usize,
}

impl ModuleKind {
    /// Split a declared source into its kind and bare name.
    ///
    /// `%` marks a flip-flop, `&` a conjunction; anything else is the
    /// broadcast module.
    pub fn from_prefixed(source: &str) -> (ModuleKind, &str) {
        if let Some(name) = source.strip_prefix('%') {
            (ModuleKind::FlipFlop, name)
        } else if let Some(name) = source.strip_prefix('&') {
            (ModuleKind::Conjunction, name)
        } else {
            (ModuleKind::Broadcast, source)
        }
    }
}
