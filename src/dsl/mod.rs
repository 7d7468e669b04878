//! Parser for module network descriptions.
//!
//! The description language is line-oriented: every line declares one
//! module, its type, and the ordered list of modules it sends pulses to.
//!
//! # Grammar Overview
//!
//! ```text
//! network     = { line }
//! line        = comment | declaration | empty
//! comment     = '#' { any_char }
//! declaration = [prefix] name '->' name { ',' name }
//!
//! prefix      = '%' | '&'
//! name        = (letter | digit | '_')+
//! ```
//!
//! # Module Types
//!
//! | Prefix | Type | Behaviour |
//! |--------|------|-----------|
//! | `%` | Flip-flop | Toggles on low pulses, ignores high pulses |
//! | `&` | Conjunction | Emits low once every input was last seen high |
//! | none | Broadcast | Relays every pulse to all outputs |
//!
//! Names that only ever appear as outputs are sinks: they receive pulses
//! but send none.
//!
//! # Example
//!
//! ```text
//! # Two flip-flops feeding an inverter
//! broadcaster -> a, b
//! %a -> inv
//! %b -> inv
//! &inv -> output
//! ```

mod ast;
mod parser;

pub use ast::*;
pub use parser::Parser;

use crate::error::Result;

/// Parse a module network description into an AST.
pub fn parse(input: &str) -> Result<CircuitAst> {
    let mut parser = Parser::new(input);
    parser.parse()
}

/// Parse a module network description file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<CircuitAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::PulseError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
