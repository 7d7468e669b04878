//! Parser for the module description language.

use super::ast::*;
use crate::circuit::ModuleKind;
use crate::error::{PulseError, Result};

/// Separator between a module and its outputs.
const ARROW: &str = "->";

/// Line-oriented parser for module declarations.
pub struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    /// Create a new parser over the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Parse every declaration in the input.
    pub fn parse(&mut self) -> Result<CircuitAst> {
        let mut ast = CircuitAst::new();

        for (idx, raw) in self.input.lines().enumerate() {
            let line = idx + 1;
            let text = raw.trim();

            // Skip empty lines and comments
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            ast.modules.push(Self::parse_declaration(text, line)?);
        }

        Ok(ast)
    }

    fn parse_declaration(text: &str, line: usize) -> Result<ModuleDecl> {
        let (source, targets) = text
            .split_once(ARROW)
            .ok_or(PulseError::MissingArrow { line })?;

        let (kind, name) = ModuleKind::from_prefixed(source.trim());
        let name = name.trim();
        if name.is_empty() {
            return Err(PulseError::parse(line, "missing module name"));
        }
        if !Self::is_identifier(name) {
            return Err(PulseError::parse(line, format!("invalid module name: {:?}", name)));
        }

        let outputs = targets
            .split(',')
            .map(str::trim)
            .map(|target| {
                if target.is_empty() {
                    Err(PulseError::parse(line, format!("empty output name for '{}'", name)))
                } else if !Self::is_identifier(target) {
                    Err(PulseError::parse(line, format!("invalid output name: {:?}", target)))
                } else {
                    Ok(target.to_string())
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ModuleDecl {
            kind,
            name: name.to_string(),
            outputs,
            line,
        })
    }

    fn is_identifier(text: &str) -> bool {
        text.chars().all(|c| c.is_alphanumeric() || c == '_')
    }
}
