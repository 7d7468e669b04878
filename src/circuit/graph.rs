//! Module network graph structure.

use std::collections::HashMap;

use super::types::{ModuleDef, ModuleId, ModuleKind};
use crate::dsl::CircuitAst;
use crate::error::{PulseError, Result};

/// A module network ready for simulation.
///
/// Declared modules occupy indices `0..modules.len()`. Every index from
/// `modules.len()` up to `names.len()` is a sink: a name that is only ever
/// referenced as an output.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Declared modules, indexed by [`ModuleId`]
    pub modules: Vec<ModuleDef>,

    /// Names of all modules and sinks, indexed by [`ModuleId`]
    pub names: Vec<String>,

    /// Mapping from names to module IDs
    pub name_map: HashMap<String, ModuleId>,
}

impl Circuit {
    /// Build a circuit from a parsed AST.
    pub fn from_ast(ast: CircuitAst) -> Result<Self> {
        let mut name_map = HashMap::new();
        let mut names = Vec::with_capacity(ast.modules.len());

        // Index every declaration before resolving any output, so a name can
        // never be handed out as a sink and later turn out to be declared.
        for decl in &ast.modules {
            if name_map.contains_key(&decl.name) {
                return Err(PulseError::DuplicateModule {
                    name: decl.name.clone(),
                    line: decl.line,
                });
            }
            name_map.insert(decl.name.clone(), ModuleId(names.len()));
            names.push(decl.name.clone());
        }

        let mut modules = Vec::with_capacity(ast.modules.len());
        for decl in ast.modules {
            let mut outputs = Vec::with_capacity(decl.outputs.len());
            for target in &decl.outputs {
                if *target == decl.name {
                    return Err(PulseError::SelfLoop {
                        name: decl.name,
                        line: decl.line,
                    });
                }
                let id = match name_map.get(target) {
                    Some(&id) => id,
                    None => {
                        // Sink-only module
                        let id = ModuleId(names.len());
                        name_map.insert(target.clone(), id);
                        names.push(target.clone());
                        id
                    }
                };
                outputs.push(id);
            }
            modules.push(ModuleDef::new(decl.kind, outputs));
        }

        Ok(Circuit {
            modules,
            names,
            name_map,
        })
    }

    /// Build a circuit from already indexed module records and names.
    ///
    /// `names` must cover every declared module plus every sink referenced
    /// by an output.
    pub fn from_parts(modules: Vec<ModuleDef>, names: Vec<String>) -> Self {
        let name_map = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), ModuleId(idx)))
            .collect();
        Self {
            modules,
            names,
            name_map,
        }
    }

    /// Number of declared modules (sinks excluded).
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module is declared.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Number of addressable modules, sinks included.
    pub fn total_names(&self) -> usize {
        self.names.len()
    }

    /// Whether the module only receives pulses.
    pub fn is_sink(&self, id: ModuleId) -> bool {
        id.0 >= self.modules.len()
    }

    /// Kind of a declared module, `None` for sinks.
    pub fn kind(&self, id: ModuleId) -> Option<ModuleKind> {
        self.modules.get(id.0).map(|m| m.kind)
    }

    /// Find a module ID by name.
    pub fn find_module(&self, name: &str) -> Option<ModuleId> {
        self.name_map.get(name).copied()
    }

    /// Get the name of a module, `None` if the name table does not cover it.
    pub fn module_name(&self, id: ModuleId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    /// The first broadcast module, if any.
    pub fn broadcaster(&self) -> Option<ModuleId> {
        self.modules
            .iter()
            .position(|m| m.kind == ModuleKind::Broadcast)
            .map(ModuleId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;

    fn build(input: &str) -> Result<Circuit> {
        Circuit::from_ast(dsl::parse(input)?)
    }

    #[test]
    fn test_declared_indices_follow_source_order() {
        let circuit = build("broadcaster -> a, b\n%a -> inv\n%b -> inv\n&inv -> output").unwrap();
        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.find_module("broadcaster"), Some(ModuleId(0)));
        assert_eq!(circuit.find_module("a"), Some(ModuleId(1)));
        assert_eq!(circuit.find_module("inv"), Some(ModuleId(3)));
        assert_eq!(circuit.broadcaster(), Some(ModuleId(0)));
    }

    #[test]
    fn test_sinks_indexed_after_declarations() {
        let circuit = build("broadcaster -> x, a\n%a -> y, x").unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.total_names(), 4);
        assert_eq!(circuit.find_module("x"), Some(ModuleId(2)));
        assert_eq!(circuit.find_module("y"), Some(ModuleId(3)));
        assert!(circuit.is_sink(ModuleId(2)));
        assert!(!circuit.is_sink(ModuleId(1)));
        assert_eq!(circuit.kind(ModuleId(3)), None);
        assert_eq!(circuit.modules[1].outputs, vec![ModuleId(3), ModuleId(2)]);
    }

    #[test]
    fn test_forward_reference_is_not_a_sink() {
        // `b` is referenced before its declaration
        let circuit = build("broadcaster -> b\n%b -> out").unwrap();
        assert_eq!(circuit.find_module("b"), Some(ModuleId(1)));
        assert_eq!(circuit.kind(ModuleId(1)), Some(ModuleKind::FlipFlop));
    }

    #[test]
    fn test_repeated_targets_kept() {
        let circuit = build("broadcaster -> c, c\n&c -> out").unwrap();
        assert_eq!(circuit.modules[0].outputs, vec![ModuleId(1), ModuleId(1)]);
    }

    #[test]
    fn test_duplicate_module() {
        let err = build("broadcaster -> a\n%a -> b\n&a -> b").unwrap_err();
        assert!(matches!(err, PulseError::DuplicateModule { line: 3, .. }));
    }

    #[test]
    fn test_self_loop() {
        let err = build("broadcaster -> a\n%a -> b, a").unwrap_err();
        assert!(matches!(err, PulseError::SelfLoop { line: 2, .. }));
    }

    #[test]
    fn test_from_parts() {
        let circuit = Circuit::from_parts(
            vec![ModuleDef::new(ModuleKind::Broadcast, vec![ModuleId(1)])],
            vec!["broadcaster".to_string(), "out".to_string()],
        );
        assert_eq!(circuit.find_module("out"), Some(ModuleId(1)));
        assert!(circuit.is_sink(ModuleId(1)));
        assert_eq!(circuit.module_name(ModuleId(0)), Some("broadcaster"));
        assert_eq!(circuit.module_name(ModuleId(2)), None);
    }
}
