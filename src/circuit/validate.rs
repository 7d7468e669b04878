//! Module network validation.

use crate::error::{PulseError, Result};

use super::{Circuit, ModuleKind};

/// Validate a module network for simulation.
///
/// Checks:
/// - Exactly one broadcast module exists
/// - Every output refers to a known module or sink
/// - The name table covers every declared module
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    if circuit.names.len() < circuit.modules.len() {
        return Err(PulseError::topology(format!(
            "{} modules declared but only {} names given",
            circuit.modules.len(),
            circuit.names.len()
        )));
    }

    let mut broadcasters = circuit
        .modules
        .iter()
        .enumerate()
        .filter(|(_, m)| m.kind == ModuleKind::Broadcast)
        .map(|(idx, _)| idx);

    let first = broadcasters.next().ok_or(PulseError::MissingBroadcaster)?;
    if let Some(second) = broadcasters.next() {
        return Err(PulseError::MultipleBroadcasters {
            first: circuit.names[first].clone(),
            second: circuit.names[second].clone(),
        });
    }

    for (idx, module) in circuit.modules.iter().enumerate() {
        if let Some(target) = module.outputs.iter().find(|t| t.0 >= circuit.names.len()) {
            return Err(PulseError::topology(format!(
                "module '{}' outputs to unknown module {}",
                circuit.names[idx], target
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ModuleDef, ModuleId};
    use crate::dsl;

    fn build(input: &str) -> Circuit {
        Circuit::from_ast(dsl::parse(input).unwrap()).unwrap()
    }

    #[test]
    fn test_valid_circuit() {
        assert!(validate_circuit(&build("broadcaster -> a\n%a -> out")).is_ok());
    }

    #[test]
    fn test_missing_broadcaster() {
        let err = validate_circuit(&build("%a -> b\n&b -> a")).unwrap_err();
        assert!(matches!(err, PulseError::MissingBroadcaster));
    }

    #[test]
    fn test_multiple_broadcasters() {
        let err = validate_circuit(&build("broadcaster -> a\nrelay -> a\n%a -> out")).unwrap_err();
        match err {
            PulseError::MultipleBroadcasters { first, second } => {
                assert_eq!(first, "broadcaster");
                assert_eq!(second, "relay");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_output_index() {
        let circuit = Circuit::from_parts(
            vec![ModuleDef::new(ModuleKind::Broadcast, vec![ModuleId(5)])],
            vec!["broadcaster".to_string()],
        );
        let err = validate_circuit(&circuit).unwrap_err();
        assert!(matches!(err, PulseError::InvalidTopology { .. }));
    }
}
