use crate::analysis::naming;
use crate::core::{Invariant, Severity};
use crate::model::ContractModel;

#[derive(Default)]
pub struct PausableInvariants;

impl PausableInvariants {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Invariant> {
        let flag = match contract
            .state_vars
            .iter()
            .find(|v| naming::is_paused_like(&v.name))
        {
            Some(flag) => flag,
            None => return Vec::new(),
        };

        let guarded: Vec<String> = contract
            .functions
            .iter()
            .filter(|f| naming::has_pause_modifier(f))
            .map(|f| f.name.clone())
            .collect();

        if guarded.is_empty() {
            return Vec::new();
        }

        vec![Invariant::new(
            "INV-PAUSE-ENFORCEMENT",
            Severity::Medium,
            "Paused state blocks guarded functions",
            format!(
                "While `{}` is set, these functions must revert: {}.",
                flag.name,
                guarded.join(", ")
            ),
            "pause-enforcement",
        )
        .with_functions(guarded)]
    }
}

crate::impl_detector!(
    PausableInvariants,
    finding: Invariant,
    id: "pausable-invariants",
    name: "Pause enforcement"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_single;

    #[test]
    fn test_pause_claim_names_guarded_functions() {
        let invariants = PausableInvariants::new().detect_impl(&parse_single(
            r#"
            contract Pausable {
                bool public paused;
                modifier whenNotPaused() { require(!paused); _; }
                function deposit() external whenNotPaused {}
                function rescue() external {}
            }
            "#,
        ));
        assert_eq!(invariants.len(), 1);
        assert_eq!(invariants[0].functions, vec!["deposit"]);
    }

    #[test]
    fn test_flag_without_guarded_functions() {
        let invariants = PausableInvariants::new().detect_impl(&parse_single(
            "contract C { bool public paused; function f() external {} }",
        ));
        assert!(invariants.is_empty());
    }
}
