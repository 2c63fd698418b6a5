use crate::core::{Invariant, Severity};
use crate::model::ContractModel;

/// One underflow review claim per contract, anchored on the first function
/// (declaration order) that subtracts from state.
#[derive(Default)]
pub struct ArithmeticInvariants;

impl ArithmeticInvariants {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Invariant> {
        let hit = contract.functions.iter().find_map(|f| {
            f.state_changes
                .iter()
                .find(|c| c.is_subtraction() && contract.state_var(c.root()).is_some())
                .map(|c| (f, c))
        });

        match hit {
            Some((function, change)) => vec![Invariant::new(
                "INV-ARITHMETIC-UNDERFLOW",
                Severity::Medium,
                "State subtractions never underflow",
                format!(
                    "`{}` subtracts from `{}` at line {}; every subtraction from state must be \
                     preceded by a bound check or run under checked arithmetic.",
                    function.name, change.target, change.line
                ),
                "arithmetic-underflow",
            )
            .with_functions(vec![function.name.clone()])],
            None => Vec::new(),
        }
    }
}

crate::impl_detector!(
    ArithmeticInvariants,
    finding: Invariant,
    id: "arithmetic-invariants",
    name: "Arithmetic underflow review"
);
