use crate::analysis::naming;
use crate::core::{Invariant, Severity};
use crate::model::ContractModel;

/// Functions that move a balance-like state variable without a single
/// require or revert in front of it.
#[derive(Default)]
pub struct UncheckedBalanceInvariants;

impl UncheckedBalanceInvariants {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Invariant> {
        contract
            .functions
            .iter()
            .filter(|f| !f.is_constructor() && f.requires.is_empty())
            .filter_map(|f| {
                let change = f.state_changes.iter().find(|c| {
                    naming::is_balance_like(c.root()) && contract.state_var(c.root()).is_some()
                })?;
                Some(
                    Invariant::new(
                        format!("INV-UNCHECKED-BALANCE-{}", f.name),
                        Severity::High,
                        format!("`{}` mutates balances without validation", f.name),
                        format!(
                            "`{}` writes `{}` (line {}) but performs no require or revert; \
                             amounts and callers are never checked.",
                            f.name, change.target, change.line
                        ),
                        "unchecked-balance-mutation",
                    )
                    .with_functions(vec![f.name.clone()]),
                )
            })
            .collect()
    }
}

crate::impl_detector!(
    UncheckedBalanceInvariants,
    finding: Invariant,
    id: "unchecked-balance",
    name: "Unchecked balance mutation"
);
