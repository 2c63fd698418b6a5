use crate::analysis::naming;
use crate::core::{Invariant, Severity};
use crate::model::ContractModel;

/// Ownership claims. Both are structural and carry no assertion.
#[derive(Default)]
pub struct AccessControlInvariants;

impl AccessControlInvariants {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Invariant> {
        let owner = match contract
            .state_vars
            .iter()
            .find(|v| !v.is_mapping() && naming::is_owner_like(&v.name))
        {
            Some(owner) => owner,
            None => return Vec::new(),
        };

        let writers: Vec<String> = contract
            .functions
            .iter()
            .filter(|f| !f.is_constructor() && f.writes(&owner.name))
            .map(|f| f.name.clone())
            .collect();

        let mut invariants = vec![Invariant::new(
            "INV-OWNER-IMMUTABLE",
            Severity::High,
            "Ownership only changes through guarded functions",
            format!(
                "`{}` is set at deployment and may only change through an explicitly guarded \
                 ownership transfer.",
                owner.name
            ),
            "ownership-immutability",
        )
        .with_functions(writers)];

        let guarded: Vec<String> = contract
            .functions
            .iter()
            .filter(|f| naming::has_owner_modifier(f))
            .map(|f| f.name.clone())
            .collect();

        if !guarded.is_empty() {
            invariants.push(
                Invariant::new(
                    "INV-ACCESS-CONTROL",
                    Severity::High,
                    "Privileged functions reject non-owner callers",
                    format!(
                        "Only `{}` may successfully call: {}.",
                        owner.name,
                        guarded.join(", ")
                    ),
                    "access-control-enforcement",
                )
                .with_functions(guarded),
            );
        }

        invariants
    }
}

crate::impl_detector!(
    AccessControlInvariants,
    finding: Invariant,
    id: "access-control-invariants",
    name: "Access control invariants"
);
