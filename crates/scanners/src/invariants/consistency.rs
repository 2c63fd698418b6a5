use crate::analysis::{covered_pairs, naming};
use crate::core::{Invariant, Severity};
use crate::model::ContractModel;

/// Pairs each mapping with every total/count/supply counter.
/// Pairs already claimed by the token or vault rule are skipped.
#[derive(Default)]
pub struct ConsistencyInvariants;

impl ConsistencyInvariants {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Invariant> {
        let covered = covered_pairs(contract);
        let mut invariants = Vec::new();

        for mapping in contract.mappings() {
            for scalar in contract.scalars() {
                if !scalar.ty.is_numeric()
                    || scalar.is_constant
                    || !naming::is_aggregate_like(&scalar.name)
                {
                    continue;
                }
                if covered
                    .iter()
                    .any(|(m, s)| m == &mapping.name && s == &scalar.name)
                {
                    continue;
                }

                invariants.push(Invariant::new(
                    format!("INV-CONSISTENCY-{}-{}", mapping.name, scalar.name),
                    Severity::Low,
                    format!("`{}` stays consistent with `{}`", mapping.name, scalar.name),
                    format!(
                        "Every function that changes `{}` should update `{}` to match, or the \
                         relationship between them should be documented.",
                        mapping.name, scalar.name
                    ),
                    "mapping-total-consistency",
                ));
            }
        }

        invariants
    }
}

crate::impl_detector!(
    ConsistencyInvariants,
    finding: Invariant,
    id: "consistency-invariants",
    name: "Mapping and counter consistency"
);
