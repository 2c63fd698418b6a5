use crate::analysis::{accessor, naming, vault_profile};
use crate::core::{GhostType, GhostVariableSpec, Invariant, Severity};
use crate::invariants::token::initialized_at_deploy;
use crate::model::ContractModel;

/// Accounting conservation and native-balance solvency for vaults, staking
/// pools and other deposit ledgers.
#[derive(Default)]
pub struct VaultInvariants;

impl VaultInvariants {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Invariant> {
        let profile = match vault_profile(contract) {
            Some(profile) => profile,
            None => return Vec::new(),
        };

        let name = &contract.name;
        let total_read = accessor(contract, profile.total);
        let ghost_name = naming::sum_ghost_name(&profile.ledger.name);

        let tracked: Vec<String> = contract
            .functions
            .iter()
            .filter(|f| f.is_callable_externally() && !f.is_special())
            .filter(|f| f.writes(&profile.ledger.name) || f.writes(&profile.total.name))
            .map(|f| f.name.clone())
            .collect();

        let mut ghost = GhostVariableSpec::new(&ghost_name, GhostType::Uint256)
            .tracking(tracked.clone())
            .mirroring(&profile.ledger.name);
        if initialized_at_deploy(contract, profile.total) {
            ghost = ghost.seeded_from(&profile.total.name);
        }

        let mut accounting = Invariant::new(
            "INV-VAULT-ACCOUNTING",
            Severity::Critical,
            "Recorded total equals the sum of individual positions",
            format!(
                "`{}` must equal the sum of every entry in `{}` after any sequence of deposits \
                 and withdrawals.",
                profile.total.name, profile.ledger.name
            ),
            "accounting-conservation",
        )
        .with_ghost(ghost)
        .with_functions(tracked.clone());
        if let Some(read) = &total_read {
            accounting = accounting.with_assertion(format!("{}.{} == {}", name, read, ghost_name));
        }

        let mut invariants = vec![accounting];

        if contract.has_payable_function() {
            let mut solvency = Invariant::new(
                "INV-VAULT-SOLVENCY",
                Severity::Critical,
                "Contract holds enough ether to cover recorded deposits",
                format!(
                    "The native balance of `{}` must never fall below `{}`.",
                    name, profile.total.name
                ),
                "solvency",
            )
            .with_functions(tracked);
            if let Some(read) = &total_read {
                solvency = solvency
                    .with_assertion(format!("address({}).balance >= {}.{}", name, name, read));
            }
            invariants.push(solvency);
        }

        invariants
    }
}

crate::impl_detector!(
    VaultInvariants,
    finding: Invariant,
    id: "vault-invariants",
    name: "Vault accounting invariants",
    description: "Ledger-sum conservation and solvency for deposit-holding contracts"
);
