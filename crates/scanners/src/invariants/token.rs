use crate::analysis::{accessor, naming, token_profile};
use crate::core::{GhostType, GhostVariableSpec, Invariant, Severity};
use crate::model::{ContractModel, StateVariable};

pub const SENDER_DECREASE_GHOST: &str = "ghost_transferSenderDecrease";
pub const RECEIVER_INCREASE_GHOST: &str = "ghost_transferReceiverIncrease";

/// Supply conservation, mint ceiling, transfer symmetry, allowance and
/// zero-address claims for ERC20-shaped contracts.
#[derive(Default)]
pub struct TokenInvariants;

impl TokenInvariants {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Invariant> {
        let profile = match token_profile(contract) {
            Some(profile) => profile,
            None => return Vec::new(),
        };

        let name = &contract.name;
        let supply_read = accessor(contract, profile.supply);
        let balance_read = accessor(contract, profile.balances);
        let mut invariants = Vec::new();

        let sum_ghost = naming::sum_ghost_name(&profile.balances.name);
        let tracked: Vec<String> = contract
            .functions
            .iter()
            .filter(|f| f.is_callable_externally() && !f.is_special())
            .filter(|f| {
                let lower = f.name.to_lowercase();
                lower.contains("transfer") || lower.contains("mint") || lower.contains("burn")
            })
            .map(|f| f.name.clone())
            .collect();

        let mut ghost = GhostVariableSpec::new(&sum_ghost, GhostType::Uint256)
            .tracking(tracked.clone())
            .mirroring(&profile.balances.name);
        if initialized_at_deploy(contract, profile.supply) {
            ghost = ghost.seeded_from(&profile.supply.name);
        }

        let mut supply = Invariant::new(
            "INV-TOKEN-SUPPLY",
            Severity::Critical,
            "Total supply equals the sum of all balances",
            format!(
                "`{}` must always equal the sum of every entry in `{}`. Minting and burning \
                 must move both by the same amount; transfers must leave the sum unchanged.",
                profile.supply.name, profile.balances.name
            ),
            "supply-conservation",
        )
        .with_ghost(ghost)
        .with_functions(tracked);
        if let Some(read) = &supply_read {
            supply = supply.with_assertion(format!("{}.{} == {}", name, read, sum_ghost));
        }
        invariants.push(supply);

        let cap = contract.state_vars.iter().find(|v| {
            !v.is_mapping()
                && v.ty.is_numeric()
                && v.name != profile.supply.name
                && naming::is_cap_like(&v.name)
        });
        let mut ceiling = Invariant::new(
            "INV-TOKEN-MINT-CEILING",
            Severity::High,
            "Supply never exceeds the mint ceiling",
            match cap {
                Some(cap) => format!("`{}` must never exceed `{}`.", profile.supply.name, cap.name),
                None => format!(
                    "No cap variable was found; confirm whether `{}` is meant to be bounded.",
                    profile.supply.name
                ),
            },
            "mint-ceiling",
        );
        if let (Some(supply_read), Some(cap_read)) =
            (&supply_read, cap.and_then(|c| accessor(contract, c)))
        {
            ceiling = ceiling.with_assertion(format!(
                "{}.{} <= {}.{}",
                name, supply_read, name, cap_read
            ));
        }
        invariants.push(ceiling);

        let mut transfer_functions = vec![profile.transfer.name.clone()];
        if contract.has_function("transferFrom") {
            transfer_functions.push("transferFrom".to_string());
        }
        invariants.push(
            Invariant::new(
                "INV-TOKEN-TRANSFER-SYMMETRY",
                Severity::High,
                "Transfers move exactly the amount they debit",
                "Across all transfers the total decrease of sender balances must equal the \
                 total increase of recipient balances.",
                "transfer-symmetry",
            )
            .with_assertion(format!(
                "{} == {}",
                SENDER_DECREASE_GHOST, RECEIVER_INCREASE_GHOST
            ))
            .with_ghost(
                GhostVariableSpec::new(SENDER_DECREASE_GHOST, GhostType::Uint256)
                    .tracking(transfer_functions.clone())
                    .mirroring(&profile.balances.name),
            )
            .with_ghost(
                GhostVariableSpec::new(RECEIVER_INCREASE_GHOST, GhostType::Uint256)
                    .tracking(transfer_functions.clone())
                    .mirroring(&profile.balances.name),
            )
            .with_functions(transfer_functions),
        );

        if contract.has_function("approve") && contract.has_function("transferFrom") {
            invariants.push(
                Invariant::new(
                    "INV-TOKEN-ALLOWANCE",
                    Severity::Medium,
                    "transferFrom consumes allowance",
                    "A successful transferFrom must decrease the spender's allowance by the \
                     amount moved, unless the allowance is unlimited.",
                    "allowance-decrease",
                )
                .with_functions(vec!["approve".to_string(), "transferFrom".to_string()]),
            );
        }

        let guarded = profile
            .transfer
            .requires
            .iter()
            .any(|r| r.mentions("address(0)"));
        let mut zero = Invariant::new(
            "INV-TOKEN-ZERO-ADDRESS",
            if guarded { Severity::Low } else { Severity::Medium },
            "The zero address never holds tokens",
            if guarded {
                "transfer rejects the zero address; the zero address balance must stay zero."
            } else {
                "transfer does not check for the zero address, so tokens may be sent there \
                 and lost."
            },
            "zero-address-guard",
        )
        .with_functions(vec![profile.transfer.name.clone()]);
        if let Some(read) = balance_read {
            zero = zero.with_assertion(format!(
                "{}.{} == 0",
                name,
                read.replace("{key}", "address(0)")
            ));
        }
        invariants.push(zero);

        invariants
    }
}

/// The variable holds a value before the first fuzz call: the constructor
/// assigns it or the declaration has an initializer.
pub(crate) fn initialized_at_deploy(contract: &ContractModel, variable: &StateVariable) -> bool {
    variable.initializer.is_some()
        || contract
            .constructor()
            .map(|c| c.writes(&variable.name))
            .unwrap_or(false)
}

crate::impl_detector!(
    TokenInvariants,
    finding: Invariant,
    id: "token-invariants",
    name: "Fungible token invariants",
    description: "Supply conservation and transfer properties of ERC20-like contracts"
);
