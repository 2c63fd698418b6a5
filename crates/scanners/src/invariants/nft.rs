use crate::analysis::naming;
use crate::core::{Invariant, Severity};
use crate::model::{ContractModel, StateVariable};

/// Ownership claims for ERC721-shaped contracts. Neither claim has a
/// synthesizable assertion; the generated suite stubs them.
#[derive(Default)]
pub struct NftInvariants;

impl NftInvariants {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Invariant> {
        let has_owner_of = contract.has_function("ownerOf")
            || contract
                .state_var("ownerOf")
                .map(|v| v.has_getter())
                .unwrap_or(false);
        let has_safe_transfer = contract.has_function("safeTransferFrom");

        if !has_owner_of && !has_safe_transfer {
            return Vec::new();
        }

        let owners = match contract.mappings().find(|v| is_owner_tracking(v)) {
            Some(owners) => owners,
            None => return Vec::new(),
        };

        let functions: Vec<String> = contract
            .functions
            .iter()
            .filter(|f| f.writes(&owners.name))
            .map(|f| f.name.clone())
            .collect();

        vec![
            Invariant::new(
                "INV-NFT-OWNERSHIP",
                Severity::High,
                "Every minted token has exactly one recorded owner",
                format!(
                    "`{}` must map each existing token id to a non-zero owner, and the owner's \
                     balance must count that token.",
                    owners.name
                ),
                "ownership-consistency",
            )
            .with_functions(functions.clone()),
            Invariant::new(
                "INV-NFT-UNIQUE-OWNER",
                Severity::High,
                "No token is owned twice",
                "A transfer must remove the token from the previous owner before crediting the \
                 new one; no id may appear in two owners' holdings.",
                "unique-ownership",
            )
            .with_functions(functions),
        ]
    }
}

/// `_owners`, `ownerOf`, or any token-id-to-address mapping.
fn is_owner_tracking(variable: &StateVariable) -> bool {
    match variable.mapping_types() {
        Some((key, value)) => {
            value.is_address() && (key.is_uint() || naming::is_owner_like(&variable.name))
        }
        None => false,
    }
}

crate::impl_detector!(
    NftInvariants,
    finding: Invariant,
    id: "nft-invariants",
    name: "Non-fungible token invariants"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_single;

    #[test]
    fn test_nft_claims() {
        let invariants = NftInvariants::new().detect_impl(&parse_single(
            r#"
            contract Collectible {
                mapping(uint256 => address) private _owners;
                mapping(address => uint256) private _balances;
                function ownerOf(uint256 id) public view returns (address) { return _owners[id]; }
                function mint(address to, uint256 id) external { _owners[id] = to; _balances[to] += 1; }
            }
            "#,
        ));
        let ids: Vec<&str> = invariants.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["INV-NFT-OWNERSHIP", "INV-NFT-UNIQUE-OWNER"]);
        assert!(invariants.iter().all(|i| i.assertion.is_none()));
        assert_eq!(invariants[0].functions, vec!["mint"]);
    }

    #[test]
    fn test_accessor_without_owner_mapping() {
        let invariants = NftInvariants::new().detect_impl(&parse_single(
            r#"
            contract Lookalike {
                mapping(address => uint256) public scores;
                function ownerOf(uint256 id) public view returns (address) { return address(0); }
            }
            "#,
        ));
        assert!(invariants.is_empty());
    }
}
