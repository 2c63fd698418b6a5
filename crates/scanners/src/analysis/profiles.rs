//! Contract shape profiles shared by several rules.
//!
//! The token and vault rules both claim a (mapping, counter) pair; the
//! consistency rule must know which pairs they claimed, so the matching lives
//! in one place.

use crate::analysis::naming;
use crate::model::{ContractModel, FunctionModel, StateVariable};

#[derive(Debug, Clone, Copy)]
pub struct TokenProfile<'a> {
    pub transfer: &'a FunctionModel,
    pub balances: &'a StateVariable,
    pub supply: &'a StateVariable,
}

#[derive(Debug, Clone, Copy)]
pub struct VaultProfile<'a> {
    pub ledger: &'a StateVariable,
    pub total: &'a StateVariable,
}

/// Mapping from address to a number, the usual per-account ledger shape.
pub fn is_account_ledger(variable: &StateVariable) -> bool {
    match variable.mapping_types() {
        Some((key, value)) => key.is_address() && value.is_numeric(),
        None => false,
    }
}

fn is_numeric_scalar(variable: &StateVariable) -> bool {
    !variable.is_mapping() && variable.ty.is_numeric()
}

pub fn token_profile(contract: &ContractModel) -> Option<TokenProfile<'_>> {
    let transfer = contract.function("transfer")?;
    let balances = contract
        .mappings()
        .find(|v| is_account_ledger(v) && naming::is_balance_like(&v.name))?;
    let supply = contract
        .state_vars
        .iter()
        .find(|v| is_numeric_scalar(v) && !v.is_constant && naming::is_supply_like(&v.name))?;

    Some(TokenProfile {
        transfer,
        balances,
        supply,
    })
}

/// Total-like counter plus a balance-like ledger. Token-shaped contracts match
/// too, since a token sold for ether is also a deposit ledger.
pub fn vault_profile(contract: &ContractModel) -> Option<VaultProfile<'_>> {
    let ledger = contract.mappings().find(|v| {
        naming::is_balance_like(&v.name)
            && v.mapping_types().map(|(_, value)| value.is_numeric()).unwrap_or(false)
    })?;
    let total = contract
        .state_vars
        .iter()
        .find(|v| is_numeric_scalar(v) && !v.is_constant && naming::is_total_like(&v.name))?;

    Some(VaultProfile { ledger, total })
}

/// (mapping, counter) pairs already covered by a supply or accounting invariant.
pub fn covered_pairs(contract: &ContractModel) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Some(token) = token_profile(contract) {
        pairs.push((token.balances.name.clone(), token.supply.name.clone()));
    }
    if let Some(vault) = vault_profile(contract) {
        let pair = (vault.ledger.name.clone(), vault.total.name.clone());
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
    pairs
}

/// External read expression for a state variable, without the receiver:
/// the compiler-generated getter when the variable is public, otherwise a
/// same-named view function (`_totalSupply` read through `totalSupply()`).
/// Mapping accessors take `{key}` as a placeholder for the argument.
pub fn accessor(contract: &ContractModel, variable: &StateVariable) -> Option<String> {
    let call_suffix = if variable.is_mapping() { "({key})" } else { "()" };

    if variable.has_getter() {
        return Some(format!("{}{}", variable.name, call_suffix));
    }

    let public_name = variable.name.trim_start_matches('_');
    let candidates: &[&str] = if naming::is_balance_like(&variable.name) && variable.is_mapping() {
        &["balanceOf"]
    } else {
        &[]
    };

    let view = contract.functions.iter().find(|f| {
        f.is_callable_externally()
            && f.is_read_only()
            && (f.name == public_name || candidates.contains(&f.name.as_str()))
    })?;
    Some(format!("{}{}", view.name, call_suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_contracts;

    fn model(source: &str) -> ContractModel {
        parse_contracts(source).unwrap().remove(0)
    }

    const TOKEN: &str = r#"
        contract Token {
            mapping(address => uint256) private _balances;
            uint256 private _totalSupply;
            function transfer(address to, uint256 amount) public returns (bool) { return true; }
            function totalSupply() public view returns (uint256) { return _totalSupply; }
            function balanceOf(address a) external view returns (uint256) { return _balances[a]; }
        }
    "#;

    #[test]
    fn test_token_profile_and_accessors() {
        let token = model(TOKEN);
        let profile = token_profile(&token).unwrap();
        assert_eq!(profile.balances.name, "_balances");
        assert_eq!(profile.supply.name, "_totalSupply");
        let vault = vault_profile(&token).unwrap();
        assert_eq!(vault.ledger.name, "_balances");
        assert_eq!(vault.total.name, "_totalSupply");
        assert_eq!(
            covered_pairs(&token),
            vec![("_balances".to_string(), "_totalSupply".to_string())]
        );

        assert_eq!(accessor(&token, profile.supply).unwrap(), "totalSupply()");
        assert_eq!(accessor(&token, profile.balances).unwrap(), "balanceOf({key})");
    }

    #[test]
    fn test_vault_profile() {
        let vault = model(
            r#"
            contract Vault {
                mapping(address => uint256) public deposits;
                uint256 public totalDeposited;
                function deposit() external payable {}
            }
            "#,
        );
        assert!(token_profile(&vault).is_none());
        let profile = vault_profile(&vault).unwrap();
        assert_eq!(profile.ledger.name, "deposits");
        assert_eq!(profile.total.name, "totalDeposited");
        assert_eq!(accessor(&vault, profile.total).unwrap(), "totalDeposited()");
        assert_eq!(
            covered_pairs(&vault),
            vec![("deposits".to_string(), "totalDeposited".to_string())]
        );
    }
}
