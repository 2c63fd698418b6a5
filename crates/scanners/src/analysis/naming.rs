//! Name-based role heuristics
//!
//! Discovery rules recognize roles (balance ledger, supply counter, owner,
//! pause flag) from identifier names. The substrings live here so every rule
//! agrees on what a "balance-like" or "owner-style" name is.

use crate::model::{FunctionModel, RequireFact};

const BALANCE_HINTS: &[&str] = &["balance", "deposit", "stake", "share"];
const AGGREGATE_HINTS: &[&str] = &["total", "count", "supply"];
const OWNER_HINTS: &[&str] = &["owner", "admin"];
const OWNER_MODIFIER_HINTS: &[&str] = &["owner", "admin", "auth", "role", "governance"];
const CAP_HINTS: &[&str] = &["cap", "max"];

fn contains_any(name: &str, hints: &[&str]) -> bool {
    let lower = name.to_lowercase();
    hints.iter().any(|h| lower.contains(h))
}

pub fn is_balance_like(name: &str) -> bool {
    contains_any(name, BALANCE_HINTS)
}

pub fn is_supply_like(name: &str) -> bool {
    contains_any(name, &["supply"])
}

pub fn is_total_like(name: &str) -> bool {
    contains_any(name, &["total"])
}

/// Counters a per-account mapping is expected to sum to.
pub fn is_aggregate_like(name: &str) -> bool {
    contains_any(name, AGGREGATE_HINTS)
}

pub fn is_owner_like(name: &str) -> bool {
    contains_any(name, OWNER_HINTS)
}

pub fn is_paused_like(name: &str) -> bool {
    contains_any(name, &["paused"])
}

pub fn is_cap_like(name: &str) -> bool {
    contains_any(name, CAP_HINTS)
}

/// `onlyOwner`, `onlyAdmin`, `onlyRole(..)`, `requiresAuth` and friends.
pub fn is_owner_modifier(name: &str) -> bool {
    name.starts_with("only") || contains_any(name, OWNER_MODIFIER_HINTS)
}

/// `whenNotPaused`, `whenPaused`, `notPaused`.
pub fn is_pause_modifier(name: &str) -> bool {
    contains_any(name, &["pause"])
}

/// A require that restricts the caller: it names an owner/admin/role or
/// compares `msg.sender` for equality.
pub fn is_caller_guard(require: &RequireFact) -> bool {
    require.arguments.iter().any(|argument| {
        let compact: String = argument.chars().filter(|c| !c.is_whitespace()).collect();
        contains_any(argument, &["owner", "admin", "role"])
            || compact.contains("msg.sender==")
            || compact.contains("==msg.sender")
    })
}

pub fn has_owner_modifier(function: &FunctionModel) -> bool {
    function.modifiers.iter().any(|m| is_owner_modifier(m))
}

pub fn has_pause_modifier(function: &FunctionModel) -> bool {
    function.modifiers.iter().any(|m| is_pause_modifier(m))
}

/// `ghost_balancesSum` for `balances`, `ghost_balancesSum` for `_balances`.
pub fn sum_ghost_name(mapping: &str) -> String {
    format!("ghost_{}Sum", mapping.trim_start_matches('_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RequireKind;

    fn require(argument: &str) -> RequireFact {
        RequireFact {
            kind: RequireKind::Require,
            arguments: vec![argument.to_string()],
            line: 1,
        }
    }

    #[test]
    fn test_role_names() {
        assert!(is_balance_like("balances"));
        assert!(is_balance_like("stakedAmount"));
        assert!(is_balance_like("userShares"));
        assert!(!is_balance_like("allowance"));
        assert!(is_supply_like("_totalSupply"));
        assert!(is_total_like("totalDeposited"));
        assert!(is_aggregate_like("holderCount"));
        assert!(is_owner_like("_owner"));
        assert!(is_paused_like("paused"));
        assert!(is_cap_like("MAX_SUPPLY"));
    }

    #[test]
    fn test_modifier_styles() {
        assert!(is_owner_modifier("onlyOwner"));
        assert!(is_owner_modifier("requiresAuth"));
        assert!(!is_owner_modifier("nonReentrant"));
        assert!(is_pause_modifier("whenNotPaused"));
        assert!(!is_pause_modifier("onlyOwner"));
    }

    #[test]
    fn test_caller_guards() {
        assert!(is_caller_guard(&require("msg.sender == owner")));
        assert!(is_caller_guard(&require("admin == msg.sender")));
        assert!(is_caller_guard(&require("hasRole(MINTER, msg.sender)")));
        assert!(!is_caller_guard(&require("balances[msg.sender] >= amount")));
        assert!(!is_caller_guard(&require("msg.sender != address(0)")));
    }

    #[test]
    fn test_sum_ghost_name() {
        assert_eq!(sum_ghost_name("balances"), "ghost_balancesSum");
        assert_eq!(sum_ghost_name("_balances"), "ghost_balancesSum");
    }
}
