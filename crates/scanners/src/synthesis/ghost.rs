//! Ghost variable update rules.
//!
//! A handler updates a ghost after a successful call only when the ghost
//! tracks that function and a row of `GHOST_UPDATE_RULES` matches the
//! (ghost name, function name) pair. Rows are tried in order and the first
//! one whose placeholders can all be bound wins. Tracked pairs with no
//! matching row leave the ghost untouched; the handler marks them with a
//! comment so the gap is visible in the generated source.
//!
//! Placeholders: `{ghost}`, `{amount}` (the bounded amount argument),
//! `{msgValue}` (payable functions only), `{senderBalance}` and
//! `{recipientBalance}` (reads of the mirrored mapping for the paying and
//! receiving account).

use crate::core::GhostVariableSpec;
use crate::model::FunctionModel;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostPattern {
    Exact(&'static str),
    /// `ghost_<mapping>Sum`
    Sum,
}

impl GhostPattern {
    pub fn matches(&self, ghost: &str) -> bool {
        match self {
            Self::Exact(name) => ghost == *name,
            Self::Sum => ghost.starts_with("ghost_") && ghost.ends_with("Sum"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionPattern {
    /// Case-insensitive substrings; any one must occur in the function name.
    pub any_of: &'static [&'static str],
    pub payable: Option<bool>,
}

impl FunctionPattern {
    pub fn matches(&self, function: &FunctionModel) -> bool {
        let lower = function.name.to_lowercase();
        self.any_of.iter().any(|s| lower.contains(s))
            && self.payable.map(|p| p == function.is_payable()).unwrap_or(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostUpdateRule {
    pub ghost: GhostPattern,
    pub function: FunctionPattern,
    /// Statement run before the call, typically a snapshot.
    pub before: Option<&'static str>,
    /// Statement run after the call succeeds.
    pub after: &'static str,
}

const OUTFLOW: &[&str] = &["withdraw", "unstake", "burn", "redeem"];
const INFLOW: &[&str] = &["deposit", "stake"];
const ISSUE: &[&str] = &["mint", "deposit", "stake"];

pub const GHOST_UPDATE_RULES: &[GhostUpdateRule] = &[
    GhostUpdateRule {
        ghost: GhostPattern::Exact(crate::invariants::token::SENDER_DECREASE_GHOST),
        function: FunctionPattern {
            any_of: &["transfer"],
            payable: None,
        },
        before: Some("uint256 {ghost}Before = {senderBalance}"),
        after: "if ({ghost}Before > {senderBalance}) {ghost} += {ghost}Before - {senderBalance}",
    },
    GhostUpdateRule {
        ghost: GhostPattern::Exact(crate::invariants::token::RECEIVER_INCREASE_GHOST),
        function: FunctionPattern {
            any_of: &["transfer"],
            payable: None,
        },
        before: Some("uint256 {ghost}Before = {recipientBalance}"),
        after: "if ({recipientBalance} > {ghost}Before) {ghost} += {recipientBalance} - {ghost}Before",
    },
    GhostUpdateRule {
        ghost: GhostPattern::Sum,
        function: FunctionPattern {
            any_of: OUTFLOW,
            payable: None,
        },
        before: None,
        after: "{ghost} -= {amount}",
    },
    GhostUpdateRule {
        ghost: GhostPattern::Sum,
        function: FunctionPattern {
            any_of: OUTFLOW,
            payable: None,
        },
        before: Some("uint256 {ghost}Before = {senderBalance}"),
        after: "if ({ghost}Before > {senderBalance}) {ghost} -= {ghost}Before - {senderBalance}",
    },
    GhostUpdateRule {
        ghost: GhostPattern::Sum,
        function: FunctionPattern {
            any_of: INFLOW,
            payable: Some(true),
        },
        before: None,
        after: "{ghost} += {msgValue}",
    },
    GhostUpdateRule {
        ghost: GhostPattern::Sum,
        function: FunctionPattern {
            any_of: ISSUE,
            payable: None,
        },
        before: None,
        after: "{ghost} += {amount}",
    },
];

/// Placeholder values available for one (ghost, function) pair.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: BTreeMap<&'static str, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Substitutes `{name}` placeholders; `None` when any is unbound.
pub fn fill(template: &str, bindings: &Bindings) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let close = rest[open..].find('}')? + open;
        let key = &rest[open + 1..close];
        out.push_str(bindings.get(key)?);
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    Some(out)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostUpdate {
    pub before: Option<String>,
    pub after: String,
}

/// The update for `ghost` after a successful call to `function`, if the
/// ghost tracks it and a rule applies.
pub fn resolve(
    ghost: &GhostVariableSpec,
    function: &FunctionModel,
    bindings: &Bindings,
) -> Option<GhostUpdate> {
    if !ghost.tracks(&function.name) {
        return None;
    }

    let mut bindings = bindings.clone();
    bindings.set("ghost", ghost.name.clone());

    GHOST_UPDATE_RULES
        .iter()
        .filter(|rule| rule.ghost.matches(&ghost.name) && rule.function.matches(function))
        .find_map(|rule| {
            let before = match rule.before {
                Some(template) => Some(fill(template, &bindings)?),
                None => None,
            };
            let after = fill(rule.after, &bindings)?;
            Some(GhostUpdate { before, after })
        })
}
