//! Heuristics shared across discovery rules
//!
//! Role recognition by identifier name and the token/vault shape profiles
//! several invariant rules agree on.

pub mod naming;
pub mod profiles;

pub use profiles::{accessor, covered_pairs, token_profile, vault_profile, TokenProfile, VaultProfile};
