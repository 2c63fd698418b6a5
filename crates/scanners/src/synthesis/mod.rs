//! Foundry test synthesis
//!
//! Turns one contract's invariants into a handler-driven invariant suite and
//! its vulnerabilities into an exploit suite. Output is plain Solidity text
//! built through [`source`], so every file is balanced regardless of which
//! findings fed it.

pub mod exploit;
pub mod ghost;
pub mod handler;
pub mod source;
pub mod values;

pub use ghost::{GhostUpdateRule, GHOST_UPDATE_RULES};
pub use handler::rewrite_assertion;
pub use source::sanitize_identifier;

use crate::config::SynthesisConfig;
use crate::core::{Invariant, Vulnerability};
use crate::model::ContractModel;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedTests {
    /// `<Name>.invariant.t.sol`, present iff invariants were supplied.
    pub invariant_suite: Option<String>,
    /// `<Name>.vuln.t.sol`, present iff vulnerabilities were supplied.
    pub exploit_suite: Option<String>,
}

impl GeneratedTests {
    pub fn is_empty(&self) -> bool {
        self.invariant_suite.is_none() && self.exploit_suite.is_none()
    }
}

pub fn invariant_file_name(contract: &ContractModel) -> String {
    format!("{}.invariant.t.sol", contract.name)
}

pub fn exploit_file_name(contract: &ContractModel) -> String {
    format!("{}.vuln.t.sol", contract.name)
}

/// `source_file` is the contract's file name, imported from
/// `config.source_import_path`.
pub fn synthesize(
    contract: &ContractModel,
    invariants: &[Invariant],
    vulnerabilities: &[Vulnerability],
    config: &SynthesisConfig,
    source_file: &str,
) -> GeneratedTests {
    GeneratedTests {
        invariant_suite: handler::invariant_suite(contract, invariants, config, source_file),
        exploit_suite: exploit::exploit_suite(contract, vulnerabilities, config, source_file),
    }
}
