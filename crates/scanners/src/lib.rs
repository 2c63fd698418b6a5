//! Kensa Scanners - Invariant Discovery and Vulnerability Detection
//!
//! This crate parses Solidity source into a normalized contract model, runs
//! pluggable rule engines over it (invariants, vulnerabilities, gas advice),
//! scores the result and synthesizes Foundry test suites from the findings.

pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod gas;
pub mod invariants;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod synthesis;
pub mod vulnerabilities;

pub use config::{AnalysisConfig, SynthesisConfig};

pub use crate::core::{
    score, Detector, Finding, GasFinding, Grade, Invariant, SecurityScore, Severity,
    Vulnerability, VulnerabilityKind,
};

pub use error::{AnalysisError, Result};

pub use model::{parse_contracts, ContractModel};

pub use pipeline::{analyze_contract, analyze_source, ContractAnalysis};

pub use runner::{DetectionEngine, DetectionReport, DetectorRegistry};

pub use synthesis::{synthesize, GeneratedTests};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_registration() {
        assert_eq!(invariants::registry().list_ids().len(), 8);
        assert_eq!(vulnerabilities::registry(&AnalysisConfig::default()).list_ids().len(), 5);
        assert_eq!(gas::registry().list_ids().len(), 3);
    }
}
