//! Vulnerability detection
//!
//! Five syntactic rules over the contract model. The front-running and DoS
//! thresholds come from `AnalysisConfig`; the defaults reproduce the
//! calibrated behaviour (`approve` with two or more parameters, more than one
//! external call).

pub mod dos;
pub mod front_running;
pub mod missing_access_control;
pub mod reentrancy;
pub mod unchecked_send;

pub use dos::DenialOfServiceDetector;
pub use front_running::FrontRunningDetector;
pub use missing_access_control::MissingAccessControlDetector;
pub use reentrancy::ReentrancyDetector;
pub use unchecked_send::UncheckedSendDetector;

use crate::config::AnalysisConfig;
use crate::core::Vulnerability;
use crate::model::ContractModel;
use crate::runner::{DetectionEngine, DetectorRegistry, DetectorRegistryBuilder};

pub type VulnerabilityEngine = DetectionEngine<Vulnerability>;

pub fn registry(config: &AnalysisConfig) -> DetectorRegistry<Vulnerability> {
    DetectorRegistryBuilder::new()
        .with_detector(ReentrancyDetector::new())
        .with_detector(UncheckedSendDetector::new())
        .with_detector(MissingAccessControlDetector::new())
        .with_detector(FrontRunningDetector::new(config.front_running_min_params))
        .with_detector(DenialOfServiceDetector::new(config.dos_max_external_calls))
        .build()
}

pub fn engine(config: &AnalysisConfig) -> VulnerabilityEngine {
    DetectionEngine::new(registry(config))
}

pub fn detect(contract: &ContractModel, config: &AnalysisConfig) -> Vec<Vulnerability> {
    engine(config).run(contract).into_findings()
}
