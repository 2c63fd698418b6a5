//! Gas optimization advice
//!
//! Advisory findings only: they carry no severity and never reach the
//! security score.

pub mod calldata;
pub mod event_indexing;
pub mod immutable;

pub use calldata::CalldataAdvisor;
pub use event_indexing::EventIndexingAdvisor;
pub use immutable::ImmutableAdvisor;

use crate::core::GasFinding;
use crate::model::ContractModel;
use crate::runner::{DetectionEngine, DetectorRegistry, DetectorRegistryBuilder};

pub type GasEngine = DetectionEngine<GasFinding>;

pub fn registry() -> DetectorRegistry<GasFinding> {
    DetectorRegistryBuilder::new()
        .with_detector(EventIndexingAdvisor::new())
        .with_detector(ImmutableAdvisor::new())
        .with_detector(CalldataAdvisor::new())
        .build()
}

pub fn engine() -> GasEngine {
    DetectionEngine::new(registry())
}

pub fn advise(contract: &ContractModel) -> Vec<GasFinding> {
    engine().run(contract).into_findings()
}
