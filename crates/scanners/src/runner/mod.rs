//! Detector execution and orchestration
//!
//! The registry keeps detectors in registration order; the engine runs them
//! against one contract model, concatenates their output in that order and
//! drops repeated ids. The invariant, vulnerability and gas engines are all
//! instances of the same generic engine over different finding types.

pub mod engine;
pub mod registry;

pub use engine::{DeduplicationStats, DetectionEngine, DetectionReport, DetectorInfo};
pub use registry::{DetectorRegistry, DetectorRegistryBuilder};
