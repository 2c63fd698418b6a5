//! Core abstractions shared by the discovery engines
//!
//! The `Detector` trait is the interface every rule implements; the finding
//! records (`Invariant`, `Vulnerability`, `GasFinding`) are what rules emit,
//! and the scorer turns a vulnerability list into a graded summary.

pub mod detector;
pub mod result;
pub mod score;
pub mod severity;

pub use detector::Detector;
pub use result::{
    Finding, GasFinding, GasPattern, GhostType, GhostVariableSpec, Invariant, Vulnerability,
    VulnerabilityKind,
};
pub use score::{score, Grade, ScoreDeduction, SecurityScore};
pub use severity::Severity;
