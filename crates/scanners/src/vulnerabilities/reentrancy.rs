//! Checks-Effects-Interactions ordering check.
//!
//! Ordering is the only signal: a state write on a later line than an
//! external call means the callee can re-enter while that write is still
//! pending. No data or taint flow is involved, so a write unrelated to the
//! call still counts.

use crate::core::{Severity, Vulnerability, VulnerabilityKind};
use crate::model::{ContractModel, FunctionModel};

#[derive(Default)]
pub struct ReentrancyDetector;

impl ReentrancyDetector {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Vulnerability> {
        contract
            .functions
            .iter()
            .filter_map(|f| self.analyze_function(f))
            .collect()
    }

    /// One finding per function, citing the first call with writes after it.
    fn analyze_function(&self, function: &FunctionModel) -> Option<Vulnerability> {
        function.external_calls.iter().find_map(|call| {
            let late_writes: Vec<usize> = function
                .state_changes
                .iter()
                .filter(|change| change.line > call.line)
                .map(|change| change.line)
                .collect();

            if late_writes.is_empty() {
                return None;
            }

            let lines = late_writes
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(", ");

            Some(
                Vulnerability::new(
                    format!("VULN-REENTRANCY-{}", function.name),
                    VulnerabilityKind::Reentrancy,
                    Severity::Critical,
                    format!("Reentrancy in `{}`", function.name),
                    format!(
                        "`{}` performs an external `{}` to `{}` at line {} and writes state \
                         afterwards at line(s) {}. The callee can re-enter before those writes \
                         land.",
                        function.name, call.kind, call.receiver, call.line, lines
                    ),
                )
                .with_function(&function.name)
                .with_line(call.line)
                .with_remediation(
                    "Apply checks-effects-interactions: update state before the external call, \
                     or guard the function with a reentrancy lock such as `nonReentrant`.",
                ),
            )
        })
    }
}

crate::impl_detector!(
    ReentrancyDetector,
    finding: Vulnerability,
    id: "reentrancy",
    name: "Reentrancy",
    description: "External calls followed by state writes in the same function"
);
