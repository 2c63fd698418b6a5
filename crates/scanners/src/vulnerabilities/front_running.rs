use crate::core::{Severity, Vulnerability, VulnerabilityKind};
use crate::model::ContractModel;

/// Classic ERC20 `approve` race: a spender can use the old allowance before
/// the new one lands. Purely structural; the parameter count threshold is
/// configurable.
pub struct FrontRunningDetector {
    min_params: usize,
}

impl FrontRunningDetector {
    pub fn new(min_params: usize) -> Self {
        Self { min_params }
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Vulnerability> {
        contract
            .functions
            .iter()
            .filter(|f| f.name == "approve" && f.parameters.len() >= self.min_params)
            .map(|f| {
                Vulnerability::new(
                    format!("VULN-FRONTRUN-{}", f.name),
                    VulnerabilityKind::FrontRunning,
                    Severity::Medium,
                    "Allowance change can be front-run",
                    "Changing a non-zero allowance with `approve` lets the spender spend the old \
                     allowance in a transaction ordered before the change, then the new one.",
                )
                .with_function(&f.name)
                .with_line(f.line)
                .with_remediation(
                    "Offer `increaseAllowance`/`decreaseAllowance`, or require the allowance to \
                     be reset to zero before setting a new value.",
                )
            })
            .collect()
    }
}

impl Default for FrontRunningDetector {
    fn default() -> Self {
        Self::new(2)
    }
}

crate::impl_detector!(
    FrontRunningDetector,
    finding: Vulnerability,
    id: "front-running",
    name: "Approve front-running"
);
