use crate::core::{Severity, Vulnerability, VulnerabilityKind};
use crate::model::ContractModel;

/// Several external calls in one function: any one failing reverts the whole
/// transaction. Calls inside loops are counted once per call site.
pub struct DenialOfServiceDetector {
    max_external_calls: usize,
}

impl DenialOfServiceDetector {
    pub fn new(max_external_calls: usize) -> Self {
        Self { max_external_calls }
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Vulnerability> {
        contract
            .functions
            .iter()
            .filter(|f| f.external_calls.len() > self.max_external_calls)
            .map(|f| {
                let lines = f
                    .external_calls
                    .iter()
                    .map(|c| c.line.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                Vulnerability::new(
                    format!("VULN-DOS-{}", f.name),
                    VulnerabilityKind::DenialOfService,
                    Severity::Medium,
                    format!("Multiple external calls in `{}`", f.name),
                    format!(
                        "`{}` makes {} external calls (lines {}); a single reverting recipient \
                         blocks the whole operation.",
                        f.name,
                        f.external_calls.len(),
                        lines
                    ),
                )
                .with_function(&f.name)
                .with_line(f.external_calls.first().map(|c| c.line).unwrap_or(f.line))
                .with_remediation(
                    "Prefer pull payments: record what each party is owed and let them withdraw \
                     individually.",
                )
            })
            .collect()
    }
}

impl Default for DenialOfServiceDetector {
    fn default() -> Self {
        Self::new(1)
    }
}

crate::impl_detector!(
    DenialOfServiceDetector,
    finding: Vulnerability,
    id: "denial-of-service",
    name: "Denial of service by external call"
);
