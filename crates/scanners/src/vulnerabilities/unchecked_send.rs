use crate::core::{Severity, Vulnerability, VulnerabilityKind};
use crate::model::{ContractModel, ExternalCallKind};

/// `send` returns false on failure instead of reverting; a dropped return
/// value silently loses the payment.
#[derive(Default)]
pub struct UncheckedSendDetector;

impl UncheckedSendDetector {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Vulnerability> {
        let mut findings = Vec::new();

        for function in &contract.functions {
            for call in &function.external_calls {
                if call.kind != ExternalCallKind::Send || call.return_captured {
                    continue;
                }

                findings.push(
                    Vulnerability::new(
                        format!("VULN-UNCHECKED-SEND-{}-{}", function.name, call.line),
                        VulnerabilityKind::UncheckedSend,
                        Severity::High,
                        format!("Unchecked send in `{}`", function.name),
                        format!(
                            "The return value of `{}.send(..)` at line {} is discarded; a failed \
                             send goes unnoticed.",
                            call.receiver, call.line
                        ),
                    )
                    .with_function(&function.name)
                    .with_line(call.line)
                    .with_remediation(
                        "Check the result with `require(x.send(v))`, or use `call` and check its \
                         success flag.",
                    ),
                );
            }
        }

        findings
    }
}

crate::impl_detector!(
    UncheckedSendDetector,
    finding: Vulnerability,
    id: "unchecked-send",
    name: "Unchecked send"
);
