use crate::core::{GasFinding, GasPattern};
use crate::model::{ContractModel, DataLocation, Visibility};

/// Reference-type parameters of external functions copied into memory.
#[derive(Default)]
pub struct CalldataAdvisor;

impl CalldataAdvisor {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<GasFinding> {
        let mut findings = Vec::new();

        for function in contract
            .functions
            .iter()
            .filter(|f| f.visibility == Visibility::External)
        {
            for param in &function.parameters {
                if !param.ty.is_reference() || param.location == Some(DataLocation::Calldata) {
                    continue;
                }

                let label = if param.name.is_empty() {
                    param.ty.to_string()
                } else {
                    param.name.clone()
                };

                findings.push(GasFinding {
                    id: format!("GAS-CALLDATA-{}-{}", function.name, label),
                    title: format!("Use calldata for `{}` in `{}`", label, function.name),
                    description: format!(
                        "`{}` is an external parameter of type `{}` copied into memory; reading \
                         it from calldata avoids the copy.",
                        label, param.ty
                    ),
                    pattern: GasPattern::CalldataCandidate,
                    subject: function.name.clone(),
                    line: function.line,
                    suggestion: format!("Declare `{} calldata {}`.", param.ty, label),
                });
            }
        }

        findings
    }
}

crate::impl_detector!(
    CalldataAdvisor,
    finding: GasFinding,
    id: "calldata-candidates",
    name: "Calldata candidates"
);
