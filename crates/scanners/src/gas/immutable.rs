use crate::core::{GasFinding, GasPattern};
use crate::model::{ContractModel, StateVariable};

/// State variables assigned in the constructor and nowhere else can be
/// `immutable`, turning every read into a code constant instead of an SLOAD.
#[derive(Default)]
pub struct ImmutableAdvisor;

impl ImmutableAdvisor {
    pub fn new() -> Self {
        Self
    }

    fn is_eligible(&self, variable: &StateVariable) -> bool {
        !variable.is_constant
            && !variable.is_immutable
            && !variable.is_mapping()
            && !variable.ty.is_array()
            && !variable.ty.is_dynamic_bytes()
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<GasFinding> {
        let constructor = match contract.constructor() {
            Some(constructor) => constructor,
            None => return Vec::new(),
        };

        contract
            .state_vars
            .iter()
            .filter(|v| self.is_eligible(v) && constructor.writes(&v.name))
            .filter(|v| {
                contract
                    .functions
                    .iter()
                    .filter(|f| !f.is_constructor())
                    .all(|f| !f.writes(&v.name))
            })
            .map(|v| GasFinding {
                id: format!("GAS-IMMUTABLE-{}", v.name),
                title: format!("`{}` can be immutable", v.name),
                description: format!(
                    "`{}` is only assigned in the constructor; declaring it `immutable` \
                     removes a storage read on every access.",
                    v.name
                ),
                pattern: GasPattern::ImmutableCandidate,
                subject: v.name.clone(),
                line: v.line,
                suggestion: format!("Declare `{} immutable {}`.", v.ty, v.name),
            })
            .collect()
    }
}

crate::impl_detector!(
    ImmutableAdvisor,
    finding: GasFinding,
    id: "immutable-candidates",
    name: "Immutable candidates"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_single;

    #[test]
    fn test_constructor_only_writes() {
        let findings = ImmutableAdvisor::new().detect_impl(&parse_single(
            r#"
            contract Config {
                address public owner;
                uint256 public fee;
                string public label;
                address public immutable token;
                constructor(address t) { owner = msg.sender; fee = 1; label = "x"; token = t; }
                function setFee(uint256 f) external { fee = f; }
            }
            "#,
        ));
        let subjects: Vec<&str> = findings.iter().map(|f| f.subject.as_str()).collect();
        assert_eq!(subjects, vec!["owner"]);
        assert_eq!(findings[0].suggestion, "Declare `address immutable owner`.");
    }
}
