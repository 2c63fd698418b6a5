use crate::analysis::naming;
use crate::core::{Severity, Vulnerability, VulnerabilityKind};
use crate::model::{ContractKind, ContractModel, FunctionModel};

const SENSITIVE_NAMES: &[&str] = &[
    "mint",
    "burn",
    "pause",
    "unpause",
    "withdraw",
    "setowner",
    "transferownership",
    "upgrade",
    "selfdestruct",
    "destroy",
];

/// Privileged-sounding entry points reachable by anyone.
#[derive(Default)]
pub struct MissingAccessControlDetector;

impl MissingAccessControlDetector {
    pub fn new() -> Self {
        Self
    }

    fn is_sensitive(&self, function: &FunctionModel) -> bool {
        let lower = function.name.to_lowercase();
        SENSITIVE_NAMES.iter().any(|s| lower.contains(s))
    }

    fn is_guarded(&self, function: &FunctionModel) -> bool {
        naming::has_owner_modifier(function) || function.requires.iter().any(naming::is_caller_guard)
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<Vulnerability> {
        // Interfaces only describe someone else's entry points.
        if contract.kind == ContractKind::Interface {
            return Vec::new();
        }

        contract
            .functions
            .iter()
            .filter(|f| f.is_callable_externally() && !f.is_special())
            .filter(|f| self.is_sensitive(f) && !self.is_guarded(f))
            .map(|f| {
                Vulnerability::new(
                    format!("VULN-ACCESS-{}", f.name),
                    VulnerabilityKind::MissingAccessControl,
                    Severity::Critical,
                    format!("Missing access control on `{}`", f.name),
                    format!(
                        "`{}` is {} and performs a privileged operation, but has no owner-style \
                         modifier and no require restricting the caller.",
                        f.name, f.visibility
                    ),
                )
                .with_function(&f.name)
                .with_line(f.line)
                .with_remediation(
                    "Restrict the function with an `onlyOwner`/role modifier or an explicit \
                     `require(msg.sender == owner)` check.",
                )
            })
            .collect()
    }
}

crate::impl_detector!(
    MissingAccessControlDetector,
    finding: Vulnerability,
    id: "missing-access-control",
    name: "Missing access control"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_single;

    #[test]
    fn test_unguarded_mint_is_flagged() {
        let findings = MissingAccessControlDetector::new().detect_impl(&parse_single(
            r#"
            contract Token {
                address owner;
                mapping(address => uint256) balances;
                modifier onlyOwner() { require(msg.sender == owner); _; }
                function mint(address to, uint256 amount) public { balances[to] += amount; }
                function burn(uint256 amount) external onlyOwner {}
                function pause() external { require(msg.sender == owner, "auth"); }
                function withdrawFees() internal {}
                function transfer(address to, uint256 amount) external {}
            }
            "#,
        ));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "VULN-ACCESS-mint");
        assert_eq!(findings[0].line, 6);
    }

    #[test]
    fn test_abstract_declaration_is_flagged() {
        let findings = MissingAccessControlDetector::new().detect_impl(&parse_single(
            r#"
            abstract contract Mintable {
                function mint(address to, uint256 amount) public virtual;
            }
            "#,
        ));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "VULN-ACCESS-mint");
    }

    #[test]
    fn test_interface_declarations_are_ignored() {
        let findings = MissingAccessControlDetector::new().detect_impl(&parse_single(
            "interface IMint { function mint(address to, uint256 amount) external; }",
        ));
        assert!(findings.is_empty());
    }
}
