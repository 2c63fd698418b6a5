//! Invariant suite: a fuzzing handler plus the invariant test contract.
//!
//! The handler is the only contract registered with the fuzzer. Each entry
//! point bounds its inputs, pranks as one actor from a fixed pool and calls
//! the target inside `try`/`catch`, so a reverting call never aborts the run
//! and ghost updates only happen for calls that succeeded.

use crate::analysis::accessor;
use crate::config::SynthesisConfig;
use crate::core::{GhostVariableSpec, Invariant};
use crate::model::{ContractKind, ContractModel, ElementaryType, FunctionModel, TypeDescriptor};
use crate::synthesis::ghost::{self, Bindings};
use crate::synthesis::source::{
    sanitize_identifier, ContractSource, Member, SourceFile, Statement, UniqueNames,
};
use crate::synthesis::values;
use std::collections::HashSet;
use tracing::debug;

/// Handler members and forge-std helpers a wrapped function must not shadow.
const RESERVED: &[&str] = &[
    "target",
    "actors",
    "currentActor",
    "useActor",
    "actorSeed",
    "msgValue",
    "MAX_AMOUNT",
    "MAX_ETH",
    "vm",
    "bound",
    "makeAddr",
    "makeAddrAndKey",
    "deal",
    "hoax",
    "startHoax",
    "skip",
    "rewind",
    "deployCode",
    "fail",
    "failed",
    "setUp",
    "IS_TEST",
    "assertTrue",
    "assertFalse",
    "assertEq",
    "assertNotEq",
    "assertGt",
    "assertGe",
    "assertLt",
    "assertLe",
    "assertApproxEqAbs",
    "assertApproxEqRel",
    "targetContract",
    "targetSelector",
    "targetSender",
    "excludeContract",
    "excludeSender",
];

pub fn handler_name(contract: &ContractModel) -> String {
    format!("{}Handler", contract.name)
}

/// Ghost specs across all invariants; the first declaration of a name wins.
pub fn collect_ghosts(invariants: &[Invariant]) -> Vec<&GhostVariableSpec> {
    let mut seen = HashSet::new();
    invariants
        .iter()
        .flat_map(|i| i.ghosts.iter())
        .filter(|g| seen.insert(g.name.as_str()))
        .collect()
}

/// Renders `<Name>.invariant.t.sol`, or `None` when there is nothing to
/// check. Libraries cannot be held in a variable and get no suite.
pub fn invariant_suite(
    contract: &ContractModel,
    invariants: &[Invariant],
    config: &SynthesisConfig,
    source_file: &str,
) -> Option<String> {
    if invariants.is_empty() {
        return None;
    }
    if contract.kind == ContractKind::Library {
        debug!("{} is a library, skipping invariant suite", contract.name);
        return None;
    }

    let ghosts = collect_ghosts(invariants);

    let mut file = SourceFile::new(&config.solidity_version)
        .import("Test", "forge-std/Test.sol")
        .import("StdInvariant", "forge-std/StdInvariant.sol")
        .import(
            &contract.name,
            format!(
                "{}/{}",
                config.source_import_path.trim_end_matches('/'),
                source_file
            ),
        );
    file.push(handler_contract(contract, &ghosts, config));
    file.push(test_contract(contract, invariants, &ghosts));

    Some(file.render())
}

fn handler_contract(
    contract: &ContractModel,
    ghosts: &[&GhostVariableSpec],
    config: &SynthesisConfig,
) -> ContractSource {
    let name = contract.name.as_str();
    let mut handler = ContractSource::new(handler_name(contract))
        .inherits("Test")
        .with_doc(format!(
            "Drives {} with bounded inputs from a fixed actor pool.",
            name
        ));

    handler.push(Member::field(format!("{} public target", name)));
    handler.push(Member::field("address[] public actors"));
    handler.push(Member::field("address internal currentActor"));
    handler.push(Member::field(format!(
        "uint256 internal constant MAX_AMOUNT = {}",
        config.max_amount
    )));
    handler.push(Member::field(format!(
        "uint256 internal constant MAX_ETH = {}",
        config.max_eth
    )));
    for ghost in ghosts {
        handler.push(Member::field(format!("{} public {}", ghost.ty, ghost.name)));
    }

    let mut constructor = vec![Statement::line("target = _target")];
    for index in 0..config.actor_count.max(1) {
        constructor.push(Statement::line(format!(
            "actors.push(makeAddr(\"actor{}\"))",
            index
        )));
    }
    for ghost in ghosts {
        if let Some(seed) = &ghost.seed_from {
            constructor.push(seed_statement(contract, ghost, seed));
        }
    }
    handler.push(Member::callable(
        format!("constructor({} _target)", name),
        constructor,
    ));

    handler.push(Member::callable(
        "modifier useActor(uint256 actorSeed)",
        vec![
            Statement::line("currentActor = actors[bound(actorSeed, 0, actors.length - 1)]"),
            Statement::line("vm.startPrank(currentActor)"),
            Statement::line("_"),
            Statement::line("vm.stopPrank()"),
        ],
    ));

    let mut names = UniqueNames::new();
    for reserved in RESERVED
        .iter()
        .copied()
        .chain(ghosts.iter().map(|g| g.name.as_str()))
    {
        names.claim(reserved);
    }

    for function in contract
        .functions
        .iter()
        .filter(|f| f.is_callable_externally() && !f.is_special())
    {
        let member = entry_point(contract, function, ghosts, &mut names);
        let skipped = matches!(member, Member::Comment(_));
        handler.push(member);
        if skipped {
            handler.push(Member::Blank);
        }
    }

    handler
}

fn seed_statement(contract: &ContractModel, ghost: &GhostVariableSpec, seed: &str) -> Statement {
    let read = contract
        .state_var(seed)
        .and_then(|v| accessor(contract, v))
        .filter(|read| !read.contains("{key}"));

    match read {
        Some(read) => Statement::line(format!("{} = target.{}", ghost.name, read)),
        None => Statement::comment(format!(
            "TODO: seed {} from `{}`, which has no external getter.",
            ghost.name, seed
        )),
    }
}

fn argument_name(raw: &str, index: usize) -> String {
    let name = sanitize_identifier(raw.trim());
    if raw.trim().is_empty() || RESERVED.contains(&name.as_str()) {
        format!("arg{}", index)
    } else {
        name
    }
}

fn entry_point(
    contract: &ContractModel,
    function: &FunctionModel,
    ghosts: &[&GhostVariableSpec],
    names: &mut UniqueNames,
) -> Member {
    if let Some(param) = function
        .parameters
        .iter()
        .find(|p| !values::is_fuzzable(&p.ty))
    {
        debug!(
            "Skipping handler for {}.{}: unfuzzable `{}` parameter",
            contract.name, function.name, param.ty
        );
        return Member::Comment(format!(
            "{}: skipped, the `{}` parameter cannot be fuzzed directly.",
            function.name, param.ty
        ));
    }

    let handler_fn = names.claim(&function.name);
    let arguments: Vec<String> = function
        .parameters
        .iter()
        .enumerate()
        .map(|(index, p)| argument_name(&p.name, index))
        .collect();

    let mut signature = Vec::new();
    let mut body = Vec::new();
    let mut call_args = Vec::new();

    for (param, arg) in function.parameters.iter().zip(&arguments) {
        match &param.ty {
            TypeDescriptor::Elementary(ElementaryType::Address { payable }) => {
                signature.push(format!("address {}", arg));
                body.push(Statement::line(format!(
                    "{arg} = actors[bound(uint256(uint160({arg})), 0, actors.length - 1)]",
                    arg = arg
                )));
                if *payable {
                    call_args.push(format!("payable({})", arg));
                } else {
                    call_args.push(arg.clone());
                }
            }
            ty => {
                signature.push(values::parameter_declaration(ty, arg));
                if ty.is_uint256() {
                    body.push(Statement::line(format!(
                        "{arg} = bound({arg}, 0, MAX_AMOUNT)",
                        arg = arg
                    )));
                }
                call_args.push(arg.clone());
            }
        }
    }

    signature.push("uint256 actorSeed".to_string());
    let value = if function.is_payable() {
        signature.push("uint256 msgValue".to_string());
        body.push(Statement::line("msgValue = bound(msgValue, 0, MAX_ETH)"));
        body.push(Statement::line("vm.deal(currentActor, msgValue)"));
        "{value: msgValue}"
    } else {
        ""
    };

    let mut after = Vec::new();
    for ghost in ghosts.iter().filter(|g| g.tracks(&function.name)) {
        let bindings = ghost_bindings(contract, function, ghost, &arguments);
        match ghost::resolve(ghost, function, &bindings) {
            Some(update) => {
                if let Some(before) = update.before {
                    body.push(Statement::line(before));
                }
                after.push(Statement::line(update.after));
            }
            None => after.push(Statement::comment(format!(
                "{} has no update rule for {}",
                ghost.name, function.name
            ))),
        }
    }

    body.push(
        Statement::block(
            format!(
                "try target.{}{}({})",
                function.name,
                value,
                call_args.join(", ")
            ),
            after,
        )
        .then("catch", Vec::new()),
    );

    Member::callable(
        format!(
            "function {}({}) public useActor(actorSeed)",
            handler_fn,
            signature.join(", ")
        ),
        body,
    )
}

fn ghost_bindings(
    contract: &ContractModel,
    function: &FunctionModel,
    ghost: &GhostVariableSpec,
    arguments: &[String],
) -> Bindings {
    let mut bindings = Bindings::new();

    if let Some(index) = values::amount_index(&function.parameters) {
        bindings.set("amount", arguments[index].clone());
    }
    if function.is_payable() {
        bindings.set("msgValue", "msgValue");
    }

    let read = ghost
        .mirrors
        .as_deref()
        .and_then(|name| contract.state_var(name))
        .and_then(|v| accessor(contract, v))
        .filter(|read| read.contains("{key}"));

    if let Some(read) = read {
        let sender = values::sender_index(&function.parameters)
            .map(|i| arguments[i].as_str())
            .unwrap_or("currentActor");
        bindings.set("senderBalance", format!("target.{}", read.replace("{key}", sender)));

        if let Some(index) = values::recipient_index(&function.parameters) {
            bindings.set(
                "recipientBalance",
                format!("target.{}", read.replace("{key}", &arguments[index])),
            );
        }
    }

    bindings
}

fn test_contract(
    contract: &ContractModel,
    invariants: &[Invariant],
    ghosts: &[&GhostVariableSpec],
) -> ContractSource {
    let name = contract.name.as_str();
    let mut test = ContractSource::new(format!("{}InvariantTest", name))
        .inherits("StdInvariant")
        .inherits("Test");

    test.push(Member::field(format!("{} public target", name)));
    test.push(Member::field(format!("{} public handler", handler_name(contract))));

    let mut setup = Vec::new();
    if contract.kind == ContractKind::Interface || contract.is_abstract {
        let what = if contract.kind == ContractKind::Interface {
            "an interface"
        } else {
            "abstract"
        };
        setup.push(Statement::comment(format!(
            "TODO: {} is {}; assign a deployed implementation to `target`.",
            name, what
        )));
    } else {
        setup.push(Statement::line(format!(
            "target = new {}({})",
            name,
            values::constructor_arguments(contract)
        )));
    }
    setup.push(Statement::line(format!(
        "handler = new {}(target)",
        handler_name(contract)
    )));
    setup.push(Statement::line("targetContract(address(handler))"));
    test.push(Member::callable("function setUp() public", setup));

    let ghost_names: Vec<&str> = ghosts.iter().map(|g| g.name.as_str()).collect();
    let mut names = UniqueNames::new();
    names.claim("setUp");

    for invariant in invariants {
        let function = names.claim(&format!("invariant_{}", invariant.id));
        let label = invariant.id.replace('"', "'");
        match &invariant.assertion {
            Some(template) => test.push(Member::callable(
                format!("function {}() public view", function),
                vec![Statement::line(format!(
                    "assertTrue({}, \"{}\")",
                    rewrite_assertion(template, contract, &ghost_names),
                    label
                ))],
            )),
            None => test.push(Member::callable(
                format!("function {}() public pure", function),
                vec![Statement::comment(format!(
                    "TODO: {}\n{}",
                    invariant.title, invariant.description
                ))],
            )),
        }
    }

    test
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Rewrites an assertion template into test-contract scope: references to
/// the contract itself (its name, lower camel name or lowercase name) become
/// `target`, ghost names become `handler.<ghost>()`. Member names after a
/// `.` are never rewritten.
pub fn rewrite_assertion(template: &str, contract: &ContractModel, ghosts: &[&str]) -> String {
    let self_names = [
        contract.name.clone(),
        contract.instance_name(),
        contract.name.to_lowercase(),
    ];

    let mut out = String::with_capacity(template.len());
    let mut previous: Option<char> = None;
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if is_identifier_start(c) || c.is_ascii_digit() {
            let end = rest
                .find(|ch: char| !is_identifier_char(ch))
                .unwrap_or(rest.len());
            let token = &rest[..end];
            let is_member = previous == Some('.');

            if c.is_ascii_digit() || is_member {
                out.push_str(token);
            } else if self_names.iter().any(|n| n == token) {
                out.push_str("target");
            } else if ghosts.contains(&token) {
                out.push_str(&format!("handler.{}()", token));
            } else {
                out.push_str(token);
            }

            previous = token.chars().last();
            rest = &rest[end..];
        } else {
            out.push(c);
            if !c.is_whitespace() {
                previous = Some(c);
            }
            rest = &rest[c.len_utf8()..];
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::discover;
    use crate::model::parse_single;

    const VAULT: &str = r#"
        contract Vault {
            mapping(address => uint256) public balances;
            uint256 public totalDeposited;

            function deposit() external payable {
                balances[msg.sender] += msg.value;
                totalDeposited += msg.value;
            }

            function withdraw(uint256 amount) external {
                require(balances[msg.sender] >= amount, "insufficient");
                (bool ok, ) = msg.sender.call{value: amount}("");
                require(ok, "send failed");
                balances[msg.sender] -= amount;
                totalDeposited -= amount;
            }
        }
    "#;

    fn suite(source: &str) -> Option<String> {
        let contract = parse_single(source);
        let invariants = discover(&contract);
        invariant_suite(&contract, &invariants, &SynthesisConfig::default(), "Vault.sol")
    }

    #[test]
    fn test_vault_suite() {
        let rendered = suite(VAULT).unwrap();

        assert_eq!(rendered.matches('{').count(), rendered.matches('}').count());
        assert!(rendered.contains("import {Vault} from \"../src/Vault.sol\";"));
        assert!(rendered.contains("contract VaultHandler is Test {"));
        assert!(rendered.contains("contract VaultInvariantTest is StdInvariant, Test {"));
        assert!(rendered.contains("uint256 public ghost_balancesSum;"));
        assert!(rendered.contains("actors.push(makeAddr(\"actor2\"));"));
        assert!(!rendered.contains("actor3"));

        assert!(rendered.contains(
            "function deposit(uint256 actorSeed, uint256 msgValue) public useActor(actorSeed) {"
        ));
        assert!(rendered.contains("vm.deal(currentActor, msgValue);"));
        assert!(rendered.contains("try target.deposit{value: msgValue}() {"));
        assert!(rendered.contains("ghost_balancesSum += msgValue;"));

        assert!(rendered.contains(
            "function withdraw(uint256 amount, uint256 actorSeed) public useActor(actorSeed) {"
        ));
        assert!(rendered.contains("amount = bound(amount, 0, MAX_AMOUNT);"));
        assert!(rendered.contains("ghost_balancesSum -= amount;"));

        assert!(rendered.contains("target = new Vault();"));
        assert!(rendered.contains("targetContract(address(handler));"));
        assert!(rendered.contains(
            "assertTrue(target.totalDeposited() == handler.ghost_balancesSum(), \"INV-VAULT-ACCOUNTING\");"
        ));
        assert!(rendered.contains(
            "assertTrue(address(target).balance >= target.totalDeposited(), \"INV-VAULT-SOLVENCY\");"
        ));
    }

    #[test]
    fn test_address_params_map_to_actors() {
        let contract = parse_single(
            r#"
            contract Pay {
                address public owner;
                function pay(address payable to, uint8 tier) external {}
                function settle(Order memory order) external {}
            }
            "#,
        );
        let invariants = vec![Invariant::new(
            "INV-X",
            crate::core::Severity::Low,
            "x",
            "Describe x.",
            "x",
        )];
        let rendered =
            invariant_suite(&contract, &invariants, &SynthesisConfig::default(), "Pay.sol").unwrap();

        assert!(rendered.contains(
            "function pay(address to, uint8 tier, uint256 actorSeed) public useActor(actorSeed) {"
        ));
        assert!(rendered.contains("to = actors[bound(uint256(uint160(to)), 0, actors.length - 1)];"));
        assert!(rendered.contains("try target.pay(payable(to), tier) {"));
        assert!(!rendered.contains("tier = bound"));
        assert!(rendered.contains("// settle: skipped, the `Order` parameter cannot be fuzzed directly."));
        assert!(rendered.contains("function invariant_INV_X() public pure {"));
        assert!(rendered.contains("// TODO: x"));
        assert!(rendered.contains("// Describe x."));
    }

    #[test]
    fn test_forge_helper_names_are_not_shadowed() {
        let contract = parse_single(
            r#"
            contract Faucet {
                function deal(uint256 amount) external {}
                function skip() external {}
                function assertEq(uint256 bound) external {}
            }
            "#,
        );
        let invariants = vec![Invariant::new(
            "INV-X",
            crate::core::Severity::Low,
            "x",
            "Describe x.",
            "x",
        )];
        let rendered =
            invariant_suite(&contract, &invariants, &SynthesisConfig::default(), "Faucet.sol")
                .unwrap();

        assert!(!rendered.contains("function deal("));
        assert!(!rendered.contains("function skip("));
        assert!(!rendered.contains("function assertEq("));
        assert!(rendered.contains(
            "function deal_2(uint256 amount, uint256 actorSeed) public useActor(actorSeed) {"
        ));
        assert!(rendered.contains("function skip_2(uint256 actorSeed) public useActor(actorSeed) {"));
        assert!(rendered.contains(
            "function assertEq_2(uint256 arg0, uint256 actorSeed) public useActor(actorSeed) {"
        ));
        assert!(rendered.contains("try target.deal(amount) {"));
        assert!(rendered.contains("try target.assertEq(arg0) {"));
    }

    #[test]
    fn test_no_suite_without_invariants_or_for_libraries() {
        let contract = parse_single("contract Empty { constructor() {} }");
        assert!(invariant_suite(&contract, &[], &SynthesisConfig::default(), "Empty.sol").is_none());

        let library = parse_single("library Math { function add(uint256 a, uint256 b) internal pure returns (uint256) { return a + b; } }");
        let invariants = vec![Invariant::new("INV-X", crate::core::Severity::Low, "x", "x", "x")];
        assert!(invariant_suite(&library, &invariants, &SynthesisConfig::default(), "Math.sol").is_none());
    }

    #[test]
    fn test_rewrite_assertion() {
        let contract = parse_single("contract Token { uint256 public totalSupply; }");
        assert_eq!(
            rewrite_assertion(
                "Token.totalSupply() == ghost_balancesSum && address(token).balance >= 0 && x.Token() > 0x1f",
                &contract,
                &["ghost_balancesSum"],
            ),
            "target.totalSupply() == handler.ghost_balancesSum() && address(target).balance >= 0 && x.Token() > 0x1f"
        );
    }

    #[test]
    fn test_collect_ghosts_dedups_by_name() {
        let ghost = GhostVariableSpec::new("ghost_a", crate::core::GhostType::Uint256);
        let invariants = vec![
            Invariant::new("A", crate::core::Severity::Low, "a", "a", "a").with_ghost(ghost.clone()),
            Invariant::new("B", crate::core::Severity::Low, "b", "b", "b").with_ghost(ghost),
        ];
        assert_eq!(collect_ghosts(&invariants).len(), 1);
    }
}
