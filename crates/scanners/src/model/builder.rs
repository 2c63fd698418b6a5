//! Contract model extraction from the tree-sitter Solidity grammar
//!
//! Top-level definitions are located with a declarative query; members and
//! function bodies are then walked with cursors. The body walk is a single
//! depth-first pass, so the `external_calls` and `state_changes` sequences come
//! out in source order, which the reentrancy detector depends on.

use crate::error::{AnalysisError, Result};
use crate::model::{
    ContractKind, ContractModel, DataLocation, EventModel, EventParameter, ExternalCall,
    ExternalCallKind, FunctionKind, FunctionModel, ModifierModel, Mutability, NodeShape,
    Parameter, RequireFact, RequireKind, StateChange, StateVariable, TypeDescriptor, Visibility,
};
use streaming_iterator::StreamingIterator;
use tracing::{debug, trace};
use tree_sitter::{Node, Parser, Query, QueryCursor};

const CONTRACT_QUERY: &str = r#"
[
  (contract_declaration) @contract
  (interface_declaration) @contract
  (library_declaration) @contract
]
"#;

/// Parses `source` and returns one model per contract, interface or library,
/// in declaration order. An empty vector means the unit declares none.
pub fn parse_contracts(source: &str) -> Result<Vec<ContractModel>> {
    let mut parser = Parser::new();
    let language = tree_sitter_solidity::LANGUAGE.into();
    parser.set_language(&language)?;

    let tree = parser.parse(source, None).ok_or(AnalysisError::NoTree)?;
    let root = tree.root_node();

    if root.has_error() {
        return Err(syntax_error(&root, source));
    }

    let query = Query::new(&language, CONTRACT_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, root, source.as_bytes());

    let builder = ContractModelBuilder::new(source);
    let mut contracts = Vec::new();

    matches.advance();
    while let Some(match_) = matches.get() {
        for capture in match_.captures {
            if let Some(model) = builder.build(capture.node) {
                contracts.push(model);
            }
        }
        matches.advance();
    }

    debug!(count = contracts.len(), "extracted contract models");
    Ok(contracts)
}

fn syntax_error(root: &Node, source: &str) -> AnalysisError {
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let start = node.start_position();
            let snippet: String = source[node.byte_range()]
                .lines()
                .next()
                .unwrap_or("")
                .chars()
                .take(40)
                .collect();
            return AnalysisError::Parse {
                line: start.row + 1,
                column: start.column + 1,
                snippet: if node.is_missing() {
                    format!("missing {}", node.kind())
                } else {
                    snippet
                },
            };
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        // Reverse so the earliest child is examined first.
        for child in children.into_iter().rev() {
            if child.has_error() || child.is_error() || child.is_missing() {
                stack.push(child);
            }
        }
    }
    let start = root.start_position();
    AnalysisError::Parse {
        line: start.row + 1,
        column: start.column + 1,
        snippet: String::new(),
    }
}

pub struct ContractModelBuilder<'a> {
    source: &'a str,
}

impl<'a> ContractModelBuilder<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn text(&self, node: Node) -> &'a str {
        &self.source[node.byte_range()]
    }

    /// Builds the model for one `contract_declaration`, `interface_declaration`
    /// or `library_declaration` node. Any other node yields `None`.
    pub fn build(&self, node: Node) -> Option<ContractModel> {
        let kind = match node.kind() {
            "contract_declaration" => ContractKind::Contract,
            "interface_declaration" => ContractKind::Interface,
            "library_declaration" => ContractKind::Library,
            _ => return None,
        };

        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())?;

        let mut model = ContractModel {
            name,
            kind,
            is_abstract: false,
            bases: Vec::new(),
            state_vars: Vec::new(),
            functions: Vec::new(),
            events: Vec::new(),
            modifiers: Vec::new(),
            line: node.start_position().row + 1,
        };

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "abstract" => model.is_abstract = true,
                "inheritance_specifier" => {
                    if let Some(base) = self.base_name(child) {
                        model.bases.push(base);
                    }
                }
                "contract_body" => self.collect_members(child, &mut model),
                _ => {}
            }
        }

        trace!(
            contract = %model.name,
            functions = model.functions.len(),
            state_vars = model.state_vars.len(),
            "built contract model"
        );
        Some(model)
    }

    fn base_name(&self, specifier: Node) -> Option<String> {
        let ancestor = specifier
            .child_by_field_name("ancestor")
            .or_else(|| specifier.named_child(0))?;
        let text = self.text(ancestor);
        let name = text.split('(').next().unwrap_or(text).trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    fn collect_members(&self, body: Node, model: &mut ContractModel) {
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            match member.kind() {
                "state_variable_declaration" => {
                    model.state_vars.extend(self.state_variables(member));
                }
                "function_definition" => {
                    model.functions.push(self.function(member, FunctionKind::Function));
                }
                "constructor_definition" => {
                    model.functions.push(self.function(member, FunctionKind::Constructor));
                }
                "fallback_receive_definition" => {
                    let kind = if self.has_token(member, "receive") {
                        FunctionKind::Receive
                    } else {
                        FunctionKind::Fallback
                    };
                    model.functions.push(self.function(member, kind));
                }
                "modifier_definition" => {
                    if let Some(modifier) = self.modifier(member) {
                        model.modifiers.push(modifier);
                    }
                }
                "event_definition" => {
                    if let Some(event) = self.event(member) {
                        model.events.push(event);
                    }
                }
                _ => {}
            }
        }
    }

    fn has_token(&self, node: Node, token: &str) -> bool {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|c| c.kind() == token || self.text(c) == token);
        found
    }

    /// One entry per declared name; every entry copies the shared type and flags.
    fn state_variables(&self, node: Node) -> Vec<StateVariable> {
        let ty = node
            .child_by_field_name("type")
            .map(|n| TypeDescriptor::parse(self.text(n)))
            .unwrap_or_else(|| TypeDescriptor::UserDefined(String::new()));

        let mut visibility = Visibility::Internal;
        let mut is_constant = false;
        let mut is_immutable = false;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "visibility" => {
                    if let Some(v) = Visibility::from_keyword(self.text(child)) {
                        visibility = v;
                    }
                }
                "constant" => is_constant = true,
                "immutable" => is_immutable = true,
                kind => {
                    if let Some(v) = Visibility::from_keyword(kind) {
                        visibility = v;
                    }
                }
            }
        }

        let initializer = node
            .child_by_field_name("value")
            .map(|n| collapse_whitespace(self.text(n)));
        let line = node.start_position().row + 1;

        let mut names_cursor = node.walk();
        let names: Vec<String> = node
            .children_by_field_name("name", &mut names_cursor)
            .map(|n| self.text(n).to_string())
            .collect();

        names
            .into_iter()
            .map(|name| StateVariable {
                name,
                ty: ty.clone(),
                visibility,
                is_constant,
                is_immutable,
                initializer: initializer.clone(),
                line,
            })
            .collect()
    }

    fn function(&self, node: Node, kind: FunctionKind) -> FunctionModel {
        let name = match kind {
            FunctionKind::Function => node
                .child_by_field_name("name")
                .map(|n| self.text(n).to_string())
                .unwrap_or_else(|| "fallback".to_string()),
            FunctionKind::Constructor => "constructor".to_string(),
            FunctionKind::Fallback => "fallback".to_string(),
            FunctionKind::Receive => "receive".to_string(),
        };

        let mut visibility = None;
        let mut mutability = Mutability::NonPayable;
        let mut modifiers = Vec::new();
        let mut returns = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "visibility" => visibility = Visibility::from_keyword(self.text(child)),
                "state_mutability" => {
                    if let Some(m) = Mutability::from_keyword(self.text(child)) {
                        mutability = m;
                    }
                }
                "modifier_invocation" => {
                    if let Some(modifier) = self.modifier_name(child) {
                        modifiers.push(modifier);
                    }
                }
                "return_type_definition" => returns = self.parameters(child),
                other => {
                    if let Some(v) = Visibility::from_keyword(other) {
                        visibility = Some(v);
                    } else if let Some(m) = Mutability::from_keyword(other) {
                        mutability = m;
                    }
                }
            }
        }

        let visibility = visibility.unwrap_or(match kind {
            FunctionKind::Fallback | FunctionKind::Receive => Visibility::External,
            _ => Visibility::Public,
        });

        let mut function = FunctionModel {
            name,
            kind,
            visibility,
            mutability,
            parameters: self.parameters(node),
            returns,
            modifiers,
            line: node.start_position().row + 1,
            has_body: false,
            requires: Vec::new(),
            external_calls: Vec::new(),
            state_changes: Vec::new(),
        };

        if let Some(body) = node.child_by_field_name("body") {
            function.has_body = true;
            let mut walker = BodyWalker::new(self.source);
            walker.visit(body);
            function.requires = walker.requires;
            function.external_calls = walker.external_calls;
            function.state_changes = walker.state_changes;
        }

        function
    }

    fn modifier_name(&self, invocation: Node) -> Option<String> {
        let mut cursor = invocation.walk();
        for child in invocation.children(&mut cursor) {
            if child.kind() == "identifier" && child.is_named() {
                return Some(self.text(child).to_string());
            }
        }
        let text = self.text(invocation);
        let name = text.split('(').next().unwrap_or(text).trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// Direct `parameter` children of `node`; one level of list wrapper is
    /// looked through so grammar revisions that group parameters still work.
    fn parameters(&self, node: Node) -> Vec<Parameter> {
        let mut params = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "parameter" => params.push(self.parameter(child)),
                "parameter_list" | "parameters" => {
                    let mut inner = child.walk();
                    for grandchild in child.children(&mut inner) {
                        if grandchild.kind() == "parameter" {
                            params.push(self.parameter(grandchild));
                        }
                    }
                }
                _ => {}
            }
        }
        params
    }

    fn parameter(&self, node: Node) -> Parameter {
        let ty = node
            .child_by_field_name("type")
            .map(|n| TypeDescriptor::parse(self.text(n)))
            .unwrap_or_else(|| TypeDescriptor::UserDefined(String::new()));
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();

        let mut location = None;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(loc) = DataLocation::from_keyword(self.text(child)) {
                location = Some(loc);
            }
        }

        Parameter { name, ty, location }
    }

    fn modifier(&self, node: Node) -> Option<ModifierModel> {
        let name = node.child_by_field_name("name").map(|n| self.text(n))?;
        Some(ModifierModel {
            name: name.to_string(),
            parameters: self.parameters(node),
            line: node.start_position().row + 1,
        })
    }

    fn event(&self, node: Node) -> Option<EventModel> {
        let name = node.child_by_field_name("name").map(|n| self.text(n))?;

        let mut parameters = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "event_parameter" {
                continue;
            }
            let ty = child
                .child_by_field_name("type")
                .map(|n| TypeDescriptor::parse(self.text(n)))
                .unwrap_or_else(|| TypeDescriptor::UserDefined(String::new()));
            let param_name = child
                .child_by_field_name("name")
                .map(|n| self.text(n).to_string())
                .unwrap_or_default();
            parameters.push(EventParameter {
                name: param_name,
                ty,
                indexed: self.has_token(child, "indexed"),
            });
        }

        Some(EventModel {
            name: name.to_string(),
            parameters,
            line: node.start_position().row + 1,
        })
    }
}

/// Collects require/revert, external-call and assignment facts from one body.
struct BodyWalker<'a> {
    source: &'a str,
    requires: Vec<RequireFact>,
    external_calls: Vec<ExternalCall>,
    state_changes: Vec<StateChange>,
}

impl<'a> BodyWalker<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            requires: Vec::new(),
            external_calls: Vec::new(),
            state_changes: Vec::new(),
        }
    }

    fn text(&self, node: Node) -> &'a str {
        &self.source[node.byte_range()]
    }

    fn visit(&mut self, node: Node) {
        match NodeShape::of(node.kind()) {
            NodeShape::Wrapper
            | NodeShape::Block
            | NodeShape::If
            | NodeShape::Loop
            | NodeShape::Unchecked
            | NodeShape::Try
            | NodeShape::ExpressionStatement
            | NodeShape::VariableDeclaration
            | NodeShape::Return
            | NodeShape::Emit
            | NodeShape::Member
            | NodeShape::CallOptions
            | NodeShape::Parenthesized
            | NodeShape::Nested => self.visit_children(node),
            NodeShape::RevertStatement => {
                self.requires.push(RequireFact {
                    kind: RequireKind::Revert,
                    arguments: self.call_arguments(node),
                    line: line_of(node),
                });
                self.visit_children(node);
            }
            NodeShape::Call => {
                self.record_call(node);
                self.visit_children(node);
            }
            NodeShape::Assignment => {
                self.record_assignment(node, Some("="));
                self.visit_children(node);
            }
            NodeShape::CompoundAssignment => {
                self.record_assignment(node, None);
                self.visit_children(node);
            }
            NodeShape::Assembly | NodeShape::Leaf => {}
            NodeShape::Unhandled => {
                trace!(kind = node.kind(), line = line_of(node), "unhandled node shape");
            }
        }
    }

    fn visit_children(&mut self, node: Node) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child);
        }
    }

    fn record_call(&mut self, call: Node) {
        let callee = match call.child_by_field_name("function") {
            Some(f) => unwrap_expression(f),
            None => return,
        };

        if callee.kind() == "identifier" {
            let kind = match self.text(callee) {
                "require" => RequireKind::Require,
                "revert" => RequireKind::Revert,
                _ => return,
            };
            self.requires.push(RequireFact {
                kind,
                arguments: self.call_arguments(call),
                line: line_of(call),
            });
            return;
        }

        let member = match member_target(callee) {
            Some(member) => member,
            None => return,
        };

        let selector = member
            .child_by_field_name("property")
            .or_else(|| last_named_child(member))
            .map(|n| self.text(n))
            .unwrap_or("");

        if let Some(kind) = ExternalCallKind::from_member(selector) {
            let receiver = member
                .child_by_field_name("object")
                .or_else(|| member.named_child(0))
                .map(|n| collapse_whitespace(self.text(n)))
                .unwrap_or_default();

            self.external_calls.push(ExternalCall {
                kind,
                receiver,
                line: line_of(call),
                return_captured: !is_discarded(call),
            });
        }
    }

    fn record_assignment(&mut self, node: Node, operator: Option<&str>) {
        let (left, right) = match (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) {
            (Some(l), Some(r)) => (l, r),
            _ => return,
        };

        let operator = match operator {
            Some(op) => op.to_string(),
            None => match self.compound_operator(node) {
                Some(op) => op,
                None => return,
            },
        };

        self.state_changes.push(StateChange {
            target: strip_whitespace(self.text(left)),
            operator,
            value: collapse_whitespace(self.text(right)),
            line: line_of(node),
        });
    }

    fn compound_operator(&self, node: Node) -> Option<String> {
        if let Some(op) = node.child_by_field_name("operator") {
            return Some(self.text(op).to_string());
        }
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .filter(|c| !c.is_named())
            .map(|c| self.text(c))
            .find(|t| t.len() >= 2 && t.ends_with('='))
            .map(|t| t.to_string());
        found
    }

    fn call_arguments(&self, node: Node) -> Vec<String> {
        let mut cursor = node.walk();
        let args = node
            .children(&mut cursor)
            .filter(|c| c.kind() == "call_argument")
            .map(|c| collapse_whitespace(self.text(c)))
            .collect();
        args
    }
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn unwrap_expression(mut node: Node) -> Node {
    while matches!(
        NodeShape::of(node.kind()),
        NodeShape::Wrapper | NodeShape::Parenthesized
    ) {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Resolves the member expression a call targets, looking through the
/// `{value: ..}` call-options wrapper.
fn member_target(callee: Node) -> Option<Node> {
    match NodeShape::of(callee.kind()) {
        NodeShape::Member => Some(callee),
        NodeShape::CallOptions => {
            let inner = callee
                .child_by_field_name("type")
                .or_else(|| callee.named_child(0))?;
            member_target(unwrap_expression(inner))
        }
        _ => None,
    }
}

fn last_named_child(node: Node) -> Option<Node> {
    let count = node.named_child_count();
    if count == 0 {
        None
    } else {
        node.named_child(count - 1)
    }
}

/// A call whose nearest non-wrapper ancestor is an expression statement has
/// its return value dropped.
fn is_discarded(call: Node) -> bool {
    let mut current = call.parent();
    while let Some(parent) = current {
        match NodeShape::of(parent.kind()) {
            NodeShape::Wrapper => current = parent.parent(),
            NodeShape::ExpressionStatement => return true,
            _ => return false,
        }
    }
    false
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementaryType;

    fn single(source: &str) -> ContractModel {
        let mut contracts = parse_contracts(source).unwrap();
        assert_eq!(contracts.len(), 1);
        contracts.remove(0)
    }

    #[test]
    fn test_grammar_loads() {
        let language: tree_sitter::Language = tree_sitter_solidity::LANGUAGE.into();
        assert!(language.version() <= tree_sitter::LANGUAGE_VERSION);
        assert!(language.version() >= tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION);
        assert!(Parser::new().set_language(&language).is_ok());
        assert!(parse_contracts("contract A {}").is_ok());
    }

    #[test]
    fn test_contract_header() {
        let model = single(
            r#"
            pragma solidity ^0.8.20;
            contract Child is Base, Other(1) {
                uint256 public counter;
            }
            "#,
        );
        assert_eq!(model.name, "Child");
        assert_eq!(model.kind, ContractKind::Contract);
        assert_eq!(model.bases, vec!["Base", "Other"]);
    }

    #[test]
    fn test_state_variable_flags() {
        let model = single(
            r#"
            contract Flags {
                uint256 public constant CAP = 100;
                address public immutable token;
                mapping(address => uint256) private balances;
                string name;
            }
            "#,
        );
        assert_eq!(model.state_vars.len(), 4);

        let cap = model.state_var("CAP").unwrap();
        assert!(cap.is_constant);
        assert_eq!(cap.visibility, Visibility::Public);
        assert_eq!(cap.initializer.as_deref(), Some("100"));

        let token = model.state_var("token").unwrap();
        assert!(token.is_immutable);

        let balances = model.state_var("balances").unwrap();
        assert_eq!(balances.visibility, Visibility::Private);
        let (key, value) = balances.mapping_types().unwrap();
        assert!(key.is_address());
        assert!(value.is_uint256());
        assert_eq!(model.mappings().count(), 1);

        let name = model.state_var("name").unwrap();
        assert_eq!(name.visibility, Visibility::Internal);
        assert_eq!(name.ty, TypeDescriptor::Elementary(ElementaryType::String));
    }

    #[test]
    fn test_function_signature() {
        let model = single(
            r#"
            contract Sig {
                modifier onlyOwner() { _; }
                function deposit(uint256 amount, bytes memory data) external payable onlyOwner returns (bool) {
                    return true;
                }
                function peek() public view returns (uint256) { return 1; }
                constructor(address admin) {}
                receive() external payable {}
                fallback() external {}
            }
            "#,
        );

        let deposit = model.function("deposit").unwrap();
        assert_eq!(deposit.visibility, Visibility::External);
        assert_eq!(deposit.mutability, Mutability::Payable);
        assert_eq!(deposit.modifiers, vec!["onlyOwner"]);
        assert_eq!(deposit.parameters.len(), 2);
        assert_eq!(deposit.parameters[0].name, "amount");
        assert_eq!(deposit.parameters[1].location, Some(DataLocation::Memory));
        assert_eq!(deposit.returns.len(), 1);

        assert_eq!(model.function("peek").unwrap().mutability, Mutability::View);

        let ctor = model.constructor().unwrap();
        assert_eq!(ctor.parameters.len(), 1);

        assert_eq!(model.function("receive").unwrap().kind, FunctionKind::Receive);
        assert_eq!(model.function("fallback").unwrap().kind, FunctionKind::Fallback);
        assert_eq!(model.modifiers.len(), 1);
    }

    #[test]
    fn test_body_facts_in_source_order() {
        let model = single(
            r#"
            contract Bank {
                mapping(address => uint256) public balances;
                uint256 public total;

                function withdraw(uint256 amount) external {
                    require(balances[msg.sender] >= amount, "low");
                    (bool ok, ) = msg.sender.call{value: amount}("");
                    require(ok);
                    balances[msg.sender] -= amount;
                    total = total - amount;
                }
            }
            "#,
        );

        let withdraw = model.function("withdraw").unwrap();
        assert_eq!(withdraw.requires.len(), 2);
        assert_eq!(withdraw.requires[0].kind, RequireKind::Require);
        assert_eq!(withdraw.requires[0].arguments[0], "balances[msg.sender] >= amount");

        assert_eq!(withdraw.external_calls.len(), 1);
        let call = &withdraw.external_calls[0];
        assert_eq!(call.kind, ExternalCallKind::Call);
        assert_eq!(call.receiver, "msg.sender");
        assert_eq!(call.line, 8);
        assert!(call.return_captured);

        assert_eq!(withdraw.state_changes.len(), 2);
        assert_eq!(withdraw.state_changes[0].target, "balances[msg.sender]");
        assert_eq!(withdraw.state_changes[0].operator, "-=");
        assert_eq!(withdraw.state_changes[0].line, 10);
        assert_eq!(withdraw.state_changes[1].target, "total");
        assert_eq!(withdraw.state_changes[1].operator, "=");
        assert!(withdraw.state_changes[1].is_subtraction());
    }

    #[test]
    fn test_nested_blocks_and_loops_are_walked() {
        let model = single(
            r#"
            contract Payout {
                uint256 public paid;
                address[] public payees;

                function payAll() external {
                    for (uint256 i = 0; i < payees.length; i++) {
                        if (i % 2 == 0) {
                            payable(payees[i]).send(1);
                        } else {
                            payable(payees[i]).transfer(1);
                        }
                    }
                    paid += 1;
                }
            }
            "#,
        );

        let pay_all = model.function("payAll").unwrap();
        let kinds: Vec<_> = pay_all.external_calls.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ExternalCallKind::Send, ExternalCallKind::Transfer]);
        assert!(!pay_all.external_calls[0].return_captured);
        assert_eq!(pay_all.state_changes.len(), 1);
        assert_eq!(pay_all.state_changes[0].operator, "+=");
    }

    #[test]
    fn test_events_and_indexed_flags() {
        let model = single(
            r#"
            contract Events {
                event Transfer(address indexed from, address indexed to, uint256 value);
                event Note(string text);
            }
            "#,
        );
        let transfer = &model.events[0];
        assert_eq!(transfer.name, "Transfer");
        let indexed: Vec<bool> = transfer.parameters.iter().map(|p| p.indexed).collect();
        assert_eq!(indexed, vec![true, true, false]);
        assert_eq!(model.events[1].parameters.len(), 1);
    }

    #[test]
    fn test_multiple_contracts_and_kinds() {
        let contracts = parse_contracts(
            r#"
            interface IThing { function thing() external; }
            library Math { function add(uint a, uint b) internal pure returns (uint) { return a + b; } }
            contract A {}
            "#,
        )
        .unwrap();
        let kinds: Vec<_> = contracts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ContractKind::Interface, ContractKind::Library, ContractKind::Contract]
        );
        assert!(!contracts[0].functions[0].has_body);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = parse_contracts("contract Broken { function f( { }").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse { .. }));
    }

    #[test]
    fn test_empty_source_has_no_contracts() {
        assert!(parse_contracts("pragma solidity ^0.8.0;").unwrap().is_empty());
    }
}
