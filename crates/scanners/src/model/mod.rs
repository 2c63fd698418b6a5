//! Normalized contract model
//!
//! A flat, queryable view of one contract definition built from the tree-sitter
//! syntax tree. Detectors never touch syntax nodes: everything they need
//! (visibility, modifiers, require arguments, external call sites, assignment
//! targets, source lines) is captured here once, in source order.

pub mod builder;
pub mod shape;
pub mod types;

pub use builder::{parse_contracts, ContractModelBuilder};
pub use shape::NodeShape;
pub use types::{ElementaryType, TypeDescriptor};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    Contract,
    Interface,
    Library,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contract => write!(f, "contract"),
            Self::Interface => write!(f, "interface"),
            Self::Library => write!(f, "library"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    External,
    Internal,
    Private,
}

impl Visibility {
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text.trim() {
            "public" => Some(Self::Public),
            "external" => Some(Self::External),
            "internal" => Some(Self::Internal),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    pub fn is_callable_externally(&self) -> bool {
        matches!(self, Self::Public | Self::External)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::External => write!(f, "external"),
            Self::Internal => write!(f, "internal"),
            Self::Private => write!(f, "private"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

impl Mutability {
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text.trim() {
            "pure" => Some(Self::Pure),
            "view" | "constant" => Some(Self::View),
            "payable" => Some(Self::Payable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Function,
    Constructor,
    Fallback,
    Receive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataLocation {
    Memory,
    Storage,
    Calldata,
}

impl DataLocation {
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text.trim() {
            "memory" => Some(Self::Memory),
            "storage" => Some(Self::Storage),
            "calldata" => Some(Self::Calldata),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeDescriptor,
    pub location: Option<DataLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVariable {
    pub name: String,
    pub ty: TypeDescriptor,
    pub visibility: Visibility,
    pub is_constant: bool,
    pub is_immutable: bool,
    pub initializer: Option<String>,
    pub line: usize,
}

impl StateVariable {
    pub fn is_mapping(&self) -> bool {
        self.ty.is_mapping()
    }

    pub fn mapping_types(&self) -> Option<(&TypeDescriptor, &TypeDescriptor)> {
        self.ty.mapping_types()
    }

    /// Public state variables get an auto-generated getter of the same name.
    pub fn has_getter(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequireKind {
    Require,
    Revert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequireFact {
    pub kind: RequireKind,
    pub arguments: Vec<String>,
    pub line: usize,
}

impl RequireFact {
    pub fn mentions(&self, needle: &str) -> bool {
        self.arguments.iter().any(|a| a.contains(needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalCallKind {
    Call,
    Transfer,
    Send,
    DelegateCall,
    StaticCall,
}

impl ExternalCallKind {
    /// The fixed selector set; any other member call is not an external-call fact.
    pub fn from_member(member: &str) -> Option<Self> {
        match member {
            "call" => Some(Self::Call),
            "transfer" => Some(Self::Transfer),
            "send" => Some(Self::Send),
            "delegatecall" => Some(Self::DelegateCall),
            "staticcall" => Some(Self::StaticCall),
            _ => None,
        }
    }
}

impl fmt::Display for ExternalCallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Transfer => write!(f, "transfer"),
            Self::Send => write!(f, "send"),
            Self::DelegateCall => write!(f, "delegatecall"),
            Self::StaticCall => write!(f, "staticcall"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCall {
    pub kind: ExternalCallKind,
    pub receiver: String,
    pub line: usize,
    /// False when the call is the whole expression of an expression statement,
    /// i.e. its return value is thrown away.
    pub return_captured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub target: String,
    pub operator: String,
    pub value: String,
    pub line: usize,
}

impl StateChange {
    /// Base identifier of the target path: `balances` for `balances[msg.sender]`,
    /// `info` for `info.amount`.
    pub fn root(&self) -> &str {
        let end = self
            .target
            .find(|c: char| c == '[' || c == '.' || c == '(')
            .unwrap_or(self.target.len());
        &self.target[..end]
    }

    pub fn is_subtraction(&self) -> bool {
        self.operator == "-=" || (self.operator == "=" && self.value.contains('-'))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionModel {
    pub name: String,
    pub kind: FunctionKind,
    pub visibility: Visibility,
    pub mutability: Mutability,
    pub parameters: Vec<Parameter>,
    pub returns: Vec<Parameter>,
    pub modifiers: Vec<String>,
    pub line: usize,
    pub has_body: bool,
    pub requires: Vec<RequireFact>,
    pub external_calls: Vec<ExternalCall>,
    pub state_changes: Vec<StateChange>,
}

impl FunctionModel {
    pub fn is_constructor(&self) -> bool {
        self.kind == FunctionKind::Constructor
    }

    pub fn is_special(&self) -> bool {
        self.kind != FunctionKind::Function
    }

    pub fn is_payable(&self) -> bool {
        self.mutability == Mutability::Payable
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.mutability, Mutability::Pure | Mutability::View)
    }

    pub fn is_callable_externally(&self) -> bool {
        self.visibility.is_callable_externally()
    }

    pub fn writes(&self, variable: &str) -> bool {
        self.state_changes.iter().any(|c| c.root() == variable)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParameter {
    pub name: String,
    pub ty: TypeDescriptor,
    pub indexed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventModel {
    pub name: String,
    pub parameters: Vec<EventParameter>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierModel {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractModel {
    pub name: String,
    pub kind: ContractKind,
    pub is_abstract: bool,
    pub bases: Vec<String>,
    pub state_vars: Vec<StateVariable>,
    pub functions: Vec<FunctionModel>,
    pub events: Vec<EventModel>,
    pub modifiers: Vec<ModifierModel>,
    pub line: usize,
}

impl ContractModel {
    pub fn mappings(&self) -> impl Iterator<Item = &StateVariable> {
        self.state_vars.iter().filter(|v| v.is_mapping())
    }

    pub fn scalars(&self) -> impl Iterator<Item = &StateVariable> {
        self.state_vars
            .iter()
            .filter(|v| !v.is_mapping() && !v.ty.is_array())
    }

    pub fn function(&self, name: &str) -> Option<&FunctionModel> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    pub fn state_var(&self, name: &str) -> Option<&StateVariable> {
        self.state_vars.iter().find(|v| v.name == name)
    }

    pub fn constructor(&self) -> Option<&FunctionModel> {
        self.functions.iter().find(|f| f.is_constructor())
    }

    pub fn has_payable_function(&self) -> bool {
        self.functions.iter().any(|f| f.is_payable())
    }

    /// Lower camel case form of the contract name, the usual local variable
    /// name for an instance (`Vault` → `vault`, `ERC20Token` → `eRC20Token`).
    pub fn instance_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// First contract of an inline fixture; panics on fixtures that do not parse.
#[cfg(test)]
pub(crate) fn parse_single(source: &str) -> ContractModel {
    parse_contracts(source)
        .expect("fixture should parse")
        .into_iter()
        .next()
        .expect("fixture should declare a contract")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_change_root() {
        let change = StateChange {
            target: "balances[msg.sender]".to_string(),
            operator: "-=".to_string(),
            value: "amount".to_string(),
            line: 4,
        };
        assert_eq!(change.root(), "balances");
        assert!(change.is_subtraction());

        let plain = StateChange {
            target: "owner".to_string(),
            operator: "=".to_string(),
            value: "newOwner".to_string(),
            line: 9,
        };
        assert_eq!(plain.root(), "owner");
        assert!(!plain.is_subtraction());
    }

    #[test]
    fn test_external_call_selector_set() {
        assert_eq!(ExternalCallKind::from_member("call"), Some(ExternalCallKind::Call));
        assert_eq!(ExternalCallKind::from_member("send"), Some(ExternalCallKind::Send));
        assert_eq!(ExternalCallKind::from_member("transferFrom"), None);
    }
}
