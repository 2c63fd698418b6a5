use crate::core::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything an engine can deduplicate.
pub trait Finding: Clone + Send + Sync {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GhostType {
    Uint256,
    Bool,
}

impl fmt::Display for GhostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint256 => write!(f, "uint256"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

/// Handler-side aggregate tracked across fuzz calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostVariableSpec {
    pub name: String,
    pub ty: GhostType,
    pub tracked_functions: Vec<String>,
    /// State variable the ghost shadows, e.g. `balances` for `ghost_balancesSum`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirrors: Option<String>,
    /// State variable whose post-constructor value seeds the ghost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_from: Option<String>,
}

impl GhostVariableSpec {
    pub fn new(name: impl Into<String>, ty: GhostType) -> Self {
        Self {
            name: name.into(),
            ty,
            tracked_functions: Vec::new(),
            mirrors: None,
            seed_from: None,
        }
    }

    pub fn tracking(mut self, functions: Vec<String>) -> Self {
        self.tracked_functions = functions;
        self
    }

    pub fn mirroring(mut self, variable: impl Into<String>) -> Self {
        self.mirrors = Some(variable.into());
        self
    }

    pub fn seeded_from(mut self, variable: impl Into<String>) -> Self {
        self.seed_from = Some(variable.into());
        self
    }

    pub fn tracks(&self, function: &str) -> bool {
        self.tracked_functions.iter().any(|f| f == function)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invariant {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub pattern: String,
    /// Solidity boolean expression over the contract's own name and ghost names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub ghosts: Vec<GhostVariableSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub functions: Vec<String>,
}

impl Invariant {
    pub fn new(
        id: impl Into<String>,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            title: title.into(),
            description: description.into(),
            pattern: pattern.into(),
            assertion: None,
            ghosts: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn with_assertion(mut self, assertion: impl Into<String>) -> Self {
        self.assertion = Some(assertion.into());
        self
    }

    pub fn with_ghost(mut self, ghost: GhostVariableSpec) -> Self {
        self.ghosts.push(ghost);
        self
    }

    pub fn with_functions(mut self, functions: Vec<String>) -> Self {
        self.functions = functions;
        self
    }
}

impl Finding for Invariant {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VulnerabilityKind {
    Reentrancy,
    UncheckedSend,
    MissingAccessControl,
    FrontRunning,
    DenialOfService,
}

impl fmt::Display for VulnerabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reentrancy => write!(f, "reentrancy"),
            Self::UncheckedSend => write!(f, "unchecked-send"),
            Self::MissingAccessControl => write!(f, "missing-access-control"),
            Self::FrontRunning => write!(f, "front-running"),
            Self::DenialOfService => write!(f, "denial-of-service"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub kind: VulnerabilityKind,
    pub function: String,
    pub line: usize,
    pub remediation: String,
}

impl Vulnerability {
    pub fn new(
        id: impl Into<String>,
        kind: VulnerabilityKind,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            title: title.into(),
            description: description.into(),
            kind,
            function: String::new(),
            line: 0,
            remediation: String::new(),
        }
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = remediation.into();
        self
    }
}

impl Finding for Vulnerability {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GasPattern {
    EventIndexing,
    ImmutableCandidate,
    CalldataCandidate,
}

impl fmt::Display for GasPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventIndexing => write!(f, "event-indexing"),
            Self::ImmutableCandidate => write!(f, "immutable-candidate"),
            Self::CalldataCandidate => write!(f, "calldata-candidate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasFinding {
    pub id: String,
    pub title: String,
    pub description: String,
    pub pattern: GasPattern,
    /// Function, state variable or event the suggestion applies to.
    pub subject: String,
    pub line: usize,
    pub suggestion: String,
}

impl Finding for GasFinding {
    fn id(&self) -> &str {
        &self.id
    }
}
