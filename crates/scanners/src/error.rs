use thiserror::Error;

/// Input-level failures. Everything past parsing is total: detector misses
/// yield empty vectors and unsynthesizable invariants degrade to stubs.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to load Solidity grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("failed to build query: {0}")]
    Query(#[from] tree_sitter::QueryError),

    #[error("parser produced no syntax tree")]
    NoTree,

    #[error("syntax error at line {line}, column {column}: unexpected `{snippet}`")]
    Parse {
        line: usize,
        column: usize,
        snippet: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
