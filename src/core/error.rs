use std::fmt::Display;

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// Failures surfaced by the tool engine and its collaborators.
///
/// Lookup failures (`ToolNotFound`, `ExecutionNotFound`) and `Validation` are
/// reported before any execution is tracked. Everything a handler returns is
/// recorded on the execution instead of being propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    #[error("Execution not found")]
    ExecutionNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Collaborator(String),

    #[error("{0}")]
    Configuration(String),
}

impl EngineError {
    /// Wrap a downstream failure with the name of the operation that failed,
    /// e.g. `Claude analysis failed: 401 Unauthorized`.
    pub fn collaborator(operation: &str, err: impl Display) -> Self {
        EngineError::Collaborator(format!("{}: {}", operation, err))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::ToolNotFound(_) => "tool_not_found",
            EngineError::ExecutionNotFound(_) => "execution_not_found",
            EngineError::Validation(_) => "validation_error",
            EngineError::Collaborator(_) => "collaborator_error",
            EngineError::Configuration(_) => "configuration_error",
        }
    }

    /// Prefix the message while keeping the variant, so a missing credential
    /// deep inside a pipeline still reads as a configuration problem.
    pub fn with_prefix(self, prefix: &str) -> Self {
        match self {
            EngineError::Validation(m) => EngineError::Validation(format!("{}: {}", prefix, m)),
            EngineError::Configuration(m) => {
                EngineError::Configuration(format!("{}: {}", prefix, m))
            }
            EngineError::Collaborator(m) => {
                EngineError::Collaborator(format!("{}: {}", prefix, m))
            }
            other => EngineError::Collaborator(format!("{}: {}", prefix, other)),
        }
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        EngineError::Collaborator(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Collaborator(err.to_string())
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::Collaborator(err.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Collaborator(err.to_string())
    }
}
