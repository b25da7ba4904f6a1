use thiserror::Error;

/// Error taxonomy for the advisor core.
///
/// Compatibility failures are deliberately *not* here: a failed rule is an
/// expected outcome and lives in the report as a `Fail` entry.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Unknown archetype, malformed share table, or invalid budget.
    /// Fatal to the single call; never crashes the process.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// External search or scoring collaborator unreachable, or it returned
    /// a payload the core cannot use. Surfaced only when no partial result
    /// can be produced at all.
    #[error("retrieval error: {0}")]
    Retrieval(String),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

impl AdvisorError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn retrieval(msg: impl Into<String>) -> Self {
        Self::Retrieval(msg.into())
    }
}
