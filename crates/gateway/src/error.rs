use rxpad_core::ValidationIssue;

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Gateway-side errors, each already shaped for display.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The payload failed local validation; carries every violation so the
    /// caller can display all problems at once. No network call was made.
    #[error("template validation failed: {}", join_issues(.0))]
    Invalid(Vec<ValidationIssue>),
    /// A save from this client is already in flight; retry when it settles.
    #[error("a save is already in progress")]
    SaveInFlight,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server rejected the request; the message is the server's own
    /// text when it provided one, else a generic fallback.
    #[error("{0}")]
    Server(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl GatewayError {
    /// The violation list when this is a validation failure.
    pub fn validation_issues(&self) -> Option<&[ValidationIssue]> {
        match self {
            GatewayError::Invalid(issues) => Some(issues),
            _ => None,
        }
    }
}
