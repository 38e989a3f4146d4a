use crate::validation::ValidationIssue;

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("template validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),
    #[error("component '{0}' does not exist on the canvas")]
    UnknownComponent(String),
    #[error("divider components carry no editable text")]
    NotEditable,
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to create template directory: {0}")]
    TemplateDirCreation(std::io::Error),
    #[error("failed to write template file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read template file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to delete template file: {0}")]
    FileDelete(std::io::Error),
    #[error("failed to serialise template: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialise template: {0}")]
    Deserialization(serde_json::Error),
    #[error("template '{0}' not found")]
    TemplateNotFound(String),
}

pub type TemplateResult<T> = std::result::Result<T, TemplateError>;
