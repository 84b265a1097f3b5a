//! Error types for template loading and rendering.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("missing variable `{variable}` for template `{template}`")]
    MissingVariable { template: String, variable: String },

    #[error("invalid template `{template}`: {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("invalid role `{0}` (expected system, user, or assistant)")]
    InvalidRole(String),

    #[error("failed to read template source: {0}")]
    Io(#[from] std::io::Error),
}
