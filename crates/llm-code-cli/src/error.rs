//! CLI error type and exit-code mapping.

use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum CliError {
    /// The invocation itself was unusable (bad arguments, missing
    /// configuration, no templates).
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Template(#[from] llm_code_templates::TemplateError),

    #[error(transparent)]
    Client(#[from] llm_code_client::ClientError),

    #[error(transparent)]
    Store(#[from] llm_code_store::StoreError),

    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Usage and configuration problems exit 2 (matching clap's own status
    /// for bad arguments); failures of a well-formed exchange exit 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) | CliError::Settings(_) => 2,
            _ => 1,
        }
    }
}
