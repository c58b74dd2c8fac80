use std::io;
use thiserror::Error;

/// Every way a run can stop before printing the completion summary.
#[derive(Debug, Error)]
pub enum InitError {
    /// A project name or author failed validation.
    #[error("{0}")]
    Validation(String),
    /// An empty answer was given to a prompt without a default.
    #[error("No input provided.")]
    NoInput,
    /// An answer outside the prompt's restricted option set.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    /// The user declined or cancelled.
    #[error("Exiting...")]
    Aborted,
    #[error("Invalid configuration: {0:#}")]
    Config(anyhow::Error),
    #[error("Failed to copy template: {0:#}")]
    Template(anyhow::Error),
    /// A pipeline step failed; later steps were not run.
    #[error("Error while running {step}: {source:#}")]
    Step {
        step: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl InitError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        InitError::Validation(message.into())
    }

    /// Process exit code for this error. Every abort is non-zero.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

pub type Result<T, E = InitError> = std::result::Result<T, E>;
