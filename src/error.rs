//! Error types for option registration and resolution

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The key can never be rendered as a `--key` flag.
    #[error("Invalid option key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("Option key '{0}' is reserved")]
    ReservedKey(String),

    #[error("Option '{key}' needs a non-empty environment variable name")]
    EmptyEnvName { key: String },

    /// Re-registering a key may replace its default and description, but not its variable.
    #[error(
        "Option '{key}' is already bound to environment variable {previous}; refusing to rebind it to {requested}"
    )]
    EnvNameChanged { key: String, previous: String, requested: String },

    #[error("Environment variable {env} already configures option '{owner}'; cannot also bind it to '{requested}'")]
    EnvNameTaken { env: String, owner: String, requested: String },

    /// Malformed command line, as reported by the argument parser.
    #[error(transparent)]
    Parse(#[from] clap::Error),
}
