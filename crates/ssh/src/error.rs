use thiserror::Error;

/// Error type for building and resolving SSH commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A setter received a value it cannot render.
    #[error("{0}")]
    InvalidArgument(String),

    /// Home directory not found.
    #[error("could not determine home directory")]
    NoHomeDir,

    /// SSH config parse error (fatal - user should fix their SSH config).
    #[error("failed to parse SSH config: {0}")]
    SshConfigParse(String),
}

impl Error {
    pub(crate) fn negative_port() -> Self {
        Self::InvalidArgument("port must be a positive integer".to_string())
    }
}
