use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum SearchError {
    /// The tree lost track of where the agent is.
    #[error("no search node at position {0}")]
    UnknownPosition(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
