use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VoteError {
    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("invalid vote config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse vote config: {0}")]
    Parse(String),
}
