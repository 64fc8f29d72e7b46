use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// Nothing but whitespace was supplied
    #[error("no messages to analyze: input is empty")]
    EmptyInput,

    #[error("invalid message pattern: {0}")]
    Pattern(#[from] regex::Error),
}
