use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors returned while configuring or running a generator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("randomness source failed: {0}")]
    Entropy(String),
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    #[error("invalid code length {length}; expected 0..={max_length}")]
    InvalidLength { length: usize, max_length: usize },
}
