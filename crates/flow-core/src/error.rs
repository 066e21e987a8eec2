use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlowError {
    #[error("invalid scene config: {0}")]
    InvalidConfig(String),
}

pub type FlowResult<T> = Result<T, FlowError>;
