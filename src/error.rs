use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("no body named {0:?}")]
    NotFound(String),
}

pub type SimResult<T> = Result<T, SimError>;
