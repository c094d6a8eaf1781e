use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmbitError {
    #[error("invalid node name: {name:?}")]
    InvalidName { name: String },
    #[error("duplicate child node: {name}")]
    DuplicateNode { name: String },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, AmbitError>;
