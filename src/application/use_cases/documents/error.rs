#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("Document does not exist or you are not allowed to access it")]
    NotFound,
    #[error("Document does not exist or you are not allowed to modify it")]
    Forbidden,
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;
