pub mod find_user;
pub mod list_users;
pub mod update_profile;

#[derive(thiserror::Error, Debug)]
pub enum UserError {
    #[error("User does not exist")]
    NotFound,
    #[error("{0}")]
    InvalidInput(String),
    #[error("email already registered")]
    EmailTaken,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type UserResult<T> = Result<T, UserError>;
