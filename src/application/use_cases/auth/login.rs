use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::{AuthError, normalize_email};
use crate::domain::users::user::User;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> Result<User, AuthError> {
        let email = normalize_email(&req.email).map_err(|_| AuthError::InvalidCredentials)?;
        let Some(creds) = self.repo.find_credentials(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        let parsed =
            PasswordHash::new(&creds.password_hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)?;
        self.repo
            .find_by_id(creds.user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }
}
