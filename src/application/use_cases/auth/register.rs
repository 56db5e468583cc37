use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::application::ports::user_repository::{UserRepository, UserWrite};
use crate::application::use_cases::auth::{AuthError, normalize_email, normalize_name};
use crate::domain::users::user::User;

pub const MIN_PASSWORD_LEN: usize = 8;

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> Result<User, AuthError> {
        let email = normalize_email(&req.email)?;
        let name = normalize_name(&req.name)?;
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        // The store owns the uniqueness check so concurrent sign-ups cannot
        // both pass it.
        match self.repo.create_user(&email, &name, &hash).await? {
            UserWrite::Saved(user) => {
                tracing::info!(user_id = %user.id, "user_registered");
                Ok(user)
            }
            UserWrite::EmailTaken => Err(AuthError::EmailTaken),
            UserWrite::Missing => Err(anyhow::anyhow!("user insert returned no row").into()),
        }
    }
}
