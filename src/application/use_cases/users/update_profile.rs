use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserWrite};
use crate::application::use_cases::auth::{AuthError, normalize_email, normalize_name};
use crate::application::use_cases::users::{UserError, UserResult};
use crate::domain::users::user::{ProfilePatch, User};

/// Changes the caller's own email and/or name. `replace` requires both.
pub struct UpdateProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateProfile<'a, R> {
    pub async fn execute(&self, user_id: Uuid, patch: ProfilePatch) -> UserResult<User> {
        let patch = ProfilePatch {
            email: patch.email.as_deref().map(normalize_email).transpose().map_err(invalid)?,
            name: patch.name.as_deref().map(normalize_name).transpose().map_err(invalid)?,
        };
        if patch.is_empty() {
            return self.repo.find_by_id(user_id).await?.ok_or(UserError::NotFound);
        }
        match self.repo.update_profile(user_id, &patch).await? {
            UserWrite::Saved(user) => {
                tracing::info!(user_id = %user_id, "user_profile_updated");
                Ok(user)
            }
            UserWrite::EmailTaken => Err(UserError::EmailTaken),
            UserWrite::Missing => Err(UserError::NotFound),
        }
    }

    pub async fn replace(&self, user_id: Uuid, email: &str, name: &str) -> UserResult<User> {
        self.execute(
            user_id,
            ProfilePatch {
                email: Some(email.to_string()),
                name: Some(name.to_string()),
            },
        )
        .await
    }
}

fn invalid(err: AuthError) -> UserError {
    match err {
        AuthError::Storage(e) => UserError::Storage(e),
        other => UserError::InvalidInput(other.to_string()),
    }
}
