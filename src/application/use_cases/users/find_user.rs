use uuid::Uuid;

use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::users::{UserError, UserResult};
use crate::domain::users::user::User;

pub struct FindUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> FindUser<'a, R> {
    pub async fn execute(&self, id: Uuid) -> UserResult<User> {
        self.repo.find_by_id(id).await?.ok_or(UserError::NotFound)
    }
}
