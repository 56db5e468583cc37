use crate::application::dto::pagination::Page;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::users::UserResult;
use crate::domain::users::user::User;

pub struct ListUsers<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ListUsers<'a, R> {
    pub async fn execute(&self, page: Page) -> UserResult<Vec<User>> {
        let users = self.repo.list_users().await?;
        Ok(page.apply(users))
    }
}
