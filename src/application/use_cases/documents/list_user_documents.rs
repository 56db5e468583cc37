use uuid::Uuid;

use crate::application::access;
use crate::application::dto::pagination::Page;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::documents::error::{DocumentError, DocumentResult};
use crate::domain::documents::document::Document as DomainDocument;

/// Documents owned by `owner_id` that the caller may read, in the owner's
/// list order.
pub struct ListUserDocuments<'a, R, U>
where
    R: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub repo: &'a R,
    pub users: &'a U,
}

impl<'a, R, U> ListUserDocuments<'a, R, U>
where
    R: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        owner_id: Uuid,
        page: Page,
    ) -> DocumentResult<Vec<DomainDocument>> {
        let Some(owner) = self.users.find_by_id(owner_id).await? else {
            return Err(DocumentError::NotFound);
        };
        let ids = owner.documents;
        let mut docs = self.repo.find_many(&ids).await?;
        docs.sort_by_key(|d| ids.iter().position(|id| *id == d.id));
        let visible: Vec<DomainDocument> = docs
            .into_iter()
            .filter(|d| d.owner_id == owner_id && access::access_check(Some(d), user_id))
            .collect();
        Ok(page.apply(visible))
    }
}
