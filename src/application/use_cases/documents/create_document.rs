use uuid::Uuid;

use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::documents::error::{DocumentError, DocumentResult};
use crate::application::use_cases::documents::normalize_title;
use crate::domain::documents::document::{Document as DomainDocument, NewDocument};

pub struct CreateDocument<'a, R, U>
where
    R: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub repo: &'a R,
    pub users: &'a U,
}

impl<'a, R, U> CreateDocument<'a, R, U>
where
    R: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub async fn execute(
        &self,
        owner_id: Uuid,
        title: &str,
        content: &str,
    ) -> DocumentResult<DomainDocument> {
        let title = normalize_title(title)?;
        if self.users.find_by_id(owner_id).await?.is_none() {
            return Err(DocumentError::NotFound);
        }
        let doc = self
            .repo
            .create_owned(
                owner_id,
                &NewDocument {
                    title,
                    content: content.to_string(),
                },
            )
            .await?;
        tracing::info!(document_id = %doc.id, owner_id = %owner_id, "document_created");
        Ok(doc)
    }
}
