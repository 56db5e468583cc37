use uuid::Uuid;

use crate::application::access::Capability;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::use_cases::documents::authorize;
use crate::application::use_cases::documents::error::{DocumentError, DocumentResult};

pub struct DeleteDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> DeleteDocument<'a, R> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> DocumentResult<()> {
        let doc = authorize(self.repo, user_id, id, Capability::Edit).await?;
        // The owner's list is cleaned up by the repository, whoever deletes.
        if !self.repo.delete_owned(id).await? {
            return Err(DocumentError::NotFound);
        }
        tracing::info!(document_id = %id, owner_id = %doc.owner_id, user_id = %user_id, "document_deleted");
        Ok(())
    }
}
