use uuid::Uuid;

use crate::application::access::Capability;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::use_cases::documents::authorize;
use crate::application::use_cases::documents::error::{DocumentError, DocumentResult};

pub struct RevokeRole<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> RevokeRole<'a, R> {
    pub async fn execute(&self, user_id: Uuid, doc_id: Uuid, target_id: Uuid) -> DocumentResult<()> {
        authorize(self.repo, user_id, doc_id, Capability::Manage).await?;
        if !self.repo.remove_role(doc_id, target_id).await? {
            return Err(DocumentError::NotFound);
        }
        tracing::info!(document_id = %doc_id, target_user_id = %target_id, "document_role_revoked");
        Ok(())
    }
}
