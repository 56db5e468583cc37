use uuid::Uuid;

use crate::application::access::Capability;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::use_cases::documents::error::{DocumentError, DocumentResult};
use crate::application::use_cases::documents::{authorize, normalize_title};
use crate::domain::documents::document::{Document as DomainDocument, DocumentPatch};

pub struct UpdateDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> UpdateDocument<'a, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        mut patch: DocumentPatch,
    ) -> DocumentResult<DomainDocument> {
        let current = authorize(self.repo, user_id, id, Capability::Edit).await?;
        if let Some(title) = patch.title.as_deref() {
            patch.title = Some(normalize_title(title)?);
        }
        if patch.is_empty() {
            return Ok(current);
        }
        let updated = self
            .repo
            .update_fields(id, &patch)
            .await?
            .ok_or(DocumentError::NotFound)?;
        tracing::info!(document_id = %id, user_id = %user_id, "document_updated");
        Ok(updated)
    }
}
