use uuid::Uuid;

use crate::application::access::Capability;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::use_cases::documents::error::{DocumentError, DocumentResult};
use crate::application::use_cases::documents::{authorize, normalize_title};
use crate::domain::documents::document::{Document as DomainDocument, DocumentReplacement};

pub struct ReplaceDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> ReplaceDocument<'a, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> DocumentResult<DomainDocument> {
        authorize(self.repo, user_id, id, Capability::Edit).await?;
        let replacement = DocumentReplacement {
            title: normalize_title(title)?,
            content: content.to_string(),
        };
        let replaced = self
            .repo
            .replace_fields(id, &replacement)
            .await?
            .ok_or(DocumentError::NotFound)?;
        tracing::info!(document_id = %id, user_id = %user_id, "document_replaced");
        Ok(replaced)
    }
}
