use uuid::Uuid;

use crate::application::access::Capability;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::use_cases::documents::authorize;
use crate::application::use_cases::documents::error::DocumentResult;
use crate::domain::documents::document::Document as DomainDocument;

pub struct GetDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> GetDocument<'a, R> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> DocumentResult<DomainDocument> {
        authorize(self.repo, user_id, id, Capability::View).await
    }
}
