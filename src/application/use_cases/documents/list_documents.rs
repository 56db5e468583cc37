use uuid::Uuid;

use crate::application::access;
use crate::application::dto::pagination::Page;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::use_cases::documents::error::DocumentResult;
use crate::domain::documents::document::Document as DomainDocument;

pub struct ListDocuments<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> ListDocuments<'a, R> {
    pub async fn execute(&self, user_id: Uuid, page: Page) -> DocumentResult<Vec<DomainDocument>> {
        let visible: Vec<DomainDocument> = self
            .repo
            .find_all()
            .await?
            .into_iter()
            .filter(|d| access::access_check(Some(d), user_id))
            .collect();
        Ok(page.apply(visible))
    }
}
