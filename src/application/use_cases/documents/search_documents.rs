use uuid::Uuid;

use crate::application::access;
use crate::application::dto::pagination::Page;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::use_cases::documents::error::DocumentResult;
use crate::domain::documents::document::Document as DomainDocument;

pub struct SearchDocuments<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> SearchDocuments<'a, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        q: Option<String>,
        page: Page,
    ) -> DocumentResult<Vec<DomainDocument>> {
        let q = q.unwrap_or_default();
        let q = q.trim();
        let candidates = if q.is_empty() {
            self.repo.find_all().await?
        } else {
            self.repo.find_by_title(q).await?
        };
        let hits: Vec<DomainDocument> = candidates
            .into_iter()
            .filter(|d| access::access_check(Some(d), user_id))
            .collect();
        Ok(page.apply(hits))
    }
}
