pub mod create_document;
pub mod delete_document;
pub mod error;
pub mod get_document;
pub mod grant_role;
pub mod list_documents;
pub mod list_user_documents;
pub mod reconcile_ownership;
pub mod replace_document;
pub mod revoke_role;
pub mod search_documents;
pub mod update_document;

use uuid::Uuid;

use crate::application::access::{self, Capability};
use crate::application::ports::document_repository::DocumentRepository;
use crate::domain::documents::document::Document as DomainDocument;
use error::{DocumentError, DocumentResult};

pub const MAX_TITLE_LEN: usize = 256;

/// Loads a document and checks the caller holds at least `needed`.
///
/// Callers that cannot even read the document get `NotFound`, so existence is
/// only revealed to readers; readers lacking `needed` get `Forbidden`.
pub(crate) async fn authorize<R>(
    repo: &R,
    user_id: Uuid,
    doc_id: Uuid,
    needed: Capability,
) -> DocumentResult<DomainDocument>
where
    R: DocumentRepository + ?Sized,
{
    let doc = repo.find_by_id(doc_id).await?;
    let cap = access::resolve_document(doc.as_ref(), user_id);
    if cap < Capability::View {
        return Err(DocumentError::NotFound);
    }
    if cap < needed {
        tracing::debug!(document_id = %doc_id, user_id = %user_id, ?cap, ?needed, "document_access_denied");
        return Err(DocumentError::Forbidden);
    }
    doc.ok_or(DocumentError::NotFound)
}

pub(crate) fn normalize_title(title: &str) -> DocumentResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DocumentError::Invalid("title must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(DocumentError::Invalid(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}
