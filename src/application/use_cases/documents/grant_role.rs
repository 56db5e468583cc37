use uuid::Uuid;

use crate::application::access::Capability;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::documents::authorize;
use crate::application::use_cases::documents::error::{DocumentError, DocumentResult};
use crate::domain::documents::document::{Document as DomainDocument, Permission};

pub struct GrantRole<'a, R, U>
where
    R: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub repo: &'a R,
    pub users: &'a U,
}

impl<'a, R, U> GrantRole<'a, R, U>
where
    R: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        doc_id: Uuid,
        target_id: Uuid,
        permission: Permission,
    ) -> DocumentResult<DomainDocument> {
        let doc = authorize(self.repo, user_id, doc_id, Capability::Manage).await?;
        if doc.owner_id == target_id {
            return Err(DocumentError::Invalid(
                "the owner already has full permission".into(),
            ));
        }
        if self.users.find_by_id(target_id).await?.is_none() {
            return Err(DocumentError::Invalid("target user does not exist".into()));
        }
        let updated = self
            .repo
            .upsert_role(doc_id, target_id, permission)
            .await?
            .ok_or(DocumentError::NotFound)?;
        tracing::info!(
            document_id = %doc_id,
            target_user_id = %target_id,
            permission = permission.as_str(),
            "document_role_granted"
        );
        Ok(updated)
    }
}
