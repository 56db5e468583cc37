use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::documents::document::{
    Document as DomainDocument, DocumentPatch, DocumentReplacement, NewDocument, OrphanReference,
    Permission,
};

// Not-found is reported as Ok(None) / Ok(false); Err is always a storage fault.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<DomainDocument>>;

    /// All documents in discovery order (created_at, then id).
    async fn find_all(&self) -> anyhow::Result<Vec<DomainDocument>>;

    /// Case-insensitive title substring match, discovery order.
    async fn find_by_title(&self, query: &str) -> anyhow::Result<Vec<DomainDocument>>;

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<DomainDocument>>;

    // Inserts the document and appends it to the owner's list as one unit.
    async fn create_owned(
        &self,
        owner_id: Uuid,
        doc: &NewDocument,
    ) -> anyhow::Result<DomainDocument>;

    async fn update_fields(
        &self,
        id: Uuid,
        patch: &DocumentPatch,
    ) -> anyhow::Result<Option<DomainDocument>>;

    async fn replace_fields(
        &self,
        id: Uuid,
        replacement: &DocumentReplacement,
    ) -> anyhow::Result<Option<DomainDocument>>;

    // Removes the document, its role entries and the owner's reference as one unit.
    async fn delete_owned(&self, id: Uuid) -> anyhow::Result<bool>;

    async fn upsert_role(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        permission: Permission,
    ) -> anyhow::Result<Option<DomainDocument>>;

    async fn remove_role(&self, document_id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;

    async fn find_orphans(&self) -> anyhow::Result<Vec<OrphanReference>>;

    /// Returns how many references were fixed.
    async fn repair_orphans(&self, orphans: &[OrphanReference]) -> anyhow::Result<u64>;
}
