use crate::application::ports::document_repository::DocumentRepository;
use crate::domain::documents::document::OrphanReference;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub dangling_entries: usize,
    pub unlisted_documents: usize,
    pub repaired: u64,
}

pub struct ReconcileOwnership<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> ReconcileOwnership<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<ReconcileReport> {
        let orphans = self.repo.find_orphans().await?;
        if orphans.is_empty() {
            return Ok(ReconcileReport::default());
        }
        let mut report = ReconcileReport::default();
        for o in &orphans {
            match o {
                OrphanReference::DanglingListEntry { user_id, document_id } => {
                    tracing::warn!(user_id = %user_id, document_id = %document_id, "dangling_owner_list_entry");
                    report.dangling_entries += 1;
                }
                OrphanReference::UnlistedDocument { user_id, document_id } => {
                    tracing::warn!(user_id = %user_id, document_id = %document_id, "document_missing_from_owner_list");
                    report.unlisted_documents += 1;
                }
            }
        }
        report.repaired = self.repo.repair_orphans(&orphans).await?;
        tracing::info!(
            dangling = report.dangling_entries,
            unlisted = report.unlisted_documents,
            repaired = report.repaired,
            "ownership_reconciled"
        );
        Ok(report)
    }
}
