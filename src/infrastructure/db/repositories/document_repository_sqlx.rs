use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::document_repository::DocumentRepository;
use crate::domain::documents::document::{
    Document as DomainDocument, DocumentPatch, DocumentReplacement, NewDocument, OrphanReference,
    Permission, RoleEntry,
};
use crate::infrastructure::db::PgPool;

const DOC_COLUMNS: &str = "id, title, content, owner_id, created_at, updated_at";

pub struct SqlxDocumentRepository {
    pub pool: PgPool,
}

impl SqlxDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(r: &PgRow) -> DomainDocument {
        DomainDocument {
            id: r.get("id"),
            title: r.get("title"),
            content: r.get("content"),
            owner_id: r.get("owner_id"),
            roles: Vec::new(),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }
    }

    // One query for the role entries of every document in `docs`.
    async fn with_roles(&self, rows: Vec<PgRow>) -> anyhow::Result<Vec<DomainDocument>> {
        let mut docs: Vec<DomainDocument> = rows.iter().map(Self::map_row).collect();
        if docs.is_empty() {
            return Ok(docs);
        }
        let ids: Vec<Uuid> = docs.iter().map(|d| d.id).collect();
        let role_rows = sqlx::query(
            r#"SELECT document_id, user_id, permission FROM document_roles
               WHERE document_id = ANY($1)
               ORDER BY document_id, user_id"#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_doc: HashMap<Uuid, Vec<RoleEntry>> = HashMap::new();
        for r in role_rows {
            let doc_id: Uuid = r.get("document_id");
            let raw: String = r.get("permission");
            let Some(permission) = Permission::parse(&raw) else {
                tracing::warn!(document_id = %doc_id, permission = %raw, "unknown_role_permission");
                continue;
            };
            by_doc.entry(doc_id).or_default().push(RoleEntry {
                user_id: r.get("user_id"),
                permission,
            });
        }
        for d in docs.iter_mut() {
            d.roles = by_doc.remove(&d.id).unwrap_or_default();
        }
        Ok(docs)
    }

    async fn one_with_roles(&self, row: Option<PgRow>) -> anyhow::Result<Option<DomainDocument>> {
        match row {
            Some(r) => Ok(self.with_roles(vec![r]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DocumentRepository for SqlxDocumentRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<DomainDocument>> {
        let row = sqlx::query(&format!("SELECT {DOC_COLUMNS} FROM documents WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        self.one_with_roles(row).await
    }

    async fn find_all(&self) -> anyhow::Result<Vec<DomainDocument>> {
        let rows = sqlx::query(&format!(
            "SELECT {DOC_COLUMNS} FROM documents ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        self.with_roles(rows).await
    }

    async fn find_by_title(&self, query: &str) -> anyhow::Result<Vec<DomainDocument>> {
        let escaped = query
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let like = format!("%{}%", escaped);
        let rows = sqlx::query(&format!(
            "SELECT {DOC_COLUMNS} FROM documents WHERE title ILIKE $1 ORDER BY created_at, id"
        ))
        .bind(like)
        .fetch_all(&self.pool)
        .await?;
        self.with_roles(rows).await
    }

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<DomainDocument>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!(
            "SELECT {DOC_COLUMNS} FROM documents WHERE id = ANY($1) ORDER BY created_at, id"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        self.with_roles(rows).await
    }

    async fn create_owned(
        &self,
        owner_id: Uuid,
        doc: &NewDocument,
    ) -> anyhow::Result<DomainDocument> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            "INSERT INTO documents (title, content, owner_id) VALUES ($1, $2, $3) RETURNING {DOC_COLUMNS}"
        ))
        .bind(&doc.title)
        .bind(&doc.content)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;
        let created = Self::map_row(&row);
        sqlx::query("INSERT INTO user_documents (user_id, document_id) VALUES ($1, $2)")
            .bind(owner_id)
            .bind(created.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        patch: &DocumentPatch,
    ) -> anyhow::Result<Option<DomainDocument>> {
        let row = sqlx::query(&format!(
            r#"UPDATE documents SET
                    title = COALESCE($1, title),
                    content = COALESCE($2, content),
                    updated_at = now()
                WHERE id = $3
                RETURNING {DOC_COLUMNS}"#
        ))
        .bind(patch.title.as_deref())
        .bind(patch.content.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        self.one_with_roles(row).await
    }

    async fn replace_fields(
        &self,
        id: Uuid,
        replacement: &DocumentReplacement,
    ) -> anyhow::Result<Option<DomainDocument>> {
        let row = sqlx::query(&format!(
            r#"UPDATE documents SET title = $1, content = $2, updated_at = now()
                WHERE id = $3
                RETURNING {DOC_COLUMNS}"#
        ))
        .bind(&replacement.title)
        .bind(&replacement.content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        self.one_with_roles(row).await
    }

    async fn delete_owned(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;
        // document_roles goes with the row via ON DELETE CASCADE
        let owner: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM documents WHERE id = $1 RETURNING owner_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(owner_id) = owner else {
            tx.rollback().await?;
            return Ok(false);
        };
        sqlx::query("DELETE FROM user_documents WHERE user_id = $1 AND document_id = $2")
            .bind(owner_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn upsert_role(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        permission: Permission,
    ) -> anyhow::Result<Option<DomainDocument>> {
        let mut tx = self.pool.begin().await?;
        let touched = sqlx::query("UPDATE documents SET updated_at = now() WHERE id = $1")
            .bind(document_id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }
        sqlx::query(
            r#"INSERT INTO document_roles (document_id, user_id, permission)
               VALUES ($1, $2, $3)
               ON CONFLICT (document_id, user_id) DO UPDATE SET permission = EXCLUDED.permission"#,
        )
        .bind(document_id)
        .bind(user_id)
        .bind(permission.as_str())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        self.find_by_id(document_id).await
    }

    async fn remove_role(&self, document_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM document_roles WHERE document_id = $1 AND user_id = $2")
            .bind(document_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn find_orphans(&self) -> anyhow::Result<Vec<OrphanReference>> {
        let dangling = sqlx::query(
            r#"SELECT ud.user_id, ud.document_id
               FROM user_documents ud
               LEFT JOIN documents d ON d.id = ud.document_id AND d.owner_id = ud.user_id
               WHERE d.id IS NULL
               ORDER BY ud.seq"#,
        )
        .fetch_all(&self.pool)
        .await?;
        let unlisted = sqlx::query(
            r#"SELECT d.owner_id AS user_id, d.id AS document_id
               FROM documents d
               LEFT JOIN user_documents ud ON ud.document_id = d.id AND ud.user_id = d.owner_id
               WHERE ud.document_id IS NULL
               ORDER BY d.created_at, d.id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out: Vec<OrphanReference> = dangling
            .into_iter()
            .map(|r| OrphanReference::DanglingListEntry {
                user_id: r.get("user_id"),
                document_id: r.get("document_id"),
            })
            .collect();
        out.extend(
            unlisted
                .into_iter()
                .map(|r| OrphanReference::UnlistedDocument {
                    user_id: r.get("user_id"),
                    document_id: r.get("document_id"),
                }),
        );
        Ok(out)
    }

    async fn repair_orphans(&self, orphans: &[OrphanReference]) -> anyhow::Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut repaired = 0u64;
        for orphan in orphans {
            let res = match orphan {
                OrphanReference::DanglingListEntry {
                    user_id,
                    document_id,
                } => {
                    // Re-check inside the transaction; the document may have
                    // been created concurrently.
                    sqlx::query(
                        r#"DELETE FROM user_documents ud
                           WHERE ud.user_id = $1 AND ud.document_id = $2
                             AND NOT EXISTS (
                               SELECT 1 FROM documents d WHERE d.id = $2 AND d.owner_id = $1
                             )"#,
                    )
                    .bind(user_id)
                    .bind(document_id)
                    .execute(&mut *tx)
                    .await?
                }
                OrphanReference::UnlistedDocument {
                    user_id,
                    document_id,
                } => {
                    sqlx::query(
                        r#"INSERT INTO user_documents (user_id, document_id)
                           SELECT $1, $2
                           WHERE EXISTS (SELECT 1 FROM documents d WHERE d.id = $2 AND d.owner_id = $1)
                           ON CONFLICT (user_id, document_id) DO NOTHING"#,
                    )
                    .bind(user_id)
                    .bind(document_id)
                    .execute(&mut *tx)
                    .await?
                }
            };
            repaired += res.rows_affected();
        }
        tx.commit().await?;
        Ok(repaired)
    }
}
