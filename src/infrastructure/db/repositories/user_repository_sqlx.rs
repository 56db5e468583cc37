use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserWrite};
use crate::domain::users::user::{Credentials, ProfilePatch, User};
use crate::infrastructure::db::PgPool;

// Users joined with their owned-document list, aggregated in list order.
const USER_SELECT: &str = r#"
    SELECT u.id, u.email, u.name,
           COALESCE(
             array_agg(ud.document_id ORDER BY ud.seq) FILTER (WHERE ud.document_id IS NOT NULL),
             '{}'
           ) AS documents
    FROM users u
    LEFT JOIN user_documents ud ON ud.user_id = u.id"#;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_user(r: &PgRow) -> anyhow::Result<User> {
        Ok(User {
            id: r.try_get("id")?,
            email: r.try_get("email")?,
            name: r.try_get("name")?,
            documents: r.try_get("documents")?,
        })
    }
}

/// Turns a unique-constraint failure on `users.email` into `EmailTaken`;
/// anything else stays an error.
fn email_conflict(err: sqlx::Error) -> anyhow::Result<UserWrite> {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => Ok(UserWrite::EmailTaken),
        _ => Err(err.into()),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> anyhow::Result<UserWrite> {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;
        match inserted {
            Ok(id) => Ok(UserWrite::Saved(User {
                id,
                email: email.to_string(),
                name: name.to_string(),
                documents: Vec::new(),
            })),
            Err(e) => email_conflict(e),
        }
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<Credentials>> {
        let row = sqlx::query("SELECT id, password_hash FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| Credentials {
            user_id: r.get("id"),
            password_hash: r.get("password_hash"),
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!("{USER_SELECT} WHERE u.id = $1 GROUP BY u.id"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::map_user).transpose()
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            "{USER_SELECT} GROUP BY u.id ORDER BY u.created_at, u.id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::map_user).collect()
    }

    async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> anyhow::Result<UserWrite> {
        let updated = sqlx::query(
            r#"UPDATE users SET
                    email = COALESCE($2, email),
                    name = COALESCE($3, name)
                WHERE id = $1"#,
        )
        .bind(id)
        .bind(patch.email.as_deref())
        .bind(patch.name.as_deref())
        .execute(&self.pool)
        .await;
        match updated {
            Ok(res) if res.rows_affected() == 0 => Ok(UserWrite::Missing),
            Ok(_) => Ok(self
                .find_by_id(id)
                .await?
                .map_or(UserWrite::Missing, UserWrite::Saved)),
            Err(e) => email_conflict(e),
        }
    }
}
