//! Store tests against a real Postgres. Each test gets a fresh database from
//! `#[sqlx::test]`; run them with `DATABASE_URL` set and `cargo test -- --ignored`.

use sqlx::PgPool;
use uuid::Uuid;

use docs_api::application::ports::document_repository::DocumentRepository;
use docs_api::application::ports::user_repository::{UserRepository, UserWrite};
use docs_api::domain::documents::document::{NewDocument, OrphanReference, Permission};
use docs_api::domain::users::user::ProfilePatch;
use docs_api::infrastructure::db::repositories::document_repository_sqlx::SqlxDocumentRepository;
use docs_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;

async fn user(users: &SqlxUserRepository, email: &str) -> Uuid {
    match users.create_user(email, email, "hash").await.unwrap() {
        UserWrite::Saved(user) => user.id,
        other => panic!("unexpected write outcome: {other:?}"),
    }
}

async fn owned(users: &SqlxUserRepository, id: Uuid) -> Vec<Uuid> {
    UserRepository::find_by_id(users, id)
        .await
        .unwrap()
        .unwrap()
        .documents
}

fn new_doc(title: &str) -> NewDocument {
    NewDocument {
        title: title.to_string(),
        content: String::new(),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn create_and_delete_keep_owner_list_in_step(pool: PgPool) {
    let users = SqlxUserRepository::new(pool.clone());
    let docs = SqlxDocumentRepository::new(pool);
    let a = user(&users, "a@example.com").await;
    let b = user(&users, "b@example.com").await;

    let first = docs.create_owned(a, &new_doc("first")).await.unwrap();
    let second = docs.create_owned(a, &new_doc("second")).await.unwrap();
    assert_eq!(owned(&users, a).await, vec![first.id, second.id]);

    docs.upsert_role(first.id, b, Permission::Write)
        .await
        .unwrap()
        .unwrap();
    assert!(docs.delete_owned(first.id).await.unwrap());
    assert_eq!(owned(&users, a).await, vec![second.id]);
    assert!(DocumentRepository::find_by_id(&docs, first.id)
        .await
        .unwrap()
        .is_none());
    assert!(!docs.delete_owned(first.id).await.unwrap());
    assert!(docs.find_orphans().await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn repair_fixes_dangling_and_unlisted_references(pool: PgPool) {
    let users = SqlxUserRepository::new(pool.clone());
    let docs = SqlxDocumentRepository::new(pool.clone());
    let a = user(&users, "a@example.com").await;
    let doc = docs.create_owned(a, &new_doc("kept")).await.unwrap();
    let ghost = Uuid::new_v4();

    sqlx::query("INSERT INTO user_documents (user_id, document_id) VALUES ($1, $2)")
        .bind(a)
        .bind(ghost)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM user_documents WHERE document_id = $1")
        .bind(doc.id)
        .execute(&pool)
        .await
        .unwrap();

    let orphans = docs.find_orphans().await.unwrap();
    assert_eq!(
        orphans,
        vec![
            OrphanReference::DanglingListEntry {
                user_id: a,
                document_id: ghost
            },
            OrphanReference::UnlistedDocument {
                user_id: a,
                document_id: doc.id
            },
        ]
    );
    assert_eq!(docs.repair_orphans(&orphans).await.unwrap(), 2);
    assert_eq!(owned(&users, a).await, vec![doc.id]);
    assert!(docs.find_orphans().await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn stale_repair_leaves_consistent_rows_alone(pool: PgPool) {
    let users = SqlxUserRepository::new(pool.clone());
    let docs = SqlxDocumentRepository::new(pool.clone());
    let a = user(&users, "a@example.com").await;
    let doc = docs.create_owned(a, &new_doc("listed")).await.unwrap();
    let gone = docs.create_owned(a, &new_doc("gone")).await.unwrap();
    assert!(docs.delete_owned(gone.id).await.unwrap());

    let stale = [
        OrphanReference::DanglingListEntry {
            user_id: a,
            document_id: doc.id,
        },
        OrphanReference::UnlistedDocument {
            user_id: a,
            document_id: gone.id,
        },
    ];
    assert_eq!(docs.repair_orphans(&stale).await.unwrap(), 0);
    assert_eq!(owned(&users, a).await, vec![doc.id]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn user_store_reports_email_conflicts(pool: PgPool) {
    let users = SqlxUserRepository::new(pool);
    let a = user(&users, "a@example.com").await;
    let b = user(&users, "b@example.com").await;

    let dup = users
        .create_user("a@example.com", "again", "hash")
        .await
        .unwrap();
    assert!(matches!(dup, UserWrite::EmailTaken));

    let patch = ProfilePatch {
        email: Some("a@example.com".to_string()),
        name: None,
    };
    assert!(matches!(
        users.update_profile(b, &patch).await.unwrap(),
        UserWrite::EmailTaken
    ));
    assert!(matches!(
        users.update_profile(Uuid::new_v4(), &patch).await.unwrap(),
        UserWrite::Missing
    ));

    let listed: Vec<Uuid> = users.list_users().await.unwrap().iter().map(|u| u.id).collect();
    assert_eq!(listed, vec![a, b]);
    let creds = users.find_credentials("a@example.com").await.unwrap().unwrap();
    assert_eq!(creds.user_id, a);
}
