//! In-process store backing both repository ports.
//!
//! A single `RwLock` guards users and documents together, so the paired
//! writes of `create_owned` / `delete_owned` happen under one write guard.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::user_repository::{UserRepository, UserWrite};
use crate::domain::documents::document::{
    Document as DomainDocument, DocumentPatch, DocumentReplacement, NewDocument, OrphanReference,
    Permission, RoleEntry,
};
use crate::domain::users::user::{Credentials, ProfilePatch, User};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, StoredUser>,
    next_user_seq: u64,
    // Insertion order is discovery order.
    documents: Vec<DomainDocument>,
}

struct StoredUser {
    user: User,
    password_hash: String,
    seq: u64,
}

impl State {
    fn document_mut(&mut self, id: Uuid) -> Option<&mut DomainDocument> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    fn email_in_use(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.user.email == email && Some(u.user.id) != except)
    }

    fn owns(&self, user_id: Uuid, document_id: Uuid) -> bool {
        self.documents
            .iter()
            .any(|d| d.id == document_id && d.owner_id == user_id)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> anyhow::Result<UserWrite> {
        let mut state = self.state.write().await;
        if state.email_in_use(email, None) {
            return Ok(UserWrite::EmailTaken);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            documents: Vec::new(),
        };
        let seq = state.next_user_seq;
        state.next_user_seq += 1;
        state.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
                seq,
            },
        );
        Ok(UserWrite::Saved(user))
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<Credentials>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.user.email == email)
            .map(|u| Credentials {
                user_id: u.user.id,
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).map(|u| u.user.clone()))
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        let state = self.state.read().await;
        let mut stored: Vec<&StoredUser> = state.users.values().collect();
        stored.sort_by_key(|u| u.seq);
        Ok(stored.into_iter().map(|u| u.user.clone()).collect())
    }

    async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> anyhow::Result<UserWrite> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Ok(UserWrite::Missing);
        }
        if let Some(email) = patch.email.as_deref() {
            if state.email_in_use(email, Some(id)) {
                return Ok(UserWrite::EmailTaken);
            }
        }
        let Some(stored) = state.users.get_mut(&id) else {
            return Ok(UserWrite::Missing);
        };
        if let Some(email) = &patch.email {
            stored.user.email = email.clone();
        }
        if let Some(name) = &patch.name {
            stored.user.name = name.clone();
        }
        Ok(UserWrite::Saved(stored.user.clone()))
    }
}

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<DomainDocument>> {
        let state = self.state.read().await;
        Ok(state.documents.iter().find(|d| d.id == id).cloned())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<DomainDocument>> {
        Ok(self.state.read().await.documents.clone())
    }

    async fn find_by_title(&self, query: &str) -> anyhow::Result<Vec<DomainDocument>> {
        let needle = query.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .documents
            .iter()
            .filter(|d| d.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<DomainDocument>> {
        let state = self.state.read().await;
        Ok(state
            .documents
            .iter()
            .filter(|d| ids.contains(&d.id))
            .cloned()
            .collect())
    }

    async fn create_owned(
        &self,
        owner_id: Uuid,
        doc: &NewDocument,
    ) -> anyhow::Result<DomainDocument> {
        let mut state = self.state.write().await;
        let Some(owner) = state.users.get_mut(&owner_id) else {
            anyhow::bail!("owner {owner_id} does not exist");
        };
        let now = chrono::Utc::now();
        let created = DomainDocument {
            id: Uuid::new_v4(),
            title: doc.title.clone(),
            content: doc.content.clone(),
            owner_id,
            roles: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        owner.user.documents.push(created.id);
        state.documents.push(created.clone());
        Ok(created)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        patch: &DocumentPatch,
    ) -> anyhow::Result<Option<DomainDocument>> {
        let mut state = self.state.write().await;
        Ok(state.document_mut(id).map(|d| {
            if let Some(title) = &patch.title {
                d.title = title.clone();
            }
            if let Some(content) = &patch.content {
                d.content = content.clone();
            }
            d.updated_at = chrono::Utc::now();
            d.clone()
        }))
    }

    async fn replace_fields(
        &self,
        id: Uuid,
        replacement: &DocumentReplacement,
    ) -> anyhow::Result<Option<DomainDocument>> {
        let mut state = self.state.write().await;
        Ok(state.document_mut(id).map(|d| {
            d.title = replacement.title.clone();
            d.content = replacement.content.clone();
            d.updated_at = chrono::Utc::now();
            d.clone()
        }))
    }

    async fn delete_owned(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut state = self.state.write().await;
        let Some(pos) = state.documents.iter().position(|d| d.id == id) else {
            return Ok(false);
        };
        let removed = state.documents.remove(pos);
        if let Some(owner) = state.users.get_mut(&removed.owner_id) {
            owner.user.documents.retain(|d| *d != id);
        }
        Ok(true)
    }

    async fn upsert_role(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        permission: Permission,
    ) -> anyhow::Result<Option<DomainDocument>> {
        let mut state = self.state.write().await;
        Ok(state.document_mut(document_id).map(|d| {
            match d.roles.iter_mut().find(|r| r.user_id == user_id) {
                Some(existing) => existing.permission = permission,
                None => d.roles.push(RoleEntry {
                    user_id,
                    permission,
                }),
            }
            d.updated_at = chrono::Utc::now();
            d.clone()
        }))
    }

    async fn remove_role(&self, document_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let mut state = self.state.write().await;
        let Some(doc) = state.document_mut(document_id) else {
            return Ok(false);
        };
        let before = doc.roles.len();
        doc.roles.retain(|r| r.user_id != user_id);
        Ok(doc.roles.len() != before)
    }

    async fn find_orphans(&self) -> anyhow::Result<Vec<OrphanReference>> {
        let state = self.state.read().await;
        let mut out = Vec::new();
        for (user_id, stored) in &state.users {
            for doc_id in &stored.user.documents {
                if !state.owns(*user_id, *doc_id) {
                    out.push(OrphanReference::DanglingListEntry {
                        user_id: *user_id,
                        document_id: *doc_id,
                    });
                }
            }
        }
        for doc in &state.documents {
            let listed = state
                .users
                .get(&doc.owner_id)
                .map(|u| u.user.owns(doc.id))
                .unwrap_or(false);
            if !listed {
                out.push(OrphanReference::UnlistedDocument {
                    user_id: doc.owner_id,
                    document_id: doc.id,
                });
            }
        }
        Ok(out)
    }

    async fn repair_orphans(&self, orphans: &[OrphanReference]) -> anyhow::Result<u64> {
        let mut state = self.state.write().await;
        let mut repaired = 0;
        for orphan in orphans {
            match orphan {
                OrphanReference::DanglingListEntry {
                    user_id,
                    document_id,
                } => {
                    // The scan may be stale by now; only repair what is still broken.
                    if state.owns(*user_id, *document_id) {
                        continue;
                    }
                    if let Some(stored) = state.users.get_mut(user_id) {
                        let before = stored.user.documents.len();
                        stored.user.documents.retain(|d| d != document_id);
                        repaired += (before - stored.user.documents.len()) as u64;
                    }
                }
                OrphanReference::UnlistedDocument {
                    user_id,
                    document_id,
                } => {
                    if !state.owns(*user_id, *document_id) {
                        continue;
                    }
                    if let Some(stored) = state.users.get_mut(user_id) {
                        if !stored.user.owns(*document_id) {
                            stored.user.documents.push(*document_id);
                            repaired += 1;
                        }
                    }
                }
            }
        }
        Ok(repaired)
    }
}
