use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Admin,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" => Some(Permission::Read),
            "write" => Some(Permission::Write),
            "admin" => Some(Permission::Admin),
            _ => None,
        }
    }
}

/// Grants a non-owner access to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEntry {
    pub user_id: Uuid,
    pub permission: Permission,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub owner_id: Uuid,
    pub roles: Vec<RoleEntry>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    pub fn role_for(&self, user_id: Uuid) -> Option<Permission> {
        self.roles
            .iter()
            .find(|r| r.user_id == user_id)
            .map(|r| r.permission)
    }
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
}

// None => leave field untouched
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct DocumentReplacement {
    pub title: String,
    pub content: String,
}

/// A consistency violation between `documents.owner_id` and a user's
/// owned-document list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrphanReference {
    /// Listed under the user but the document is gone or owned by someone else.
    DanglingListEntry { user_id: Uuid, document_id: Uuid },
    /// Owned by the user but missing from their list.
    UnlistedDocument { user_id: Uuid, document_id: Uuid },
}
