use uuid::Uuid;

/// A registered account and the documents it owns, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub documents: Vec<Uuid>,
}

impl User {
    pub fn owns(&self, document_id: Uuid) -> bool {
        self.documents.contains(&document_id)
    }
}

/// Login material, never leaves the application layer.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
}

/// Profile fields a user may change. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owns_checks_the_document_list() {
        let doc = Uuid::new_v4();
        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            name: "A".into(),
            documents: vec![doc],
        };
        assert!(user.owns(doc));
        assert!(!user.owns(Uuid::new_v4()));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        assert!(ProfilePatch::default().is_empty());
        assert!(
            !ProfilePatch {
                name: Some("B".into()),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
