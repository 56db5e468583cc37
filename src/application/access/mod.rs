use uuid::Uuid;

use crate::domain::documents::document::{Document, Permission};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capability {
    None,
    View,
    Edit,
    Manage,
}

// Pure decisions only. Callers fetch the document and pass `None` when it
// does not exist, which always resolves to `Capability::None`.

pub fn resolve_document(document: Option<&Document>, user_id: Uuid) -> Capability {
    let Some(doc) = document else {
        return Capability::None;
    };
    if doc.owner_id == user_id {
        return Capability::Manage;
    }
    match doc.role_for(user_id) {
        Some(Permission::Admin) => Capability::Manage,
        Some(Permission::Write) => Capability::Edit,
        Some(Permission::Read) => Capability::View,
        None => Capability::None,
    }
}

/// Owner or any role entry.
pub fn access_check(document: Option<&Document>, user_id: Uuid) -> bool {
    resolve_document(document, user_id) >= Capability::View
}

/// Owner or a write/admin role entry.
pub fn role_check(document: Option<&Document>, user_id: Uuid) -> bool {
    resolve_document(document, user_id) >= Capability::Edit
}

/// Owner or an admin role entry; gates role administration.
pub fn manage_check(document: Option<&Document>, user_id: Uuid) -> bool {
    resolve_document(document, user_id) >= Capability::Manage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::documents::document::RoleEntry;

    fn doc_with_roles(owner: Uuid, roles: Vec<RoleEntry>) -> Document {
        let now = chrono::Utc::now();
        Document {
            id: Uuid::new_v4(),
            title: "Spec".into(),
            content: String::new(),
            owner_id: owner,
            roles,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn missing_document_is_never_permitted() {
        let user = Uuid::new_v4();
        assert_eq!(resolve_document(None, user), Capability::None);
        assert!(!access_check(None, user));
        assert!(!role_check(None, user));
        assert!(!manage_check(None, user));
    }

    #[test]
    fn owner_has_full_permission_without_role_entry() {
        let owner = Uuid::new_v4();
        let doc = doc_with_roles(owner, vec![]);
        assert!(access_check(Some(&doc), owner));
        assert!(role_check(Some(&doc), owner));
        assert!(manage_check(Some(&doc), owner));
    }

    #[test]
    fn stranger_is_denied() {
        let doc = doc_with_roles(Uuid::new_v4(), vec![]);
        let stranger = Uuid::new_v4();
        assert!(!access_check(Some(&doc), stranger));
        assert!(!role_check(Some(&doc), stranger));
    }

    #[test]
    fn capability_follows_role_level() {
        let (reader, writer, admin) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let doc = doc_with_roles(
            Uuid::new_v4(),
            vec![
                RoleEntry {
                    user_id: reader,
                    permission: Permission::Read,
                },
                RoleEntry {
                    user_id: writer,
                    permission: Permission::Write,
                },
                RoleEntry {
                    user_id: admin,
                    permission: Permission::Admin,
                },
            ],
        );

        assert!(access_check(Some(&doc), reader));
        assert!(!role_check(Some(&doc), reader));

        assert!(access_check(Some(&doc), writer));
        assert!(role_check(Some(&doc), writer));
        assert!(!manage_check(Some(&doc), writer));

        assert!(role_check(Some(&doc), admin));
        assert!(manage_check(Some(&doc), admin));
    }

    #[test]
    fn role_check_implies_access_check() {
        let users: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let levels = [Permission::Read, Permission::Write, Permission::Admin];
        let roles = users
            .iter()
            .skip(1)
            .zip(levels)
            .map(|(u, p)| RoleEntry {
                user_id: *u,
                permission: p,
            })
            .collect();
        let doc = doc_with_roles(users[0], roles);
        let outsider = Uuid::new_v4();
        for u in users.iter().chain(std::iter::once(&outsider)) {
            if role_check(Some(&doc), *u) {
                assert!(access_check(Some(&doc), *u));
            }
        }
    }
}
