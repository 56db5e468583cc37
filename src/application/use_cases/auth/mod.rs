pub mod login;
pub mod me;
pub mod register;

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub(crate) fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_ascii_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AuthError::InvalidInput("email is not valid".into())),
    }
}

pub(crate) fn normalize_name(name: &str) -> Result<String, AuthError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::InvalidInput("name must not be empty".into()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(
            normalize_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(normalize_name("  "), Err(AuthError::InvalidInput(_))));
        assert_eq!(normalize_name(" Bo ").unwrap(), "Bo");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "alice", "@example.com", "alice@localhost"] {
            assert!(matches!(
                normalize_email(bad),
                Err(AuthError::InvalidInput(_))
            ));
        }
    }
}
