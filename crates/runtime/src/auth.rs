//! Credential checking.

use crate::{Error, Result};
use storage::Principal;
use uuid::Uuid;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Login form input.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Turns credentials into a principal.
pub trait Authenticator {
    fn authenticate(&self, credentials: &Credentials) -> Result<Principal>;
}

/// Accepts any well-formed email with a long enough password.
///
/// The principal id is derived from the lowercased email, so the same user
/// keeps the same id (and stays the creator of their events) across logins.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAuthenticator;

impl Authenticator for LocalAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> Result<Principal> {
        let email = credentials.email.trim().to_lowercase();
        let Some((local, domain)) = email.split_once('@') else {
            return Err(Error::Authentication("invalid email".to_string()));
        };
        if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(Error::Authentication("invalid email".to_string()));
        }
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Authentication(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("mailto:{email}").as_bytes());
        Ok(Principal::new(id.to_string(), local).with_email(email.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_credentials() {
        let principal = LocalAuthenticator
            .authenticate(&Credentials::new("Alice@Example.com", "secret1"))
            .unwrap();
        assert_eq!(principal.name, "alice");
        assert_eq!(principal.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_same_email_same_id() {
        let a = LocalAuthenticator
            .authenticate(&Credentials::new("alice@example.com", "secret1"))
            .unwrap();
        let b = LocalAuthenticator
            .authenticate(&Credentials::new(" ALICE@example.com", "another1"))
            .unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_rejects_bad_email() {
        for email in ["alice", "@example.com", "alice@localhost", "alice@.com"] {
            let result = LocalAuthenticator.authenticate(&Credentials::new(email, "secret1"));
            assert!(matches!(result, Err(Error::Authentication(_))), "{email}");
        }
    }

    #[test]
    fn test_rejects_short_password() {
        let result = LocalAuthenticator.authenticate(&Credentials::new("alice@example.com", "12345"));
        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("alice@example.com", "hunter22"));
        assert!(!rendered.contains("hunter22"));
    }
}
