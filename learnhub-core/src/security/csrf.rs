use std::sync::Arc;

use constant_time_eq::constant_time_eq;
use uuid::Uuid;

use crate::local::{CSRF_TOKEN_KEY, LocalStore, LocalStoreError};

/// Per-client CSRF token kept in local state.
#[derive(Debug, Clone)]
pub struct CsrfTokens {
    store: Arc<dyn LocalStore>,
}

impl CsrfTokens {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Returns the stored token, generating one on first use.
    pub fn ensure(&self) -> Result<String, LocalStoreError> {
        match self.token() {
            Some(token) => Ok(token),
            None => self.rotate(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store
            .get_item(CSRF_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    pub fn rotate(&self) -> Result<String, LocalStoreError> {
        let token = Uuid::new_v4().to_string();
        self.store.set_item(CSRF_TOKEN_KEY, &token)?;
        Ok(token)
    }

    /// `false` when no token has been issued yet.
    pub fn validate(&self, candidate: &str) -> bool {
        self.token().is_some_and(|stored| {
            constant_time_eq(stored.as_bytes(), candidate.as_bytes())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::MemoryLocalStore;

    #[test]
    fn ensure_is_stable_until_rotated() {
        let tokens = CsrfTokens::new(Arc::new(MemoryLocalStore::new()));
        assert!(!tokens.validate(""));

        let first = tokens.ensure().unwrap();
        assert!(Uuid::parse_str(&first).is_ok());
        assert_eq!(tokens.ensure().unwrap(), first);
        assert!(tokens.validate(&first));
        assert!(!tokens.validate("forged"));

        let second = tokens.rotate().unwrap();
        assert_ne!(first, second);
        assert!(!tokens.validate(&first));
        assert!(tokens.validate(&second));
    }
}
