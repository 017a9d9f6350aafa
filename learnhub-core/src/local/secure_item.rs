//! Base64-wrapped JSON values. This is obfuscation, not encryption.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::storage::{LocalStore, LocalStoreError};

pub fn set_secure_item<T: Serialize + ?Sized>(
    store: &dyn LocalStore,
    key: &str,
    value: &T,
) -> Result<(), LocalStoreError> {
    let json = serde_json::to_vec(value)?;
    store.set_item(key, &STANDARD.encode(json))
}

/// `None` when the key is missing or its value cannot be decoded.
pub fn get_secure_item<T: DeserializeOwned>(
    store: &dyn LocalStore,
    key: &str,
) -> Option<T> {
    let encoded = store.get_item(key)?;
    let bytes = match STANDARD.decode(encoded.as_bytes()) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(key, error = %err, "stored item is not valid base64");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "stored item is not valid JSON");
            None
        }
    }
}
