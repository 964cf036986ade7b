//! Credential store — load and save the lookup API key.

use fridge_domain::credential::ApiKey;
use fridge_domain::error::FridgeError;

use crate::ports::KeyValueStore;

/// Persistence key for the API key, stored as a plain UTF-8 string.
pub const API_KEY_KEY: &str = "userApiKey";

/// Reads and writes the [`ApiKey`] through the persistence port.
pub struct CredentialStore<P> {
    persistence: P,
}

impl<P: KeyValueStore> CredentialStore<P> {
    pub fn new(persistence: P) -> Self {
        Self { persistence }
    }

    /// Load the saved key.
    ///
    /// Returns `None` on first run, and also when the saved value is blank or
    /// not valid UTF-8 (the user will be prompted again).
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Storage`] if the adapter fails to read.
    pub fn load(&self) -> Result<Option<ApiKey>, FridgeError> {
        let Some(bytes) = self.persistence.read_bytes(API_KEY_KEY)? else {
            return Ok(None);
        };

        let Ok(text) = String::from_utf8(bytes) else {
            tracing::warn!("saved API key is not valid UTF-8, ignoring it");
            return Ok(None);
        };

        match ApiKey::new(&text) {
            Ok(key) => Ok(Some(key)),
            Err(err) => {
                tracing::warn!(%err, "saved API key is unusable, ignoring it");
                Ok(None)
            }
        }
    }

    /// Persist `key`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Storage`] if the adapter fails to write.
    pub fn save(&self, key: &ApiKey) -> Result<(), FridgeError> {
        self.persistence
            .write_bytes(API_KEY_KEY, key.expose().as_bytes())?;
        tracing::info!("API key saved");
        Ok(())
    }

    /// Whether the user still has to supply a key.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Storage`] if the adapter fails to read.
    pub fn needs_prompt(&self) -> Result<bool, FridgeError> {
        Ok(self.load()?.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryKeyValueStore {
        blobs: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl KeyValueStore for InMemoryKeyValueStore {
        fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, FridgeError> {
            Ok(self.blobs.lock().unwrap().get(key).cloned())
        }

        fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), FridgeError> {
            self.blobs
                .lock()
                .unwrap()
                .insert(key.to_string(), bytes.to_vec());
            Ok(())
        }
    }

    #[test]
    fn should_need_prompt_on_first_run() {
        let store = CredentialStore::new(InMemoryKeyValueStore::default());
        assert!(store.needs_prompt().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn should_load_saved_key() {
        let store = CredentialStore::new(InMemoryKeyValueStore::default());
        store.save(&ApiKey::new("abc123").unwrap()).unwrap();

        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded.expose(), "abc123");
        assert!(!store.needs_prompt().unwrap());
    }

    #[test]
    fn should_store_key_as_plain_string() {
        let store = CredentialStore::new(InMemoryKeyValueStore::default());
        store.save(&ApiKey::new("abc123").unwrap()).unwrap();

        let raw = store.persistence.read_bytes(API_KEY_KEY).unwrap().unwrap();
        assert_eq!(raw, b"abc123");
    }

    #[test]
    fn should_treat_blank_saved_key_as_absent() {
        let persistence = InMemoryKeyValueStore::default();
        persistence.write_bytes(API_KEY_KEY, b"   ").unwrap();
        let store = CredentialStore::new(persistence);
        assert!(store.needs_prompt().unwrap());
    }

    #[test]
    fn should_treat_invalid_utf8_as_absent() {
        let persistence = InMemoryKeyValueStore::default();
        persistence.write_bytes(API_KEY_KEY, &[0xff, 0xfe]).unwrap();
        let store = CredentialStore::new(persistence);
        assert!(store.load().unwrap().is_none());
    }
}
