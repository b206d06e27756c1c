use escluster_core::{CredentialStore, CredentialStoreError, Credentials};
use serde::{Deserialize, Serialize};

/// Account name used for every entry; the derived key is the service.
const ACCOUNT: &str = "cluster-credentials";

/// What actually sits in the OS secret store for one key.
#[derive(Serialize, Deserialize)]
struct StoredSecret {
    username: String,
    secret: String,
}

/// Credential store backed by the OS keyring (Windows Credential Manager,
/// macOS Keychain, Secret Service on Linux).
#[derive(Debug, Default, Clone)]
pub struct KeyringCredentialStore;

impl KeyringCredentialStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, CredentialStoreError> {
        keyring::Entry::new(key, ACCOUNT).map_err(unavailable)
    }
}

fn unavailable(err: keyring::Error) -> CredentialStoreError {
    CredentialStoreError::Unavailable(err.to_string())
}

fn decode(key: &str, raw: &str) -> Result<Credentials, CredentialStoreError> {
    let stored: StoredSecret = serde_json::from_str(raw)
        .map_err(|e| CredentialStoreError::Corrupt(format!("{key}: {e}")))?;
    Ok(Credentials::new(stored.username, stored.secret))
}

fn encode(credentials: &Credentials) -> Result<String, CredentialStoreError> {
    let stored = StoredSecret {
        username: credentials.username.clone(),
        secret: credentials.secret.clone(),
    };
    serde_json::to_string(&stored).map_err(|e| CredentialStoreError::Unavailable(e.to_string()))
}

impl CredentialStore for KeyringCredentialStore {
    fn get(&self, key: &str) -> Result<Option<Credentials>, CredentialStoreError> {
        let raw = match self.entry(key)?.get_password() {
            Ok(raw) => raw,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(unavailable(e)),
        };
        decode(key, &raw).map(Some)
    }

    fn put(&self, key: &str, credentials: &Credentials) -> Result<(), CredentialStoreError> {
        let raw = encode(credentials)?;
        self.entry(key)?.set_password(&raw).map_err(unavailable)
    }

    fn delete(&self, key: &str) -> Result<(), CredentialStoreError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(unavailable(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_value_round_trips_through_json() {
        let credentials = Credentials::new("admin", "s3cr\"3t");
        let raw = encode(&credentials).unwrap();
        assert_eq!(decode("k", &raw).unwrap(), credentials);
    }

    #[test]
    fn non_json_stored_value_is_corrupt() {
        let err = decode("escluster.ClusterRegistry/prod", "plain-password").unwrap_err();
        match err {
            CredentialStoreError::Corrupt(msg) => {
                assert!(msg.starts_with("escluster.ClusterRegistry/prod: "))
            }
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }

    #[test]
    fn json_missing_the_secret_is_corrupt() {
        let err = decode("k", r#"{"username":"admin"}"#).unwrap_err();
        assert!(matches!(err, CredentialStoreError::Corrupt(_)));
    }
}
