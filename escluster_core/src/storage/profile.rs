use std::fmt;

/// Username/secret pair used to authenticate against a cluster.
///
/// Not `Serialize`; credentials only leave the process through a
/// [`CredentialStore`](crate::CredentialStore).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Both halves must be non-empty for the pair to be usable.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// One configured cluster connection.
///
/// `label` is the registry key; renaming a profile means removing the old
/// label and putting the profile again under the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub label: String,
    pub url: String,
    pub credentials: Option<Credentials>,
}

impl Profile {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_never_contains_the_secret() {
        let profile = Profile::new("prod", "https://es-prod:9200")
            .with_credentials(Credentials::new("admin", "s3cr3t"));
        let rendered = format!("{profile:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("s3cr3t"));
    }

    #[test]
    fn incomplete_credentials_are_detected() {
        assert!(Credentials::new("admin", "pw").is_complete());
        assert!(!Credentials::new("", "pw").is_complete());
        assert!(!Credentials::new("admin", "").is_complete());
    }
}
