use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

use crate::error::CredentialError;

/// API identifier and secret, held for the lifetime of one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    identifier: String,
    secret: String,
}

impl Credentials {
    pub fn new(identifier: &str, secret: &str) -> Result<Self, CredentialError> {
        if identifier.is_empty() {
            return Err(CredentialError::EmptyIdentifier);
        }
        if secret.is_empty() {
            return Err(CredentialError::EmptySecret);
        }
        // The first ':' separates the pair, so only the secret may contain one.
        if identifier.contains(':') {
            return Err(CredentialError::ColonInIdentifier);
        }

        Ok(Self {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        let pair = format!("{}:{}", self.identifier, self.secret);
        format!("Basic {}", STANDARD.encode(pair.as_bytes()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}
