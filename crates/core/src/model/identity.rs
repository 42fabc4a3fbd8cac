use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdentityError {
    #[error("full name cannot be empty")]
    EmptyFullName,

    #[error("display name cannot be empty")]
    EmptyDisplayName,

    #[error("email address is not valid")]
    InvalidEmail,
}

/// The signed-in account as seen by the rest of the app.
///
/// Never carries a password; credentials are only consulted at login time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    full_name: String,
    display_name: String,
    email: String,
}

impl Identity {
    /// Creates a validated identity.
    ///
    /// Names are trimmed. The email is kept exactly as typed apart from
    /// surrounding whitespace, since lookups compare it verbatim.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if a name is blank or the email has no `@`.
    pub fn new(
        full_name: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let full_name = full_name.into().trim().to_owned();
        if full_name.is_empty() {
            return Err(IdentityError::EmptyFullName);
        }
        let display_name = display_name.into().trim().to_owned();
        if display_name.is_empty() {
            return Err(IdentityError::EmptyDisplayName);
        }
        let email = email.into().trim().to_owned();
        if !is_plausible_email(&email) {
            return Err(IdentityError::InvalidEmail);
        }

        Ok(Self {
            full_name,
            display_name,
            email,
        })
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Persisted registration entry.
///
/// `password_hash` is a PHC-format string; the plaintext never reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    #[serde(flatten)]
    identity: Identity,
    password_hash: String,
}

impl CredentialRecord {
    #[must_use]
    pub fn new(identity: Identity, password_hash: String) -> Self {
        Self {
            identity,
            password_hash,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn email(&self) -> &str {
        self.identity.email()
    }

    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_trims_names() {
        let identity = Identity::new("  Ada Lovelace ", " Ada ", "ada@example.com").unwrap();
        assert_eq!(identity.full_name(), "Ada Lovelace");
        assert_eq!(identity.display_name(), "Ada");
        assert_eq!(identity.email(), "ada@example.com");
    }

    #[test]
    fn identity_rejects_blank_fields() {
        assert_eq!(
            Identity::new(" ", "Ada", "ada@example.com").unwrap_err(),
            IdentityError::EmptyFullName
        );
        assert_eq!(
            Identity::new("Ada", "", "ada@example.com").unwrap_err(),
            IdentityError::EmptyDisplayName
        );
        assert_eq!(
            Identity::new("Ada", "Ada", "ada.example.com").unwrap_err(),
            IdentityError::InvalidEmail
        );
        assert_eq!(
            Identity::new("Ada", "Ada", "ada @example.com").unwrap_err(),
            IdentityError::InvalidEmail
        );
    }

    #[test]
    fn identity_snapshot_uses_camel_case_keys() {
        let identity = Identity::new("Demo User", "Demo", "demo@plania.com").unwrap();
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fullName": "Demo User",
                "displayName": "Demo",
                "email": "demo@plania.com"
            })
        );
    }

    #[test]
    fn credential_record_flattens_identity() {
        let identity = Identity::new("Ada Lovelace", "Ada", "ada@example.com").unwrap();
        let record = CredentialRecord::new(identity, "$argon2id$stub".into());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["passwordHash"], "$argon2id$stub");
        assert!(json.get("password").is_none());
    }
}
