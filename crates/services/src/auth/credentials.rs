//! Credential checks for the local (mock) account store.
//!
//! Everything here stands in for a real auth backend: the demo account is
//! compiled in, and registered accounts live in a device-local snapshot.
//! Registered passwords are stored as argon2 hashes only.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use planner_core::model::{CredentialRecord, Identity};

use crate::error::AuthError;

/// Built-in demo account, advertised on the welcome screen.
pub const DEMO_EMAIL: &str = "demo@plania.com";
pub const DEMO_PASSWORD: &str = "demo123";
const DEMO_FULL_NAME: &str = "Demo User";
const DEMO_DISPLAY_NAME: &str = "Demo";

/// Identity of the demo account when `email`/`password` match it.
pub(crate) fn demo_login(email: &str, password: &str) -> Option<Identity> {
    if email != DEMO_EMAIL || password != DEMO_PASSWORD {
        return None;
    }
    Identity::new(DEMO_FULL_NAME, DEMO_DISPLAY_NAME, DEMO_EMAIL).ok()
}

pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// True when `password` matches the stored hash. Unparseable hashes never match.
pub(crate) fn verify_password(record: &CredentialRecord, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(record.password_hash()) else {
        tracing::warn!(email = record.email(), "stored credential has an unreadable hash");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_login_requires_exact_pair() {
        let identity = demo_login(DEMO_EMAIL, DEMO_PASSWORD).unwrap();
        assert_eq!(identity.display_name(), "Demo");
        assert!(demo_login(DEMO_EMAIL, "demo1234").is_none());
        assert!(demo_login("Demo@plania.com", DEMO_PASSWORD).is_none());
    }

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("s3cret!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("s3cret!"));

        let identity = Identity::new("Ada Lovelace", "Ada", "ada@example.com").unwrap();
        let record = CredentialRecord::new(identity, hash);
        assert!(verify_password(&record, "s3cret!"));
        assert!(!verify_password(&record, "S3cret!"));
    }

    #[test]
    fn garbage_hash_never_matches() {
        let identity = Identity::new("Ada Lovelace", "Ada", "ada@example.com").unwrap();
        let record = CredentialRecord::new(identity, "plaintext".into());
        assert!(!verify_password(&record, "plaintext"));
    }
}
