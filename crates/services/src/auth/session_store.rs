use planner_core::model::{CredentialRecord, Identity};
use storage::{SnapshotKey, Snapshots};

use super::credentials::{demo_login, hash_password, verify_password};
use crate::error::AuthError;
use crate::persistence::{Durability, Saved};

/// Form input for creating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    pub full_name: String,
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Holds the signed-in identity and the device's registered accounts.
///
/// Both are mirrored to snapshots (`plania_user`, `plania_registered_users`)
/// after every change.
pub struct SessionStore {
    snapshots: Snapshots,
    current: Option<Identity>,
    registered: Vec<CredentialRecord>,
}

impl SessionStore {
    #[must_use]
    pub fn new(snapshots: Snapshots) -> Self {
        Self {
            snapshots,
            current: None,
            registered: Vec::new(),
        }
    }

    /// Restore the session left by a previous run.
    ///
    /// Missing or unreadable snapshots leave the store signed out.
    pub async fn hydrate(&mut self) {
        self.current = match self.snapshots.load::<Identity>(&SnapshotKey::user()).await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable session snapshot");
                None
            }
        };
        self.refresh_registered().await;
        tracing::debug!(
            signed_in = self.current.is_some(),
            registered = self.registered.len(),
            "session hydrated"
        );
    }

    #[must_use]
    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// The signed-in identity, or `AuthError::NotSignedIn`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` when nobody is signed in.
    pub fn require(&self) -> Result<&Identity, AuthError> {
        self.current.as_ref().ok_or(AuthError::NotSignedIn)
    }

    /// Sign in with the demo account or a registered account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when no account matches.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Saved<Identity>, AuthError> {
        let identity = match demo_login(email, password) {
            Some(identity) => identity,
            None => {
                self.refresh_registered().await;
                self.registered
                    .iter()
                    .find(|record| record.email() == email && verify_password(record, password))
                    .map(|record| record.identity().clone())
                    .ok_or(AuthError::InvalidCredentials)?
            }
        };

        let durability = self.install(identity.clone()).await;
        tracing::info!(email = identity.email(), "signed in");
        Ok(Saved::new(identity, durability))
    }

    /// Register a new account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if the email is already registered,
    /// `AuthError::Identity`/`AuthError::EmptyPassword` for invalid input, or
    /// `AuthError::Hashing` if the password cannot be hashed.
    pub async fn signup(&mut self, request: SignupRequest) -> Result<Saved<Identity>, AuthError> {
        let identity = Identity::new(request.full_name, request.display_name, request.email)?;
        if request.password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        self.refresh_registered().await;
        let taken = self
            .registered
            .iter()
            .any(|record| record.email() == identity.email());
        if taken {
            return Err(AuthError::EmailTaken);
        }

        let hash = hash_password(&request.password)?;
        self.registered
            .push(CredentialRecord::new(identity.clone(), hash));
        let stored = self
            .snapshots
            .save(&SnapshotKey::registered_users(), &self.registered)
            .await;
        let durability = Durability::from_write(stored, "registered users")
            .and(self.install(identity.clone()).await);

        tracing::info!(email = identity.email(), "account registered");
        Ok(Saved::new(identity, durability))
    }

    /// Sign out and forget the persisted session.
    pub async fn logout(&mut self) -> Durability {
        if let Some(identity) = self.current.take() {
            tracing::info!(email = identity.email(), "signed out");
        }
        let cleared = self.snapshots.clear(&SnapshotKey::user()).await;
        Durability::from_write(cleared, "session")
    }

    async fn install(&mut self, identity: Identity) -> Durability {
        let stored = self.snapshots.save(&SnapshotKey::user(), &identity).await;
        self.current = Some(identity);
        Durability::from_write(stored, "session")
    }

    /// Re-read registered accounts so another process's signups are visible.
    /// Keeps the in-memory list if the snapshot cannot be read.
    async fn refresh_registered(&mut self) {
        match self
            .snapshots
            .load::<Vec<CredentialRecord>>(&SnapshotKey::registered_users())
            .await
        {
            Ok(Some(records)) => self.registered = records,
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable registered users snapshot");
            }
        }
    }
}
