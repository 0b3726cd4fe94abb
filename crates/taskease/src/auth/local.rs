//! Local account registry with an optional file-backed session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::watch;
use uuid::Uuid;

use super::traits::AuthClient;
use super::{validate_email, validate_password};
use crate::entities::Identity;
use crate::errors::{TaskEaseError, TaskEaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Account {
    uid: String,
    email: String,
    /// PHC string: algorithm, parameters, salt and hash
    password_hash: String,
}

impl Account {
    fn identity(&self) -> Identity {
        Identity::new(&self.uid, &self.email)
    }

    fn verify(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

/// Accounts keyed by lowercased email, plus the signed-in identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AuthState {
    #[serde(default)]
    accounts: BTreeMap<String, Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session: Option<Identity>,
}

fn hash_password(password: &str) -> TaskEaseResult<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(|e| {
        TaskEaseError::Internal {
            reason: format!("Failed to encode salt: {e}"),
        }
    })?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TaskEaseError::Internal {
            reason: format!("Failed to hash password: {e}"),
        })
}

/// Identity service backed by a local account registry.
///
/// With a project path, accounts and the current session are kept in
/// `.taskease/accounts.json` so a session survives restarts.
pub struct LocalAuth {
    state: Mutex<AuthState>,
    write_lock: tokio::sync::Mutex<()>,
    session_tx: watch::Sender<Option<Identity>>,
    accounts_file: Option<PathBuf>,
}

impl LocalAuth {
    /// Create an in-memory registry with nobody signed in
    pub fn in_memory() -> Self {
        Self::from_state(AuthState::default(), None)
    }

    /// Open the registry stored under `project_path/.taskease/`
    pub async fn open(project_path: impl AsRef<Path>) -> TaskEaseResult<Self> {
        let accounts_file = project_path
            .as_ref()
            .join(".taskease")
            .join("accounts.json");
        let state = match fs::read_to_string(&accounts_file).await {
            Ok(content) => serde_json::from_str::<AuthState>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AuthState::default(),
            Err(e) => {
                return Err(TaskEaseError::FileReadError {
                    path: accounts_file.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };
        Ok(Self::from_state(state, Some(accounts_file)))
    }

    fn from_state(state: AuthState, accounts_file: Option<PathBuf>) -> Self {
        let (session_tx, _) = watch::channel(state.session.clone());
        Self {
            state: Mutex::new(state),
            write_lock: tokio::sync::Mutex::new(()),
            session_tx,
            accounts_file,
        }
    }

    fn snapshot(&self) -> AuthState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn persist(&self, state: &AuthState) -> TaskEaseResult<()> {
        let Some(path) = &self.accounts_file else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(state)?;
        fs::write(path, content)
            .await
            .map_err(|e| TaskEaseError::FileWriteError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Persist `next`, then make it current and announce the session.
    async fn commit(&self, next: AuthState) -> TaskEaseResult<()> {
        self.persist(&next).await?;
        let session = next.session.clone();
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
        self.session_tx.send_replace(session);
        Ok(())
    }
}

impl Default for LocalAuth {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[async_trait]
impl AuthClient for LocalAuth {
    async fn create_account(&self, email: &str, password: &str) -> TaskEaseResult<Identity> {
        validate_email(email)?;
        validate_password(password)?;

        let _guard = self.write_lock.lock().await;
        let mut next = self.snapshot();
        let key = email.to_lowercase();
        if next.accounts.contains_key(&key) {
            return Err(TaskEaseError::EmailAlreadyInUse);
        }

        let account = Account {
            uid: Uuid::new_v4().simple().to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };
        let identity = account.identity();
        next.accounts.insert(key, account);
        next.session = Some(identity.clone());
        self.commit(next).await?;

        tracing::info!(uid = %identity.uid, "Account created");
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> TaskEaseResult<Identity> {
        let _guard = self.write_lock.lock().await;
        let mut next = self.snapshot();
        let identity = next
            .accounts
            .get(&email.to_lowercase())
            .filter(|account| account.verify(password))
            .map(Account::identity)
            .ok_or(TaskEaseError::InvalidCredentials)?;

        next.session = Some(identity.clone());
        self.commit(next).await?;

        tracing::info!(uid = %identity.uid, "Signed in");
        Ok(identity)
    }

    async fn sign_out(&self) -> TaskEaseResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut next = self.snapshot();
        if let Some(identity) = next.session.take() {
            tracing::info!(uid = %identity.uid, "Signed out");
        }
        self.commit(next).await
    }

    fn current(&self) -> Option<Identity> {
        self.session_tx.borrow().clone()
    }

    fn session(&self) -> watch::Receiver<Option<Identity>> {
        self.session_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_account_signs_in() {
        let auth = LocalAuth::in_memory();
        let mut session = auth.session();
        assert!(session.borrow().is_none());

        let identity = auth
            .create_account("ada@example.com", "secret")
            .await
            .unwrap();

        session.changed().await.unwrap();
        assert_eq!(session.borrow().as_ref(), Some(&identity));
        assert_eq!(auth.current(), Some(identity));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let auth = LocalAuth::in_memory();
        auth.create_account("ada@example.com", "secret")
            .await
            .unwrap();
        let err = auth
            .create_account("ADA@example.com", "another")
            .await
            .unwrap_err();
        assert!(matches!(err, TaskEaseError::EmailAlreadyInUse));
    }

    #[tokio::test]
    async fn test_validation_runs_before_registration() {
        let auth = LocalAuth::in_memory();
        assert!(matches!(
            auth.create_account("nope", "secret").await,
            Err(TaskEaseError::InvalidEmail { .. })
        ));
        assert!(matches!(
            auth.create_account("ada@example.com", "123").await,
            Err(TaskEaseError::WeakPassword { .. })
        ));
        assert!(auth.current().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let auth = LocalAuth::in_memory();
        let created = auth
            .create_account("ada@example.com", "secret")
            .await
            .unwrap();
        auth.sign_out().await.unwrap();
        assert!(auth.current().is_none());

        assert!(matches!(
            auth.sign_in("ada@example.com", "wrong!").await,
            Err(TaskEaseError::InvalidCredentials)
        ));
        let signed_in = auth.sign_in("ada@example.com", "secret").await.unwrap();
        assert_eq!(signed_in, created);
    }

    #[tokio::test]
    async fn test_password_is_stored_as_argon2_hash() {
        let auth = LocalAuth::in_memory();
        auth.create_account("ada@example.com", "secret")
            .await
            .unwrap();

        let state = auth.snapshot();
        let account = &state.accounts["ada@example.com"];
        assert!(account.password_hash.starts_with("$argon2"));
        assert!(!account.password_hash.contains("secret"));
        assert!(account.verify("secret"));
        assert!(!account.verify("Secret"));
    }

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let identity = {
            let auth = LocalAuth::open(temp_dir.path()).await.unwrap();
            auth.create_account("ada@example.com", "secret")
                .await
                .unwrap()
        };

        let reopened = LocalAuth::open(temp_dir.path()).await.unwrap();
        assert_eq!(reopened.current(), Some(identity));
    }
}
