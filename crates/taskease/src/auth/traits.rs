//! Auth client trait definition.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::entities::Identity;
use crate::errors::TaskEaseResult;

/// Identity service: email/password accounts plus a session stream.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Register a new account and sign it in
    async fn create_account(&self, email: &str, password: &str) -> TaskEaseResult<Identity>;

    /// Sign in to an existing account
    async fn sign_in(&self, email: &str, password: &str) -> TaskEaseResult<Identity>;

    /// End the current session, if any
    async fn sign_out(&self) -> TaskEaseResult<()>;

    /// The signed-in identity right now
    fn current(&self) -> Option<Identity>;

    /// Session-change notifications; the receiver always holds the latest value.
    fn session(&self) -> watch::Receiver<Option<Identity>>;
}
