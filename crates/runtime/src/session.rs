//! Session management.

use crate::auth::{Authenticator, Credentials, LocalAuthenticator};
use crate::{Error, Result};
use policy::Status;
use storage::{DurableStore, Principal};
use tokio::sync::watch;
use tracing::info;

/// The current principal and whether it is known yet.
///
/// Starts [`Status::Settling`]; [`settle`](Self::settle) checks the saved
/// principal once and moves to [`Status::Resolved`] for the rest of the
/// session's life.
pub struct Session<S, A = LocalAuthenticator> {
    backend: S,
    authenticator: A,
    principal: Option<Principal>,
    status: watch::Sender<Status>,
}

impl<S: DurableStore> Session<S> {
    /// Create a settling session using the [`LocalAuthenticator`].
    pub fn new(backend: S) -> Self {
        Self::with_authenticator(backend, LocalAuthenticator)
    }
}

impl<S: DurableStore, A: Authenticator> Session<S, A> {
    pub fn with_authenticator(backend: S, authenticator: A) -> Self {
        let (status, _) = watch::channel(Status::Settling);
        Self {
            backend,
            authenticator,
            principal: None,
            status,
        }
    }

    pub fn status(&self) -> Status {
        *self.status.borrow()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Watch the settle transition.
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    /// Restore the saved principal, if any, and resolve the session.
    pub fn settle(&mut self) {
        if self.status() == Status::Resolved {
            return;
        }

        self.principal = self.backend.load_principal();
        match &self.principal {
            Some(p) => info!(principal = %p.id, "restored saved session"),
            None => info!("no saved session"),
        }
        self.status.send_replace(Status::Resolved);
    }

    /// Authenticate and persist the resulting principal.
    pub fn login(&mut self, credentials: &Credentials) -> Result<&Principal> {
        self.require_resolved("login")?;

        let principal = self.authenticator.authenticate(credentials)?;
        self.backend.save_principal(&principal)?;
        info!(principal = %principal.id, "logged in");

        Ok(self.principal.insert(principal))
    }

    /// Forget the current principal.
    pub fn logout(&mut self) -> Result<()> {
        self.require_resolved("logout")?;

        self.backend.clear_principal()?;
        if let Some(p) = self.principal.take() {
            info!(principal = %p.id, "logged out");
        }
        Ok(())
    }

    fn require_resolved(&self, action: &str) -> Result<()> {
        match self.status() {
            Status::Resolved => Ok(()),
            Status::Settling => Err(Error::InvalidState(format!(
                "cannot {action} while the session is settling"
            ))),
        }
    }
}

/// Suspend until the watched session has resolved.
pub async fn wait_resolved(status: &mut watch::Receiver<Status>) -> Result<()> {
    status
        .wait_for(|s| *s == Status::Resolved)
        .await
        .map(|_| ())
        .map_err(|_| Error::InvalidState("session dropped before resolving".to_string()))
}
