//! Access policy configuration and decisions.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Session settle state, as seen by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The saved credential has not been checked yet.
    Settling,
    /// The session knows whether a principal is present.
    Resolved,
}

/// Access policy loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Paths anyone may view.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,

    /// Where unauthenticated requests are sent.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Shown once per rejected access attempt.
    #[serde(default = "default_notice")]
    pub notice: String,
}

fn default_public_paths() -> Vec<String> {
    vec!["/".to_string(), "/login".to_string(), "/register".to_string()]
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_notice() -> String {
    "You must be logged in to access this page".to_string()
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            public_paths: default_public_paths(),
            login_path: default_login_path(),
            notice: default_notice(),
        }
    }
}

/// What to do with a view request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Session still settling: show a waiting indicator.
    Wait,
    /// Show the requested view.
    Render,
    /// Send the user to `to` and show `notice`.
    Redirect { to: String, notice: String },
}

impl AccessPolicy {
    /// Parse policy from TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        let policy: Self = toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    /// The login path must itself be reachable without a principal.
    pub fn validate(&self) -> Result<()> {
        if !self.login_path.starts_with('/') {
            return Err(Error::Invalid(format!(
                "login_path must start with '/': {}",
                self.login_path
            )));
        }
        if !self.is_public(&self.login_path) {
            return Err(Error::Invalid(format!(
                "login_path {} is not a public path",
                self.login_path
            )));
        }
        Ok(())
    }

    /// Whether `path` may be viewed without a principal.
    pub fn is_public(&self, path: &str) -> bool {
        let path = normalize(path);
        self.public_paths.iter().any(|p| normalize(p) == path)
    }

    /// Decide how to handle a request for `path`.
    pub fn check(&self, status: Status, authenticated: bool, path: &str) -> Decision {
        if status == Status::Settling {
            return Decision::Wait;
        }

        if authenticated || self.is_public(path) {
            Decision::Render
        } else {
            Decision::Redirect {
                to: self.login_path.clone(),
                notice: self.notice.clone(),
            }
        }
    }
}

/// Strip query, fragment and trailing slash so `/events/` and `/events?q=x`
/// compare equal to `/events`.
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
