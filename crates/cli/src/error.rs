//! CLI error types.

use crate::config::ConfigError;
use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested view needs a logged-in user.
    ///
    /// The notice has already been shown; `to` is where the user was sent.
    #[error("redirected to {to}. Run 'campus login' first")]
    LoginRequired { to: String },

    /// A redirect was already issued for this request.
    #[error("access to {path} is blocked")]
    Blocked { path: String },

    /// No event has the given id.
    #[error("Event not found: {id}")]
    EventNotFound { id: String },

    /// A form field failed validation.
    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// An edit was requested with nothing to change.
    #[error("nothing to update: pass at least one field")]
    EmptyPatch,

    /// Configuration is invalid or missing required fields.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An error occurred in the runtime layer.
    #[error(transparent)]
    Runtime(#[from] runtime::Error),

    /// An error occurred in the storage layer.
    #[error(transparent)]
    Storage(#[from] storage::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
