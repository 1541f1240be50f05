//! Access policy for protected views.
//!
//! Core principle: **No protected view renders without a principal.**

mod error;
mod guard;
mod policy;

pub use error::{Error, Result};
pub use guard::{Guard, Outcome};
pub use policy::{AccessPolicy, Decision, Status};
