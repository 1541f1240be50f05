//! One-shot redirect gate in front of protected views.

use crate::{AccessPolicy, Decision, Status};
use tracing::debug;

/// What a view should do on this render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Show a neutral waiting indicator.
    Waiting,
    /// Show the requested view.
    Render,
    /// Navigate to `to` and show `notice`. Emitted once per attempt.
    Redirect { to: String, notice: String },
    /// A redirect for this attempt was already issued; render nothing.
    Blocked,
}

#[derive(Debug)]
struct Attempt {
    path: String,
    redirected: bool,
}

/// Applies an [`AccessPolicy`] across render passes.
///
/// A redirect fires once per access attempt. Re-rendering the same request
/// yields [`Outcome::Blocked`] until the user navigates again.
#[derive(Debug)]
pub struct Guard {
    policy: AccessPolicy,
    attempt: Option<Attempt>,
}

impl Guard {
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            policy,
            attempt: None,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Start a new access attempt for `path`.
    pub fn navigate(&mut self, path: impl Into<String>) {
        self.attempt = Some(Attempt {
            path: path.into(),
            redirected: false,
        });
    }

    /// Path of the current attempt.
    pub fn path(&self) -> Option<&str> {
        self.attempt.as_ref().map(|a| a.path.as_str())
    }

    /// Evaluate one render pass of `path`.
    ///
    /// A path different from the current attempt's starts a new attempt.
    pub fn render(&mut self, path: &str, status: Status, authenticated: bool) -> Outcome {
        if self.path() != Some(path) {
            self.navigate(path);
        }
        let decision = self.policy.check(status, authenticated, path);
        let Some(attempt) = self.attempt.as_mut() else {
            return Outcome::Blocked;
        };

        match decision {
            Decision::Wait => Outcome::Waiting,
            Decision::Render => {
                attempt.redirected = false;
                Outcome::Render
            }
            Decision::Redirect { .. } if attempt.redirected => Outcome::Blocked,
            Decision::Redirect { to, notice } => {
                attempt.redirected = true;
                debug!(from = %attempt.path, to = %to, "redirecting unauthenticated request");
                Outcome::Redirect { to, notice }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_fires_once_per_attempt() {
        let mut guard = Guard::new(AccessPolicy::default());

        let first = guard.render("/create-event", Status::Resolved, false);
        assert_eq!(
            first,
            Outcome::Redirect {
                to: "/login".to_string(),
                notice: "You must be logged in to access this page".to_string(),
            }
        );

        for _ in 0..3 {
            assert_eq!(
                guard.render("/create-event", Status::Resolved, false),
                Outcome::Blocked
            );
        }
    }

    #[test]
    fn test_new_attempt_redirects_again() {
        let mut guard = Guard::new(AccessPolicy::default());
        assert!(matches!(
            guard.render("/events", Status::Resolved, false),
            Outcome::Redirect { .. }
        ));

        guard.navigate("/events");
        assert!(matches!(
            guard.render("/events", Status::Resolved, false),
            Outcome::Redirect { .. }
        ));
    }

    #[test]
    fn test_other_path_is_a_new_attempt() {
        let mut guard = Guard::new(AccessPolicy::default());
        guard.render("/events", Status::Resolved, false);
        assert!(matches!(
            guard.render("/create-event", Status::Resolved, false),
            Outcome::Redirect { .. }
        ));
    }

    #[test]
    fn test_waiting_then_render() {
        let mut guard = Guard::new(AccessPolicy::default());
        assert_eq!(guard.render("/events", Status::Settling, false), Outcome::Waiting);
        assert_eq!(guard.render("/events", Status::Resolved, true), Outcome::Render);
    }

    #[test]
    fn test_waiting_does_not_consume_redirect() {
        let mut guard = Guard::new(AccessPolicy::default());
        assert_eq!(guard.render("/events", Status::Settling, false), Outcome::Waiting);
        assert!(matches!(
            guard.render("/events", Status::Resolved, false),
            Outcome::Redirect { .. }
        ));
    }

    #[test]
    fn test_login_then_logout_on_same_path() {
        let mut guard = Guard::new(AccessPolicy::default());
        assert_eq!(guard.render("/events", Status::Resolved, true), Outcome::Render);
        assert!(matches!(
            guard.render("/events", Status::Resolved, false),
            Outcome::Redirect { .. }
        ));
        assert_eq!(guard.render("/events", Status::Resolved, false), Outcome::Blocked);
    }
}
