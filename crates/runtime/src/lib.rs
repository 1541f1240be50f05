//! Campus events runtime: the event catalog and the user session.
//!
//! This crate holds the state every view works against: the
//! [`EventStore`] owning the canonical event collection, and the
//! [`Session`] tracking who is logged in.
//!
//! # Overview
//!
//! - **EventStore**: In-memory collection synchronized to a
//!   [`storage::DurableStore`] on every mutation. Seeds sample events the
//!   first time it finds no saved collection.
//! - **Session**: Two-state machine (`Settling` to `Resolved`) restoring the
//!   saved principal once at startup, then handling login and logout.
//! - **Authenticator**: Turns credentials into a principal.
//!
//! Neither type is global. Build one of each over a shared backend and
//! pass them to whatever needs them.
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use runtime::{Credentials, EventStore, Session};
//! use storage::SqliteStore;
//!
//! # fn example() -> runtime::Result<()> {
//! let backend = Rc::new(SqliteStore::open("campus.db")?);
//!
//! let mut session = Session::new(Rc::clone(&backend));
//! session.settle();
//! if !session.is_authenticated() {
//!     session.login(&Credentials::new("alice@example.com", "secret1"))?;
//! }
//!
//! let mut events = EventStore::new(backend);
//! events.initialize()?;
//! for event in events.search_events("sports") {
//!     println!("{}: {}", event.id, event.title);
//! }
//! # Ok(())
//! # }
//! ```

mod auth;
mod catalog;
mod error;
mod seed;
mod session;

pub use auth::{Authenticator, Credentials, LocalAuthenticator, MIN_PASSWORD_LEN};
pub use catalog::EventStore;
pub use error::{Error, Result};
pub use seed::{SEED_CREATOR, sample_events};
pub use session::{Session, wait_resolved};

pub use policy::Status;

#[cfg(test)]
mod tests {
    use super::*;
    use policy::{AccessPolicy, Guard, Outcome};
    use std::rc::Rc;
    use storage::{DurableStore, Principal, SqliteStore};

    #[test]
    fn test_saved_principal_opens_protected_view() {
        let backend = Rc::new(SqliteStore::in_memory().unwrap());
        backend.save_principal(&Principal::new("u1", "Alice")).unwrap();

        let mut session = Session::new(Rc::clone(&backend));
        let mut guard = Guard::new(AccessPolicy::default());

        assert_eq!(
            guard.render("/events", session.status(), session.is_authenticated()),
            Outcome::Waiting
        );

        session.settle();
        assert_eq!(session.status(), Status::Resolved);
        assert_eq!(session.principal().map(|p| p.name.as_str()), Some("Alice"));
        assert_eq!(
            guard.render("/events", session.status(), session.is_authenticated()),
            Outcome::Render
        );
    }

    #[test]
    fn test_anonymous_create_redirects_once() {
        let mut session = Session::new(SqliteStore::in_memory().unwrap());
        session.settle();
        let mut guard = Guard::new(AccessPolicy::default());

        let outcomes: Vec<_> = (0..4)
            .map(|_| guard.render("/create-event", session.status(), session.is_authenticated()))
            .collect();

        let redirects = outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Redirect { to, .. } if to == "/login"))
            .count();
        assert_eq!(redirects, 1);
        assert!(outcomes[1..].iter().all(|o| *o == Outcome::Blocked));
    }

    #[test]
    fn test_created_event_belongs_to_logged_in_user() {
        let backend = Rc::new(SqliteStore::in_memory().unwrap());
        let mut session = Session::new(Rc::clone(&backend));
        session.settle();
        let creator = session
            .login(&Credentials::new("alice@example.com", "secret1"))
            .unwrap()
            .id
            .clone();

        let mut events = EventStore::new(Rc::clone(&backend));
        events.initialize().unwrap();
        let mut draft = events.events()[0].draft();
        draft.title = "Odoo x charusat, round two".to_string();
        let created = events.add_event(draft, &creator).unwrap();

        let reopened = backend.load_events().unwrap();
        assert_eq!(reopened.len(), 4);
        assert_eq!(reopened[3].created_by, creator);
        assert_eq!(reopened[3], created);
    }
}
