//! The event catalog.

use crate::Result;
use crate::seed::sample_events;
use storage::{DurableStore, Event, EventId, EventPatch, NewEvent, PrincipalId};
use tracing::{debug, info, warn};

/// Authoritative in-memory collection of events.
///
/// Every mutation writes the full collection through the backing
/// [`DurableStore`] before it becomes visible, so whatever a caller reads
/// after a successful call is already durable.
pub struct EventStore<S> {
    backend: S,
    events: Vec<Event>,
    loading: bool,
}

impl<S: DurableStore> EventStore<S> {
    /// Create a store over `backend`. Nothing is read until [`initialize`](Self::initialize).
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            events: Vec::new(),
            loading: true,
        }
    }

    /// Load the saved collection, or seed the sample events if there is none.
    ///
    /// Runs once; later calls do nothing.
    pub fn initialize(&mut self) -> Result<()> {
        if !self.loading {
            return Ok(());
        }

        match self.backend.load_events() {
            Some(events) => {
                info!(count = events.len(), "loaded events");
                self.events = events;
            }
            None => {
                let seed = sample_events();
                if let Err(e) = self.backend.save_events(&seed) {
                    warn!(error = %e, "could not persist sample events");
                }
                info!(count = seed.len(), "seeded sample events");
                self.events = seed;
            }
        }

        self.loading = false;
        Ok(())
    }

    /// True until the collection has been loaded or seeded.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Read-only view of the collection in insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Append a new event created by `creator` and return the stored record.
    pub fn add_event(&mut self, draft: NewEvent, creator: &PrincipalId) -> Result<Event> {
        self.initialize()?;

        let event = Event::from_draft(self.fresh_id(), draft, creator.clone());
        let mut next = self.events.clone();
        next.push(event.clone());
        self.commit(next)?;

        info!(id = %event.id, created_by = %event.created_by, "event added");
        Ok(event)
    }

    /// Merge `patch` into the event with `id`.
    ///
    /// Returns `false` without touching anything when no such event exists.
    pub fn update_event(&mut self, id: &EventId, patch: EventPatch) -> Result<bool> {
        self.initialize()?;

        let Some(index) = self.position(id) else {
            debug!(%id, "update of unknown event ignored");
            return Ok(false);
        };

        let mut next = self.events.clone();
        patch.apply(&mut next[index]);
        self.commit(next)?;

        info!(%id, "event updated");
        Ok(true)
    }

    /// Remove the event with `id`.
    ///
    /// Returns `false` without touching anything when no such event exists.
    pub fn delete_event(&mut self, id: &EventId) -> Result<bool> {
        self.initialize()?;

        if self.position(id).is_none() {
            debug!(%id, "delete of unknown event ignored");
            return Ok(false);
        }

        let next: Vec<Event> = self.events.iter().filter(|e| &e.id != id).cloned().collect();
        self.commit(next)?;

        info!(%id, "event deleted");
        Ok(true)
    }

    pub fn get_event_by_id(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// Events whose title, type, location or description contain `query`,
    /// ignoring case. A blank query returns everything.
    pub fn search_events(&self, query: &str) -> Vec<&Event> {
        if query.is_empty() {
            return self.events.iter().collect();
        }

        let needle = query.to_lowercase();
        self.events.iter().filter(|e| matches(e, &needle)).collect()
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|e| &e.id == id)
    }

    fn fresh_id(&self) -> EventId {
        loop {
            let id = EventId::random();
            if self.position(&id).is_none() {
                return id;
            }
            warn!(%id, "generated event id collided, retrying");
        }
    }

    fn commit(&mut self, next: Vec<Event>) -> Result<()> {
        self.backend.save_events(&next)?;
        self.events = next;
        Ok(())
    }
}

fn matches(event: &Event, needle: &str) -> bool {
    [
        event.title.as_str(),
        event.kind.as_str(),
        event.location.as_str(),
        event.description.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}
