use std::{cell::RefCell, collections::HashMap, fmt, mem, rc::Rc};

use super::fakes::FakeView;

/// Recorded state shared by every clone of a journal.
#[derive(Default)]
struct Entries {
    /// Events in the order they happened.
    events: Vec<String>,
    /// The most recent view built for each screen name.
    views: HashMap<String, Rc<FakeView>>,
}

/// A shared, append-only log of events. Clones write to the same log.
#[derive(Clone, Default)]
pub struct Journal {
    /// Shared log.
    inner: Rc<RefCell<Entries>>,
}

impl Journal {
    /// Construct an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn record(&self, event: impl Into<String>) {
        self.inner.borrow_mut().events.push(event.into());
    }

    /// All events so far.
    pub fn entries(&self) -> Vec<String> {
        self.inner.borrow().events.clone()
    }

    /// Return all events and clear the log.
    pub fn take(&self) -> Vec<String> {
        mem::take(&mut self.inner.borrow_mut().events)
    }

    /// Clear the log.
    pub fn clear(&self) {
        self.inner.borrow_mut().events.clear();
    }

    /// The most recent event.
    pub fn last(&self) -> Option<String> {
        self.inner.borrow().events.last().cloned()
    }

    /// Number of events starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.inner
            .borrow()
            .events
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }

    /// Remember the view most recently built for `screen`.
    pub fn record_view(&self, screen: &str, view: Rc<FakeView>) {
        self.inner
            .borrow_mut()
            .views
            .insert(screen.to_string(), view);
    }

    /// The view most recently built for `screen`.
    pub fn view(&self, screen: &str) -> Option<Rc<FakeView>> {
        self.inner.borrow().views.get(screen).cloned()
    }
}

impl fmt::Debug for Journal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.borrow().events.iter()).finish()
    }
}
