//! Presenters bound to container views.
//!
//! A container view that shows list items or other reusable content owns a
//! [`PresenterSlot`]. The slot holds at most one presenter and keeps it bound
//! to the container while the container is attached to a window.

use std::{fmt, mem};

use tracing::trace;

/// Drives a container view of type `V` with dependencies from component `C`.
pub trait Presenter<V, C> {
    /// Take control of `container`.
    fn acquire(&mut self, container: V, component: &C);

    /// Let go of the container acquired last.
    fn release_container(&mut self);
}

/// Holds an optional presenter for a container and tracks whether the
/// container is attached.
pub struct PresenterSlot<P, V, C> {
    /// The bound presenter.
    presenter: Option<P>,
    /// The container and component, while attached.
    attached: Option<(V, C)>,
}

impl<P, V, C> Default for PresenterSlot<P, V, C> {
    fn default() -> Self {
        Self {
            presenter: None,
            attached: None,
        }
    }
}

impl<P: fmt::Debug, V, C> fmt::Debug for PresenterSlot<P, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenterSlot")
            .field("presenter", &self.presenter)
            .field("attached", &self.attached.is_some())
            .finish()
    }
}

impl<P, V, C> PresenterSlot<P, V, C>
where
    P: Presenter<V, C>,
    V: Clone,
{
    /// An empty, detached slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound presenter.
    pub fn presenter(&self) -> Option<&P> {
        self.presenter.as_ref()
    }

    /// True while the container is attached.
    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Replace the presenter. The previous presenter releases the container;
    /// the new one acquires it immediately if the container is attached.
    /// Returns the previous presenter.
    pub fn set_presenter(&mut self, presenter: Option<P>) -> Option<P> {
        let mut previous = mem::replace(&mut self.presenter, presenter);
        if let Some(old) = previous.as_mut() {
            old.release_container();
        }
        if let (Some(new), Some((container, component))) =
            (self.presenter.as_mut(), self.attached.as_ref())
        {
            trace!("presenter acquires attached container");
            new.acquire(container.clone(), component);
        }
        previous
    }

    /// The container was attached to a window.
    pub fn attached(&mut self, container: V, component: C) {
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.acquire(container.clone(), &component);
        }
        self.attached = Some((container, component));
    }

    /// The container was detached from its window.
    pub fn detached(&mut self) {
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.release_container();
        }
        self.attached = None;
    }
}
