use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use super::journal::Journal;
use crate::{
    animator::{Completion, TransitionAnimator},
    navigator::Listener,
    screen::ScreenHandle,
};

/// A listener that journals every event instead of touching views.
///
/// Events are recorded as `pushed NAME`, `popped NAME` and
/// `DIRECTION NAME animator=yes|no`. In auto mode completions fire as soon as
/// they arrive; in manual mode they are held until
/// [`RecordingListener::complete_next`].
pub struct RecordingListener {
    /// Event log.
    journal: Journal,
    /// Hold completions instead of firing them.
    manual: bool,
    /// Held completions, oldest first.
    pending: RefCell<VecDeque<Completion>>,
}

impl RecordingListener {
    /// A listener that completes every transition immediately.
    pub fn auto(journal: &Journal) -> Rc<Self> {
        Rc::new(Self {
            journal: journal.clone(),
            manual: false,
            pending: RefCell::new(VecDeque::new()),
        })
    }

    /// A listener that holds completions.
    pub fn manual(journal: &Journal) -> Rc<Self> {
        Rc::new(Self {
            journal: journal.clone(),
            manual: true,
            pending: RefCell::new(VecDeque::new()),
        })
    }

    /// Fire the oldest held completion. Returns false if none was held.
    pub fn complete_next(&self) -> bool {
        let next = self.pending.borrow_mut().pop_front();
        match next {
            Some(done) => {
                done.complete();
                true
            }
            None => false,
        }
    }

    /// Number of held completions.
    pub fn in_flight(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Record a transition and settle or hold its completion.
    fn transition<C>(
        &self,
        direction: &str,
        screen: &ScreenHandle<C>,
        animator: Option<&Rc<dyn TransitionAnimator>>,
        done: Completion,
    ) {
        let animator = if animator.is_some() { "yes" } else { "no" };
        self.journal
            .record(format!("{direction} {} animator={animator}", screen.name()));
        if self.manual {
            self.pending.borrow_mut().push_back(done);
        } else {
            done.complete();
        }
    }
}

impl<C> Listener<C> for RecordingListener {
    fn screen_pushed(&self, screen: &ScreenHandle<C>) {
        self.journal.record(format!("pushed {}", screen.name()));
    }

    fn screen_popped(&self, screen: &ScreenHandle<C>) {
        self.journal.record(format!("popped {}", screen.name()));
    }

    fn forward(
        &self,
        screen: &ScreenHandle<C>,
        animator: Option<Rc<dyn TransitionAnimator>>,
        done: Completion,
    ) {
        self.transition("forward", screen, animator.as_ref(), done);
    }

    fn backward(
        &self,
        screen: &ScreenHandle<C>,
        animator: Option<Rc<dyn TransitionAnimator>>,
        done: Completion,
    ) {
        self.transition("backward", screen, animator.as_ref(), done);
    }

    fn replace(
        &self,
        screen: &ScreenHandle<C>,
        animator: Option<Rc<dyn TransitionAnimator>>,
        done: Completion,
    ) {
        self.transition("replace", screen, animator.as_ref(), done);
    }
}
