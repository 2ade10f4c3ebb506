use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};

use crate::{
    animator::{Animation, Completion, TransitionAnimator},
    view::{Container, ViewRef},
};

/// An animator that swaps views immediately but holds each completion until
/// the test fires it, standing in for an animation still running. Either
/// direction can be set to decline.
#[derive(Debug, Default)]
pub struct ManualAnimator {
    /// Decline forward and replace transitions.
    decline_forward: bool,
    /// Decline backward transitions.
    decline_backward: bool,
    /// Number of times asked to animate, declined or not.
    calls: Cell<usize>,
    /// Completions not yet fired, oldest first.
    pending: RefCell<VecDeque<Completion>>,
}

impl ManualAnimator {
    /// An animator that handles everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decline forward and replace transitions.
    pub fn decline_forward(mut self) -> Self {
        self.decline_forward = true;
        self
    }

    /// Decline backward transitions.
    pub fn decline_backward(mut self) -> Self {
        self.decline_backward = true;
        self
    }

    /// Number of times this animator was asked to run.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Number of held completions.
    pub fn in_flight(&self) -> usize {
        self.pending.borrow().len()
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

    /// Fire every held completion, including ones added while firing. Returns
    /// how many fired.
    pub fn complete_all(&self) -> usize {
        let mut fired = 0;
        while self.complete_next() {
            fired += 1;
        }
        fired
    }

    /// Handle or decline one transition.
    fn run(
        &self,
        decline: bool,
        old: Option<&ViewRef>,
        new: &ViewRef,
        container: &dyn Container,
        done: Completion,
    ) -> Animation {
        self.calls.set(self.calls.get() + 1);
        if decline {
            return Animation::Declined(done);
        }
        if let Some(old) = old {
            container.remove_view(old);
        }
        container.add_view(new.clone());
        self.pending.borrow_mut().push_back(done);
        Animation::Handled
    }
}

impl TransitionAnimator for ManualAnimator {
    fn forward(
        &self,
        old: Option<&ViewRef>,
        new: &ViewRef,
        container: &dyn Container,
        done: Completion,
    ) -> Animation {
        self.run(self.decline_forward, old, new, container, done)
    }

    fn backward(
        &self,
        old: Option<&ViewRef>,
        new: &ViewRef,
        container: &dyn Container,
        done: Completion,
    ) -> Animation {
        self.run(self.decline_backward, old, new, container, done)
    }
}
