//! Transition animators and the single-shot completion handle they report
//! through.

use std::fmt;

use tracing::{debug, warn};

use crate::view::{Container, ViewRef};

/// A single-shot completion handle.
///
/// Every transition hands one of these to an animator. Calling
/// [`Completion::complete`] consumes the handle, so it cannot fire twice. A
/// handle dropped without firing stalls navigation and is logged.
#[must_use = "a transition stalls until its completion fires"]
pub struct Completion {
    /// Callback to run on completion. `None` once fired.
    callback: Option<Box<dyn FnOnce()>>,
}

impl Completion {
    /// Wrap a callback.
    pub fn new(callback: impl FnOnce() + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// A completion that does nothing.
    pub fn noop() -> Self {
        Self { callback: None }
    }

    /// Signal that the transition has finished.
    pub fn complete(mut self) {
        if let Some(callback) = self.callback.take() {
            callback();
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.callback.is_some())
            .finish()
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.callback.is_some() {
            warn!("transition completion dropped without firing; navigation is stalled");
        }
    }
}

/// The outcome of asking an animator to run a transition.
#[derive(Debug)]
#[must_use]
pub enum Animation {
    /// The animator took the transition and will fire the completion exactly
    /// once, possibly before returning.
    Handled,
    /// The animator does not handle this transition. It has not touched the
    /// views, and hands the completion back untouched.
    Declined(Completion),
}

/// The three transition directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// A screen was pushed.
    Forward,
    /// A screen was popped.
    Backward,
    /// The top of the stack was swapped.
    Replace,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Replace => "replace",
        })
    }
}

/// A strategy that animates between two views inside a container.
///
/// Implementations either handle a transition and fire the completion exactly
/// once, or decline synchronously without touching the views. Replace
/// transitions reuse [`TransitionAnimator::forward`].
pub trait TransitionAnimator {
    /// Animate a push from `old` to `new`.
    fn forward(
        &self,
        old: Option<&ViewRef>,
        new: &ViewRef,
        container: &dyn Container,
        done: Completion,
    ) -> Animation;

    /// Animate a pop from `old` back to `new`.
    fn backward(
        &self,
        old: Option<&ViewRef>,
        new: &ViewRef,
        container: &dyn Container,
        done: Completion,
    ) -> Animation;
}

/// Swaps views without animating and completes immediately. Handles every
/// transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnimation;

impl NoAnimation {
    /// Replace `old` with `new` in the container.
    fn swap(old: Option<&ViewRef>, new: &ViewRef, container: &dyn Container) {
        if let Some(old) = old {
            container.remove_view(old);
        }
        container.add_view(new.clone());
    }
}

impl TransitionAnimator for NoAnimation {
    fn forward(
        &self,
        old: Option<&ViewRef>,
        new: &ViewRef,
        container: &dyn Container,
        done: Completion,
    ) -> Animation {
        Self::swap(old, new, container);
        done.complete();
        Animation::Handled
    }

    fn backward(
        &self,
        old: Option<&ViewRef>,
        new: &ViewRef,
        container: &dyn Container,
        done: Completion,
    ) -> Animation {
        Self::swap(old, new, container);
        done.complete();
        Animation::Handled
    }
}

/// Run one direction of an animator.
fn run(
    animator: &dyn TransitionAnimator,
    direction: Direction,
    old: Option<&ViewRef>,
    new: &ViewRef,
    container: &dyn Container,
    done: Completion,
) -> Animation {
    match direction {
        Direction::Forward | Direction::Replace => animator.forward(old, new, container, done),
        Direction::Backward => animator.backward(old, new, container, done),
    }
}

/// Animate a transition with `preferred` if given, falling back to `fallback`
/// when it declines.
///
/// If the fallback declines too the views are swapped with [`NoAnimation`], so
/// `done` always fires exactly once.
pub fn animate(
    direction: Direction,
    preferred: Option<&dyn TransitionAnimator>,
    fallback: &dyn TransitionAnimator,
    old: Option<&ViewRef>,
    new: &ViewRef,
    container: &dyn Container,
    done: Completion,
) {
    let done = match preferred {
        Some(animator) => match run(animator, direction, old, new, container, done) {
            Animation::Handled => return,
            Animation::Declined(done) => {
                debug!(%direction, "animator declined, using default");
                done
            }
        },
        None => done,
    };
    if let Animation::Declined(done) = run(fallback, direction, old, new, container, done) {
        warn!(%direction, "default animator declined, swapping views");
        let _handled = run(&NoAnimation, direction, old, new, container, done);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::testing::{FakeContainer, FakeView, ManualAnimator};

    #[test]
    fn completion_fires_once() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let done = Completion::new(move || c.set(c.get() + 1));
        done.complete();
        assert_eq!(count.get(), 1);
        Completion::noop().complete();
    }

    #[test]
    fn noanimation_swaps_views() {
        let container = FakeContainer::new();
        let a: ViewRef = FakeView::new("a");
        let b: ViewRef = FakeView::new("b");
        let fired = Rc::new(Cell::new(false));

        let f = fired.clone();
        let _handled = NoAnimation.forward(None, &a, &container, Completion::new(move || f.set(true)));
        assert!(fired.get());
        assert_eq!(container.names(), vec!["a"]);

        let _handled = NoAnimation.backward(Some(&a), &b, &container, Completion::noop());
        assert_eq!(container.names(), vec!["b"]);
    }

    #[test]
    fn declined_animation_falls_back_once() {
        let container = FakeContainer::new();
        let new: ViewRef = FakeView::new("new");
        let preferred = ManualAnimator::new().decline_backward();
        let fallback = ManualAnimator::new();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        animate(
            Direction::Backward,
            Some(&preferred),
            &fallback,
            None,
            &new,
            &container,
            Completion::new(move || c.set(c.get() + 1)),
        );
        assert_eq!(preferred.calls(), 1);
        assert_eq!(fallback.calls(), 1);
        assert_eq!(count.get(), 0);
        assert!(fallback.complete_next());
        assert!(!fallback.complete_next());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn replace_uses_forward() {
        let container = FakeContainer::new();
        let new: ViewRef = FakeView::new("new");
        let preferred = ManualAnimator::new().decline_backward();
        animate(
            Direction::Replace,
            Some(&preferred),
            &NoAnimation,
            None,
            &new,
            &container,
            Completion::noop(),
        );
        assert_eq!(preferred.calls(), 1);
        assert_eq!(preferred.in_flight(), 1);
        assert_eq!(preferred.complete_all(), 1);
    }

    #[test]
    fn declining_fallback_still_completes() {
        let container = FakeContainer::new();
        let new: ViewRef = FakeView::new("new");
        let fallback = ManualAnimator::new().decline_forward();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        animate(
            Direction::Forward,
            None,
            &fallback,
            None,
            &new,
            &container,
            Completion::new(move || f.set(true)),
        );
        assert!(fired.get());
        assert_eq!(container.names(), vec!["new"]);
    }
}
