//! The navigator: a backstack plus the state machine that sequences
//! transitions over it.
//!
//! Every navigation request either runs immediately or, while a transition is
//! in flight, waits in a FIFO queue. A transition ends when the listener fires
//! the [`Completion`] it was handed; the next queued request runs then. Only
//! one transition is ever in flight, and listeners never observe the
//! backstack half way through a mutation.

use std::{
    cell::RefCell,
    collections::VecDeque,
    fmt,
    mem,
    rc::{Rc, Weak},
};

use scopeguard::defer;
use tracing::{debug, trace, warn};

use crate::{
    animator::{Completion, NoAnimation, TransitionAnimator},
    backstack::Backstack,
    error::{Error, Result},
    host::ActivityResult,
    screen::ScreenHandle,
};

/// A predicate over screens.
pub type ScreenPredicate<C> = Box<dyn Fn(&ScreenHandle<C>) -> bool>;

/// Receives backstack mutations and drives the transitions they imply.
///
/// Only one listener is registered at a time. Every transition event carries a
/// [`Completion`] that must eventually fire, or navigation stalls.
pub trait Listener<C> {
    /// A screen entered the backstack.
    fn screen_pushed(&self, screen: &ScreenHandle<C>);

    /// A screen left the backstack.
    fn screen_popped(&self, screen: &ScreenHandle<C>);

    /// Show `screen`, which was pushed on top of the previous one.
    fn forward(
        &self,
        screen: &ScreenHandle<C>,
        animator: Option<Rc<dyn TransitionAnimator>>,
        done: Completion,
    );

    /// Show `screen`, which was uncovered by popping.
    fn backward(
        &self,
        screen: &ScreenHandle<C>,
        animator: Option<Rc<dyn TransitionAnimator>>,
        done: Completion,
    );

    /// Show `screen`, which replaced one or more screens on top.
    fn replace(
        &self,
        screen: &ScreenHandle<C>,
        animator: Option<Rc<dyn TransitionAnimator>>,
        done: Completion,
    );
}

/// How far a reset pops before pushing its new screen.
pub enum ResetPolicy<C> {
    /// Pop everything above the root.
    ToRoot,
    /// Pop until the top matches the predicate, never popping the root.
    Until(ScreenPredicate<C>),
    /// Pop everything, including the root.
    All,
}

impl<C> ResetPolicy<C> {
    /// Pop until the top matches `predicate`.
    pub fn until(predicate: impl Fn(&ScreenHandle<C>) -> bool + 'static) -> Self {
        Self::Until(Box::new(predicate))
    }
}

impl<C> fmt::Debug for ResetPolicy<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ToRoot => "ToRoot",
            Self::Until(_) => "Until(..)",
            Self::All => "All",
        })
    }
}

/// How many screens a replace removes.
enum Removal<C> {
    /// Exactly the top screen.
    Top,
    /// As many as the policy says.
    Reset(ResetPolicy<C>),
}

/// A queued navigation request.
enum Request<C> {
    /// Seed an empty backstack.
    Start(Backstack<C>),
    /// Push a screen.
    GoTo {
        /// Screen to push.
        screen: ScreenHandle<C>,
        /// Explicit animator.
        animator: Option<Rc<dyn TransitionAnimator>>,
    },
    /// Pop one screen, or until a predicate matches.
    GoBack {
        /// Stop popping when the top matches. `None` pops exactly one.
        until: Option<ScreenPredicate<C>>,
        /// Explicit animator.
        animator: Option<Rc<dyn TransitionAnimator>>,
    },
    /// Pop some screens and push a new one.
    Replace {
        /// Screen to push.
        screen: ScreenHandle<C>,
        /// What to pop first.
        removal: Removal<C>,
        /// Explicit animator.
        animator: Option<Rc<dyn TransitionAnimator>>,
    },
}

impl<C> Request<C> {
    /// Short label for logs.
    fn kind(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::GoTo { .. } => "go_to",
            Self::GoBack { until: None, .. } => "go_back",
            Self::GoBack { until: Some(_), .. } => "go_back_to",
            Self::Replace {
                removal: Removal::Top,
                ..
            } => "replace_top",
            Self::Replace { .. } => "reset_to",
        }
    }
}

/// Identifies one transition, so late completions of superseded transitions
/// can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TransitionId(u64);

/// Mutable navigator state.
struct State<C> {
    /// The screens.
    backstack: Backstack<C>,
    /// The transition in flight, if any.
    transition: Option<TransitionId>,
    /// Next transition id to hand out.
    next_id: u64,
    /// Requests waiting for the current transition to finish.
    pending: VecDeque<Request<C>>,
    /// True while a request is executing. Requests made from inside listener
    /// callbacks are queued behind it.
    draining: bool,
}

impl<C> State<C> {
    /// True if new requests must wait.
    fn is_busy(&self) -> bool {
        self.transition.is_some() || self.draining
    }

    /// Mark a new transition as in flight.
    fn begin_transition(&mut self) -> TransitionId {
        let id = TransitionId(self.next_id);
        self.next_id += 1;
        self.transition = Some(id);
        id
    }
}

/// Shared navigator internals.
struct Inner<C> {
    /// Navigator state. Never borrowed across a listener call.
    state: RefCell<State<C>>,
    /// The registered listener.
    listener: RefCell<Option<Rc<dyn Listener<C>>>>,
}

/// The navigator.
///
/// `Triad` is a cheap handle: clones share the same backstack. It is meant to
/// be created once per process and handed to each delegate that hosts it.
pub struct Triad<C> {
    /// Shared internals.
    inner: Rc<Inner<C>>,
}

/// A weak reference to a [`Triad`], for listeners that need to look back at
/// the navigator without keeping it alive.
pub struct WeakTriad<C> {
    /// Weak internals.
    inner: Weak<Inner<C>>,
}

impl<C> WeakTriad<C> {
    /// Recover the navigator if it is still alive.
    pub fn upgrade(&self) -> Option<Triad<C>> {
        self.inner.upgrade().map(|inner| Triad { inner })
    }
}

impl<C> Clone for WeakTriad<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C> Clone for Triad<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: 'static> Default for Triad<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Triad<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Triad")
            .field("backstack", &state.backstack)
            .field("transitioning", &state.transition.is_some())
            .field("pending", &state.pending.len())
            .finish()
    }
}

impl<C: 'static> Triad<C> {
    /// Construct a navigator with an empty backstack and no listener.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(State {
                    backstack: Backstack::new(),
                    transition: None,
                    next_id: 0,
                    pending: VecDeque::new(),
                    draining: false,
                }),
                listener: RefCell::new(None),
            }),
        }
    }

    /// A weak handle to this navigator.
    pub fn downgrade(&self) -> WeakTriad<C> {
        WeakTriad {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Register the listener, replacing any previous one.
    pub fn set_listener(&self, listener: Rc<dyn Listener<C>>) {
        *self.inner.listener.borrow_mut() = Some(listener);
    }

    /// Remove the listener.
    pub fn clear_listener(&self) {
        self.inner.listener.borrow_mut().take();
    }

    /// True if a listener is registered.
    pub fn has_listener(&self) -> bool {
        self.inner.listener.borrow().is_some()
    }

    /// A copy of the backstack.
    pub fn backstack(&self) -> Backstack<C> {
        self.inner.state.borrow().backstack.clone()
    }

    /// The top screen.
    pub fn current(&self) -> Option<ScreenHandle<C>> {
        self.inner.state.borrow().backstack.current().cloned()
    }

    /// True while a transition is in flight.
    pub fn is_transitioning(&self) -> bool {
        self.inner.state.borrow().transition.is_some()
    }

    /// Number of queued requests.
    pub fn pending(&self) -> usize {
        self.inner.state.borrow().pending.len()
    }

    /// Seed an empty backstack with a single screen.
    pub fn start_with(&self, screen: ScreenHandle<C>) -> Result<()> {
        self.start_with_backstack(Backstack::single(screen))
    }

    /// Seed an empty backstack. The seeded screens are announced bottom to top
    /// and the top one is shown without animation.
    pub fn start_with_backstack(&self, backstack: Backstack<C>) -> Result<()> {
        if backstack.is_empty() {
            return Err(Error::EmptyBackstack);
        }
        let existing = self.inner.state.borrow().backstack.len();
        if existing > 0 {
            return Err(Error::AlreadyStarted(existing));
        }
        self.submit(Request::Start(backstack));
        Ok(())
    }

    /// Push a screen and transition forward to it.
    pub fn go_to(&self, screen: ScreenHandle<C>) {
        self.submit(Request::GoTo {
            screen,
            animator: None,
        });
    }

    /// Push a screen, animating with `animator`.
    pub fn go_to_with(&self, screen: ScreenHandle<C>, animator: Rc<dyn TransitionAnimator>) {
        self.submit(Request::GoTo {
            screen,
            animator: Some(animator),
        });
    }

    /// Pop the top screen and transition back.
    ///
    /// Returns false, without changing anything, if only the root is left.
    /// While a transition is in flight the request is queued and this returns
    /// true; if the stack is down to the root by the time it runs, it does
    /// nothing.
    pub fn go_back(&self) -> bool {
        self.submit(Request::GoBack {
            until: None,
            animator: None,
        })
    }

    /// Like [`Triad::go_back`], animating with `animator`.
    pub fn go_back_with(&self, animator: Rc<dyn TransitionAnimator>) -> bool {
        self.submit(Request::GoBack {
            until: None,
            animator: Some(animator),
        })
    }

    /// Pop until the top screen matches `predicate`, then transition back to
    /// it with a single animation. The root is never popped. Returns false if
    /// nothing would be popped.
    pub fn go_back_to(&self, predicate: impl Fn(&ScreenHandle<C>) -> bool + 'static) -> bool {
        self.submit(Request::GoBack {
            until: Some(Box::new(predicate)),
            animator: None,
        })
    }

    /// Replace the top screen.
    pub fn replace_top(&self, screen: ScreenHandle<C>) {
        self.submit(Request::Replace {
            screen,
            removal: Removal::Top,
            animator: None,
        });
    }

    /// Pop everything above the root, then push `screen`.
    pub fn reset_to(&self, screen: ScreenHandle<C>) {
        self.reset_to_with(screen, ResetPolicy::ToRoot);
    }

    /// Pop according to `policy`, then push `screen`.
    pub fn reset_to_with(&self, screen: ScreenHandle<C>, policy: ResetPolicy<C>) {
        self.submit(Request::Replace {
            screen,
            removal: Removal::Reset(policy),
            animator: None,
        });
    }

    /// Show the top screen again without changing the backstack, for a freshly
    /// recreated host. A transition still in flight is superseded: its
    /// completion is ignored when it fires.
    pub fn show_current(&self) {
        let Some(listener) = self.listener() else {
            warn!("show_current without a listener");
            return;
        };
        let (screen, id) = {
            let mut state = self.inner.state.borrow_mut();
            let Some(screen) = state.backstack.current().cloned() else {
                debug!("show_current on an empty backstack");
                return;
            };
            if let Some(previous) = state.transition {
                debug!(?previous, "superseding in-flight transition");
            }
            (screen, state.begin_transition())
        };
        debug!(screen = %screen.name(), "show current");
        listener.forward(&screen, Some(Rc::new(NoAnimation)), self.completion(id));
    }

    /// Forward an activity result to the top screen. Returns false if there is
    /// no screen or it is not interested.
    pub fn on_activity_result(&self, result: &ActivityResult) -> bool {
        let Some(screen) = self.current() else {
            return false;
        };
        let delivered = screen.deliver_activity_result(result);
        if !delivered {
            trace!(screen = %screen.name(), "activity result ignored");
        }
        delivered
    }

    /// Empty the backstack, drop queued requests and forget any in-flight
    /// transition. No listener events are emitted. Returns the removed screens.
    pub fn clear(&self) -> Backstack<C> {
        let mut state = self.inner.state.borrow_mut();
        state.pending.clear();
        state.transition = None;
        mem::take(&mut state.backstack)
    }

    /// The current listener.
    fn listener(&self) -> Option<Rc<dyn Listener<C>>> {
        self.inner.listener.borrow().clone()
    }

    /// Run a request now, or queue it if the navigator is busy. Returns the
    /// request's result, or true if it was queued.
    fn submit(&self, request: Request<C>) -> bool {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.is_busy() {
                trace!(
                    request = request.kind(),
                    pending = state.pending.len() + 1,
                    "queueing request"
                );
                state.pending.push_back(request);
                return true;
            }
            state.draining = true;
        }
        let handled = {
            let inner = &self.inner;
            defer! {
                inner.state.borrow_mut().draining = false;
            }
            self.execute(request)
        };
        self.drain();
        handled
    }

    /// Run queued requests until one starts a transition or the queue is
    /// empty.
    fn drain(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.draining {
                return;
            }
            state.draining = true;
        }
        let inner = &self.inner;
        defer! {
            inner.state.borrow_mut().draining = false;
        }
        loop {
            let next = {
                let mut state = self.inner.state.borrow_mut();
                if state.transition.is_some() {
                    None
                } else {
                    state.pending.pop_front()
                }
            };
            let Some(request) = next else {
                break;
            };
            trace!(request = request.kind(), "running queued request");
            self.execute(request);
        }
    }

    /// A completion that ends transition `id`.
    fn completion(&self, id: TransitionId) -> Completion {
        let weak = Rc::downgrade(&self.inner);
        Completion::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.finish(id);
            }
        })
    }

    /// End transition `id` and run whatever is queued behind it.
    fn finish(&self, id: TransitionId) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.transition != Some(id) {
                warn!(?id, "ignoring completion of a superseded transition");
                return;
            }
            state.transition = None;
        }
        trace!(?id, "transition finished");
        self.drain();
    }

    /// Mark a transition as in flight.
    fn begin(&self) -> TransitionId {
        self.inner.state.borrow_mut().begin_transition()
    }

    /// Execute one request. The navigator is idle when this is called.
    fn execute(&self, request: Request<C>) -> bool {
        match request {
            Request::Start(backstack) => {
                self.run_start(backstack);
                true
            }
            Request::GoTo { screen, animator } => {
                self.run_go_to(screen, animator);
                true
            }
            Request::GoBack { until, animator } => self.run_go_back(until.as_deref(), animator),
            Request::Replace {
                screen,
                removal,
                animator,
            } => {
                self.run_replace(screen, &removal, animator);
                true
            }
        }
    }

    /// Seed the backstack.
    fn run_start(&self, backstack: Backstack<C>) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.backstack.is_empty() {
                warn!(
                    existing = state.backstack.len(),
                    "backstack filled before start ran, ignoring start"
                );
                return;
            }
            state.backstack = backstack.clone();
        }
        debug!(backstack = ?backstack, "start");
        let Some(listener) = self.listener() else {
            warn!("started without a listener");
            return;
        };
        let id = self.begin();
        for screen in &backstack {
            listener.screen_pushed(screen);
        }
        if let Some(top) = backstack.current() {
            listener.forward(top, Some(Rc::new(NoAnimation)), self.completion(id));
        }
    }

    /// Push a screen and go forward.
    fn run_go_to(&self, screen: ScreenHandle<C>, animator: Option<Rc<dyn TransitionAnimator>>) {
        self.inner.state.borrow_mut().backstack.push(screen.clone());
        debug!(screen = %screen.name(), "go to");
        let Some(listener) = self.listener() else {
            warn!(screen = %screen.name(), "navigating without a listener");
            return;
        };
        let id = self.begin();
        listener.screen_pushed(&screen);
        let animator = animator.or_else(|| screen.transition_animator());
        listener.forward(&screen, animator, self.completion(id));
    }

    /// Pop one or more screens and go back.
    fn run_go_back(
        &self,
        until: Option<&dyn Fn(&ScreenHandle<C>) -> bool>,
        animator: Option<Rc<dyn TransitionAnimator>>,
    ) -> bool {
        // Predicates are user code, so count without holding a borrow.
        let snapshot = self.backstack();
        let count = match until {
            None => usize::from(snapshot.len() > 1),
            Some(predicate) => pops_until(&snapshot, predicate),
        };
        if count == 0 {
            debug!(depth = snapshot.len(), "nothing to go back to");
            return false;
        }
        let (popped, top) = {
            let mut state = self.inner.state.borrow_mut();
            let popped: Vec<_> = (0..count).filter_map(|_| state.backstack.pop()).collect();
            let top = state.backstack.current().cloned();
            (popped, top)
        };
        let Some(top) = top else {
            return false;
        };
        debug!(
            popped = popped.len(),
            screen = %top.name(),
            "go back"
        );
        let Some(listener) = self.listener() else {
            warn!("navigating without a listener");
            return true;
        };
        let id = self.begin();
        for screen in &popped {
            listener.screen_popped(screen);
        }
        let animator = animator.or_else(|| popped.first().and_then(|s| s.transition_animator()));
        listener.backward(&top, animator, self.completion(id));
        true
    }

    /// Pop screens per `removal`, push `screen` and replace.
    fn run_replace(
        &self,
        screen: ScreenHandle<C>,
        removal: &Removal<C>,
        animator: Option<Rc<dyn TransitionAnimator>>,
    ) {
        let snapshot = self.backstack();
        let count = match removal {
            Removal::Top => snapshot.len().min(1),
            Removal::Reset(ResetPolicy::ToRoot) => snapshot.len().saturating_sub(1),
            Removal::Reset(ResetPolicy::All) => snapshot.len(),
            Removal::Reset(ResetPolicy::Until(predicate)) => {
                pops_until(&snapshot, predicate.as_ref())
            }
        };
        let popped: Vec<_> = {
            let mut state = self.inner.state.borrow_mut();
            let popped = (0..count)
                .filter_map(|_| state.backstack.take_top())
                .collect();
            state.backstack.push(screen.clone());
            popped
        };
        debug!(
            popped = popped.len(),
            screen = %screen.name(),
            "replace"
        );
        let Some(listener) = self.listener() else {
            warn!(screen = %screen.name(), "navigating without a listener");
            return;
        };
        let id = self.begin();
        for old in &popped {
            listener.screen_popped(old);
        }
        listener.screen_pushed(&screen);
        let animator = animator.or_else(|| screen.transition_animator());
        listener.replace(&screen, animator, self.completion(id));
    }
}

/// Count how many screens to pop from the top before one matches `predicate`,
/// leaving at least the root.
fn pops_until<C>(backstack: &Backstack<C>, predicate: &dyn Fn(&ScreenHandle<C>) -> bool) -> usize {
    let poppable = backstack.len().saturating_sub(1);
    backstack
        .reverse_iter()
        .iter()
        .take(poppable)
        .take_while(|s| !predicate(s))
        .count()
}
