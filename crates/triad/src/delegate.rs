//! Adapts host lifecycle events to the navigator, and navigator events to
//! screen lifecycles and view transitions.
//!
//! A host forwards its lifecycle to a [`TriadDelegate`]. The delegate registers
//! a listener on the shared [`Triad`] that creates and destroys screens as they
//! enter and leave the backstack, swaps their views in the host's container
//! through a [`TransitionAnimator`], and attaches the new screen once the
//! animation has finished.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use tracing::{debug, warn};

use crate::{
    animator::{Completion, Direction, NoAnimation, TransitionAnimator, animate},
    error::{Error, Result},
    host::{ActivityResult, BackPress, Host},
    intent::{Intent, ScreenRegistry},
    navigator::{Listener, Triad, WeakTriad},
    screen::ScreenHandle,
    view::Container,
};

/// Called whenever the visible screen changes.
type Observer<C> = Rc<dyn Fn(&ScreenHandle<C>)>;

/// Drives screens and views in response to navigator events.
struct DelegateListener<C> {
    /// The navigator this listener is registered on.
    triad: WeakTriad<C>,
    /// Handed to every screen on first push.
    component: C,
    /// The host's content area, once known.
    container: RefCell<Option<Rc<dyn Container>>>,
    /// The screen whose view is shown.
    current: RefCell<Option<ScreenHandle<C>>>,
    /// The screen shown before `current`, attached until its transition ends.
    leaving: RefCell<Option<ScreenHandle<C>>>,
    /// Bumped when the host is destroyed, invalidating pending completions.
    generation: Rc<Cell<u64>>,
    /// Used when a transition has no animator, or its animator declines.
    default_animator: Rc<dyn TransitionAnimator>,
    /// Screen-changed observer.
    observer: RefCell<Option<Observer<C>>>,
}

impl<C: 'static> DelegateListener<C> {
    /// The screen whose view is shown.
    fn current(&self) -> Option<ScreenHandle<C>> {
        self.current.borrow().clone()
    }

    /// The host's content area.
    fn container(&self) -> Option<Rc<dyn Container>> {
        self.container.borrow().clone()
    }

    /// Bind and create a screen that entered the backstack while no listener
    /// was registered.
    fn ensure_created(&self, screen: &ScreenHandle<C>) {
        screen.bind_component(&self.component);
        screen.create();
    }

    /// Show `screen`, animating from whatever is shown now.
    fn transition(
        &self,
        direction: Direction,
        screen: &ScreenHandle<C>,
        animator: Option<Rc<dyn TransitionAnimator>>,
        done: Completion,
    ) {
        let Some(container) = self.container() else {
            warn!(%direction, screen = %screen.name(), "no container, skipping transition");
            done.complete();
            return;
        };
        self.ensure_created(screen);

        let old_view = container.current_view();
        let old_screen = self.current.replace(Some(screen.clone()));
        *self.leaving.borrow_mut() = old_screen.clone().filter(|old| !old.ptr_eq(screen));
        if direction != Direction::Backward
            && let (Some(old), Some(view)) = (&old_screen, &old_view)
            && !old.ptr_eq(screen)
            && let Err(e) = old.save_state(view)
        {
            warn!(screen = %old.name(), error = %e, "failed to save view state");
        }

        let new_view = screen.create_view(container.as_ref());
        if direction == Direction::Backward {
            screen.restore_state(&new_view);
        }
        debug!(%direction, screen = %screen.name(), "transition");

        let finish = {
            let screen = screen.clone();
            let container = container.clone();
            let observer = self.observer.borrow().clone();
            let generation = self.generation.clone();
            let started = generation.get();
            Completion::new(move || {
                if generation.get() != started {
                    debug!(screen = %screen.name(), "host destroyed during transition");
                    done.complete();
                    return;
                }
                screen.attach(container.as_ref());
                if let Some(old) = old_screen.filter(|old| !old.ptr_eq(&screen)) {
                    old.detach();
                }
                if let Some(observer) = observer {
                    observer(&screen);
                }
                done.complete();
            })
        };
        animate(
            direction,
            animator.as_deref(),
            self.default_animator.as_ref(),
            old_view.as_ref(),
            &new_view,
            container.as_ref(),
            finish,
        );
    }
}

impl<C: 'static> Listener<C> for DelegateListener<C> {
    fn screen_pushed(&self, screen: &ScreenHandle<C>) {
        self.ensure_created(screen);
    }

    fn screen_popped(&self, screen: &ScreenHandle<C>) {
        let still_present = self
            .triad
            .upgrade()
            .is_some_and(|triad| triad.backstack().contains(screen));
        if still_present {
            debug!(screen = %screen.name(), "popped screen is still on the backstack");
            return;
        }
        screen.destroy();
    }

    fn forward(
        &self,
        screen: &ScreenHandle<C>,
        animator: Option<Rc<dyn TransitionAnimator>>,
        done: Completion,
    ) {
        self.transition(Direction::Forward, screen, animator, done);
    }

    fn backward(
        &self,
        screen: &ScreenHandle<C>,
        animator: Option<Rc<dyn TransitionAnimator>>,
        done: Completion,
    ) {
        self.transition(Direction::Backward, screen, animator, done);
    }

    fn replace(
        &self,
        screen: &ScreenHandle<C>,
        animator: Option<Rc<dyn TransitionAnimator>>,
        done: Completion,
    ) {
        self.transition(Direction::Replace, screen, animator, done);
    }
}

/// Builder for [`TriadDelegate`].
pub struct TriadDelegateBuilder<C> {
    /// The host.
    host: Rc<dyn Host>,
    /// The shared navigator.
    triad: Triad<C>,
    /// Application component handed to screens.
    component: C,
    /// Fallback animator.
    default_animator: Rc<dyn TransitionAnimator>,
    /// Deep-link factories.
    registry: ScreenRegistry<C>,
    /// Screen-changed observer.
    observer: Option<Observer<C>>,
}

impl<C: 'static> TriadDelegateBuilder<C> {
    /// Use `animator` when a transition has none, or its own declines. The
    /// default swaps views without animating.
    pub fn default_animator(mut self, animator: Rc<dyn TransitionAnimator>) -> Self {
        self.default_animator = animator;
        self
    }

    /// Resolve deep links with `registry`.
    pub fn registry(mut self, registry: ScreenRegistry<C>) -> Self {
        self.registry = registry;
        self
    }

    /// Call `observer` whenever the visible screen changes.
    pub fn on_screen_changed(mut self, observer: impl Fn(&ScreenHandle<C>) + 'static) -> Self {
        self.observer = Some(Rc::new(observer));
        self
    }

    /// Build the delegate.
    pub fn build(self) -> TriadDelegate<C> {
        let listener = Rc::new(DelegateListener {
            triad: self.triad.downgrade(),
            component: self.component,
            container: RefCell::new(None),
            current: RefCell::new(None),
            leaving: RefCell::new(None),
            generation: Rc::new(Cell::new(0)),
            default_animator: self.default_animator,
            observer: RefCell::new(self.observer),
        });
        TriadDelegate {
            host: self.host,
            triad: self.triad,
            listener,
            registry: self.registry,
            created: Cell::new(false),
        }
    }
}

/// Bridges one host's lifecycle to a shared [`Triad`].
///
/// Hosts forward `on_create`, `on_resume`, `on_pause`, `on_back_pressed`,
/// `on_activity_result` and `on_destroy`. Everything but `on_create` fails with
/// [`Error::NotCreated`] until `on_create` has succeeded.
pub struct TriadDelegate<C> {
    /// The host.
    host: Rc<dyn Host>,
    /// The shared navigator.
    triad: Triad<C>,
    /// Listener registered on the navigator.
    listener: Rc<DelegateListener<C>>,
    /// Deep-link factories.
    registry: ScreenRegistry<C>,
    /// Whether `on_create` has succeeded.
    created: Cell<bool>,
}

impl<C> fmt::Debug for TriadDelegate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriadDelegate")
            .field("triad", &self.triad)
            .field("registry", &self.registry)
            .field("created", &self.created.get())
            .finish()
    }
}

impl<C: 'static> TriadDelegate<C> {
    /// Start building a delegate for `host` that navigates `triad`, handing
    /// `component` to every screen.
    pub fn builder(host: Rc<dyn Host>, triad: Triad<C>, component: C) -> TriadDelegateBuilder<C> {
        TriadDelegateBuilder {
            host,
            triad,
            component,
            default_animator: Rc::new(NoAnimation),
            registry: ScreenRegistry::new(),
            observer: None,
        }
    }

    /// Fail with [`Error::NotCreated`] unless `on_create` has run.
    fn check_created(&self, op: &'static str) -> Result<()> {
        if self.created.get() {
            Ok(())
        } else {
            Err(Error::NotCreated(op))
        }
    }

    /// The host was created. Registers with the navigator, then either shows
    /// the current screen again (the host was recreated) or seeds the
    /// backstack from a deep link in `intent`.
    pub fn on_create(&self, intent: Option<&Intent>) -> Result<()> {
        let container = self.host.content_container().ok_or(Error::NoContainer)?;
        *self.listener.container.borrow_mut() = Some(container);
        self.triad.set_listener(self.listener.clone());
        self.created.set(true);

        if !self.triad.backstack().is_empty() || self.triad.is_transitioning() {
            debug!("showing existing backstack");
            self.triad.show_current();
            return Ok(());
        }
        let Some(intent) = intent else {
            return Ok(());
        };
        if let Some(screen) = self.registry.create_screen(intent) {
            self.triad.start_with(screen)
        } else if let Some(backstack) = self.registry.create_backstack(intent) {
            self.triad.start_with_backstack(backstack)
        } else {
            debug!("no deep link, backstack left empty");
            Ok(())
        }
    }

    /// The host is visible again. Reattaches the current screen.
    pub fn on_resume(&self) -> Result<()> {
        self.check_created("on_resume")?;
        if let (Some(screen), Some(container)) = (self.listener.current(), self.listener.container())
        {
            screen.attach(container.as_ref());
        }
        Ok(())
    }

    /// The host is hidden. Detaches the current screen, keeping its view.
    pub fn on_pause(&self) -> Result<()> {
        self.check_created("on_pause")?;
        if let Some(screen) = self.listener.current() {
            screen.detach();
        }
        Ok(())
    }

    /// Offer a back press to the current screen, then to the navigator.
    pub fn on_back_pressed(&self) -> Result<BackPress> {
        self.check_created("on_back_pressed")?;
        if self
            .listener
            .current()
            .is_some_and(|screen| screen.on_back_pressed())
        {
            return Ok(BackPress::Handled);
        }
        if self.triad.go_back() {
            Ok(BackPress::Handled)
        } else {
            Ok(BackPress::Finish)
        }
    }

    /// Forward an activity result to the top screen. Returns false if nothing
    /// took it.
    pub fn on_activity_result(&self, result: &ActivityResult) -> Result<bool> {
        self.check_created("on_activity_result")?;
        Ok(self.triad.on_activity_result(result))
    }

    /// The host is going away. If it is finishing, every screen left on the
    /// backstack is detached and destroyed top to bottom, transitions still
    /// running are abandoned and the navigator is reset. A host being
    /// recreated keeps its backstack for the next `on_create`.
    pub fn on_destroy(&self) -> Result<()> {
        self.check_created("on_destroy")?;
        if !self.host.is_finishing() {
            debug!("host recreating, keeping backstack");
            return Ok(());
        }
        let generation = &self.listener.generation;
        generation.set(generation.get() + 1);
        let current = self.listener.current.borrow_mut().take();
        let leaving = self.listener.leaving.borrow_mut().take();
        for screen in current.iter().chain(leaving.iter()) {
            screen.detach();
        }
        for screen in &self.triad.backstack().reverse_iter() {
            screen.detach();
            screen.destroy();
        }
        self.triad.clear();
        self.triad.clear_listener();
        self.created.set(false);
        Ok(())
    }

    /// The screen whose view is shown.
    pub fn current_screen(&self) -> Option<ScreenHandle<C>> {
        self.listener.current()
    }

    /// The navigator.
    pub fn triad(&self) -> &Triad<C> {
        &self.triad
    }

    /// Replace the screen-changed observer.
    pub fn set_on_screen_changed(&self, observer: impl Fn(&ScreenHandle<C>) + 'static) {
        *self.listener.observer.borrow_mut() = Some(Rc::new(observer));
    }

    /// Remove the screen-changed observer.
    pub fn clear_on_screen_changed(&self) {
        self.listener.observer.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        backstack::Backstack,
        host::RESULT_OK,
        intent::ScreenPayload,
        screen::Lifecycle,
        testing::{FakeHost, Journal, ManualAnimator, TestScreen},
    };

    /// Component type used throughout these tests.
    type App = &'static str;

    fn screen(name: &str, journal: &Journal) -> ScreenHandle<App> {
        TestScreen::new(name, journal).into()
    }

    /// A created delegate on a fresh host and navigator.
    fn created() -> (TriadDelegate<App>, Rc<FakeHost>, Journal) {
        let journal = Journal::new();
        let host = Rc::new(FakeHost::new());
        let delegate = TriadDelegate::builder(host.clone(), Triad::new(), "app").build();
        delegate.on_create(None).unwrap();
        (delegate, host, journal)
    }

    fn names(host: &FakeHost) -> Vec<String> {
        host.container().map(|c| c.names()).unwrap_or_default()
    }

    #[test]
    fn requires_on_create() {
        let host = Rc::new(FakeHost::new());
        let delegate: TriadDelegate<App> =
            TriadDelegate::builder(host, Triad::new(), "app").build();
        assert_eq!(delegate.on_resume(), Err(Error::NotCreated("on_resume")));
        assert_eq!(delegate.on_pause(), Err(Error::NotCreated("on_pause")));
        assert_eq!(
            delegate.on_back_pressed(),
            Err(Error::NotCreated("on_back_pressed"))
        );
        assert_eq!(delegate.on_destroy(), Err(Error::NotCreated("on_destroy")));
        assert!(delegate.current_screen().is_none());

        let host = Rc::new(FakeHost::without_container());
        let delegate: TriadDelegate<App> =
            TriadDelegate::builder(host, Triad::new(), "app").build();
        assert_eq!(delegate.on_create(None), Err(Error::NoContainer));
        assert!(!delegate.triad().has_listener());
    }

    #[test]
    fn deep_link_seeds_backstack() -> Result<()> {
        let journal = Journal::new();
        let mut registry = ScreenRegistry::new();
        for key in ["home", "inbox"] {
            let j = journal.clone();
            registry.register(key, move |_| Ok(TestScreen::new(key, &j).into()))?;
        }
        let host = Rc::new(FakeHost::new());
        let delegate = TriadDelegate::builder(host.clone(), Triad::new(), "app")
            .registry(registry)
            .build();

        let intent =
            Intent::for_backstack(&[ScreenPayload::new("home"), ScreenPayload::new("inbox")])?;
        delegate.on_create(Some(&intent))?;
        assert_eq!(delegate.triad().backstack().names(), vec!["home", "inbox"]);
        assert_eq!(
            journal.entries(),
            vec![
                "home.component(\"app\")",
                "home.create",
                "inbox.component(\"app\")",
                "inbox.create",
                "inbox.view",
                "inbox.attach"
            ]
        );
        assert_eq!(names(&host), vec!["inbox"]);
        Ok(())
    }

    #[test]
    fn unknown_deep_link_leaves_backstack_empty() -> Result<()> {
        let host = Rc::new(FakeHost::new());
        let delegate: TriadDelegate<App> =
            TriadDelegate::builder(host, Triad::new(), "app").build();
        delegate.on_create(Some(&Intent::for_screen(&ScreenPayload::new("nope"))?))?;
        assert!(delegate.triad().backstack().is_empty());
        assert_eq!(delegate.on_back_pressed()?, BackPress::Finish);
        Ok(())
    }

    #[test]
    fn forward_and_back_drive_lifecycles() -> Result<()> {
        let (delegate, host, journal) = created();
        let triad = delegate.triad();
        triad.start_with(screen("home", &journal))?;
        journal.view("home").unwrap().set_text("draft");
        journal.clear();

        triad.go_to(screen("detail", &journal));
        assert_eq!(
            journal.take(),
            vec![
                "detail.component(\"app\")",
                "detail.create",
                "home.save",
                "detail.view",
                "detail.attach",
                "home.detach"
            ]
        );
        assert_eq!(names(&host), vec!["detail"]);

        assert_eq!(delegate.on_back_pressed()?, BackPress::Handled);
        assert_eq!(
            journal.take(),
            vec![
                "detail.back",
                "detail.destroy",
                "home.view",
                "home.restore",
                "home.attach",
                "detail.detach"
            ]
        );
        assert_eq!(names(&host), vec!["home"]);
        assert_eq!(journal.view("home").map(|v| v.text()), Some("draft".into()));
        assert_eq!(
            delegate.current_screen().map(|s| s.name().to_string()),
            Some("home".into())
        );

        assert_eq!(delegate.on_back_pressed()?, BackPress::Finish);
        Ok(())
    }

    #[test]
    fn screen_can_consume_back() -> Result<()> {
        let (delegate, _host, journal) = created();
        let triad = delegate.triad();
        triad.start_with(screen("home", &journal))?;
        triad.go_to(TestScreen::new("editor", &journal).handles_back(true).into());
        assert_eq!(delegate.on_back_pressed()?, BackPress::Handled);
        assert_eq!(triad.backstack().names(), vec!["home", "editor"]);
        Ok(())
    }

    #[test]
    fn replace_saves_and_destroys_outgoing() -> Result<()> {
        let (delegate, host, journal) = created();
        let triad = delegate.triad();
        triad.start_with(screen("login", &journal))?;
        journal.clear();
        triad.replace_top(screen("home", &journal));
        assert_eq!(
            journal.entries(),
            vec![
                "login.destroy",
                "home.component(\"app\")",
                "home.create",
                "login.save",
                "home.view",
                "home.attach",
                "login.detach"
            ]
        );
        assert_eq!(names(&host), vec!["home"]);
        Ok(())
    }

    #[test]
    fn pause_and_resume_reattach() -> Result<()> {
        let (delegate, _host, journal) = created();
        delegate.triad().start_with(screen("home", &journal))?;
        journal.clear();
        delegate.on_pause()?;
        delegate.on_resume()?;
        delegate.on_resume()?;
        assert_eq!(journal.entries(), vec!["home.detach", "home.attach"]);
        Ok(())
    }

    #[test]
    fn attach_waits_for_animation() -> Result<()> {
        let journal = Journal::new();
        let host = Rc::new(FakeHost::new());
        let dialog_animator = Rc::new(ManualAnimator::new());
        let delegate = TriadDelegate::builder(host.clone(), Triad::new(), "app").build();
        delegate.on_create(None)?;
        let triad = delegate.triad();
        triad.start_with(screen("home", &journal))?;

        triad.go_to(
            TestScreen::new("dialog", &journal)
                .with_animator(dialog_animator.clone())
                .into(),
        );
        triad.go_to(screen("next", &journal));
        assert_eq!(journal.count("dialog.attach"), 0);
        assert_eq!(journal.count("next."), 0);
        assert_eq!(triad.pending(), 1);
        assert_eq!(names(&host), vec!["dialog"]);

        assert!(dialog_animator.complete_next());
        assert_eq!(journal.count("dialog.attach"), 1);
        assert_eq!(journal.last().as_deref(), Some("dialog.detach"));
        assert_eq!(names(&host), vec!["next"]);
        assert!(!triad.is_transitioning());
        Ok(())
    }

    #[test]
    fn declined_animation_uses_default_once() -> Result<()> {
        let journal = Journal::new();
        let host = Rc::new(FakeHost::new());
        let fallback = Rc::new(ManualAnimator::new());
        let picky = Rc::new(ManualAnimator::new().decline_forward());
        let delegate = TriadDelegate::builder(host.clone(), Triad::new(), "app")
            .default_animator(fallback.clone())
            .build();
        delegate.on_create(None)?;
        let triad = delegate.triad();
        triad.start_with(screen("home", &journal))?;
        assert_eq!(fallback.calls(), 0);

        triad.go_to(
            TestScreen::new("dialog", &journal)
                .with_animator(picky.clone())
                .into(),
        );
        assert_eq!(picky.calls(), 1);
        assert_eq!(fallback.calls(), 1);
        assert!(triad.is_transitioning());
        assert_eq!(fallback.complete_all(), 1);
        assert_eq!(journal.count("dialog.attach"), 1);
        assert!(!triad.is_transitioning());
        Ok(())
    }

    #[test]
    fn screens_can_navigate_from_hooks() -> Result<()> {
        let (delegate, host, journal) = created();
        let triad = delegate.triad();
        let weak = triad.downgrade();
        let j = journal.clone();
        let splash = TestScreen::new("splash", &journal).when_created(move || {
            if let Some(triad) = weak.upgrade() {
                triad.go_to(TestScreen::new("home", &j).into());
            }
        });
        triad.start_with(splash.into())?;
        assert_eq!(triad.backstack().names(), vec!["splash", "home"]);
        assert_eq!(names(&host), vec!["home"]);
        assert!(!triad.is_transitioning());
        Ok(())
    }

    #[test]
    fn duplicate_screens_survive_pop() -> Result<()> {
        let (delegate, _host, journal) = created();
        let triad = delegate.triad();
        let list = screen("list", &journal);
        triad.start_with_backstack(Backstack::of([
            list.clone(),
            screen("item", &journal),
            list.clone(),
        ]))?;
        assert!(triad.go_back());
        assert_eq!(list.lifecycle(), Lifecycle::Created);
        assert_eq!(journal.count("list.destroy"), 0);
        assert!(triad.go_back());
        assert_eq!(journal.count("item.destroy"), 1);
        Ok(())
    }

    #[test]
    fn recreated_host_shows_current_screen() -> Result<()> {
        let (delegate, host, journal) = created();
        let triad = delegate.triad().clone();
        triad.start_with(screen("home", &journal))?;
        triad.go_to(screen("detail", &journal));
        delegate.on_pause()?;
        delegate.on_destroy()?;
        assert_eq!(journal.count("detail.destroy"), 0);
        assert_eq!(names(&host), vec!["detail"]);
        journal.clear();

        let host = Rc::new(FakeHost::new());
        let recreated = TriadDelegate::builder(host.clone(), triad.clone(), "app").build();
        recreated.on_create(None)?;
        assert_eq!(journal.entries(), vec!["detail.view", "detail.attach"]);
        assert_eq!(names(&host), vec!["detail"]);
        assert_eq!(triad.backstack().names(), vec!["home", "detail"]);
        Ok(())
    }

    #[test]
    fn finishing_host_destroys_everything() -> Result<()> {
        let (delegate, host, journal) = created();
        let triad = delegate.triad();
        triad.start_with(screen("home", &journal))?;
        triad.go_to(screen("detail", &journal));
        journal.clear();

        host.set_finishing(true);
        delegate.on_destroy()?;
        assert_eq!(
            journal.entries(),
            vec!["detail.detach", "detail.destroy", "home.destroy"]
        );
        assert!(triad.backstack().is_empty());
        assert!(!triad.has_listener());
        assert!(delegate.current_screen().is_none());
        assert_eq!(delegate.on_resume(), Err(Error::NotCreated("on_resume")));
        Ok(())
    }

    #[test]
    fn finishing_mid_transition_abandons_it() -> Result<()> {
        let host = Rc::new(FakeHost::new());
        let journal = Journal::new();
        let animator = Rc::new(ManualAnimator::new());
        let delegate = TriadDelegate::builder(host.clone(), Triad::new(), "app")
            .default_animator(animator.clone())
            .build();
        delegate.on_create(None)?;
        let changes = Rc::new(Cell::new(0));
        let seen = changes.clone();
        delegate.set_on_screen_changed(move |_| seen.set(seen.get() + 1));

        let triad = delegate.triad();
        let home = screen("home", &journal);
        let detail = screen("detail", &journal);
        triad.start_with(home.clone())?;
        triad.go_to(detail.clone());
        assert!(home.is_attached());
        assert_eq!(changes.get(), 1);
        journal.clear();

        host.set_finishing(true);
        delegate.on_destroy()?;
        assert_eq!(
            journal.entries(),
            vec!["home.detach", "detail.destroy", "home.destroy"]
        );

        assert!(animator.complete_next());
        assert_eq!(journal.entries().len(), 3);
        assert_eq!(changes.get(), 1);
        for s in [&home, &detail] {
            assert_eq!(s.lifecycle(), Lifecycle::Destroyed);
            assert!(!s.is_attached());
        }
        Ok(())
    }

    #[test]
    fn screens_pushed_without_listener_are_created_lazily() -> Result<()> {
        let journal = Journal::new();
        let triad = Triad::new();
        triad.start_with(screen("home", &journal))?;
        assert!(journal.entries().is_empty());

        let host = Rc::new(FakeHost::new());
        let delegate = TriadDelegate::builder(host, triad, "app").build();
        delegate.on_create(None)?;
        assert_eq!(
            journal.entries(),
            vec![
                "home.component(\"app\")",
                "home.create",
                "home.view",
                "home.attach"
            ]
        );
        Ok(())
    }

    #[test]
    fn observer_and_activity_results() -> Result<()> {
        let journal = Journal::new();
        let seen = Journal::new();
        let host = Rc::new(FakeHost::new());
        let s = seen.clone();
        let delegate = TriadDelegate::builder(host, Triad::new(), "app")
            .on_screen_changed(move |screen| s.record(screen.name().to_string()))
            .build();
        delegate.on_create(None)?;
        let triad = delegate.triad();
        triad.start_with(screen("home", &journal))?;
        triad.go_to(TestScreen::new("picker", &journal).wants_results().into());

        let result = ActivityResult::new(3, RESULT_OK);
        assert!(delegate.on_activity_result(&result)?);
        assert_eq!(journal.last().as_deref(), Some("picker.result(3,-1)"));

        delegate.clear_on_screen_changed();
        triad.go_back();
        assert_eq!(seen.entries(), vec!["home", "picker"]);
        assert!(!delegate.on_activity_result(&result)?);
        Ok(())
    }
}
