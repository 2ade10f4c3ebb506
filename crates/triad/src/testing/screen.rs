use std::{fmt::Debug, rc::Rc};

use super::{fakes::FakeView, journal::Journal};
use crate::{
    animator::TransitionAnimator,
    error::Result,
    host::{ActivityResult, ActivityResultListener},
    screen::{Screen, ScreenHandle, ScreenName},
    view::{Container, ViewRef, ViewState},
};

/// A hook run from inside a lifecycle callback.
type Hook = Box<dyn Fn()>;

/// A screen that journals every hook as `NAME.HOOK`.
///
/// Views built by the screen are [`FakeView`]s with the screen's name, and the
/// latest one is kept in the journal so tests can type into it.
pub struct TestScreen {
    /// Screen name.
    name: ScreenName,
    /// Event log.
    journal: Journal,
    /// Consume back presses.
    handles_back: bool,
    /// Animator offered to the navigator.
    animator: Option<Rc<dyn TransitionAnimator>>,
    /// Accept activity results.
    wants_results: bool,
    /// Run after `on_create` is journaled.
    on_create: Option<Hook>,
}

impl TestScreen {
    /// A screen named `name` logging to `journal`.
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: ScreenName::convert(name),
            journal: journal.clone(),
            handles_back: false,
            animator: None,
            wants_results: false,
            on_create: None,
        }
    }

    /// Consume back presses.
    pub fn handles_back(mut self, handles: bool) -> Self {
        self.handles_back = handles;
        self
    }

    /// Offer `animator` for transitions involving this screen.
    pub fn with_animator(mut self, animator: Rc<dyn TransitionAnimator>) -> Self {
        self.animator = Some(animator);
        self
    }

    /// Accept activity results.
    pub fn wants_results(mut self) -> Self {
        self.wants_results = true;
        self
    }

    /// Run `hook` when the screen is created, for example to navigate from
    /// inside a lifecycle callback.
    pub fn when_created(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_create = Some(Box::new(hook));
        self
    }

    /// Record `NAME.event`.
    fn log(&self, event: &str) {
        self.journal.record(format!("{}.{event}", self.name));
    }
}

impl<C: Debug> Screen<C> for TestScreen {
    fn create_view(&self, _container: &dyn Container) -> ViewRef {
        self.log("view");
        let view = FakeView::new(self.name.as_str());
        self.journal.record_view(self.name.as_str(), view.clone());
        view
    }

    fn set_application_component(&self, component: &C) {
        self.log(&format!("component({component:?})"));
    }

    fn on_create(&self) {
        self.log("create");
        if let Some(hook) = &self.on_create {
            hook();
        }
    }

    fn on_destroy(&self) {
        self.log("destroy");
    }

    fn on_attach(&self, _container: &dyn Container) {
        self.log("attach");
    }

    fn on_detach(&self) {
        self.log("detach");
    }

    fn save_state(&self, view: &ViewRef, state: &mut ViewState) -> Result<()> {
        self.log("save");
        view.save_state(state)
    }

    fn restore_state(&self, view: &ViewRef, state: &ViewState) {
        self.log("restore");
        view.restore_state(state);
    }

    fn on_back_pressed(&self) -> bool {
        self.log("back");
        self.handles_back
    }

    fn transition_animator(&self) -> Option<Rc<dyn TransitionAnimator>> {
        self.animator.clone()
    }

    fn activity_result_listener(&self) -> Option<&dyn ActivityResultListener> {
        self.wants_results
            .then_some(self as &dyn ActivityResultListener)
    }

    fn name(&self) -> ScreenName {
        self.name.clone()
    }
}

impl ActivityResultListener for TestScreen {
    fn on_activity_result(&self, result: &ActivityResult) {
        self.log(&format!(
            "result({},{})",
            result.request_code, result.result_code
        ));
    }
}

impl<C: Debug> From<TestScreen> for ScreenHandle<C> {
    fn from(screen: TestScreen) -> Self {
        Self::new(screen)
    }
}
