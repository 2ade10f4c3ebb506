//! Screens and the shared handles the navigator keeps them in.

use std::{
    any::type_name,
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
    str::FromStr,
};

use convert_case::{Case, Casing};
use tracing::{debug, trace};

use crate::{
    animator::TransitionAnimator,
    error::{Error, Result},
    host::{ActivityResult, ActivityResultListener},
    view::{Container, ViewRef, ViewState},
};

/// Return true if the character is valid in a screen name.
pub fn valid_screenname_char(c: char) -> bool {
    (c.is_ascii_lowercase() || c.is_ascii_digit()) || c == '_'
}

/// Return true if the full name is valid.
pub fn valid_screenname(name: &str) -> bool {
    !name.is_empty() && name.chars().all(valid_screenname_char)
}

/// A screen name: lowercase ASCII alphanumerics plus underscores.
///
/// Names identify screens in logs and key deep-link factories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenName {
    /// Stored name string.
    name: String,
}

impl ScreenName {
    /// Create a name, returning an error if the string contains invalid
    /// characters.
    fn new(name: &str) -> Result<Self> {
        if !valid_screenname(name) {
            return Err(Error::InvalidName(name.into()));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// Munge a string into a valid name: snake case, with invalid characters
    /// stripped.
    pub fn convert(name: &str) -> Self {
        let raw = name.to_case(Case::Snake);
        let filtered: String = raw.chars().filter(|x| valid_screenname_char(*x)).collect();
        let name = if filtered.is_empty() {
            "screen".to_string()
        } else {
            filtered
        };
        Self { name }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl FromStr for ScreenName {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ScreenName {
    type Error = Error;
    fn try_from(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

impl fmt::Display for ScreenName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq<&str> for ScreenName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

/// Where a screen is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed but never pushed through a listener.
    Constructed,
    /// Component bound and `on_create` called.
    Created,
    /// `on_destroy` called. Terminal.
    Destroyed,
}

/// A navigable unit of UI.
///
/// `C` is the application component the screen draws its dependencies from.
/// All hooks take `&self`: screens are shared between the backstack, the
/// delegate and in-flight transitions, and may navigate from inside a hook.
/// Keep mutable state in cells.
pub trait Screen<C> {
    /// Build this screen's view. The container is supplied for sizing and
    /// styling; the view is not added to it here.
    fn create_view(&self, container: &dyn Container) -> ViewRef;

    /// Receive the application component. Called once, before `on_create`.
    fn set_application_component(&self, _component: &C) {}

    /// The screen entered the backstack.
    fn on_create(&self) {}

    /// The screen left the backstack for good.
    fn on_destroy(&self) {}

    /// The screen's view is now shown in `container`.
    fn on_attach(&self, _container: &dyn Container) {}

    /// The screen's view is no longer shown.
    fn on_detach(&self) {}

    /// Save transient state from `view`. The default asks the view.
    fn save_state(&self, view: &ViewRef, state: &mut ViewState) -> Result<()> {
        view.save_state(state)
    }

    /// Restore state into a freshly built `view`. The default asks the view.
    fn restore_state(&self, view: &ViewRef, state: &ViewState) {
        view.restore_state(state);
    }

    /// Handle a back press. Return true to consume it.
    fn on_back_pressed(&self) -> bool {
        false
    }

    /// An animator for transitions into this screen, and out of it when popped.
    fn transition_animator(&self) -> Option<Rc<dyn TransitionAnimator>> {
        None
    }

    /// Screens interested in activity results return a listener here.
    fn activity_result_listener(&self) -> Option<&dyn ActivityResultListener> {
        None
    }

    /// Name used in logs.
    fn name(&self) -> ScreenName {
        let name = type_name::<Self>();
        let short = name.rsplit("::").next().unwrap_or(name);
        ScreenName::convert(short)
    }
}

/// Framework-owned state for one screen instance.
struct ScreenCell<C> {
    /// The user screen.
    screen: Box<dyn Screen<C>>,
    /// Cached screen name.
    name: ScreenName,
    /// Lifecycle position.
    lifecycle: Cell<Lifecycle>,
    /// Whether the screen is attached to a container.
    attached: Cell<bool>,
    /// Whether the application component has been handed over.
    component_bound: Cell<bool>,
    /// View state saved when the screen was last covered.
    saved_state: RefCell<Option<ViewState>>,
}

/// A shared handle to a screen.
///
/// Identity is the handle's allocation: clones compare equal, two handles
/// wrapping separately constructed screens never do. The handle also carries
/// the framework's per-screen state so lifecycle hooks run at most once.
pub struct ScreenHandle<C> {
    /// Shared screen state.
    inner: Rc<ScreenCell<C>>,
}

impl<C> ScreenHandle<C> {
    /// Wrap a screen.
    pub fn new(screen: impl Screen<C> + 'static) -> Self {
        Self::from_box(Box::new(screen))
    }

    /// Wrap a boxed screen.
    pub fn from_box(screen: Box<dyn Screen<C>>) -> Self {
        let name = screen.name();
        Self {
            inner: Rc::new(ScreenCell {
                screen,
                name,
                lifecycle: Cell::new(Lifecycle::Constructed),
                attached: Cell::new(false),
                component_bound: Cell::new(false),
                saved_state: RefCell::new(None),
            }),
        }
    }

    /// The screen's name.
    pub fn name(&self) -> &ScreenName {
        &self.inner.name
    }

    /// Where the screen is in its lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lifecycle.get()
    }

    /// Whether the screen is attached to a container.
    pub fn is_attached(&self) -> bool {
        self.inner.attached.get()
    }

    /// The wrapped screen.
    pub fn screen(&self) -> &dyn Screen<C> {
        self.inner.screen.as_ref()
    }

    /// State saved the last time this screen was covered, if any.
    pub fn saved_state(&self) -> Option<ViewState> {
        self.inner.saved_state.borrow().clone()
    }

    /// Hand the application component to the screen. Only the first call has
    /// any effect. Returns true if the component was bound by this call.
    pub fn bind_component(&self, component: &C) -> bool {
        if self.inner.component_bound.replace(true) {
            trace!(screen = %self.name(), "component already bound");
            return false;
        }
        self.inner.screen.set_application_component(component);
        true
    }

    /// Run `on_create` if the screen has not been created yet.
    pub fn create(&self) {
        if self.lifecycle() == Lifecycle::Constructed {
            debug!(screen = %self.name(), "create");
            self.inner.lifecycle.set(Lifecycle::Created);
            self.inner.screen.on_create();
        }
    }

    /// Run `on_destroy` unless the screen is already destroyed.
    pub fn destroy(&self) {
        if self.lifecycle() != Lifecycle::Destroyed {
            debug!(screen = %self.name(), "destroy");
            self.inner.lifecycle.set(Lifecycle::Destroyed);
            self.inner.screen.on_destroy();
        }
    }

    /// Attach the screen to a container unless it is already attached.
    pub fn attach(&self, container: &dyn Container) {
        if !self.inner.attached.replace(true) {
            trace!(screen = %self.name(), "attach");
            self.inner.screen.on_attach(container);
        }
    }

    /// Detach the screen if it is attached.
    pub fn detach(&self) {
        if self.inner.attached.replace(false) {
            trace!(screen = %self.name(), "detach");
            self.inner.screen.on_detach();
        }
    }

    /// Build the screen's view.
    pub fn create_view(&self, container: &dyn Container) -> ViewRef {
        self.inner.screen.create_view(container)
    }

    /// Capture transient state from `view` and keep it on the handle.
    pub fn save_state(&self, view: &ViewRef) -> Result<()> {
        let mut state = ViewState::new();
        self.inner.screen.save_state(view, &mut state)?;
        *self.inner.saved_state.borrow_mut() = Some(state);
        Ok(())
    }

    /// Restore previously captured state into `view`, if there is any.
    pub fn restore_state(&self, view: &ViewRef) {
        let saved = self.inner.saved_state.borrow().clone();
        if let Some(state) = saved {
            self.inner.screen.restore_state(view, &state);
        }
    }

    /// Offer a back press to the screen.
    pub fn on_back_pressed(&self) -> bool {
        self.inner.screen.on_back_pressed()
    }

    /// The screen's own transition animator.
    pub fn transition_animator(&self) -> Option<Rc<dyn TransitionAnimator>> {
        self.inner.screen.transition_animator()
    }

    /// Deliver an activity result. Returns false if the screen is not
    /// interested.
    pub fn deliver_activity_result(&self, result: &ActivityResult) -> bool {
        match self.inner.screen.activity_result_listener() {
            Some(listener) => {
                listener.on_activity_result(result);
                true
            }
            None => false,
        }
    }

    /// True if both handles refer to the same screen instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<C> Clone for ScreenHandle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C> PartialEq for ScreenHandle<C> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<C> Eq for ScreenHandle<C> {}

impl<C> fmt::Debug for ScreenHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenHandle")
            .field("name", &self.inner.name)
            .field("lifecycle", &self.lifecycle())
            .field("attached", &self.is_attached())
            .finish()
    }
}
