use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{
    error::Result,
    host::Host,
    view::{Container, View, ViewRef, ViewState, same_view},
};

/// A named view holding a single line of text. The text is saved and restored
/// under the `text` key.
#[derive(Debug, Default)]
pub struct FakeView {
    /// View name.
    name: String,
    /// Editable content.
    text: RefCell<String>,
}

impl FakeView {
    /// Construct a view.
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            text: RefCell::new(String::new()),
        })
    }

    /// Replace the text.
    pub fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    /// Current text.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }
}

impl View for FakeView {
    fn save_state(&self, state: &mut ViewState) -> Result<()> {
        state.put("text", &*self.text.borrow())
    }

    fn restore_state(&self, state: &ViewState) {
        if let Ok(Some(text)) = state.get::<String>("text") {
            self.set_text(&text);
        }
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// A container that keeps its children in a list.
#[derive(Default)]
pub struct FakeContainer {
    /// Children in insertion order.
    children: RefCell<Vec<ViewRef>>,
}

impl FakeContainer {
    /// Construct an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the children in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.children.borrow().iter().map(|v| v.name()).collect()
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    /// True if there are no children.
    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }
}

impl Container for FakeContainer {
    fn current_view(&self) -> Option<ViewRef> {
        self.children.borrow().first().cloned()
    }

    fn add_view(&self, view: ViewRef) {
        self.children.borrow_mut().push(view);
    }

    fn remove_view(&self, view: &ViewRef) {
        self.children.borrow_mut().retain(|v| !same_view(v, view));
    }
}

/// A host with an optional [`FakeContainer`] and a finishing flag.
pub struct FakeHost {
    /// Content area.
    container: Option<Rc<FakeContainer>>,
    /// Whether the host is finishing.
    finishing: Cell<bool>,
}

impl FakeHost {
    /// A host with an empty container.
    pub fn new() -> Self {
        Self {
            container: Some(Rc::new(FakeContainer::new())),
            finishing: Cell::new(false),
        }
    }

    /// A host without a content area.
    pub fn without_container() -> Self {
        Self {
            container: None,
            finishing: Cell::new(false),
        }
    }

    /// Mark the host as finishing or merely recreating.
    pub fn set_finishing(&self, finishing: bool) {
        self.finishing.set(finishing);
    }

    /// The host's container.
    pub fn container(&self) -> Option<Rc<FakeContainer>> {
        self.container.clone()
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for FakeHost {
    fn content_container(&self) -> Option<Rc<dyn Container>> {
        self.container
            .clone()
            .map(|c| -> Rc<dyn Container> { c })
    }

    fn is_finishing(&self) -> bool {
        self.finishing.get()
    }
}
