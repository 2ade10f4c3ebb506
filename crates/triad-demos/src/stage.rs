use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use triad::{Container, Host, View, ViewRef, ViewState, error::Result, view::same_view};

/// A titled, scrollable block of text.
#[derive(Debug)]
pub struct TextView {
    /// Title shown in the stage listing.
    title: String,
    /// Content lines.
    lines: RefCell<Vec<String>>,
    /// First visible line.
    scroll: Cell<usize>,
}

impl TextView {
    /// Construct an empty view.
    pub fn new(title: &str) -> Rc<Self> {
        Rc::new(Self {
            title: title.to_string(),
            lines: RefCell::new(Vec::new()),
            scroll: Cell::new(0),
        })
    }

    /// Replace the content.
    pub fn set_lines(&self, lines: Vec<String>) {
        *self.lines.borrow_mut() = lines;
        self.scroll.set(self.scroll.get().min(self.max_scroll()));
    }

    /// Append a line.
    pub fn push_line(&self, line: String) {
        self.lines.borrow_mut().push(line);
    }

    /// Content lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Scroll down by `n` lines, stopping at the last line.
    pub fn scroll_by(&self, n: usize) {
        let target = self.scroll.get().saturating_add(n);
        self.scroll.set(target.min(self.max_scroll()));
    }

    /// First visible line.
    pub fn scroll(&self) -> usize {
        self.scroll.get()
    }

    /// Largest useful scroll offset.
    fn max_scroll(&self) -> usize {
        self.lines.borrow().len().saturating_sub(1)
    }
}

impl View for TextView {
    fn save_state(&self, state: &mut ViewState) -> Result<()> {
        state.put("scroll", &self.scroll.get())
    }

    fn restore_state(&self, state: &ViewState) {
        if let Ok(Some(scroll)) = state.get::<usize>("scroll") {
            self.scroll.set(scroll);
        }
    }

    fn name(&self) -> String {
        self.title.clone()
    }
}

/// The content area of a [`TerminalHost`].
#[derive(Default)]
pub struct Stage {
    /// Views on stage, oldest first.
    children: RefCell<Vec<ViewRef>>,
}

impl Stage {
    /// Titles of the views on stage.
    pub fn titles(&self) -> Vec<String> {
        self.children.borrow().iter().map(|v| v.name()).collect()
    }
}

impl Container for Stage {
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

/// A host window that lives in memory.
#[derive(Default)]
pub struct TerminalHost {
    /// Content area.
    stage: Rc<Stage>,
    /// Set when the user quits.
    finishing: Cell<bool>,
}

impl TerminalHost {
    /// Construct a host with an empty stage.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// The content area.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Mark the host as quitting.
    pub fn finish(&self) {
        self.finishing.set(true);
    }
}

impl Host for TerminalHost {
    fn content_container(&self) -> Option<Rc<dyn Container>> {
        Some(self.stage.clone())
    }

    fn is_finishing(&self) -> bool {
        self.finishing.get()
    }
}
