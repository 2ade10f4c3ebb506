use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};
use tracing::info;
use triad::{
    ActivityResult, ActivityResultListener, Animation, Completion, Container, Presenter,
    PresenterSlot, Screen, ScreenName, ScreenRegistry, TransitionAnimator, ViewRef,
    error::Result,
};

use crate::stage::TextView;

/// Request code used when asking the host to pick an attachment.
pub const PICK_ATTACHMENT: i32 = 1;
/// Result extra naming the picked file.
pub const ATTACHMENT_EXTRA: &str = "mail.attachment";

/// One message in the mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Stable message id.
    pub id: u64,
    /// Sender.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
}

/// The application component: shared mail data and an event log.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    /// All messages, newest first.
    messages: Rc<Vec<Message>>,
    /// Things screens did, for display.
    events: Rc<RefCell<Vec<String>>>,
}

impl Mailbox {
    /// A mailbox holding `messages`.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages: Rc::new(messages),
            events: Rc::default(),
        }
    }

    /// A small mailbox for demos.
    pub fn sample() -> Self {
        let message = |id, from: &str, subject: &str, body: &str| Message {
            id,
            from: from.into(),
            subject: subject.into(),
            body: body.into(),
        };
        Self::new(vec![
            message(3, "ada", "Engine notes", "Notes on the analytical engine.\nSee attached."),
            message(2, "grace", "Compiler", "The compiler works.\nShip it?"),
            message(1, "alan", "Lunch", "Lunch on Thursday?"),
        ])
    }

    /// All messages.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The message with `id`.
    pub fn get(&self, id: u64) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Record an event.
    pub fn note(&self, event: impl Into<String>) {
        let event = event.into();
        info!(%event, "mailbox");
        self.events.borrow_mut().push(event);
    }

    /// Recorded events.
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

/// Fills the inbox list while it is on screen.
#[derive(Debug, Default)]
pub struct ListPresenter {
    /// The list view, while acquired.
    view: Option<Rc<TextView>>,
}

impl ListPresenter {
    /// True while bound to a view.
    pub fn is_bound(&self) -> bool {
        self.view.is_some()
    }
}

impl Presenter<Rc<TextView>, Mailbox> for ListPresenter {
    fn acquire(&mut self, container: Rc<TextView>, component: &Mailbox) {
        container.set_lines(
            component
                .messages()
                .iter()
                .map(|m| format!("{:>3}  {:<8} {}", m.id, m.from, m.subject))
                .collect(),
        );
        self.view = Some(container);
    }

    fn release_container(&mut self) {
        self.view = None;
    }
}

/// The message list.
#[derive(Default)]
pub struct InboxScreen {
    /// Bound component.
    mailbox: RefCell<Option<Mailbox>>,
    /// The current list view.
    view: RefCell<Option<Rc<TextView>>>,
    /// The list presenter.
    slot: RefCell<PresenterSlot<ListPresenter, Rc<TextView>, Mailbox>>,
}

impl InboxScreen {
    /// Construct the inbox.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Screen<Mailbox> for InboxScreen {
    fn create_view(&self, _container: &dyn Container) -> ViewRef {
        let view = TextView::new("Inbox");
        *self.view.borrow_mut() = Some(view.clone());
        view
    }

    fn set_application_component(&self, component: &Mailbox) {
        *self.mailbox.borrow_mut() = Some(component.clone());
    }

    fn on_create(&self) {
        self.slot
            .borrow_mut()
            .set_presenter(Some(ListPresenter::default()));
    }

    fn on_attach(&self, _container: &dyn Container) {
        let view = self.view.borrow().clone();
        let mailbox = self.mailbox.borrow().clone();
        if let (Some(view), Some(mailbox)) = (view, mailbox) {
            self.slot.borrow_mut().attached(view, mailbox);
        }
    }

    fn on_detach(&self) {
        self.slot.borrow_mut().detached();
    }

    fn name(&self) -> ScreenName {
        ScreenName::convert("inbox")
    }
}

/// Arguments for [`MessageScreen`] deep links.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MessageArgs {
    /// Message to show.
    pub id: u64,
}

/// Shows one message.
pub struct MessageScreen {
    /// Message id.
    id: u64,
    /// Bound component.
    mailbox: RefCell<Option<Mailbox>>,
}

impl MessageScreen {
    /// Show message `id`.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            mailbox: RefCell::new(None),
        }
    }
}

impl Screen<Mailbox> for MessageScreen {
    fn create_view(&self, _container: &dyn Container) -> ViewRef {
        let view = TextView::new(&format!("Message {}", self.id));
        let message = self
            .mailbox
            .borrow()
            .as_ref()
            .and_then(|m| m.get(self.id).cloned());
        match message {
            Some(m) => {
                let mut lines = vec![format!("From: {}", m.from), format!("Subject: {}", m.subject)];
                lines.extend(m.body.lines().map(String::from));
                view.set_lines(lines);
            }
            None => view.set_lines(vec![format!("No message {}", self.id)]),
        }
        view
    }

    fn set_application_component(&self, component: &Mailbox) {
        *self.mailbox.borrow_mut() = Some(component.clone());
    }

    fn on_destroy(&self) {
        if let Some(mailbox) = self.mailbox.borrow().as_ref() {
            mailbox.note(format!("closed message {}", self.id));
        }
    }

    fn name(&self) -> ScreenName {
        ScreenName::convert(&format!("message {}", self.id))
    }
}

/// Arguments for [`ComposeScreen`] deep links.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ComposeArgs {
    /// Message being replied to.
    #[serde(default)]
    pub reply_to: Option<u64>,
}

/// Writes a message. The first back press with a draft discards the draft
/// instead of leaving.
pub struct ComposeScreen {
    /// Message being replied to.
    reply_to: Option<u64>,
    /// Bound component.
    mailbox: RefCell<Option<Mailbox>>,
    /// Draft text, kept across views.
    draft: RefCell<Vec<String>>,
    /// The current view.
    view: RefCell<Option<Rc<TextView>>>,
}

impl ComposeScreen {
    /// A new message, optionally replying to `reply_to`.
    pub fn new(reply_to: Option<u64>) -> Self {
        let draft = reply_to
            .map(|id| vec![format!("Re: message {id}")])
            .unwrap_or_default();
        Self {
            reply_to,
            mailbox: RefCell::new(None),
            draft: RefCell::new(draft),
            view: RefCell::new(None),
        }
    }

    /// Record an event if a mailbox is bound.
    fn note(&self, event: String) {
        if let Some(mailbox) = self.mailbox.borrow().as_ref() {
            mailbox.note(event);
        }
    }
}

impl Screen<Mailbox> for ComposeScreen {
    fn create_view(&self, _container: &dyn Container) -> ViewRef {
        let view = TextView::new("Compose");
        view.set_lines(self.draft.borrow().clone());
        *self.view.borrow_mut() = Some(view.clone());
        view
    }

    fn set_application_component(&self, component: &Mailbox) {
        *self.mailbox.borrow_mut() = Some(component.clone());
    }

    fn on_back_pressed(&self) -> bool {
        if self.draft.borrow().is_empty() {
            return false;
        }
        self.draft.borrow_mut().clear();
        if let Some(view) = self.view.borrow().as_ref() {
            view.set_lines(Vec::new());
        }
        self.note("discarded draft".into());
        true
    }

    fn transition_animator(&self) -> Option<Rc<dyn TransitionAnimator>> {
        Some(Rc::new(SlideUp))
    }

    fn activity_result_listener(&self) -> Option<&dyn ActivityResultListener> {
        Some(self)
    }

    fn name(&self) -> ScreenName {
        match self.reply_to {
            Some(_) => ScreenName::convert("reply"),
            None => ScreenName::convert("compose"),
        }
    }
}

impl ActivityResultListener for ComposeScreen {
    fn on_activity_result(&self, result: &ActivityResult) {
        if result.request_code != PICK_ATTACHMENT || !result.is_ok() {
            self.note(format!("ignored result {}", result.request_code));
            return;
        }
        let file = result
            .data
            .as_ref()
            .and_then(|data| data.extra::<String>(ATTACHMENT_EXTRA).ok().flatten())
            .unwrap_or_else(|| "attachment".into());
        let line = format!("[{file}]");
        self.draft.borrow_mut().push(line.clone());
        if let Some(view) = self.view.borrow().as_ref() {
            view.push_line(line);
        }
        self.note(format!("attached {file}"));
    }
}

/// Slides the compose sheet up over the current screen. Only handles the
/// forward direction; going back falls through to the default animator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideUp;

impl TransitionAnimator for SlideUp {
    fn forward(
        &self,
        old: Option<&ViewRef>,
        new: &ViewRef,
        container: &dyn Container,
        done: Completion,
    ) -> Animation {
        info!(to = %new.name(), "slide up");
        container.add_view(new.clone());
        if let Some(old) = old {
            container.remove_view(old);
        }
        done.complete();
        Animation::Handled
    }

    fn backward(
        &self,
        _old: Option<&ViewRef>,
        _new: &ViewRef,
        _container: &dyn Container,
        done: Completion,
    ) -> Animation {
        Animation::Declined(done)
    }
}

/// Deep-link factories for every mail screen.
pub fn registry() -> Result<ScreenRegistry<Mailbox>> {
    let mut registry = ScreenRegistry::new();
    registry
        .register_with("inbox", |_: Option<()>| InboxScreen::new())?
        .register_with("message", |args: MessageArgs| MessageScreen::new(args.id))?
        .register_with("compose", |args: Option<ComposeArgs>| {
            ComposeScreen::new(args.unwrap_or_default().reply_to)
        })?;
    Ok(registry)
}
