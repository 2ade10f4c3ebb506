use std::rc::Rc;

use serde_json::json;
use triad::{
    ActivityResult, ActivityResultListener, Intent, Lifecycle, Presenter, Screen, ScreenHandle,
    ScreenPayload, Triad, TriadDelegate, View,
    error::Result,
    host::{RESULT_CANCELED, RESULT_OK},
    testing::{FakeContainer, FakeHost, ManualAnimator},
};

use crate::{
    mail::{
        ATTACHMENT_EXTRA, ComposeScreen, InboxScreen, ListPresenter, Mailbox, MessageScreen,
        PICK_ATTACHMENT, registry,
    },
    stage::{Stage, TextView},
};

#[test]
fn test_sample_mailbox() {
    let mailbox = Mailbox::sample();
    assert_eq!(mailbox.messages().len(), 3);
    assert_eq!(mailbox.get(2).map(|m| m.from.as_str()), Some("grace"));
    assert!(mailbox.get(7).is_none());

    let clone = mailbox.clone();
    clone.note("hello");
    assert_eq!(mailbox.events(), vec!["hello"]);
}

#[test]
fn test_list_presenter_fills_view() {
    let mailbox = Mailbox::sample();
    let view = TextView::new("Inbox");
    let mut presenter = ListPresenter::default();
    presenter.acquire(view.clone(), &mailbox);
    assert!(presenter.is_bound());

    let lines = view.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("Engine notes"));
    assert!(lines[2].contains("alan"));

    presenter.release_container();
    assert!(!presenter.is_bound());
}

#[test]
fn test_message_view_shows_body() {
    let screen = MessageScreen::new(2);
    assert_eq!(screen.name(), "message_2");
    screen.set_application_component(&Mailbox::sample());
    let view = screen.create_view(&Stage::default());
    assert_eq!(view.name(), "Message 2");

    let missing = MessageScreen::new(9);
    let view = missing.create_view(&Stage::default());
    assert_eq!(view.name(), "Message 9");
}

#[test]
fn test_compose_discards_draft_before_leaving() {
    let mailbox = Mailbox::sample();
    let screen = ComposeScreen::new(Some(3));
    assert_eq!(screen.name(), "reply");
    screen.set_application_component(&mailbox);

    assert!(screen.on_back_pressed());
    assert!(!screen.on_back_pressed());
    assert_eq!(mailbox.events(), vec!["discarded draft"]);

    let fresh = ComposeScreen::new(None);
    assert_eq!(fresh.name(), "compose");
    assert!(!fresh.on_back_pressed());
}

#[test]
fn test_registry_builds_every_screen() -> Result<()> {
    let registry = registry()?;
    for key in ["inbox", "message", "compose"] {
        assert!(registry.contains(key), "{key}");
    }

    let inbox = registry.build(&ScreenPayload::new("inbox"))?;
    assert_eq!(inbox.name(), &"inbox");
    let message = registry.build(&ScreenPayload::with_args("message", &json!({ "id": 1 }))?)?;
    assert_eq!(message.name(), &"message_1");
    let reply = registry.build(&ScreenPayload::with_args(
        "compose",
        &json!({ "reply_to": 1 }),
    )?)?;
    assert_eq!(reply.name(), &"reply");
    let compose = registry.build(&ScreenPayload::new("compose"))?;
    assert_eq!(compose.name(), &"compose");

    assert!(registry.build(&ScreenPayload::new("message")).is_err());
    assert!(registry.build(&ScreenPayload::new("drafts")).is_err());
    Ok(())
}

#[test]
fn test_compose_takes_picked_attachment() -> Result<()> {
    let mailbox = Mailbox::sample();
    let screen = ComposeScreen::new(None);
    screen.set_application_component(&mailbox);
    let _view = screen.create_view(&FakeContainer::new());
    let listener = screen
        .activity_result_listener()
        .expect("compose takes activity results");

    let mut data = Intent::new();
    data.put_extra(ATTACHMENT_EXTRA, &"plan.pdf")?;
    let picked = ActivityResult::new(PICK_ATTACHMENT, RESULT_OK).with_data(data);
    listener.on_activity_result(&picked);
    listener.on_activity_result(&ActivityResult::new(PICK_ATTACHMENT, RESULT_OK));
    listener.on_activity_result(&ActivityResult::new(PICK_ATTACHMENT, RESULT_CANCELED));
    assert_eq!(
        mailbox.events(),
        vec!["attached plan.pdf", "attached attachment", "ignored result 1"]
    );

    // A draft now exists, so back discards it first.
    assert!(screen.on_back_pressed());
    Ok(())
}

#[test]
fn test_inbox_attaches_after_transition() -> Result<()> {
    let host = Rc::new(FakeHost::new());
    let animator = Rc::new(ManualAnimator::new());
    let delegate = TriadDelegate::builder(host.clone(), Triad::new(), Mailbox::sample())
        .default_animator(animator.clone())
        .build();
    delegate.on_create(None)?;
    let triad = delegate.triad();
    triad.start_with(ScreenHandle::new(MessageScreen::new(1)))?;

    let inbox = ScreenHandle::new(InboxScreen::new());
    triad.go_to(inbox.clone());
    assert_eq!(inbox.lifecycle(), Lifecycle::Created);
    assert!(!inbox.is_attached());
    assert_eq!(animator.in_flight(), 1);

    assert!(animator.complete_next());
    assert!(inbox.is_attached());
    let shown = host.container().map(|c| c.names()).unwrap_or_default();
    assert_eq!(shown, vec!["Inbox"]);
    Ok(())
}
