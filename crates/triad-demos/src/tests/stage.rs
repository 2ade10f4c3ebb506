use triad::{Container, Host, View, ViewRef, ViewState, error::Result, view::same_view};

use crate::stage::{Stage, TerminalHost, TextView};

#[test]
fn test_scroll_is_clamped() {
    let view = TextView::new("Pager");
    view.scroll_by(4);
    assert_eq!(view.scroll(), 0);

    view.set_lines((0..5).map(|i| format!("line {i}")).collect());
    view.scroll_by(3);
    assert_eq!(view.scroll(), 3);
    view.scroll_by(10);
    assert_eq!(view.scroll(), 4);

    view.set_lines(vec!["only".into()]);
    assert_eq!(view.scroll(), 0);
}

#[test]
fn test_scroll_survives_state_round_trip() -> Result<()> {
    let view = TextView::new("Pager");
    view.set_lines((0..10).map(|i| i.to_string()).collect());
    view.scroll_by(6);
    let mut state = ViewState::new();
    view.save_state(&mut state)?;

    let fresh = TextView::new("Pager");
    fresh.set_lines((0..10).map(|i| i.to_string()).collect());
    fresh.restore_state(&state);
    assert_eq!(fresh.scroll(), 6);
    Ok(())
}

#[test]
fn test_stage_tracks_views() {
    let stage = Stage::default();
    let a: ViewRef = TextView::new("A");
    let b: ViewRef = TextView::new("B");
    stage.add_view(a.clone());
    stage.add_view(b.clone());
    assert_eq!(stage.titles(), vec!["A", "B"]);
    assert!(stage.current_view().is_some_and(|v| same_view(&v, &a)));

    stage.remove_view(&a);
    assert_eq!(stage.titles(), vec!["B"]);
}

#[test]
fn test_host_finishes() {
    let host = TerminalHost::new();
    assert!(!host.is_finishing());
    assert!(host.content_container().is_some());
    host.finish();
    assert!(host.is_finishing());
}
