//! Triad: backstack navigation for hosted GUI applications.
//!
//! Triad keeps an ordered backstack of screens, sequences the transitions
//! between them so that only one runs at a time, and maps a host window's
//! lifecycle onto the screens it shows.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Triad`] - The navigator: a backstack plus a transition queue
//! - [`Screen`] - The trait implemented by every navigable screen
//! - [`TriadDelegate`] - Forwards a host's lifecycle to the navigator
//! - [`TransitionAnimator`] - Strategy for animating between two views
//!
//! # Module Organization
//!
//! - [`backstack`] - The ordered stack of screens
//! - [`intent`] - Deep-link payloads and the screen registry
//! - [`presenter`] - Presenters bound to container views

#![warn(missing_docs)]

/// Transition animators and completion handles.
pub mod animator;
/// The ordered stack of screens.
pub mod backstack;
/// Host lifecycle adapter.
pub mod delegate;
/// Core error types.
pub mod error;
/// Host boundary types.
pub mod host;
/// Deep links.
pub mod intent;
/// The navigator state machine.
pub mod navigator;
/// Presenter binding.
pub mod presenter;
/// Screens and screen handles.
pub mod screen;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Views and containers.
pub mod view;

pub use animator::{Animation, Completion, Direction, NoAnimation, TransitionAnimator};
pub use backstack::Backstack;
pub use delegate::{TriadDelegate, TriadDelegateBuilder};
pub use error::{Error, Result};
pub use host::{ActivityResult, ActivityResultListener, BackPress, Host};
pub use intent::{Intent, ScreenPayload, ScreenRegistry};
pub use navigator::{Listener, ResetPolicy, Triad, WeakTriad};
pub use presenter::{Presenter, PresenterSlot};
pub use screen::{Lifecycle, Screen, ScreenHandle, ScreenName};
pub use view::{Container, View, ViewRef, ViewState};
