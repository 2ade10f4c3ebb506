//! Fakes and recorders for exercising navigation without a real toolkit.
//!
//! Everything here records into a shared [`Journal`], so a test can drive the
//! navigator or a delegate and then assert on the exact sequence of lifecycle
//! and transition events.

/// Deferred and declining animators.
pub mod animator;
/// Fake hosts, containers and views.
pub mod fakes;
/// The shared event journal.
pub mod journal;
/// A listener that records transitions.
pub mod listener;
/// A configurable screen.
pub mod screen;

pub use animator::ManualAnimator;
pub use fakes::{FakeContainer, FakeHost, FakeView};
pub use journal::Journal;
pub use listener::RecordingListener;
pub use screen::TestScreen;
