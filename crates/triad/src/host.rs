//! The host boundary: what the windowing system provides and receives.

use std::rc::Rc;

use crate::{intent::Intent, view::Container};

/// Result code reported when an activity completed successfully.
pub const RESULT_OK: i32 = -1;
/// Result code reported when an activity was cancelled.
pub const RESULT_CANCELED: i32 = 0;

/// The host window or activity a delegate is bound to.
pub trait Host {
    /// The content area screens are drawn into.
    fn content_container(&self) -> Option<Rc<dyn Container>>;

    /// True if the host is going away for good, as opposed to being recreated
    /// for a configuration change.
    fn is_finishing(&self) -> bool;
}

/// A result delivered back to the host from another activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityResult {
    /// Code the request was started with.
    pub request_code: i32,
    /// Code the finished activity reported.
    pub result_code: i32,
    /// Optional returned data.
    pub data: Option<Intent>,
}

impl ActivityResult {
    /// Construct a result without data.
    pub fn new(request_code: i32, result_code: i32) -> Self {
        Self {
            request_code,
            result_code,
            data: None,
        }
    }

    /// Attach returned data.
    pub fn with_data(mut self, data: Intent) -> Self {
        self.data = Some(data);
        self
    }

    /// True if the result code is [`RESULT_OK`].
    pub fn is_ok(&self) -> bool {
        self.result_code == RESULT_OK
    }
}

/// Capability for screens that want activity results.
pub trait ActivityResultListener {
    /// Receive a result.
    fn on_activity_result(&self, result: &ActivityResult);
}

/// What a host should do after a back press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackPress {
    /// A screen or the navigator consumed the press.
    Handled,
    /// Nothing consumed the press; the host should finish.
    Finish,
}
