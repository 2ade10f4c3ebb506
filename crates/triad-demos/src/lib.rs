//! A scripted mail client used to demonstrate triad navigation.

/// Mail screens, their presenter and the deep-link registry.
pub mod mail;
/// Scripted commands and the demo driver.
pub mod script;
/// An in-memory host, stage and text views.
pub mod stage;

#[cfg(test)]
mod tests;
