//! Views, the container that hosts them, and saved view state.

use std::{any::type_name, collections::BTreeMap, rc::Rc};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Result;

/// Shared handle to a view.
pub type ViewRef = Rc<dyn View>;

/// A view produced by a screen and hosted in a [`Container`].
///
/// Views are owned by the host toolkit. Triad only moves them in and out of the
/// container and asks them to save and restore transient state.
pub trait View {
    /// Write transient state that should survive the screen being covered.
    fn save_state(&self, _state: &mut ViewState) -> Result<()> {
        Ok(())
    }

    /// Restore state written by [`View::save_state`].
    fn restore_state(&self, _state: &ViewState) {}

    /// Name used in logs.
    fn name(&self) -> String {
        let name = type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name).to_string()
    }
}

/// The content area screens are drawn into.
///
/// All methods take `&self`: the container is shared between the delegate and
/// whichever animator is running, and toolkits mutate views through handles.
pub trait Container {
    /// The view currently shown, if any. With several children this is the
    /// first one.
    fn current_view(&self) -> Option<ViewRef>;

    /// Add a view on top of the existing children.
    fn add_view(&self, view: ViewRef);

    /// Remove a view. Removing a view that is not a child is a no-op.
    fn remove_view(&self, view: &ViewRef);
}

/// Compare two views by identity.
pub fn same_view(a: &ViewRef, b: &ViewRef) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

/// An opaque bag of transient view state, keyed by string.
///
/// Values are stored as JSON so views can keep whatever serializable state they
/// like without the navigator knowing its shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Stored entries.
    entries: BTreeMap<String, Value>,
}

impl ViewState {
    /// Construct an empty state bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`, replacing any previous value.
    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.entries
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Fetch and decode the value stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.entries.get(key) {
            Some(v) => Ok(Some(T::deserialize(v)?)),
            None => Ok(None),
        }
    }

    /// Remove the value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl View for Plain {}

    #[test]
    fn viewstate_typed_access() -> Result<()> {
        let mut state = ViewState::new();
        assert!(state.is_empty());
        state.put("scroll", &42u32)?;
        state.put("query", &"rust")?;
        assert_eq!(state.get::<u32>("scroll")?, Some(42));
        assert_eq!(state.get::<String>("query")?, Some("rust".to_string()));
        assert_eq!(state.get::<u32>("missing")?, None);
        assert!(state.get::<u32>("query").is_err());
        assert!(state.remove("query").is_some());
        assert_eq!(state.len(), 1);
        Ok(())
    }

    #[test]
    fn view_identity_and_name() {
        let a: ViewRef = Rc::new(Plain);
        let b: ViewRef = Rc::new(Plain);
        assert!(same_view(&a, &a.clone()));
        assert!(!same_view(&a, &b));
        assert_eq!(a.name(), "Plain");
    }
}
