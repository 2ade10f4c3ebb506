//! Deep links: intent payloads that describe a screen or a whole backstack,
//! and the registry that turns them into screens.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    backstack::Backstack,
    error::{Error, Result},
    screen::{Screen, ScreenHandle, ScreenName},
};

/// Extra holding a single [`ScreenPayload`].
pub const SCREEN_EXTRA: &str = "triad.screen";
/// Extra holding a list of [`ScreenPayload`]s, bottom first.
pub const BACKSTACK_EXTRA: &str = "triad.backstack";

/// A message delivered to a host: an optional action plus JSON extras.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// What the intent asks for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Named payloads.
    #[serde(default)]
    pub extras: BTreeMap<String, Value>,
}

impl Intent {
    /// Construct an empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an intent with an action.
    pub fn with_action(action: &str) -> Self {
        Self {
            action: Some(action.to_string()),
            extras: BTreeMap::new(),
        }
    }

    /// An intent that deep-links to a single screen.
    pub fn for_screen(payload: &ScreenPayload) -> Result<Self> {
        let mut intent = Self::new();
        intent.put_extra(SCREEN_EXTRA, payload)?;
        Ok(intent)
    }

    /// An intent that deep-links to a backstack, given bottom first.
    pub fn for_backstack(payloads: &[ScreenPayload]) -> Result<Self> {
        let mut intent = Self::new();
        intent.put_extra(BACKSTACK_EXTRA, &payloads)?;
        Ok(intent)
    }

    /// Store an extra, replacing any previous value.
    pub fn put_extra<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.extras
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Decode the extra stored under `key`.
    pub fn extra<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.extras.get(key) {
            Some(v) => Ok(Some(T::deserialize(v)?)),
            None => Ok(None),
        }
    }

    /// True if the intent carries a screen or backstack deep link.
    pub fn has_deep_link(&self) -> bool {
        self.extras.contains_key(SCREEN_EXTRA) || self.extras.contains_key(BACKSTACK_EXTRA)
    }
}

/// A serializable description of one screen: a registry key plus arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenPayload {
    /// Registry key.
    pub key: String,
    /// Arguments handed to the factory.
    #[serde(default)]
    pub args: Value,
}

impl ScreenPayload {
    /// A payload without arguments.
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            args: Value::Null,
        }
    }

    /// A payload with serialized arguments.
    pub fn with_args<T: Serialize>(key: &str, args: &T) -> Result<Self> {
        Ok(Self {
            key: key.to_string(),
            args: serde_json::to_value(args)?,
        })
    }
}

/// Builds a screen from payload arguments.
type Factory<C> = Box<dyn Fn(&Value) -> Result<ScreenHandle<C>>>;

/// Maps payload keys to screen factories.
pub struct ScreenRegistry<C> {
    /// Registered factories.
    factories: HashMap<ScreenName, Factory<C>>,
}

impl<C> Default for ScreenRegistry<C> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<C> fmt::Debug for ScreenRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.factories.keys().collect();
        keys.sort();
        f.debug_struct("ScreenRegistry")
            .field("keys", &keys)
            .finish()
    }
}

impl<C: 'static> ScreenRegistry<C> {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory that receives raw JSON arguments. Keys must be valid
    /// screen names. A later registration replaces an earlier one.
    pub fn register<F>(&mut self, key: &str, factory: F) -> Result<&mut Self>
    where
        F: Fn(&Value) -> Result<ScreenHandle<C>> + 'static,
    {
        let name: ScreenName = key.parse()?;
        if self.factories.insert(name, Box::new(factory)).is_some() {
            debug!(key, "replacing screen factory");
        }
        Ok(self)
    }

    /// Register a factory with typed arguments. Missing arguments decode from
    /// `null`.
    pub fn register_with<A, S, F>(&mut self, key: &str, factory: F) -> Result<&mut Self>
    where
        A: DeserializeOwned,
        S: Screen<C> + 'static,
        F: Fn(A) -> S + 'static,
    {
        self.register(key, move |args| {
            let args = A::deserialize(args)?;
            Ok(ScreenHandle::new(factory(args)))
        })
    }

    /// The factory registered under `key`.
    fn factory(&self, key: &str) -> Option<&Factory<C>> {
        let name: ScreenName = key.parse().ok()?;
        self.factories.get(&name)
    }

    /// True if `key` has a factory.
    pub fn contains(&self, key: &str) -> bool {
        self.factory(key).is_some()
    }

    /// Build the screen described by `payload`.
    pub fn build(&self, payload: &ScreenPayload) -> Result<ScreenHandle<C>> {
        let factory = self
            .factory(&payload.key)
            .ok_or_else(|| Error::UnknownScreen(payload.key.clone()))?;
        factory(&payload.args)
    }

    /// Build the screen an intent deep-links to, if any. Unknown or malformed
    /// payloads are logged and ignored.
    pub fn create_screen(&self, intent: &Intent) -> Option<ScreenHandle<C>> {
        let payload = match intent.extra::<ScreenPayload>(SCREEN_EXTRA) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "malformed screen payload");
                return None;
            }
        };
        match self.build(&payload) {
            Ok(screen) => Some(screen),
            Err(e) => {
                warn!(key = %payload.key, error = %e, "ignoring screen deep link");
                None
            }
        }
    }

    /// Build the backstack an intent deep-links to, if any. The whole payload
    /// is ignored if any entry fails, or if it is empty.
    pub fn create_backstack(&self, intent: &Intent) -> Option<Backstack<C>> {
        let payloads = match intent.extra::<Vec<ScreenPayload>>(BACKSTACK_EXTRA) {
            Ok(Some(payloads)) => payloads,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "malformed backstack payload");
                return None;
            }
        };
        if payloads.is_empty() {
            warn!("ignoring empty backstack deep link");
            return None;
        }
        match payloads
            .iter()
            .map(|p| self.build(p))
            .collect::<Result<Backstack<C>>>()
        {
            Ok(backstack) => Some(backstack),
            Err(e) => {
                warn!(error = %e, "ignoring backstack deep link");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::testing::{Journal, TestScreen};

    #[derive(Deserialize)]
    struct DetailArgs {
        id: u32,
    }

    fn registry(journal: &Journal) -> ScreenRegistry<()> {
        let mut registry = ScreenRegistry::new();
        let j = journal.clone();
        registry
            .register("home", move |_| Ok(TestScreen::new("home", &j).into()))
            .unwrap();
        let j = journal.clone();
        registry
            .register_with("detail", move |args: DetailArgs| {
                TestScreen::new(&format!("detail_{}", args.id), &j)
            })
            .unwrap();
        registry
    }

    #[test]
    fn keys_must_be_screen_names() {
        let journal = Journal::new();
        let mut registry = registry(&journal);
        let j = journal.clone();
        assert!(matches!(
            registry.register("Not Valid", move |_| Ok(TestScreen::new("x", &j).into())),
            Err(Error::InvalidName(_))
        ));
        assert!(registry.contains("home"));
        assert!(!registry.contains("x"));
    }

    #[test]
    fn single_screen_deep_link() -> Result<()> {
        let journal = Journal::new();
        let registry = registry(&journal);

        let payload = ScreenPayload::with_args("detail", &json!({"id": 7}))?;
        let intent = Intent::for_screen(&payload)?;
        assert!(intent.has_deep_link());
        let screen = registry.create_screen(&intent);
        assert_eq!(screen.map(|s| s.name().to_string()), Some("detail_7".into()));
        assert!(registry.create_backstack(&intent).is_none());
        Ok(())
    }

    #[test]
    fn backstack_deep_link() -> Result<()> {
        let journal = Journal::new();
        let registry = registry(&journal);
        let intent = Intent::for_backstack(&[
            ScreenPayload::new("home"),
            ScreenPayload::with_args("detail", &json!({"id": 1}))?,
        ])?;
        let backstack = registry.create_backstack(&intent);
        assert_eq!(
            backstack.map(|b| b.names()),
            Some(vec!["home".to_string(), "detail_1".to_string()])
        );
        Ok(())
    }

    #[test]
    fn bad_payloads_are_ignored() -> Result<()> {
        let journal = Journal::new();
        let registry = registry(&journal);

        assert!(registry.create_screen(&Intent::new()).is_none());
        assert!(!Intent::with_action("view").has_deep_link());

        let unknown = Intent::for_screen(&ScreenPayload::new("settings"))?;
        assert!(registry.create_screen(&unknown).is_none());
        assert!(matches!(
            registry.build(&ScreenPayload::new("settings")),
            Err(Error::UnknownScreen(_))
        ));

        // Missing required arguments.
        let bad_args = Intent::for_screen(&ScreenPayload::new("detail"))?;
        assert!(registry.create_screen(&bad_args).is_none());

        let mut malformed = Intent::new();
        malformed.put_extra(SCREEN_EXTRA, &42)?;
        assert!(registry.create_screen(&malformed).is_none());

        let partial =
            Intent::for_backstack(&[ScreenPayload::new("home"), ScreenPayload::new("nope")])?;
        assert!(registry.create_backstack(&partial).is_none());
        assert!(registry.create_backstack(&Intent::for_backstack(&[])?).is_none());
        Ok(())
    }

    #[test]
    fn intents_serialize() -> Result<()> {
        let intent = Intent::for_screen(&ScreenPayload::new("home"))?;
        let text = serde_json::to_string(&intent)?;
        assert!(!text.contains("action"));
        let back: Intent = serde_json::from_str(&text)?;
        assert_eq!(back, intent);
        assert_eq!(
            back.extra::<ScreenPayload>(SCREEN_EXTRA)?,
            Some(ScreenPayload::new("home"))
        );

        let bare: Intent = serde_json::from_str(r#"{"action":"view"}"#)?;
        assert_eq!(bare, Intent::with_action("view"));
        Ok(())
    }
}
