//! Global configuration: the enabled flag and the global style tree.

use std::cell::RefCell;
use std::rc::Rc;

use fcss::{CompileError, StyleTree};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreWriteError;
use crate::signal::{Signal, Subscription};
use crate::store::SettingsStorage;

pub use fcss::ROOT;

pub const CODE_FONT_FAMILY: &str = "--jp-code-font-family";
pub const CODE_FONT_SIZE: &str = "--jp-code-font-size";
pub const CODE_LINE_HEIGHT: &str = "--jp-code-line-height";

pub const CODE_FONT_FAMILY_DEFAULT: &str = "Source Code Pro";
pub const CODE_FONT_FAMILY_FALLBACK: &str = "monospace";
pub const CODE_FONT_SIZE_DEFAULT: &str = "13px";
pub const CODE_LINE_HEIGHT_DEFAULT: &str = "1.3077";

/// Metadata key under which documents keep their overrides.
pub const METADATA_NAMESPACE: &str = "@deathbeds/jupyterlab-fonts";

pub const ENABLED_KEY: &str = "enabled";
pub const STYLES_KEY: &str = "styles";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfiguration {
    pub enabled: bool,
    pub styles: StyleTree,
}

impl FontConfiguration {
    /// Reads the configuration out of `storage`.
    ///
    /// A missing or non-boolean `enabled` is `false`; missing styles are an
    /// empty tree. Styles that are not a mapping fail.
    pub fn from_storage(storage: &dyn SettingsStorage) -> Result<Self, CompileError> {
        let enabled = storage
            .get(ENABLED_KEY)
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        let styles = StyleTree::from_optional_json(storage.get(STYLES_KEY).as_ref())?;
        Ok(Self { enabled, styles })
    }
}

/// Engine-wide options fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    pub namespace: String,
    pub default_family: String,
    pub fallback_family: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            namespace: METADATA_NAMESPACE.to_string(),
            default_family: CODE_FONT_FAMILY_DEFAULT.to_string(),
            fallback_family: CODE_FONT_FAMILY_FALLBACK.to_string(),
        }
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_default_family(mut self, family: impl Into<String>) -> Self {
        self.default_family = family.into();
        self
    }

    pub fn with_fallback_family(mut self, family: impl Into<String>) -> Self {
        self.fallback_family = family.into();
        self
    }
}

/// Typed access to the global configuration in a [`SettingsStorage`].
///
/// Storage may arrive late or be swapped out. While detached, reads return
/// the default configuration and writes fail with
/// [`StoreWriteError::Unavailable`].
pub struct ConfigStore {
    storage: RefCell<Option<Rc<dyn SettingsStorage>>>,
    changed: Signal<()>,
    upstream: RefCell<Option<Subscription>>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self {
            storage: RefCell::new(None),
            changed: Signal::new(),
            upstream: RefCell::new(None),
        }
    }

    /// Replaces the backing storage and notifies listeners.
    pub fn attach(&self, storage: Option<Rc<dyn SettingsStorage>>) {
        let upstream = storage.as_ref().map(|storage| {
            let changed = self.changed.clone();
            storage.subscribe(Box::new(move || changed.emit(&())))
        });
        // Drop the old subscription outside the borrow.
        let previous = self.upstream.replace(upstream);
        drop(previous);
        *self.storage.borrow_mut() = storage;
        let state = if self.is_attached() { "attached" } else { "detached" };
        log::debug!("settings storage {state}");
        self.changed.emit(&());
    }

    pub fn is_attached(&self) -> bool {
        self.storage.borrow().is_some()
    }

    fn storage(&self) -> Option<Rc<dyn SettingsStorage>> {
        self.storage.borrow().clone()
    }

    pub fn load(&self) -> Result<FontConfiguration, CompileError> {
        match self.storage() {
            Some(storage) => FontConfiguration::from_storage(storage.as_ref()),
            None => Ok(FontConfiguration::default()),
        }
    }

    /// Like [`ConfigStore::load`], but malformed styles read as empty.
    pub fn get(&self) -> FontConfiguration {
        match self.load() {
            Ok(config) => config,
            Err(err) => {
                log::debug!("ignoring stored global styles: {err}");
                FontConfiguration {
                    enabled: self.enabled(),
                    styles: StyleTree::new(),
                }
            }
        }
    }

    pub fn enabled(&self) -> bool {
        self.storage()
            .and_then(|storage| storage.get(ENABLED_KEY))
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    pub fn set(&self, config: &FontConfiguration) -> Result<(), StoreWriteError> {
        self.set_enabled(config.enabled)?;
        self.set_styles(&config.styles)
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), StoreWriteError> {
        self.write(ENABLED_KEY, Value::Bool(enabled))
    }

    pub fn set_styles(&self, styles: &StyleTree) -> Result<(), StoreWriteError> {
        self.write(STYLES_KEY, styles.to_json())
    }

    fn write(&self, key: &str, value: Value) -> Result<(), StoreWriteError> {
        let storage = self.storage().ok_or(StoreWriteError::Unavailable)?;
        storage.set(key, value).inspect_err(|err| {
            log::warn!("failed to write global setting {key}: {err}");
        })
    }

    /// Notifies `listener` whenever the stored configuration may have changed.
    pub fn on_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.changed.connect(move |_| listener())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySettings;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn test_detached_store_reads_defaults() {
        let store = ConfigStore::new();
        assert_eq!(store.get(), FontConfiguration::default());
        assert!(!store.enabled());
        assert_eq!(store.set_enabled(true), Err(StoreWriteError::Unavailable));
    }

    #[test]
    fn test_reads_and_writes_through_storage() {
        let settings = Rc::new(MemorySettings::new());
        let store = ConfigStore::new();
        store.attach(Some(settings.clone()));

        let styles = StyleTree::new().with(ROOT, StyleTree::new().with(CODE_FONT_SIZE, "14px"));
        store
            .set(&FontConfiguration {
                enabled: true,
                styles: styles.clone(),
            })
            .unwrap();

        assert_eq!(settings.value(ENABLED_KEY), Some(json!(true)));
        assert_eq!(store.get(), FontConfiguration { enabled: true, styles });
    }

    #[test]
    fn test_malformed_styles_degrade_to_empty() {
        let settings = Rc::new(
            MemorySettings::new()
                .with_value(ENABLED_KEY, json!(true))
                .with_value(STYLES_KEY, json!("nope")),
        );
        let store = ConfigStore::new();
        store.attach(Some(settings));

        assert!(store.load().is_err());
        assert_eq!(
            store.get(),
            FontConfiguration {
                enabled: true,
                styles: StyleTree::new(),
            }
        );
    }

    #[test]
    fn test_change_notifications() {
        let settings = Rc::new(MemorySettings::new());
        let store = ConfigStore::new();
        let calls = Rc::new(Cell::new(0));
        let sink = Rc::clone(&calls);
        let _sub = store.on_change(move || sink.set(sink.get() + 1));

        store.attach(Some(settings.clone()));
        assert_eq!(calls.get(), 1);

        settings.set(ENABLED_KEY, json!(true)).unwrap();
        assert_eq!(calls.get(), 2);

        store.attach(None);
        assert_eq!(calls.get(), 3);

        // Detached storage no longer reaches our listeners.
        settings.set(ENABLED_KEY, json!(false)).unwrap();
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_configuration_deserializes_with_defaults() {
        let config: FontConfiguration = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FontConfiguration::default());

        let config: FontConfiguration =
            serde_json::from_str(r#"{"enabled": true, "styles": {":root": {"color": "red"}}}"#)
                .unwrap();
        assert!(config.enabled);
        assert_eq!(config.styles.lookup(&[ROOT, "color"]), Ok("red"));
    }
}
