//! The engine facade.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use fcss::StyleTree;

use crate::config::{ConfigStore, EngineOptions, FontConfiguration, ROOT};
use crate::document::DocumentOverrideStore;
use crate::error::{FontsError, Result};
use crate::flush::FlushContext;
use crate::options::FontTable;
use crate::registry::{CompiledArtifact, InjectionTarget, ScopeId, StyleRegistry};
use crate::resolve::{self, Properties, Property};
use crate::router::{self, ChangeRouter};
use crate::store::{DocumentId, DocumentModel, DocumentTracker, SettingsStorage};

pub(crate) struct Engine {
    pub(crate) options: EngineOptions,
    pub(crate) config: ConfigStore,
    pub(crate) registry: RefCell<StyleRegistry>,
    pub(crate) router: RefCell<ChangeRouter>,
    pub(crate) fonts: RefCell<FontTable>,
}

/// Keeps scoped code font CSS in sync with the global configuration and
/// every tracked document's overrides.
///
/// Cloning is cheap and every clone drives the same engine. The engine is
/// single-threaded: store notifications recompute synchronously, and writes
/// to the [`InjectionTarget`] wait for [`FontManager::flush`].
#[derive(Clone)]
pub struct FontManager {
    engine: Rc<Engine>,
}

/// A handle that does not keep the engine alive.
#[derive(Clone)]
pub struct WeakFontManager {
    engine: Weak<Engine>,
}

impl WeakFontManager {
    pub fn upgrade(&self) -> Option<FontManager> {
        self.engine.upgrade().map(|engine| FontManager { engine })
    }
}

impl FontManager {
    pub fn new(target: Box<dyn InjectionTarget>, flush: FlushContext) -> Self {
        Self::with_options(EngineOptions::default(), target, flush)
    }

    pub fn with_options(
        options: EngineOptions,
        target: Box<dyn InjectionTarget>,
        flush: FlushContext,
    ) -> Self {
        let engine = Rc::new(Engine {
            options,
            config: ConfigStore::new(),
            registry: RefCell::new(StyleRegistry::new(target, flush)),
            router: RefCell::new(ChangeRouter::default()),
            fonts: RefCell::new(FontTable::new()),
        });
        router::connect_config(&engine);
        router::recompute_global(&engine);
        Self { engine }
    }

    pub fn downgrade(&self) -> WeakFontManager {
        WeakFontManager {
            engine: Rc::downgrade(&self.engine),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.engine.options
    }

    // --- stores -----------------------------------------------------------

    /// Attaches (or detaches) the global settings storage.
    pub fn set_settings(&self, settings: Option<Rc<dyn SettingsStorage>>) {
        self.engine.config.attach(settings);
    }

    /// Tracks every document `tracker` has open now or opens later, and
    /// untracks them when it disposes them.
    pub fn connect_tracker(&self, tracker: &dyn DocumentTracker) {
        router::connect_tracker(&self.engine, tracker);
    }

    pub fn track(&self, document: Rc<dyn DocumentModel>) -> bool {
        router::track(&self.engine, document)
    }

    pub fn untrack(&self, id: &str) -> bool {
        router::untrack(&self.engine, id)
    }

    pub fn is_tracked(&self, id: &str) -> bool {
        self.engine.router.borrow().is_tracked(id)
    }

    /// Ids of tracked documents, sorted.
    pub fn tracked_documents(&self) -> Vec<DocumentId> {
        self.engine.router.borrow().document_ids()
    }

    // --- global configuration ---------------------------------------------

    pub fn enabled(&self) -> bool {
        self.engine.config.enabled()
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        Ok(self.engine.config.set_enabled(enabled)?)
    }

    pub fn configuration(&self) -> FontConfiguration {
        self.engine.config.get()
    }

    pub fn set_global_styles(&self, styles: &StyleTree) -> Result<()> {
        Ok(self.engine.config.set_styles(styles)?)
    }

    // --- document overrides -----------------------------------------------

    pub fn document_styles(&self, id: &str) -> Result<StyleTree> {
        let store = self.document_store(id)?;
        Ok(store.load()?)
    }

    pub fn set_document_styles(&self, id: &str, styles: &StyleTree) -> Result<()> {
        let store = self.document_store(id)?;
        Ok(store.set(styles)?)
    }

    /// Which typography properties a document overrides.
    pub fn document_overrides(&self, id: &str) -> Result<Properties> {
        let store = self.document_store(id)?;
        Ok(Properties::set_in(&store.get()))
    }

    fn document_store(&self, id: &str) -> Result<Rc<DocumentOverrideStore>> {
        self.engine
            .router
            .borrow()
            .store(id)
            .ok_or_else(|| FontsError::UnknownDocument(id.to_string()))
    }

    // --- resolved values --------------------------------------------------

    /// The effective value of `property`, for `document` if given.
    ///
    /// An untracked document has no overrides and resolves like the global scope.
    pub fn value(&self, document: Option<&str>, property: Property) -> String {
        let overrides = document
            .and_then(|id| self.engine.router.borrow().store(id))
            .map(|store| store.get());
        let global = self.engine.config.get().styles;
        resolve::resolve(property, overrides.as_ref(), &global, &self.engine.options)
    }

    /// The CSS text stored for `property` in the global styles, if any.
    ///
    /// This does not depend on whether the global styles are enabled.
    pub fn global_value(&self, property: Property) -> Option<String> {
        let global = self.engine.config.get().styles;
        global
            .lookup(&[ROOT, property.key()])
            .ok()
            .map(str::to_string)
    }

    /// Writes `property` to `document`'s overrides, or to the global styles
    /// when no document is given. `None` removes the value so it inherits.
    pub fn set_value(
        &self,
        document: Option<&str>,
        property: Property,
        value: Option<&str>,
    ) -> Result<()> {
        let options = &self.engine.options;
        match document {
            Some(id) => {
                let store = self.document_store(id)?;
                let mut styles = store.get();
                let encoded = value.and_then(|v| resolve::encode_document(property, v, options));
                styles.set_path(&[ROOT, property.key()], encoded);
                Ok(store.set(&styles)?)
            }
            None => {
                let mut styles = self.engine.config.get().styles;
                let encoded = value.and_then(|v| resolve::encode_global(property, v, options));
                styles.set_path(&[ROOT, property.key()], encoded);
                Ok(self.engine.config.set_styles(&styles)?)
            }
        }
    }

    pub fn code_font_family(&self, document: Option<&str>) -> String {
        self.value(document, Property::FontFamily)
    }

    pub fn set_code_font_family(&self, document: Option<&str>, family: Option<&str>) -> Result<()> {
        self.set_value(document, Property::FontFamily, family)
    }

    pub fn code_font_size(&self, document: Option<&str>) -> String {
        self.value(document, Property::FontSize)
    }

    pub fn set_code_font_size(&self, document: Option<&str>, size: Option<&str>) -> Result<()> {
        self.set_value(document, Property::FontSize, size)
    }

    pub fn code_line_height(&self, document: Option<&str>) -> String {
        self.value(document, Property::LineHeight)
    }

    pub fn set_code_line_height(&self, document: Option<&str>, ratio: Option<&str>) -> Result<()> {
        self.set_value(document, Property::LineHeight, ratio)
    }

    // --- fonts --------------------------------------------------------------

    pub fn register_font(&self, name: &str, variants: &[&str]) {
        self.engine.fonts.borrow_mut().register(name, variants);
    }

    pub fn fonts(&self) -> FontTable {
        self.engine.fonts.borrow().clone()
    }

    pub fn font_choices(&self) -> Vec<Option<String>> {
        self.engine.fonts.borrow().choices()
    }

    // --- injection ------------------------------------------------------------

    /// Writes pending CSS to the injection target. Returns the number of writes.
    pub fn flush(&self) -> usize {
        self.engine.registry.borrow_mut().flush()
    }

    pub fn artifact(&self, scope: &ScopeId) -> Option<CompiledArtifact> {
        self.engine.registry.borrow().artifact(scope).cloned()
    }

    pub fn artifact_count(&self) -> usize {
        self.engine.registry.borrow().len()
    }

    pub fn pending_writes(&self) -> usize {
        self.engine.registry.borrow().pending()
    }
}
