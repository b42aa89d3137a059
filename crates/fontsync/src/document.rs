//! Per-document style overrides kept in document metadata.
//!
//! Overrides live at `metadata[namespace].styles`. Other keys under the
//! namespace belong to someone else and survive writes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fcss::{CompileError, StyleTree};
use serde_json::{Map, Value};

use crate::config::STYLES_KEY;
use crate::error::StoreWriteError;
use crate::signal::{Signal, Subscription};
use crate::store::DocumentModel;

pub struct DocumentOverrideStore {
    document: Rc<dyn DocumentModel>,
    id: String,
    namespace: String,
    changed: Signal<()>,
    upstream: RefCell<Option<Subscription>>,
    disposed: Cell<bool>,
}

impl DocumentOverrideStore {
    pub fn new(document: Rc<dyn DocumentModel>, namespace: &str) -> Self {
        let changed = Signal::new();
        let upstream = {
            let changed = changed.clone();
            let namespace = namespace.to_string();
            document.subscribe_metadata(Box::new(move |key: &str| {
                if key == namespace {
                    changed.emit(&());
                }
            }))
        };
        Self {
            id: document.id().to_string(),
            document,
            namespace: namespace.to_string(),
            changed,
            upstream: RefCell::new(Some(upstream)),
            disposed: Cell::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Reads the override tree. Absent overrides are an empty tree.
    pub fn load(&self) -> Result<StyleTree, CompileError> {
        if self.is_disposed() {
            return Ok(StyleTree::new());
        }
        match self.document.metadata(&self.namespace) {
            None | Some(Value::Null) => Ok(StyleTree::new()),
            Some(Value::Object(section)) => StyleTree::from_optional_json(section.get(STYLES_KEY)),
            // Anything else is not a mapping and fails to parse.
            Some(other) => StyleTree::from_json(&other),
        }
    }

    /// Like [`DocumentOverrideStore::load`], but malformed overrides read as empty.
    pub fn get(&self) -> StyleTree {
        self.load().unwrap_or_else(|err| {
            log::debug!("ignoring overrides of document {}: {err}", self.id);
            StyleTree::new()
        })
    }

    /// Replaces the override tree. Does nothing once disposed.
    pub fn set(&self, styles: &StyleTree) -> Result<(), StoreWriteError> {
        if self.is_disposed() {
            log::debug!("ignoring write to disposed document {}", self.id);
            return Ok(());
        }
        let mut section = match self.document.metadata(&self.namespace) {
            Some(Value::Object(section)) => section,
            _ => Map::new(),
        };
        section.insert(STYLES_KEY.to_string(), styles.to_json());
        self.document
            .set_metadata(&self.namespace, Value::Object(section))
            .inspect_err(|err| {
                log::warn!("failed to write overrides of document {}: {err}", self.id);
            })
    }

    pub fn on_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        if self.is_disposed() {
            return Subscription::empty();
        }
        self.changed.connect(move |_| listener())
    }

    /// Stops listening to the document and drops every listener.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let upstream = self.upstream.borrow_mut().take();
        drop(upstream);
        self.changed.clear();
    }
}

impl Drop for DocumentOverrideStore {
    fn drop(&mut self) {
        self.dispose();
    }
}
