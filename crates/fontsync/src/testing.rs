//! In-memory hosts for testing code built on the engine.
//!
//! These implement the capability traits in [`crate::store`] and
//! [`crate::registry::InjectionTarget`] with plain collections, so a whole
//! engine can be driven without a real settings service or document model.
//!
//! ```
//! use std::rc::Rc;
//! use fontsync::testing::{MemorySettings, MemoryTracker, RecordingTarget};
//! use fontsync::{flush, FontManager};
//!
//! let target = RecordingTarget::new();
//! let log = target.log();
//! let (ctx, _receiver) = flush::channel();
//! let manager = FontManager::new(Box::new(target), ctx);
//! manager.set_settings(Some(Rc::new(MemorySettings::new())));
//!
//! let tracker = MemoryTracker::new();
//! manager.connect_tracker(&tracker);
//! tracker.open("nb-1");
//! assert!(manager.is_tracked("nb-1"));
//! assert_eq!(log.write_count(), 0);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::StoreWriteError;
use crate::registry::{InjectionTarget, ScopeId};
use crate::signal::{Signal, Subscription};
use crate::store::{DocumentModel, DocumentTracker, SettingsStorage, TrackerEvent};

// =============================================================================
// Settings
// =============================================================================

#[derive(Default)]
pub struct MemorySettings {
    values: RefCell<HashMap<String, Value>>,
    changed: Signal<()>,
    reject_writes: Cell<bool>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, key: &str, value: Value) -> Self {
        self.values.borrow_mut().insert(key.to_string(), value);
        self
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    /// Makes every following write fail with [`StoreWriteError::Rejected`].
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    pub fn listener_count(&self) -> usize {
        self.changed.listener_count()
    }
}

impl SettingsStorage for MemorySettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.value(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreWriteError> {
        if self.reject_writes.get() {
            return Err(StoreWriteError::Rejected {
                key: key.to_string(),
                reason: "read-only".to_string(),
            });
        }
        self.values.borrow_mut().insert(key.to_string(), value);
        self.changed.emit(&());
        Ok(())
    }

    fn subscribe(&self, listener: Box<dyn Fn()>) -> Subscription {
        self.changed.connect(move |_| listener())
    }
}

// =============================================================================
// Documents
// =============================================================================

pub struct MemoryDocument {
    id: String,
    metadata: RefCell<Map<String, Value>>,
    changed: Signal<String>,
    reject_writes: Cell<bool>,
}

impl MemoryDocument {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            metadata: RefCell::new(Map::new()),
            changed: Signal::new(),
            reject_writes: Cell::new(false),
        }
    }

    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    pub fn listener_count(&self) -> usize {
        self.changed.listener_count()
    }
}

impl DocumentModel for MemoryDocument {
    fn id(&self) -> &str {
        &self.id
    }

    fn metadata(&self, key: &str) -> Option<Value> {
        self.metadata.borrow().get(key).cloned()
    }

    fn set_metadata(&self, key: &str, value: Value) -> Result<(), StoreWriteError> {
        if self.reject_writes.get() {
            return Err(StoreWriteError::Rejected {
                key: key.to_string(),
                reason: "document is read-only".to_string(),
            });
        }
        self.metadata.borrow_mut().insert(key.to_string(), value);
        self.changed.emit(&key.to_string());
        Ok(())
    }

    fn subscribe_metadata(&self, listener: Box<dyn Fn(&str)>) -> Subscription {
        self.changed.connect(move |key: &String| listener(key.as_str()))
    }
}

// =============================================================================
// Tracker
// =============================================================================

#[derive(Default)]
pub struct MemoryTracker {
    documents: RefCell<Vec<Rc<MemoryDocument>>>,
    events: Signal<TrackerEvent>,
}

impl MemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new document and announces it.
    pub fn open(&self, id: &str) -> Rc<MemoryDocument> {
        let document = Rc::new(MemoryDocument::new(id));
        self.documents.borrow_mut().push(Rc::clone(&document));
        self.events.emit(&TrackerEvent::Added(document.clone()));
        document
    }

    /// Closes a document. Returns `false` if it was not open.
    pub fn close(&self, id: &str) -> bool {
        let removed = {
            let mut documents = self.documents.borrow_mut();
            let before = documents.len();
            documents.retain(|document| document.id() != id);
            before != documents.len()
        };
        if removed {
            self.events.emit(&TrackerEvent::Disposed(id.to_string()));
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    pub fn get(&self, id: &str) -> Option<Rc<MemoryDocument>> {
        self.documents
            .borrow()
            .iter()
            .find(|document| document.id() == id)
            .cloned()
    }
}

impl DocumentTracker for MemoryTracker {
    fn documents(&self) -> Vec<Rc<dyn DocumentModel>> {
        self.documents
            .borrow()
            .iter()
            .map(|document| Rc::clone(document) as Rc<dyn DocumentModel>)
            .collect()
    }

    fn subscribe(&self, listener: Box<dyn Fn(&TrackerEvent)>) -> Subscription {
        self.events.connect(move |event| listener(event))
    }
}

// =============================================================================
// Injection
// =============================================================================

#[derive(Default)]
struct Recorded {
    live: HashMap<ScopeId, Rc<str>>,
    writes: Vec<(ScopeId, Rc<str>)>,
    removals: Vec<ScopeId>,
}

/// Shared view of what a [`RecordingTarget`] received.
#[derive(Clone, Default)]
pub struct InjectionLog {
    recorded: Rc<RefCell<Recorded>>,
}

impl InjectionLog {
    /// The text currently live for `scope`.
    pub fn live(&self, scope: &ScopeId) -> Option<Rc<str>> {
        self.recorded.borrow().live.get(scope).cloned()
    }

    pub fn write_count(&self) -> usize {
        self.recorded.borrow().writes.len()
    }

    pub fn writes_for(&self, scope: &ScopeId) -> Vec<Rc<str>> {
        self.recorded
            .borrow()
            .writes
            .iter()
            .filter(|(s, _)| s == scope)
            .map(|(_, css)| Rc::clone(css))
            .collect()
    }

    pub fn removals(&self) -> Vec<ScopeId> {
        self.recorded.borrow().removals.clone()
    }
}

/// An [`InjectionTarget`] that records every write.
#[derive(Default)]
pub struct RecordingTarget {
    log: InjectionLog,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> InjectionLog {
        self.log.clone()
    }
}

impl InjectionTarget for RecordingTarget {
    fn inject(&mut self, scope: &ScopeId, css: Rc<str>) {
        let mut recorded = self.log.recorded.borrow_mut();
        recorded.live.insert(scope.clone(), Rc::clone(&css));
        recorded.writes.push((scope.clone(), css));
    }

    fn remove(&mut self, scope: &ScopeId) {
        let mut recorded = self.log.recorded.borrow_mut();
        recorded.live.remove(scope);
        recorded.removals.push(scope.clone());
    }
}
