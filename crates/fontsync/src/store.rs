//! Capabilities the host provides to the engine.
//!
//! The engine never owns persistent state. Global settings, per-document
//! metadata and the set of open documents all live behind these traits; see
//! [`crate::testing`] for in-memory implementations.

use std::rc::Rc;

use serde_json::Value;

use crate::error::StoreWriteError;
use crate::signal::Subscription;

/// Stable identifier of an open document.
pub type DocumentId = String;

/// Persistent key-value storage for the global configuration.
pub trait SettingsStorage {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value) -> Result<(), StoreWriteError>;

    /// Notifies `listener` after any stored value changes, including changes
    /// made through [`SettingsStorage::set`].
    fn subscribe(&self, listener: Box<dyn Fn()>) -> Subscription;
}

/// An open document with a metadata bag.
pub trait DocumentModel {
    fn id(&self) -> &str;

    fn metadata(&self, key: &str) -> Option<Value>;

    fn set_metadata(&self, key: &str, value: Value) -> Result<(), StoreWriteError>;

    /// Notifies `listener` with the changed key after any metadata change.
    fn subscribe_metadata(&self, listener: Box<dyn Fn(&str)>) -> Subscription;
}

pub enum TrackerEvent {
    Added(Rc<dyn DocumentModel>),
    Disposed(DocumentId),
}

impl std::fmt::Debug for TrackerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerEvent::Added(document) => f.debug_tuple("Added").field(&document.id()).finish(),
            TrackerEvent::Disposed(id) => f.debug_tuple("Disposed").field(id).finish(),
        }
    }
}

/// The host's view of which documents are open.
pub trait DocumentTracker {
    /// Documents open at the time of the call.
    fn documents(&self) -> Vec<Rc<dyn DocumentModel>>;

    fn subscribe(&self, listener: Box<dyn Fn(&TrackerEvent)>) -> Subscription;
}
