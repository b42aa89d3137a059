//! Shared setup for engine integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use fontsync::config::{ENABLED_KEY, METADATA_NAMESPACE};
use fontsync::testing::{
    InjectionLog, MemoryDocument, MemorySettings, MemoryTracker, RecordingTarget,
};
use fontsync::{DocumentModel, FlushReceiver, FontManager, ScopeId, flush};
use serde_json::{Value, json};

/// A manager wired to in-memory stores.
pub struct Harness {
    pub manager: FontManager,
    pub settings: Rc<MemorySettings>,
    pub tracker: MemoryTracker,
    pub log: InjectionLog,
    pub receiver: FlushReceiver,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(MemorySettings::new())
    }

    /// A harness whose global styles are enabled.
    pub fn enabled() -> Self {
        Self::with_settings(MemorySettings::new().with_value(ENABLED_KEY, json!(true)))
    }

    pub fn with_settings(settings: MemorySettings) -> Self {
        let target = RecordingTarget::new();
        let log = target.log();
        let (ctx, receiver) = flush::channel();
        let manager = FontManager::new(Box::new(target), ctx);
        let settings = Rc::new(settings);
        manager.set_settings(Some(settings.clone()));
        let tracker = MemoryTracker::new();
        manager.connect_tracker(&tracker);
        Self {
            manager,
            settings,
            tracker,
            log,
            receiver,
        }
    }

    /// Runs one scheduler turn: takes queued flush requests and flushes.
    pub fn tick(&mut self) -> usize {
        self.receiver.drain();
        self.manager.flush()
    }

    /// Compiled text for a scope, whether or not it was flushed.
    pub fn css(&self, scope: &ScopeId) -> Option<String> {
        self.manager
            .artifact(scope)
            .map(|artifact| artifact.css.to_string())
    }

    pub fn live(&self, scope: &ScopeId) -> Option<String> {
        self.log.live(scope).map(|css| css.to_string())
    }
}

pub fn doc(id: &str) -> ScopeId {
    ScopeId::Document(id.to_string())
}

/// Replaces a document's override section, as another editor would.
pub fn write_section(document: &MemoryDocument, section: Value) {
    document
        .set_metadata(METADATA_NAMESPACE, section)
        .expect("memory document accepts writes");
}
