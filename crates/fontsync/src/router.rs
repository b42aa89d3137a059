//! Turns store change notifications into recompilation.
//!
//! Every subscription closure holds a `Weak` reference to the engine, so
//! dropping the last [`FontManager`](crate::FontManager) tears everything down
//! even while stores are still alive. A scope that is already being
//! recomputed is skipped, which breaks loops where a recompute triggers a
//! change notification for the same scope.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use fcss::{compile, id_selector};

use crate::document::DocumentOverrideStore;
use crate::manager::Engine;
use crate::registry::ScopeId;
use crate::signal::Subscription;
use crate::store::{DocumentId, DocumentModel, DocumentTracker, TrackerEvent};

struct TrackedDocument {
    store: Rc<DocumentOverrideStore>,
    _subscription: Subscription,
}

#[derive(Default)]
pub(crate) struct ChangeRouter {
    documents: HashMap<DocumentId, TrackedDocument>,
    in_flight: HashSet<ScopeId>,
    config_subscription: Option<Subscription>,
    tracker_subscription: Option<Subscription>,
}

impl ChangeRouter {
    pub(crate) fn store(&self, id: &str) -> Option<Rc<DocumentOverrideStore>> {
        self.documents.get(id).map(|tracked| Rc::clone(&tracked.store))
    }

    pub(crate) fn is_tracked(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    pub(crate) fn document_ids(&self) -> Vec<DocumentId> {
        let mut ids: Vec<DocumentId> = self.documents.keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Marks a scope as being recomputed until dropped.
struct InFlight<'a> {
    engine: &'a Engine,
    scope: ScopeId,
}

impl<'a> InFlight<'a> {
    fn enter(engine: &'a Engine, scope: ScopeId) -> Option<Self> {
        if !engine.router.borrow_mut().in_flight.insert(scope.clone()) {
            log::debug!("skipping reentrant recompute of {scope}");
            return None;
        }
        Some(Self { engine, scope })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.engine.router.borrow_mut().in_flight.remove(&self.scope);
    }
}

pub(crate) fn connect_config(engine: &Rc<Engine>) {
    let weak = Rc::downgrade(engine);
    let subscription = engine.config.on_change(move || {
        if let Some(engine) = weak.upgrade() {
            recompute_global(&engine);
        }
    });
    engine.router.borrow_mut().config_subscription = Some(subscription);
}

/// Follows `tracker`, tracking the documents it already has.
pub(crate) fn connect_tracker(engine: &Rc<Engine>, tracker: &dyn DocumentTracker) {
    let weak = Rc::downgrade(engine);
    let subscription = tracker.subscribe(Box::new(move |event: &TrackerEvent| {
        let Some(engine) = weak.upgrade() else {
            return;
        };
        match event {
            TrackerEvent::Added(document) => {
                track(&engine, Rc::clone(document));
            }
            TrackerEvent::Disposed(id) => {
                untrack(&engine, id);
            }
        }
    }));
    let previous = engine
        .router
        .borrow_mut()
        .tracker_subscription
        .replace(subscription);
    drop(previous);

    for document in tracker.documents() {
        track(engine, document);
    }
}

/// Starts tracking `document`. Returns `false` if it already was.
pub(crate) fn track(engine: &Rc<Engine>, document: Rc<dyn DocumentModel>) -> bool {
    let id = document.id().to_string();
    if engine.router.borrow().is_tracked(&id) {
        return false;
    }

    let store = Rc::new(DocumentOverrideStore::new(document, &engine.options.namespace));
    let weak = Rc::downgrade(engine);
    let doc_id = id.clone();
    let subscription = store.on_change(move || {
        if let Some(engine) = weak.upgrade() {
            recompute_document(&engine, &doc_id);
        }
    });
    engine.router.borrow_mut().documents.insert(
        id.clone(),
        TrackedDocument {
            store,
            _subscription: subscription,
        },
    );
    log::debug!("tracking document {id}");

    recompute_document(engine, &id);
    true
}

/// Stops tracking a document and removes its styles. Returns `false` if it
/// was not tracked.
pub(crate) fn untrack(engine: &Engine, id: &str) -> bool {
    let Some(tracked) = engine.router.borrow_mut().documents.remove(id) else {
        return false;
    };
    tracked.store.dispose();
    drop(tracked);

    engine
        .registry
        .borrow_mut()
        .discard(&ScopeId::Document(id.to_string()));
    log::debug!("untracked document {id}");
    true
}

pub(crate) fn recompute_global(engine: &Engine) {
    let Some(_guard) = InFlight::enter(engine, ScopeId::Global) else {
        return;
    };
    // Disabled settings empty the global scope without reading the styles.
    let compiled = if engine.config.enabled() {
        engine
            .config
            .load()
            .map(|config| compile(&config.styles, None))
    } else {
        Ok(String::new())
    };
    engine
        .registry
        .borrow_mut()
        .update(ScopeId::Global, compiled);
}

/// Document overrides apply whether or not the global styles are enabled.
pub(crate) fn recompute_document(engine: &Engine, id: &str) {
    let Some(store) = engine.router.borrow().store(id) else {
        return;
    };
    let scope = ScopeId::Document(id.to_string());
    let Some(_guard) = InFlight::enter(engine, scope.clone()) else {
        return;
    };
    let selector = id_selector(id);
    let compiled = store.load().map(|tree| compile(&tree, Some(&selector)));
    engine.registry.borrow_mut().update(scope, compiled);
}
