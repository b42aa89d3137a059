//! Compiled CSS per scope, and its injection into the host.
//!
//! The registry holds at most one [`CompiledArtifact`] per [`ScopeId`]: one
//! for the global styles and one for each tracked document. Writes to the
//! [`InjectionTarget`] are deferred until [`StyleRegistry::flush`], and a scope
//! whose text did not change is never written again.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use fcss::CompileError;

use crate::flush::FlushContext;
use crate::store::DocumentId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeId {
    Global,
    Document(DocumentId),
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeId::Global => write!(f, "global"),
            ScopeId::Document(id) => write!(f, "document {id}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledArtifact {
    pub scope: ScopeId,
    pub css: Rc<str>,
}

/// Where compiled CSS ends up, e.g. one `<style>` element per scope.
pub trait InjectionTarget {
    /// Replaces the live text for `scope`.
    fn inject(&mut self, scope: &ScopeId, css: Rc<str>);

    fn remove(&mut self, scope: &ScopeId);
}

pub struct StyleRegistry {
    artifacts: BTreeMap<ScopeId, CompiledArtifact>,
    /// Text currently live in the target.
    injected: HashMap<ScopeId, Rc<str>>,
    pending: BTreeSet<ScopeId>,
    target: Box<dyn InjectionTarget>,
    flush: FlushContext,
    flush_requested: bool,
}

impl StyleRegistry {
    pub fn new(target: Box<dyn InjectionTarget>, flush: FlushContext) -> Self {
        Self {
            artifacts: BTreeMap::new(),
            injected: HashMap::new(),
            pending: BTreeSet::new(),
            target,
            flush,
            flush_requested: false,
        }
    }

    pub fn artifact(&self, scope: &ScopeId) -> Option<&CompiledArtifact> {
        self.artifacts.get(scope)
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &CompiledArtifact> {
        self.artifacts.values()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn injected(&self, scope: &ScopeId) -> Option<Rc<str>> {
        self.injected.get(scope).cloned()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Records a compile result for `scope`. Returns whether the artifact changed.
    ///
    /// A failed compile keeps the previous artifact in place.
    pub fn update(&mut self, scope: ScopeId, compiled: Result<String, CompileError>) -> bool {
        let css = match compiled {
            Ok(css) => css,
            Err(err) => {
                log::error!("failed to compile styles for {scope}: {err}");
                return false;
            }
        };
        if let Some(current) = self.artifacts.get(&scope) {
            if *current.css == *css {
                return false;
            }
        }
        log::debug!("styles for {scope} changed");
        self.artifacts.insert(
            scope.clone(),
            CompiledArtifact {
                scope: scope.clone(),
                css: Rc::from(css),
            },
        );
        self.pending.insert(scope);
        self.schedule();
        true
    }

    fn schedule(&mut self) {
        if self.flush_requested {
            return;
        }
        if self.flush.request() {
            self.flush_requested = true;
        } else {
            log::debug!("no flush receiver; styles stay pending until flushed");
        }
    }

    /// Drops the artifact for `scope` and removes its text from the target.
    pub fn discard(&mut self, scope: &ScopeId) -> bool {
        self.pending.remove(scope);
        let existed = self.artifacts.remove(scope).is_some();
        if self.injected.remove(scope).is_some() {
            self.target.remove(scope);
        }
        existed
    }

    /// Writes every pending artifact to the target. Returns the number of writes.
    pub fn flush(&mut self) -> usize {
        self.flush_requested = false;
        let mut writes = 0;
        for scope in std::mem::take(&mut self.pending) {
            let Some(artifact) = self.artifacts.get(&scope) else {
                continue;
            };
            let live = self.injected.get(&scope).map(|css| &**css).unwrap_or("");
            if live == &*artifact.css {
                continue;
            }
            let css = Rc::clone(&artifact.css);
            self.target.inject(&scope, Rc::clone(&css));
            self.injected.insert(scope, css);
            writes += 1;
        }
        writes
    }
}
