//! Scoped code font styles for a multi-document editor.
//!
//! A global typography configuration (code font family, size and line
//! height, plus arbitrary nested styles) can be overridden per open document.
//! [`FontManager`] compiles both layers into CSS, scoping each document's
//! overrides to its element id, and keeps the injected text in sync as the
//! stores change.
//!
//! The engine owns no persistent state. Hosts plug in their settings
//! storage, document models and document tracker through the traits in
//! [`store`], and receive CSS through an [`InjectionTarget`].
//!
//! ```
//! use std::rc::Rc;
//! use fontsync::testing::{MemorySettings, MemoryTracker, RecordingTarget};
//! use fontsync::{flush, FontManager, ScopeId};
//!
//! let target = RecordingTarget::new();
//! let log = target.log();
//! let (ctx, mut receiver) = flush::channel();
//! let manager = FontManager::new(Box::new(target), ctx);
//! manager.set_settings(Some(Rc::new(MemorySettings::new())));
//!
//! let tracker = MemoryTracker::new();
//! manager.connect_tracker(&tracker);
//! tracker.open("nb-1");
//!
//! manager.set_code_font_size(Some("nb-1"), Some("16px")).unwrap();
//! assert_eq!(manager.code_font_size(Some("nb-1")), "16px");
//! assert_eq!(manager.code_font_size(None), "13px");
//!
//! // Writes wait for a flush.
//! let scope = ScopeId::Document("nb-1".to_string());
//! assert_eq!(log.live(&scope), None);
//! receiver.drain();
//! manager.flush();
//! assert_eq!(
//!     log.live(&scope).as_deref(),
//!     Some("#nb-1 {\n  --jp-code-font-size: 16px;\n}\n")
//! );
//! ```

pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod flush;
mod log_init;
pub mod manager;
pub mod options;
pub mod registry;
pub mod resolve;
mod router;
pub mod signal;
pub mod store;
pub mod testing;

pub use commands::FontCommand;
pub use config::{ConfigStore, EngineOptions, FontConfiguration};
pub use document::DocumentOverrideStore;
pub use error::{FontsError, Result, StoreWriteError};
pub use flush::{FlushContext, FlushReceiver, FlushRequest, run_flush_loop};
pub use log_init::init_logger;
pub use manager::{FontManager, WeakFontManager};
pub use options::{FontTable, RegisteredFont};
pub use registry::{CompiledArtifact, InjectionTarget, ScopeId, StyleRegistry};
pub use resolve::{Properties, Property};
pub use signal::{Signal, Subscription};
pub use store::{DocumentId, DocumentModel, DocumentTracker, SettingsStorage, TrackerEvent};

pub use fcss;
// Re-export the log crate so hosts can use fontsync::log::debug!, etc.
pub use log;
