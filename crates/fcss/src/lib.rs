//! # FCSS - Font configuration CSS
//!
//! Nested style declarations for typography configuration, and the compiler
//! that turns them into scoped CSS text.
//!
//! - **Model**: [`StyleTree`], built from JSON through a validating parse step
//! - **Compiler**: [`compile`] a tree under an optional scoping selector
//! - **Selectors**: nested key composition and [`id_selector`] escaping
//!
//! ## Quick Start
//!
//! ```rust
//! use fcss::{compile_value, id_selector};
//! use serde_json::json;
//!
//! let styles = json!({
//!     ":root": { "--jp-code-font-size": "16px" },
//!     ".cm-line": { "letterSpacing": "0.02em" },
//!     "@font-face": { "font-family": "Fira Code", "src": "url(fira.woff2)" }
//! });
//!
//! let css = compile_value(&styles, Some(&id_selector("nb-1"))).unwrap();
//! assert!(css.starts_with("#nb-1 {\n  --jp-code-font-size: 16px;\n}\n"));
//! assert!(css.contains("#nb-1 .cm-line {\n  letter-spacing: 0.02em;\n}\n"));
//! assert!(css.contains("@font-face {\n  font-family: Fira Code;\n"));
//! ```
//!
//! ## Not Supported
//!
//! - Arrays of declarations (multiple `@font-face` bodies under one key)
//! - Numeric values; every property value must be a string
//!
//! ## Modules
//!
//! - [`tree`]: the nested declaration model and its JSON boundary
//! - [`compiler`]: flattening and text emission
//! - [`error`]: compile and lookup errors

pub mod compiler;
pub mod error;
pub mod tree;

pub use compiler::selectors::id_selector;
pub use compiler::{compile, compile_value};
pub use error::{CompileError, ResolutionError};
pub use tree::{KeyKind, ROOT, StyleTree, StyleValue};
