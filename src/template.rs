//! Template compiler
//!
//! This module provides access to wisp-template, which turns HTML-like
//! templates into render-function bodies built on `h`, `hFragment` and
//! `hString`.
//!
//! ## Example
//!
//! ```rust
//! use wisp::template::compile;
//!
//! let compiled = compile("<li for=\"todo in todos\">{{ todo.label }}</li>").unwrap();
//! assert_eq!(compiled.import_names(), vec!["h", "hFragment", "hString"]);
//! ```

// Re-export all wisp-template functionality
pub use wisp_template::*;
