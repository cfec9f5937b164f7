//! Shared utilities for cachet.
//!
//! This crate holds the text transforms used by the configuration compiler
//! (comment stripping, ordered pattern rewriting, newline normalization) and
//! the helpers for the distribution `VERSION` marker file. Everything here is
//! small, synchronous, and free of compiler-specific types so it can be
//! reused by other cache handlers.

pub mod text;
pub mod version;

pub use text::{normalize_newlines, replace_patterns, strip_comments};
pub use version::{VERSION_FILE_NAME, copy_version_marker, read_version_marker};
