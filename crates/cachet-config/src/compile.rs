//! The configuration compiler.
//!
//! `ConfigCompiler` gathers the files declared by a list of source documents
//! and flattens them into one compiled text blob. Comments and blank lines
//! are removed, nested include directives are expanded through the cache,
//! and line endings are normalized, so the runtime can load a single
//! artifact instead of parsing many small files at startup.
//!
//! The compiler is a pure transform over strings plus two side effects: the
//! calls into the [`CacheResolver`] and the version-marker copy. Persisting
//! the returned blob is the caller's job.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

use cachet_util::{text, version};

use crate::cache::CacheResolver;
use crate::error::{CompileError, Result};
use crate::filelist::FileList;
use crate::include::expand_includes;
use crate::settings::CompileSettings;

/// Opening marker for the compiled output.
const SCRIPT_OPEN_TAG: &str = "<?php";

/// Start-of-line script open tags, with an optional case-insensitive
/// language marker.
static SCRIPT_OPEN_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mi)^\s*<\?(php)?").unwrap());

/// Start-of-line script close tags.
static SCRIPT_CLOSE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*\?>").unwrap());

/// Compiles declared configuration files into a single cached artifact.
pub struct ConfigCompiler<'a> {
    settings: &'a CompileSettings,
    cache: &'a dyn CacheResolver,
}

impl<'a> ConfigCompiler<'a> {
    pub fn new(settings: &'a CompileSettings, cache: &'a dyn CacheResolver) -> Self {
        Self { settings, cache }
    }

    /// Compile `source_files` into one text blob.
    ///
    /// Each source document is parsed and merged into the declared-file
    /// list, every declared file is processed in merge order, and the
    /// results are concatenated under a generated header. On success the
    /// version marker is copied into the cache directory as a side effect.
    ///
    /// An empty merged list is not an error; the result is just the header.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a source document is unreadable or malformed
    /// - a declared file does not exist or is not readable
    /// - a nested include cannot be resolved
    /// - the version marker cannot be copied
    pub fn compile(&self, source_files: &[PathBuf]) -> Result<String> {
        let mut list = FileList::new();
        for source in source_files {
            list.merge_document(source)?;
        }
        tracing::debug!(
            sources = source_files.len(),
            declared = list.len(),
            "Compiling configuration cache"
        );

        // Errors about unreadable declared files always cite the first
        // source document as the requester, even for entries declared by
        // later documents. Callers depend on this message shape.
        let requesting_file = source_files
            .first()
            .map(|path| path.display().to_string())
            .unwrap_or_default();

        let mut body = String::new();
        for declared in list.into_paths() {
            let resolved = self
                .settings
                .resolve_path(&self.settings.resolve_constants(&declared));
            let fragment = self.process_file(&requesting_file, &resolved)?;
            body.push('\n');
            body.push_str(&fragment);
        }

        let output = format!(
            "{}\n// auto-generated by the cachet configuration compiler\n// date: {}\n{}\n",
            SCRIPT_OPEN_TAG,
            Local::now().format("%Y/%m/%d %H:%M:%S"),
            body,
        );

        version::copy_version_marker(&self.settings.lib_dir, &self.settings.cache_dir)?;
        tracing::debug!(bytes = output.len(), "Compiled configuration cache");

        Ok(output)
    }

    /// Run the per-file transform chain over one declared file.
    fn process_file(&self, requesting_file: &str, resolved: &Path) -> Result<String> {
        let contents = fs::read_to_string(resolved).map_err(|_| CompileError::MissingTarget {
            requested_by: requesting_file.to_string(),
            file: resolved.display().to_string(),
        })?;
        tracing::debug!(file = %resolved.display(), "Processing declared file");

        // Comments stay in debug mode so diagnostics keep pointing at the
        // right lines.
        let contents = if self.settings.debug {
            contents
        } else {
            text::strip_comments(&contents)
        };

        let contents = expand_includes(&contents, self.settings, self.cache)?;
        let contents = text::replace_patterns(
            &contents,
            &[(&SCRIPT_OPEN_LINE, ""), (&SCRIPT_CLOSE_LINE, "")],
        );

        Ok(text::normalize_newlines(&contents))
    }
}
