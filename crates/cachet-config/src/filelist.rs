//! Declared-file parsing and merging.
//!
//! Each source document is a small YAML file whose entries name the target
//! files to compile, either as a mapping (`label: path`) or a sequence
//! (`- path`). Documents merge with associative-array semantics: a string
//! key seen again takes the later document's value but keeps its original
//! position, while sequence items and integer keys are renumbered and always
//! append.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use yaml_rust2::{Yaml, YamlLoader};

use crate::error::{CompileError, Result};

/// Merge identity of one declared-file entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum EntryKey {
    /// String-keyed mapping entry; later documents override in place.
    Name(String),
    /// Sequence item or integer-keyed entry; appended with a fresh position.
    Position(usize),
}

/// Ordered, merged list of declared configuration file paths.
#[derive(Debug, Default)]
pub struct FileList {
    entries: IndexMap<EntryKey, String>,
    next_position: usize,
}

impl FileList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `path` as YAML and merge its declared entries into the list.
    ///
    /// An empty or null document contributes nothing. A document whose root
    /// is neither a mapping nor a sequence, or whose entries are not scalar
    /// paths, is a parse error.
    pub fn merge_document(&mut self, path: &Path) -> Result<()> {
        let raw = fs::read_to_string(path).map_err(|_| CompileError::MissingSource {
            path: path.display().to_string(),
        })?;
        let docs = YamlLoader::load_from_str(&raw).map_err(|err| CompileError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        let Some(doc) = docs.into_iter().next() else {
            return Ok(());
        };

        match doc {
            Yaml::Hash(hash) => {
                for (key, value) in hash {
                    let value = scalar_to_string(&value, path)?;
                    match key {
                        Yaml::String(name) => {
                            self.entries.insert(EntryKey::Name(name), value);
                        }
                        Yaml::Integer(_) => self.append(value),
                        other => {
                            return Err(CompileError::Parse {
                                path: path.display().to_string(),
                                message: format!("unsupported entry key: {other:?}"),
                            });
                        }
                    }
                }
            }
            Yaml::Array(items) => {
                for item in items {
                    let value = scalar_to_string(&item, path)?;
                    self.append(value);
                }
            }
            Yaml::Null => {}
            other => {
                return Err(CompileError::Parse {
                    path: path.display().to_string(),
                    message: format!("expected a mapping or sequence of file paths, got {other:?}"),
                });
            }
        }

        Ok(())
    }

    fn append(&mut self, value: String) {
        let key = EntryKey::Position(self.next_position);
        self.next_position += 1;
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into declared paths, in merge order.
    pub fn into_paths(self) -> Vec<String> {
        self.entries.into_values().collect()
    }
}

fn scalar_to_string(value: &Yaml, path: &Path) -> Result<String> {
    match value {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(r) => Ok(r.clone()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        other => Err(CompileError::Parse {
            path: path.display().to_string(),
            message: format!("declared file entries must be scalar paths, got {other:?}"),
        }),
    }
}
