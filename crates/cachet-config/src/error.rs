//! Error types for configuration compilation.

use thiserror::Error;

/// Errors that can occur while compiling a configuration cache.
///
/// All variants are fatal to the current compile call: no partial output is
/// produced and nothing is retried internally. The compiler does not log
/// failures; surfacing them is the caller's responsibility.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A source document passed to `compile` does not exist or is not
    /// readable.
    #[error("configuration file \"{path}\" does not exist or is not readable")]
    MissingSource {
        /// Path of the unreadable source document
        path: String,
    },

    /// A declared target file is missing or unreadable.
    ///
    /// `requested_by` is always the first source document of the compile
    /// call, even when the target was declared by a later document. Callers
    /// match on this message format, so the attribution stays as is.
    #[error(
        "configuration file \"{requested_by}\" specifies nonexistent or unreadable file \"{file}\""
    )]
    MissingTarget {
        /// The source document cited as the requester
        requested_by: String,
        /// Resolved path of the missing target
        file: String,
    },

    /// A source document's declarative content cannot be parsed.
    #[error("unable to parse configuration file \"{path}\": {message}")]
    Parse {
        /// Path of the malformed document
        path: String,
        /// Parser diagnostic
        message: String,
    },

    /// I/O failure outside the declared-file checks, such as reading a
    /// resolved cache artifact or writing the version marker.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CompileError>;
