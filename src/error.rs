/// Crate-level error types for jxref.
use std::path::PathBuf;

/// All errors in jxref carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the file, template, or reason for
/// failure. Parsing anomalies are deliberately absent: malformed source is
/// skipped over, never reported as an error.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source file bytes do not decode under the configured input encoding.
    #[error("cannot decode {} as {encoding}", path.display())]
    Decode {
        /// The configured input encoding name.
        encoding: String,
        /// File whose content failed to decode.
        path: PathBuf,
    },

    /// A referenced source file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// An include or exclude pattern is not a valid glob.
    #[error("invalid glob pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern as the user wrote it.
        pattern: String,
        /// Description of what the glob parser rejected.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Cannot create or write a destination file or directory.
    #[error("cannot write {}: {reason}", path.display())]
    OutputWrite {
        /// Destination path that could not be written.
        path: PathBuf,
        /// Description of the write failure.
        reason: String,
    },

    /// A named template is missing from the configured location.
    #[error("template `{name}` not found in {location}")]
    TemplateNotFound {
        /// Where the template was looked for (directory or built-in set).
        location: String,
        /// Template name without extension.
        name: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The configured encoding is not one jxref can read or write.
    #[error("unsupported encoding: {name}")]
    UnsupportedEncoding {
        /// Encoding name as configured.
        name: String,
    },
}
