//! Error types for archive operations.

use thiserror::Error;

/// Result type alias using [`ArError`].
pub type Result<T> = std::result::Result<T, ArError>;

/// Errors that can occur while encoding headers or operating on an archive.
#[derive(Error, Debug)]
pub enum ArError {
    /// A header field's encoded form does not fit its fixed width.
    #[error("value too long for field `{field}`: {len} bytes (max {max})")]
    TooLongValue {
        /// Header field being encoded.
        field: &'static str,
        /// Length of the encoded value.
        len: usize,
        /// Width of the field.
        max: usize,
    },

    /// A value cannot be represented in the given header field.
    #[error("unsupported value for field `{field}`: {reason}")]
    UnsupportedValue {
        /// Header field being encoded.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// A header field could not be parsed.
    #[error("cannot parse field `{field}` from {value:?}")]
    InvalidParseValue {
        /// Header field being decoded.
        field: &'static str,
        /// Raw field contents (lossy).
        value: String,
    },

    /// The resource does not start with the `!<arch>\n` signature.
    #[error("invalid file format: missing ar signature")]
    InvalidFileFormat,

    /// No member with this name is indexed.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// A member with this name is already indexed.
    #[error("file already exist: {0}")]
    FileExist(String),

    /// The member name would escape the export directory.
    #[error("unsafe member name for export: {0:?}")]
    UnsafeName(String),

    /// Failure from the underlying storage, a source or a sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArError {
    pub(crate) fn parse(field: &'static str, raw: &[u8]) -> Self {
        Self::InvalidParseValue {
            field,
            value: String::from_utf8_lossy(raw).into_owned(),
        }
    }
}
