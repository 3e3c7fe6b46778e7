use crate::platform::PlatformVersion;
use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoContext {
    pub byte_pos: u64,
    pub line_num: u64,
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("expected header '@' at start of record")]
    MissingHeader,
    #[error("empty read identifier")]
    EmptyId,
    #[error("read identifier is not valid UTF-8")]
    InvalidUtf8Id,
    #[error("unexpected EOF inside record")]
    UnexpectedEof,
    #[error("quality length ({qual}) does not match sequence length ({seq})")]
    LengthMismatch { seq: usize, qual: usize },
    #[error("gzip input found but the `gzip` feature is disabled")]
    GzipDisabled,

    #[error("could not detect encoding of read id '{id}'")]
    UndetectableEncoding { id: String },
    #[error("no records to sample for encoding detection")]
    EmptySample,
    #[error("mixed or undetectable encodings in file: {found:?}")]
    MixedEncodings { found: Vec<PlatformVersion> },
    #[error("input files use different encodings: {found:?}")]
    FileEncodingMismatch { found: Vec<PlatformVersion> },

    #[error("{version} metadata format invalid in '{id}': {reason}")]
    InvalidMetadata {
        version: PlatformVersion,
        id: String,
        reason: &'static str,
    },
    #[error("{version} filter field must be {expected}, got '{value}'")]
    InvalidFilterFlag {
        version: PlatformVersion,
        value: String,
        expected: &'static str,
    },
    #[error("mate field is not an integer: '{value}'")]
    InvalidMate { value: String },
    #[error("paired-end mate field must be 1 or 2, got {mate} for read '{tag}'")]
    MateOutOfRange { mate: u32, tag: String },
    #[error("found mate {mate} in single-end library for read '{tag}'")]
    MateInSingleEnd { mate: u32, tag: String },
}

/// Paired outputs were written in diverging read order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("reads are not sorted: pair {index} has left '{left}' but right '{right}'")]
pub struct SortOrderError {
    pub index: usize,
    pub left: String,
    pub right: String,
}

#[derive(Debug, Error)]
pub enum FastqError {
    #[error("I/O error at {ctx:?}: {source}")]
    Io {
        #[source]
        source: io::Error,
        ctx: IoContext,
    },
    #[error("format error at {ctx:?}: {source}")]
    Format {
        #[source]
        source: FormatError,
        ctx: IoContext,
    },
    #[error("record {index}: {source}")]
    Record {
        #[source]
        source: FormatError,
        index: u64,
    },
    #[error("encoding detection failed: {0}")]
    Encoding(#[source] FormatError),
    #[error(transparent)]
    SortOrder(#[from] SortOrderError),
    #[error("write failed: {0}")]
    Output(#[source] io::Error),
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl FastqError {
    pub(crate) fn io_err(source: io::Error, ctx: IoContext) -> Self {
        Self::Io { source, ctx }
    }
    pub(crate) fn fmt_err(source: FormatError, ctx: IoContext) -> Self {
        Self::Format { source, ctx }
    }
    pub(crate) fn record_err(source: FormatError, index: u64) -> Self {
        Self::Record { source, index }
    }

    /// The underlying [`FormatError`], if this is a format-class failure.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            Self::Format { source, .. } | Self::Record { source, .. } => Some(source),
            Self::Encoding(source) => Some(source),
            _ => None,
        }
    }

    pub fn is_format(&self) -> bool {
        self.format_error().is_some()
    }
}
