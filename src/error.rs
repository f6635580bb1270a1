use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::{
    utils::bytes::{bytecount_naive, memrchr_naive},
    Format,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned while decoding or loading a mesh.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The OFF/COFF header or counts line is missing or malformed.
    #[error("invalid OFF header at line {line}: {found:?}")]
    InvalidHeader { line: usize, found: String },

    /// Fewer lines, bytes or indices are available than the input declares.
    #[error("truncated input: expected {expected} {what}, found {found}")]
    TruncatedInput {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The binary STL triangle count does not agree with the buffer length.
    #[error(
        "binary STL declares {triangles} triangles ({expected} bytes), but the input is {actual} bytes"
    )]
    SizeMismatch {
        triangles: u32,
        expected: u64,
        actual: u64,
    },

    /// A token that must be a finite number is not one.
    #[error("malformed number {token:?} ({location})")]
    MalformedNumeric { token: String, location: Location },

    /// An OFF face refers to a vertex that does not exist.
    #[error("face index out of bounds ({index} >= {vertices}) ({location})")]
    IndexOutOfRange {
        index: usize,
        vertices: usize,
        location: Location,
    },

    #[error("unsupported or unrecognized file type {path:?}")]
    UnsupportedFormat { path: PathBuf },

    #[error("'{}' feature of mesh-decoder must be enabled to decode {format}", .format.feature())]
    FeatureDisabled { format: Format },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    InvalidHeader,
    TruncatedInput,
    SizeMismatch,
    MalformedNumeric,
    IndexOutOfRange,
    UnsupportedFormat,
    Io,
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidHeader { .. } => ErrorKind::InvalidHeader,
            Self::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            Self::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            Self::MalformedNumeric { .. } => ErrorKind::MalformedNumeric,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::UnsupportedFormat { .. } | Self::FeatureDisabled { .. } => {
                ErrorKind::UnsupportedFormat
            }
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    #[cold]
    pub(crate) fn malformed(token: impl Into<String>, location: Location) -> Self {
        Self::MalformedNumeric {
            token: token.into(),
            location,
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io { source, .. } => source,
            Error::UnsupportedFormat { .. } | Error::FeatureDisabled { .. } => {
                io::Error::new(io::ErrorKind::Unsupported, e)
            }
            _ => invalid_data(e),
        }
    }
}

#[cold]
pub(crate) fn invalid_data(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> io::Error {
    let e = e.into();
    let kind = e
        .downcast_ref::<io::Error>()
        .map_or(io::ErrorKind::InvalidData, io::Error::kind);
    io::Error::new(kind, e)
}

/// Where in the input a decode error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Location {
    /// 1-based line and column in a text format.
    Text { line: usize, column: usize },
    /// 0-based triangle record in a binary STL.
    Triangle(usize),
}

impl Location {
    /// Computes the line and column of the byte `pos` in `start`.
    #[cold]
    #[inline(never)]
    pub(crate) fn find(pos: usize, start: &[u8]) -> Self {
        let line = bytecount_naive(b'\n', &start[..pos]) + 1;
        let column = match memrchr_naive(b'\n', &start[..pos]) {
            Some(newline) => pos - newline,
            None => pos + 1,
        };
        Self::Text { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Text { line, column } => write!(f, "{line}:{column}"),
            Self::Triangle(i) => write!(f, "triangle {i}"),
        }
    }
}
