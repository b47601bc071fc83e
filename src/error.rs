//! Error taxonomy shared by the reader, the writer and the LZW coder.

use std::io;

use thiserror::Error;

/// Result type used throughout this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while reading or writing a stream.
///
/// `InvalidState` and `InvalidArgument` report caller mistakes and leave the
/// codec position untouched, so the failed operation may be retried or
/// corrected. The remaining kinds report a broken stream and move the codec
/// into its terminal error position; every later operation then fails with
/// `InvalidState`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The operation is not legal in the current codec position.
    #[error("operation is not legal in the current codec position")]
    InvalidState,
    /// A supplied value is outside its documented domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The stream ended before the current part could be read.
    #[error("stream ended in the middle of a part")]
    Truncated,
    /// Bytes were read but violate the format.
    #[error("malformed stream: {0}")]
    Malformed(&'static str),
    /// The underlying stream failed.
    #[error("i/o error")]
    Io(#[source] io::Error),
}

impl Error {
    /// Classifies failures of `read_exact`: running out of bytes is a
    /// truncated stream, anything else passes through as I/O.
    pub(crate) fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::Truncated
        } else {
            Error::Io(err)
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
