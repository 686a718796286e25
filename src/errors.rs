//! Error types returned by the escaping writer.

use std::io;
use thiserror::Error;

pub use crate::base::EncodingError;
pub use crate::memory::MemoryLimitExceededError;

/// An error that occurred while writing to an [`EscapingWriter`](crate::EscapingWriter).
///
/// Nothing in the escaping engine itself fails: content that merely looks unsafe is
/// neutralized, never rejected. The only failures are the ones listed here.
#[derive(Error, Debug)]
pub enum WriterError {
    /// The writer has been closed and can't accept more content.
    #[error("The writer has been closed.")]
    Closed,

    /// The output sink failed. The error is passed through unchanged.
    #[error("Output sink error: {0}")]
    Sink(#[from] io::Error),

    /// Trusted content that couldn't be resolved yet grew past the configured memory limit.
    ///
    /// This is usually caused by an extremely long tag or attribute name
    /// split across many writes.
    #[error("{0}")]
    PendingBufferLimit(#[from] MemoryLimitExceededError),
}

impl WriterError {
    /// Returns `true` if this error was caused by using the writer after
    /// [`close`](crate::EscapingWriter::close).
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, WriterError::Closed)
    }
}
