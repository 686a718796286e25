//! Destinations for the escaped output.

mod text_encoder;

use std::io;

pub(crate) use self::text_encoder::TextSink;

/// Receives the output of an [`EscapingWriter`](crate::EscapingWriter).
///
/// Chunks are written as soon as the writer has resolved them. All methods are called
/// synchronously from the writer, and their errors are passed to the caller unchanged.
pub trait OutputSink {
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called once, when the writer is closed.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<F: FnMut(&[u8])> OutputSink for F {
    #[inline]
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self(chunk);

        Ok(())
    }
}

/// An [`OutputSink`] that writes to an [`io::Write`]r.
///
/// Closing the sink flushes the writer.
#[derive(Debug)]
pub struct IoSink<W: io::Write> {
    inner: W,
}

impl<W: io::Write> IoSink<W> {
    #[inline]
    pub fn new(inner: W) -> Self {
        IoSink { inner }
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> OutputSink for IoSink<W> {
    #[inline]
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.inner.write_all(chunk)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    #[inline]
    fn close(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
