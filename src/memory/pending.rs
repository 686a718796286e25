use super::{MemoryLimitExceededError, MemoryLimiter};

/// Output text that has been produced but not forwarded to the sink yet, because
/// the context machine can't decide what it means without seeing more input
/// (e.g. a tag name that is still being typed).
///
/// The buffer only ever grows: memory released by [`PendingBuffer::shrink_to_last`]
/// is kept for reuse, so the limiter tracks the high-water mark.
#[derive(Debug)]
pub struct PendingBuffer {
    limiter: MemoryLimiter,
    text: String,
    reserved: usize,
}

impl PendingBuffer {
    pub fn new(mut limiter: MemoryLimiter, preallocated_size: usize) -> Self {
        limiter.preallocate(preallocated_size);

        PendingBuffer {
            limiter,
            text: String::with_capacity(preallocated_size),
            reserved: preallocated_size,
        }
    }

    pub fn append(&mut self, text: &str) -> Result<(), MemoryLimitExceededError> {
        let new_len = self.text.len() + text.len();

        if new_len > self.reserved {
            // NOTE: ask the limiter if we can have more space.
            self.limiter.increase_usage(new_len - self.reserved)?;
            self.reserved = new_len;
        }

        self.text.push_str(text);

        Ok(())
    }

    /// Drops everything except the last `byte_count` bytes.
    ///
    /// `byte_count` always points at an ASCII byte the machine stopped on,
    /// so the cut is a char boundary.
    pub fn shrink_to_last(&mut self, byte_count: usize) {
        let cut = self.text.len() - byte_count;

        drop(self.text.drain(..cut));
    }

    #[inline]
    pub fn clear(&mut self) {
        self.text.clear();
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn memory_usage(&self) -> usize {
        self.limiter.current_usage()
    }
}

impl Drop for PendingBuffer {
    fn drop(&mut self) {
        self.limiter.decrease_usage(self.reserved);
    }
}
