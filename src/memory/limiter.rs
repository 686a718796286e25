use thiserror::Error;

/// An error that occurs when the pending buffer of the writer grows past
/// [`MemorySettings::max_allowed_memory_usage`](crate::MemorySettings::max_allowed_memory_usage).
#[derive(Error, Debug, Eq, PartialEq, Copy, Clone)]
#[error("Memory limit of {max} bytes has been exceeded: {current_usage} bytes were used.")]
pub struct MemoryLimitExceededError {
    pub current_usage: usize,
    pub max: usize,
}

#[derive(Debug)]
pub struct MemoryLimiter {
    current_usage: usize,
    max: usize,
}

impl MemoryLimiter {
    #[inline]
    #[must_use]
    pub fn new(max: usize) -> Self {
        MemoryLimiter {
            current_usage: 0,
            max,
        }
    }

    #[cfg(test)]
    #[inline]
    #[must_use]
    pub fn current_usage(&self) -> usize {
        self.current_usage
    }

    // NOTE: preallocated memory is accounted for, but never rejected.
    #[inline]
    pub fn preallocate(&mut self, byte_count: usize) {
        self.current_usage += byte_count;
    }

    #[inline]
    pub fn increase_usage(&mut self, byte_count: usize) -> Result<(), MemoryLimitExceededError> {
        self.current_usage += byte_count;

        if self.current_usage > self.max {
            Err(MemoryLimitExceededError {
                current_usage: self.current_usage,
                max: self.max,
            })
        } else {
            Ok(())
        }
    }

    #[inline]
    pub fn decrease_usage(&mut self, byte_count: usize) {
        self.current_usage -= byte_count;
    }
}
