mod limiter;
mod pending;

pub use self::limiter::{MemoryLimitExceededError, MemoryLimiter};
pub use self::pending::PendingBuffer;
