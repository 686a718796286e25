mod chunk;
mod encoding;

pub use self::chunk::Chunk;
pub use self::encoding::{AsciiCompatibleEncoding, EncodingError};
