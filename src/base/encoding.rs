use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;

/// An error that occurs when an invalid encoding is provided in [`Settings`](crate::Settings).
#[derive(Error, Debug, Eq, PartialEq, Copy, Clone)]
pub enum EncodingError {
    /// The provided value doesn't match any of the [labels specified in the standard].
    ///
    /// [labels specified in the standard]: https://encoding.spec.whatwg.org/#names-and-labels
    #[error("Unknown character encoding has been provided.")]
    UnknownEncoding,

    /// The provided label is for one of the non-ASCII-compatible encodings
    /// (`UTF-16LE`, `UTF-16BE`, `ISO-2022-JP` and `replacement`). These encodings
    /// can't be used because all of the escaping decisions are made on ASCII bytes.
    #[error("Expected ASCII-compatible encoding.")]
    NonAsciiCompatibleEncoding,
}

/// An [`Encoding`] that is known to be ASCII-compatible, i.e. every ASCII character
/// is represented by the same single byte as in ASCII.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiCompatibleEncoding(&'static Encoding);

impl AsciiCompatibleEncoding {
    /// Returns `Some` if `Encoding` is ASCII-compatible, or `None` otherwise.
    #[must_use]
    pub fn new(encoding: &'static Encoding) -> Option<Self> {
        encoding.is_ascii_compatible().then_some(Self(encoding))
    }

    /// Looks the encoding up by one of its WHATWG labels, e.g. `"windows-1251"`.
    pub fn from_label(label: &str) -> Result<Self, EncodingError> {
        let encoding = Encoding::for_label_no_replacement(label.as_bytes())
            .ok_or(EncodingError::UnknownEncoding)?;

        Self::new(encoding).ok_or(EncodingError::NonAsciiCompatibleEncoding)
    }

    /// The UTF-8 encoding.
    #[inline]
    #[must_use]
    pub fn utf_8() -> Self {
        Self(UTF_8)
    }

    #[inline]
    #[must_use]
    pub fn encoding(self) -> &'static Encoding {
        self.0
    }
}

impl Default for AsciiCompatibleEncoding {
    #[inline]
    fn default() -> Self {
        Self::utf_8()
    }
}

impl From<AsciiCompatibleEncoding> for &'static Encoding {
    #[inline]
    fn from(ascii_enc: AsciiCompatibleEncoding) -> &'static Encoding {
        ascii_enc.0
    }
}

impl TryFrom<&'static Encoding> for AsciiCompatibleEncoding {
    type Error = EncodingError;

    #[inline]
    fn try_from(enc: &'static Encoding) -> Result<Self, EncodingError> {
        Self::new(enc).ok_or(EncodingError::NonAsciiCompatibleEncoding)
    }
}
