use crate::base::AsciiCompatibleEncoding;
use crate::escape::UrlSchemes;

/// Memory limits of an [`EscapingWriter`](crate::EscapingWriter).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MemorySettings {
    /// Initial capacity of the buffer that holds trusted text the writer can't make
    /// sense of yet, such as a tag name that is still being written.
    ///
    /// ### Default
    ///
    /// `1024` bytes.
    pub preallocated_pending_buffer_size: usize,

    /// The most memory the pending buffer may use. Writes that would go past this
    /// limit fail with [`WriterError::PendingBufferLimit`](crate::errors::WriterError::PendingBufferLimit).
    ///
    /// ### Default
    ///
    /// [`usize::MAX`].
    pub max_allowed_memory_usage: usize,
}

impl Default for MemorySettings {
    #[inline]
    fn default() -> Self {
        MemorySettings {
            preallocated_pending_buffer_size: 1024,
            max_allowed_memory_usage: usize::MAX,
        }
    }
}

/// Settings of an [`EscapingWriter`](crate::EscapingWriter).
#[derive(Clone, Debug)]
pub struct Settings {
    /// The character encoding of the output.
    ///
    /// Characters that can't be represented in it are written as numeric
    /// character references.
    ///
    /// ### Default
    ///
    /// UTF-8.
    pub encoding: AsciiCompatibleEncoding,

    /// Initial [soft mode](crate::EscapingWriter::set_soft).
    ///
    /// ### Default
    ///
    /// `false`.
    pub soft: bool,

    /// Schemes that untrusted URLs may use. URLs with any other scheme are replaced
    /// with [`UNSAFE_URL_PLACEHOLDER`](crate::escape::UNSAFE_URL_PLACEHOLDER).
    ///
    /// ### Default
    ///
    /// `http`, `https` and `mailto`.
    pub allowed_url_schemes: UrlSchemes,

    /// Memory limits.
    pub memory_settings: MemorySettings,
}

impl Default for Settings {
    #[inline]
    fn default() -> Self {
        Settings {
            encoding: AsciiCompatibleEncoding::utf_8(),
            soft: false,
            allowed_url_schemes: UrlSchemes::default(),
            memory_settings: MemorySettings::default(),
        }
    }
}
