use std::ops::Deref;

/// A run of output text handed to the context machine in one go.
///
/// The last chunk of the input (or a chunk after which an untrusted value is
/// about to be interpolated) can't leave anything unresolved: the machine must
/// make a decision for every byte of it.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'i> {
    text: &'i str,
    last: bool,
}

impl<'i> Chunk<'i> {
    #[inline]
    pub fn new(text: &'i str) -> Self {
        Chunk { text, last: false }
    }

    #[inline]
    pub fn last(text: &'i str) -> Self {
        Chunk { text, last: true }
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.last
    }

    #[inline]
    pub fn as_str(&self) -> &'i str {
        self.text
    }
}

impl Deref for Chunk<'_> {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.text
    }
}
