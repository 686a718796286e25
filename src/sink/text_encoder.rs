use super::OutputSink;
use crate::base::AsciiCompatibleEncoding;
use encoding_rs::{CoderResult, Encoder, Encoding, UTF_8};
use std::io;

/// Forwards output text to an [`OutputSink`], transcoding it if the output
/// encoding isn't UTF-8.
pub(crate) struct TextSink<O: OutputSink> {
    non_utf8_encoder: Option<TextEncoder>,
    sink: O,
}

impl<O: OutputSink> TextSink<O> {
    pub fn new(encoding: AsciiCompatibleEncoding, sink: O) -> Self {
        let encoding = encoding.encoding();

        TextSink {
            non_utf8_encoder: (encoding != UTF_8).then(|| TextEncoder::new(encoding)),
            sink,
        }
    }

    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        trace!(@write text);

        match &mut self.non_utf8_encoder {
            Some(encoder) => encoder.encode(text, &mut self.sink),
            None => self.sink.write_chunk(text.as_bytes()),
        }
    }

    #[inline]
    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    #[inline]
    pub fn close(&mut self) -> io::Result<()> {
        self.sink.close()
    }

    #[inline]
    pub fn sink(&self) -> &O {
        &self.sink
    }
}

enum Buffer {
    Heap(Vec<u8>),
    Stack([u8; 63]),
}

struct TextEncoder {
    encoder: Encoder,
    buffer: Buffer,
}

impl TextEncoder {
    #[inline]
    pub fn new(encoding: &'static Encoding) -> Self {
        debug_assert!(encoding != UTF_8);
        debug_assert!(encoding.is_ascii_compatible());

        TextEncoder {
            encoder: encoding.new_encoder(),
            buffer: Buffer::Stack([0; 63]),
        }
    }

    /// Encodes `text`, passing ASCII runs through without copying. Characters that
    /// the encoding can't represent become numeric character references.
    #[inline(never)]
    fn encode(&mut self, mut text: &str, sink: &mut impl OutputSink) -> io::Result<()> {
        loop {
            // NOTE: ASCII-compatible encodings don't keep state between calls.
            debug_assert!(!self.encoder.has_pending_state());

            let ascii_len = Encoding::ascii_valid_up_to(text.as_bytes());

            if let Some((ascii, remainder)) = text.split_at_checked(ascii_len) {
                if !ascii.is_empty() {
                    sink.write_chunk(ascii.as_bytes())?;
                }

                if remainder.is_empty() {
                    return Ok(());
                }

                text = remainder;
            }

            let buffer = match &mut self.buffer {
                Buffer::Heap(buf) => buf.as_mut_slice(),
                // Long non-ASCII text could take lots of roundtrips through the encoder
                buf if text.len() >= 1 << 20 => {
                    *buf = Buffer::Heap(vec![0; 4096]);

                    match buf {
                        Buffer::Heap(buf) => buf.as_mut_slice(),
                        Buffer::Stack(buf) => buf.as_mut_slice(),
                    }
                }
                Buffer::Stack(buf) => buf.as_mut_slice(),
            };

            let (result, read, written, _) = self.encoder.encode_from_utf8(text, buffer, false);

            if written > 0 && written <= buffer.len() {
                sink.write_chunk(&buffer[..written])?;
            }

            if read >= text.len() {
                return Ok(());
            }

            text = &text[read..];

            match result {
                CoderResult::InputEmpty => return Ok(()),
                CoderResult::OutputFull => match &mut self.buffer {
                    Buffer::Heap(buf) if buf.len() >= 1024 => {
                        if written == 0 {
                            return Err(io::Error::other("the text encoder made no progress"));
                        }
                    }
                    buf => *buf = Buffer::Heap(vec![0; 1024]),
                },
            }
        }
    }
}
