mod settings;

use crate::base::Chunk;
use crate::context::{Context, ContextMachine, State};
use crate::errors::WriterError;
use crate::escape::{pending_name, EscapeDirective, EscapeOptions, Escaper, UrlSchemes};
use crate::memory::{MemoryLimiter, PendingBuffer};
use crate::sink::{OutputSink, TextSink};
use crate::value::{ScriptLiteralSerializer, Value, ValueSerializer};
use std::fmt;

pub use self::settings::{MemorySettings, Settings};

/// A writer that escapes untrusted values for the HTML context they end up in.
///
/// Output is written in two kinds of pieces. Trusted text (typically the static markup
/// of a template) is written with [`write_trusted`] as is. Untrusted values are written
/// with [`write_value`]: the writer tracks where in the document the output has got to
/// and escapes each value for that position, be it HTML text, an attribute value, a URL,
/// JS code or CSS.
///
/// Pieces can be split at any point: writing `"<scr"` and then `"ipt>"` gives the same
/// result as writing `"<script>"`. Trusted text that can't be interpreted until more of
/// it is seen is held back until it can be.
///
/// The writer must be [closed](EscapingWriter::close) when the document is complete, so
/// that held back text reaches the sink. Dropping the writer closes it, ignoring errors.
///
/// [`write_trusted`]: EscapingWriter::write_trusted
/// [`write_value`]: EscapingWriter::write_value
///
/// # Example
///
/// ```
/// use autoesc::{EscapingWriter, Settings};
///
/// let mut output = vec![];
///
/// {
///     let mut writer = EscapingWriter::new(Settings::default(), |c: &[u8]| output.extend_from_slice(c));
///
///     writer.write_trusted("<a href=").unwrap();
///     writer.write_value("javascript:doEvil()").unwrap();
///     writer.write_trusted(">link</a>").unwrap();
///     writer.close().unwrap();
/// }
///
/// assert_eq!(String::from_utf8(output).unwrap(), r##"<a href="#ZautoescZ">link</a>"##);
/// ```
pub struct EscapingWriter<O: OutputSink, S: ValueSerializer = ScriptLiteralSerializer> {
    machine: ContextMachine,
    pending: PendingBuffer,
    output: String,
    value_text: String,
    escaped: String,
    scratch: String,
    sink: TextSink<O>,
    serializer: S,
    soft: bool,
    allowed_url_schemes: UrlSchemes,
    closed: bool,
}

impl<O: OutputSink> EscapingWriter<O> {
    /// Creates a writer that serializes values with [`ScriptLiteralSerializer`].
    pub fn new(settings: Settings, sink: O) -> Self {
        Self::with_serializer(settings, sink, ScriptLiteralSerializer)
    }
}

impl<O: OutputSink, S: ValueSerializer> EscapingWriter<O, S> {
    pub fn with_serializer(settings: Settings, sink: O, serializer: S) -> Self {
        let memory = settings.memory_settings;
        let limiter = MemoryLimiter::new(memory.max_allowed_memory_usage);

        EscapingWriter {
            machine: ContextMachine::new(),
            pending: PendingBuffer::new(limiter, memory.preallocated_pending_buffer_size),
            output: String::new(),
            value_text: String::new(),
            escaped: String::new(),
            scratch: String::new(),
            sink: TextSink::new(settings.encoding, sink),
            serializer,
            soft: settings.soft,
            allowed_url_schemes: settings.allowed_url_schemes,
            closed: false,
        }
    }

    #[inline]
    fn ensure_open(&self) -> Result<(), WriterError> {
        if self.closed {
            Err(WriterError::Closed)
        } else {
            Ok(())
        }
    }

    /// Writes text that is already safe for where it's written, typically static
    /// template markup.
    pub fn write_trusted(&mut self, text: &str) -> Result<(), WriterError> {
        self.ensure_open()?;
        self.advance(text)
    }

    /// Writes an untrusted value, escaped for the current context.
    ///
    /// In JS code the value is written as a JS literal, e.g. a string is quoted. In all
    /// other contexts its text form is escaped.
    pub fn write_value<'v>(&mut self, value: impl Into<Value<'v>>) -> Result<(), WriterError> {
        self.ensure_open()?;

        let value = value.into();

        if self.machine.context().in_attr_value() && !self.pending.is_empty() {
            // NOTE: the value could complete the held back character reference.
            self.machine
                .terminate_char_ref(self.pending.as_str(), &mut self.output);
            self.pending.clear();
        }

        let mut ctx = self.machine.peek(self.pending.as_str(), &mut self.scratch);

        if ctx.state() == State::BeforeValue {
            // NOTE: the value starts an unquoted attribute value. It's put in quotes, so
            // that it can't spill over into the rest of the tag.
            self.resolve_pending();
            self.machine.begin_value(&mut self.output);
            ctx = self.machine.context();
        }

        let directive = EscapeDirective::for_context(&ctx);

        self.value_text.clear();

        match directive.escaper() {
            Some(Escaper::JsValue) => {
                self.serializer.serialize_for_script(&value, &mut self.value_text);
            }
            Some(Escaper::JsString | Escaper::JsRegexp) if value.is_structured() => {
                self.serializer.serialize_for_script(&value, &mut self.value_text);
            }
            _ => self.serializer.serialize(&value, &mut self.value_text),
        }

        let name_prefix = match ctx.state() {
            State::TagName | State::AttrName => pending_name(self.pending.as_str()),
            _ => "",
        };

        let options = EscapeOptions {
            soft: self.soft,
            allowed_schemes: self.allowed_url_schemes,
            name_prefix,
        };

        self.escaped.clear();

        directive.apply(
            &self.value_text,
            &options,
            &mut self.scratch,
            &mut self.escaped,
        );

        trace!(@value ctx, self.escaped);

        // NOTE: from here on the escaped value is just more output text, and it moves
        // the context exactly like trusted text would.
        let escaped = std::mem::take(&mut self.escaped);
        let result = self.advance(&escaped);

        self.escaped = escaped;

        result
    }

    /// Writes a value, like [`write_value`](EscapingWriter::write_value).
    #[inline]
    pub fn print<'v>(&mut self, value: impl Into<Value<'v>>) -> Result<(), WriterError> {
        self.write_value(value)
    }

    /// Writes a value followed by a line break.
    pub fn println<'v>(&mut self, value: impl Into<Value<'v>>) -> Result<(), WriterError> {
        self.write_value(value)?;
        self.new_line()
    }

    #[inline]
    pub fn new_line(&mut self) -> Result<(), WriterError> {
        self.write_trusted("\n")
    }

    /// Writes a single trusted character.
    pub fn write_char(&mut self, ch: char) -> Result<(), WriterError> {
        let mut buf = [0; 4];

        self.write_trusted(ch.encode_utf8(&mut buf))
    }

    /// Formats the arguments and writes the result as an untrusted value.
    pub fn write_fmt_value(&mut self, args: fmt::Arguments<'_>) -> Result<(), WriterError> {
        match args.as_str() {
            Some(text) => self.write_value(text),
            None => self.write_value(args.to_string()),
        }
    }

    /// Sends everything that can be sent to the sink and flushes it.
    ///
    /// Trusted text the writer is holding back stays held back: flushing doesn't
    /// change the meaning of the document.
    pub fn flush(&mut self) -> Result<(), WriterError> {
        self.ensure_open()?;
        self.sink.flush()?;

        Ok(())
    }

    /// Completes the document and closes the sink.
    ///
    /// Held back text is written out with its ambiguity resolved as if the document
    /// ended there, and an auto-quoted attribute value still open is closed. Writes after
    /// closing fail with [`WriterError::Closed`]. Closing again does nothing.
    pub fn close(&mut self) -> Result<(), WriterError> {
        if self.closed {
            return Ok(());
        }

        trace!(@close);

        self.closed = true;
        self.resolve_pending();
        self.machine.finish(&mut self.output);
        self.write_output()?;
        self.sink.flush()?;
        self.sink.close()?;

        Ok(())
    }

    /// Returns `true` if values that look already escaped are left alone.
    #[inline]
    pub fn is_soft(&self) -> bool {
        self.soft
    }

    /// Turns soft mode on or off.
    ///
    /// In soft mode an `&` in an untrusted value that starts a character reference such
    /// as `&amp;` or `&#39;` isn't escaped again. Everything else is escaped as usual.
    #[inline]
    pub fn set_soft(&mut self, soft: bool) {
        self.soft = soft;
    }

    /// The context an untrusted value written now would be escaped for.
    pub fn context(&self) -> Context {
        self.machine.peek(self.pending.as_str(), &mut String::new())
    }

    /// Trusted text that is being held back.
    #[inline]
    pub fn pending(&self) -> &str {
        self.pending.as_str()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn sink(&self) -> &O {
        self.sink.sink()
    }

    fn advance(&mut self, text: &str) -> Result<(), WriterError> {
        if self.pending.is_empty() {
            let blocked = self.machine.advance(&Chunk::new(text), &mut self.output);

            if blocked > 0 {
                self.pending.append(&text[text.len() - blocked..])?;
            }
        } else {
            self.pending.append(text)?;

            let blocked = self
                .machine
                .advance(&Chunk::new(self.pending.as_str()), &mut self.output);

            self.pending.shrink_to_last(blocked);
        }

        self.write_output()
    }

    /// Processes held back text as if nothing followed it.
    fn resolve_pending(&mut self) {
        if !self.pending.is_empty() {
            trace!(@recover "resolving pending text");

            self.machine
                .advance(&Chunk::last(self.pending.as_str()), &mut self.output);

            self.pending.clear();
        }
    }

    fn write_output(&mut self) -> Result<(), WriterError> {
        let result = self.sink.write_str(&self.output);

        self.output.clear();

        result.map_err(WriterError::from)
    }
}

impl<O: OutputSink, S: ValueSerializer> Drop for EscapingWriter<O, S> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.close();
        }
    }
}

impl<O: OutputSink, S: ValueSerializer> fmt::Debug for EscapingWriter<O, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EscapingWriter")
            .field("context", &self.machine.context())
            .field("pending", &self.pending.as_str())
            .field("soft", &self.soft)
            .field("closed", &self.closed)
            .finish()
    }
}
