use super::transitions::transition;
use super::{Context, Delim, State};
use crate::base::Chunk;
use crate::html::entities::{match_char_ref, CharRef};
use crate::html::{is_html_whitespace, AttrType, Element};
use memchr::memchr;

enum Step {
    /// The given number of input bytes have been decided on and written out.
    Consumed(usize),
    /// The rest of the input can't be decided on without seeing more of it.
    Blocked,
}

use Step::*;

#[inline]
fn is_tag_name_end(b: u8) -> bool {
    is_html_whitespace(b) || b == b'/' || b == b'>'
}

#[inline]
fn is_attr_name_end(b: u8) -> bool {
    is_tag_name_end(b) || b == b'='
}

/// The incremental HTML context parser.
///
/// [`advance`](ContextMachine::advance) consumes output text and copies it to the output
/// buffer, stopping short of a trailing fragment whose meaning depends on text that
/// hasn't been written yet (e.g. `<scr`). The caller keeps that fragment and passes it
/// again, followed by new text, on the next call. For a [last](Chunk::last) chunk the
/// machine never stops short: it resolves such fragments conservatively instead.
///
/// The text is copied to the output unchanged except inside auto-quoted attribute values,
/// where closing quotes are inserted and stray double quotes are turned into references.
#[derive(Debug, Clone, Default)]
pub struct ContextMachine {
    ctx: Context,
}

impl ContextMachine {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn context(&self) -> Context {
        self.ctx
    }

    /// Consumes `input`, returning the number of trailing bytes that have been left
    /// undecided (always zero for a last chunk).
    pub fn advance(&mut self, input: &Chunk<'_>, out: &mut String) -> usize {
        let text = input.as_str();
        let mut pos = 0;

        while pos < text.len() {
            match self.step(&text[pos..], input.is_last(), out) {
                Consumed(len) => pos += len,
                Blocked => {
                    trace!(@pending &text[pos..]);

                    return text.len() - pos;
                }
            }
        }

        trace!(@context self.ctx);

        0
    }

    /// Returns the context the machine would end up in if `pending` was all the
    /// remaining input.
    ///
    /// This is how the context of an untrusted value is chosen when the text before it
    /// ends with an undecided fragment. The machine itself is left untouched.
    pub fn peek(&self, pending: &str, scratch: &mut String) -> Context {
        if pending.is_empty() {
            return self.ctx;
        }

        let mut machine = self.clone();

        machine.advance(&Chunk::last(pending), scratch);
        scratch.clear();

        machine.ctx
    }

    /// Consumes text held back in an attribute value right before an untrusted value
    /// is written. The text starts with a character reference that the value could
    /// otherwise extend, so the reference is written out in full: a `&` that doesn't
    /// start one becomes `&amp;` and a reference without a `;` gets one.
    pub fn terminate_char_ref(&mut self, pending: &str, out: &mut String) {
        if !self.ctx.in_attr_value() || !pending.starts_with('&') {
            self.advance(&Chunk::last(pending), out);
            return;
        }

        let len = match match_char_ref(pending.as_bytes(), true) {
            CharRef::Complete { len, ch } => {
                out.push_str(&pending[..len]);

                if !pending[..len].ends_with(';') {
                    out.push(';');
                }

                self.ctx = transition(self.ctx, ch);

                len
            }
            CharRef::Incomplete | CharRef::None => {
                out.push_str("&amp;");
                self.ctx = transition(self.ctx, '&');

                1
            }
        };

        trace!(@recover "terminated character reference");

        self.advance(&Chunk::last(&pending[len..]), out);
    }

    /// Starts an unquoted attribute value with a `"`, so that an untrusted value
    /// written at this point can't spill over into the rest of the tag.
    pub fn begin_value(&mut self, out: &mut String) {
        if self.ctx.state == State::BeforeValue {
            out.push('"');
            self.ctx = self.ctx.attr_value(Delim::AutoQuote);
        }
    }

    /// Completes the document: closes an auto-quoted attribute value if one is open.
    pub fn finish(&mut self, out: &mut String) {
        if self.ctx.delim == Delim::AutoQuote {
            out.push('"');
            self.ctx = self.ctx.in_tag();
        }

        trace!(@context self.ctx);
    }

    fn step(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        if self.ctx.delim != Delim::None {
            return self.attr_value(input, last, out);
        }

        match self.ctx.state {
            State::Text => self.text(input, last, out),
            State::TagName => self.partial_tag_name(input, last, out),
            State::Tag => self.tag(input, last, out),
            State::AttrName => self.partial_attr_name(input, last, out),
            State::AfterName => self.after_attr_name(input, last, out),
            State::BeforeValue => self.before_attr_value(input, last, out),
            State::Comment => self.comment(input, last, out),
            State::BogusComment => self.bogus_comment(input, out),
            _ => self.element_content(input, last, out),
        }
    }

    #[inline]
    fn emit(&mut self, input: &str, len: usize, out: &mut String) -> Step {
        out.push_str(&input[..len]);

        Consumed(len)
    }

    /// Feeds the first character of `input` to the inner state.
    #[inline]
    fn emit_char(&mut self, input: &str, out: &mut String) -> Step {
        match input.chars().next() {
            Some(ch) => {
                out.push(ch);
                self.ctx = transition(self.ctx, ch);

                Consumed(ch.len_utf8())
            }
            None => Consumed(0),
        }
    }

    fn text(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        match memchr(b'<', input.as_bytes()) {
            Some(0) => self.markup_start(input, last, out),
            Some(len) => self.emit(input, len, out),
            None => self.emit(input, input.len(), out),
        }
    }

    /// Input starts with a `<` in text.
    fn markup_start(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        let bytes = input.as_bytes();

        match bytes.get(1).copied() {
            None if last => {
                // NOTE: a value written here could turn this into a tag.
                self.ctx.state = State::TagName;
                self.emit(input, 1, out)
            }
            None => Blocked,
            Some(b'!') => self.markup_declaration(input, last, out),
            Some(b'?') => {
                self.ctx.state = State::BogusComment;
                self.emit(input, 2, out)
            }
            Some(b'/') => match bytes.get(2).copied() {
                None if last => {
                    self.ctx.state = State::TagName;
                    self.emit(input, 2, out)
                }
                None => Blocked,
                Some(b) if b.is_ascii_alphabetic() => self.tag_name(input, 2, true, last, out),
                Some(b'>') => self.emit(input, 3, out),
                Some(_) => {
                    self.ctx.state = State::BogusComment;
                    self.emit(input, 2, out)
                }
            },
            Some(b) if b.is_ascii_alphabetic() => self.tag_name(input, 1, false, last, out),
            Some(_) => self.emit(input, 1, out),
        }
    }

    /// Input starts with `<!`.
    fn markup_declaration(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        let bytes = input.as_bytes();

        if let Some(rest) = bytes.strip_prefix(b"<!--") {
            if rest.starts_with(b">") {
                self.emit(input, 5, out)
            } else if rest.starts_with(b"->") {
                self.emit(input, 6, out)
            } else if !last && (rest.is_empty() || rest == b"-") {
                Blocked
            } else {
                self.ctx.state = State::Comment;
                self.emit(input, 4, out)
            }
        } else if !last && b"<!--".starts_with(bytes) {
            Blocked
        } else {
            self.ctx.state = State::BogusComment;
            self.emit(input, input.len().min(2), out)
        }
    }

    /// Scans a tag name that starts at `start`.
    fn tag_name(
        &mut self,
        input: &str,
        start: usize,
        is_end_tag: bool,
        last: bool,
        out: &mut String,
    ) -> Step {
        let bytes = input.as_bytes();

        match bytes[start..].iter().position(|&b| is_tag_name_end(b)) {
            Some(len) => {
                let element = if is_end_tag {
                    Element::None
                } else {
                    Element::from_tag_name(&bytes[start..start + len])
                };

                self.ctx = Context {
                    state: State::Tag,
                    element,
                    ..Context::default()
                };

                self.emit(input, start + len, out)
            }
            None if last => {
                self.ctx.state = State::TagName;
                self.emit(input, input.len(), out)
            }
            None => Blocked,
        }
    }

    /// A tag name that was cut short by a previous last chunk. It can't be
    /// classified anymore, so the tag is treated as a regular one.
    fn partial_tag_name(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        match input.as_bytes().iter().position(|&b| is_tag_name_end(b)) {
            Some(0) => {
                trace!(@recover "tag name split by a forced flush");

                self.ctx = Context::default().in_tag();
                self.tag(input, last, out)
            }
            Some(len) => self.emit(input, len, out),
            None => self.emit(input, input.len(), out),
        }
    }

    fn close_tag(&mut self, input: &str, out: &mut String) -> Step {
        self.ctx = Context::element_content(self.ctx.element);
        self.emit(input, 1, out)
    }

    fn tag(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        let bytes = input.as_bytes();

        match bytes[0] {
            b'>' => self.close_tag(input, out),
            b if is_html_whitespace(b) || b == b'/' => self.emit(input, 1, out),
            _ => {
                // NOTE: the first character of a name can be anything, even `=`.
                let name_len = bytes[1..].iter().position(|&b| is_attr_name_end(b));

                match name_len {
                    Some(len) => {
                        self.ctx.attr = AttrType::from_name(&bytes[..len + 1]);
                        self.ctx.state = State::AfterName;
                        self.emit(input, len + 1, out)
                    }
                    None if last => {
                        self.ctx.attr = AttrType::from_name(bytes);
                        self.ctx.state = State::AttrName;
                        self.emit(input, input.len(), out)
                    }
                    None => Blocked,
                }
            }
        }
    }

    /// An attribute name that was cut short by a previous last chunk.
    fn partial_attr_name(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        match input.as_bytes().iter().position(|&b| is_attr_name_end(b)) {
            Some(0) => {
                self.ctx.state = State::AfterName;
                self.after_attr_name(input, last, out)
            }
            Some(len) => self.emit(input, len, out),
            None => self.emit(input, input.len(), out),
        }
    }

    fn after_attr_name(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        match input.as_bytes()[0] {
            b'=' => {
                self.ctx.state = State::BeforeValue;
                self.emit(input, 1, out)
            }
            b'>' => self.close_tag(input, out),
            b if is_html_whitespace(b) => self.emit(input, 1, out),
            _ => {
                self.ctx = self.ctx.in_tag();
                self.tag(input, last, out)
            }
        }
    }

    fn before_attr_value(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        match input.as_bytes()[0] {
            b'"' => {
                self.ctx = self.ctx.attr_value(Delim::DoubleQuote);
                self.emit(input, 1, out)
            }
            b'\'' => {
                self.ctx = self.ctx.attr_value(Delim::SingleQuote);
                self.emit(input, 1, out)
            }
            b'>' => self.close_tag(input, out),
            b if is_html_whitespace(b) => self.emit(input, 1, out),
            _ => {
                self.ctx = self.ctx.attr_value(Delim::SpaceOrTagEnd);
                self.attr_value(input, last, out)
            }
        }
    }

    fn attr_value(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        let b = input.as_bytes()[0];

        match (self.ctx.delim, b) {
            (Delim::DoubleQuote, b'"') | (Delim::SingleQuote, b'\'') => {
                self.ctx = self.ctx.in_tag();
                self.emit(input, 1, out)
            }
            (Delim::SpaceOrTagEnd, b'>') => self.close_tag(input, out),
            (Delim::SpaceOrTagEnd, b) if is_html_whitespace(b) => {
                self.ctx = self.ctx.in_tag();
                self.emit(input, 1, out)
            }
            (Delim::AutoQuote, b'>') => {
                out.push('"');
                self.close_tag(input, out)
            }
            (Delim::AutoQuote, b) if is_html_whitespace(b) => {
                out.push('"');
                self.ctx = self.ctx.in_tag();
                self.emit(input, 1, out)
            }
            (Delim::AutoQuote, b'"') => {
                out.push_str("&#34;");
                self.ctx = transition(self.ctx, '"');

                Consumed(1)
            }
            (_, b'&') => self.char_ref(input, last, out),
            _ => self.emit_char(input, out),
        }
    }

    /// The browser decodes character references in attribute values before the
    /// value is interpreted, so the inner state gets the decoded character.
    fn char_ref(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        match match_char_ref(input.as_bytes(), last) {
            CharRef::Complete { len, ch } => {
                self.ctx = transition(self.ctx, ch);
                self.emit(input, len, out)
            }
            CharRef::Incomplete => Blocked,
            CharRef::None => self.emit_char(input, out),
        }
    }

    fn comment(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        let bytes = input.as_bytes();

        match memchr(b'-', bytes) {
            Some(0) if bytes.starts_with(b"-->") => {
                self.ctx.state = State::Text;
                self.emit(input, 3, out)
            }
            Some(0) if bytes.starts_with(b"--!>") => {
                self.ctx.state = State::Text;
                self.emit(input, 4, out)
            }
            Some(0) if !last && (b"-->".starts_with(bytes) || b"--!>".starts_with(bytes)) => {
                Blocked
            }
            Some(0) => self.emit(input, 1, out),
            Some(len) => self.emit(input, len, out),
            None => self.emit(input, input.len(), out),
        }
    }

    fn bogus_comment(&mut self, input: &str, out: &mut String) -> Step {
        match memchr(b'>', input.as_bytes()) {
            Some(pos) => {
                self.ctx.state = State::Text;
                self.emit(input, pos + 1, out)
            }
            None => self.emit(input, input.len(), out),
        }
    }

    /// Content of script, style and the other special elements, which only ends at
    /// the element's end tag.
    fn element_content(&mut self, input: &str, last: bool, out: &mut String) -> Step {
        let element = self.ctx.element;
        let bytes = input.as_bytes();

        if !element.has_end_tag() || bytes[0] != b'<' {
            if self.ctx.state == State::Rcdata {
                // NOTE: nothing to track in here but the end tag.
                let len = match memchr(b'<', &bytes[1..]) {
                    Some(pos) if element.has_end_tag() => pos + 1,
                    _ => bytes.len(),
                };

                return self.emit(input, len, out);
            }

            return self.emit_char(input, out);
        }

        let name_len = element.tag_name().len();

        let is_end_tag_start = match bytes.get(1) {
            Some(b'/') => element.could_be_end_tag(&bytes[2..]),
            Some(_) => false,
            None => true,
        };

        if !is_end_tag_start {
            return self.emit_char(input, out);
        }

        match bytes.get(2 + name_len).copied() {
            Some(b) if is_tag_name_end(b) => {
                self.ctx = Context {
                    state: State::Tag,
                    ..Context::default()
                };

                self.emit(input, 2 + name_len, out)
            }
            Some(_) => self.emit_char(input, out),
            None if last => {
                trace!(@recover "incomplete end tag at the end of the input");

                self.emit_char(input, out)
            }
            None => Blocked,
        }
    }
}
