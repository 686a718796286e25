//! Tracking of where in the HTML grammar the output cursor currently sits.
//!
//! The machine works on two levels. The HTML level (see [`ContextMachine`]) deals with tags,
//! attributes, comments and the end tags of special elements, and it may need to see a few
//! bytes ahead before committing to a decision. Everything inside script, style and attribute
//! values is handled one character at a time by a pure transition function.

mod machine;
mod transitions;

use bitflags::bitflags;

pub use self::machine::ContextMachine;
pub use crate::base::Chunk;
pub use crate::html::{AttrType, Element};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub enum State {
    /// Regular HTML text.
    #[default]
    Text,
    /// Inside a tag name, right after `<` or `</`.
    TagName,
    /// Inside a tag, between attributes.
    Tag,
    AttrName,
    /// After an attribute name, before a possible `=`.
    AfterName,
    /// After `=`, before the value starts.
    BeforeValue,
    /// Inside the value of an attribute that isn't a URL, script or style.
    Attr,
    Url,
    Js,
    /// After a `/` in JS code. The next character tells a comment from a
    /// regular expression or a division.
    JsSlash,
    JsDqStr,
    JsSqStr,
    /// Inside a template literal.
    JsBqStr,
    JsRegexp,
    JsBlockCmt,
    JsLineCmt,
    Css,
    CssSlash,
    CssDqStr,
    CssSqStr,
    /// Right after `url(`.
    CssUrlOpen,
    CssUrl,
    CssDqUrl,
    CssSqUrl,
    CssBlockCmt,
    CssLineCmt,
    /// Inside an element whose content isn't markup, e.g. `<textarea>`.
    Rcdata,
    Comment,
    BogusComment,
}

impl State {
    #[inline]
    pub fn is_js(self) -> bool {
        matches!(
            self,
            State::Js
                | State::JsSlash
                | State::JsDqStr
                | State::JsSqStr
                | State::JsBqStr
                | State::JsRegexp
                | State::JsBlockCmt
                | State::JsLineCmt
        )
    }

    #[inline]
    pub fn is_css(self) -> bool {
        matches!(
            self,
            State::Css
                | State::CssSlash
                | State::CssDqStr
                | State::CssSqStr
                | State::CssUrlOpen
                | State::CssUrl
                | State::CssDqUrl
                | State::CssSqUrl
                | State::CssBlockCmt
                | State::CssLineCmt
        )
    }

    /// States in which a backslash escapes the next character.
    #[inline]
    pub fn allows_escapes(self) -> bool {
        matches!(
            self,
            State::JsDqStr
                | State::JsSqStr
                | State::JsBqStr
                | State::JsRegexp
                | State::CssDqStr
                | State::CssSqStr
                | State::CssDqUrl
                | State::CssSqUrl
        )
    }
}

/// How the current attribute value ends.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub enum Delim {
    #[default]
    None,
    DoubleQuote,
    SingleQuote,
    /// An unquoted value.
    SpaceOrTagEnd,
    /// An unquoted value that started with an untrusted value, so the writer
    /// opened a `"` on its behalf and will close it where the value ends.
    AutoQuote,
}

impl Delim {
    #[inline]
    pub fn is_unquoted(self) -> bool {
        matches!(self, Delim::SpaceOrTagEnd | Delim::AutoQuote)
    }
}

/// How much of a URL has been seen.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub enum UrlPart {
    /// Nothing but whitespace yet.
    #[default]
    None,
    /// Only characters that may form a scheme, e.g. `jav`.
    Scheme,
    /// Past the scheme, but before any `?` or `#`.
    PreQuery,
    QueryOrFrag,
}

/// What a `/` means at the current position of JS code.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub enum JsCtx {
    /// A `/` starts a regular expression.
    #[default]
    Regexp,
    /// A `/` is a division operator.
    DivOp,
}

bitflags! {
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
    pub struct ContextFlags: u8 {
        /// The previous character was an unescaped backslash.
        const PARTIAL_ESCAPE = 1;
        /// Inside a `[...]` class of a regular expression.
        const REGEXP_CLASS = 1 << 1;
        /// The previous character of a block comment was `*`.
        const COMMENT_STAR = 1 << 2;
    }
}

const JS_WORD_CAPACITY: usize = 10;

static JS_REGEXP_PRECEDERS: &[&[u8]] = &[
    b"await",
    b"break",
    b"case",
    b"continue",
    b"delete",
    b"do",
    b"else",
    b"finally",
    b"in",
    b"instanceof",
    b"return",
    b"throw",
    b"try",
    b"typeof",
    b"void",
    b"yield",
];

/// The identifier that JS code currently ends with, as long as it's short enough
/// to be a keyword.
#[derive(Copy, Clone, PartialEq, Eq, Default, Hash)]
pub(crate) struct JsWord {
    buf: [u8; JS_WORD_CAPACITY],
    // NOTE: `JS_WORD_CAPACITY + 1` means the word is too long to be a keyword.
    len: u8,
}

impl JsWord {
    #[inline]
    pub fn push(&mut self, ch: char) {
        let len = usize::from(self.len);

        if ch.is_ascii() && len < JS_WORD_CAPACITY {
            self.buf[len] = ch as u8;
            self.len += 1;
        } else {
            self.len = JS_WORD_CAPACITY as u8 + 1;
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn precedes_regexp(&self) -> bool {
        let len = usize::from(self.len);

        len <= JS_WORD_CAPACITY && JS_REGEXP_PRECEDERS.iter().any(|kw| *kw == &self.buf[..len])
    }
}

impl std::fmt::Debug for JsWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.buf.get(..usize::from(self.len)) {
            Some(word) => write!(f, "{:?}", String::from_utf8_lossy(word)),
            None => f.write_str("<long>"),
        }
    }
}

/// The position of the output cursor in the document grammar.
///
/// `Context` is a small `Copy` value: it can be snapshotted and compared freely.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Context {
    pub(crate) state: State,
    pub(crate) element: Element,
    pub(crate) attr: AttrType,
    pub(crate) delim: Delim,
    pub(crate) url_part: UrlPart,
    pub(crate) js_ctx: JsCtx,
    pub(crate) flags: ContextFlags,
    pub(crate) js_word: JsWord,
    pub(crate) js_last: u8,
    // NOTE: how much of `url` has been matched right before a possible `(`.
    pub(crate) css_url_prefix: u8,
}

impl Context {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// The special element whose content (or start tag) the cursor is in.
    #[inline]
    pub fn element(&self) -> Element {
        self.element
    }

    /// The type of the attribute whose name or value the cursor is in.
    #[inline]
    pub fn attr(&self) -> AttrType {
        self.attr
    }

    #[inline]
    pub fn delim(&self) -> Delim {
        self.delim
    }

    #[inline]
    pub fn url_part(&self) -> UrlPart {
        self.url_part
    }

    #[inline]
    pub fn js_ctx(&self) -> JsCtx {
        self.js_ctx
    }

    #[inline]
    pub fn flags(&self) -> ContextFlags {
        self.flags
    }

    /// Returns `true` if an unescaped backslash right before the cursor would
    /// escape the first character of whatever is written next.
    #[inline]
    pub fn has_partial_escape(&self) -> bool {
        self.flags.contains(ContextFlags::PARTIAL_ESCAPE) && self.state.allows_escapes()
    }

    /// Returns `true` if the cursor is in an attribute value.
    #[inline]
    pub fn in_attr_value(&self) -> bool {
        self.delim != Delim::None
    }

    /// The context at the start of the content of `element`.
    pub(crate) fn element_content(element: Element) -> Self {
        let state = match element {
            Element::None => State::Text,
            Element::Script => State::Js,
            Element::Style => State::Css,
            _ => State::Rcdata,
        };

        Context {
            state,
            element,
            ..Context::default()
        }
    }

    /// The context at the start of an attribute value of the given type.
    pub(crate) fn attr_value(self, delim: Delim) -> Self {
        let state = match self.attr {
            AttrType::Url => State::Url,
            AttrType::Js => State::Js,
            AttrType::Css => State::Css,
            AttrType::Plain | AttrType::None => State::Attr,
        };

        Context {
            state,
            element: self.element,
            attr: self.attr,
            delim,
            ..Context::default()
        }
    }

    /// The context right after an attribute, still inside the tag.
    #[inline]
    pub(crate) fn in_tag(self) -> Self {
        Context {
            state: State::Tag,
            element: self.element,
            ..Context::default()
        }
    }
}
