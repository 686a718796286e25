//! Escaping of untrusted text for the context it's written in.
//!
//! Every escaper is a total function: it never refuses its input. Input that can't be made
//! safe in a given position (a `javascript:` URL, a `script` tag name) is replaced with
//! a fixed placeholder instead.

mod css;
mod html;
mod js;
mod names;
mod url;

use crate::context::{Context, Delim, JsCtx, State, UrlPart};

pub use self::css::escape_css;
pub use self::html::{escape_html, escape_html_attr_unquoted};
pub use self::js::{escape_js_regexp, escape_js_string};
pub(crate) use self::names::pending_name;
pub use self::names::{filter_attr_name, filter_tag_name, UNSAFE_NAME_PLACEHOLDER};
pub use self::url::{
    escape_url_component, filter_url, normalize_url, normalize_url_after_scheme_prefix,
    url_scheme, UrlSchemes, UNSAFE_URL_PLACEHOLDER,
};

/// The escaping function for a grammar position.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Escaper {
    Html,
    TagName,
    AttrName,
    /// Filtering or encoding, depending on how much of the URL precedes the value.
    Url(UrlPart),
    /// A value in JS code, which must be serialized as a JS literal. The literal is
    /// written as is.
    JsValue,
    JsString,
    JsRegexp,
    Css,
}

/// The second escaping pass applied to values inside attribute values.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AttrEscaper {
    None,
    Quoted,
    Unquoted,
}

/// What to do with a piece of output text.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EscapeDirective {
    /// Trusted text, written as is.
    PassThroughSafe,
    Apply {
        escaper: Escaper,
        attr: AttrEscaper,
        /// The text before the value ends with a backslash that would escape the first
        /// character of the value, so the value is prefixed with another backslash.
        partial_escape: bool,
    },
}

/// Writer-wide settings that escapers depend on.
#[derive(Copy, Clone, Debug)]
pub struct EscapeOptions<'o> {
    pub soft: bool,
    pub allowed_schemes: UrlSchemes,
    /// The tag or attribute name characters that trusted text has written right
    /// before the value.
    pub name_prefix: &'o str,
}

impl Default for EscapeOptions<'_> {
    fn default() -> Self {
        EscapeOptions {
            soft: false,
            allowed_schemes: UrlSchemes::default(),
            name_prefix: "",
        }
    }
}

impl Escaper {
    /// Returns the escaper for untrusted text at `ctx`, ignoring attribute delimiters.
    pub fn for_context(ctx: &Context) -> Self {
        match ctx.state() {
            State::Text | State::Rcdata | State::Attr | State::Comment | State::BogusComment => {
                Escaper::Html
            }
            State::TagName => Escaper::TagName,
            State::Tag | State::AttrName | State::AfterName => Escaper::AttrName,
            // NOTE: the writer starts a quoted value before it gets here.
            State::BeforeValue => Escaper::for_context(&ctx.attr_value(Delim::AutoQuote)),
            State::Url | State::CssUrlOpen | State::CssUrl | State::CssDqUrl | State::CssSqUrl => {
                Escaper::Url(ctx.url_part())
            }
            State::Js => Escaper::JsValue,
            State::JsSlash => match ctx.js_ctx() {
                JsCtx::Regexp => Escaper::JsRegexp,
                JsCtx::DivOp => Escaper::JsValue,
            },
            State::JsDqStr
            | State::JsSqStr
            | State::JsBqStr
            | State::JsBlockCmt
            | State::JsLineCmt => Escaper::JsString,
            State::JsRegexp => Escaper::JsRegexp,
            State::Css
            | State::CssSlash
            | State::CssDqStr
            | State::CssSqStr
            | State::CssBlockCmt
            | State::CssLineCmt => Escaper::Css,
        }
    }

    /// Writes `input` escaped to `out`.
    pub fn escape(self, input: &str, options: &EscapeOptions<'_>, out: &mut String) {
        match self {
            Escaper::Html => escape_html(input, options.soft, out),
            Escaper::TagName => filter_tag_name(options.name_prefix, input, out),
            Escaper::AttrName => filter_attr_name(options.name_prefix, input, out),
            Escaper::Url(UrlPart::None) => filter_url(input, options.allowed_schemes, out),
            Escaper::Url(UrlPart::Scheme) => normalize_url_after_scheme_prefix(input, out),
            Escaper::Url(UrlPart::PreQuery) => normalize_url(input, out),
            Escaper::Url(UrlPart::QueryOrFrag) => escape_url_component(input, out),
            Escaper::JsValue => out.push_str(input),
            Escaper::JsString => escape_js_string(input, out),
            Escaper::JsRegexp => escape_js_regexp(input, out),
            Escaper::Css => escape_css(input, out),
        }
    }
}

impl EscapeDirective {
    /// Returns the directive for an untrusted value written at `ctx`.
    pub fn for_context(ctx: &Context) -> Self {
        let attr = match ctx.delim() {
            Delim::None if ctx.state() == State::BeforeValue => AttrEscaper::Unquoted,
            Delim::None => AttrEscaper::None,
            Delim::DoubleQuote | Delim::SingleQuote => AttrEscaper::Quoted,
            Delim::SpaceOrTagEnd | Delim::AutoQuote => AttrEscaper::Unquoted,
        };

        EscapeDirective::Apply {
            escaper: Escaper::for_context(ctx),
            attr,
            partial_escape: ctx.has_partial_escape(),
        }
    }

    #[inline]
    pub fn escaper(&self) -> Option<Escaper> {
        match self {
            EscapeDirective::PassThroughSafe => None,
            EscapeDirective::Apply { escaper, .. } => Some(*escaper),
        }
    }

    /// Writes `input` to `out` as the directive says. `scratch` holds intermediate
    /// results of two-pass escaping.
    pub fn apply(
        &self,
        input: &str,
        options: &EscapeOptions<'_>,
        scratch: &mut String,
        out: &mut String,
    ) {
        let (escaper, attr, partial_escape) = match *self {
            EscapeDirective::PassThroughSafe => {
                out.push_str(input);
                return;
            }
            EscapeDirective::Apply {
                escaper,
                attr,
                partial_escape,
            } => (escaper, attr, partial_escape),
        };

        if partial_escape {
            out.push('\\');
        }

        match (escaper, attr) {
            (Escaper::Html, AttrEscaper::Unquoted) => {
                escape_html_attr_unquoted(input, options.soft, out);
            }
            // NOTE: names are filtered down to characters that are safe everywhere.
            (Escaper::Html | Escaper::TagName | Escaper::AttrName, _) | (_, AttrEscaper::None) => {
                escaper.escape(input, options, out);
            }
            (_, attr) => {
                scratch.clear();
                escaper.escape(input, options, scratch);

                // NOTE: soft mode only applies to HTML text. A character reference kept
                // here would be decoded by the browser after the inner escaper ran.
                if attr == AttrEscaper::Unquoted {
                    escape_html_attr_unquoted(scratch, false, out);
                } else {
                    escape_html(scratch, false, out);
                }

                scratch.clear();
            }
        }
    }
}
