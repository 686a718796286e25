//! Per-character transitions of the states that live inside element content and
//! attribute values: URLs, JS and CSS. Delimiters of those regions (quotes ending an
//! attribute value, `</script` and the like) are handled by the machine before a
//! character gets here.

use super::{Context, ContextFlags, JsCtx, State, UrlPart};

#[inline]
fn is_js_whitespace(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c' | '\u{a0}' | '\u{2028}' | '\u{2029}' | '\u{feff}'
    )
}

#[inline]
fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[inline]
fn is_js_ident_char(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphanumeric()
}

#[inline]
fn is_css_ident_char(ch: char) -> bool {
    ch == '-' || ch == '_' || ch.is_alphanumeric()
}

#[inline]
fn is_scheme_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.')
}

#[inline]
fn last_byte(ch: char) -> u8 {
    if ch.is_ascii() {
        ch as u8
    } else {
        b'a'
    }
}

pub(crate) fn next_url_part(part: UrlPart, ch: char) -> UrlPart {
    match part {
        UrlPart::QueryOrFrag => UrlPart::QueryOrFrag,
        _ if ch == '?' || ch == '#' => UrlPart::QueryOrFrag,
        UrlPart::None if crate::html::is_html_whitespace(last_byte(ch)) => UrlPart::None,
        UrlPart::None | UrlPart::Scheme if is_scheme_char(ch) => UrlPart::Scheme,
        _ => UrlPart::PreQuery,
    }
}

/// Feeds one character to the context.
///
/// Total: states that don't look at individual characters (HTML text, tags, comments)
/// are returned unchanged.
pub fn transition(mut ctx: Context, ch: char) -> Context {
    match ctx.state {
        State::Url => ctx.url_part = next_url_part(ctx.url_part, ch),

        State::Js => js_code(&mut ctx, ch),
        State::JsSlash => js_slash(&mut ctx, ch),
        State::JsDqStr => quoted(&mut ctx, ch, '"', State::Js),
        State::JsSqStr => quoted(&mut ctx, ch, '\'', State::Js),
        State::JsBqStr => quoted(&mut ctx, ch, '`', State::Js),
        State::JsRegexp => js_regexp(&mut ctx, ch),
        State::JsBlockCmt => block_comment(&mut ctx, ch, State::Js),
        State::JsLineCmt if is_line_terminator(ch) => ctx.state = State::Js,

        State::Css => css_code(&mut ctx, ch),
        State::CssSlash => match ch {
            '*' => ctx.state = State::CssBlockCmt,
            '/' => ctx.state = State::CssLineCmt,
            _ => {
                ctx.state = State::Css;
                css_code(&mut ctx, ch);
            }
        },
        State::CssDqStr => quoted(&mut ctx, ch, '"', State::Css),
        State::CssSqStr => quoted(&mut ctx, ch, '\'', State::Css),
        State::CssUrlOpen => css_url_open(&mut ctx, ch),
        State::CssUrl => {
            if ch == ')' || crate::html::is_html_whitespace(last_byte(ch)) {
                ctx.state = State::Css;
            } else {
                ctx.url_part = next_url_part(ctx.url_part, ch);
            }
        }
        State::CssDqUrl => {
            quoted(&mut ctx, ch, '"', State::Css);

            if ctx.state == State::CssDqUrl {
                ctx.url_part = next_url_part(ctx.url_part, ch);
            }
        }
        State::CssSqUrl => {
            quoted(&mut ctx, ch, '\'', State::Css);

            if ctx.state == State::CssSqUrl {
                ctx.url_part = next_url_part(ctx.url_part, ch);
            }
        }
        State::CssBlockCmt => block_comment(&mut ctx, ch, State::Css),
        State::CssLineCmt if matches!(ch, '\n' | '\r' | '\x0c') => ctx.state = State::Css,

        _ => (),
    }

    ctx
}

fn js_code(ctx: &mut Context, ch: char) {
    match ch {
        '"' => ctx.state = State::JsDqStr,
        '\'' => ctx.state = State::JsSqStr,
        '`' => ctx.state = State::JsBqStr,
        '/' => ctx.state = State::JsSlash,
        _ if is_js_whitespace(ch) => (),
        _ => ctx.js_ctx = next_js_ctx(ctx, ch),
    }

    if !is_js_ident_char(ch) {
        ctx.js_word.clear();
    }

    ctx.js_last = last_byte(ch);
}

/// Decides whether a `/` following `ch` would start a regular expression.
fn next_js_ctx(ctx: &mut Context, ch: char) -> JsCtx {
    match ch {
        // NOTE: `++` and `--` are postfix operators that precede a division, but
        // a single `+` or `-` is a binary or unary operator. Runs alternate.
        '+' | '-' if ctx.js_last == ch as u8 && ctx.js_ctx == JsCtx::Regexp => JsCtx::DivOp,
        '+' | '-' => JsCtx::Regexp,
        // `42.` is a number.
        '.' if ctx.js_last.is_ascii_digit() => JsCtx::DivOp,
        '.' | ',' | '<' | '>' | '=' | '*' | '%' | '&' | '|' | '^' | '?' | '!' | '~' | '('
        | '[' | ':' | ';' | '{' | '}' => JsCtx::Regexp,
        _ if is_js_ident_char(ch) => {
            ctx.js_word.push(ch);

            if ctx.js_word.precedes_regexp() {
                JsCtx::Regexp
            } else {
                JsCtx::DivOp
            }
        }
        _ => JsCtx::DivOp,
    }
}

fn js_slash(ctx: &mut Context, ch: char) {
    match ch {
        '/' => ctx.state = State::JsLineCmt,
        '*' => ctx.state = State::JsBlockCmt,
        _ if ctx.js_ctx == JsCtx::Regexp => {
            ctx.state = State::JsRegexp;
            js_regexp(ctx, ch);
        }
        _ => {
            // A division, which is followed by an operand.
            ctx.state = State::Js;
            ctx.js_ctx = JsCtx::Regexp;
            ctx.js_last = b'/';
            js_code(ctx, ch);
        }
    }
}

fn js_regexp(ctx: &mut Context, ch: char) {
    if ctx.flags.contains(ContextFlags::PARTIAL_ESCAPE) {
        ctx.flags.remove(ContextFlags::PARTIAL_ESCAPE);
        return;
    }

    match ch {
        '\\' => ctx.flags.insert(ContextFlags::PARTIAL_ESCAPE),
        '[' => ctx.flags.insert(ContextFlags::REGEXP_CLASS),
        ']' => ctx.flags.remove(ContextFlags::REGEXP_CLASS),
        '/' if !ctx.flags.contains(ContextFlags::REGEXP_CLASS) => {
            ctx.state = State::Js;
            ctx.js_ctx = JsCtx::DivOp;
            ctx.js_last = b'/';
        }
        _ if is_line_terminator(ch) => {
            trace!(@recover "line terminator in a regular expression literal");

            ctx.state = State::Js;
            ctx.js_ctx = JsCtx::Regexp;
            ctx.flags = ContextFlags::empty();
        }
        _ => (),
    }
}

/// Strings, and URLs in quotes.
fn quoted(ctx: &mut Context, ch: char, quote: char, exit: State) {
    if ctx.flags.contains(ContextFlags::PARTIAL_ESCAPE) {
        ctx.flags.remove(ContextFlags::PARTIAL_ESCAPE);
        return;
    }

    if ch == '\\' {
        ctx.flags.insert(ContextFlags::PARTIAL_ESCAPE);
    } else if ch == quote {
        ctx.state = exit;
        ctx.js_ctx = JsCtx::DivOp;
        ctx.js_last = last_byte(quote);
        ctx.css_url_prefix = 0;
    } else if exit == State::Css && matches!(ch, '\n' | '\r' | '\x0c') {
        trace!(@recover "unterminated CSS string");

        ctx.state = State::Css;
        ctx.css_url_prefix = 0;
    }
}

fn block_comment(ctx: &mut Context, ch: char, exit: State) {
    if ch == '/' && ctx.flags.contains(ContextFlags::COMMENT_STAR) {
        ctx.state = exit;
        ctx.flags.remove(ContextFlags::COMMENT_STAR);
    } else if ch == '*' {
        ctx.flags.insert(ContextFlags::COMMENT_STAR);
    } else {
        ctx.flags.remove(ContextFlags::COMMENT_STAR);
    }
}

fn css_code(ctx: &mut Context, ch: char) {
    ctx.css_url_prefix = match ch {
        '"' => {
            ctx.state = State::CssDqStr;
            0
        }
        '\'' => {
            ctx.state = State::CssSqStr;
            0
        }
        '/' => {
            ctx.state = State::CssSlash;
            0
        }
        '(' => {
            if ctx.css_url_prefix == 3 {
                ctx.state = State::CssUrlOpen;
                ctx.url_part = UrlPart::None;
            }

            0
        }
        'u' | 'U' if ctx.css_url_prefix == 0 => 1,
        'r' | 'R' if ctx.css_url_prefix == 1 => 2,
        'l' | 'L' if ctx.css_url_prefix == 2 => 3,
        // NOTE: in the middle of some other identifier, so `url(` can't follow.
        _ if is_css_ident_char(ch) => 4,
        _ => 0,
    };
}

fn css_url_open(ctx: &mut Context, ch: char) {
    match ch {
        '"' => ctx.state = State::CssDqUrl,
        '\'' => ctx.state = State::CssSqUrl,
        ')' => ctx.state = State::Css,
        _ if crate::html::is_html_whitespace(last_byte(ch)) => (),
        _ => {
            ctx.state = State::CssUrl;
            ctx.url_part = next_url_part(ctx.url_part, ch);
        }
    }
}
