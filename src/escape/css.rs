use std::fmt::Write;

#[inline]
fn is_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

/// Escapes text for CSS: every character outside `[A-Za-z0-9_-]` is replaced with a
/// hex escape.
///
/// A hex escape is terminated with a space if the next character could otherwise
/// be taken as a part of it, and always at the end of the input, because the text
/// that follows isn't known.
pub fn escape_css(input: &str, out: &mut String) {
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if is_safe(ch) {
            out.push(ch);
            continue;
        }

        // NOTE: writing to a `String` can't fail.
        let _ = write!(out, "\\{:x}", u32::from(ch));

        let needs_separator = match chars.peek() {
            Some(next) => {
                next.is_ascii_hexdigit() || matches!(next, ' ' | '\t' | '\n' | '\r' | '\x0c')
            }
            None => true,
        };

        if needs_separator {
            out.push(' ');
        }
    }
}
