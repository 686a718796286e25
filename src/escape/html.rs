use crate::html::entities::{match_char_ref, CharRef};

#[inline]
fn starts_char_ref(input: &[u8]) -> Option<usize> {
    match match_char_ref(input, true) {
        CharRef::Complete { len, .. } => Some(len),
        _ => None,
    }
}

fn escape_html_impl(input: &str, soft: bool, unquoted: bool, out: &mut String) {
    let bytes = input.as_bytes();
    let mut flushed = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let replacement = match bytes[pos] {
            b'&' if soft => match starts_char_ref(&bytes[pos..]) {
                Some(len) => {
                    pos += len;
                    continue;
                }
                None => "&amp;",
            },
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&#34;",
            b'\'' => "&#39;",
            b'\0' => "\u{fffd}",
            b'\t' if unquoted => "&#9;",
            b'\n' if unquoted => "&#10;",
            b'\x0c' if unquoted => "&#12;",
            b'\r' if unquoted => "&#13;",
            b' ' if unquoted => "&#32;",
            b'=' if unquoted => "&#61;",
            b'`' if unquoted => "&#96;",
            _ => {
                pos += 1;
                continue;
            }
        };

        out.push_str(&input[flushed..pos]);
        out.push_str(replacement);
        pos += 1;
        flushed = pos;
    }

    out.push_str(&input[flushed..]);
}

/// Escapes text for HTML text content and quoted attribute values.
///
/// In soft mode an `&` that starts a character reference is kept, so text that has
/// already been escaped isn't escaped twice.
#[inline]
pub fn escape_html(input: &str, soft: bool, out: &mut String) {
    escape_html_impl(input, soft, false, out);
}

/// Escapes text for an unquoted attribute value: on top of what [`escape_html`] does,
/// every character that could end the value or confuse old browsers is replaced
/// with a reference.
#[inline]
pub fn escape_html_attr_unquoted(input: &str, soft: bool, out: &mut String) {
    escape_html_impl(input, soft, true, out);
}
