use std::fmt::Write;

#[inline]
fn js_string_replacement(ch: char) -> Option<&'static str> {
    Some(match ch {
        '\0' => "\\x00",
        '\t' => "\\t",
        '\n' => "\\n",
        '\r' => "\\r",
        '\x08' => "\\b",
        '\x0c' => "\\f",
        '\x0b' => "\\x0b",
        '"' => "\\x22",
        '\'' => "\\x27",
        '`' => "\\x60",
        '\\' => "\\\\",
        '/' => "\\/",
        '<' => "\\x3c",
        '>' => "\\x3e",
        '&' => "\\x26",
        '=' => "\\x3d",
        '$' => "\\x24",
        '\u{2028}' => "\\u2028",
        '\u{2029}' => "\\u2029",
        _ => return None,
    })
}

#[inline]
fn regexp_replacement(ch: char) -> Option<&'static str> {
    Some(match ch {
        '.' => "\\.",
        '*' => "\\*",
        '+' => "\\+",
        '?' => "\\?",
        '^' => "\\^",
        '{' => "\\{",
        '}' => "\\}",
        '(' => "\\(",
        ')' => "\\)",
        '[' => "\\[",
        ']' => "\\]",
        '|' => "\\|",
        '-' => "\\-",
        _ => return js_string_replacement(ch),
    })
}

fn escape_with(input: &str, out: &mut String, replacement: fn(char) -> Option<&'static str>) {
    let mut flushed = 0;

    for (pos, ch) in input.char_indices() {
        let next = pos + ch.len_utf8();

        if let Some(replacement) = replacement(ch) {
            out.push_str(&input[flushed..pos]);
            out.push_str(replacement);
            flushed = next;
        } else if ch.is_control() {
            out.push_str(&input[flushed..pos]);
            // NOTE: writing to a `String` can't fail.
            let _ = write!(out, "\\u{:04x}", u32::from(ch));
            flushed = next;
        }
    }

    out.push_str(&input[flushed..]);
}

/// Escapes text for the inside of a JS string or template literal.
///
/// The output contains no quotes, no characters that are special in HTML and no line
/// terminators, so it's also safe in script attribute values and can't end a
/// `<script>` element.
#[inline]
pub fn escape_js_string(input: &str, out: &mut String) {
    escape_with(input, out, js_string_replacement);
}

/// Escapes text for the inside of a JS regular expression literal, so that it
/// matches itself literally.
///
/// An empty input produces `(?:)`, which keeps the literal from turning into
/// a `//` comment.
pub fn escape_js_regexp(input: &str, out: &mut String) {
    if input.is_empty() {
        out.push_str("(?:)");
    } else {
        escape_with(input, out, regexp_replacement);
    }
}
