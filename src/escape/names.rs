use crate::html::{is_html_whitespace, AttrType, Element};

/// Written instead of an untrusted tag or attribute name that isn't allowed.
pub const UNSAFE_NAME_PLACEHOLDER: &str = "ZautoescZ";

/// The part of a tag or attribute name that trusted text has already written,
/// i.e. the name characters `pending` ends with.
pub(crate) fn pending_name(pending: &str) -> &str {
    let start = pending
        .bytes()
        .rposition(|b| is_html_whitespace(b) || matches!(b, b'<' | b'/' | b'>'))
        .map_or(0, |pos| pos + 1);

    &pending[start..]
}

fn concat_name<'n>(prefix: &str, name: &'n str, buf: &'n mut String) -> &'n str {
    if prefix.is_empty() {
        name
    } else {
        buf.push_str(prefix);
        buf.push_str(name);
        buf.as_str()
    }
}

/// Writes an untrusted tag name that continues `prefix`.
///
/// The name must be ASCII alphanumeric, and it must not complete the name of an
/// element with special content such as `script`.
pub fn filter_tag_name(prefix: &str, name: &str, out: &mut String) {
    let mut buf = String::new();
    let full_name = concat_name(prefix, name, &mut buf);

    let is_allowed = !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_alphanumeric())
        && Element::from_tag_name(full_name.as_bytes()) == Element::None;

    out.push_str(if is_allowed { name } else { UNSAFE_NAME_PLACEHOLDER });
}

/// Writes an untrusted attribute name that continues `prefix`.
///
/// The name must consist of `[A-Za-z0-9_:-]`, and the attribute must not be one
/// that holds a URL, script or style.
pub fn filter_attr_name(prefix: &str, name: &str, out: &mut String) {
    let mut buf = String::new();
    let full_name = concat_name(prefix, name, &mut buf);

    let is_allowed = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b':' | b'-'))
        && AttrType::from_name(full_name.as_bytes()) == AttrType::Plain;

    out.push_str(if is_allowed { name } else { UNSAFE_NAME_PLACEHOLDER });
}
