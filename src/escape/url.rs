use bitflags::bitflags;

/// The value substituted for an untrusted URL whose scheme isn't allowed.
pub const UNSAFE_URL_PLACEHOLDER: &str = "#ZautoescZ";

bitflags! {
    /// URL schemes allowed at the start of an untrusted URL.
    ///
    /// URLs without a scheme are always allowed.
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
    pub struct UrlSchemes: u8 {
        const HTTP = 1;
        const HTTPS = 1 << 1;
        const MAILTO = 1 << 2;
        const TEL = 1 << 3;
        const FTP = 1 << 4;
        const DATA = 1 << 5;
    }
}

impl UrlSchemes {
    /// Looks up a scheme by name, case-insensitively.
    pub fn from_scheme(name: &str) -> Option<Self> {
        Self::all()
            .iter_names()
            .find(|(flag_name, _)| flag_name.eq_ignore_ascii_case(name))
            .map(|(_, flag)| flag)
    }
}

impl Default for UrlSchemes {
    #[inline]
    fn default() -> Self {
        UrlSchemes::HTTP | UrlSchemes::HTTPS | UrlSchemes::MAILTO
    }
}

/// Returns the scheme of `url`: everything before a `:` that isn't preceded by
/// `/`, `?` or `#`.
pub fn url_scheme(url: &str) -> Option<&str> {
    let end = url.find([':', '/', '?', '#'])?;

    (url.as_bytes()[end] == b':').then(|| &url[..end])
}

/// Non-ASCII characters are encoded byte by byte, so `flushed` may point inside a
/// character while its bytes are being encoded.
#[inline]
fn push_percent_encoded(b: u8, out: &mut String) {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    out.push('%');
    out.push(char::from(HEX[usize::from(b >> 4)]));
    out.push(char::from(HEX[usize::from(b & 0xf)]));
}

#[inline]
fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

fn normalize_impl(url: &str, mut encode_scheme_colon: bool, out: &mut String) {
    let mut flushed = 0;

    for (pos, &b) in url.as_bytes().iter().enumerate() {
        let keep = match b {
            b'/' | b'?' | b'#' => {
                encode_scheme_colon = false;
                true
            }
            b':' => !encode_scheme_colon,
            // NOTE: `%` is kept so that already encoded URLs aren't encoded twice.
            b'%' | b'[' | b']' | b'@' | b'!' | b'$' | b'&' | b'*' | b'+' | b',' | b';' | b'=' => {
                true
            }
            _ => is_unreserved(b),
        };

        if !keep {
            if flushed < pos {
                out.push_str(&url[flushed..pos]);
            }

            push_percent_encoded(b, out);
            flushed = pos + 1;
        }
    }

    out.push_str(&url[flushed..]);
}

/// Percent-encodes everything that isn't allowed to appear in a URL, plus quotes
/// and parentheses, so that the URL is safe in any quoted or unquoted attribute
/// value and in CSS `url()`.
#[inline]
pub fn normalize_url(url: &str, out: &mut String) {
    normalize_impl(url, false, out);
}

/// Normalizes a URL that continues a trusted prefix that could still be a scheme
/// name. A `:` that would complete that scheme is encoded.
#[inline]
pub fn normalize_url_after_scheme_prefix(url: &str, out: &mut String) {
    normalize_impl(url, true, out);
}

/// Normalizes a URL that starts an attribute value, replacing the whole URL with
/// [`UNSAFE_URL_PLACEHOLDER`] if its scheme isn't in `allowed`.
pub fn filter_url(url: &str, allowed: UrlSchemes, out: &mut String) {
    if let Some(scheme) = url_scheme(url) {
        let is_allowed = UrlSchemes::from_scheme(scheme).is_some_and(|s| allowed.contains(s));

        if !is_allowed {
            trace!(@substitute scheme);

            out.push_str(UNSAFE_URL_PLACEHOLDER);
            return;
        }
    }

    normalize_url(url, out);
}

/// Encodes a value that is a part of a query string or fragment.
pub fn escape_url_component(input: &str, out: &mut String) {
    let mut flushed = 0;

    for (pos, &b) in input.as_bytes().iter().enumerate() {
        if !is_unreserved(b) {
            if flushed < pos {
                out.push_str(&input[flushed..pos]);
            }

            push_percent_encoded(b, out);
            flushed = pos + 1;
        }
    }

    out.push_str(&input[flushed..]);
}
