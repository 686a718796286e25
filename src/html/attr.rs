use super::{contains_ignore_case, starts_with_ignore_case};

/// What the browser does with an attribute's value.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub enum AttrType {
    /// Not in an attribute.
    #[default]
    None,
    Plain,
    Url,
    Js,
    Css,
}

static URL_ATTRS: &[&str] = &[
    "action",
    "archive",
    "background",
    "cite",
    "classid",
    "codebase",
    "data",
    "formaction",
    "href",
    "icon",
    "longdesc",
    "manifest",
    "poster",
    "profile",
    "src",
    "srcset",
    "usemap",
];

// NOTE: these contain "src" but hold markup or plain text.
static PLAIN_ATTRS: &[&str] = &["srcdoc", "srclang"];

impl AttrType {
    /// Classifies an attribute by its (possibly namespaced) name.
    pub fn from_name(name: &[u8]) -> Self {
        let mut name = name;

        if starts_with_ignore_case(name, b"data-") {
            name = &name[5..];
        } else if let Some(colon) = memchr::memchr(b':', name) {
            if name[..colon].eq_ignore_ascii_case(b"xmlns") {
                return AttrType::Url;
            }

            name = &name[colon + 1..];
        }

        let is_one_of =
            |list: &[&str]| list.iter().any(|n| name.eq_ignore_ascii_case(n.as_bytes()));

        if name.eq_ignore_ascii_case(b"style") {
            AttrType::Css
        } else if is_one_of(PLAIN_ATTRS) {
            AttrType::Plain
        } else if is_one_of(URL_ATTRS) || name.eq_ignore_ascii_case(b"xmlns") {
            AttrType::Url
        } else if starts_with_ignore_case(name, b"on") {
            AttrType::Js
        } else if [b"src".as_slice(), b"uri", b"url"]
            .iter()
            .any(|n| contains_ignore_case(name, n))
        {
            AttrType::Url
        } else {
            AttrType::Plain
        }
    }
}
