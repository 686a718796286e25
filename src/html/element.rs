/// An element whose content isn't regular HTML text, so the machine has to
/// remember it until the matching end tag.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub enum Element {
    #[default]
    None,
    Script,
    Style,
    Textarea,
    Title,
    Xmp,
    Iframe,
    Noembed,
    Noframes,
    Noscript,
    Plaintext,
}

impl Element {
    const SPECIAL: [Element; 10] = [
        Element::Script,
        Element::Style,
        Element::Textarea,
        Element::Title,
        Element::Xmp,
        Element::Iframe,
        Element::Noembed,
        Element::Noframes,
        Element::Noscript,
        Element::Plaintext,
    ];

    /// Classifies a start tag name (case-insensitively).
    pub fn from_tag_name(name: &[u8]) -> Self {
        Self::SPECIAL
            .iter()
            .copied()
            .find(|el| name.eq_ignore_ascii_case(el.tag_name().as_bytes()))
            .unwrap_or(Element::None)
    }

    pub fn tag_name(self) -> &'static str {
        match self {
            Element::None => "",
            Element::Script => "script",
            Element::Style => "style",
            Element::Textarea => "textarea",
            Element::Title => "title",
            Element::Xmp => "xmp",
            Element::Iframe => "iframe",
            Element::Noembed => "noembed",
            Element::Noframes => "noframes",
            Element::Noscript => "noscript",
            Element::Plaintext => "plaintext",
        }
    }

    /// `<plaintext>` swallows the rest of the document.
    #[inline]
    pub fn has_end_tag(self) -> bool {
        !matches!(self, Element::None | Element::Plaintext)
    }

    /// Returns `true` if `input` (the text right after `</`) is a prefix of this
    /// element's end tag name that could still turn into a match.
    pub(crate) fn could_be_end_tag(self, input: &[u8]) -> bool {
        let name = self.tag_name().as_bytes();
        let len = input.len().min(name.len());

        input[..len].eq_ignore_ascii_case(&name[..len])
    }
}
