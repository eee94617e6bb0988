//! Known tag vocabulary.
//!
//! Tag names in this table may be sent as atoms when the caller asks for
//! short tag atoms, and are the only names accepted as a fragment context.
//! Names are lowercase; lookups are exact.

/// Known tag names, sorted for binary search.
pub const KNOWN_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "address", "altglyph", "altglyphdef", "altglyphitem",
    "animatecolor", "animatemotion", "animatetransform", "annotation-xml", "applet",
    "area", "article", "aside", "audio", "b", "base", "basefont", "bdi", "bdo", "bgsound",
    "big", "blink", "blockquote", "body", "br", "button", "canvas", "caption", "center",
    "circle", "cite", "clippath", "code", "col", "colgroup", "data", "datalist", "dd",
    "del", "desc", "details", "dfn", "dialog", "dir", "div", "dl", "dt", "em", "embed",
    "feblend", "fecolormatrix", "fecomponenttransfer", "fecomposite", "feconvolvematrix",
    "fediffuselighting", "fedisplacementmap", "fedistantlight", "fedropshadow", "feflood",
    "fefunca", "fefuncb", "fefuncg", "fefuncr", "fegaussianblur", "feimage", "femerge",
    "femergenode", "femorphology", "feoffset", "fepointlight", "fespecularlighting",
    "fespotlight", "fetile", "feturbulence", "fieldset", "figcaption", "figure", "filter",
    "font", "footer", "foreignobject", "form", "frame", "frameset", "glyphref", "h1", "h2",
    "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe",
    "image", "img", "input", "ins", "isindex", "kbd", "keygen", "label", "legend", "li",
    "lineargradient", "link", "listing", "main", "malignmark", "map", "mark", "marquee",
    "math", "menu", "meta", "meter", "mfenced", "mglyph", "mi", "mn", "mo", "ms", "mtext",
    "multicol", "nav", "nextid", "nobr", "noembed", "noframes", "noscript", "object", "ol",
    "optgroup", "option", "output", "p", "param", "path", "picture", "plaintext", "pre",
    "progress", "q", "radialgradient", "rb", "rp", "rt", "rtc", "ruby", "s", "samp",
    "script", "search", "section", "select", "slot", "small", "source", "spacer", "span",
    "strike", "strong", "style", "sub", "summary", "sup", "svg", "table", "tbody", "td",
    "template", "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "tt",
    "u", "ul", "var", "video", "wbr", "xmp",
];

/// HTML void elements, sorted for binary search.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img",
    "input", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Look up a tag name and return the table's `'static` copy of it.
pub fn known_tag(name: &str) -> Option<&'static str> {
    KNOWN_TAGS
        .binary_search(&name)
        .ok()
        .map(|index| KNOWN_TAGS[index])
}

/// Check if a lowercase HTML tag name is a void element.
#[inline]
pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.binary_search(&name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_sorted_and_unique() {
        assert!(KNOWN_TAGS.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(VOID_TAGS.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_void_tags_are_known() {
        assert!(VOID_TAGS.iter().all(|tag| known_tag(tag).is_some()));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(known_tag("div"), Some("div"));
        assert_eq!(known_tag("annotation-xml"), Some("annotation-xml"));
        assert_eq!(known_tag("h6"), Some("h6"));
        assert_eq!(known_tag("not-a-real-tag"), None);
        assert_eq!(known_tag("DIV"), None);
        assert_eq!(known_tag(""), None);
    }

    #[test]
    fn test_void_lookup() {
        assert!(is_void_tag("br"));
        assert!(is_void_tag("img"));
        assert!(!is_void_tag("p"));
        assert!(!is_void_tag("template"));
    }
}
