//! Encoding options carried by a request.

use bitflags::bitflags;

bitflags! {
    /// Independent switches for the tree encoder.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EncodingFlags: u8 {
        /// Known HTML tag names are sent as atoms (`html_atoms`)
        const SHORT_TAG_ATOMS = 0b0000_0001;

        /// Childless void elements get `nil` as their children (`nil_self_closing`)
        const VOID_AS_NIL = 0b0000_0010;

        /// Comments are sent as `{comment, [], Text}` (`comment_tuple3`)
        const COMMENT_ATTR_SLOT = 0b0000_0100;
    }
}

/// Option atom names.
pub const OPT_HTML_ATOMS: &str = "html_atoms";
pub const OPT_NIL_SELF_CLOSING: &str = "nil_self_closing";
pub const OPT_COMMENT_TUPLE3: &str = "comment_tuple3";

impl EncodingFlags {
    /// Flag named by one option atom. Unknown names map to the empty set.
    pub fn from_option(name: &str) -> Self {
        match name {
            OPT_HTML_ATOMS => EncodingFlags::SHORT_TAG_ATOMS,
            OPT_NIL_SELF_CLOSING => EncodingFlags::VOID_AS_NIL,
            OPT_COMMENT_TUPLE3 => EncodingFlags::COMMENT_ATTR_SLOT,
            _ => EncodingFlags::empty(),
        }
    }

    /// Fold any number of option atoms into one flag set.
    pub fn resolve<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .fold(EncodingFlags::empty(), |flags, name| {
                flags | EncodingFlags::from_option(name)
            })
    }
}
