//! Owned term values.

use super::tags::NIL_ATOM;

/// A decoded term.
///
/// The "absent" sentinel is the atom `nil`; see [`WireValue::nil`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    Integer(i32),
    Atom(String),
    Binary(Vec<u8>),
    Tuple(Vec<WireValue>),
    List(Vec<WireValue>),
}

impl WireValue {
    /// Build an atom value.
    pub fn atom(name: &str) -> Self {
        WireValue::Atom(name.to_string())
    }

    /// Build a binary value.
    pub fn binary(bytes: impl AsRef<[u8]>) -> Self {
        WireValue::Binary(bytes.as_ref().to_vec())
    }

    /// The "absent" sentinel.
    pub fn nil() -> Self {
        WireValue::atom(NIL_ATOM)
    }

    /// The empty list.
    pub fn empty_list() -> Self {
        WireValue::List(Vec::new())
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            WireValue::Atom(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            WireValue::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[WireValue]> {
        match self {
            WireValue::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[WireValue]> {
        match self {
            WireValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if this is the `nil` sentinel.
    pub fn is_nil(&self) -> bool {
        self.as_atom() == Some(NIL_ATOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let value = WireValue::Tuple(vec![
            WireValue::atom("ok"),
            WireValue::List(vec![WireValue::binary("hi")]),
        ]);

        let items = value.as_tuple().unwrap();
        assert_eq!(items[0].as_atom(), Some("ok"));
        assert_eq!(items[1].as_list().unwrap()[0].as_binary(), Some(&b"hi"[..]));
        assert!(value.as_list().is_none());
    }

    #[test]
    fn test_nil_is_an_atom_not_a_list() {
        assert!(WireValue::nil().is_nil());
        assert!(!WireValue::empty_list().is_nil());
        assert!(WireValue::nil().as_list().is_none());
    }
}
