//! Tree encoder.
//!
//! Writes the children of a [`Document`] root as a term list:
//!
//! ```text
//! Text     -> <<"text">>
//! Comment  -> {comment, Text} | {comment, [], Text}
//! Element  -> {Name, [{AttrName, AttrValue}], Children}
//! ```
//!
//! The walk is pre-order over forward sibling links with an explicit stack
//! of open parents. Every list is written as a chain of cons cells, so the
//! encoder never has to count children up front. Each descent pushes one
//! parent and opens one list; each unwind pops one parent and writes one
//! list terminator.

use crate::codec::{EncodeError, StaticAtom, TermEncoder};
use crate::dom::{Attribute, Document, ElementName, NodeData, NodeId};
use crate::request::EncodingFlags;

/// Atom tagging a comment tuple.
pub const COMMENT_ATOM: StaticAtom = StaticAtom::new("comment");

/// Default traversal stack reservation.
pub const DEFAULT_STACK_CAPACITY: usize = 64;

/// Counters collected while encoding one tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// Nodes written.
    pub nodes: usize,
    /// Non-empty child lists opened, including the root list.
    pub lists_opened: usize,
    /// Largest number of open parents held at once.
    pub max_depth: usize,
}

/// Reusable tree encoder.
#[derive(Debug)]
pub struct TreeEncoder {
    stack: Vec<NodeId>,
}

impl TreeEncoder {
    pub fn new() -> Self {
        Self::with_stack_capacity(DEFAULT_STACK_CAPACITY)
    }

    /// Reserve room for `capacity` open parents before the first descent.
    pub fn with_stack_capacity(capacity: usize) -> Self {
        Self {
            stack: Vec::with_capacity(capacity),
        }
    }

    /// Write the root's children of `doc` as one list.
    ///
    /// On error the output holds a partial term and must be discarded.
    pub fn encode(
        &mut self,
        doc: &Document,
        flags: EncodingFlags,
        out: &mut TermEncoder,
    ) -> Result<EncodeStats, EncodeError> {
        self.stack.clear();
        let mut stats = EncodeStats::default();

        let Some(mut current) = doc.first_child(None) else {
            out.empty_list();
            return Ok(stats);
        };
        stats.lists_opened = 1;

        loop {
            let node = doc.node(current);
            stats.nodes += 1;
            out.list_cons();

            let descend = match &node.data {
                NodeData::Text(text) => {
                    out.binary(text)?;
                    None
                }
                NodeData::Comment(text) => {
                    encode_comment(text.as_deref(), flags, out)?;
                    None
                }
                NodeData::Element(element) => {
                    out.tuple_header(3)?;
                    encode_name(&element.name, flags, out)?;
                    encode_attrs(&element.attrs, out)?;
                    match node.first_child() {
                        Some(child) => Some(child),
                        None => {
                            if element.void && flags.contains(EncodingFlags::VOID_AS_NIL) {
                                out.nil();
                            } else {
                                out.empty_list();
                            }
                            None
                        }
                    }
                }
            };

            if let Some(child) = descend {
                self.stack.push(current);
                stats.max_depth = stats.max_depth.max(self.stack.len());
                stats.lists_opened += 1;
                current = child;
                continue;
            }

            // close finished lists until a node with a next sibling turns up
            let mut cursor = current;
            loop {
                if let Some(next) = doc.node(cursor).next_sibling() {
                    current = next;
                    break;
                }
                out.empty_list();
                match self.stack.pop() {
                    Some(parent) => cursor = parent,
                    None => return Ok(stats),
                }
            }
        }
    }
}

impl Default for TreeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the root's children of `doc` as one list.
pub fn encode_children(
    doc: &Document,
    flags: EncodingFlags,
    out: &mut TermEncoder,
) -> Result<(), EncodeError> {
    TreeEncoder::new().encode(doc, flags, out).map(|_| ())
}

/// Same as [`encode_children`], returning traversal counters.
pub fn encode_children_with_stats(
    doc: &Document,
    flags: EncodingFlags,
    out: &mut TermEncoder,
) -> Result<EncodeStats, EncodeError> {
    TreeEncoder::new().encode(doc, flags, out)
}

fn encode_name(
    name: &ElementName,
    flags: EncodingFlags,
    out: &mut TermEncoder,
) -> Result<(), EncodeError> {
    if flags.contains(EncodingFlags::SHORT_TAG_ATOMS) {
        if let Some(tag) = name.known_html_tag() {
            return out.atom(tag);
        }
    }
    out.binary(name.qualified_name().as_bytes())
}

fn encode_attrs(attrs: &[Attribute], out: &mut TermEncoder) -> Result<(), EncodeError> {
    for attr in attrs.iter().filter(|attr| !attr.name.is_empty()) {
        // an empty value is sent as the attribute name
        let value = if attr.value.is_empty() {
            &attr.name
        } else {
            &attr.value
        };
        out.list_cons();
        out.tuple_header(2)?;
        out.binary(&attr.name)?;
        out.binary(value)?;
    }
    out.empty_list();
    Ok(())
}

fn encode_comment(
    text: Option<&[u8]>,
    flags: EncodingFlags,
    out: &mut TermEncoder,
) -> Result<(), EncodeError> {
    if flags.contains(EncodingFlags::COMMENT_ATTR_SLOT) {
        out.small_tuple_header(3);
        out.static_atom(COMMENT_ATOM);
        out.empty_list();
    } else {
        out.small_tuple_header(2);
        out.static_atom(COMMENT_ATOM);
    }
    out.binary(text.unwrap_or_default())
}
