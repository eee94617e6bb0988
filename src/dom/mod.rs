//! Arena-backed document tree.
//!
//! A [`Document`] stores every node in one `Vec` and links them by index, so
//! building and walking a tree never recurses and never touches reference
//! counts. The document root is structural: it has no data of its own and is
//! addressed as `None` wherever a parent is expected.
//!
//! ```text
//! nodes: [Node0][Node1][Node2]...
//!          |  first_child / last_child / next_sibling are indices
//! ```
//!
//! Trees are append-only. They are built once per request by a parser and
//! read once by the tree encoder.

pub mod tags;

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Element namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
    MathMl,
    /// Any other namespace. Names in it are rendered without a prefix.
    Other,
}

impl Namespace {
    /// Prefix used when rendering a qualified name.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Namespace::Svg => Some("svg"),
            Namespace::MathMl => Some("math"),
            Namespace::Html | Namespace::Other => None,
        }
    }
}

/// Namespace plus local name of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementName {
    pub ns: Namespace,
    pub local: String,
}

impl ElementName {
    pub fn new(ns: Namespace, local: impl Into<String>) -> Self {
        Self {
            ns,
            local: local.into(),
        }
    }

    pub fn html(local: impl Into<String>) -> Self {
        Self::new(Namespace::Html, local)
    }

    /// Qualified name as sent on the wire: `div`, `svg:circle`, `math:mi`.
    pub fn qualified_name(&self) -> String {
        match self.ns.prefix() {
            Some(prefix) => format!("{}:{}", prefix, self.local),
            None => self.local.clone(),
        }
    }

    /// The `'static` tag name, when this is an HTML element with a known tag.
    pub fn known_html_tag(&self) -> Option<&'static str> {
        match self.ns {
            Namespace::Html => tags::known_tag(&self.local),
            _ => None,
        }
    }
}

/// One attribute, kept in source order. Duplicates are not merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl Attribute {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: ElementName,
    pub attrs: Vec<Attribute>,
    /// HTML void element (`br`, `img`, ...).
    pub void: bool,
}

impl Element {
    /// Build an element, deriving the void flag from its name.
    pub fn new(name: ElementName, attrs: Vec<Attribute>) -> Self {
        let void = name.ns == Namespace::Html && tags::is_void_tag(&name.local);
        Self { name, attrs, void }
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(Element),
    Text(Vec<u8>),
    /// Comment text; `None` when the parser reported no text at all.
    Comment(Option<Vec<u8>>),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Node {
    #[inline]
    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    #[inline]
    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }
}

/// Append-only document tree.
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Node>,
    root_first: Option<NodeId>,
    root_last: Option<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_first: None,
            root_last: None,
        }
    }

    /// Append `data` as the last child of `parent` (`None` is the root).
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this document.
    pub fn append(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            first_child: None,
            last_child: None,
            next_sibling: None,
        });

        let previous = match parent {
            None => self.root_last.replace(id),
            Some(parent) => self.nodes[parent.0].last_child.replace(id),
        };
        match previous {
            Some(previous) => self.nodes[previous.0].next_sibling = Some(id),
            None => match parent {
                None => self.root_first = Some(id),
                Some(parent) => self.nodes[parent.0].first_child = Some(id),
            },
        }
        id
    }

    /// First child of `parent` (`None` is the root).
    #[inline]
    pub fn first_child(&self, parent: Option<NodeId>) -> Option<NodeId> {
        match parent {
            None => self.root_first,
            Some(id) => self.nodes[id.0].first_child,
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Iterate over the direct children of `parent`.
    pub fn children(&self, parent: Option<NodeId>) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(parent),
        }
    }

    /// Number of nodes, not counting the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator over sibling nodes.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.doc.node(id);
        self.next = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str) -> NodeData {
        NodeData::Element(Element::new(ElementName::html(name), Vec::new()))
    }

    #[test]
    fn test_append_keeps_sibling_order() {
        let mut doc = Document::new();
        let ul = doc.append(None, element("ul"));
        let a = doc.append(Some(ul), element("li"));
        let b = doc.append(Some(ul), element("li"));
        let c = doc.append(Some(ul), NodeData::Text(b"x".to_vec()));

        let ids: Vec<NodeId> = doc.children(Some(ul)).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(doc.first_child(None), Some(ul));
        assert!(doc.node(ul).next_sibling().is_none());
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_root_children() {
        let mut doc = Document::new();
        assert!(doc.is_empty());
        assert!(doc.first_child(None).is_none());

        let first = doc.append(None, NodeData::Comment(None));
        let second = doc.append(None, element("p"));
        assert_eq!(doc.children(None).count(), 2);
        assert_eq!(doc.node(first).next_sibling(), Some(second));
    }

    #[test]
    fn test_qualified_names() {
        assert_eq!(ElementName::html("div").qualified_name(), "div");
        assert_eq!(
            ElementName::new(Namespace::Svg, "circle").qualified_name(),
            "svg:circle"
        );
        assert_eq!(
            ElementName::new(Namespace::MathMl, "mi").qualified_name(),
            "math:mi"
        );
        assert_eq!(ElementName::new(Namespace::Other, "x").qualified_name(), "x");
    }

    #[test]
    fn test_known_tag_only_in_html_namespace() {
        assert_eq!(ElementName::html("div").known_html_tag(), Some("div"));
        assert_eq!(ElementName::html("my-widget").known_html_tag(), None);
        assert_eq!(ElementName::new(Namespace::Svg, "svg").known_html_tag(), None);
    }

    #[test]
    fn test_void_flag() {
        assert!(Element::new(ElementName::html("br"), Vec::new()).void);
        assert!(!Element::new(ElementName::html("p"), Vec::new()).void);
        assert!(!Element::new(ElementName::new(Namespace::Svg, "image"), Vec::new()).void);
    }
}
