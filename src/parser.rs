//! Parse adapter.
//!
//! The worker only needs a read-only tree of elements, text and comments.
//! [`ParseAdapter`] is the seam between the worker and whatever HTML engine
//! produces that tree; [`Html5everParser`] is the engine used in production.

use html5ever::tendril::{ByteTendril, TendrilSink};
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{namespace_url, ns, parse_document, parse_fragment};
use html5ever::{LocalName, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use thiserror::Error;

use crate::dom::{Attribute, Document, Element, ElementName, Namespace, NodeData, NodeId};
use crate::request::Mode;

/// Parser failure. Reported to the caller as `parse_failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Fragment parsing did not produce the synthetic root element.
    #[error("fragment parse produced no root element")]
    MissingFragmentRoot,

    /// Engine specific failure.
    #[error("parser failed: {0}")]
    Engine(String),
}

/// Turns HTML bytes into a [`Document`].
pub trait ParseAdapter {
    fn parse(&mut self, html: &[u8], mode: &Mode) -> Result<Document, ParseError>;
}

/// html5ever-backed parser.
///
/// Input is decoded as UTF-8 with invalid sequences replaced. Doctypes and
/// processing instructions are dropped; template contents appear as the
/// template element's children.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html5everParser;

impl Html5everParser {
    pub fn new() -> Self {
        Html5everParser
    }

    fn opts() -> ParseOpts {
        ParseOpts {
            tree_builder: TreeBuilderOpts {
                drop_doctype: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

impl ParseAdapter for Html5everParser {
    fn parse(&mut self, html: &[u8], mode: &Mode) -> Result<Document, ParseError> {
        let input = ByteTendril::from_slice(html);
        match mode {
            Mode::Document => {
                let dom = parse_document(RcDom::default(), Self::opts())
                    .from_utf8()
                    .one(input);
                Ok(import(&dom.document))
            }
            Mode::Fragment { context } => {
                let context = QualName::new(None, ns!(html), LocalName::from(*context));
                let dom = parse_fragment(RcDom::default(), Self::opts(), context, Vec::new())
                    .from_utf8()
                    .one(input);

                // fragment nodes hang off a synthetic <html> element
                let wrapper = dom
                    .document
                    .children
                    .borrow()
                    .iter()
                    .find(|child| matches!(child.data, RcNodeData::Element { .. }))
                    .cloned()
                    .ok_or(ParseError::MissingFragmentRoot)?;
                Ok(import(&wrapper))
            }
        }
    }
}

/// Copy the children of `root` into a new arena document without recursion.
fn import(root: &Handle) -> Document {
    let mut doc = Document::new();
    let mut stack: Vec<(Handle, Option<NodeId>)> = Vec::new();
    push_children(&mut stack, root, None);

    while let Some((handle, parent)) = stack.pop() {
        let data = match &handle.data {
            RcNodeData::Text { contents } => NodeData::Text(contents.borrow().as_bytes().to_vec()),
            RcNodeData::Comment { contents } => NodeData::Comment(Some(contents.as_bytes().to_vec())),
            RcNodeData::Element { name, attrs, .. } => {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| {
                        Attribute::new(
                            attribute_name(&attr.name).into_bytes(),
                            attr.value.as_bytes().to_vec(),
                        )
                    })
                    .collect();
                NodeData::Element(Element::new(element_name(name), attrs))
            }
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => continue,
        };

        let id = doc.append(parent, data);
        push_children(&mut stack, &handle, Some(id));
    }
    doc
}

/// Queue the children of `handle` so they pop in document order.
fn push_children(
    stack: &mut Vec<(Handle, Option<NodeId>)>,
    handle: &Handle,
    parent: Option<NodeId>,
) {
    let start = stack.len();
    stack.extend(
        handle
            .children
            .borrow()
            .iter()
            .map(|child| (child.clone(), parent)),
    );
    if let RcNodeData::Element {
        template_contents, ..
    } = &handle.data
    {
        if let Some(contents) = template_contents.borrow().as_ref() {
            stack.extend(
                contents
                    .children
                    .borrow()
                    .iter()
                    .map(|child| (child.clone(), parent)),
            );
        }
    }
    stack[start..].reverse();
}

fn element_name(name: &QualName) -> ElementName {
    let ns = if name.ns == ns!(html) {
        Namespace::Html
    } else if name.ns == ns!(svg) {
        Namespace::Svg
    } else if name.ns == ns!(mathml) {
        Namespace::MathMl
    } else {
        Namespace::Other
    };
    ElementName::new(ns, &*name.local)
}

fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str, mode: Mode) -> Document {
        Html5everParser::new().parse(html.as_bytes(), &mode).unwrap()
    }

    fn element(doc: &Document, id: NodeId) -> &Element {
        match &doc.node(id).data {
            NodeData::Element(element) => element,
            other => panic!("expected element, got {:?}", other),
        }
    }

    fn child_names(doc: &Document, parent: Option<NodeId>) -> Vec<String> {
        doc.children(parent)
            .map(|(id, node)| match &node.data {
                NodeData::Element(_) => element(doc, id).name.qualified_name(),
                NodeData::Text(_) => "#text".to_string(),
                NodeData::Comment(_) => "#comment".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_document_is_completed() {
        let doc = parse("<p>hi</p>", Mode::Document);
        assert_eq!(child_names(&doc, None), vec!["html"]);

        let html = doc.first_child(None).unwrap();
        assert_eq!(child_names(&doc, Some(html)), vec!["head", "body"]);
    }

    #[test]
    fn test_doctype_is_dropped() {
        let doc = parse("<!DOCTYPE html><!-- c --><p>x</p>", Mode::Document);
        assert_eq!(child_names(&doc, None), vec!["#comment", "html"]);
    }

    #[test]
    fn test_fragment_unwraps_root() {
        let doc = parse("<li>a</li><li>b</li>", Mode::Fragment { context: "ul" });
        assert_eq!(child_names(&doc, None), vec!["li", "li"]);
    }

    #[test]
    fn test_fragment_context_changes_parsing() {
        let doc = parse("<td>x</td>", Mode::Fragment { context: "tr" });
        assert_eq!(child_names(&doc, None), vec!["td"]);

        let doc = parse("<td>x</td>", Mode::Fragment { context: "div" });
        assert_eq!(child_names(&doc, None), vec!["#text"]);
    }

    #[test]
    fn test_attributes_in_source_order() {
        let doc = parse(r#"<a href="/x" class="" id=y>t</a>"#, Mode::Fragment { context: "div" });
        let a = doc.first_child(None).unwrap();
        let attrs: Vec<(&[u8], &[u8])> = element(&doc, a)
            .attrs
            .iter()
            .map(|attr| (&attr.name[..], &attr.value[..]))
            .collect();
        assert_eq!(
            attrs,
            vec![
                (&b"href"[..], &b"/x"[..]),
                (&b"class"[..], &b""[..]),
                (&b"id"[..], &b"y"[..]),
            ]
        );
    }

    #[test]
    fn test_foreign_namespaces() {
        let doc = parse(
            "<svg><circle r=1></circle></svg><math><mi>x</mi></math>",
            Mode::Fragment { context: "div" },
        );
        assert_eq!(child_names(&doc, None), vec!["svg:svg", "math:math"]);

        let svg = doc.first_child(None).unwrap();
        assert_eq!(child_names(&doc, Some(svg)), vec!["svg:circle"]);
    }

    #[test]
    fn test_void_elements_flagged() {
        let doc = parse("<br><img src=a.png>", Mode::Fragment { context: "div" });
        let ids: Vec<NodeId> = doc.children(None).map(|(id, _)| id).collect();
        assert!(ids.iter().all(|&id| element(&doc, id).void));
    }

    #[test]
    fn test_template_contents_become_children() {
        let doc = parse(
            "<template><b>x</b></template>",
            Mode::Fragment { context: "div" },
        );
        let template = doc.first_child(None).unwrap();
        assert_eq!(child_names(&doc, Some(template)), vec!["b"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let doc = Html5everParser::new()
            .parse(b"<p>a\xffb</p>", &Mode::Fragment { context: "div" })
            .unwrap();
        let p = doc.first_child(None).unwrap();
        let text = doc.first_child(Some(p)).unwrap();
        assert_eq!(
            doc.node(text).data,
            NodeData::Text("a\u{fffd}b".as_bytes().to_vec())
        );
    }

    #[test]
    fn test_deep_nesting_imports() {
        let depth = 2_000;
        let html = "<div>".repeat(depth);
        let doc = parse(&html, Mode::Fragment { context: "body" });
        assert_eq!(doc.len(), depth);
    }

    #[test]
    fn test_empty_input() {
        let doc = parse("", Mode::Fragment { context: "div" });
        assert!(doc.is_empty());
    }
}
