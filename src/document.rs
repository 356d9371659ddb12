// src/document.rs
//! A `roxmltree` document exposed as a navigable XPath tree.

use roxmltree::Node;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use xmlbind_xpath::{NodeKind, TreeNode};

/// An immutable, parsed XML document.
pub struct XmlDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> XmlDocument<'input> {
    /// Parses `text`. DTDs are accepted; namespaces are kept by the parser but
    /// name tests only ever look at local names.
    pub fn parse(text: &'input str) -> Result<Self, roxmltree::Error> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;
        Ok(Self { doc })
    }

    pub fn root_node(&self) -> XmlNode<'_> {
        XmlNode::Node(self.doc.root())
    }
}

/// A node of an [`XmlDocument`].
///
/// roxmltree keeps attributes as data on their element, so attribute nodes are
/// synthesized from the owning element and the attribute's index.
#[derive(Debug, Clone, Copy)]
pub enum XmlNode<'a> {
    Node(Node<'a, 'a>),
    Attribute { parent: Node<'a, 'a>, index: usize },
}

impl<'a> XmlNode<'a> {
    /// The XPath string value of the node.
    pub fn text(&self) -> String {
        self.string_value()
    }

    /// The node as it appears in the source document.
    pub fn markup(&self) -> String {
        match self {
            XmlNode::Node(node) => node.document().input_text()[node.range()].to_string(),
            XmlNode::Attribute { parent, index } => parent
                .attributes()
                .nth(*index)
                .map(|attr| format!("{}=\"{}\"", attr.name(), attr.value()))
                .unwrap_or_default(),
        }
    }

    fn sort_key(&self) -> (usize, usize) {
        match self {
            XmlNode::Node(node) => (node.id().get_usize(), 0),
            // Attributes follow their element and precede its children.
            XmlNode::Attribute { parent, index } => (parent.id().get_usize(), index + 1),
        }
    }
}

impl PartialEq for XmlNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for XmlNode<'_> {}

impl PartialOrd for XmlNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for XmlNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Hash for XmlNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl<'a> TreeNode<'a> for XmlNode<'a> {
    fn kind(&self) -> NodeKind {
        match self {
            XmlNode::Node(node) => {
                if node.is_root() {
                    NodeKind::Root
                } else if node.is_text() {
                    NodeKind::Text
                } else if node.is_comment() {
                    NodeKind::Comment
                } else if node.is_pi() {
                    NodeKind::ProcessingInstruction
                } else {
                    NodeKind::Element
                }
            }
            XmlNode::Attribute { .. } => NodeKind::Attribute,
        }
    }

    fn local_name(&self) -> Option<&'a str> {
        match self {
            XmlNode::Node(node) if node.is_element() => Some(node.tag_name().name()),
            XmlNode::Node(node) => node.pi().map(|pi| pi.target),
            XmlNode::Attribute { parent, index } => {
                parent.attributes().nth(*index).map(|attr| attr.name())
            }
        }
    }

    fn string_value(&self) -> String {
        match self {
            XmlNode::Node(node) if node.is_element() || node.is_root() => node
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect(),
            XmlNode::Node(node) if node.is_pi() => node
                .pi()
                .and_then(|pi| pi.value)
                .unwrap_or_default()
                .to_string(),
            XmlNode::Node(node) => node.text().unwrap_or_default().to_string(),
            XmlNode::Attribute { parent, index } => parent
                .attributes()
                .nth(*index)
                .map(|attr| attr.value().to_string())
                .unwrap_or_default(),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match self {
            XmlNode::Node(node) if node.is_element() => {
                let parent = *node;
                let count = node.attributes().len();
                Box::new((0..count).map(move |index| XmlNode::Attribute { parent, index }))
            }
            _ => Box::new(std::iter::empty()),
        }
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match self {
            XmlNode::Node(node) => Box::new(node.children().map(XmlNode::Node)),
            XmlNode::Attribute { .. } => Box::new(std::iter::empty()),
        }
    }

    fn parent(&self) -> Option<Self> {
        match self {
            XmlNode::Node(node) => node.parent().map(XmlNode::Node),
            XmlNode::Attribute { parent, .. } => Some(XmlNode::Node(*parent)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlbind_xpath::CompiledXPath;

    fn select<'a>(xpath: &str, node: XmlNode<'a>) -> Vec<XmlNode<'a>> {
        CompiledXPath::compile(xpath).unwrap().select(node).unwrap()
    }

    #[test]
    fn test_attributes_are_navigable_nodes() {
        let doc = XmlDocument::parse(r#"<root><item id="123" status="active">Text</item></root>"#)
            .unwrap();
        let item = select("/root/item", doc.root_node())[0];

        let attrs: Vec<_> = item.attributes().collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].kind(), NodeKind::Attribute);
        assert_eq!(attrs[0].local_name(), Some("id"));
        assert_eq!(attrs[1].text(), "active");
        assert_eq!(attrs[0].parent(), Some(item));
        assert!(item < attrs[0] && attrs[0] < attrs[1]);
    }

    #[test]
    fn test_string_value_concatenates_descendant_text() {
        let doc = XmlDocument::parse("<a>one<b>two</b><!-- no -->three</a>").unwrap();
        let a = select("/a", doc.root_node())[0];
        assert_eq!(a.text(), "onetwothree");
        assert_eq!(doc.root_node().text(), "onetwothree");
    }

    #[test]
    fn test_markup_is_source_text() {
        let xml = r#"<doc><item ref="1"><name>A</name></item></doc>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let item = select("//item", doc.root_node())[0];
        assert_eq!(item.markup(), r#"<item ref="1"><name>A</name></item>"#);
        assert_eq!(select("//item/@ref", doc.root_node())[0].markup(), r#"ref="1""#);
    }

    #[test]
    fn test_namespaced_names_match_by_local_name() {
        let xml = r#"<x:doc xmlns:x="urn:x"><x:title lang="en">T</x:title></x:doc>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let titles = select("/doc/title", doc.root_node());
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].text(), "T");
        assert_eq!(select("/x:doc/x:title/@lang", doc.root_node())[0].text(), "en");
    }

    #[test]
    fn test_dtd_is_accepted() {
        let xml = "<!DOCTYPE note [<!ELEMENT note (#PCDATA)>]><note>hi</note>";
        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(select("/note", doc.root_node())[0].text(), "hi");
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(XmlDocument::parse("<a><b></a>").is_err());
    }
}
