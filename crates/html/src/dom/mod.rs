//! Structured view of a parsed markup fragment.

mod printing;

use smallvec::SmallVec;

pub use printing::{ALLOWED_ATTRS, MAX_ATTR_LENGTH, simplified_nodes};

/// One top-level (or nested) node of a parsed fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentNode {
    Element(ElementNode),
    Text(String),
}

/// An element with its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementNode {
    pub tag: String,
    pub attrs: SmallVec<(String, String), 4>,
    pub children: Vec<FragmentNode>,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Value of the first attribute called `name`, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text of every descendant text node, each trimmed, concatenated without a separator.
    ///
    /// Whitespace-only pieces are dropped, so `<p> a <b> b </b></p>` yields `"ab"`.
    pub fn stripped_text(&self) -> String {
        let mut out = String::new();
        collect_stripped_text(&self.children, &mut out);
        out
    }
}

impl FragmentNode {
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }
}

fn collect_stripped_text(nodes: &[FragmentNode], out: &mut String) {
    for node in nodes {
        match node {
            FragmentNode::Text(text) => out.push_str(text.trim()),
            FragmentNode::Element(element) => collect_stripped_text(&element.children, out),
        }
    }
}

/// First element among the top-level nodes of a fragment.
pub fn first_element(nodes: &[FragmentNode]) -> Option<&ElementNode> {
    nodes.iter().find_map(FragmentNode::as_element)
}

/// True when no element appears anywhere in the fragment.
pub fn is_text_only(nodes: &[FragmentNode]) -> bool {
    nodes.iter().all(|node| matches!(node, FragmentNode::Text(_)))
}
