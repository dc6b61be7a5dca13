use crate::dom::{FragmentNode, is_text_only, simplified_nodes};
use crate::parser::parse_fragment;
use log::debug;

/// Reduce a captured markup fragment to its canonical, attribute-filtered form.
///
/// - Text-only input is returned trimmed.
/// - Each element keeps its tag, the allow-listed attributes (see [`crate::dom::ALLOWED_ATTRS`],
///   plus any name starting with `data` or `test`) whose values are at most
///   [`crate::dom::MAX_ATTR_LENGTH`] characters, and its stripped inner text.
/// - Several top-level nodes are simplified one by one and joined with a single space.
///
/// Never fails: markup the parser cannot read degrades to the trimmed input.
pub fn simplify(markup: &str) -> String {
    match parse_fragment(markup) {
        Ok(nodes) => simplify_nodes(&nodes),
        Err(err) => {
            debug!("Falling back to raw text for unparsable markup: {err}");
            markup.trim().to_owned()
        }
    }
}

pub(crate) fn simplify_nodes(nodes: &[FragmentNode]) -> String {
    if is_text_only(nodes) {
        let mut text = String::new();
        for node in nodes {
            if let FragmentNode::Text(piece) = node {
                text.push_str(piece.trim());
            }
        }
        return text;
    }
    simplified_nodes(nodes)
}
