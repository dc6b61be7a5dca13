use super::{ElementNode, FragmentNode};

/// Attributes kept by the simplified printer regardless of their name prefix.
pub const ALLOWED_ATTRS: [&str; 7] = ["id", "class", "name", "type", "href", "placeholder", "role"];

/// Attribute values longer than this many characters are dropped.
pub const MAX_ATTR_LENGTH: usize = 40;

fn keeps_attr(name: &str, value: &str) -> bool {
    let allowed = ALLOWED_ATTRS.contains(&name) || name.starts_with("data") || name.starts_with("test");
    allowed && value.chars().count() <= MAX_ATTR_LENGTH
}

impl ElementNode {
    /// Canonical one-line form: `<tag attr="v">text</tag>` with only the allow-listed attributes.
    pub fn to_simplified(&self) -> String {
        let mut out = String::with_capacity(self.tag.len() * 2 + 8);
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            if !keeps_attr(name, value) {
                continue;
            }
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out.push('>');
        out.push_str(&self.stripped_text());
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
        out
    }
}

/// Simplify a sequence of top-level nodes, joining non-empty results with a single space.
pub fn simplified_nodes(nodes: &[FragmentNode]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            FragmentNode::Element(element) => parts.push(element.to_simplified()),
            FragmentNode::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_owned());
                }
            }
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_attributes_are_case_sensitive() {
        assert!(keeps_attr("data-qa", "x"));
        assert!(keeps_attr("testid", "x"));
        assert!(!keeps_attr("Data-qa", "x"));
        assert!(!keeps_attr("style", "x"));
    }

    #[test]
    fn value_length_limit_is_inclusive() {
        let forty = "a".repeat(MAX_ATTR_LENGTH);
        let forty_one = "a".repeat(MAX_ATTR_LENGTH + 1);
        assert!(keeps_attr("class", &forty));
        assert!(!keeps_attr("class", &forty_one));
    }

    #[test]
    fn element_without_kept_attrs_prints_bare_tag() {
        let mut node = ElementNode::new("span");
        node.attrs.push(("style".into(), "color: red".into()));
        node.children.push(FragmentNode::Text(" hi ".into()));
        assert_eq!(node.to_simplified(), "<span>hi</span>");
    }
}
