use crate::dom::first_element;
use crate::parser::parse_fragment;
use crate::simplify::{simplify, simplify_nodes};

/// Derive the logical identity of the element captured in `markup`.
///
/// The first top-level element decides, in priority order:
/// 1. `id` → `"id:<id>"`
/// 2. `name` → `"name:<name>"`
/// 3. `type` and `placeholder` together → `"type-placeholder:<type>-<placeholder>"`
///
/// Anything else (including markup with no element at all) is identified by its simplified
/// markup, so two anonymous elements only match when they simplify to the same text.
pub fn identify(markup: &str) -> String {
    let Ok(nodes) = parse_fragment(markup) else {
        return simplify(markup);
    };
    if let Some(element) = first_element(&nodes) {
        if let Some(id) = element.attr("id") {
            return format!("id:{id}");
        }
        if let Some(name) = element.attr("name") {
            return format!("name:{name}");
        }
        if let (Some(kind), Some(placeholder)) = (element.attr("type"), element.attr("placeholder")) {
            return format!("type-placeholder:{kind}-{placeholder}");
        }
    }
    simplify_nodes(&nodes)
}
