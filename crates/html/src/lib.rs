//! Markup handling for captured interaction events.
//!
//! Captured elements arrive as serialized `outerHTML` fragments. This crate parses them into a
//! small structured tree, rewrites them into a short canonical form for reports, and derives
//! the key used to treat repeated interactions on one element as a single entry.
#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod dom;
pub mod parser;
mod identity;
mod simplify;

pub use dom::{ElementNode, FragmentNode};
pub use identity::identify;
pub use parser::parse_fragment;
pub use simplify::simplify;
