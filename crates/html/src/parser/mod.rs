//! Fragment parsing.
//!
//! Captured markup is an element's `outerHTML`, so it is parsed the way `innerHTML` would be:
//! as a fragment rather than as a full document. The fragment context is `<template>`, which
//! accepts table parts as well as flow content; markup led by `<html>`, `<head>` or `<body>`
//! goes through the document parser instead so that element keeps its own tag.

mod html5ever_engine;

use crate::dom::FragmentNode;
use anyhow::Error;

/// Parse `markup` into its top-level nodes.
///
/// Comments, doctypes and processing instructions are dropped. A document-level tag that is not
/// the first thing in `markup` is still dropped by the tree builder, leaving its children.
///
/// # Errors
/// Returns an error if the parser fails to read the input.
pub fn parse_fragment(markup: &str) -> Result<Vec<FragmentNode>, Error> {
    html5ever_engine::parse(markup)
}
