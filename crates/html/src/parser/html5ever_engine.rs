use crate::dom::{ElementNode, FragmentNode};
use anyhow::Error;
use html5ever::tendril::TendrilSink as _;
use html5ever::{LocalName, Namespace, ParseOpts, QualName, parse_document, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::rc::Rc;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Tags the fragment algorithm never inserts, whatever the context element.
const DOCUMENT_LEVEL_TAGS: [&str; 3] = ["html", "head", "body"];

/// Parse `markup` and convert the resulting tree.
pub fn parse(markup: &str) -> Result<Vec<FragmentNode>, Error> {
    match document_level_tag(markup) {
        Some(tag) => parse_document_level(markup, tag),
        None => parse_in_template(markup),
    }
}

/// Run html5ever's fragment algorithm in a `<template>` context, where table parts
/// (`<td>`, `<tr>`, `<tbody>`, `<caption>`, `<col>`) are inserted as themselves.
fn parse_in_template(markup: &str) -> Result<Vec<FragmentNode>, Error> {
    let context = QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from("template"),
    );
    let dom: RcDom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new())
        .from_utf8()
        .read_from(&mut markup.as_bytes())?;

    // The fragment algorithm places every parsed node under a synthetic <html> root.
    let mut nodes = Vec::new();
    for root in dom.document.children.borrow().iter() {
        match &root.data {
            NodeData::Element { .. } => {
                for child in root.children.borrow().iter() {
                    push_converted(child, &mut nodes);
                }
            }
            _ => push_converted(root, &mut nodes),
        }
    }
    Ok(nodes)
}

/// Parse markup that starts with `<html>`, `<head>` or `<body>` as a document and keep the
/// element named by that leading tag, attributes included.
fn parse_document_level(markup: &str, tag: &str) -> Result<Vec<FragmentNode>, Error> {
    let dom: RcDom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut markup.as_bytes())?;

    let html = dom
        .document
        .children
        .borrow()
        .iter()
        .find(|child| is_element_named(child, "html"))
        .map(Rc::clone);
    let target = match html {
        Some(root) if tag == "html" => Some(root),
        Some(root) => root
            .children
            .borrow()
            .iter()
            .find(|child| is_element_named(child, tag))
            .map(Rc::clone),
        None => None,
    };

    let mut nodes = Vec::new();
    if let Some(handle) = target {
        push_converted(&handle, &mut nodes);
    }
    Ok(nodes)
}

fn document_level_tag(markup: &str) -> Option<&'static str> {
    let rest = markup.trim_start().strip_prefix('<')?;
    DOCUMENT_LEVEL_TAGS.into_iter().find(|tag| {
        let named = rest
            .get(..tag.len())
            .is_some_and(|name| name.eq_ignore_ascii_case(tag));
        named
            && rest
                .get(tag.len()..)
                .and_then(|after| after.chars().next())
                .is_none_or(|next| next.is_ascii_whitespace() || next == '>' || next == '/')
    })
}

fn is_element_named(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, NodeData::Element { name, .. } if &*name.local == tag)
}

fn push_converted(handle: &Handle, out: &mut Vec<FragmentNode>) {
    match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow();
            // html5ever may split one run of text across sibling nodes; rejoin them.
            if let Some(FragmentNode::Text(previous)) = out.last_mut() {
                previous.push_str(&text);
            } else {
                out.push(FragmentNode::Text(text.to_string()));
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let mut element = ElementNode::new(name.local.to_string());
            for attr in attrs.borrow().iter() {
                element
                    .attrs
                    .push((attr.name.local.to_string(), attr.value.to_string()));
            }
            for child in handle.children.borrow().iter() {
                push_converted(child, &mut element.children);
            }
            out.push(FragmentNode::Element(element));
        }
        NodeData::Document
        | NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => {}
    }
}
