//! HTML parsing - html5ever text into the mutable document arena.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::dom::{Document, NodeData, NodeId};

/// Parse an HTML string into an RcDom.
fn parse_rcdom(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .unwrap_or_else(|_| RcDom::default())
}

/// Parse a full HTML page into a Document.
pub fn parse_page(html: &str, base_uri: &str) -> Document {
    let rcdom = parse_rcdom(html);
    let mut doc = Document::new(base_uri);
    let root = doc.root;
    convert_children(&rcdom.document, &mut doc, root);
    doc.title = extract_title(&rcdom.document);
    doc
}

/// Parse an HTML fragment into `doc`'s arena without attaching it.
///
/// html5ever's document parser wraps loose markup in html/head/body, so the
/// fragment's real content is grafted from the synthesized body element.
/// Returns the top-level node ids in source order.
pub fn parse_fragment(doc: &mut Document, html: &str) -> Vec<NodeId> {
    let rcdom = parse_rcdom(html);
    let Some(body) = find_element(&rcdom.document, "body") else {
        return Vec::new();
    };
    let mut ids = Vec::new();
    for child in body.children.borrow().iter() {
        if let Some(id) = convert_node(child, doc) {
            ids.push(id);
        }
    }
    ids
}

/// Convert one rcdom node (and its subtree) into an unattached arena node.
/// Comments, doctypes, and processing instructions are dropped.
fn convert_node(handle: &Handle, doc: &mut Document) -> Option<NodeId> {
    let data = match &handle.data {
        RcNodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.as_ref().to_string(), a.value.to_string()))
                .collect();
            NodeData::Element {
                tag: name.local.as_ref().to_string(),
                attrs,
            }
        }
        RcNodeData::Text { contents } => NodeData::Text(contents.borrow().to_string()),
        _ => return None,
    };
    let id = doc.new_node(data);
    let children: Vec<NodeId> = handle
        .children
        .borrow()
        .iter()
        .filter_map(|child| convert_node(child, doc))
        .collect();
    doc.replace_children(id, children);
    Some(id)
}

fn convert_children(handle: &Handle, doc: &mut Document, parent: NodeId) {
    let children: Vec<NodeId> = handle
        .children
        .borrow()
        .iter()
        .filter_map(|child| convert_node(child, doc))
        .collect();
    doc.replace_children(parent, children);
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let RcNodeData::Element { name, .. } = &handle.data {
        if name.local.as_ref() == tag {
            return Some(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        if let Some(found) = find_element(child, tag) {
            return Some(found);
        }
    }
    None
}

fn extract_title(handle: &Handle) -> String {
    let Some(title) = find_element(handle, "title") else {
        return String::new();
    };
    let mut text = String::new();
    for child in title.children.borrow().iter() {
        if let RcNodeData::Text { contents } = &child.data {
            text.push_str(&contents.borrow());
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_structure() {
        let doc = parse_page(
            "<html><head><title>Guide</title></head>\
             <body><div id=\"content\"><p>hi</p></div></body></html>",
            "test://page",
        );
        assert_eq!(doc.title, "Guide");
        let div = doc.element_by_id("content").unwrap();
        assert_eq!(doc.inner_html(div), "<p>hi</p>");
    }

    #[test]
    fn test_parse_page_drops_comments() {
        let doc = parse_page("<body><!-- hidden --><p>shown</p></body>", "test://page");
        let html = doc.to_html();
        assert!(html.contains("shown"));
        assert!(!html.contains("hidden"));
    }

    #[test]
    fn test_parse_fragment_is_unattached() {
        let mut doc = parse_page("<body><div id=\"content\">old</div></body>", "test://page");
        let ids = parse_fragment(&mut doc, "<h1>Intro</h1><p>Hello</p>");
        assert_eq!(ids.len(), 2);
        // Not reachable until attached.
        assert!(!doc.to_html().contains("Intro"));
        let div = doc.element_by_id("content").unwrap();
        doc.replace_children(div, ids);
        assert_eq!(doc.inner_html(div), "<h1>Intro</h1><p>Hello</p>");
    }

    #[test]
    fn test_parse_fragment_preserves_attributes() {
        let mut doc = Document::new("test://frag");
        let ids = parse_fragment(&mut doc, "<a href=\"intro.html\" class=\"menuItem\">Intro</a>");
        assert_eq!(ids.len(), 1);
        assert_eq!(doc.attr(ids[0], "href"), Some("intro.html"));
        assert!(doc.has_class(ids[0], "menuItem"));
    }
}
