//! Navigation menu - entry discovery and the single-active-entry highlight.

use crate::dom::{Document, NodeId};

/// Class marking a navigation menu element.
pub const MENU_ITEM_CLASS: &str = "menuItem";
/// Class marking the active menu element.
pub const ACTIVE_CLASS: &str = "selected";

/// A discovered menu entry: which node it is, which container it fills,
/// and where the content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub node: NodeId,
    pub target_id: String,
    pub uri: String,
    pub label: String,
}

/// All menu elements in document order.
pub fn menu_items(doc: &Document) -> Vec<NodeId> {
    doc.elements_by_class(MENU_ITEM_CLASS)
}

/// Mark `entry` as the active menu element and clear the marker from every
/// other menu element. Exactly one element carries the marker afterwards.
pub fn activate(doc: &mut Document, entry: NodeId) {
    for item in menu_items(doc) {
        doc.remove_class(item, ACTIVE_CLASS);
    }
    doc.add_class(entry, MENU_ITEM_CLASS);
    doc.add_class(entry, ACTIVE_CLASS);
}

/// The currently active menu element, if any.
#[allow(dead_code)]
pub fn active_item(doc: &Document) -> Option<NodeId> {
    menu_items(doc)
        .into_iter()
        .find(|&item| doc.has_class(item, ACTIVE_CLASS))
}

/// Discover include entries from a loaded page.
///
/// An entry's container id and URI come from `data-target`/`data-include`
/// attributes, or from an `onclick="csi('id','uri',this)"` attribute as
/// written in the original site markup. Returns the resolvable entries and
/// the labels of menu elements that name no include target.
pub fn discover(doc: &Document) -> (Vec<MenuEntry>, Vec<String>) {
    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    for node in menu_items(doc) {
        let label = doc.inner_text(node);
        let from_data = match (doc.attr(node, "data-target"), doc.attr(node, "data-include")) {
            (Some(target), Some(uri)) => Some((target.to_string(), uri.to_string())),
            _ => None,
        };
        let resolved = from_data.or_else(|| {
            doc.attr(node, "onclick").and_then(parse_csi_call)
        });
        match resolved {
            Some((target_id, uri)) => entries.push(MenuEntry {
                node,
                target_id,
                uri,
                label,
            }),
            None => skipped.push(if label.is_empty() {
                format!("node #{}", node)
            } else {
                label
            }),
        }
    }
    (entries, skipped)
}

/// Extract the id and uri arguments from a `csi('id', 'uri', this)` call.
fn parse_csi_call(onclick: &str) -> Option<(String, String)> {
    let open = onclick.find("csi")? + 3;
    let rest = onclick[open..].trim_start();
    let rest = rest.strip_prefix('(')?;
    let (id, rest) = take_quoted(rest)?;
    let rest = rest.trim_start().strip_prefix(',')?;
    let (uri, _) = take_quoted(rest)?;
    Some((id, uri))
}

/// Consume a leading quoted string (single or double quotes).
fn take_quoted(s: &str) -> Option<(String, &str)> {
    let s = s.trim_start();
    let quote = s.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let inner = &s[1..];
    let end = inner.find(quote)?;
    Some((inner[..end].to_string(), &inner[end + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_page;

    const MENU_PAGE: &str = "<body>\
        <span class=\"menuItem selected\" data-target=\"content\" data-include=\"intro.html\">Intro</span>\
        <span class=\"menuItem\" onclick=\"csi('content', 'spec.html', this)\">Spec</span>\
        <span class=\"menuItem\">Broken</span>\
        <div id=\"content\"></div></body>";

    #[test]
    fn test_discover_both_attribute_styles() {
        let doc = parse_page(MENU_PAGE, "test://menu");
        let (entries, skipped) = discover(&doc);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "Intro");
        assert_eq!(entries[0].target_id, "content");
        assert_eq!(entries[0].uri, "intro.html");
        assert_eq!(entries[1].label, "Spec");
        assert_eq!(entries[1].uri, "spec.html");
        assert_eq!(skipped, vec!["Broken".to_string()]);
    }

    #[test]
    fn test_activate_moves_the_marker() {
        let mut doc = parse_page(MENU_PAGE, "test://menu");
        let items = menu_items(&doc);
        assert_eq!(items.len(), 3);
        assert_eq!(active_item(&doc), Some(items[0]));

        activate(&mut doc, items[1]);
        assert_eq!(active_item(&doc), Some(items[1]));
        let selected: Vec<_> = items
            .iter()
            .filter(|&&i| doc.has_class(i, ACTIVE_CLASS))
            .collect();
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut doc = parse_page(MENU_PAGE, "test://menu");
        let items = menu_items(&doc);
        activate(&mut doc, items[2]);
        let once = doc.to_html();
        activate(&mut doc, items[2]);
        assert_eq!(doc.to_html(), once);
    }

    #[test]
    fn test_parse_csi_call_quote_styles() {
        assert_eq!(
            parse_csi_call("csi('content', 'intro.html', this)"),
            Some(("content".to_string(), "intro.html".to_string()))
        );
        assert_eq!(
            parse_csi_call("csi(\"content\",\"intro.html\",this)"),
            Some(("content".to_string(), "intro.html".to_string()))
        );
        assert_eq!(parse_csi_call("toggleNav()"), None);
    }
}
