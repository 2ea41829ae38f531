//! Mutable document model - a flat node arena with parent/child links.
//!
//! Nodes are referenced by index into the arena. Replacing an element's
//! content detaches the old subtree; detached nodes stay in the arena but
//! are unreachable from the root, so lookups and serialization ignore them.

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub enum NodeData {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub nodes: Vec<Node>,
    pub root: NodeId,
    pub base_uri: String,
    pub title: String,
}

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "source", "track", "wbr",
];

impl Document {
    /// Create an empty document with a synthetic `#document` root.
    pub fn new(base_uri: &str) -> Self {
        let root = Node {
            data: NodeData::Element {
                tag: "#document".to_string(),
                attrs: Vec::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: 0,
            base_uri: base_uri.to_string(),
            title: String::new(),
        }
    }

    /// Add a node to the arena without attaching it to any parent.
    pub fn new_node(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Add a node and append it to `parent`'s children.
    #[allow(dead_code)]
    pub fn append_node(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.new_node(data);
        self.nodes[id].parent = Some(parent);
        self.nodes[parent].children.push(id);
        id
    }

    /// Replace `parent`'s children with `new_children`. The old subtree is
    /// detached, not freed.
    pub fn replace_children(&mut self, parent: NodeId, new_children: Vec<NodeId>) {
        for &old in &self.nodes[parent].children.clone() {
            self.nodes[old].parent = None;
        }
        for &child in &new_children {
            self.nodes[child].parent = Some(parent);
        }
        self.nodes[parent].children = new_children;
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id].data {
            if let Some(entry) = attrs.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
                entry.1 = value.to_string();
            } else {
                attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    /// The space-separated class list of an element.
    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        self.attr(id, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).iter().any(|c| *c == class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let mut list = self.attr(id, "class").unwrap_or("").trim().to_string();
        if !list.is_empty() {
            list.push(' ');
        }
        list.push_str(class);
        self.set_attr(id, "class", &list);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let list: Vec<String> = self
            .classes(id)
            .into_iter()
            .filter(|c| *c != class)
            .map(|c| c.to_string())
            .collect();
        if self.attr(id, "class").is_some() {
            self.set_attr(id, "class", &list.join(" "));
        }
    }

    /// Find the first element with the given id attribute, in document order.
    /// Only nodes reachable from the root are considered.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.walk().find(|&n| self.attr(n, "id") == Some(id))
    }

    /// All elements carrying the given class, in document order.
    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.walk().filter(|&n| self.has_class(n, class)).collect()
    }

    /// Document-order traversal of nodes reachable from the root.
    pub fn walk(&self) -> DocWalk<'_> {
        DocWalk {
            doc: self,
            stack: vec![self.root],
        }
    }

    /// Concatenated text content of a subtree, whitespace-collapsed.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].data {
            NodeData::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            NodeData::Element { .. } => {
                for &child in &self.nodes[id].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Serialize the whole document back to HTML text.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for &child in &self.nodes[self.root].children {
            self.write_node(child, &mut out, false);
        }
        out
    }

    /// Serialize an element's content without the enclosing tag.
    #[allow(dead_code)]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self
            .tag(id)
            .map(|t| t == "script" || t == "style")
            .unwrap_or(false);
        for &child in &self.nodes[id].children {
            self.write_node(child, &mut out, raw);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String, raw_text: bool) {
        match &self.nodes[id].data {
            NodeData::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            NodeData::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&tag.as_str()) {
                    return;
                }
                let raw = tag == "script" || tag == "style";
                for &child in &self.nodes[id].children {
                    self.write_node(child, out, raw);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

pub struct DocWalk<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for DocWalk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Push children reversed so document order comes off the stack.
        for &child in self.doc.nodes[id].children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> Document {
        let mut doc = Document::new("test://sample");
        let root = doc.root;
        let body = doc.append_node(
            root,
            NodeData::Element {
                tag: "body".to_string(),
                attrs: Vec::new(),
            },
        );
        let div = doc.append_node(
            body,
            NodeData::Element {
                tag: "div".to_string(),
                attrs: vec![("id".to_string(), "content".to_string())],
            },
        );
        doc.append_node(div, NodeData::Text("old".to_string()));
        doc
    }

    #[test]
    fn test_element_by_id() {
        let doc = sample_doc();
        let div = doc.element_by_id("content").unwrap();
        assert_eq!(doc.tag(div), Some("div"));
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn test_replace_children_detaches_old_subtree() {
        let mut doc = sample_doc();
        let div = doc.element_by_id("content").unwrap();
        let text = doc.new_node(NodeData::Text("new".to_string()));
        doc.replace_children(div, vec![text]);
        assert_eq!(doc.inner_html(div), "new");
        assert!(!doc.to_html().contains("old"));
    }

    #[test]
    fn test_class_toggling() {
        let mut doc = sample_doc();
        let div = doc.element_by_id("content").unwrap();
        doc.add_class(div, "menuItem");
        doc.add_class(div, "selected");
        assert!(doc.has_class(div, "menuItem"));
        assert!(doc.has_class(div, "selected"));
        // Adding twice must not duplicate.
        doc.add_class(div, "selected");
        assert_eq!(doc.attr(div, "class"), Some("menuItem selected"));
        doc.remove_class(div, "selected");
        assert!(!doc.has_class(div, "selected"));
        assert!(doc.has_class(div, "menuItem"));
    }

    #[test]
    fn test_serialization_escapes_text() {
        let mut doc = sample_doc();
        let div = doc.element_by_id("content").unwrap();
        let text = doc.new_node(NodeData::Text("a < b & c".to_string()));
        doc.replace_children(div, vec![text]);
        assert_eq!(doc.inner_html(div), "a &lt; b &amp; c");
    }

    #[test]
    fn test_inner_text_collapses_whitespace() {
        let mut doc = sample_doc();
        let div = doc.element_by_id("content").unwrap();
        let a = doc.new_node(NodeData::Text("  Getting ".to_string()));
        let b = doc.new_node(NodeData::Text("\n  Started ".to_string()));
        doc.replace_children(div, vec![a, b]);
        assert_eq!(doc.inner_text(div), "Getting Started");
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let mut doc = Document::new("test://void");
        let root = doc.root;
        doc.append_node(
            root,
            NodeData::Element {
                tag: "br".to_string(),
                attrs: Vec::new(),
            },
        );
        assert_eq!(doc.to_html(), "<br>");
    }
}
