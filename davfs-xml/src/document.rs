/// A parsed XML document, reduced to what a multistatus consumer needs:
/// namespace-resolved elements and their text.
#[derive(Debug, PartialEq, Clone)]
pub struct Document {
    pub root: Element,
}

/// An element whose name has been resolved against the namespace
/// declarations in scope when it was read.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Element {
    /// Namespace URI, `None` when the name is not bound to any namespace
    pub namespace: Option<String>,
    pub local_name: String,
    pub children: Vec<Node>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Document {
    /// All elements matching `(ns, local)` in document order, the root included.
    pub fn elements_by_tag_name_ns(&self, ns: &str, local: &str) -> Vec<&Element> {
        let mut acc = Vec::new();
        if self.root.is(ns, local) {
            acc.push(&self.root);
        }
        self.root.collect_descendants(ns, local, &mut acc);
        acc
    }
}

impl Element {
    pub fn new(namespace: Option<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace,
            local_name: local_name.into(),
            children: Vec::new(),
        }
    }

    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.local_name == local && self.namespace.as_deref() == Some(ns)
    }

    /// All descendants matching `(ns, local)` in document order.
    /// The element itself is never part of the result.
    pub fn elements_by_tag_name_ns(&self, ns: &str, local: &str) -> Vec<&Element> {
        let mut acc = Vec::new();
        self.collect_descendants(ns, local, &mut acc);
        acc
    }

    /// First descendant matching `(ns, local)`, depth first.
    pub fn find_ns(&self, ns: &str, local: &str) -> Option<&Element> {
        self.children.iter().find_map(|child| match child {
            Node::Element(e) if e.is(ns, local) => Some(e),
            Node::Element(e) => e.find_ns(ns, local),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut acc = String::new();
        self.push_text(&mut acc);
        acc
    }

    fn push_text(&self, acc: &mut String) {
        for child in self.children.iter() {
            match child {
                Node::Text(txt) => acc.push_str(txt),
                Node::Element(e) => e.push_text(acc),
            }
        }
    }

    fn collect_descendants<'a>(&'a self, ns: &str, local: &str, acc: &mut Vec<&'a Element>) {
        for child in self.children.iter() {
            if let Node::Element(e) = child {
                if e.is(ns, local) {
                    acc.push(e);
                }
                e.collect_descendants(ns, local, acc);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dav(name: &str, children: Vec<Node>) -> Node {
        Node::Element(Element {
            namespace: Some("DAV:".into()),
            local_name: name.into(),
            children,
        })
    }

    fn txt(v: &str) -> Node {
        Node::Text(v.into())
    }

    fn sample() -> Document {
        let Node::Element(root) = dav(
            "multistatus",
            vec![
                dav("response", vec![dav("href", vec![txt("/a/")])]),
                dav(
                    "response",
                    vec![
                        dav("href", vec![txt("/a/"), txt("b.txt")]),
                        dav("response", vec![]),
                    ],
                ),
            ],
        ) else {
            unreachable!()
        };
        Document { root }
    }

    #[test]
    fn lookup_is_in_document_order() {
        let doc = sample();
        let found = doc.elements_by_tag_name_ns("DAV:", "response");
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].text_content(), "/a/");
        assert_eq!(found[1].text_content(), "/a/b.txt");
        assert_eq!(found[2].text_content(), "");
    }

    #[test]
    fn lookup_respects_namespace() {
        let doc = sample();
        assert!(doc.elements_by_tag_name_ns("urn:other", "response").is_empty());
        assert_eq!(doc.elements_by_tag_name_ns("DAV:", "multistatus").len(), 1);
        assert!(doc.root.elements_by_tag_name_ns("DAV:", "multistatus").is_empty());
    }

    #[test]
    fn find_first_descendant() {
        let doc = sample();
        let second = doc.elements_by_tag_name_ns("DAV:", "response")[1];
        let href = second.find_ns("DAV:", "href").map(Element::text_content);
        assert_eq!(href.as_deref(), Some("/a/b.txt"));
        assert!(second.find_ns("DAV:", "getetag").is_none());
    }
}
