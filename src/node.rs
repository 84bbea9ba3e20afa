use thiserror::Error;

/// Attributes in insertion order.
pub type Attributes = Vec<(String, String)>;

/// A node that cannot be rendered because the tree builder left out a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("parent node has no tag")]
    MissingTag,
    #[error("parent node has no children")]
    MissingChildren,
    #[error("leaf node has no value")]
    MissingValue,
}

/// An HTML element or raw text.
///
/// Fields are optional so that a malformed tree is representable and is
/// reported by [`Node::render`] instead of being silently emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        tag: Option<String>,
        value: Option<String>,
        attrs: Attributes,
    },
    Parent {
        tag: Option<String>,
        children: Option<Vec<Node>>,
        attrs: Attributes,
    },
}

impl Node {
    /// Untagged leaf; renders as its value.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Leaf {
            tag: None,
            value: Some(value.into()),
            attrs: Vec::new(),
        }
    }

    pub fn leaf(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Node::Leaf {
            tag: Some(tag.into()),
            value: Some(value.into()),
            attrs: Vec::new(),
        }
    }

    pub fn parent(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Parent {
            tag: Some(tag.into()),
            children: Some(children),
            attrs: Vec::new(),
        }
    }

    /// Set an attribute. A key that is already present keeps its position
    /// and takes the new value.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let (key, value) = (key.into(), value.into());
        let attrs = match &mut self {
            Node::Leaf { attrs, .. } | Node::Parent { attrs, .. } => attrs,
        };
        match attrs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => attrs.push((key, value)),
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Leaf { tag, .. } | Node::Parent { tag, .. } => tag.as_deref(),
        }
    }

    pub fn attrs(&self) -> &[(String, String)] {
        match self {
            Node::Leaf { attrs, .. } | Node::Parent { attrs, .. } => attrs,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Parent {
                children: Some(children),
                ..
            } => children,
            _ => &[],
        }
    }

    /// Render this node and its subtree to HTML. Text and attribute values
    /// are written verbatim, without escaping.
    pub fn render(&self) -> Result<String, StructuralError> {
        let mut out = String::new();
        self.render_into(&mut out)?;
        Ok(out)
    }

    fn render_into(&self, out: &mut String) -> Result<(), StructuralError> {
        match self {
            Node::Leaf { tag, value, attrs } => match tag.as_deref() {
                None | Some("") => {
                    out.push_str(value.as_deref().ok_or(StructuralError::MissingValue)?);
                }
                Some("img") => {
                    out.push_str("<img");
                    out.push_str(&render_attrs(attrs));
                    out.push_str("/>");
                }
                Some(tag) => {
                    let value = value.as_deref().ok_or(StructuralError::MissingValue)?;
                    open_tag(tag, attrs, out);
                    out.push_str(value);
                    close_tag(tag, out);
                }
            },
            Node::Parent {
                tag,
                children,
                attrs,
            } => {
                let tag = tag
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .ok_or(StructuralError::MissingTag)?;
                let children = children.as_ref().ok_or(StructuralError::MissingChildren)?;
                open_tag(tag, attrs, out);
                for child in children {
                    child.render_into(out)?;
                }
                close_tag(tag, out);
            }
        }
        Ok(())
    }
}

/// Render attributes as ` key="value"` pairs in insertion order.
pub fn render_attrs(attrs: &[(String, String)]) -> String {
    let mut out = String::new();
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out
}

fn open_tag(tag: &str, attrs: &[(String, String)], out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push_str(&render_attrs(attrs));
    out.push('>');
}

fn close_tag(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
