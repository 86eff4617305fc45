use std::collections::BTreeMap;

use crate::node::{Attribute, Node, RESERVED};

/// Initial (or assigned) field values for a node.
///
/// Every field is optional; `None` means "leave as is", the same way an
/// absent key is ignored.
#[derive(Debug, Clone)]
pub struct NodeConfig<P> {
    pub(crate) kind: Option<&'static str>,
    pub(crate) data: Option<P>,
    pub(crate) value: Option<P>,
    pub(crate) attributes: BTreeMap<String, Attribute<P>>,
}

impl<P> Default for NodeConfig<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> NodeConfig<P> {
    pub fn new() -> Self {
        NodeConfig {
            kind: None,
            data: None,
            value: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn kind(mut self, kind: &'static str) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn data(mut self, data: P) -> Self {
        self.data = Some(data);
        self
    }

    pub fn value(mut self, value: P) -> Self {
        self.value = Some(value);
        self
    }

    /// Declares an attribute on creation, or targets an existing one on assignment.
    pub fn attribute(mut self, name: impl Into<String>, attr: impl Into<Attribute<P>>) -> Self {
        self.attributes.insert(name.into(), attr.into());
        self
    }

    /// Builds the node, declaring every configured attribute.
    pub(crate) fn build(self) -> Node<P>
    where
        P: Default,
    {
        let mut node = Node::new(self.kind.unwrap_or("Node"));
        if let Some(data) = self.data {
            node.data = data;
        }
        if let Some(value) = self.value {
            node.value = value;
        }
        for (name, attr) in self.attributes {
            if RESERVED.contains(&name.as_str()) {
                tracing::warn!(node = %node.id, name = %name, "ignoring reserved attribute name");
                continue;
            }
            node.attributes.insert(name, attr);
        }
        node
    }

    /// Copies the configured fields onto `node`; undeclared attributes and
    /// the kind are ignored.
    pub(crate) fn apply(self, node: &mut Node<P>) {
        if let Some(data) = self.data {
            node.data = data;
        }
        if let Some(value) = self.value {
            node.value = value;
        }
        for (name, attr) in self.attributes {
            if !node.set_attribute(&name, attr) {
                tracing::debug!(node = %node.id, name = %name, "ignoring undeclared attribute");
            }
        }
    }
}
