//! # Scene Document
//!
//! Arena-backed item tree. Items are addressed by [`NodeId`]; each gets a
//! referent from the document's own counter when it is created.

use crate::property::{Property, PropertyValue};
use crate::referent::ReferentCounter;

/// Index of an item in a [`SceneDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena position.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One typed item.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    /// Item class, e.g. `Part`.
    pub class: String,
    /// Unique referent token.
    pub referent: String,
    /// Properties in emission order.
    pub properties: Vec<Property>,
    /// Child items in emission order.
    pub children: Vec<NodeId>,
}

impl SceneNode {
    /// Value of a property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    /// The `Name` property, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self.property("Name") {
            Some(PropertyValue::String(name)) => Some(name),
            _ => None,
        }
    }
}

/// Rooted item tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDocument {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
    counter: ReferentCounter,
}

impl SceneDocument {
    /// Creates an empty document with a fresh counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&mut self, class: &str, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = SceneNode {
            class: class.to_owned(),
            referent: self.counter.next_token(),
            properties: Vec::new(),
            children: Vec::new(),
        };
        if !name.is_empty() {
            node.properties.push(Property {
                name: "Name".to_owned(),
                value: PropertyValue::String(name.to_owned()),
            });
        }
        self.nodes.push(node);
        id
    }

    /// Adds a top-level item.
    pub fn add_root(&mut self, class: &str, name: &str) -> NodeId {
        let id = self.create(class, name);
        self.roots.push(id);
        id
    }

    /// Adds an item under `parent`.
    pub fn add_child(&mut self, parent: NodeId, class: &str, name: &str) -> NodeId {
        let id = self.create(class, name);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Appends or replaces a property.
    pub fn set(&mut self, node: NodeId, name: &str, value: PropertyValue) {
        let properties = &mut self.nodes[node.0].properties;
        match properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => properties.push(Property {
                name: name.to_owned(),
                value,
            }),
        }
    }

    /// Item by id.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    /// Top-level items.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of an item.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// First top-level item of a class.
    #[must_use]
    pub fn find_root(&self, class: &str) -> Option<NodeId> {
        self.roots.iter().copied().find(|&id| self.nodes[id.0].class == class)
    }

    /// First child of `parent` with the given name.
    #[must_use]
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&id| self.nodes[id.0].name() == Some(name))
    }

    /// Every item, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Number of items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the document has no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
