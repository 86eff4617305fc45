use std::collections::BTreeMap;

use crate::handle::Handle;

/// Names that belong to the node itself and can't be declared as attributes.
pub(crate) const RESERVED: [&str; 5] = ["data", "id", "next", "previous", "value"];

/// Which link a traversal follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    #[default]
    Next,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Previous => Direction::Next,
            Direction::Next => Direction::Previous,
        }
    }
}

/// Which attribute a search compares against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    Data,
    Value,
    /// A declared attribute. Only `Attribute::Value` entries can match.
    Attribute(&'a str),
}

/// Value of a declared attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute<P> {
    Value(P),
    /// Reference to another node of the same arena. Serialised as that
    /// node's own fields, never by following its links.
    Node(Handle),
    List(Vec<Attribute<P>>),
}

impl<P> Attribute<P> {
    pub fn as_value(&self) -> Option<&P> {
        match self {
            Attribute::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl<P> From<P> for Attribute<P> {
    fn from(value: P) -> Self {
        Attribute::Value(value)
    }
}

/// A single element of a chain.
///
/// Nodes live in an [`Arena`](crate::Arena); `previous` and `next` are handles
/// into that same arena and are only rewritten by the arena's link operations.
#[derive(Debug)]
pub struct Node<P> {
    pub(crate) id: Handle,
    pub(crate) kind: &'static str,
    pub(crate) previous: Option<Handle>,
    pub(crate) next: Option<Handle>,
    pub(crate) data: P,
    pub(crate) value: P,
    pub(crate) attributes: BTreeMap<String, Attribute<P>>,
}

impl<P: Default> Node<P> {
    pub(crate) fn new(kind: &'static str) -> Self {
        Node {
            id: Handle::fresh(),
            kind,
            previous: None,
            next: None,
            data: P::default(),
            value: P::default(),
            attributes: BTreeMap::new(),
        }
    }
}

impl<P> Node<P> {
    pub fn id(&self) -> Handle {
        self.id
    }

    /// Kind name of the node, `"Node"` unless configured otherwise.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn previous(&self) -> Option<Handle> {
        self.previous
    }

    pub fn next(&self) -> Option<Handle> {
        self.next
    }

    pub fn is_head(&self) -> bool {
        self.previous.is_none()
    }

    pub fn is_tail(&self) -> bool {
        self.next.is_none()
    }

    pub fn data(&self) -> &P {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut P {
        &mut self.data
    }

    pub fn set_data(&mut self, data: P) {
        self.data = data;
    }

    pub fn value(&self) -> &P {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut P {
        &mut self.value
    }

    pub fn set_value(&mut self, value: P) {
        self.value = value;
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute<P>> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute<P>)> {
        self.attributes.iter().map(|(name, attr)| (name.as_str(), attr))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Overwrites an attribute that was declared when the node was created.
    ///
    /// Returns `false` and leaves the node untouched for undeclared names.
    pub fn set_attribute(&mut self, name: &str, attr: Attribute<P>) -> bool {
        match self.attributes.get_mut(name) {
            Some(slot) => {
                *slot = attr;
                true
            }
            None => false,
        }
    }

    /// The link followed when walking in `direction`.
    pub fn link(&self, direction: Direction) -> Option<Handle> {
        match direction {
            Direction::Previous => self.previous,
            Direction::Next => self.next,
        }
    }

    pub(crate) fn link_mut(&mut self, direction: Direction) -> &mut Option<Handle> {
        match direction {
            Direction::Previous => &mut self.previous,
            Direction::Next => &mut self.next,
        }
    }

    /// The comparable value behind `field`, if any.
    pub fn field(&self, field: Field<'_>) -> Option<&P> {
        match field {
            Field::Data => Some(&self.data),
            Field::Value => Some(&self.value),
            Field::Attribute(name) => self.attributes.get(name).and_then(Attribute::as_value),
        }
    }

    /// Structural equality on everything `to_json` exposes except the id.
    ///
    /// Node attributes compare by handle: `to_json` keeps the nested node's
    /// id, so distinct nested nodes never serialise alike either.
    pub fn fields_eq(&self, other: &Node<P>) -> bool
    where
        P: PartialEq,
    {
        self.data == other.data
            && self.value == other.value
            && self.public_attributes().eq(other.public_attributes())
    }

    /// Declared attributes without the `_`-prefixed private ones, sorted by name.
    pub fn public_attributes(&self) -> impl Iterator<Item = (&str, &Attribute<P>)> {
        self.attributes().filter(|(name, _)| !name.starts_with('_'))
    }

    /// Copies everything but the id and the links.
    pub(crate) fn duplicate(&self) -> Node<P>
    where
        P: Clone,
    {
        Node {
            id: Handle::fresh(),
            kind: self.kind,
            previous: None,
            next: None,
            data: self.data.clone(),
            value: self.value.clone(),
            attributes: self.attributes.clone(),
        }
    }
}
