use std::collections::{BTreeMap, HashSet};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::arena::Arena;
use crate::errors::{NodeError, Result};
use crate::handle::Handle;
use crate::node::Attribute;

impl<P: Serialize> Arena<P> {
    /// Plain object of the node's own fields, keys sorted.
    ///
    /// `previous`, `next` and `_`-prefixed attributes are left out. Node
    /// attributes (also inside lists) are replaced by their own object, so
    /// the result never depends on the chain around them.
    pub fn to_json(&self, this: Handle) -> Result<Value> {
        self.node_json(this, &mut HashSet::new())
    }

    /// `to_json` rendered with four-space indentation.
    pub fn to_string_pretty(&self, this: Handle) -> Result<String> {
        let json = self.to_json(this)?;
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        json.serialize(&mut ser)?;
        Ok(String::from_utf8(out)?)
    }

    /// One-line summary: zero-padded id, kind padded to `width`, value.
    pub fn dump(&self, this: Handle, width: usize) -> Result<String> {
        let node = self.get(this).ok_or(NodeError::UnknownHandle(this))?;
        let value = serde_json::to_string(node.value())?;
        let line = format!("{:04} | {:<width$} | {}", node.id().as_raw(), node.kind(), value);
        tracing::info!("{line}");
        Ok(line)
    }

    fn node_json(&self, this: Handle, visiting: &mut HashSet<Handle>) -> Result<Value> {
        let node = self.get(this).ok_or(NodeError::UnknownHandle(this))?;
        if !visiting.insert(this) {
            return Err(NodeError::AttributeCycle(this));
        }
        let mut fields = BTreeMap::new();
        fields.insert("data".to_owned(), serde_json::to_value(node.data())?);
        fields.insert("id".to_owned(), Value::from(node.id().as_raw()));
        fields.insert("value".to_owned(), serde_json::to_value(node.value())?);
        for (name, attr) in node.public_attributes() {
            fields.insert(name.to_owned(), self.attribute_json(attr, visiting)?);
        }
        visiting.remove(&this);
        Ok(Value::Object(fields.into_iter().collect::<Map<_, _>>()))
    }

    fn attribute_json(
        &self,
        attr: &Attribute<P>,
        visiting: &mut HashSet<Handle>,
    ) -> Result<Value> {
        match attr {
            Attribute::Value(value) => Ok(serde_json::to_value(value)?),
            Attribute::Node(h) => self.node_json(*h, visiting),
            Attribute::List(items) => items
                .iter()
                .map(|item| self.attribute_json(item, visiting))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
        }
    }
}

impl<P: DeserializeOwned> Arena<P> {
    /// Copies recognised keys of a JSON object onto `this`.
    ///
    /// `data`, `value` and already declared attributes are assigned; `id`,
    /// the links and unknown keys are skipped. Nothing is written unless
    /// every recognised value deserialises.
    pub fn set_properties(&mut self, this: Handle, values: &Map<String, Value>) -> Result<Handle> {
        let node = self.get_mut(this).ok_or(NodeError::UnknownHandle(this))?;
        let mut parsed = Vec::new();
        for (name, raw) in values {
            let known = matches!(name.as_str(), "data" | "value") || node.has_attribute(name);
            if !known {
                tracing::debug!(node = %this, name = %name, "ignoring unrecognised property");
                continue;
            }
            parsed.push((name.as_str(), serde_json::from_value::<P>(raw.clone())?));
        }
        for (name, value) in parsed {
            match name {
                "data" => node.set_data(value),
                "value" => node.set_value(value),
                _ => {
                    node.set_attribute(name, Attribute::Value(value));
                }
            }
        }
        Ok(this)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::NodeConfig;

    #[test]
    fn links_are_never_serialised() {
        let mut arena = Arena::<Value>::new();
        let a = arena.create_with_data(json!(1));
        let b = arena.create_with_data(json!(2));
        arena.after(b, a);
        let json = arena.to_json(a).unwrap();
        assert_eq!(json, json!({ "data": 1, "id": a.as_raw(), "value": null }));
    }

    #[test]
    fn keys_are_sorted_and_private_ones_skipped() {
        let mut arena = Arena::<Value>::new();
        let node = arena.create(
            NodeConfig::new()
                .data(json!("d"))
                .attribute("zeta", json!(1))
                .attribute("alpha", json!(2))
                .attribute("_protected", json!("protected"))
                .attribute("__private", json!("private")),
        );
        let json = arena.to_json(node).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["alpha", "data", "id", "value", "zeta"]);
    }

    #[test]
    fn nested_nodes_are_unwrapped() {
        let mut arena = Arena::<Value>::new();
        let sub = arena.create(NodeConfig::new().data(json!(0.5)).value(json!(0.25)));
        let item = arena.create(NodeConfig::new().data(json!("item")));
        let neighbour = arena.spawn();
        arena.after(neighbour, sub);
        let node = arena.create(
            NodeConfig::new()
                .data(json!(1))
                .value(json!(2))
                .attribute("node", Attribute::Node(sub))
                .attribute(
                    "array",
                    Attribute::List(vec![
                        Attribute::Value(json!(1)),
                        Attribute::Value(json!(2)),
                        Attribute::Node(item),
                    ]),
                ),
        );
        let expected = json!({
            "array": [1, 2, { "data": "item", "id": item.as_raw(), "value": null }],
            "data": 1,
            "id": node.as_raw(),
            "node": { "data": 0.5, "id": sub.as_raw(), "value": 0.25 },
            "value": 2,
        });
        assert_eq!(arena.to_json(node).unwrap(), expected);
    }

    #[test]
    fn nested_nodes_compare_like_their_json() {
        let mut arena = Arena::<Value>::new();
        let first = arena.create_with_data(json!(1));
        let twin = arena.create_with_data(json!(1));
        let a = arena.create(NodeConfig::new().attribute("sub", Attribute::Node(first)));
        let b = arena.create(NodeConfig::new().attribute("sub", Attribute::Node(twin)));
        let c = arena.clone_node(a).unwrap();

        let sub_json = |h: Handle| arena.to_json(h).unwrap()["sub"].clone();
        assert_ne!(sub_json(a), sub_json(b));
        assert!(!arena.fields_eq(a, b));
        assert_eq!(sub_json(a), sub_json(c));
        assert!(arena.fields_eq(a, c));
    }

    #[test]
    fn attribute_cycles_are_reported() {
        let mut arena = Arena::<Value>::new();
        let a = arena.create(NodeConfig::new().attribute("peer", json!(null)));
        let b = arena.create(NodeConfig::new().attribute("peer", Attribute::Node(a)));
        arena.get_mut(a).unwrap().set_attribute("peer", Attribute::Node(b));
        assert!(matches!(arena.to_json(a), Err(NodeError::AttributeCycle(h)) if h == a));
    }

    #[test]
    fn shared_node_twice_is_not_a_cycle() {
        let mut arena = Arena::<Value>::new();
        let sub = arena.spawn();
        let node = arena.create(NodeConfig::new().attribute(
            "pair",
            Attribute::List(vec![Attribute::Node(sub), Attribute::Node(sub)]),
        ));
        let json = arena.to_json(node).unwrap();
        assert_eq!(json["pair"][0], json["pair"][1]);
    }

    #[test]
    fn released_attribute_node_is_an_error() {
        let mut arena = Arena::<Value>::new();
        let sub = arena.spawn();
        let node = arena.create(NodeConfig::new().attribute("sub", Attribute::Node(sub)));
        arena.release(sub);
        assert!(matches!(arena.to_json(node), Err(NodeError::UnknownHandle(h)) if h == sub));
    }

    #[test]
    fn pretty_string_uses_four_spaces() {
        let mut arena = Arena::<Value>::new();
        let node = arena.create(NodeConfig::new().data(json!(1)).value(json!("v")));
        let text = arena.to_string_pretty(node).unwrap();
        let expected = format!(
            "{{\n    \"data\": 1,\n    \"id\": {},\n    \"value\": \"v\"\n}}",
            node.as_raw()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn dump_pads_id_and_kind() {
        let mut arena = Arena::<Value>::new();
        let node = arena.create(NodeConfig::new().kind("Token").value(json!(3)));
        let line = arena.dump(node, 8).unwrap();
        assert_eq!(line, format!("{:04} | Token    | 3", node.as_raw()));
    }

    #[test]
    fn set_properties_skips_unknown_and_links() {
        let mut arena = Arena::<Value>::new();
        let node = arena.create(NodeConfig::new().attribute("rank", json!(0)));
        let other = arena.spawn();
        let values = json!({
            "data": 1,
            "value": 2,
            "rank": 3,
            "id": 99,
            "next": other.as_raw(),
            "\u{1}": 4,
        });
        arena.set_properties(node, values.as_object().unwrap()).unwrap();
        let n = arena.get(node).unwrap();
        assert_eq!(n.data(), &json!(1));
        assert_eq!(n.value(), &json!(2));
        assert_eq!(n.attribute("rank"), Some(&Attribute::Value(json!(3))));
        assert_eq!(n.id(), node);
        assert!(n.next().is_none());
        assert!(!n.has_attribute("\u{1}"));
    }

    #[test]
    fn set_properties_is_all_or_nothing() {
        let mut arena = Arena::<i32>::new();
        let node = arena.create(NodeConfig::new().data(1).value(2));
        let values = json!({ "data": 5, "value": "not a number" });
        assert!(matches!(
            arena.set_properties(node, values.as_object().unwrap()),
            Err(NodeError::Json(_))
        ));
        assert_eq!(arena.get(node).unwrap().data(), &1);
    }
}
