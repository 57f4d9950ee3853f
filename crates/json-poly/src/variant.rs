//! Dynamic instances of family variants.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{json_kind, DecodeError};
use crate::tree::LeafNode;

static NULL: Value = Value::Null;

/// A discriminator value implied by a variant's position in its tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Declared discriminator member name.
    pub field: String,
    /// Enum member name.
    pub value: String,
}

/// An instance of a leaf type: its name, the tags of its path and its own
/// field values keyed by declared name.
///
/// Tags are informational. The encoder always derives discriminators from
/// the tree, never from an instance, and equality compares only the type
/// name and field values.
#[derive(Debug, Clone)]
pub struct Variant {
    type_name: String,
    tags: Vec<Tag>,
    fields: IndexMap<String, Value>,
}

impl Variant {
    /// A bare instance with no tags and no fields; undeclared fields are
    /// filled with defaults when encoded.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            tags: Vec::new(),
            fields: IndexMap::new(),
        }
    }

    pub(crate) fn from_parts(leaf: &LeafNode, fields: IndexMap<String, Value>) -> Self {
        let tags = leaf
            .path()
            .iter()
            .map(|step| Tag {
                field: step.field().field().to_string(),
                value: step.tag_name().to_string(),
            })
            .collect();
        Self {
            type_name: leaf.type_name().to_string(),
            tags,
            fields,
        }
    }

    pub(crate) fn with_defaults(leaf: &LeafNode) -> Self {
        let fields = leaf
            .fields()
            .iter()
            .map(|def| (def.name().to_string(), def.default_value()))
            .collect();
        Self::from_parts(leaf, fields)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Tag value for a discriminator member, e.g. `tag("species") == Some("Dog")`.
    pub fn tag(&self, field: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.field == field)
            .map(|t| t.value.as_str())
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, DecodeError> {
        self.typed(name, "boolean", Value::as_bool)
    }

    pub fn get_i64(&self, name: &str) -> Result<i64, DecodeError> {
        self.typed(name, "integer", Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Result<f64, DecodeError> {
        self.typed(name, "number", Value::as_f64)
    }

    pub fn get_str(&self, name: &str) -> Result<&str, DecodeError> {
        self.typed(name, "string", Value::as_str)
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: &'static str,
        read: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T, DecodeError> {
        let value = self.fields.get(name).unwrap_or(&NULL);
        read(value).ok_or_else(|| DecodeError::TypeMismatch {
            member: name.to_string(),
            expected,
            found: json_kind(value),
        })
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.fields == other.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_accessors() {
        let v = Variant::new("Insect")
            .with("NumLegs", 8)
            .with("Name", "Insectoid")
            .with("Weight", 0.5);
        assert_eq!(v.get_i64("NumLegs").unwrap(), 8);
        assert_eq!(v.get_str("Name").unwrap(), "Insectoid");
        assert_eq!(v.get_f64("Weight").unwrap(), 0.5);
        assert!(matches!(
            v.get_bool("NumLegs"),
            Err(DecodeError::TypeMismatch { expected: "boolean", found: "integer", .. })
        ));
        assert!(matches!(
            v.get_i64("Missing"),
            Err(DecodeError::TypeMismatch { found: "null", .. })
        ));
    }

    #[test]
    fn equality_ignores_field_order() {
        let a = Variant::new("Insect").with("A", 1).with("B", 2);
        let b = Variant::new("Insect").with("B", 2).with("A", 1);
        assert_eq!(a, b);
        assert_ne!(a, Variant::new("Insect").with("A", 1).with("B", json!(3)));
    }

    #[test]
    fn equality_ignores_tags() {
        let bare = Variant::new("Dog").with("Name", "Rex");
        let mut tagged = bare.clone();
        tagged.tags.push(Tag {
            field: "type".into(),
            value: "Mammal".into(),
        });
        assert_eq!(bare, tagged);
        assert_ne!(bare, Variant::new("Cat").with("Name", "Rex"));
    }
}
