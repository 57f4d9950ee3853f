//! Peek-then-dispatch decoding.
//!
//! The decoder works on an already parsed [`Value`], so a discriminator can
//! be read from anywhere in the object before any field is interpreted.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{json_kind, DecodeError};
use crate::naming::NamingAdapter;
use crate::tree::{DiscriminatorTree, LeafNode, SplitNode, TreeNode};
use crate::variant::Variant;

#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    naming: &'a NamingAdapter,
}

impl<'a> Decoder<'a> {
    pub fn new(naming: &'a NamingAdapter) -> Self {
        Self { naming }
    }

    /// Resolves `value` to a leaf of `tree` and reads its fields.
    pub fn decode(&self, value: &Value, tree: &DiscriminatorTree) -> Result<Variant, DecodeError> {
        let object = value.as_object().ok_or_else(|| DecodeError::TypeMismatch {
            member: tree.family().to_string(),
            expected: "object",
            found: json_kind(value),
        })?;

        let mut node = tree.root();
        loop {
            match node {
                TreeNode::Leaf(leaf) => return self.read_leaf(object, leaf),
                TreeNode::Split(split) => node = self.select_child(object, split)?,
            }
        }
    }

    /// Decodes every element in order, stopping at the first failure.
    ///
    /// An element's failure is wrapped in [`DecodeError::Element`] with its
    /// index; [`DecodeError::root_cause`] gives the error `decode` would have
    /// returned for that element.
    pub fn decode_array(
        &self,
        value: &Value,
        tree: &DiscriminatorTree,
    ) -> Result<Vec<Variant>, DecodeError> {
        let items = value.as_array().ok_or_else(|| DecodeError::TypeMismatch {
            member: tree.family().to_string(),
            expected: "array",
            found: json_kind(value),
        })?;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                self.decode(item, tree).map_err(|err| {
                    tracing::debug!(family = %tree.family(), index, error = %err, "array element rejected");
                    DecodeError::Element {
                        index,
                        source: Box::new(err),
                    }
                })
            })
            .collect()
    }

    /// Parses `text` and decodes one object.
    pub fn decode_str(&self, text: &str, tree: &DiscriminatorTree) -> Result<Variant, DecodeError> {
        let value: Value = serde_json::from_str(text)?;
        self.decode(&value, tree)
    }

    /// Parses `text` and decodes an array of objects.
    pub fn decode_array_str(
        &self,
        text: &str,
        tree: &DiscriminatorTree,
    ) -> Result<Vec<Variant>, DecodeError> {
        let value: Value = serde_json::from_str(text)?;
        self.decode_array(&value, tree)
    }

    fn select_child<'t>(
        &self,
        object: &Map<String, Value>,
        split: &'t SplitNode,
    ) -> Result<&'t TreeNode, DecodeError> {
        let field = split.field();
        let member = self.naming.field_name(field.field());
        let wire = self
            .naming
            .lookup(object, &member)
            .filter(|v| !v.is_null())
            .ok_or_else(|| DecodeError::MissingDiscriminator {
                owner: field.owner().to_string(),
                member: member.to_string(),
            })?;

        let child = self
            .naming
            .enum_from_wire(field.enum_type(), wire)
            .and_then(|tag| split.child(tag).map(|child| (tag, child)));
        match child {
            Some((tag, child)) => {
                tracing::trace!(
                    discriminator = %field,
                    tag = field.enum_type().member(tag).unwrap_or_default(),
                    "descend"
                );
                Ok(child)
            }
            None => Err(DecodeError::UnknownVariant {
                owner: field.owner().to_string(),
                enum_name: field.enum_type().name().to_string(),
                value: wire.clone(),
            }),
        }
    }

    fn read_leaf(&self, object: &Map<String, Value>, leaf: &LeafNode) -> Result<Variant, DecodeError> {
        let mut fields = IndexMap::with_capacity(leaf.fields().len());
        for def in leaf.fields() {
            let member = self.naming.field_name(def.name());
            let value = match self.naming.lookup(object, &member) {
                Some(value) if def.accepts(value) => value.clone(),
                Some(value) => {
                    return Err(DecodeError::TypeMismatch {
                        member: member.into_owned(),
                        expected: def.kind().name(),
                        found: json_kind(value),
                    })
                }
                None => def.default_value(),
            };
            fields.insert(def.name().to_string(), value);
        }
        Ok(Variant::from_parts(leaf, fields))
    }
}
