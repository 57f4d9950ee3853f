//! Encoding: discriminators come from the tree, fields from the instance.

use serde_json::{Map, Value};

use crate::error::{json_kind, EncodeError};
use crate::naming::NamingAdapter;
use crate::tree::DiscriminatorTree;
use crate::variant::Variant;

#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    naming: &'a NamingAdapter,
}

impl<'a> Encoder<'a> {
    pub fn new(naming: &'a NamingAdapter) -> Self {
        Self { naming }
    }

    /// Writes the discriminators of the instance's path (outermost first),
    /// then its declared fields in declaration order.
    ///
    /// Declared fields missing from the instance are written with their
    /// default; undeclared instance fields are not written. A value the
    /// decoder would reject for its field fails with
    /// [`EncodeError::TypeMismatch`].
    pub fn encode(&self, instance: &Variant, tree: &DiscriminatorTree) -> Result<Value, EncodeError> {
        let leaf = tree
            .leaf(instance.type_name())
            .ok_or_else(|| EncodeError::UnregisteredVariant {
                family: tree.family().to_string(),
                type_name: instance.type_name().to_string(),
            })?;

        let mut object = Map::new();
        for step in leaf.path() {
            let field = step.field();
            object.insert(
                self.naming.field_name(field.field()).into_owned(),
                self.naming.enum_to_wire(field.enum_type(), step.tag()),
            );
        }
        for def in leaf.fields() {
            let value = match instance.get(def.name()) {
                Some(value) if !def.accepts(value) => {
                    return Err(EncodeError::TypeMismatch {
                        type_name: leaf.type_name().to_string(),
                        member: def.name().to_string(),
                        expected: def.kind().name(),
                        found: json_kind(value),
                    });
                }
                Some(value) => value.clone(),
                None => def.default_value(),
            };
            object.insert(self.naming.field_name(def.name()).into_owned(), value);
        }
        Ok(Value::Object(object))
    }

    pub fn encode_array(
        &self,
        instances: &[Variant],
        tree: &DiscriminatorTree,
    ) -> Result<Value, EncodeError> {
        instances
            .iter()
            .map(|instance| self.encode(instance, tree))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    pub fn encode_to_string(
        &self,
        instance: &Variant,
        tree: &DiscriminatorTree,
    ) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(&self.encode(instance, tree)?)?)
    }

    pub fn encode_array_to_string(
        &self,
        instances: &[Variant],
        tree: &DiscriminatorTree,
    ) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(&self.encode_array(instances, tree)?)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::enum_type::EnumType;
    use crate::naming::{EnumRepr, NamingPolicy};
    use crate::tree::{DiscriminatorField, FieldDef, TreeBuilder};

    fn tree() -> DiscriminatorTree {
        let kind = DiscriminatorField::new(
            "Shape",
            "Kind",
            Arc::new(EnumType::new("ShapeKind", ["Circle", "Square"])),
        );
        TreeBuilder::new("Shape")
            .register_family(kind.clone())
            .register_variant(
                [kind.tag("Square")],
                "Square",
                [FieldDef::num("SideLength"), FieldDef::str("Label").default_to("sq")],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn writes_discriminator_first_then_declared_order() {
        let naming = NamingAdapter::new(NamingPolicy::CamelCase, EnumRepr::Name);
        let instance = Variant::new("Square").with("Label", "a").with("SideLength", 2.0);
        let text = Encoder::new(&naming).encode_to_string(&instance, &tree()).unwrap();
        assert_eq!(text, r#"{"kind":"square","sideLength":2.0,"label":"a"}"#);
    }

    #[test]
    fn ignores_instance_tags_and_undeclared_fields() {
        let naming = NamingAdapter::default();
        let instance = Variant::new("Square").with("Kind", 0).with("Extra", true);
        let text = Encoder::new(&naming).encode_to_string(&instance, &tree()).unwrap();
        assert_eq!(text, r#"{"Kind":1,"SideLength":0.0,"Label":"sq"}"#);
    }

    #[test]
    fn unregistered_variant_fails() {
        let naming = NamingAdapter::default();
        let err = Encoder::new(&naming)
            .encode(&Variant::new("Circle"), &tree())
            .unwrap_err();
        assert!(matches!(err, EncodeError::UnregisteredVariant { ref type_name, .. } if type_name == "Circle"));
    }

    #[test]
    fn rejects_values_the_decoder_would_not_read() {
        let naming = NamingAdapter::default();
        let instance = Variant::new("Square").with("SideLength", "two");
        let err = Encoder::new(&naming).encode(&instance, &tree()).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::TypeMismatch { ref type_name, ref member, expected: "number", found: "string" }
                if type_name == "Square" && member == "SideLength"
        ));

        let instance = Variant::new("Square").with("Label", Value::Null);
        assert!(matches!(
            Encoder::new(&naming).encode(&instance, &tree()),
            Err(EncodeError::TypeMismatch { found: "null", .. })
        ));
    }
}
