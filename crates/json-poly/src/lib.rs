//! json-poly — discriminated-union JSON for multi-level type families.
//!
//! A family (say `Animal`) splits on a discriminator member (`type`) into
//! children, some of which split again on their own discriminator
//! (`Mammal` on `species`) before reaching concrete variants (`Dog`).
//!
//! - [`TreeBuilder`] validates the declarations and freezes a
//!   [`DiscriminatorTree`].
//! - [`Decoder`] reads discriminators from a parsed object, walks the tree to
//!   a leaf and reads the leaf's declared fields.
//! - [`Encoder`] writes the discriminators implied by a variant's place in
//!   the tree, followed by its declared fields.
//! - [`NamingAdapter`] maps declared names and enum values to their wire
//!   form, so both directions agree under any [`CodecOptions`].
//!
//! ```
//! use std::sync::Arc;
//! use json_poly::{DiscriminatorField, EnumType, FieldDef, NamingAdapter, PolyCodec, TreeBuilder};
//! use serde_json::json;
//!
//! let kinds = Arc::new(EnumType::new("AnimalType", ["Insect", "Mammal"]));
//! let species = Arc::new(EnumType::new("MammalSpecies", ["Dog", "Cat"]));
//! let kind = DiscriminatorField::new("Animal", "type", kinds);
//! let species = DiscriminatorField::new("Mammal", "species", species);
//!
//! let tree = TreeBuilder::new("Animal")
//!     .register_family(kind.clone())
//!     .register_variant([kind.tag("Insect")], "Insect", [FieldDef::int("NumLegs").default_to(6)])
//!     .register_variant(
//!         [kind.tag("Mammal"), species.tag("Dog")],
//!         "Dog",
//!         [FieldDef::int("NumNipples").default_to(8)],
//!     )
//!     .build()
//!     .unwrap();
//!
//! let codec = PolyCodec::new(&tree, NamingAdapter::default());
//! let dog = codec.decode(&json!({"species": 0, "type": 1})).unwrap();
//! assert_eq!(dog.type_name(), "Dog");
//! assert_eq!(dog.get_i64("NumNipples").unwrap(), 8);
//! assert_eq!(
//!     codec.encode(&dog).unwrap(),
//!     json!({"type": 1, "species": 0, "NumNipples": 8})
//! );
//! ```

pub mod codec;
pub mod enum_type;
pub mod error;
pub mod family;
pub mod naming;
pub mod tree;
pub mod variant;

pub use codec::{Decoder, Encoder, PolyCodec};
pub use enum_type::EnumType;
pub use error::{ConfigurationError, DecodeError, EncodeError};
pub use family::{FamilyTree, Polymorphic};
pub use naming::{CodecOptions, EnumRepr, NamingAdapter, NamingPolicy};
pub use tree::{
    DiscriminatorField, DiscriminatorTree, FieldDef, FieldKind, LeafNode, PathStep, PathTag,
    SplitNode, TreeBuilder, TreeNode,
};
pub use variant::{Tag, Variant};
