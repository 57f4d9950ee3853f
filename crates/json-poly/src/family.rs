//! Typed families.
//!
//! A Rust type implements [`Polymorphic`] to declare its family once and to
//! convert between itself and [`Variant`]. The tree is built on first use
//! and cached in a [`FamilyTree`]; concurrent first uses build it once.
//!
//! ```ignore
//! static FAMILY: FamilyTree = FamilyTree::new();
//!
//! impl Polymorphic for Animal {
//!     fn declare() -> Result<DiscriminatorTree, ConfigurationError> { /* TreeBuilder */ }
//!     fn tree_cell() -> &'static FamilyTree { &FAMILY }
//!     fn to_variant(&self) -> Variant { /* ... */ }
//!     fn from_variant(variant: &Variant) -> Result<Self, DecodeError> { /* ... */ }
//! }
//!
//! // At startup, to surface declaration errors early:
//! Animal::try_family()?;
//! ```

use std::sync::OnceLock;

use serde_json::Value;

use crate::codec::{Decoder, Encoder};
use crate::error::{ConfigurationError, DecodeError, EncodeError};
use crate::naming::NamingAdapter;
use crate::tree::DiscriminatorTree;
use crate::variant::Variant;

/// Build-once storage for a family's tree.
#[derive(Debug, Default)]
pub struct FamilyTree {
    cell: OnceLock<Result<DiscriminatorTree, ConfigurationError>>,
}

impl FamilyTree {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Returns the cached tree, running `declare` if this is the first call.
    /// A failed declaration is cached too and returned on every call.
    pub fn get_or_build<F>(&self, declare: F) -> Result<&DiscriminatorTree, ConfigurationError>
    where
        F: FnOnce() -> Result<DiscriminatorTree, ConfigurationError>,
    {
        self.cell.get_or_init(declare).as_ref().map_err(Clone::clone)
    }

    pub fn get(&self) -> Option<&DiscriminatorTree> {
        self.cell.get().and_then(|built| built.as_ref().ok())
    }
}

pub trait Polymorphic: Sized {
    /// Declares the family tree. Called at most once per process.
    fn declare() -> Result<DiscriminatorTree, ConfigurationError>;

    fn tree_cell() -> &'static FamilyTree;

    fn to_variant(&self) -> Variant;

    fn from_variant(variant: &Variant) -> Result<Self, DecodeError>;

    fn try_family() -> Result<&'static DiscriminatorTree, ConfigurationError> {
        Self::tree_cell().get_or_build(Self::declare)
    }

    /// # Panics
    ///
    /// Panics if the declaration is invalid. Call [`Polymorphic::try_family`]
    /// during initialization to handle that case as an error instead.
    fn family() -> &'static DiscriminatorTree {
        match Self::try_family() {
            Ok(tree) => tree,
            Err(err) => panic!("invalid polymorphic family declaration: {err}"),
        }
    }
}

/// Encodes one value of a typed family.
///
/// This and the other typed helpers report an invalid declaration as
/// `Configuration` instead of panicking.
pub fn to_value<T: Polymorphic>(value: &T, naming: &NamingAdapter) -> Result<Value, EncodeError> {
    Encoder::new(naming).encode(&value.to_variant(), T::try_family()?)
}

pub fn to_value_array<T: Polymorphic>(
    values: &[T],
    naming: &NamingAdapter,
) -> Result<Value, EncodeError> {
    let variants: Vec<Variant> = values.iter().map(T::to_variant).collect();
    Encoder::new(naming).encode_array(&variants, T::try_family()?)
}

pub fn to_string<T: Polymorphic>(value: &T, naming: &NamingAdapter) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(&to_value(value, naming)?)?)
}

pub fn to_string_array<T: Polymorphic>(
    values: &[T],
    naming: &NamingAdapter,
) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(&to_value_array(values, naming)?)?)
}

pub fn from_value<T: Polymorphic>(value: &Value, naming: &NamingAdapter) -> Result<T, DecodeError> {
    let variant = Decoder::new(naming).decode(value, T::try_family()?)?;
    T::from_variant(&variant)
}

pub fn from_value_array<T: Polymorphic>(
    value: &Value,
    naming: &NamingAdapter,
) -> Result<Vec<T>, DecodeError> {
    Decoder::new(naming)
        .decode_array(value, T::try_family()?)?
        .iter()
        .enumerate()
        .map(|(index, variant)| {
            T::from_variant(variant).map_err(|err| DecodeError::Element {
                index,
                source: Box::new(err),
            })
        })
        .collect()
}

pub fn from_str<T: Polymorphic>(text: &str, naming: &NamingAdapter) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    from_value(&value, naming)
}

pub fn from_str_array<T: Polymorphic>(
    text: &str,
    naming: &NamingAdapter,
) -> Result<Vec<T>, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    from_value_array(&value, naming)
}
