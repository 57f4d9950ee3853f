//! Decoding and encoding against a [`DiscriminatorTree`].

pub mod decoder;
pub mod encoder;

pub use decoder::Decoder;
pub use encoder::Encoder;

use serde_json::Value;

use crate::error::{DecodeError, EncodeError};
use crate::naming::{CodecOptions, NamingAdapter};
use crate::tree::DiscriminatorTree;
use crate::variant::Variant;

/// A tree bound to one naming configuration.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct PolyCodec<'t> {
    tree: &'t DiscriminatorTree,
    naming: NamingAdapter,
}

impl<'t> PolyCodec<'t> {
    pub fn new(tree: &'t DiscriminatorTree, naming: NamingAdapter) -> Self {
        Self { tree, naming }
    }

    pub fn with_options(tree: &'t DiscriminatorTree, options: CodecOptions) -> Self {
        Self::new(tree, NamingAdapter::from_options(options))
    }

    pub fn tree(&self) -> &'t DiscriminatorTree {
        self.tree
    }

    pub fn naming(&self) -> &NamingAdapter {
        &self.naming
    }

    pub fn decode(&self, value: &Value) -> Result<Variant, DecodeError> {
        Decoder::new(&self.naming).decode(value, self.tree)
    }

    /// Element failures arrive wrapped in [`DecodeError::Element`]; see
    /// [`Decoder::decode_array`].
    pub fn decode_array(&self, value: &Value) -> Result<Vec<Variant>, DecodeError> {
        Decoder::new(&self.naming).decode_array(value, self.tree)
    }

    pub fn decode_str(&self, text: &str) -> Result<Variant, DecodeError> {
        Decoder::new(&self.naming).decode_str(text, self.tree)
    }

    pub fn decode_array_str(&self, text: &str) -> Result<Vec<Variant>, DecodeError> {
        Decoder::new(&self.naming).decode_array_str(text, self.tree)
    }

    pub fn encode(&self, instance: &Variant) -> Result<Value, EncodeError> {
        Encoder::new(&self.naming).encode(instance, self.tree)
    }

    pub fn encode_array(&self, instances: &[Variant]) -> Result<Value, EncodeError> {
        Encoder::new(&self.naming).encode_array(instances, self.tree)
    }

    pub fn encode_to_string(&self, instance: &Variant) -> Result<String, EncodeError> {
        Encoder::new(&self.naming).encode_to_string(instance, self.tree)
    }

    pub fn encode_array_to_string(&self, instances: &[Variant]) -> Result<String, EncodeError> {
        Encoder::new(&self.naming).encode_array_to_string(instances, self.tree)
    }
}
