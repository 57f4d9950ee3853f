//! Error types.
//!
//! [`ConfigurationError`] is only produced while building a tree.
//! [`DecodeError`] and [`EncodeError`] are produced per call.

use serde_json::Value;
use thiserror::Error;

/// A family declaration that cannot be frozen into a tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("family `{family}` has no root discriminator")]
    MissingRootDiscriminator { family: String },

    #[error("family `{family}` has no variants under `{path}`")]
    EmptyFamily { family: String, path: String },

    #[error("family `{family}`: tag `{path}` is registered more than once")]
    DuplicateTag { family: String, path: String },

    #[error("family `{family}`: variant `{variant}` stops at `{path}`, which splits further on `{field}`")]
    IncompleteVariant {
        family: String,
        variant: String,
        path: String,
        field: String,
    },

    #[error("family `{family}`: discriminator `{field}` appears more than once on `{path}`")]
    CyclicHierarchy {
        family: String,
        field: String,
        path: String,
    },

    #[error("family `{family}`: `{path}` splits on `{expected}`, not `{found}`")]
    DiscriminatorMismatch {
        family: String,
        path: String,
        expected: String,
        found: String,
    },

    #[error("family `{family}`: `{tag}` is not a member of enum `{enum_name}`")]
    InvalidTag {
        family: String,
        enum_name: String,
        tag: String,
    },

    #[error("family `{family}`: variant `{variant}` is registered more than once")]
    DuplicateVariant { family: String, variant: String },

    #[error("family `{family}`: field `{field}` of `{variant}` collides with a discriminator")]
    DiscriminatorFieldCollision {
        family: String,
        variant: String,
        field: String,
    },

    #[error("family `{family}`: fields of `{variant}` share the wire name of `{field}`")]
    DuplicateField {
        family: String,
        variant: String,
        field: String,
    },

    #[error("family `{family}`: default of `{variant}.{field}` is not a {expected}")]
    InvalidDefault {
        family: String,
        variant: String,
        field: String,
        expected: &'static str,
    },

    #[error("family `{family}`: enum `{enum_name}` member `{member}` is indistinguishable from an earlier one")]
    AmbiguousEnum {
        family: String,
        enum_name: String,
        member: String,
    },
}

/// Failure to resolve or read one JSON value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("missing discriminator `{member}` of `{owner}`")]
    MissingDiscriminator { owner: String, member: String },

    #[error("{value} is not a registered `{enum_name}` tag of `{owner}`")]
    UnknownVariant {
        owner: String,
        enum_name: String,
        value: Value,
    },

    #[error("`{member}`: expected {expected}, found {found}")]
    TypeMismatch {
        member: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("malformed JSON: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl DecodeError {
    /// The innermost error, looking through array element wrappers.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            Self::Element { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Failure to write one instance.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("`{type_name}` is not a variant of family `{family}`")]
    UnregisteredVariant { family: String, type_name: String },

    #[error("`{type_name}.{member}`: expected {expected}, found {found}")]
    TypeMismatch {
        type_name: String,
        member: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("failed to write JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// JSON kind name used in [`DecodeError::TypeMismatch`].
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
