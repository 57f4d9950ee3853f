//! Discriminator tree model.
//!
//! A family is a tree whose internal nodes ([`SplitNode`]) select a child by
//! the value of one discriminator field, and whose leaves ([`LeafNode`]) are
//! the concrete variants. Trees are produced by [`TreeBuilder`] and are
//! immutable afterwards.

pub mod builder;

pub use builder::{PathTag, TreeBuilder};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::enum_type::EnumType;
use crate::variant::Variant;

/// The member of an object that selects among the children of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscriminatorField {
    owner: String,
    field: String,
    enum_type: Arc<EnumType>,
}

impl DiscriminatorField {
    pub fn new(owner: impl Into<String>, field: impl Into<String>, enum_type: Arc<EnumType>) -> Self {
        Self {
            owner: owner.into(),
            field: field.into(),
            enum_type,
        }
    }

    /// The type declaring this discriminator (`Animal`, `Mammal`).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The declared member name (`type`, `species`).
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.enum_type
    }

    /// Identity ignores the enum: one owner cannot declare a member twice.
    pub fn same_as(&self, other: &DiscriminatorField) -> bool {
        self.owner == other.owner && self.field == other.field
    }

    /// A path step selecting `member` of this field's enum.
    pub fn tag(&self, member: impl Into<String>) -> PathTag {
        PathTag::new(self.clone(), member)
    }
}

impl fmt::Display for DiscriminatorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.field)
    }
}

/// JSON shape of an own field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Integer,
    Number,
    String,
    Array,
    Object,
    /// Any JSON value, passed through unchanged.
    Any,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Self::Number, Value::Number(_)) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Array, Value::Array(_)) => true,
            (Self::Object, Value::Object(_)) => true,
            _ => false,
        }
    }

    /// Value used for an absent field that declares no default.
    pub fn zero_value(self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Integer => Value::from(0),
            Self::Number => Value::from(0.0),
            Self::String => Value::String(String::new()),
            Self::Array => Value::Array(Vec::new()),
            Self::Object => Value::Object(Map::new()),
            Self::Any => Value::Null,
        }
    }
}

/// An own (non-discriminator) field of a leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    name: String,
    kind: FieldKind,
    default: Option<Value>,
    nullable: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            nullable: false,
        }
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn num(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn str(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Any)
    }

    pub fn default_to(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The declared default, else null for nullable fields, else the kind's zero.
    pub fn default_value(&self) -> Value {
        match &self.default {
            Some(value) => value.clone(),
            None if self.nullable => Value::Null,
            None => self.kind.zero_value(),
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        (self.nullable && value.is_null()) || self.kind.accepts(value)
    }
}

/// One `(discriminator, tag)` step on a leaf's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    field: DiscriminatorField,
    tag: usize,
}

impl PathStep {
    pub(crate) fn new(field: DiscriminatorField, tag: usize) -> Self {
        Self { field, tag }
    }

    pub fn field(&self) -> &DiscriminatorField {
        &self.field
    }

    /// Ordinal of the tag within the field's enum.
    pub fn tag(&self) -> usize {
        self.tag
    }

    pub fn tag_name(&self) -> &str {
        self.field.enum_type().member(self.tag).unwrap_or_default()
    }
}

pub(crate) fn describe_path(steps: &[PathStep]) -> String {
    if steps.is_empty() {
        return "<root>".to_string();
    }
    steps
        .iter()
        .map(|step| format!("{}={}", step.field.field(), step.tag_name()))
        .collect::<Vec<_>>()
        .join("/")
}

/// A concrete variant.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    type_name: String,
    path: Vec<PathStep>,
    fields: Vec<FieldDef>,
}

impl LeafNode {
    pub(crate) fn new(type_name: String, path: Vec<PathStep>, fields: Vec<FieldDef>) -> Self {
        Self {
            type_name,
            path,
            fields,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Steps from the family root, outermost first.
    pub fn path(&self) -> &[PathStep] {
        &self.path
    }

    /// Own fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An internal node: children keyed by tag ordinal.
#[derive(Debug, Clone)]
pub struct SplitNode {
    field: DiscriminatorField,
    children: BTreeMap<usize, TreeNode>,
}

impl SplitNode {
    pub fn field(&self) -> &DiscriminatorField {
        &self.field
    }

    pub fn child(&self, tag: usize) -> Option<&TreeNode> {
        self.children.get(&tag)
    }

    pub fn children(&self) -> impl Iterator<Item = (usize, &TreeNode)> {
        self.children.iter().map(|(tag, node)| (*tag, node))
    }
}

#[derive(Debug, Clone)]
pub enum TreeNode {
    Split(SplitNode),
    Leaf(Arc<LeafNode>),
}

impl TreeNode {
    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Self::Leaf(leaf) => Some(leaf.as_ref()),
            Self::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match self {
            Self::Split(split) => Some(split),
            Self::Leaf(_) => None,
        }
    }
}

/// The frozen tree of one family.
#[derive(Debug, Clone)]
pub struct DiscriminatorTree {
    family: String,
    root: TreeNode,
    leaves: IndexMap<String, Arc<LeafNode>>,
    depth: usize,
}

impl DiscriminatorTree {
    pub(crate) fn new(
        family: String,
        root: TreeNode,
        leaves: IndexMap<String, Arc<LeafNode>>,
    ) -> Self {
        let depth = leaves.values().map(|l| l.path.len()).max().unwrap_or(0);
        Self {
            family,
            root,
            leaves,
            depth,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Number of discriminator levels of the deepest leaf.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn leaf(&self, type_name: &str) -> Option<&LeafNode> {
        self.leaves.get(type_name).map(Arc::as_ref)
    }

    /// Leaves in registration order.
    pub fn leaves(&self) -> impl Iterator<Item = &LeafNode> {
        self.leaves.values().map(Arc::as_ref)
    }

    /// A fresh instance of `type_name` with every field at its default.
    pub fn instance(&self, type_name: &str) -> Option<Variant> {
        self.leaf(type_name).map(Variant::with_defaults)
    }
}
