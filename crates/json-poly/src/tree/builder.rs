//! TreeBuilder — validates declared family metadata and freezes it into a
//! [`DiscriminatorTree`].
//!
//! Registration only records declarations. Every check runs in
//! [`TreeBuilder::build`], which consumes the builder, so a tree can never be
//! extended after it is frozen.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;

use super::{
    describe_path, DiscriminatorField, DiscriminatorTree, FieldDef, LeafNode, PathStep, SplitNode,
    TreeNode,
};
use crate::error::ConfigurationError;
use crate::naming::wire_key;

/// A declared path step: a discriminator field and the name of its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTag {
    field: DiscriminatorField,
    tag: String,
}

impl PathTag {
    pub fn new(field: DiscriminatorField, tag: impl Into<String>) -> Self {
        Self {
            field,
            tag: tag.into(),
        }
    }

    pub fn field(&self) -> &DiscriminatorField {
        &self.field
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

#[derive(Debug, Clone)]
struct SubFamilyDecl {
    path: Vec<PathTag>,
    field: DiscriminatorField,
}

#[derive(Debug, Clone)]
struct VariantDecl {
    path: Vec<PathTag>,
    type_name: String,
    fields: Vec<FieldDef>,
}

/// Collects the declarations of one family.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    family: String,
    root: Option<DiscriminatorField>,
    sub_families: Vec<SubFamilyDecl>,
    variants: Vec<VariantDecl>,
}

impl TreeBuilder {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            root: None,
            sub_families: Vec::new(),
            variants: Vec::new(),
        }
    }

    /// Declares the discriminator the family root splits on.
    pub fn register_family(mut self, root: DiscriminatorField) -> Self {
        self.root = Some(root);
        self
    }

    /// Declares that the node reached by `path` splits again on
    /// `discriminator`.
    ///
    /// Splits are also inferred from variant paths; declaring one explicitly
    /// additionally makes `build` reject a sub-family left without variants.
    pub fn register_sub_family<P>(mut self, path: P, discriminator: DiscriminatorField) -> Self
    where
        P: IntoIterator<Item = PathTag>,
    {
        self.sub_families.push(SubFamilyDecl {
            path: path.into_iter().collect(),
            field: discriminator,
        });
        self
    }

    /// Declares a concrete variant reached by `path`, outermost tag first.
    pub fn register_variant<P, F>(mut self, path: P, type_name: impl Into<String>, fields: F) -> Self
    where
        P: IntoIterator<Item = PathTag>,
        F: IntoIterator<Item = FieldDef>,
    {
        self.variants.push(VariantDecl {
            path: path.into_iter().collect(),
            type_name: type_name.into(),
            fields: fields.into_iter().collect(),
        });
        self
    }

    pub fn build(self) -> Result<DiscriminatorTree, ConfigurationError> {
        let TreeBuilder {
            family,
            root,
            sub_families,
            variants,
        } = self;

        let root_field = root.ok_or_else(|| ConfigurationError::MissingRootDiscriminator {
            family: family.clone(),
        })?;
        ensure_distinct_members(&family, &root_field)?;
        if variants.is_empty() {
            return Err(ConfigurationError::EmptyFamily {
                family,
                path: describe_path(&[]),
            });
        }

        let mut root = SplitDraft::new(root_field);

        for decl in &sub_families {
            ensure_distinct_members(&family, &decl.field)?;
            let steps = resolve_path(&family, &decl.path)?;
            if steps.is_empty() {
                // Re-declaring the root split is harmless.
                root.expect_same(&family, &steps, &decl.field)?;
                continue;
            }
            ensure_acyclic(&family, &steps)?;
            if steps.iter().any(|s| s.field().same_as(&decl.field)) {
                return Err(ConfigurationError::CyclicHierarchy {
                    family,
                    field: decl.field.to_string(),
                    path: describe_path(&steps),
                });
            }
            insert_split(&family, &mut root, &steps, &decl.field)?;
        }

        let mut leaves: IndexMap<String, Arc<LeafNode>> = IndexMap::with_capacity(variants.len());
        for decl in variants {
            if leaves.contains_key(&decl.type_name) {
                return Err(ConfigurationError::DuplicateVariant {
                    family,
                    variant: decl.type_name,
                });
            }
            let steps = resolve_path(&family, &decl.path)?;
            if steps.is_empty() {
                return Err(ConfigurationError::IncompleteVariant {
                    family,
                    variant: decl.type_name,
                    path: describe_path(&steps),
                    field: root.field.field().to_string(),
                });
            }
            ensure_acyclic(&family, &steps)?;
            check_fields(&family, &decl.type_name, &steps, &decl.fields)?;

            let leaf = Arc::new(LeafNode::new(decl.type_name, steps, decl.fields));
            insert_leaf(&family, &mut root, &leaf)?;
            leaves.insert(leaf.type_name().to_string(), leaf);
        }

        let root = freeze(&family, root, &mut Vec::new())?;
        let tree = DiscriminatorTree::new(family, TreeNode::Split(root), leaves);
        tracing::debug!(
            family = %tree.family(),
            leaves = tree.leaves().count(),
            depth = tree.depth(),
            "built discriminator tree"
        );
        Ok(tree)
    }
}

#[derive(Debug)]
enum Draft {
    Split(SplitDraft),
    Leaf(Arc<LeafNode>),
}

#[derive(Debug)]
struct SplitDraft {
    field: DiscriminatorField,
    children: BTreeMap<usize, Draft>,
}

impl SplitDraft {
    fn new(field: DiscriminatorField) -> Self {
        Self {
            field,
            children: BTreeMap::new(),
        }
    }

    fn expect_same(
        &self,
        family: &str,
        prefix: &[PathStep],
        found: &DiscriminatorField,
    ) -> Result<(), ConfigurationError> {
        if self.field.same_as(found) {
            return Ok(());
        }
        Err(ConfigurationError::DiscriminatorMismatch {
            family: family.to_string(),
            path: describe_path(prefix),
            expected: self.field.to_string(),
            found: found.to_string(),
        })
    }
}

fn resolve_path(family: &str, path: &[PathTag]) -> Result<Vec<PathStep>, ConfigurationError> {
    path.iter()
        .map(|step| {
            ensure_distinct_members(family, &step.field)?;
            let enum_type = step.field.enum_type();
            let ordinal = enum_type.ordinal_of(&step.tag).ok_or_else(|| {
                ConfigurationError::InvalidTag {
                    family: family.to_string(),
                    enum_name: enum_type.name().to_string(),
                    tag: step.tag.clone(),
                }
            })?;
            Ok(PathStep::new(step.field.clone(), ordinal))
        })
        .collect()
}

/// Rejects enums whose members cannot be told apart once names are cased
/// by a naming policy or compared ignoring case.
fn ensure_distinct_members(
    family: &str,
    field: &DiscriminatorField,
) -> Result<(), ConfigurationError> {
    let enum_type = field.enum_type();
    let mut seen = HashSet::new();
    match enum_type.members().iter().find(|member| !seen.insert(wire_key(member))) {
        Some(member) => Err(ConfigurationError::AmbiguousEnum {
            family: family.to_string(),
            enum_name: enum_type.name().to_string(),
            member: member.clone(),
        }),
        None => Ok(()),
    }
}

/// Every member a leaf writes must keep its own wire name under any naming
/// policy, and every default must be readable back as its field.
fn check_fields(
    family: &str,
    variant: &str,
    steps: &[PathStep],
    fields: &[FieldDef],
) -> Result<(), ConfigurationError> {
    let collision = |field: &str| ConfigurationError::DiscriminatorFieldCollision {
        family: family.to_string(),
        variant: variant.to_string(),
        field: field.to_string(),
    };

    let mut discriminators = HashSet::new();
    for step in steps {
        if !discriminators.insert(wire_key(step.field().field())) {
            return Err(collision(step.field().field()));
        }
    }

    let mut own = HashSet::new();
    for def in fields {
        let key = wire_key(def.name());
        if discriminators.contains(&key) {
            return Err(collision(def.name()));
        }
        if !own.insert(key) {
            return Err(ConfigurationError::DuplicateField {
                family: family.to_string(),
                variant: variant.to_string(),
                field: def.name().to_string(),
            });
        }
        if !def.accepts(&def.default_value()) {
            return Err(ConfigurationError::InvalidDefault {
                family: family.to_string(),
                variant: variant.to_string(),
                field: def.name().to_string(),
                expected: def.kind().name(),
            });
        }
    }
    Ok(())
}

fn ensure_acyclic(family: &str, steps: &[PathStep]) -> Result<(), ConfigurationError> {
    for (i, step) in steps.iter().enumerate() {
        if steps[..i].iter().any(|prev| prev.field().same_as(step.field())) {
            return Err(ConfigurationError::CyclicHierarchy {
                family: family.to_string(),
                field: step.field().to_string(),
                path: describe_path(&steps[..=i]),
            });
        }
    }
    Ok(())
}

/// Walks to the split that owns the last step of `steps`, creating inferred
/// intermediate splits. `steps` must not be empty.
fn parent_of<'d>(
    family: &str,
    root: &'d mut SplitDraft,
    steps: &[PathStep],
) -> Result<&'d mut SplitDraft, ConfigurationError> {
    let mut split = root;
    for (depth, pair) in steps.windows(2).enumerate() {
        let (step, next) = (&pair[0], &pair[1]);
        split.expect_same(family, &steps[..depth], step.field())?;
        let child = split
            .children
            .entry(step.tag())
            .or_insert_with(|| Draft::Split(SplitDraft::new(next.field().clone())));
        split = match child {
            Draft::Split(inner) => inner,
            Draft::Leaf(leaf) => {
                return Err(ConfigurationError::IncompleteVariant {
                    family: family.to_string(),
                    variant: leaf.type_name().to_string(),
                    path: describe_path(&steps[..=depth]),
                    field: next.field().field().to_string(),
                })
            }
        };
    }
    let last = steps.len() - 1;
    split.expect_same(family, &steps[..last], steps[last].field())?;
    Ok(split)
}

fn insert_leaf(
    family: &str,
    root: &mut SplitDraft,
    leaf: &Arc<LeafNode>,
) -> Result<(), ConfigurationError> {
    let steps = leaf.path();
    let parent = parent_of(family, root, steps)?;
    let tag = steps[steps.len() - 1].tag();
    match parent.children.entry(tag) {
        Entry::Vacant(slot) => {
            slot.insert(Draft::Leaf(Arc::clone(leaf)));
            Ok(())
        }
        Entry::Occupied(slot) => match slot.get() {
            Draft::Leaf(_) => Err(ConfigurationError::DuplicateTag {
                family: family.to_string(),
                path: describe_path(steps),
            }),
            Draft::Split(split) => Err(ConfigurationError::IncompleteVariant {
                family: family.to_string(),
                variant: leaf.type_name().to_string(),
                path: describe_path(steps),
                field: split.field.field().to_string(),
            }),
        },
    }
}

fn insert_split(
    family: &str,
    root: &mut SplitDraft,
    steps: &[PathStep],
    field: &DiscriminatorField,
) -> Result<(), ConfigurationError> {
    let parent = parent_of(family, root, steps)?;
    let tag = steps[steps.len() - 1].tag();
    match parent.children.entry(tag) {
        Entry::Vacant(slot) => {
            slot.insert(Draft::Split(SplitDraft::new(field.clone())));
            Ok(())
        }
        Entry::Occupied(slot) => match slot.get() {
            Draft::Split(existing) => existing.expect_same(family, steps, field),
            Draft::Leaf(leaf) => Err(ConfigurationError::IncompleteVariant {
                family: family.to_string(),
                variant: leaf.type_name().to_string(),
                path: describe_path(steps),
                field: field.field().to_string(),
            }),
        },
    }
}

fn freeze(
    family: &str,
    split: SplitDraft,
    path: &mut Vec<PathStep>,
) -> Result<SplitNode, ConfigurationError> {
    if split.children.is_empty() {
        return Err(ConfigurationError::EmptyFamily {
            family: family.to_string(),
            path: describe_path(path),
        });
    }
    let mut children = BTreeMap::new();
    for (tag, child) in split.children {
        let node = match child {
            Draft::Leaf(leaf) => TreeNode::Leaf(leaf),
            Draft::Split(inner) => {
                path.push(PathStep::new(split.field.clone(), tag));
                let frozen = freeze(family, inner, path);
                path.pop();
                TreeNode::Split(frozen?)
            }
        };
        children.insert(tag, node);
    }
    Ok(SplitNode {
        field: split.field,
        children,
    })
}
