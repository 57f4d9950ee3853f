//! Enum types backing discriminator fields.

/// An integer-backed enum: a name plus its members in declaration order.
///
/// A member's ordinal is its index in `members`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    name: String,
    members: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member name for an ordinal, if in range.
    pub fn member(&self, ordinal: usize) -> Option<&str> {
        self.members.get(ordinal).map(String::as_str)
    }

    /// Ordinal of a member by its exact declared name.
    pub fn ordinal_of(&self, member: &str) -> Option<usize> {
        self.members.iter().position(|m| m == member)
    }
}
