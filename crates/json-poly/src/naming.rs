//! Wire naming: member-name casing and enum representation.
//!
//! Everything here is a pure function of a [`CodecOptions`] value. The
//! decoder and encoder route every member name and every discriminator value
//! through a [`NamingAdapter`], so both sides agree as long as they share the
//! same options.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enum_type::EnumType;

/// Casing transform applied to declared member names (and to enum member
/// names under [`EnumRepr::Name`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// Names are written as declared.
    #[default]
    Identity,
    /// `NumLegs` → `numLegs`, `URLPath` → `urlPath`.
    CamelCase,
    /// `NumLegs` → `num_legs`.
    SnakeCase,
    /// `NumLegs` → `num-legs`.
    KebabCase,
}

impl NamingPolicy {
    pub fn apply<'a>(self, name: &'a str) -> Cow<'a, str> {
        match self {
            Self::Identity => Cow::Borrowed(name),
            Self::CamelCase => camel_case(name),
            Self::SnakeCase => Cow::Owned(separated(name, '_')),
            Self::KebabCase => Cow::Owned(separated(name, '-')),
        }
    }
}

/// How discriminator enum values appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumRepr {
    /// JSON integer holding the member ordinal.
    #[default]
    Ordinal,
    /// JSON string holding the member name, cased by the [`NamingPolicy`].
    Name,
}

/// Session configuration for a codec.
///
/// Deserializable so it can live in a config file:
///
/// ```json
/// { "naming": "camel_case", "enum_repr": "name", "case_insensitive": false }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecOptions {
    pub naming: NamingPolicy,
    pub enum_repr: EnumRepr,
    /// Match member names ignoring ASCII case when decoding.
    pub case_insensitive: bool,
}

impl CodecOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Stateless name/value translation at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamingAdapter {
    options: CodecOptions,
}

impl NamingAdapter {
    pub fn new(naming: NamingPolicy, enum_repr: EnumRepr) -> Self {
        Self {
            options: CodecOptions {
                naming,
                enum_repr,
                case_insensitive: false,
            },
        }
    }

    pub fn from_options(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.options.case_insensitive = enabled;
        self
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Wire name for a declared field name.
    pub fn field_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        self.options.naming.apply(name)
    }

    /// Wire value for the enum member at `ordinal`.
    pub fn enum_to_wire(&self, enum_type: &EnumType, ordinal: usize) -> Value {
        match (self.options.enum_repr, enum_type.member(ordinal)) {
            (EnumRepr::Name, Some(member)) => {
                Value::String(self.options.naming.apply(member).into_owned())
            }
            _ => Value::from(ordinal as u64),
        }
    }

    /// Ordinal of the enum member a wire value denotes, if any.
    ///
    /// Under [`EnumRepr::Name`] strings are compared case-normalized against
    /// both the cased and the declared member name, and integer ordinals are
    /// accepted as well.
    pub fn enum_from_wire(&self, enum_type: &EnumType, wire: &Value) -> Option<usize> {
        let ordinal = match (self.options.enum_repr, wire) {
            (_, Value::Number(n)) => usize::try_from(n.as_u64()?).ok()?,
            (EnumRepr::Name, Value::String(s)) => {
                enum_type.members().iter().position(|member| {
                    member.eq_ignore_ascii_case(s)
                        || self.options.naming.apply(member).eq_ignore_ascii_case(s)
                })?
            }
            _ => return None,
        };
        (ordinal < enum_type.len()).then_some(ordinal)
    }

    /// Looks up a member by wire name, honoring `case_insensitive`.
    pub fn lookup<'v>(&self, object: &'v Map<String, Value>, wire_name: &str) -> Option<&'v Value> {
        if let Some(value) = object.get(wire_name) {
            return Some(value);
        }
        if !self.options.case_insensitive {
            return None;
        }
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(wire_name))
            .map(|(_, value)| value)
    }
}

impl From<CodecOptions> for NamingAdapter {
    fn from(options: CodecOptions) -> Self {
        Self::from_options(options)
    }
}

/// Spelling-independent form of a name: separators dropped, lowercased.
///
/// Every [`NamingPolicy`] preserves this key, and case-insensitive lookup
/// ignores what it drops, so names with distinct keys never meet on the wire.
pub(crate) fn wire_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lower camel case: lowercases the leading run of capitals, keeping the
/// last capital of an acronym when it starts the next word.
fn camel_case(name: &str) -> Cow<'_, str> {
    let chars: Vec<char> = name.chars().collect();
    if !chars.first().is_some_and(|c| c.is_uppercase()) {
        return Cow::Borrowed(name);
    }

    let mut lowered = 0;
    for i in 0..chars.len() {
        if i > 0 && !chars[i].is_uppercase() {
            break;
        }
        if i > 0 && chars.get(i + 1).is_some_and(|next| !next.is_uppercase()) {
            break;
        }
        lowered = i + 1;
    }

    let mut out = String::with_capacity(name.len());
    for c in &chars[..lowered] {
        out.extend(c.to_lowercase());
    }
    out.extend(&chars[lowered..]);
    Cow::Owned(out)
}

fn separated(name: &str, sep: char) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == ' ' {
            if !out.is_empty() && !out.ends_with(sep) {
                out.push(sep);
            }
            continue;
        }
        if c.is_uppercase() && i > 0 && !out.is_empty() && !out.ends_with(sep) {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push(sep);
            }
        }
        out.extend(c.to_lowercase());
    }
    if out.ends_with(sep) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn animal_type() -> EnumType {
        EnumType::new("AnimalType", ["Insect", "Mammal", "Reptile"])
    }

    #[test]
    fn camel_case_matrix() {
        let p = NamingPolicy::CamelCase;
        assert_eq!(p.apply("NumLegs"), "numLegs");
        assert_eq!(p.apply("Name"), "name");
        assert_eq!(p.apply("type"), "type");
        assert_eq!(p.apply("URLPath"), "urlPath");
        assert_eq!(p.apply("ID"), "id");
        assert_eq!(p.apply(""), "");
    }

    #[test]
    fn separated_case_matrix() {
        assert_eq!(NamingPolicy::SnakeCase.apply("NumLegs"), "num_legs");
        assert_eq!(NamingPolicy::SnakeCase.apply("URLPath"), "url_path");
        assert_eq!(NamingPolicy::SnakeCase.apply("ColdBlooded"), "cold_blooded");
        assert_eq!(NamingPolicy::SnakeCase.apply("already_snake"), "already_snake");
        assert_eq!(NamingPolicy::KebabCase.apply("NumNipples"), "num-nipples");
        assert_eq!(NamingPolicy::KebabCase.apply("Item2Count"), "item2-count");
    }

    #[test]
    fn identity_borrows() {
        assert!(matches!(NamingPolicy::Identity.apply("NumLegs"), Cow::Borrowed("NumLegs")));
    }

    #[test]
    fn ordinal_repr_reads_integers_only() {
        let naming = NamingAdapter::default();
        let e = animal_type();
        assert_eq!(naming.enum_to_wire(&e, 1), json!(1));
        assert_eq!(naming.enum_from_wire(&e, &json!(2)), Some(2));
        assert_eq!(naming.enum_from_wire(&e, &json!(3)), None);
        assert_eq!(naming.enum_from_wire(&e, &json!(-1)), None);
        assert_eq!(naming.enum_from_wire(&e, &json!(1.5)), None);
        assert_eq!(naming.enum_from_wire(&e, &json!("Mammal")), None);
    }

    #[test]
    fn name_repr_applies_policy_and_normalizes_case() {
        let naming = NamingAdapter::new(NamingPolicy::CamelCase, EnumRepr::Name);
        let e = animal_type();
        assert_eq!(naming.enum_to_wire(&e, 1), json!("mammal"));
        assert_eq!(naming.enum_from_wire(&e, &json!("mammal")), Some(1));
        assert_eq!(naming.enum_from_wire(&e, &json!("MAMMAL")), Some(1));
        assert_eq!(naming.enum_from_wire(&e, &json!(0)), Some(0));
        assert_eq!(naming.enum_from_wire(&e, &json!("Fish")), None);
        assert_eq!(naming.enum_from_wire(&e, &json!(true)), None);
    }

    #[test]
    fn wire_key_survives_every_policy() {
        let policies = [
            NamingPolicy::Identity,
            NamingPolicy::CamelCase,
            NamingPolicy::SnakeCase,
            NamingPolicy::KebabCase,
        ];
        for name in ["NumLegs", "URLPath", "shape_kind", "num-sides", "Cold Blooded"] {
            for policy in policies {
                assert_eq!(wire_key(&policy.apply(name)), wire_key(name), "{name} under {policy:?}");
            }
        }
        assert_eq!(wire_key("ShapeKind"), wire_key("shape_kind"));
        assert_ne!(wire_key("NumSides"), wire_key("NumLegs"));
    }

    #[test]
    fn lookup_respects_case_sensitivity() {
        let object = json!({"NumLegs": 8});
        let object = object.as_object().unwrap();
        let strict = NamingAdapter::default();
        assert!(strict.lookup(object, "numLegs").is_none());
        let relaxed = strict.case_insensitive(true);
        assert_eq!(relaxed.lookup(object, "numLegs"), Some(&json!(8)));
    }

    #[test]
    fn options_load_from_json() {
        let options =
            CodecOptions::from_json(r#"{"naming":"camel_case","enum_repr":"name"}"#).unwrap();
        assert_eq!(options.naming, NamingPolicy::CamelCase);
        assert_eq!(options.enum_repr, EnumRepr::Name);
        assert!(!options.case_insensitive);

        assert_eq!(CodecOptions::from_json("{}").unwrap(), CodecOptions::default());
        assert!(CodecOptions::from_json(r#"{"naming":"shouting"}"#).is_err());
        assert!(CodecOptions::from_json(r#"{"colour":"red"}"#).is_err());
    }
}
