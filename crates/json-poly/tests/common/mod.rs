#![allow(dead_code)]

//! The `Animal` family shared by the integration tests.
//!
//! ```text
//! Animal (type: AnimalType)
//! ├── Insect
//! ├── Mammal (species: MammalSpecies)
//! │   ├── Dog
//! │   ├── Cat
//! │   └── Monkey
//! └── Reptile
//! ```

use std::sync::Arc;

use json_poly::{
    ConfigurationError, DecodeError, DiscriminatorField, DiscriminatorTree, EnumType, FamilyTree,
    FieldDef, Polymorphic, TreeBuilder, Variant,
};
use serde_json::json;

pub fn animal_type_enum() -> Arc<EnumType> {
    Arc::new(EnumType::new("AnimalType", ["Insect", "Mammal", "Reptile"]))
}

pub fn mammal_species_enum() -> Arc<EnumType> {
    Arc::new(EnumType::new("MammalSpecies", ["Dog", "Cat", "Monkey"]))
}

pub fn animal_type() -> DiscriminatorField {
    DiscriminatorField::new("Animal", "type", animal_type_enum())
}

pub fn mammal_species() -> DiscriminatorField {
    DiscriminatorField::new("Mammal", "species", mammal_species_enum())
}

/// The family with its discriminators named `type_member` and
/// `species_member`.
pub fn animal_builder_named(type_member: &str, species_member: &str) -> TreeBuilder {
    let kind = DiscriminatorField::new("Animal", type_member, animal_type_enum());
    let species = DiscriminatorField::new("Mammal", species_member, mammal_species_enum());
    let mammal = |tag: &str, nipples: i64| {
        (
            vec![kind.tag("Mammal"), species.tag(tag)],
            tag.to_string(),
            vec![
                FieldDef::str("Name").default_to("Mammalian"),
                FieldDef::int("NumNipples").default_to(nipples),
            ],
        )
    };
    let (dog, cat, monkey) = (mammal("Dog", 8), mammal("Cat", 8), mammal("Monkey", 2));

    TreeBuilder::new("Animal")
        .register_family(kind.clone())
        .register_sub_family([kind.tag("Mammal")], species.clone())
        .register_variant(
            [kind.tag("Insect")],
            "Insect",
            [
                FieldDef::str("Name").default_to("Insectoid"),
                FieldDef::int("NumLegs").default_to(6),
                FieldDef::int("NumEyes").default_to(4),
            ],
        )
        .register_variant(dog.0, dog.1, dog.2)
        .register_variant(cat.0, cat.1, cat.2)
        .register_variant(monkey.0, monkey.1, monkey.2)
        .register_variant(
            [kind.tag("Reptile")],
            "Reptile",
            [
                FieldDef::str("Name").default_to("Reptilian"),
                FieldDef::bool("ColdBlooded").default_to(true),
            ],
        )
}

pub fn animal_builder() -> TreeBuilder {
    animal_builder_named("type", "species")
}

pub fn animal_tree() -> DiscriminatorTree {
    animal_builder().build().expect("animal family is valid")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MammalSpecies {
    Dog,
    Cat,
    Monkey,
}

impl MammalSpecies {
    pub const ALL: [MammalSpecies; 3] = [Self::Dog, Self::Cat, Self::Monkey];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dog => "Dog",
            Self::Cat => "Cat",
            Self::Monkey => "Monkey",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mammal {
    pub species: MammalSpecies,
    pub name: String,
    pub num_nipples: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Animal {
    Insect {
        name: String,
        num_legs: i64,
        num_eyes: i64,
    },
    Mammal(Mammal),
    Reptile {
        name: String,
        cold_blooded: bool,
    },
}

impl Animal {
    pub fn insect(num_legs: i64, num_eyes: i64) -> Self {
        Self::Insect {
            name: "Insectoid".into(),
            num_legs,
            num_eyes,
        }
    }

    pub fn mammal(species: MammalSpecies) -> Self {
        let num_nipples = match species {
            MammalSpecies::Dog | MammalSpecies::Cat => 8,
            MammalSpecies::Monkey => 2,
        };
        Self::Mammal(Mammal {
            species,
            name: "Mammalian".into(),
            num_nipples,
        })
    }

    pub fn dog() -> Self {
        Self::mammal(MammalSpecies::Dog)
    }

    pub fn reptile(cold_blooded: bool) -> Self {
        Self::Reptile {
            name: "Reptilian".into(),
            cold_blooded,
        }
    }
}

static ANIMALS: FamilyTree = FamilyTree::new();

impl Polymorphic for Animal {
    fn declare() -> Result<DiscriminatorTree, ConfigurationError> {
        animal_builder().build()
    }

    fn tree_cell() -> &'static FamilyTree {
        &ANIMALS
    }

    fn to_variant(&self) -> Variant {
        match self {
            Self::Insect {
                name,
                num_legs,
                num_eyes,
            } => Variant::new("Insect")
                .with("Name", name.as_str())
                .with("NumLegs", *num_legs)
                .with("NumEyes", *num_eyes),
            Self::Mammal(mammal) => Variant::new(mammal.species.name())
                .with("Name", mammal.name.as_str())
                .with("NumNipples", mammal.num_nipples),
            Self::Reptile { name, cold_blooded } => Variant::new("Reptile")
                .with("Name", name.as_str())
                .with("ColdBlooded", *cold_blooded),
        }
    }

    fn from_variant(variant: &Variant) -> Result<Self, DecodeError> {
        let name = variant.get_str("Name")?.to_string();
        match variant.type_name() {
            "Insect" => Ok(Self::Insect {
                name,
                num_legs: variant.get_i64("NumLegs")?,
                num_eyes: variant.get_i64("NumEyes")?,
            }),
            "Reptile" => Ok(Self::Reptile {
                name,
                cold_blooded: variant.get_bool("ColdBlooded")?,
            }),
            other => {
                let species = MammalSpecies::ALL
                    .into_iter()
                    .find(|s| s.name() == other)
                    .ok_or_else(|| DecodeError::UnknownVariant {
                        owner: "Animal".into(),
                        enum_name: "AnimalType".into(),
                        value: json!(other),
                    })?;
                Ok(Self::Mammal(Mammal {
                    species,
                    name,
                    num_nipples: variant.get_i64("NumNipples")?,
                }))
            }
        }
    }
}
