//! Pet model and the in-memory catalog filter.

use serde::{Deserialize, Serialize};

/// Kind of animal offered for adoption.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PetType {
    Dog,
    Cat,
}

impl PetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetType::Dog => "dog",
            PetType::Cat => "cat",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "dog" => Some(PetType::Dog),
            "cat" => Some(PetType::Cat),
            _ => None,
        }
    }
}

/// Pet gender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PetGender {
    Male,
    Female,
}

impl PetGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetGender::Male => "male",
            PetGender::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "male" => Some(PetGender::Male),
            "female" => Some(PetGender::Female),
            _ => None,
        }
    }
}

/// Pet size classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

impl PetSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetSize::Small => "small",
            PetSize::Medium => "medium",
            PetSize::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "small" => Some(PetSize::Small),
            "medium" => Some(PetSize::Medium),
            "large" => Some(PetSize::Large),
            _ => None,
        }
    }
}

/// A pet available for (or already placed in) adoption.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: PetType,
    pub breed: String,
    /// Free text, e.g. "2 anos".
    pub age: String,
    pub gender: PetGender,
    pub size: PetSize,
    pub vaccinated: bool,
    pub neutered: bool,
    pub description: String,
    pub history: String,
    pub image: String,
    pub address: String,
    pub adopted: bool,
    pub created_at: String,
}

/// Request body for registering a new pet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: PetType,
    pub breed: String,
    pub age: String,
    pub gender: PetGender,
    pub size: PetSize,
    #[serde(default)]
    pub vaccinated: bool,
    #[serde(default)]
    pub neutered: bool,
    pub description: String,
    pub history: String,
    pub image: String,
    pub address: String,
}

/// Catalog filter criteria.
///
/// An unset field means "no constraint on this field".
#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    pub pet_type: Option<PetType>,
    pub size: Option<PetSize>,
    pub vaccinated: Option<bool>,
    pub neutered: Option<bool>,
    /// When true, only pets not yet adopted are returned.
    pub available_only: bool,
}

impl PetFilter {
    /// Whether a pet satisfies every specified criterion.
    pub fn matches(&self, pet: &Pet) -> bool {
        if let Some(t) = self.pet_type {
            if pet.pet_type != t {
                return false;
            }
        }
        if let Some(s) = self.size {
            if pet.size != s {
                return false;
            }
        }
        if let Some(v) = self.vaccinated {
            if pet.vaccinated != v {
                return false;
            }
        }
        if let Some(n) = self.neutered {
            if pet.neutered != n {
                return false;
            }
        }
        if self.available_only && pet.adopted {
            return false;
        }
        true
    }
}

/// Filter a pet list in memory, preserving the input ordering.
pub fn filter_pets(pets: &[Pet], filter: &PetFilter) -> Vec<Pet> {
    pets.iter().filter(|p| filter.matches(p)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet(id: &str, pet_type: PetType, size: PetSize, vaccinated: bool, adopted: bool) -> Pet {
        Pet {
            id: id.to_string(),
            name: format!("pet-{}", id),
            pet_type,
            breed: "Vira-lata".to_string(),
            age: "2 anos".to_string(),
            gender: PetGender::Male,
            size,
            vaccinated,
            neutered: false,
            description: String::new(),
            history: String::new(),
            image: String::new(),
            address: String::new(),
            adopted,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_no_constraints_returns_everything() {
        let pets = vec![
            pet("1", PetType::Dog, PetSize::Large, true, false),
            pet("2", PetType::Cat, PetSize::Small, false, true),
        ];

        let result = filter_pets(&pets, &PetFilter::default());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_filter_composition_ignores_unset_fields() {
        let pets = vec![
            pet("1", PetType::Dog, PetSize::Large, true, false),
            pet("2", PetType::Dog, PetSize::Small, true, false),
            pet("3", PetType::Dog, PetSize::Medium, false, false),
            pet("4", PetType::Cat, PetSize::Small, true, false),
        ];

        // type=dog, size=all, vaccinated=true -> dogs 1 and 2 regardless of size
        let filter = PetFilter {
            pet_type: Some(PetType::Dog),
            vaccinated: Some(true),
            ..Default::default()
        };
        let result = filter_pets(&pets, &filter);
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_available_only_excludes_adopted() {
        let pets = vec![
            pet("1", PetType::Dog, PetSize::Large, true, true),
            pet("2", PetType::Cat, PetSize::Small, true, false),
        ];

        let filter = PetFilter {
            available_only: true,
            ..Default::default()
        };
        let result = filter_pets(&pets, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_filter_preserves_input_order() {
        let pets = vec![
            pet("9", PetType::Dog, PetSize::Small, false, false),
            pet("5", PetType::Dog, PetSize::Small, false, false),
            pet("7", PetType::Dog, PetSize::Small, false, false),
        ];

        let result = filter_pets(&pets, &PetFilter::default());
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "5", "7"]);
    }

    #[test]
    fn test_enum_round_trips() {
        assert_eq!(PetType::from_str("dog"), Some(PetType::Dog));
        assert_eq!(PetType::from_str("hamster"), None);
        assert_eq!(PetSize::from_str(PetSize::Medium.as_str()), Some(PetSize::Medium));
        assert_eq!(PetGender::from_str("female"), Some(PetGender::Female));
    }
}
