//! Cat profile model.

use serde::{Deserialize, Serialize};

/// A cat profile: the owner of every other record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cat {
    /// Locally generated UUID
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub breed: String,
    /// Weight in kg
    pub weight: Option<f64>,
    #[serde(default)]
    pub neutered: bool,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
}

impl Cat {
    /// Create a new cat profile with a fresh id.
    pub fn new(name: impl Into<String>, now_millis: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            breed: String::new(),
            weight: None,
            neutered: false,
            chronic_conditions: Vec::new(),
            birth_date: None,
            gender: None,
            created_at: now_millis,
        }
    }

    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = breed.into();
        self
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight = Some(weight_kg);
        self
    }

    pub fn with_neutered(mut self, neutered: bool) -> Self {
        self.neutered = neutered;
        self
    }

    pub fn with_chronic_conditions(mut self, conditions: Vec<String>) -> Self {
        self.chronic_conditions = conditions;
        self
    }

    /// Whether any chronic condition is recorded.
    pub fn has_chronic_conditions(&self) -> bool {
        self.chronic_conditions.iter().any(|c| !c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cat() {
        let cat = Cat::new("Nabi", 1_000).with_breed("Korean Shorthair");
        assert_eq!(cat.name, "Nabi");
        assert_eq!(cat.breed, "Korean Shorthair");
        assert_eq!(cat.created_at, 1_000);
        assert_eq!(cat.id.len(), 36); // UUID format
    }

    #[test]
    fn test_serializes_camel_case() {
        let cat = Cat::new("Nabi", 0).with_chronic_conditions(vec!["CKD".into()]);
        let json = serde_json::to_value(&cat).unwrap();
        assert_eq!(json["chronicConditions"][0], "CKD");
        assert!(json.get("chronic_conditions").is_none());
    }

    #[test]
    fn test_minimal_legacy_shape_deserializes() {
        let cat: Cat = serde_json::from_str(r#"{"id":"c1","name":"Momo","weight":4.2}"#).unwrap();
        assert_eq!(cat.weight, Some(4.2));
        assert!(!cat.neutered);
        assert!(!cat.has_chronic_conditions());
    }
}
