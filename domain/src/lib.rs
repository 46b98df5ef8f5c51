//! Domain library for the restaurant directory.
//!
//! Holds the restaurant data model, the storage ports (traits), and the error
//! definitions. Storage engines live behind [`KeyValueStore`]; keep concrete
//! IO concerns in the adapter crates.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a restaurant record, unique within the collection.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RestaurantId(String);

impl RestaurantId {
    pub fn new<S: Into<String>>(s: S) -> Result<Self, CoreError> {
        let val = s.into();
        if val.is_empty() {
            return Err(CoreError::InvalidId("empty".into()));
        }
        Ok(Self(val))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RestaurantId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RestaurantId> for String {
    fn from(id: RestaurantId) -> Self {
        id.0
    }
}

impl Display for RestaurantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic coordinates of a restaurant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// One directory listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub phones: Vec<String>,
    pub description: String,
    /// Deduplicated at input time; insertion order preserved.
    pub tags: Vec<String>,
    /// Expected in [0, 5] with one decimal. Not clamped here.
    pub rating: f64,
    pub location: Location,
}

impl Restaurant {
    /// Reject numbers JSON cannot carry. serde_json writes NaN and infinities
    /// as `null`, which would make the stored collection unreadable.
    pub fn check_storable(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        if !self.rating.is_finite() {
            errors.insert("rating", "Rating must be a finite number");
        }
        if !self.location.latitude.is_finite() || !self.location.longitude.is_finite() {
            errors.insert("location", "Coordinates must be finite numbers");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(errors))
        }
    }

    /// Case-insensitive substring match against the name or any tag.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&q)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&q))
    }
}

/// Raw string storage engine: one text value per key, overwritten on set.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), CoreError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        (**self).set(key, value).await
    }
}

/// Source of fresh restaurant identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> RestaurantId;
}

/// Per-field validation messages, keyed by form field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, msg) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {msg}")?;
            first = false;
        }
        Ok(())
    }
}

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("restaurant not found: {0}")]
    NotFound(String),
    #[error("invalid restaurant id: {0}")]
    InvalidId(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Return a short about/version line for the binary to print.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{} - restaurant directory", pkg, ver)
}

pub mod adapters;
pub mod form;
pub mod id;
pub mod repository;
pub mod service;
pub mod share;
pub mod store;

#[cfg(test)]
mod tests {
    use super::*;

    fn cafe() -> Restaurant {
        Restaurant {
            id: RestaurantId::new("a1").unwrap(),
            name: "Cafe".into(),
            address: "1 Main St".into(),
            phones: vec!["555-0100".into()],
            description: String::new(),
            tags: vec!["Brunch".into(), "coffee".into()],
            rating: 4.5,
            location: Location::new(0.0, 0.0),
        }
    }

    #[test]
    fn id_accepts_simple_values() {
        let id = RestaurantId::new("k3x9a1b2c").expect("valid id");
        assert_eq!(id.as_str(), "k3x9a1b2c");
    }

    #[test]
    fn id_rejects_only_empty() {
        assert!(matches!(RestaurantId::new(""), Err(CoreError::InvalidId(_))));
        assert_eq!(RestaurantId::new("a b").unwrap().as_str(), "a b");
    }

    #[test]
    fn stored_id_with_spaces_loads() {
        let text = r#"[{"id":"my place","name":"x","address":"y","phones":[],"description":"",
            "tags":[],"rating":0,"location":{"latitude":0,"longitude":0}}]"#;
        let all: Vec<Restaurant> = serde_json::from_str(text).unwrap();
        assert_eq!(all[0].id.as_str(), "my place");
    }

    #[test]
    fn non_finite_numbers_are_not_storable() {
        let mut r = cafe();
        assert!(r.check_storable().is_ok());
        r.rating = f64::NAN;
        r.location.longitude = f64::INFINITY;
        let Err(CoreError::Validation(fields)) = r.check_storable() else {
            panic!("expected Validation");
        };
        assert!(fields.get("rating").is_some());
        assert!(fields.get("location").is_some());
    }

    #[test]
    fn restaurant_json_uses_plain_field_names() {
        let json = serde_json::to_value(cafe()).unwrap();
        assert_eq!(json["id"], "a1");
        assert_eq!(json["phones"][0], "555-0100");
        assert_eq!(json["location"]["latitude"], 0.0);
        assert_eq!(json["rating"], 4.5);
    }

    #[test]
    fn collection_survives_json_roundtrip() {
        let mut other = cafe();
        other.id = RestaurantId::new("b2").unwrap();
        other.location = Location::new(59.91, 10.75);
        let all = vec![cafe(), other];
        let text = serde_json::to_string(&all).unwrap();
        let back: Vec<Restaurant> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, all);
    }

    #[test]
    fn stored_blank_id_is_rejected_on_load() {
        let text = r#"{"id":"","name":"x","address":"y","phones":[],"description":"",
            "tags":[],"rating":0,"location":{"latitude":0,"longitude":0}}"#;
        assert!(serde_json::from_str::<Restaurant>(text).is_err());
    }

    #[test]
    fn matches_name_or_tag_case_insensitively() {
        let r = cafe();
        assert!(r.matches("caf"));
        assert!(r.matches("BRUNCH"));
        assert!(r.matches("   "));
        assert!(!r.matches("sushi"));
    }

    #[test]
    fn field_errors_display_joins_fields() {
        let mut errs = FieldErrors::new();
        errs.insert("name", "Restaurant name is required");
        errs.insert("address", "Address is required");
        assert_eq!(
            errs.to_string(),
            "address: Address is required; name: Restaurant name is required"
        );
    }
}
