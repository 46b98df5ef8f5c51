//! Editable restaurant draft and its validation rules.

use crate::{CoreError, FieldErrors, Location, Restaurant, RestaurantId};

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// Form state for adding or editing a restaurant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestaurantForm {
    pub name: String,
    pub address: String,
    pub phones: Vec<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub rating: f64,
}

impl RestaurantForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from an existing record for editing.
    pub fn from_restaurant(r: &Restaurant) -> Self {
        Self {
            name: r.name.clone(),
            address: r.address.clone(),
            phones: r.phones.clone(),
            description: r.description.clone(),
            tags: r.tags.clone(),
            rating: r.rating,
        }
    }

    /// Append a trimmed phone number. Blank input is ignored.
    pub fn add_phone(&mut self, phone: &str) -> bool {
        let trimmed = phone.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.phones.push(trimmed.to_string());
        true
    }

    pub fn remove_phone(&mut self, index: usize) -> Option<String> {
        (index < self.phones.len()).then(|| self.phones.remove(index))
    }

    /// Append a trimmed tag unless blank or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let trimmed = tag.trim();
        if trimmed.is_empty() || self.tags.iter().any(|t| t == trimmed) {
            return false;
        }
        self.tags.push(trimmed.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "Restaurant name is required");
        }
        if self.address.trim().is_empty() {
            errors.insert("address", "Address is required");
        }
        if self.phones.is_empty() {
            errors.insert("phones", "At least one phone number is required");
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            errors.insert("rating", "Rating must be between 0 and 5");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(errors))
        }
    }

    /// Validate and build the record. The rating is rounded to one decimal.
    pub fn into_restaurant(
        self,
        id: RestaurantId,
        location: Location,
    ) -> Result<Restaurant, CoreError> {
        self.validate()?;
        Ok(Restaurant {
            id,
            name: self.name,
            address: self.address,
            phones: self.phones,
            description: self.description,
            tags: self.tags,
            rating: round_rating(self.rating),
            location,
        })
    }
}

pub fn round_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}
