// 🔎 Search Criteria - what callers ask the registries and the store for

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// SEARCH CRITERIA (fan-out to registries)
// ============================================================================

/// SearchCriteria - filters sent to every selected registry.
///
/// Absent or blank values are ignored, so `SearchCriteria::default()`
/// matches everything a registry holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(rename = "propertyID", alias = "propertyId", skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(alias = "cinNumber", skip_serializing_if = "Option::is_none")]
    pub cin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director_name: Option<String>,
}

/// Trimmed value of a criterion, None when absent or blank
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SearchCriteria {
    /// The property-type filter; `propertyType` wins over the legacy `searchType`
    pub fn type_filter(&self) -> Option<&str> {
        present(&self.property_type).or_else(|| present(&self.search_type))
    }

    /// Location terms that must all appear in a record's address
    pub fn address_terms(&self) -> Vec<&str> {
        [&self.state, &self.district, &self.street_address, &self.village]
            .into_iter()
            .filter_map(present)
            .collect()
    }

    /// Builder pattern: filter by owner name
    pub fn with_owner_name(mut self, owner_name: &str) -> Self {
        self.owner_name = Some(owner_name.to_string());
        self
    }

    /// Builder pattern: filter by property type (urban / rural)
    pub fn with_property_type(mut self, property_type: &str) -> Self {
        self.property_type = Some(property_type.to_string());
        self
    }

    /// Builder pattern: filter by state
    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    /// Builder pattern: filter by district
    pub fn with_district(mut self, district: &str) -> Self {
        self.district = Some(district.to_string());
        self
    }

    /// Builder pattern: filter by registration number
    pub fn with_registration_number(mut self, registration_number: &str) -> Self {
        self.registration_number = Some(registration_number.to_string());
        self
    }

    /// Builder pattern: filter by property identifier
    pub fn with_property_id(mut self, property_id: &str) -> Self {
        self.property_id = Some(property_id.to_string());
        self
    }

    /// Builder pattern: filter by director name (corporate registry only)
    pub fn with_director_name(mut self, director_name: &str) -> Self {
        self.director_name = Some(director_name.to_string());
        self
    }
}

// ============================================================================
// RECORD QUERY (retrieval from the unified store)
// ============================================================================

/// RecordQuery - canonical field name (camelCase) → expected value.
///
/// Keys are matched against the field of the same name on each stored
/// record; see `UnifiedStore::query` for the comparison rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordQuery(BTreeMap<String, String>);

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: add one condition
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    /// Conditions with a non-blank value
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(k, v)| (k.as_str(), v.trim()))
            .filter(|(_, v)| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.conditions().next().is_none()
    }
}

impl From<&SearchCriteria> for RecordQuery {
    /// Keep the criteria that name a canonical field
    fn from(criteria: &SearchCriteria) -> Self {
        let mut query = RecordQuery::new();
        if let Some(owner) = present(&criteria.owner_name) {
            query = query.with("ownerName", owner);
        }
        if let Some(kind) = criteria.type_filter() {
            query = query.with("propertyType", kind);
        }
        if let Some(number) = present(&criteria.registration_number) {
            query = query.with("registrationNumber", number);
        }
        query
    }
}

// ============================================================================
// TESTS
// ============================================================================
