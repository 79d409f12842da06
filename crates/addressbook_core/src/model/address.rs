//! Address domain model.
//!
//! # Responsibility
//! - Define the address shape exchanged with service callers.
//! - Validate address specificity and field formats.
//!
//! # Invariants
//! - `id` is stable and never reused, even after soft delete.
//! - A saved address always names a `street` and building `number`.

use super::{normalize_text, ModelError, ModelResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static STATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("valid state regex"));
static ZIP_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid zip code regex"));

/// Postal address owned by a customer or saved on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: String,
    pub city: Option<String>,
    /// Two-letter state code.
    pub state: Option<String>,
    pub apt: Option<String>,
    /// Building number.
    pub number: Option<String>,
    pub street: Option<String>,
    pub zip_code: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// Caller-provided address fields for create and patch flows.
///
/// Blank strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressInput {
    pub id: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub apt: Option<String>,
    pub number: Option<String>,
    pub street: Option<String>,
    #[serde(alias = "zipCode")]
    pub zip_code: Option<String>,
}

impl AddressInput {
    /// Returns a copy with every field trimmed and blank fields dropped.
    pub fn normalized(&self) -> Self {
        Self {
            id: normalize_text(self.id.clone()),
            city: normalize_text(self.city.clone()),
            state: normalize_text(self.state.clone()).map(|state| state.to_ascii_uppercase()),
            apt: normalize_text(self.apt.clone()),
            number: normalize_text(self.number.clone()),
            street: normalize_text(self.street.clone()),
            zip_code: normalize_text(self.zip_code.clone()),
        }
    }

    /// Returns whether no address field carries a value.
    pub fn is_blank(&self) -> bool {
        let normalized = self.normalized();
        normalized.city.is_none()
            && normalized.state.is_none()
            && normalized.apt.is_none()
            && normalized.number.is_none()
            && normalized.street.is_none()
            && normalized.zip_code.is_none()
    }

    /// Validates formats of the fields that are present.
    ///
    /// Used for partial updates, where missing fields keep stored values.
    pub fn validate_patch(&self) -> ModelResult<()> {
        let normalized = self.normalized();
        validate_formats(normalized.state.as_deref(), normalized.zip_code.as_deref())
    }
}

impl Address {
    /// Builds a validated address, generating a UUID v4 `id` when none is given.
    pub fn new(input: &AddressInput) -> ModelResult<Self> {
        let input = input.normalized();
        let address = Self {
            id: input.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            city: input.city,
            state: input.state,
            apt: input.apt,
            number: input.number,
            street: input.street,
            zip_code: input.zip_code,
            deleted: false,
        };
        address.validate()?;
        Ok(address)
    }

    /// Checks specificity first, then field formats.
    ///
    /// A specific address names a street, a building number and a locality
    /// (city or zip code).
    pub fn validate(&self) -> ModelResult<()> {
        if self.id.trim().is_empty() {
            return Err(ModelError::InvalidInput("id"));
        }
        if is_blank(self.street.as_deref()) {
            return Err(ModelError::AddressNotSpecific("street"));
        }
        if is_blank(self.number.as_deref()) {
            return Err(ModelError::AddressNotSpecific("number"));
        }
        if is_blank(self.city.as_deref()) && is_blank(self.zip_code.as_deref()) {
            return Err(ModelError::AddressNotSpecific("city"));
        }
        validate_formats(self.state.as_deref(), self.zip_code.as_deref())
    }

    /// Returns whether this address should be considered visible.
    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

fn validate_formats(state: Option<&str>, zip_code: Option<&str>) -> ModelResult<()> {
    if let Some(state) = state {
        if !STATE_RE.is_match(state) {
            return Err(ModelError::AddressInvalid("state"));
        }
    }
    if let Some(zip_code) = zip_code {
        if !ZIP_CODE_RE.is_match(zip_code) {
            return Err(ModelError::AddressInvalid("zip_code"));
        }
    }
    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}
