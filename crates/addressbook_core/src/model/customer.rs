//! Customer domain model.
//!
//! # Invariants
//! - A customer is identified by its email; `id == email`.
//! - Every customer references exactly one address.

use super::address::{Address, AddressInput};
use super::{normalize_text, ModelError, ModelResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?\d{7,15}$").expect("valid phone regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    /// Resolved address; `None` when the referenced address is gone.
    pub address: Option<Address>,
    #[serde(default)]
    pub deleted: bool,
}

/// Caller-provided customer fields for create and patch flows.
///
/// Blank strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<AddressInput>,
}

impl CustomerInput {
    /// Returns a copy with every text field trimmed and blank fields dropped.
    pub fn normalized(&self) -> Self {
        Self {
            first_name: normalize_text(self.first_name.clone()),
            last_name: normalize_text(self.last_name.clone()),
            email: normalize_text(self.email.clone()).map(|email| email.to_ascii_lowercase()),
            phone_number: normalize_text(self.phone_number.clone()),
            address: self.address.as_ref().map(AddressInput::normalized),
        }
    }

    /// Validates formats of the fields that are present.
    pub fn validate_patch(&self) -> ModelResult<()> {
        let normalized = self.normalized();
        if let Some(phone_number) = normalized.phone_number.as_deref() {
            validate_phone_number(phone_number)?;
        }
        if let Some(address) = normalized.address.as_ref() {
            address.validate_patch()?;
        }
        Ok(())
    }
}

impl Customer {
    /// Builds a validated customer together with its new address.
    pub fn new(input: &CustomerInput) -> ModelResult<Self> {
        let input = input.normalized();
        let email = input.email.ok_or(ModelError::InvalidInput("email"))?;
        let address_input = input.address.ok_or(ModelError::InvalidInput("address"))?;
        let address = Address::new(&address_input)?;

        let customer = Self {
            id: email.clone(),
            first_name: input
                .first_name
                .ok_or(ModelError::InvalidInput("first_name"))?,
            last_name: input
                .last_name
                .ok_or(ModelError::InvalidInput("last_name"))?,
            email,
            phone_number: input.phone_number,
            address: Some(address),
            deleted: false,
        };
        customer.validate()?;
        Ok(customer)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ModelError::InvalidInput("email"));
        }
        if self.id != self.email {
            return Err(ModelError::InvalidInput("id"));
        }
        if self.first_name.trim().is_empty() {
            return Err(ModelError::InvalidInput("first_name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ModelError::InvalidInput("last_name"));
        }
        if let Some(phone_number) = self.phone_number.as_deref() {
            validate_phone_number(phone_number)?;
        }
        if let Some(address) = self.address.as_ref() {
            address.validate()?;
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

fn validate_phone_number(value: &str) -> ModelResult<()> {
    let digits = value
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '-' | '(' | ')' | '.'))
        .collect::<String>();
    if PHONE_RE.is_match(&digits) {
        Ok(())
    } else {
        Err(ModelError::InvalidInput("phone_number"))
    }
}
