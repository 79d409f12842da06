//! Domain and storage models for customers and addresses.
//!
//! # Responsibility
//! - Define domain objects handed to and returned from services.
//! - Define the storage-shaped `Record` persisted by the item store.
//! - Validate domain input before it reaches persistence.
//!
//! # Invariants
//! - Every persisted entity is addressed by a stable string `id`.
//! - Deletion is represented by the `deleted` flag, never by row removal.

pub mod address;
pub mod customer;
pub mod record;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ModelResult<T> = Result<T, ModelError>;

/// Validation failure raised while building a domain object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A required field is missing or malformed.
    InvalidInput(&'static str),
    /// An address field has an impossible value.
    AddressInvalid(&'static str),
    /// The address lacks a field needed to locate it.
    AddressNotSpecific(&'static str),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(field) => write!(f, "invalid input field `{field}`"),
            Self::AddressInvalid(field) => write!(f, "address field `{field}` is invalid"),
            Self::AddressNotSpecific(field) => {
                write!(f, "address is not specific enough: `{field}` is required")
            }
        }
    }
}

impl Error for ModelError {}

/// Trims input text, mapping blank values to `None`.
pub(crate) fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
