//! Entity use-case services.
//!
//! # Responsibility
//! - Validate domain input and map it onto storage attribute names.
//! - Orchestrate `Dao` calls into customer/address use-cases.
//! - Keep FFI callers decoupled from storage shapes.
//!
//! # Invariants
//! - Services never bypass `Dao` insert/update/delete semantics.
//! - Store failures are passed through as `ServiceError::Store`.

pub mod address_service;
pub mod customer_service;

use crate::error::{Classify, FailureKind};
use crate::model::ModelError;
use crate::repo::dao::DaoError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// Required input missing or malformed.
    InvalidInput(&'static str),
    AddressInvalid(&'static str),
    AddressNotSpecific(&'static str),
    /// The id is already taken, including by a soft-deleted entity.
    ObjectExists(String),
    /// No live entity with this id.
    ObjectNotFound(String),
    /// Stored data does not map back onto a domain object.
    DataObjectError(String),
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(field) => write!(f, "invalid input field `{field}`"),
            Self::AddressInvalid(field) => write!(f, "address field `{field}` is invalid"),
            Self::AddressNotSpecific(field) => {
                write!(f, "address is not specific enough: `{field}` is required")
            }
            Self::ObjectExists(id) => write!(f, "object already exists: {id}"),
            Self::ObjectNotFound(id) => write!(f, "object not found: {id}"),
            Self::DataObjectError(details) => write!(f, "data object error: {details}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(value: ModelError) -> Self {
        match value {
            ModelError::InvalidInput(field) => Self::InvalidInput(field),
            ModelError::AddressInvalid(field) => Self::AddressInvalid(field),
            ModelError::AddressNotSpecific(field) => Self::AddressNotSpecific(field),
        }
    }
}

impl From<DaoError> for ServiceError {
    fn from(value: DaoError) -> Self {
        match value {
            DaoError::AlreadyExists(key) => Self::ObjectExists(key.to_string()),
            DaoError::NotFound(key) => Self::ObjectNotFound(key.to_string()),
            DaoError::Store(err) => Self::Store(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl Classify for ServiceError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            Self::InvalidInput(_) => FailureKind::InvalidInput,
            Self::AddressInvalid(_) => FailureKind::AddressInvalid,
            Self::AddressNotSpecific(_) => FailureKind::AddressNotSpecific,
            Self::ObjectExists(_) => FailureKind::ObjectExists,
            Self::ObjectNotFound(_) => FailureKind::ObjectNotFound,
            Self::DataObjectError(_) => FailureKind::DataObjectError,
            Self::Store(err) => err.failure_kind(),
        }
    }
}

/// Rejects blank ids before any store call.
pub(crate) fn require_id(id: &str) -> ServiceResult<&str> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidInput("id"));
    }
    Ok(trimmed)
}
