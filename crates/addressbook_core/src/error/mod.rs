//! Failure taxonomy and failure-to-response mapping.
//!
//! # Responsibility
//! - Name the stable failure kinds a caller can observe.
//! - Translate any failure into a status category and user-facing message.
//!
//! # Invariants
//! - Classification never fails and never panics.
//! - Internal error detail never reaches the user-facing message.

pub mod mapping;

pub use mapping::{
    classify, respond_with, send_response, Classification, ErrorReply, StatusCategory,
};

use crate::db::DbError;
use crate::model::ModelError;
use crate::repo::dao::DaoError;
use crate::store::StoreError;
use std::fmt::{Display, Formatter};

/// Declared kind of a failure, as seen by the response boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    InvalidInput,
    ObjectNotFound,
    MethodNotAllowed,
    DataObjectError,
    ObjectExists,
    AddressInvalid,
    AddressNotSpecific,
    /// Anything that does not declare one of the kinds above.
    Unclassified,
}

impl FailureKind {
    /// Stable snake_case code for logs and response payloads.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::ObjectNotFound => "object_not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::DataObjectError => "data_object_error",
            Self::ObjectExists => "object_exists",
            Self::AddressInvalid => "address_invalid",
            Self::AddressNotSpecific => "address_not_specific",
            Self::Unclassified => "unclassified",
        }
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Failures that declare a `FailureKind`.
///
/// Types that do not implement this trait can still be mapped through
/// `Unclassified`, which is the default.
pub trait Classify {
    fn failure_kind(&self) -> FailureKind {
        FailureKind::Unclassified
    }
}

impl Classify for FailureKind {
    fn failure_kind(&self) -> FailureKind {
        *self
    }
}

impl Classify for ModelError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            Self::InvalidInput(_) => FailureKind::InvalidInput,
            Self::AddressInvalid(_) => FailureKind::AddressInvalid,
            Self::AddressNotSpecific(_) => FailureKind::AddressNotSpecific,
        }
    }
}

impl Classify for DaoError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            Self::AlreadyExists(_) => FailureKind::ObjectExists,
            Self::NotFound(_) => FailureKind::ObjectNotFound,
            Self::Store(err) => err.failure_kind(),
        }
    }
}

/// Raw store failures carry no user-facing kind.
impl Classify for StoreError {}

impl Classify for DbError {}

impl Classify for String {}

impl Classify for &str {}

impl<T: Classify + ?Sized> Classify for Box<T> {
    fn failure_kind(&self) -> FailureKind {
        (**self).failure_kind()
    }
}

#[cfg(test)]
mod tests {
    use super::{Classify, FailureKind};
    use crate::model::record::RecordKey;
    use crate::model::ModelError;
    use crate::repo::dao::DaoError;
    use crate::store::StoreError;

    #[test]
    fn dao_errors_declare_kinds() {
        assert_eq!(
            DaoError::AlreadyExists(RecordKey::id("a")).failure_kind(),
            FailureKind::ObjectExists
        );
        assert_eq!(
            DaoError::NotFound(RecordKey::id("a")).failure_kind(),
            FailureKind::ObjectNotFound
        );
        let store = DaoError::Store(StoreError::InvalidData("bad".to_string()));
        assert_eq!(store.failure_kind(), FailureKind::Unclassified);
    }

    #[test]
    fn model_errors_declare_kinds() {
        assert_eq!(
            ModelError::AddressNotSpecific("street").failure_kind(),
            FailureKind::AddressNotSpecific
        );
        assert_eq!(
            ModelError::InvalidInput("email").failure_kind(),
            FailureKind::InvalidInput
        );
    }

    #[test]
    fn raw_messages_are_unclassified() {
        assert_eq!("Item Already Exists".failure_kind(), FailureKind::Unclassified);
        assert_eq!(FailureKind::Unclassified.code(), "unclassified");
    }
}
