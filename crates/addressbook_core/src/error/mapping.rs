//! Failure-to-response mapping table.
//!
//! | Kind               | Category         | Message                                                   |
//! |--------------------|------------------|-----------------------------------------------------------|
//! | InvalidInput       | BadRequest       | Invalid Input                                             |
//! | ObjectNotFound     | NotFound         | Element for the provided id does not exist in the system |
//! | MethodNotAllowed   | MethodNotAllowed | Method is not allowed                                     |
//! | DataObjectError    | InternalError    | Internal System Failure                                   |
//! | ObjectExists       | Conflict         | This id already exists                                    |
//! | AddressInvalid     | BadRequest       | Address provided is Invalid                               |
//! | AddressNotSpecific | BadRequest       | Address is not specific enough                            |
//! | (anything else)    | InternalError    | Internal Server Error!                                    |

use super::{Classify, FailureKind};
use crate::logging::{sanitize_message, MAX_ERROR_DETAIL_CHARS};
use log::error;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Transport-neutral response category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    BadRequest,
    NotFound,
    MethodNotAllowed,
    Conflict,
    InternalError,
}

impl StatusCategory {
    /// HTTP status code conventionally used for this category.
    pub fn http_status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Conflict => 409,
            Self::InternalError => 500,
        }
    }
}

/// Result of classifying one failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: StatusCategory,
    pub message: &'static str,
}

/// Maps a failure kind to its status category and user-facing message.
pub fn classify(kind: FailureKind) -> Classification {
    let (category, message) = match kind {
        FailureKind::InvalidInput => (StatusCategory::BadRequest, "Invalid Input"),
        FailureKind::ObjectNotFound => (
            StatusCategory::NotFound,
            "Element for the provided id does not exist in the system",
        ),
        FailureKind::MethodNotAllowed => {
            (StatusCategory::MethodNotAllowed, "Method is not allowed")
        }
        FailureKind::DataObjectError => (StatusCategory::InternalError, "Internal System Failure"),
        FailureKind::ObjectExists => (StatusCategory::Conflict, "This id already exists"),
        FailureKind::AddressInvalid => (StatusCategory::BadRequest, "Address provided is Invalid"),
        FailureKind::AddressNotSpecific => {
            (StatusCategory::BadRequest, "Address is not specific enough")
        }
        FailureKind::Unclassified => (StatusCategory::InternalError, "Internal Server Error!"),
    };
    Classification { category, message }
}

/// Failure half of a mapped response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReply {
    pub category: StatusCategory,
    /// Stable `FailureKind::code` value.
    pub code: &'static str,
    pub message: &'static str,
}

impl ErrorReply {
    pub fn from_kind(kind: FailureKind) -> Self {
        let Classification { category, message } = classify(kind);
        Self {
            category,
            code: kind.code(),
            message,
        }
    }

    pub fn http_status(&self) -> u16 {
        self.category.http_status()
    }
}

impl Display for ErrorReply {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ErrorReply {}

/// Maps one request outcome for the response boundary.
///
/// Failures become an `ErrorReply` carrying only the stable message; the
/// internal detail is logged. Success bodies are forwarded unchanged.
pub fn send_response<T, E>(outcome: Result<T, E>) -> Result<T, ErrorReply>
where
    E: Classify + Display,
{
    outcome.map_err(|err| {
        let reply = ErrorReply::from_kind(err.failure_kind());
        error!(
            "event=request_failed module=error status=error kind={} http_status={} error={}",
            reply.code,
            reply.http_status(),
            sanitize_message(&err.to_string(), MAX_ERROR_DETAIL_CHARS)
        );
        reply
    })
}

/// Wraps `callback` into a continuation accepting a raw outcome.
///
/// The callback runs exactly once, with either the mapped failure or the
/// untouched success body.
pub fn respond_with<T, E, F>(callback: F) -> impl FnOnce(Result<T, E>)
where
    E: Classify + Display,
    F: FnOnce(Result<T, ErrorReply>),
{
    move |outcome| callback(send_response(outcome))
}
