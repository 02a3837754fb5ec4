//! Integer error codes attached to log records.
//!
//! Codes never reach the client body: the gateway's wire format is a bare
//! `{"error": ..}` or `{"message": ..}` object. They exist so dashboards can
//! group failures without parsing messages.

use serde::Serialize;
use strum::IntoStaticStr;

/// Failure categories emitted by the gateway.
///
/// - 1000-1999: request/credential problems
/// - 2000-2999: persistence faults
/// - 5000-5999: everything else that reached the generic 500
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    InvalidParams,
    NotFound,
    Unauthorized,
    MethodNotAllowed,
    DomainRejected,
    UnprocessableEntity,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidParams => 1003,
            Self::NotFound => 1004,
            Self::Unauthorized => 1006,
            Self::MethodNotAllowed => 1007,
            Self::DomainRejected => 1008,
            Self::UnprocessableEntity => 1009,
            Self::DatabaseError => 2003,
            Self::InternalError => 5000,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
