//! Driven port for reading and writing profile records.

use async_trait::async_trait;

use super::GatewayError;
use crate::domain::session::{Email, UserId};

/// Profile record as stored by the backend.
///
/// Missing fields decode to empty strings so screens can render partial
/// profiles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileRecord {
    /// Backend identifier, absent until the profile exists.
    pub id: Option<UserId>,
    /// Name shown to other students.
    pub display_name: String,
    /// Declared major(s).
    pub major: String,
    /// Graduation year as text.
    pub year: String,
    /// Email echoed back by the backend.
    pub email: Option<String>,
}

/// Whole-record profile upsert keyed by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertProfileRequest {
    /// Routing key for the record.
    pub email: Email,
    /// Name shown to other students.
    pub display_name: String,
    /// Graduation year as text.
    pub year: String,
    /// Declared major(s).
    pub major: String,
}

/// Port for profile reads and upserts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    /// Fetch the profile stored for an email.
    async fn fetch_profile(&self, email: &Email) -> Result<ProfileRecord, GatewayError>;

    /// Create or replace the profile for the request's email.
    async fn upsert_profile(&self, request: &UpsertProfileRequest) -> Result<(), GatewayError>;
}
