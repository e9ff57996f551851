//! User records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// User identifier. Assigned from a monotonic counter, never reused.
pub type UserId = u64;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address. Not validated or deduplicated.
    pub email: String,
    /// Creation time, fixed once set.
    pub created_at: DateTime<Utc>,
}

/// Body of a create-user request.
///
/// Missing or `null` fields decode as empty strings and are rejected by
/// [`NewUser::parse`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    /// Requested name.
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    /// Requested email.
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A create-user request that passed the presence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub(crate) name: String,
    pub(crate) email: String,
}

impl NewUser {
    /// Accept the request if both fields are non-empty.
    ///
    /// No trimming: a name of `" "` is accepted.
    pub fn parse(request: CreateUserRequest) -> Result<Self, ApiError> {
        if request.name.is_empty() || request.email.is_empty() {
            return Err(ApiError::MissingFields);
        }
        Ok(Self {
            name: request.name,
            email: request.email,
        })
    }
}
