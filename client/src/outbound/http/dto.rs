//! Wire DTOs for the StudBud REST API.
//!
//! Responses decode into these transport types first and are mapped into
//! domain records in one pass. The backend is loose about scalar types (ids
//! and years arrive as numbers or strings), so those go through
//! [`ScalarDto`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::UserId;
use crate::domain::ports::{
    CreatePostRequest, PostSummary, ProfileRecord, SearchPostsRequest, SendCodeResponse,
    UpsertProfileRequest, VerifyCodeRequest, VerifyCodeResponse,
};

/// JSON scalar that may be sent as a number or as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(super) enum ScalarDto {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ScalarDto {
    pub(super) fn into_text(self) -> String {
        match self {
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Text(value) => value,
        }
    }

    fn into_user_id(self) -> Option<UserId> {
        UserId::new(self.into_text()).ok()
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SendCodeBody<'a> {
    pub(super) email: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct VerifyCodeBody<'a> {
    pub(super) email: &'a str,
    pub(super) code: &'a str,
}

impl<'a> From<&'a VerifyCodeRequest> for VerifyCodeBody<'a> {
    fn from(value: &'a VerifyCodeRequest) -> Self {
        Self {
            email: value.email.as_ref(),
            code: value.code.as_str(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MessageDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl From<MessageDto> for SendCodeResponse {
    fn from(value: MessageDto) -> Self {
        Self {
            message: value.message,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VerifyCodeDto {
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) is_profile_complete: bool,
    #[serde(default)]
    pub(super) user_id: Option<ScalarDto>,
}

impl From<VerifyCodeDto> for VerifyCodeResponse {
    fn from(value: VerifyCodeDto) -> Self {
        Self {
            message: value.message,
            is_profile_complete: value.is_profile_complete,
            user_id: value.user_id.and_then(ScalarDto::into_user_id),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProfileDto {
    #[serde(default)]
    pub(super) id: Option<ScalarDto>,
    #[serde(default)]
    pub(super) display_name: Option<String>,
    #[serde(default)]
    pub(super) major: Option<String>,
    #[serde(default)]
    pub(super) year: Option<ScalarDto>,
    #[serde(default)]
    pub(super) email: Option<String>,
}

impl From<ProfileDto> for ProfileRecord {
    fn from(value: ProfileDto) -> Self {
        Self {
            id: value.id.and_then(ScalarDto::into_user_id),
            display_name: value.display_name.unwrap_or_default(),
            major: value.major.unwrap_or_default(),
            year: value.year.map(ScalarDto::into_text).unwrap_or_default(),
            email: value.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UpsertProfileBody<'a> {
    pub(super) email: &'a str,
    pub(super) display_name: &'a str,
    pub(super) year: &'a str,
    pub(super) major: &'a str,
}

impl<'a> From<&'a UpsertProfileRequest> for UpsertProfileBody<'a> {
    fn from(value: &'a UpsertProfileRequest) -> Self {
        Self {
            email: value.email.as_ref(),
            display_name: value.display_name.as_str(),
            year: value.year.as_str(),
            major: value.major.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PostSummaryDto {
    pub(super) id: ScalarDto,
    #[serde(default)]
    pub(super) author_name: String,
    pub(super) location: String,
    pub(super) activity: String,
    pub(super) people_needed: u32,
    #[serde(default)]
    pub(super) people_joined: u32,
    #[serde(default)]
    pub(super) created_at: String,
}

impl From<PostSummaryDto> for PostSummary {
    fn from(value: PostSummaryDto) -> Self {
        Self {
            id: value.id.into_text(),
            author_name: value.author_name,
            location: value.location,
            activity: value.activity,
            people_needed: value.people_needed,
            people_joined: value.people_joined,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SearchPostsBody<'a> {
    pub(super) activity: &'a str,
    pub(super) locations: &'a [String],
    pub(super) priority: &'static str,
}

impl<'a> From<&'a SearchPostsRequest> for SearchPostsBody<'a> {
    fn from(value: &'a SearchPostsRequest) -> Self {
        Self {
            activity: value.activity.as_str(),
            locations: value.locations.as_slice(),
            priority: value.priority.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreatePostBody<'a> {
    pub(super) author_id: Value,
    pub(super) activity: &'a str,
    pub(super) location: &'a str,
    pub(super) people_needed: u32,
    pub(super) duration_hours: u32,
}

impl<'a> From<&'a CreatePostRequest> for CreatePostBody<'a> {
    fn from(value: &'a CreatePostRequest) -> Self {
        Self {
            author_id: author_id_value(&value.author_id),
            activity: value.activity.as_str(),
            location: value.location.as_str(),
            people_needed: value.people_needed,
            duration_hours: value.duration_hours,
        }
    }
}

/// Numeric ids go back as JSON numbers, anything else as a string.
fn author_id_value(user_id: &UserId) -> Value {
    user_id
        .as_ref()
        .parse::<i64>()
        .map_or_else(|_| Value::from(user_id.as_ref()), Value::from)
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) error: Option<String>,
}
