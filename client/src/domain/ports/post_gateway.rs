//! Driven port for study-session posts.
//!
//! Posts are server-owned. The client only lists, searches and creates them;
//! it never edits a summary it has received.

use async_trait::async_trait;

use super::GatewayError;
use crate::domain::session::UserId;

/// Read-only summary of an open study-session post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    /// Backend post identifier.
    pub id: String,
    /// Display name of the author.
    pub author_name: String,
    /// Where the session takes place.
    pub location: String,
    /// Course code or activity.
    pub activity: String,
    /// Group size the author is looking for.
    pub people_needed: u32,
    /// Members who have already joined.
    pub people_joined: u32,
    /// Creation timestamp as sent by the backend.
    pub created_at: String,
}

impl PostSummary {
    /// Card title, e.g. `eco3101 at marston`.
    pub fn headline(&self) -> String {
        format!("{} at {}", self.activity, self.location)
    }

    /// Open places left in the group.
    pub fn spots_remaining(&self) -> u32 {
        self.people_needed.saturating_sub(self.people_joined)
    }

    /// Whether the group has reached its requested size.
    pub fn is_full(&self) -> bool {
        self.people_joined >= self.people_needed
    }
}

/// Which filter dominates when results match only one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPriority {
    /// Activity matches rank above location matches.
    #[default]
    Activity,
    /// Location matches rank above activity matches.
    Location,
}

impl SearchPriority {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Location => "location",
        }
    }
}

/// Filtered post search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPostsRequest {
    /// Activity to match, or `any`.
    pub activity: String,
    /// Candidate locations; empty matches all.
    pub locations: Vec<String>,
    /// Ranking preference.
    pub priority: SearchPriority,
}

/// New post submitted by the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostRequest {
    /// Backend identifier of the author.
    pub author_id: UserId,
    /// Lower-cased activity.
    pub activity: String,
    /// Lower-cased location.
    pub location: String,
    /// Group size sought.
    pub people_needed: u32,
    /// How long the post stays open.
    pub duration_hours: u32,
}

/// Port for listing, searching and creating posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostGateway: Send + Sync {
    /// List every open post.
    async fn list_posts(&self) -> Result<Vec<PostSummary>, GatewayError>;

    /// Search open posts by activity and location.
    async fn search_posts(
        &self,
        request: &SearchPostsRequest,
    ) -> Result<Vec<PostSummary>, GatewayError>;

    /// Create a new post.
    async fn create_post(&self, request: &CreatePostRequest) -> Result<(), GatewayError>;
}
