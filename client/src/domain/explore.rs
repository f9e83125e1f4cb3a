//! Browse screen for open study-session posts.
//!
//! Every mount or filter change dispatches a fetch tagged with a per-screen
//! sequence number. Earlier fetches are not cancelled; their outcomes are
//! dropped on arrival if a newer fetch has been issued since, so a slow
//! response can never overwrite fresher results.

use tracing::debug;

use crate::domain::error::ScreenError;
use crate::domain::ports::{
    GatewayError, PostGateway, PostSummary, SearchPostsRequest, SearchPriority,
};

/// Activity sentinel sent when only a location filter is set.
pub const ANY_ACTIVITY: &str = "any";

/// Text rendered for an empty result list.
pub const NO_POSTS_MESSAGE: &str = "No posts found.";

/// Which request the current filters translate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExploreQuery {
    /// No filters: plain list of every open post.
    ListAll,
    /// Filtered search.
    Search(SearchPostsRequest),
}

impl ExploreQuery {
    /// Build the query for raw filter inputs.
    ///
    /// # Examples
    /// ```
    /// use client::domain::explore::ExploreQuery;
    ///
    /// assert_eq!(ExploreQuery::from_filters("", " "), ExploreQuery::ListAll);
    ///
    /// let ExploreQuery::Search(search) = ExploreQuery::from_filters("", "marston, library west")
    /// else {
    ///     panic!("expected a search");
    /// };
    /// assert_eq!(search.activity, "any");
    /// assert_eq!(search.locations, vec!["marston", "library west"]);
    /// ```
    pub fn from_filters(activity: &str, location: &str) -> Self {
        let activity = activity.trim();
        let location = location.trim();
        if activity.is_empty() && location.is_empty() {
            return Self::ListAll;
        }
        let activity = if activity.is_empty() {
            ANY_ACTIVITY.to_owned()
        } else {
            activity.to_owned()
        };
        let locations = location
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();
        Self::Search(SearchPostsRequest {
            activity,
            locations,
            priority: SearchPriority::Activity,
        })
    }

    /// Apply a ranking preference; a plain listing is left unchanged.
    pub fn prioritized(self, priority: SearchPriority) -> Self {
        match self {
            Self::ListAll => Self::ListAll,
            Self::Search(request) => Self::Search(SearchPostsRequest { priority, ..request }),
        }
    }

    async fn execute<G>(&self, gateway: &G) -> Result<Vec<PostSummary>, GatewayError>
    where
        G: PostGateway + ?Sized,
    {
        match self {
            Self::ListAll => gateway.list_posts().await,
            Self::Search(request) => gateway.search_posts(request).await,
        }
    }
}

/// What the list area shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExploreView {
    /// A fetch is outstanding.
    #[default]
    Loading,
    /// Posts to render.
    Loaded(Vec<PostSummary>),
    /// The fetch succeeded with no posts.
    Empty,
    /// The fetch failed; the message replaces the list.
    Failed(String),
}

/// Fetch issued by [`ExploreScreen::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    /// Sequence number assigned at dispatch.
    pub sequence: u64,
    /// Request to perform.
    pub query: ExploreQuery,
}

impl PendingFetch {
    /// Perform the request.
    pub async fn run<G>(self, gateway: &G) -> FetchOutcome
    where
        G: PostGateway + ?Sized,
    {
        let result = self.query.execute(gateway).await;
        FetchOutcome {
            sequence: self.sequence,
            result,
        }
    }
}

/// Result of a [`PendingFetch`], tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Sequence number of the originating fetch.
    pub sequence: u64,
    /// Gateway result.
    pub result: Result<Vec<PostSummary>, GatewayError>,
}

/// Explore screen controller.
#[derive(Debug, Clone, Default)]
pub struct ExploreScreen {
    activity: String,
    location: String,
    priority: SearchPriority,
    latest_sequence: u64,
    view: ExploreView,
}

impl ExploreScreen {
    /// Screen with empty filters, showing the loading state until the first
    /// fetch lands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Activity filter text.
    pub fn activity(&self) -> &str {
        &self.activity
    }

    /// Location filter text.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Ranking preference sent with filtered searches.
    pub fn priority(&self) -> SearchPriority {
        self.priority
    }

    /// Current list state.
    pub fn view(&self) -> &ExploreView {
        &self.view
    }

    /// Sequence number of the most recent dispatch.
    pub fn latest_sequence(&self) -> u64 {
        self.latest_sequence
    }

    /// Change the activity filter and dispatch a new fetch.
    pub fn set_activity(&mut self, value: impl Into<String>) -> PendingFetch {
        self.activity = value.into();
        self.dispatch()
    }

    /// Change the location filter and dispatch a new fetch.
    pub fn set_location(&mut self, value: impl Into<String>) -> PendingFetch {
        self.location = value.into();
        self.dispatch()
    }

    /// Change the ranking preference and dispatch a new fetch.
    pub fn set_priority(&mut self, priority: SearchPriority) -> PendingFetch {
        self.priority = priority;
        self.dispatch()
    }

    /// Issue a fetch for the current filters (on mount or filter change).
    pub fn dispatch(&mut self) -> PendingFetch {
        self.latest_sequence = self.latest_sequence.wrapping_add(1);
        self.view = ExploreView::Loading;
        PendingFetch {
            sequence: self.latest_sequence,
            query: ExploreQuery::from_filters(&self.activity, &self.location)
                .prioritized(self.priority),
        }
    }

    /// Apply a fetch outcome. Returns `false` when it was stale.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.sequence != self.latest_sequence {
            debug!(
                sequence = outcome.sequence,
                latest = self.latest_sequence,
                "discarding stale explore response"
            );
            return false;
        }
        self.view = match outcome.result {
            Ok(posts) if posts.is_empty() => ExploreView::Empty,
            Ok(posts) => ExploreView::Loaded(posts),
            Err(error) => ExploreView::Failed(ScreenError::from(error).message().to_owned()),
        };
        true
    }

    /// Dispatch, run, and apply a fetch for the current filters.
    pub async fn refresh<G>(&mut self, gateway: &G) -> &ExploreView
    where
        G: PostGateway + ?Sized,
    {
        let pending = self.dispatch();
        let outcome = pending.run(gateway).await;
        self.apply(outcome);
        &self.view
    }
}

/// Card lines for one post, as shown in the list.
pub fn render_card(post: &PostSummary) -> [String; 3] {
    [
        post.headline(),
        format!("Posted by: {}", post.author_name),
        format!("Looking for {} more people.", post.spots_remaining()),
    ]
}
