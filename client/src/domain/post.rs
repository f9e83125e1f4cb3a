//! New study-session post screen.

use tracing::{info, warn};

use crate::domain::error::ScreenError;
use crate::domain::form::{FieldSpec, Form, KeyboardHint, Validator};
use crate::domain::navigation::Route;
use crate::domain::ports::{CreatePostRequest, PostGateway, ProfileGateway};
use crate::domain::session::{Session, UserId};

/// Field key for the activity or course.
pub const FIELD_ACTIVITY: &str = "activity";
/// Field key for the location.
pub const FIELD_LOCATION: &str = "location";
/// Field key for the group size sought.
pub const FIELD_PEOPLE_NEEDED: &str = "people_needed";
/// Field key for how long the post stays open.
pub const FIELD_DURATION_HOURS: &str = "duration_hours";

static POST_FIELDS: [FieldSpec; 4] = [
    FieldSpec::editable(
        FIELD_ACTIVITY,
        "Activity / course",
        Validator::Required,
        KeyboardHint::Text,
    ),
    FieldSpec::editable(
        FIELD_LOCATION,
        "Location",
        Validator::Required,
        KeyboardHint::Text,
    ),
    FieldSpec::editable(
        FIELD_PEOPLE_NEEDED,
        "People needed",
        Validator::PositiveInteger,
        KeyboardHint::Numeric,
    ),
    FieldSpec::editable(
        FIELD_DURATION_HOURS,
        "Duration (hours)",
        Validator::PositiveInteger,
        KeyboardHint::Numeric,
    ),
];

/// Post form controller.
#[derive(Debug, Clone)]
pub struct PostForm {
    form: Form,
}

impl Default for PostForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PostForm {
    /// Empty post form.
    pub fn new() -> Self {
        Self {
            form: Form::new(&POST_FIELDS),
        }
    }

    /// Underlying form state.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Mutable form state for user edits.
    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Validate, resolve the author, and create the post.
    ///
    /// Returns `Ok(None)` when a submission is already outstanding. On
    /// success the form is cleared and the route points at the browse
    /// screen.
    ///
    /// # Errors
    ///
    /// Returns a validation error (no request) for blank or non-positive
    /// fields, and a remote error when the author lookup or the create call
    /// fails. The draft is kept on every error.
    pub async fn submit<P, G>(
        &mut self,
        session: &mut Session,
        profiles: &P,
        posts: &G,
    ) -> Result<Option<Route>, ScreenError>
    where
        P: ProfileGateway + ?Sized,
        G: PostGateway + ?Sized,
    {
        if self.form.is_submitting() {
            return Ok(None);
        }
        session.identity()?;
        self.form.validate()?;
        let people_needed = self.form.positive_integer(FIELD_PEOPLE_NEEDED)?;
        let duration_hours = self.form.positive_integer(FIELD_DURATION_HOURS)?;

        self.form.begin_submit();
        let result = self
            .create(session, profiles, posts, people_needed, duration_hours)
            .await;
        self.form.finish_submit();
        result?;

        self.form.clear();
        let identity = session.identity()?.clone();
        info!("post created");
        Ok(Some(Route::Explore { identity }))
    }

    async fn create<P, G>(
        &self,
        session: &mut Session,
        profiles: &P,
        posts: &G,
        people_needed: u32,
        duration_hours: u32,
    ) -> Result<(), ScreenError>
    where
        P: ProfileGateway + ?Sized,
        G: PostGateway + ?Sized,
    {
        let author_id = resolve_author(session, profiles).await?;
        let request = CreatePostRequest {
            author_id,
            activity: self.form.value(FIELD_ACTIVITY).to_lowercase(),
            location: self.form.value(FIELD_LOCATION).to_lowercase(),
            people_needed,
            duration_hours,
        };
        posts.create_post(&request).await?;
        Ok(())
    }
}

/// Backend id of the signed-in user, looked up by email when not cached.
async fn resolve_author<P>(session: &mut Session, profiles: &P) -> Result<UserId, ScreenError>
where
    P: ProfileGateway + ?Sized,
{
    let identity = session.identity()?;
    if let Some(user_id) = identity.user_id() {
        return Ok(user_id.clone());
    }
    let email = identity.email().clone();
    let record = profiles.fetch_profile(&email).await.map_err(|error| {
        warn!(error = %error, "author lookup failed");
        ScreenError::from(error)
    })?;
    let user_id = record
        .id
        .ok_or_else(|| ScreenError::remote("Could not find your profile. Please set it up first."))?;
    session.remember_user_id(user_id.clone());
    Ok(user_id)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorKind;
    use crate::domain::ports::{GatewayError, MockPostGateway, MockProfileGateway, ProfileRecord};
    use crate::domain::session::{Email, EmailSuffix, Identity};
    use rstest::{fixture, rstest};

    const EMAIL: &str = "albert@ufl.edu";

    #[fixture]
    fn session() -> Session {
        let mut session = Session::new();
        let email = Email::parse(EMAIL, &EmailSuffix::default()).expect("email");
        session.establish(Identity::new(email));
        session
    }

    fn filled(activity: &str, location: &str, people: &str, hours: &str) -> PostForm {
        let mut post = PostForm::new();
        let form = post.form_mut();
        form.set(FIELD_ACTIVITY, activity).expect("activity");
        form.set(FIELD_LOCATION, location).expect("location");
        form.set(FIELD_PEOPLE_NEEDED, people).expect("people");
        form.set(FIELD_DURATION_HOURS, hours).expect("hours");
        post
    }

    fn profiles_with_id(id: Option<&'static str>) -> MockProfileGateway {
        let mut profiles = MockProfileGateway::new();
        profiles
            .expect_fetch_profile()
            .withf(|email: &Email| email.as_ref() == EMAIL)
            .times(1)
            .returning(move |_| {
                Ok(ProfileRecord {
                    id: id.map(|raw| UserId::new(raw).expect("id")),
                    ..ProfileRecord::default()
                })
            });
        profiles
    }

    #[rstest]
    #[tokio::test]
    async fn submit_sends_integers_and_lower_cased_text(mut session: Session) {
        let profiles = profiles_with_id(Some("9"));
        let mut posts = MockPostGateway::new();
        posts
            .expect_create_post()
            .withf(|request: &CreatePostRequest| {
                request.author_id.as_ref() == "9"
                    && request.activity == "eco3101 "
                    && request.location == "library west"
                    && request.people_needed == 4
                    && request.duration_hours == 2
            })
            .times(1)
            .returning(|_| Ok(()));
        let mut post = filled("ECO3101 ", "Library West", "4", "2");

        let route = post
            .submit(&mut session, &profiles, &posts)
            .await
            .expect("submit")
            .expect("not ignored");

        assert!(matches!(route, Route::Explore { .. }));
        assert_eq!(post.form().value(FIELD_ACTIVITY), "", "form is cleared");
        assert_eq!(
            session
                .identity()
                .expect("identity")
                .user_id()
                .map(AsRef::as_ref),
            Some("9"),
            "resolved author id is cached"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn cached_user_id_skips_lookup(mut session: Session) {
        session.remember_user_id(UserId::new("3").expect("id"));
        let profiles = MockProfileGateway::new();
        let mut posts = MockPostGateway::new();
        posts
            .expect_create_post()
            .withf(|request: &CreatePostRequest| request.author_id.as_ref() == "3")
            .times(1)
            .returning(|_| Ok(()));
        let mut post = filled("sta3100", "marston", "3", "1");

        post.submit(&mut session, &profiles, &posts)
            .await
            .expect("submit");
    }

    #[rstest]
    #[case("", "marston", "4", "2")]
    #[case("sta3100", " ", "4", "2")]
    #[case("sta3100", "marston", "", "2")]
    #[case("sta3100", "marston", "0", "2")]
    #[case("sta3100", "marston", "4", "two")]
    #[tokio::test]
    async fn invalid_drafts_fail_without_requests(
        mut session: Session,
        #[case] activity: &str,
        #[case] location: &str,
        #[case] people: &str,
        #[case] hours: &str,
    ) {
        let profiles = MockProfileGateway::new();
        let posts = MockPostGateway::new();
        let mut post = filled(activity, location, people, hours);

        let err = post
            .submit(&mut session, &profiles, &posts)
            .await
            .expect_err("invalid draft");

        assert!(err.is_validation());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_author_id_aborts_creation(mut session: Session) {
        let profiles = profiles_with_id(None);
        let posts = MockPostGateway::new();
        let mut post = filled("sta3100", "marston", "4", "2");

        let err = post
            .submit(&mut session, &profiles, &posts)
            .await
            .expect_err("no author id");

        assert_eq!(err.kind(), ErrorKind::Remote);
        assert_eq!(post.form().value(FIELD_ACTIVITY), "sta3100");
        assert!(!post.form().is_submitting());
    }

    #[rstest]
    #[tokio::test]
    async fn author_lookup_error_aborts_creation(mut session: Session) {
        let mut profiles = MockProfileGateway::new();
        profiles
            .expect_fetch_profile()
            .times(1)
            .returning(|_| Err(GatewayError::transport("connection reset")));
        let posts = MockPostGateway::new();
        let mut post = filled("sta3100", "marston", "4", "2");

        let err = post
            .submit(&mut session, &profiles, &posts)
            .await
            .expect_err("lookup fails");

        assert_eq!(err.kind(), ErrorKind::Remote);
        assert_eq!(err.message(), "An unexpected error occurred.");
        assert_eq!(post.form().value(FIELD_ACTIVITY), "sta3100");
        assert!(!post.form().is_submitting());
        assert!(
            session.identity().expect("identity").user_id().is_none(),
            "failed lookups cache nothing"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn failed_create_keeps_draft(mut session: Session) {
        let profiles = profiles_with_id(Some("9"));
        let mut posts = MockPostGateway::new();
        posts.expect_create_post().times(1).returning(|_| {
            Err(GatewayError::rejected(
                400_u16,
                Some("Duration too long".to_owned()),
            ))
        });
        let mut post = filled("sta3100", "Marston", "4", "2");

        let err = post
            .submit(&mut session, &profiles, &posts)
            .await
            .expect_err("create fails");

        assert_eq!(err.message(), "Duration too long");
        assert_eq!(post.form().value(FIELD_LOCATION), "Marston");
        assert_eq!(post.form().value(FIELD_PEOPLE_NEEDED), "4");
        assert!(!post.form().is_submitting());
    }

    #[rstest]
    #[tokio::test]
    async fn signed_out_session_is_rejected() {
        let profiles = MockProfileGateway::new();
        let posts = MockPostGateway::new();
        let mut post = filled("sta3100", "marston", "4", "2");
        let err = post
            .submit(&mut Session::new(), &profiles, &posts)
            .await
            .expect_err("signed out");
        assert!(err.is_validation());
    }
}
