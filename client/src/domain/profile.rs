//! Profile setup and editing screen.
//!
//! The same form serves two places: the setup screen shown to new users
//! right after verification, and the profile tab. Both load the record for
//! the signed-in email on focus and submit a whole-record upsert keyed by
//! that email.

use tracing::{debug, info};

use crate::domain::error::ScreenError;
use crate::domain::form::{FieldSpec, Form, KeyboardHint, Validator};
use crate::domain::navigation::Route;
use crate::domain::ports::{ProfileGateway, ProfileRecord, UpsertProfileRequest};
use crate::domain::session::Session;

/// Field key for the display name.
pub const FIELD_DISPLAY_NAME: &str = "display_name";
/// Field key for the major.
pub const FIELD_MAJOR: &str = "major";
/// Field key for the graduation year.
pub const FIELD_YEAR: &str = "year";
/// Field key for the read-only email.
pub const FIELD_EMAIL: &str = "email";

/// Confirmation shown after a successful save.
pub const PROFILE_SAVED_MESSAGE: &str = "Profile saved.";

static PROFILE_FIELDS: [FieldSpec; 4] = [
    FieldSpec::editable(
        FIELD_DISPLAY_NAME,
        "Name",
        Validator::Required,
        KeyboardHint::Text,
    ),
    FieldSpec::editable(FIELD_MAJOR, "Major", Validator::Required, KeyboardHint::Text),
    FieldSpec::editable(FIELD_YEAR, "Year", Validator::Required, KeyboardHint::Numeric),
    FieldSpec::read_only(FIELD_EMAIL, "Email", KeyboardHint::Email),
];

/// Where the profile form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMode {
    /// First-run setup; a successful save continues to the main app.
    Setup,
    /// Profile tab; a successful save stays on the screen.
    Edit,
}

/// Result of a successful profile save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSaved {
    /// Confirmation to show the user.
    pub message: String,
    /// Next screen, set in [`ProfileMode::Setup`].
    pub route: Option<Route>,
}

/// Profile form controller.
#[derive(Debug, Clone)]
pub struct ProfileForm {
    mode: ProfileMode,
    form: Form,
}

impl ProfileForm {
    /// Form for the first-run setup screen.
    pub fn setup() -> Self {
        Self::with_mode(ProfileMode::Setup)
    }

    /// Form for the profile tab.
    pub fn edit() -> Self {
        Self::with_mode(ProfileMode::Edit)
    }

    fn with_mode(mode: ProfileMode) -> Self {
        Self {
            mode,
            form: Form::new(&PROFILE_FIELDS),
        }
    }

    /// Screen variant.
    pub fn mode(&self) -> ProfileMode {
        self.mode
    }

    /// Underlying form state.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Mutable form state for user edits.
    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Refresh the fields from the backend (on every focus).
    ///
    /// # Errors
    ///
    /// Returns a validation error when nobody is signed in (no request is
    /// sent) and a remote error when the fetch fails. Field values are left
    /// unchanged on error.
    pub async fn load<G>(&mut self, session: &Session, gateway: &G) -> Result<(), ScreenError>
    where
        G: ProfileGateway + ?Sized,
    {
        let identity = session.identity()?;
        let email = identity.email().clone();
        debug!(email = %email, "loading profile");
        let record = gateway.fetch_profile(&email).await?;
        self.populate(&record);
        self.form.fill(FIELD_EMAIL, email.as_ref());
        Ok(())
    }

    fn populate(&mut self, record: &ProfileRecord) {
        self.form
            .fill(FIELD_DISPLAY_NAME, record.display_name.as_str());
        self.form.fill(FIELD_MAJOR, record.major.as_str());
        self.form.fill(FIELD_YEAR, record.year.as_str());
    }

    /// Validate and upsert the profile.
    ///
    /// Returns `Ok(None)` when a save is already outstanding.
    ///
    /// # Errors
    ///
    /// Returns a validation error (no request) when a field is blank or
    /// nobody is signed in, and a remote error when the upsert fails. The
    /// draft is kept in both cases.
    pub async fn submit<G>(
        &mut self,
        session: &Session,
        gateway: &G,
    ) -> Result<Option<ProfileSaved>, ScreenError>
    where
        G: ProfileGateway + ?Sized,
    {
        if self.form.is_submitting() {
            return Ok(None);
        }
        let identity = session.identity()?;
        self.form.validate()?;
        let request = UpsertProfileRequest {
            email: identity.email().clone(),
            display_name: self.form.value(FIELD_DISPLAY_NAME).to_owned(),
            year: self.form.value(FIELD_YEAR).to_owned(),
            major: self.form.value(FIELD_MAJOR).to_owned(),
        };

        self.form.begin_submit();
        let result = gateway.upsert_profile(&request).await;
        self.form.finish_submit();
        result?;

        info!(mode = ?self.mode, "profile saved");
        let route = match self.mode {
            ProfileMode::Setup => Some(Route::Explore {
                identity: identity.clone(),
            }),
            ProfileMode::Edit => None,
        };
        Ok(Some(ProfileSaved {
            message: PROFILE_SAVED_MESSAGE.to_owned(),
            route,
        }))
    }
}
