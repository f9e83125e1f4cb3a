//! Command-line driver for the StudBud screens.
//!
//! Each subcommand drives one screen controller against the configured
//! backend. Only `login` performs email verification; the other commands
//! treat `--email` as an already verified identity for the life of the
//! process.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;

use clap::{Parser, Subcommand};
use client::config::ClientSettings;
use client::domain::explore::{NO_POSTS_MESSAGE, render_card};
use client::domain::post::{
    FIELD_ACTIVITY, FIELD_DURATION_HOURS, FIELD_LOCATION, FIELD_PEOPLE_NEEDED,
};
use client::domain::profile::{FIELD_DISPLAY_NAME, FIELD_EMAIL, FIELD_MAJOR, FIELD_YEAR};
use client::domain::{
    Email, ExploreScreen, ExploreView, FlowEvent, Identity, PostForm, ProfileForm, Route,
    Session, Step, VerificationFlow,
};
use client::outbound::http::HttpApiClient;
use client::telemetry;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::runtime::Builder;

const RESET_COMMAND: &str = "reset";

/// `studbud` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "studbud",
    about = "Find study partners on campus from the terminal",
    version
)]
struct CliArgs {
    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in with an emailed verification code.
    Login {
        /// Campus email address.
        #[arg(long)]
        email: String,
    },
    /// Show or update your profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Publish a study-session post.
    Post {
        /// Verified campus email address.
        #[arg(long)]
        email: String,
        /// Activity or course code.
        #[arg(long)]
        activity: String,
        /// Where the session takes place.
        #[arg(long)]
        location: String,
        /// Number of people wanted.
        #[arg(long, value_name = "count")]
        people: String,
        /// How long the post stays open.
        #[arg(long, value_name = "hours")]
        hours: String,
    },
    /// Browse open posts.
    Explore {
        /// Only posts for this activity.
        #[arg(long, default_value = "")]
        activity: String,
        /// Comma-separated locations.
        #[arg(long, default_value = "")]
        location: String,
    },
}

#[derive(Debug, Subcommand)]
enum ProfileAction {
    /// Print the stored profile.
    Show {
        /// Verified campus email address.
        #[arg(long)]
        email: String,
    },
    /// Save the profile.
    Set {
        /// Verified campus email address.
        #[arg(long)]
        email: String,
        /// Display name.
        #[arg(long)]
        name: String,
        /// Major.
        #[arg(long)]
        major: String,
        /// Graduation year.
        #[arg(long)]
        year: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    telemetry::init(args.json).map_err(|error| eyre!("tracing init failed: {error}"))?;

    let settings = ClientSettings::load_from_iter([OsString::from("studbud")])
        .map_err(|error| eyre!("failed to load StudBud settings: {error}"))?;
    let api = HttpApiClient::new(
        settings
            .api_base_url()
            .with_context(|| format!("invalid STUDBUD_API_URL {:?}", settings.api_url()))?,
        settings.request_timeout(),
    )
    .context("failed to build HTTP client")?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("create Tokio runtime")?;
    runtime.block_on(run(args.command, &settings, &api))
}

async fn run(command: Command, settings: &ClientSettings, api: &HttpApiClient) -> Result<()> {
    match command {
        Command::Login { email } => login(settings, api, email).await,
        Command::Profile {
            action: ProfileAction::Show { email },
        } => {
            let session = signed_in(settings, &email)?;
            let mut profile = ProfileForm::edit();
            profile
                .load(&session, api)
                .await
                .context("could not load profile")?;
            let form = profile.form();
            for name in [FIELD_DISPLAY_NAME, FIELD_MAJOR, FIELD_YEAR, FIELD_EMAIL] {
                println!("{name}={}", form.value(name));
            }
            Ok(())
        }
        Command::Profile {
            action:
                ProfileAction::Set {
                    email,
                    name,
                    major,
                    year,
                },
        } => {
            let session = signed_in(settings, &email)?;
            let mut profile = ProfileForm::edit();
            let form = profile.form_mut();
            form.set(FIELD_DISPLAY_NAME, name)?;
            form.set(FIELD_MAJOR, major)?;
            form.set(FIELD_YEAR, year)?;
            if let Some(saved) = profile
                .submit(&session, api)
                .await
                .context("could not save profile")?
            {
                println!("{}", saved.message);
            }
            Ok(())
        }
        Command::Post {
            email,
            activity,
            location,
            people,
            hours,
        } => {
            let mut session = signed_in(settings, &email)?;
            let mut post = PostForm::new();
            let form = post.form_mut();
            form.set(FIELD_ACTIVITY, activity)?;
            form.set(FIELD_LOCATION, location)?;
            form.set(FIELD_PEOPLE_NEEDED, people)?;
            form.set(FIELD_DURATION_HOURS, hours)?;
            if let Some(route) = post
                .submit(&mut session, api, api)
                .await
                .context("could not create post")?
            {
                print_route(&route);
            }
            Ok(())
        }
        Command::Explore { activity, location } => explore(api, activity, location).await,
    }
}

fn signed_in(settings: &ClientSettings, raw_email: &str) -> Result<Session> {
    let email = Email::parse(raw_email, &settings.email_suffix())?;
    let mut session = Session::new();
    session.establish(Identity::new(email));
    Ok(session)
}

async fn login(settings: &ClientSettings, api: &HttpApiClient, email: String) -> Result<()> {
    let mut session = Session::new();
    let mut flow = VerificationFlow::new(settings.email_suffix());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    flow.set_email(email);

    loop {
        if flow.step() == Step::EnterEmail {
            match flow.submit(&mut session, api).await {
                Ok(FlowEvent::CodeSent { message }) => println!("{message}"),
                Ok(_) => {}
                Err(error) => {
                    println!("{}", error.message());
                    let next_email = prompt(&mut lines, "Email:").await?;
                    flow.set_email(next_email);
                }
            }
            continue;
        }

        let code = prompt(&mut lines, "Verification code (or `reset`):").await?;
        if code.trim().eq_ignore_ascii_case(RESET_COMMAND) {
            flow.reset();
            let next_email = prompt(&mut lines, "Email:").await?;
            flow.set_email(next_email);
            continue;
        }
        flow.set_code(code);
        match flow.submit(&mut session, api).await {
            Ok(FlowEvent::Routed(route)) => {
                print_route(&route);
                return Ok(());
            }
            Ok(_) => {}
            Err(error) => println!("{}", error.message()),
        }
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String> {
    println!("{label}");
    lines
        .next_line()
        .await
        .context("read stdin")?
        .ok_or_else(|| eyre!("stdin closed before sign-in finished"))
}

async fn explore(api: &HttpApiClient, activity: String, location: String) -> Result<()> {
    let mut screen = ExploreScreen::new();
    let _superseded = screen.set_activity(activity);
    let pending = screen.set_location(location);
    let outcome = pending.run(api).await;
    screen.apply(outcome);

    match screen.view() {
        ExploreView::Loaded(posts) => {
            for post in posts {
                for line in render_card(post) {
                    println!("{line}");
                }
                println!();
            }
            Ok(())
        }
        ExploreView::Empty => {
            println!("{NO_POSTS_MESSAGE}");
            Ok(())
        }
        ExploreView::Failed(message) => Err(eyre!("{message}")),
        ExploreView::Loading => Err(eyre!("explore fetch did not complete")),
    }
}

fn print_route(route: &Route) {
    let identity = route.identity();
    println!("route={}", route.screen());
    println!("email={}", identity.email());
    if let Some(user_id) = identity.user_id() {
        println!("user_id={}", user_id.as_ref());
    }
}
