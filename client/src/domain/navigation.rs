//! Navigation targets emitted by screens.
//!
//! Screens never drive a router themselves; they return a [`Route`] and the
//! embedding UI decides how to present it.

use crate::domain::session::Identity;

/// Destination a screen asks the UI to show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Main browsing screen.
    Explore {
        /// Signed-in user carried forward.
        identity: Identity,
    },
    /// Profile completion screen shown before the main app.
    ProfileSetup {
        /// Signed-in user carried forward.
        identity: Identity,
        /// Set when the user has just signed up.
        new_user: bool,
    },
}

impl Route {
    /// Identity carried by the route.
    pub fn identity(&self) -> &Identity {
        match self {
            Self::Explore { identity } | Self::ProfileSetup { identity, .. } => identity,
        }
    }

    /// Short screen name for logs and the CLI.
    pub fn screen(&self) -> &'static str {
        match self {
            Self::Explore { .. } => "explore",
            Self::ProfileSetup { .. } => "setup",
        }
    }
}
