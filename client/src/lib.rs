//! StudBud client core.
//!
//! Headless screen controllers for the campus study-partner app (email
//! verification, profile setup, posting and browsing) plus the HTTP adapter
//! that talks to the StudBud backend. UI layers drive the controllers in
//! [`domain`] and inject an adapter from [`outbound`].

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;
