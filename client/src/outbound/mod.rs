//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no screen logic.
//!
//! - **http**: reqwest-backed client for the StudBud REST API

pub mod http;
