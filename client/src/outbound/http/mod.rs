//! StudBud REST outbound adapter.
//!
//! This module provides a thin HTTP implementation of the `AuthGateway`,
//! `ProfileGateway` and `PostGateway` ports.

mod client;
mod dto;

pub use client::HttpApiClient;
