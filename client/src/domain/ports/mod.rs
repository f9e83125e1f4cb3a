//! Domain ports and supporting types for the backend boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_gateway;
mod gateway_error;
mod post_gateway;
mod profile_gateway;

#[cfg(test)]
pub(crate) use auth_gateway::MockAuthGateway;
pub use auth_gateway::{
    AuthGateway, SendCodeRequest, SendCodeResponse, VerifyCodeRequest, VerifyCodeResponse,
};
pub use gateway_error::GatewayError;
#[cfg(test)]
pub(crate) use post_gateway::MockPostGateway;
pub use post_gateway::{
    CreatePostRequest, PostGateway, PostSummary, SearchPostsRequest, SearchPriority,
};
#[cfg(test)]
pub(crate) use profile_gateway::MockProfileGateway;
pub use profile_gateway::{ProfileGateway, ProfileRecord, UpsertProfileRequest};
