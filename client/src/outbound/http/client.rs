//! Reqwest-backed StudBud API adapter.
//!
//! This adapter owns transport details only: URL construction, JSON request
//! bodies, HTTP error mapping, and decoding into domain records. It
//! implements every backend port so one instance serves all screens.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, warn};

use super::dto::{
    CreatePostBody, ErrorBodyDto, MessageDto, PostSummaryDto, ProfileDto, SearchPostsBody,
    SendCodeBody, UpsertProfileBody, VerifyCodeBody, VerifyCodeDto,
};
use crate::domain::Email;
use crate::domain::ports::{
    AuthGateway, CreatePostRequest, GatewayError, PostGateway, PostSummary, ProfileGateway,
    ProfileRecord, SearchPostsRequest, SendCodeRequest, SendCodeResponse, UpsertProfileRequest,
    VerifyCodeRequest, VerifyCodeResponse,
};

const SEND_CODE_PATH: &str = "api/auth/send-code";
const VERIFY_CODE_PATH: &str = "api/auth/verify-code";
const PROFILE_LOOKUP_PATH: &str = "api/user/profile";
const PROFILE_UPSERT_PATH: &str = "api/profile";
const POSTS_PATH: &str = "api/posts";
const POSTS_SEARCH_PATH: &str = "api/posts/search";

/// StudBud backend adapter performing JSON requests against one base URL.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: Url,
}

impl HttpApiClient {
    /// Build an adapter rooted at `base_url`.
    ///
    /// Any path on the base URL is kept as a prefix for every endpoint. With
    /// `timeout` unset requests wait indefinitely.
    ///
    /// ```rust,ignore
    /// let api = HttpApiClient::new(settings.api_base_url()?, None)?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: with_trailing_slash(base_url),
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|error| GatewayError::transport(format!("invalid endpoint {path}: {error}")))
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        debug!(method = %method, path = url.path(), "studbud api request");
        let mut request = self
            .client
            .request(method, url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, bytes.as_ref());
            warn!(
                status = status.as_u16(),
                path = url.path(),
                error = %error,
                "studbud api rejected request"
            );
            return Err(error);
        }
        parse_body(bytes.as_ref())
    }

    async fn get<R>(&self, url: Url) -> Result<R, GatewayError>
    where
        R: DeserializeOwned,
    {
        self.send_json::<(), R>(Method::GET, url, None).await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.send_json(Method::POST, url, Some(body)).await
    }
}

#[async_trait]
impl AuthGateway for HttpApiClient {
    async fn send_code(&self, request: &SendCodeRequest) -> Result<SendCodeResponse, GatewayError> {
        let body = SendCodeBody {
            email: request.email.as_ref(),
        };
        let reply: MessageDto = self.post(SEND_CODE_PATH, &body).await?;
        Ok(reply.into())
    }

    async fn verify_code(
        &self,
        request: &VerifyCodeRequest,
    ) -> Result<VerifyCodeResponse, GatewayError> {
        let reply: VerifyCodeDto = self
            .post(VERIFY_CODE_PATH, &VerifyCodeBody::from(request))
            .await?;
        Ok(reply.into())
    }
}

#[async_trait]
impl ProfileGateway for HttpApiClient {
    async fn fetch_profile(&self, email: &Email) -> Result<ProfileRecord, GatewayError> {
        let mut url = self.endpoint(PROFILE_LOOKUP_PATH)?;
        url.query_pairs_mut().append_pair("email", email.as_ref());
        let record: ProfileDto = self.get(url).await?;
        Ok(record.into())
    }

    async fn upsert_profile(&self, request: &UpsertProfileRequest) -> Result<(), GatewayError> {
        let _: IgnoredAny = self
            .post(PROFILE_UPSERT_PATH, &UpsertProfileBody::from(request))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PostGateway for HttpApiClient {
    async fn list_posts(&self) -> Result<Vec<PostSummary>, GatewayError> {
        let url = self.endpoint(POSTS_PATH)?;
        let posts: Vec<PostSummaryDto> = self.get(url).await?;
        Ok(posts.into_iter().map(PostSummary::from).collect())
    }

    async fn search_posts(
        &self,
        request: &SearchPostsRequest,
    ) -> Result<Vec<PostSummary>, GatewayError> {
        let posts: Vec<PostSummaryDto> = self
            .post(POSTS_SEARCH_PATH, &SearchPostsBody::from(request))
            .await?;
        Ok(posts.into_iter().map(PostSummary::from).collect())
    }

    async fn create_post(&self, request: &CreatePostRequest) -> Result<(), GatewayError> {
        let _: IgnoredAny = self.post(POSTS_PATH, &CreatePostBody::from(request)).await?;
        Ok(())
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_body<R>(body: &[u8]) -> Result<R, GatewayError>
where
    R: DeserializeOwned,
{
    // Success replies with no content decode as JSON null.
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    serde_json::from_slice(body)
        .map_err(|error| GatewayError::decode(format!("invalid StudBud JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    GatewayError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let message = serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(|dto| dto.error)
        .filter(|message| !message.trim().is_empty());
    GatewayError::rejected(status.as_u16(), message)
}
