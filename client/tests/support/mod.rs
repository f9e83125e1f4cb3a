//! Recording backend double shared by the behaviour suites.

use std::sync::Mutex;

use async_trait::async_trait;
use client::domain::ports::{
    AuthGateway, CreatePostRequest, GatewayError, PostGateway, PostSummary, ProfileGateway,
    ProfileRecord, SearchPostsRequest, SendCodeRequest, SendCodeResponse, UpsertProfileRequest,
    VerifyCodeRequest, VerifyCodeResponse,
};
use client::domain::{Email, EmailSuffix, Identity, Session, UserId};

pub const CAMPUS_EMAIL: &str = "albert@ufl.edu";

/// Backend call observed by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SendCode { email: String },
    VerifyCode { email: String, code: String },
    FetchProfile { email: String },
    UpsertProfile(UpsertProfileRequest),
    ListPosts,
    SearchPosts(SearchPostsRequest),
    CreatePost(CreatePostRequest),
}

/// In-memory backend that records every call and answers from scripted
/// replies.
pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    verify_reply: Mutex<Result<VerifyCodeResponse, GatewayError>>,
    profile_reply: Mutex<ProfileRecord>,
    posts_reply: Mutex<Vec<PostSummary>>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            verify_reply: Mutex::new(Ok(VerifyCodeResponse::default())),
            profile_reply: Mutex::new(ProfileRecord::default()),
            posts_reply: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingBackend {
    pub fn script_verify(&self, reply: Result<VerifyCodeResponse, GatewayError>) {
        *self.verify_reply.lock().expect("verify reply lock") = reply;
    }

    pub fn script_profile(&self, record: ProfileRecord) {
        *self.profile_reply.lock().expect("profile reply lock") = record;
    }

    pub fn script_posts(&self, posts: Vec<PostSummary>) {
        *self.posts_reply.lock().expect("posts reply lock") = posts;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl AuthGateway for RecordingBackend {
    async fn send_code(&self, request: &SendCodeRequest) -> Result<SendCodeResponse, GatewayError> {
        self.record(Call::SendCode {
            email: request.email.as_ref().to_owned(),
        });
        Ok(SendCodeResponse {
            message: Some("Verification code sent".to_owned()),
        })
    }

    async fn verify_code(
        &self,
        request: &VerifyCodeRequest,
    ) -> Result<VerifyCodeResponse, GatewayError> {
        self.record(Call::VerifyCode {
            email: request.email.as_ref().to_owned(),
            code: request.code.as_str().to_owned(),
        });
        self.verify_reply.lock().expect("verify reply lock").clone()
    }
}

#[async_trait]
impl ProfileGateway for RecordingBackend {
    async fn fetch_profile(&self, email: &Email) -> Result<ProfileRecord, GatewayError> {
        self.record(Call::FetchProfile {
            email: email.as_ref().to_owned(),
        });
        Ok(self.profile_reply.lock().expect("profile reply lock").clone())
    }

    async fn upsert_profile(&self, request: &UpsertProfileRequest) -> Result<(), GatewayError> {
        self.record(Call::UpsertProfile(request.clone()));
        Ok(())
    }
}

#[async_trait]
impl PostGateway for RecordingBackend {
    async fn list_posts(&self) -> Result<Vec<PostSummary>, GatewayError> {
        self.record(Call::ListPosts);
        Ok(self.posts_reply.lock().expect("posts reply lock").clone())
    }

    async fn search_posts(
        &self,
        request: &SearchPostsRequest,
    ) -> Result<Vec<PostSummary>, GatewayError> {
        self.record(Call::SearchPosts(request.clone()));
        Ok(self.posts_reply.lock().expect("posts reply lock").clone())
    }

    async fn create_post(&self, request: &CreatePostRequest) -> Result<(), GatewayError> {
        self.record(Call::CreatePost(request.clone()));
        Ok(())
    }
}

pub fn campus_session(user_id: Option<&str>) -> Session {
    let email = Email::parse(CAMPUS_EMAIL, &EmailSuffix::default()).expect("campus email");
    let user_id = user_id.map(|raw| UserId::new(raw).expect("user id"));
    let mut session = Session::new();
    session.establish(Identity::new(email).with_user_id(user_id));
    session
}

pub fn open_post(id: &str, location: &str) -> PostSummary {
    PostSummary {
        id: id.to_owned(),
        author_name: "Albert".to_owned(),
        location: location.to_owned(),
        activity: "eco3101".to_owned(),
        people_needed: 4,
        people_joined: 1,
        created_at: "2025-10-14T12:00:00".to_owned(),
    }
}

pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::runtime::Runtime::new()
        .expect("runtime")
        .block_on(future)
}
