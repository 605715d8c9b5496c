//! `reqwest` adapter for every remote port.
//!
//! Member calls carry `Authorization: Bearer <access token>` read from the
//! [`TokenStore`] at send time. A `401` on such a call triggers one
//! `POST /auth/reissue` with the stored refresh token and a single retry;
//! the rotated pair is written back to the store before retrying.

mod dto;

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;

use crate::domain::{
    BookmarkId, Collection, CollectionName, Credential, DictionarySummary, EntityId, EntityKind,
    Job, LevelRange, LoginOutcome, MemberProfile, NotificationSettings, SessionTokens,
    SignUpAgreements, TokenKind,
};
use crate::effect::AsyncIO;
use crate::errors::ApiError;
use crate::infrastructure::config::AppConfig;
use crate::ports::{
    ApiResult, AuthApi, BookmarkApi, BookmarkRequest, CollectionApi, DictionaryApi,
    NotificationApi, TokenStore,
};

use dto::{
    BookmarkSetRequest, BookmarkSetResponse, CollectionRequest, ErrorBody, FcmTokenRequest,
    LoginRequest, LoginResponse, ReissueRequest, SignUpRequest, TokenResponse,
};

// =============================================================================
// Request description
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Never sends a token.
    Public,
    /// Requires a stored access token.
    Member,
    /// Sends the token when one is stored (dictionary reads show bookmark
    /// ids only to members).
    Optional,
}

#[derive(Debug, Clone)]
struct Call {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<Result<Value, String>>,
    access: Access,
}

impl Call {
    fn new(method: Method, path: impl Into<String>, access: Access) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            access,
        }
    }

    fn json(mut self, body: impl Serialize) -> Self {
        self.body = Some(serde_json::to_value(body).map_err(|error| error.to_string()));
        self
    }

    fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }
}

// =============================================================================
// RestClient
// =============================================================================

struct Inner {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

/// Shared HTTP client; cheap to clone.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<Inner>,
}

impl RestClient {
    /// # Errors
    ///
    /// [`ApiError::Transport`] when the TLS backend cannot be initialised.
    pub fn new(config: &AppConfig, tokens: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| ApiError::transport(error.to_string()))?;
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.api_base_url.clone(),
                tokens,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn call<T>(&self, call: Call) -> AsyncIO<ApiResult<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.clone();
        AsyncIO::new(move || async move { client.execute(&call).await })
    }

    async fn execute<T: DeserializeOwned>(&self, call: &Call) -> ApiResult<T> {
        let (response, authorized) = self.send_once(call).await?;
        if response.status() != StatusCode::UNAUTHORIZED || !authorized {
            return decode(response).await;
        }

        tracing::info!(path = %call.path, "access token rejected, reissuing");
        self.refresh_session().await?;
        let (retried, _) = self.send_once(call).await?;
        decode(retried).await
    }

    /// Returns the response and whether a bearer token was attached.
    async fn send_once(&self, call: &Call) -> ApiResult<(reqwest::Response, bool)> {
        let url = format!("{}{}", self.inner.base_url, call.path);
        tracing::debug!(method = %call.method, %url, "request");

        let mut request = self.inner.http.request(call.method.clone(), url);
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        match &call.body {
            Some(Ok(body)) => request = request.json(body),
            Some(Err(message)) => {
                return Err(ApiError::Decode(format!("unserializable body: {message}")));
            }
            None => {}
        }

        let access_token = match call.access {
            Access::Public => None,
            Access::Member => Some(self.access_token().ok_or(ApiError::Unauthenticated)?),
            Access::Optional => self.access_token(),
        };
        let authorized = access_token.is_some();
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|error| {
            tracing::warn!(path = %call.path, %error, "request failed");
            ApiError::transport(error.to_string())
        })?;
        Ok((response, authorized))
    }

    fn access_token(&self) -> Option<String> {
        self.inner
            .tokens
            .fetch_token(TokenKind::AccessToken)
            .ok()
            .filter(|token| !token.is_empty())
    }

    async fn refresh_session(&self) -> ApiResult<()> {
        let refresh_token = self
            .inner
            .tokens
            .fetch_token(TokenKind::RefreshToken)
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthenticated)?;

        let call = Call::new(Method::POST, "/auth/reissue", Access::Public).json(ReissueRequest {
            refresh_token: &refresh_token,
        });
        let (response, _) = self.send_once(&call).await?;
        let tokens = SessionTokens::from(decode::<TokenResponse>(response).await?);

        for (kind, value) in [
            (TokenKind::AccessToken, tokens.access_token()),
            (TokenKind::RefreshToken, tokens.refresh_token()),
        ] {
            if let Err(error) = self.inner.tokens.save_token(kind, value) {
                tracing::error!(%error, "could not persist reissued tokens");
                return Err(ApiError::Unauthenticated);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RestClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|error| ApiError::transport(error.to_string()))?;

    if !status.is_success() {
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
        tracing::debug!(status = status.as_u16(), message = %body.message, "backend error");
        return Err(ApiError::status(status.as_u16(), body.message));
    }

    // Empty bodies (204, bare DELETE) decode as `null`
    let payload: &[u8] = if bytes.is_empty() {
        b"null".as_slice()
    } else {
        &bytes
    };
    serde_json::from_slice(payload).map_err(|error| ApiError::Decode(error.to_string()))
}

// =============================================================================
// Ports
// =============================================================================

impl AuthApi for RestClient {
    fn login(&self, credential: &Credential) -> AsyncIO<ApiResult<LoginOutcome>> {
        let path = format!("/auth/login/{}", credential.platform());
        self.call::<LoginResponse>(Call::new(Method::POST, path, Access::Public).json(
            LoginRequest {
                token: credential.token(),
            },
        ))
        .fmap_ok(LoginOutcome::from)
    }

    fn sign_up(
        &self,
        credential: &Credential,
        agreements: SignUpAgreements,
    ) -> AsyncIO<ApiResult<SessionTokens>> {
        let path = format!("/auth/signup/{}", credential.platform());
        self.call::<TokenResponse>(Call::new(Method::POST, path, Access::Public).json(
            SignUpRequest {
                token: credential.token(),
                marketing_agreement: agreements.marketing_agreement,
            },
        ))
        .fmap_ok(SessionTokens::from)
    }

    fn reissue(&self, refresh_token: &str) -> AsyncIO<ApiResult<SessionTokens>> {
        self.call::<TokenResponse>(
            Call::new(Method::POST, "/auth/reissue", Access::Public)
                .json(ReissueRequest { refresh_token }),
        )
        .fmap_ok(SessionTokens::from)
    }

    fn update_fcm_token(&self, fcm_token: &str) -> AsyncIO<ApiResult<()>> {
        self.call::<IgnoredAny>(
            Call::new(Method::PUT, "/auth/member/fcm-token", Access::Member)
                .json(FcmTokenRequest { fcm_token }),
        )
        .fmap_ok(|_| ())
    }

    fn withdraw(&self) -> AsyncIO<ApiResult<()>> {
        self.call::<IgnoredAny>(Call::new(Method::DELETE, "/auth/member", Access::Member))
            .fmap_ok(|_| ())
    }

    fn fetch_profile(&self) -> AsyncIO<ApiResult<MemberProfile>> {
        self.call(Call::new(Method::GET, "/auth/member", Access::Member))
    }

    fn fetch_jobs(&self) -> AsyncIO<ApiResult<Vec<Job>>> {
        self.call(Call::new(Method::GET, "/auth/jobs", Access::Public))
    }
}

impl DictionaryApi for RestClient {
    fn fetch_detail(&self, kind: EntityKind, id: EntityId) -> AsyncIO<ApiResult<Value>> {
        let path = format!("/dictionaries/{}s/{id}", kind.path_segment());
        self.call(Call::new(Method::GET, path, Access::Optional))
    }

    fn fetch_list(
        &self,
        kind: EntityKind,
        levels: LevelRange,
    ) -> AsyncIO<ApiResult<Vec<DictionarySummary>>> {
        let path = format!("/dictionaries/{}s", kind.path_segment());
        let mut call = Call::new(Method::GET, path, Access::Optional);
        if kind.has_level() {
            call = call
                .query("minLevel", levels.min())
                .query("maxLevel", levels.max());
        }
        self.call(call)
    }
}

impl BookmarkApi for RestClient {
    fn set_bookmark(&self, request: BookmarkRequest) -> AsyncIO<ApiResult<Option<BookmarkId>>> {
        match request {
            BookmarkRequest::Set { kind, entity_id } => {
                let call = Call::new(Method::POST, "/bookmarks", Access::Member).json(
                    BookmarkSetRequest {
                        resource_id: entity_id.value(),
                        bookmark_type: kind.bookmark_type(),
                    },
                );
                self.call::<BookmarkSetResponse>(call)
                    .fmap_ok(|response| Some(response.bookmark_id))
            }
            BookmarkRequest::Delete { bookmark_id } => self
                .call::<IgnoredAny>(Call::new(
                    Method::DELETE,
                    format!("/bookmarks/{bookmark_id}"),
                    Access::Member,
                ))
                .fmap_ok(|_| None),
        }
    }
}

impl CollectionApi for RestClient {
    fn create_collection(&self, name: &CollectionName) -> AsyncIO<ApiResult<Collection>> {
        self.call(
            Call::new(Method::POST, "/collections", Access::Member).json(CollectionRequest {
                name: name.as_str(),
            }),
        )
    }
}

impl NotificationApi for RestClient {
    fn fetch_settings(&self) -> AsyncIO<ApiResult<NotificationSettings>> {
        self.call(Call::new(Method::GET, "/notifications/settings", Access::Member))
    }

    fn update_settings(
        &self,
        settings: NotificationSettings,
    ) -> AsyncIO<ApiResult<NotificationSettings>> {
        self.call(
            Call::new(Method::PATCH, "/notifications/settings", Access::Member).json(settings),
        )
    }
}
