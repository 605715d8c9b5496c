//! Wire shapes of the companion backend (camelCase JSON).

use serde::{Deserialize, Serialize};

use crate::domain::{BookmarkId, LoginOutcome, SessionTokens};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest<'a> {
    pub token: &'a str,
    pub marketing_agreement: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FcmTokenRequest<'a> {
    pub fcm_token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkSetRequest {
    pub resource_id: i64,
    pub bookmark_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CollectionRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenResponse> for SessionTokens {
    fn from(response: TokenResponse) -> Self {
        Self::new(response.access_token, response.refresh_token)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub is_register: bool,
}

impl From<LoginResponse> for LoginOutcome {
    fn from(response: LoginResponse) -> Self {
        Self {
            tokens: SessionTokens::new(response.access_token, response.refresh_token),
            is_register: response.is_register,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkSetResponse {
    pub bookmark_id: BookmarkId,
}

/// Body of a non-success response, when the backend sends one.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}
