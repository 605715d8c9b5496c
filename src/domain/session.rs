//! Session value types: token kinds, token pairs, credentials and the
//! abstract session phase.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ValidationError;

// =============================================================================
// TokenKind
// =============================================================================

/// Key under which a token is kept in the token store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    AccessToken,
    RefreshToken,
    FcmToken,
}

impl TokenKind {
    /// All kinds, in deletion order.
    pub const ALL: [Self; 3] = [Self::AccessToken, Self::RefreshToken, Self::FcmToken];

    /// Stable storage key.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
            Self::FcmToken => "fcmToken",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.storage_key())
    }
}

// =============================================================================
// SessionTokens
// =============================================================================

/// The access / refresh pair issued by the backend.
///
/// The pair is written and invalidated as one unit; see
/// [`crate::workflows::auth::save_session`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    access_token: String,
    refresh_token: String,
}

impl SessionTokens {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

// Tokens never end up in logs.
impl fmt::Debug for SessionTokens {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// LoginPlatform
// =============================================================================

/// Identity provider used for social login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginPlatform {
    Kakao,
    Apple,
}

impl LoginPlatform {
    /// Path segment used by `/auth/login/{provider}` and `/auth/signup/{provider}`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kakao => "kakao",
            Self::Apple => "apple",
        }
    }
}

impl fmt::Display for LoginPlatform {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for LoginPlatform {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "kakao" => Ok(Self::Kakao),
            "apple" => Ok(Self::Apple),
            other => Err(ValidationError::UnknownPlatform(other.to_string())),
        }
    }
}

// =============================================================================
// Credential
// =============================================================================

/// Opaque identity-provider token, consumed by a single login or signup
/// request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    platform: LoginPlatform,
}

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>, platform: LoginPlatform) -> Self {
        Self {
            token: token.into(),
            platform,
        }
    }

    #[must_use]
    pub fn kakao(token: impl Into<String>) -> Self {
        Self::new(token, LoginPlatform::Kakao)
    }

    #[must_use]
    pub fn apple(token: impl Into<String>) -> Self {
        Self::new(token, LoginPlatform::Apple)
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub const fn platform(&self) -> LoginPlatform {
        self.platform
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("platform", &self.platform)
            .finish()
    }
}

// =============================================================================
// Login / signup payloads
// =============================================================================

/// Response of the login endpoint.
///
/// `is_register == false` means the identity is unknown to the backend and the
/// user must go through signup first; the returned tokens are not usable yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub tokens: SessionTokens,
    pub is_register: bool,
}

/// Terms accepted on the signup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpAgreements {
    pub marketing_agreement: bool,
}

/// Member profile read from `/auth/member`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub nickname: String,
    pub level: Option<u32>,
    pub job_id: Option<i64>,
    pub platform: Option<LoginPlatform>,
}

/// Entry of the job list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// SessionPhase
// =============================================================================

/// Abstract per-user session state.
///
/// There is no background refresh: every check goes through
/// `PendingReissue` and lands on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    LoggedOut,
    PendingReissue,
    LoggedIn,
}

impl SessionPhase {
    /// A session check has started.
    #[must_use]
    pub const fn begin_reissue(self) -> Self {
        Self::PendingReissue
    }

    /// The check finished with `succeeded`.
    #[must_use]
    pub const fn complete_reissue(self, succeeded: bool) -> Self {
        match (self, succeeded) {
            (Self::PendingReissue, true) => Self::LoggedIn,
            (Self::PendingReissue, false) => Self::LoggedOut,
            (other, _) => other,
        }
    }

    /// Logout or withdraw.
    #[must_use]
    pub const fn end(self) -> Self {
        Self::LoggedOut
    }

    #[must_use]
    pub const fn is_logged_in(self) -> bool {
        matches!(self, Self::LoggedIn)
    }
}
