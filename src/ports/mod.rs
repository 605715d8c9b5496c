//! Port definitions consumed by the workflows.
//!
//! Storage ports are synchronous (they mirror a keychain-style key/value
//! contract). Remote ports return [`AsyncIO`] descriptions so workflows can
//! be composed before anything hits the network.

use serde_json::Value;

use crate::domain::{
    BookmarkId, Collection, CollectionName, Credential, DictionarySummary, EntityId, EntityKind,
    Job, LevelRange, LoginOutcome, LoginPlatform, MemberProfile, NotificationSettings,
    SessionTokens, SignUpAgreements, TokenKind,
};
use crate::effect::AsyncIO;
use crate::errors::{ApiError, StoreError};

/// Result of a remote call.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// TokenStore
// =============================================================================

/// Secure key/value storage for session tokens.
///
/// There is no locking at this level: last write wins, and callers
/// serialize access. Deleting a missing key succeeds.
pub trait TokenStore: Send + Sync + 'static {
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when nothing is stored for `kind`.
    fn fetch_token(&self, kind: TokenKind) -> Result<String, StoreError>;

    /// # Errors
    ///
    /// [`StoreError::Write`] when the backend rejects the write.
    fn save_token(&self, kind: TokenKind, value: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// [`StoreError::Delete`] when the backend rejects the deletion.
    fn delete_token(&self, kind: TokenKind) -> Result<(), StoreError>;
}

// =============================================================================
// PlatformStore
// =============================================================================

/// Remembers the most recent login platform. Independent of the token
/// lifecycle: logout leaves it in place.
pub trait PlatformStore: Send + Sync + 'static {
    fn recent_platform(&self) -> Option<LoginPlatform>;

    /// # Errors
    ///
    /// [`StoreError::Write`] when the value cannot be persisted.
    fn save_platform(&self, platform: LoginPlatform) -> Result<(), StoreError>;
}

// =============================================================================
// AuthApi
// =============================================================================

pub trait AuthApi: Send + Sync + 'static {
    /// `POST /auth/login/{provider}`
    fn login(&self, credential: &Credential) -> AsyncIO<ApiResult<LoginOutcome>>;

    /// `POST /auth/signup/{provider}`
    fn sign_up(
        &self,
        credential: &Credential,
        agreements: SignUpAgreements,
    ) -> AsyncIO<ApiResult<SessionTokens>>;

    /// `POST /auth/reissue`
    fn reissue(&self, refresh_token: &str) -> AsyncIO<ApiResult<SessionTokens>>;

    /// `PUT /auth/member/fcm-token`
    fn update_fcm_token(&self, fcm_token: &str) -> AsyncIO<ApiResult<()>>;

    /// `DELETE /auth/member`
    fn withdraw(&self) -> AsyncIO<ApiResult<()>>;

    /// `GET /auth/member`
    fn fetch_profile(&self) -> AsyncIO<ApiResult<MemberProfile>>;

    /// `GET /auth/jobs`
    fn fetch_jobs(&self) -> AsyncIO<ApiResult<Vec<Job>>>;
}

// =============================================================================
// DictionaryApi
// =============================================================================

pub trait DictionaryApi: Send + Sync + 'static {
    /// Raw detail document; the caller decodes it into the concrete entity.
    fn fetch_detail(&self, kind: EntityKind, id: EntityId) -> AsyncIO<ApiResult<Value>>;

    fn fetch_list(
        &self,
        kind: EntityKind,
        levels: LevelRange,
    ) -> AsyncIO<ApiResult<Vec<DictionarySummary>>>;
}

// =============================================================================
// BookmarkApi
// =============================================================================

/// Bookmark mutation sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkRequest {
    /// Bookmark `(kind, entity_id)`; the backend assigns a fresh id.
    Set { kind: EntityKind, entity_id: EntityId },
    /// Remove an existing bookmark.
    Delete { bookmark_id: BookmarkId },
}

pub trait BookmarkApi: Send + Sync + 'static {
    /// Returns the new bookmark id: `Some` after `Set`, `None` after `Delete`.
    fn set_bookmark(&self, request: BookmarkRequest) -> AsyncIO<ApiResult<Option<BookmarkId>>>;
}

// =============================================================================
// CollectionApi / NotificationApi
// =============================================================================

pub trait CollectionApi: Send + Sync + 'static {
    fn create_collection(&self, name: &CollectionName) -> AsyncIO<ApiResult<Collection>>;
}

pub trait NotificationApi: Send + Sync + 'static {
    fn fetch_settings(&self) -> AsyncIO<ApiResult<NotificationSettings>>;

    fn update_settings(
        &self,
        settings: NotificationSettings,
    ) -> AsyncIO<ApiResult<NotificationSettings>>;
}
