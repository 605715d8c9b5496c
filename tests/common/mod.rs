//! Shared fakes for integration tests.
//!
//! `FakeBackend` implements every remote port against in-memory state.
//! Calls are recorded when the returned `AsyncIO` actually runs, so an
//! absent record means no request was made.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};

use companion_core::domain::{
    BookmarkId, Collection, CollectionName, Credential, DictionarySummary, EntityId, EntityKind,
    Job, LevelRange, LoginOutcome, MemberProfile, NotificationSettings, SessionTokens,
    SignUpAgreements,
};
use companion_core::effect::AsyncIO;
use companion_core::errors::ApiError;
use companion_core::infrastructure::{
    AppDependencies, InMemoryPlatformStore, InMemoryTokenStore, RemotePorts,
};
use companion_core::ports::{
    ApiResult, AuthApi, BookmarkApi, BookmarkRequest, CollectionApi, DictionaryApi,
    NotificationApi, PlatformStore, TokenStore,
};

// =============================================================================
// FakeBackend
// =============================================================================

struct State {
    login: ApiResult<LoginOutcome>,
    sign_up: ApiResult<SessionTokens>,
    reissue: ApiResult<SessionTokens>,
    fcm: ApiResult<()>,
    withdraw: ApiResult<()>,
    bookmark_failure: Option<ApiError>,
    notification_failure: Option<ApiError>,
    /// Detail fetches left before they start failing; `None` never fails.
    detail_successes: Option<usize>,
    notifications: NotificationSettings,
    details: HashMap<(EntityKind, EntityId), Value>,
    bookmarks: HashMap<(EntityKind, EntityId), BookmarkId>,
    next_bookmark_id: i64,
    next_collection_id: i64,
    latency: Duration,
    calls: Vec<String>,
    pushed_fcm_tokens: Vec<String>,
}

#[derive(Clone)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                login: Err(ApiError::transport("login not configured")),
                sign_up: Err(ApiError::transport("signup not configured")),
                reissue: Err(ApiError::status(401, "expired")),
                fcm: Ok(()),
                withdraw: Ok(()),
                bookmark_failure: None,
                notification_failure: None,
                detail_successes: None,
                notifications: NotificationSettings::default(),
                details: HashMap::new(),
                bookmarks: HashMap::new(),
                next_bookmark_id: 1,
                next_collection_id: 1,
                latency: Duration::ZERO,
                calls: Vec::new(),
                pushed_fcm_tokens: Vec::new(),
            })),
        }
    }

    pub fn with_login(self, access: &str, refresh: &str, is_register: bool) -> Self {
        self.state.lock().login = Ok(LoginOutcome {
            tokens: SessionTokens::new(access, refresh),
            is_register,
        });
        self
    }

    pub fn with_sign_up(self, access: &str, refresh: &str) -> Self {
        self.state.lock().sign_up = Ok(SessionTokens::new(access, refresh));
        self
    }

    pub fn with_reissue(self, result: ApiResult<SessionTokens>) -> Self {
        self.state.lock().reissue = result;
        self
    }

    pub fn with_fcm_result(self, result: ApiResult<()>) -> Self {
        self.state.lock().fcm = result;
        self
    }

    pub fn with_withdraw_result(self, result: ApiResult<()>) -> Self {
        self.state.lock().withdraw = result;
        self
    }

    pub fn with_latency(self, latency: Duration) -> Self {
        self.state.lock().latency = latency;
        self
    }

    pub fn with_notification_failure(self, error: ApiError) -> Self {
        self.state.lock().notification_failure = Some(error);
        self
    }

    /// Lets `successes` detail fetches through, then fails the rest offline.
    pub fn with_detail_failures_after(self, successes: usize) -> Self {
        self.state.lock().detail_successes = Some(successes);
        self
    }

    pub fn fail_bookmarks(&self, error: ApiError) {
        self.state.lock().bookmark_failure = Some(error);
    }

    /// Registers a detail document; `bookmarkId` is added by the fake.
    pub fn with_detail(self, kind: EntityKind, id: i64, document: Value) -> Self {
        self.state
            .lock()
            .details
            .insert((kind, EntityId::new(id)), document);
        self
    }

    /// Marks `(kind, id)` bookmarked under `bookmark_id`.
    pub fn with_bookmark(self, kind: EntityKind, id: i64, bookmark_id: i64) -> Self {
        {
            let mut state = self.state.lock();
            state
                .bookmarks
                .insert((kind, EntityId::new(id)), BookmarkId::new(bookmark_id));
            state.next_bookmark_id = state.next_bookmark_id.max(bookmark_id + 1);
        }
        self
    }

    pub fn bookmark_of(&self, kind: EntityKind, id: i64) -> Option<BookmarkId> {
        self.state
            .lock()
            .bookmarks
            .get(&(kind, EntityId::new(id)))
            .copied()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn pushed_fcm_tokens(&self) -> Vec<String> {
        self.state.lock().pushed_fcm_tokens.clone()
    }

    pub fn notifications(&self) -> NotificationSettings {
        self.state.lock().notifications
    }

    pub fn remote_ports(&self) -> RemotePorts {
        RemotePorts::from_client(&Arc::new(self.clone()))
    }

    pub fn auth(&self) -> Arc<dyn AuthApi> {
        Arc::new(self.clone())
    }

    pub fn dictionary(&self) -> Arc<dyn DictionaryApi> {
        Arc::new(self.clone())
    }

    pub fn bookmarks(&self) -> Arc<dyn BookmarkApi> {
        Arc::new(self.clone())
    }

    /// Runs `respond` against the state when the effect executes.
    fn respond<T, F>(&self, call: String, respond: F) -> AsyncIO<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut State) -> T + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        AsyncIO::new(move || async move {
            let latency = state.lock().latency;
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            let mut state = state.lock();
            state.calls.push(call);
            respond(&mut state)
        })
    }

    fn detail_document(state: &State, kind: EntityKind, id: EntityId) -> Option<Value> {
        let mut document = state.details.get(&(kind, id))?.clone();
        if let (Some(object), Some(bookmark_id)) =
            (document.as_object_mut(), state.bookmarks.get(&(kind, id)))
        {
            object.insert("bookmarkId".to_string(), json!(bookmark_id.value()));
        }
        Some(document)
    }
}

impl AuthApi for FakeBackend {
    fn login(&self, credential: &Credential) -> AsyncIO<ApiResult<LoginOutcome>> {
        let call = format!("login:{}:{}", credential.platform(), credential.token());
        self.respond(call, |state| state.login.clone())
    }

    fn sign_up(
        &self,
        credential: &Credential,
        agreements: SignUpAgreements,
    ) -> AsyncIO<ApiResult<SessionTokens>> {
        let call = format!(
            "sign_up:{}:{}:{}",
            credential.platform(),
            credential.token(),
            agreements.marketing_agreement
        );
        self.respond(call, |state| state.sign_up.clone())
    }

    fn reissue(&self, refresh_token: &str) -> AsyncIO<ApiResult<SessionTokens>> {
        self.respond(format!("reissue:{refresh_token}"), |state| {
            state.reissue.clone()
        })
    }

    fn update_fcm_token(&self, fcm_token: &str) -> AsyncIO<ApiResult<()>> {
        let fcm_token = fcm_token.to_string();
        self.respond(format!("fcm:{fcm_token}"), move |state| {
            let result = state.fcm.clone();
            if result.is_ok() {
                state.pushed_fcm_tokens.push(fcm_token);
            }
            result
        })
    }

    fn withdraw(&self) -> AsyncIO<ApiResult<()>> {
        self.respond("withdraw".to_string(), |state| state.withdraw.clone())
    }

    fn fetch_profile(&self) -> AsyncIO<ApiResult<MemberProfile>> {
        self.respond("profile".to_string(), |_| {
            Ok(MemberProfile {
                nickname: "mushroom".to_string(),
                level: Some(42),
                job_id: Some(3),
                platform: None,
            })
        })
    }

    fn fetch_jobs(&self) -> AsyncIO<ApiResult<Vec<Job>>> {
        self.respond("jobs".to_string(), |_| {
            Ok(vec![Job {
                id: 3,
                name: "Hermit".to_string(),
            }])
        })
    }
}

impl DictionaryApi for FakeBackend {
    fn fetch_detail(&self, kind: EntityKind, id: EntityId) -> AsyncIO<ApiResult<Value>> {
        self.respond(format!("detail:{kind}:{id}"), move |state| {
            if let Some(left) = state.detail_successes.as_mut() {
                if *left == 0 {
                    return Err(ApiError::transport("offline"));
                }
                *left -= 1;
            }
            Self::detail_document(state, kind, id)
                .ok_or_else(|| ApiError::status(404, "no entity"))
        })
    }

    fn fetch_list(
        &self,
        kind: EntityKind,
        levels: LevelRange,
    ) -> AsyncIO<ApiResult<Vec<DictionarySummary>>> {
        let call = format!("list:{kind}:{}-{}", levels.min(), levels.max());
        self.respond(call, move |state| {
            let state: &State = state;
            let mut rows: Vec<DictionarySummary> = state
                .details
                .keys()
                .filter(|(row_kind, _)| *row_kind == kind)
                .filter_map(|&(_, id)| {
                    let document = Self::detail_document(state, kind, id)?;
                    let level = document
                        .get("level")
                        .and_then(Value::as_u64)
                        .and_then(|level| u32::try_from(level).ok());
                    if level.is_some_and(|level| !levels.contains(level)) {
                        return None;
                    }
                    Some(DictionarySummary {
                        kind,
                        id,
                        name: document["name"].as_str().unwrap_or_default().to_string(),
                        level,
                        bookmark_id: state.bookmarks.get(&(kind, id)).copied(),
                    })
                })
                .collect();
            rows.sort_by_key(|row| row.id);
            Ok(rows)
        })
    }
}

impl BookmarkApi for FakeBackend {
    fn set_bookmark(&self, request: BookmarkRequest) -> AsyncIO<ApiResult<Option<BookmarkId>>> {
        self.respond(format!("bookmark:{request:?}"), move |state| {
            if let Some(error) = state.bookmark_failure.clone() {
                return Err(error);
            }
            match request {
                BookmarkRequest::Set { kind, entity_id } => {
                    let bookmark_id = BookmarkId::new(state.next_bookmark_id);
                    state.next_bookmark_id += 1;
                    state.bookmarks.insert((kind, entity_id), bookmark_id);
                    Ok(Some(bookmark_id))
                }
                BookmarkRequest::Delete { bookmark_id } => {
                    state.bookmarks.retain(|_, existing| *existing != bookmark_id);
                    Ok(None)
                }
            }
        })
    }
}

impl CollectionApi for FakeBackend {
    fn create_collection(&self, name: &CollectionName) -> AsyncIO<ApiResult<Collection>> {
        let name = name.clone();
        self.respond(format!("collection:{}", name.as_str()), move |state| {
            let id = state.next_collection_id;
            state.next_collection_id += 1;
            Ok(Collection { id, name })
        })
    }
}

impl NotificationApi for FakeBackend {
    fn fetch_settings(&self) -> AsyncIO<ApiResult<NotificationSettings>> {
        self.respond("notifications".to_string(), |state| Ok(state.notifications))
    }

    fn update_settings(
        &self,
        settings: NotificationSettings,
    ) -> AsyncIO<ApiResult<NotificationSettings>> {
        self.respond(format!("notifications:update:{settings:?}"), move |state| {
            if let Some(error) = state.notification_failure.clone() {
                return Err(error);
            }
            state.notifications = settings;
            Ok(settings)
        })
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn slime_document() -> Value {
    json!({
        "id": 100,
        "name": "Slime",
        "level": 6,
        "hitPoints": 50,
        "experience": 10
    })
}

pub fn potion_document() -> Value {
    json!({
        "id": 42,
        "name": "Red Potion",
        "requiredLevel": null,
        "category": "consumable"
    })
}

pub struct Harness {
    pub backend: FakeBackend,
    pub tokens: Arc<InMemoryTokenStore>,
    pub platforms: Arc<InMemoryPlatformStore>,
    pub dependencies: AppDependencies,
}

impl Harness {
    pub fn new(backend: FakeBackend, tokens: InMemoryTokenStore) -> Self {
        let tokens = Arc::new(tokens);
        let platforms = Arc::new(InMemoryPlatformStore::new());
        let dependencies = AppDependencies::new(
            Arc::clone(&tokens) as Arc<dyn TokenStore>,
            Arc::clone(&platforms) as Arc<dyn PlatformStore>,
            backend.remote_ports(),
        );
        Self {
            backend,
            tokens,
            platforms,
            dependencies,
        }
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.tokens) as Arc<dyn TokenStore>
    }

    pub fn platform_store(&self) -> Arc<dyn PlatformStore> {
        Arc::clone(&self.platforms) as Arc<dyn PlatformStore>
    }
}
