//! Dependency container shared by every screen.
//!
//! # Example
//!
//! ```rust,ignore
//! use companion_core::infrastructure::{AppConfig, AppDependencies};
//! use companion_core::reactor::Store;
//!
//! let dependencies = AppDependencies::from_config(&AppConfig::from_env()?)?;
//! let (splash, mut routes) = Store::spawn(dependencies.splash());
//! ```

use std::sync::Arc;

use crate::domain::{DictionaryEntity, EntityId, EntityKind};
use crate::navigation::NavigationCoordinator;
use crate::overlay::OverlayCenter;
use crate::ports::{
    AuthApi, BookmarkApi, CollectionApi, DictionaryApi, NotificationApi, PlatformStore, TokenStore,
};
use crate::relay::BookmarkRelay;
use crate::screens::{
    CollectionEditorReactor, DetailServices, DictionaryDetailReactor, DictionaryListReactor,
    LoginReactor, NotificationSettingsReactor, SplashReactor,
};

/// Remote ports, usually all backed by one client.
#[derive(Clone)]
pub struct RemotePorts {
    pub auth: Arc<dyn AuthApi>,
    pub dictionary: Arc<dyn DictionaryApi>,
    pub bookmarks: Arc<dyn BookmarkApi>,
    pub collections: Arc<dyn CollectionApi>,
    pub notifications: Arc<dyn NotificationApi>,
}

impl RemotePorts {
    /// Uses `client` for every port.
    pub fn from_client<C>(client: &Arc<C>) -> Self
    where
        C: AuthApi + DictionaryApi + BookmarkApi + CollectionApi + NotificationApi,
    {
        Self {
            auth: Arc::clone(client) as Arc<dyn AuthApi>,
            dictionary: Arc::clone(client) as Arc<dyn DictionaryApi>,
            bookmarks: Arc::clone(client) as Arc<dyn BookmarkApi>,
            collections: Arc::clone(client) as Arc<dyn CollectionApi>,
            notifications: Arc::clone(client) as Arc<dyn NotificationApi>,
        }
    }
}

/// Application dependency container.
///
/// Holds the storage and remote ports plus the app-wide channels
/// (bookmark relay, overlay centre, navigation). Cloning shares all of them.
#[derive(Clone)]
pub struct AppDependencies {
    tokens: Arc<dyn TokenStore>,
    platforms: Arc<dyn PlatformStore>,
    remote: RemotePorts,
    relay: BookmarkRelay,
    overlay: OverlayCenter,
    navigation: Arc<NavigationCoordinator>,
}

impl AppDependencies {
    #[must_use]
    pub fn new(
        tokens: Arc<dyn TokenStore>,
        platforms: Arc<dyn PlatformStore>,
        remote: RemotePorts,
    ) -> Self {
        Self {
            tokens,
            platforms,
            remote,
            relay: BookmarkRelay::new(),
            overlay: OverlayCenter::new(),
            navigation: Arc::new(NavigationCoordinator::new()),
        }
    }

    /// Production wiring: file or in-memory stores and the REST client.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    #[cfg(feature = "http")]
    pub fn from_config(config: &super::AppConfig) -> Result<Self, crate::errors::ApiError> {
        use super::{
            FilePlatformStore, FileTokenStore, InMemoryPlatformStore, InMemoryTokenStore,
            RestClient,
        };

        let (tokens, platforms): (Arc<dyn TokenStore>, Arc<dyn PlatformStore>) =
            match &config.token_store_path {
                Some(path) => (
                    Arc::new(FileTokenStore::new(path)),
                    Arc::new(FilePlatformStore::new(path.with_extension("platform"))),
                ),
                None => {
                    tracing::warn!("no token store path configured, session will not persist");
                    (
                        Arc::new(InMemoryTokenStore::new()),
                        Arc::new(InMemoryPlatformStore::new()),
                    )
                }
            };

        let client = Arc::new(RestClient::new(config, Arc::clone(&tokens))?);
        tracing::info!(base_url = client.base_url(), "dependencies ready");
        Ok(Self::new(tokens, platforms, RemotePorts::from_client(&client)))
    }

    #[must_use]
    pub const fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    #[must_use]
    pub const fn platforms(&self) -> &Arc<dyn PlatformStore> {
        &self.platforms
    }

    #[must_use]
    pub const fn remote(&self) -> &RemotePorts {
        &self.remote
    }

    #[must_use]
    pub const fn relay(&self) -> &BookmarkRelay {
        &self.relay
    }

    #[must_use]
    pub const fn overlay(&self) -> &OverlayCenter {
        &self.overlay
    }

    #[must_use]
    pub const fn navigation(&self) -> &Arc<NavigationCoordinator> {
        &self.navigation
    }

    // =========================================================================
    // Screens
    // =========================================================================

    #[must_use]
    pub fn splash(&self) -> SplashReactor {
        SplashReactor::new(Arc::clone(&self.tokens), Arc::clone(&self.remote.auth))
    }

    #[must_use]
    pub fn login(&self) -> LoginReactor {
        LoginReactor::new(
            Arc::clone(&self.tokens),
            Arc::clone(&self.platforms),
            Arc::clone(&self.remote.auth),
        )
    }

    #[must_use]
    pub fn detail<E: DictionaryEntity>(&self, id: EntityId) -> DictionaryDetailReactor<E> {
        DictionaryDetailReactor::new(
            id,
            DetailServices {
                tokens: Arc::clone(&self.tokens),
                auth: Arc::clone(&self.remote.auth),
                dictionary: Arc::clone(&self.remote.dictionary),
                bookmarks: Arc::clone(&self.remote.bookmarks),
                relay: self.relay.clone(),
            },
        )
    }

    #[must_use]
    pub fn list(&self, kind: EntityKind) -> DictionaryListReactor {
        DictionaryListReactor::new(kind, Arc::clone(&self.remote.dictionary), self.relay.clone())
    }

    #[must_use]
    pub fn collection_editor(&self) -> CollectionEditorReactor {
        CollectionEditorReactor::new(Arc::clone(&self.remote.collections))
    }

    #[must_use]
    pub fn notification_settings(&self) -> NotificationSettingsReactor {
        NotificationSettingsReactor::new(
            Arc::clone(&self.remote.notifications),
            self.overlay.clone(),
        )
    }
}

impl std::fmt::Debug for AppDependencies {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppDependencies")
            .field("navigation", &self.navigation)
            .finish_non_exhaustive()
    }
}
