//! Screen reactors.
//!
//! Each screen is a [`Reactor`](crate::reactor::Reactor) run by a
//! [`Store`](crate::reactor::Store). Its collaborators are injected at
//! construction; see
//! [`AppDependencies`](crate::infrastructure::AppDependencies) for the
//! wiring used by the app.

pub mod collection_editor;
pub mod detail;
pub mod list;
pub mod login;
pub mod notification_settings;
pub mod splash;

pub use collection_editor::{
    CollectionEditorAction, CollectionEditorEvent, CollectionEditorReactor, CollectionEditorState,
};
pub use detail::{DetailAction, DetailEvent, DetailServices, DetailState, DictionaryDetailReactor};
pub use list::{DictionaryListReactor, ListAction, ListEvent, ListState};
pub use login::{LoginAction, LoginReactor, LoginRoute, LoginState};
pub use notification_settings::{
    NotificationSettingsAction, NotificationSettingsEvent, NotificationSettingsReactor,
    NotificationSettingsState,
};
pub use splash::{SplashAction, SplashReactor, SplashRoute, SplashState};
