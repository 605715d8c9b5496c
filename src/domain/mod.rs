//! Domain types shared by every layer.
//!
//! - [`session`]: token kinds, token pairs, credentials, session phase
//! - [`dictionary`]: dictionary entities and bookmark identity
//! - [`validation`]: inputs validated before they reach the network
//! - [`notification`]: notification settings and collections

pub mod dictionary;
pub mod notification;
pub mod session;
pub mod validation;

pub use dictionary::{
    BookmarkId, DictionaryEntity, DictionarySummary, EntityId, EntityKind, ItemDetail, MapDetail,
    MonsterDetail, NpcDetail, QuestDetail,
};
pub use notification::{Collection, NotificationSettings, NotificationTopic};
pub use session::{
    Credential, Job, LoginOutcome, LoginPlatform, MemberProfile, SessionPhase, SessionTokens,
    SignUpAgreements, TokenKind,
};
pub use validation::{CollectionName, LevelRange, ValidationError};
