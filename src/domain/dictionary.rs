//! Dictionary entities and their bookmark identity.
//!
//! Every detail response carries an optional [`BookmarkId`]; its presence is
//! the only "is bookmarked" signal. Ids are assigned by the backend and are
//! never reused or generated locally.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a dictionary entity within its [`EntityKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Server-assigned bookmark identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(i64);

impl BookmarkId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

// =============================================================================
// EntityKind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Monster,
    Item,
    Map,
    Npc,
    Quest,
}

impl EntityKind {
    pub const ALL: [Self; 5] = [Self::Monster, Self::Item, Self::Map, Self::Npc, Self::Quest];

    /// Path segment of the dictionary endpoints (`/dictionaries/{segment}s`).
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Monster => "monster",
            Self::Item => "item",
            Self::Map => "map",
            Self::Npc => "npc",
            Self::Quest => "quest",
        }
    }

    /// Value of `bookmarkType` in bookmark requests.
    #[must_use]
    pub const fn bookmark_type(self) -> &'static str {
        match self {
            Self::Monster => "MONSTER",
            Self::Item => "ITEM",
            Self::Map => "MAP",
            Self::Npc => "NPC",
            Self::Quest => "QUEST",
        }
    }

    /// Whether list filtering by level applies to this kind.
    #[must_use]
    pub const fn has_level(self) -> bool {
        matches!(self, Self::Monster | Self::Item | Self::Quest)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.path_segment())
    }
}

// =============================================================================
// DictionaryEntity
// =============================================================================

/// A bookmarkable detail payload.
pub trait DictionaryEntity:
    Clone + fmt::Debug + PartialEq + Send + Sync + DeserializeOwned + 'static
{
    const KIND: EntityKind;

    fn entity_id(&self) -> EntityId;

    fn name(&self) -> &str;

    fn bookmark_id(&self) -> Option<BookmarkId>;

    /// Returns a copy carrying `bookmark_id`.
    #[must_use]
    fn with_bookmark_id(self, bookmark_id: Option<BookmarkId>) -> Self;

    fn is_bookmarked(&self) -> bool {
        self.bookmark_id().is_some()
    }
}

macro_rules! dictionary_entity {
    ($type:ty, $kind:expr) => {
        impl DictionaryEntity for $type {
            const KIND: EntityKind = $kind;

            fn entity_id(&self) -> EntityId {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn bookmark_id(&self) -> Option<BookmarkId> {
                self.bookmark_id
            }

            fn with_bookmark_id(self, bookmark_id: Option<BookmarkId>) -> Self {
                Self {
                    bookmark_id,
                    ..self
                }
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterDetail {
    pub id: EntityId,
    pub name: String,
    pub level: u32,
    pub hit_points: u64,
    pub experience: u64,
    #[serde(default)]
    pub bookmark_id: Option<BookmarkId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub id: EntityId,
    pub name: String,
    pub required_level: Option<u32>,
    pub category: String,
    #[serde(default)]
    pub bookmark_id: Option<BookmarkId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDetail {
    pub id: EntityId,
    pub name: String,
    pub region: String,
    #[serde(default)]
    pub bookmark_id: Option<BookmarkId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcDetail {
    pub id: EntityId,
    pub name: String,
    pub map_name: Option<String>,
    #[serde(default)]
    pub bookmark_id: Option<BookmarkId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestDetail {
    pub id: EntityId,
    pub name: String,
    pub min_level: Option<u32>,
    pub max_level: Option<u32>,
    #[serde(default)]
    pub bookmark_id: Option<BookmarkId>,
}

dictionary_entity!(MonsterDetail, EntityKind::Monster);
dictionary_entity!(ItemDetail, EntityKind::Item);
dictionary_entity!(MapDetail, EntityKind::Map);
dictionary_entity!(NpcDetail, EntityKind::Npc);
dictionary_entity!(QuestDetail, EntityKind::Quest);

// =============================================================================
// DictionarySummary
// =============================================================================

/// A row on a dictionary list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionarySummary {
    pub kind: EntityKind,
    pub id: EntityId,
    pub name: String,
    pub level: Option<u32>,
    #[serde(default)]
    pub bookmark_id: Option<BookmarkId>,
}

impl DictionarySummary {
    /// Whether this row represents `(kind, id)`.
    #[must_use]
    pub fn is_entity(&self, kind: EntityKind, id: EntityId) -> bool {
        self.kind == kind && self.id == id
    }
}
