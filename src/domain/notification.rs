//! Notification settings and collections.

use serde::{Deserialize, Serialize};

use crate::domain::CollectionName;

/// Push notification topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationTopic {
    Notice,
    PatchNote,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub notice: bool,
    pub patch_note: bool,
    pub event: bool,
}

impl NotificationSettings {
    #[must_use]
    pub const fn is_enabled(self, topic: NotificationTopic) -> bool {
        match topic {
            NotificationTopic::Notice => self.notice,
            NotificationTopic::PatchNote => self.patch_note,
            NotificationTopic::Event => self.event,
        }
    }

    #[must_use]
    pub const fn with(self, topic: NotificationTopic, enabled: bool) -> Self {
        match topic {
            NotificationTopic::Notice => Self {
                notice: enabled,
                ..self
            },
            NotificationTopic::PatchNote => Self {
                patch_note: enabled,
                ..self
            },
            NotificationTopic::Event => Self {
                event: enabled,
                ..self
            },
        }
    }
}

/// A named group of bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: i64,
    pub name: CollectionName,
}
