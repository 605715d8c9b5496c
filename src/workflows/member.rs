//! Collection and notification-setting workflows.

use std::sync::Arc;

use crate::domain::{Collection, CollectionName, NotificationSettings};
use crate::effect::AsyncIO;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::ports::{CollectionApi, NotificationApi};

/// Validates `raw_name` locally, then creates the collection.
///
/// An invalid name never reaches the network.
pub fn create_collection(
    collections: &Arc<dyn CollectionApi>,
    raw_name: &str,
) -> AsyncIO<WorkflowResult<Collection>> {
    match CollectionName::new(raw_name) {
        Ok(name) => collections
            .create_collection(&name)
            .fmap_err(WorkflowError::from),
        Err(error) => AsyncIO::pure(Err(WorkflowError::from(error))),
    }
}

pub fn fetch_notification_settings(
    notifications: &Arc<dyn NotificationApi>,
) -> AsyncIO<WorkflowResult<NotificationSettings>> {
    notifications.fetch_settings().fmap_err(WorkflowError::from)
}

pub fn update_notification_settings(
    notifications: &Arc<dyn NotificationApi>,
    settings: NotificationSettings,
) -> AsyncIO<WorkflowResult<NotificationSettings>> {
    notifications
        .update_settings(settings)
        .fmap_err(WorkflowError::from)
}
