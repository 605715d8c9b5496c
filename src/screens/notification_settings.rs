//! Notification switches.
//!
//! A toggle is applied to state immediately and sent afterwards as the
//! whole settings object. One update runs at a time: toggles while a
//! request is in flight are ignored, so no request carries a stale copy of
//! another topic. If the update fails, the topic is flipped back and a
//! toast is shown.

use std::sync::Arc;

use crate::domain::{NotificationSettings, NotificationTopic};
use crate::errors::WorkflowError;
use crate::overlay::{Overlay, OverlayCenter};
use crate::ports::NotificationApi;
use crate::reactor::mutation::{self, MutationStream};
use crate::reactor::{Reactor, Transition};
use crate::workflows::member::{fetch_notification_settings, update_notification_settings};

const UPDATE_FAILED_MESSAGE: &str = "Could not update notification settings.";

pub struct NotificationSettingsReactor {
    notifications: Arc<dyn NotificationApi>,
    overlay: OverlayCenter,
}

impl NotificationSettingsReactor {
    #[must_use]
    pub const fn new(notifications: Arc<dyn NotificationApi>, overlay: OverlayCenter) -> Self {
        Self {
            notifications,
            overlay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSettingsAction {
    Appear,
    Toggle(NotificationTopic),
}

#[derive(Debug, Clone)]
pub enum NotificationSettingsMutation {
    Loaded(NotificationSettings),
    LoadFailed(WorkflowError),
    SetTopic {
        topic: NotificationTopic,
        enabled: bool,
    },
    SetUpdating(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotificationSettingsState {
    pub settings: NotificationSettings,
    pub is_loaded: bool,
    pub is_updating: bool,
}

#[derive(Debug, Clone)]
pub enum NotificationSettingsEvent {
    LoadFailed(WorkflowError),
}

impl Reactor for NotificationSettingsReactor {
    const NAME: &'static str = "notification_settings";

    type Action = NotificationSettingsAction;
    type Mutation = NotificationSettingsMutation;
    type State = NotificationSettingsState;
    type Event = NotificationSettingsEvent;

    fn initial_state(&self) -> NotificationSettingsState {
        NotificationSettingsState::default()
    }

    fn mutate(
        &self,
        action: NotificationSettingsAction,
        state: &NotificationSettingsState,
    ) -> MutationStream<NotificationSettingsMutation> {
        match action {
            NotificationSettingsAction::Appear => mutation::from_async_io(
                fetch_notification_settings(&self.notifications).fmap(|result| {
                    result.map_or_else(
                        NotificationSettingsMutation::LoadFailed,
                        NotificationSettingsMutation::Loaded,
                    )
                }),
            ),
            NotificationSettingsAction::Toggle(topic) => {
                if !state.is_loaded {
                    return mutation::empty();
                }
                if state.is_updating {
                    tracing::debug!(?topic, "notification update in flight, toggle ignored");
                    return mutation::empty();
                }
                let previous = state.settings.is_enabled(topic);
                let requested = state.settings.with(topic, !previous);
                let overlay = self.overlay.clone();
                let update = update_notification_settings(&self.notifications, requested);

                mutation::concat(vec![
                    mutation::just(NotificationSettingsMutation::SetTopic {
                        topic,
                        enabled: !previous,
                    }),
                    mutation::just(NotificationSettingsMutation::SetUpdating(true)),
                    mutation::and_then(update, move |result| match result {
                        Ok(_) => mutation::empty(),
                        Err(error) => {
                            tracing::warn!(?topic, %error, "notification update failed, reverting");
                            overlay.present(Overlay::toast(UPDATE_FAILED_MESSAGE));
                            mutation::just(NotificationSettingsMutation::SetTopic {
                                topic,
                                enabled: previous,
                            })
                        }
                    }),
                    mutation::just(NotificationSettingsMutation::SetUpdating(false)),
                ])
            }
        }
    }

    fn reduce(
        state: NotificationSettingsState,
        mutation: NotificationSettingsMutation,
    ) -> Transition<NotificationSettingsState, NotificationSettingsEvent> {
        match mutation {
            NotificationSettingsMutation::Loaded(settings) => {
                Transition::to(NotificationSettingsState {
                    settings,
                    is_loaded: true,
                    ..state
                })
            }
            NotificationSettingsMutation::LoadFailed(error) => {
                Transition::with_event(state, NotificationSettingsEvent::LoadFailed(error))
            }
            NotificationSettingsMutation::SetTopic { topic, enabled } => {
                Transition::to(NotificationSettingsState {
                    settings: state.settings.with(topic, enabled),
                    ..state
                })
            }
            NotificationSettingsMutation::SetUpdating(is_updating) => {
                Transition::to(NotificationSettingsState {
                    is_updating,
                    ..state
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NotificationTopic::Notice)]
    #[case(NotificationTopic::PatchNote)]
    #[case(NotificationTopic::Event)]
    fn set_topic_touches_one_switch(#[case] topic: NotificationTopic) {
        let state = NotificationSettingsState {
            settings: NotificationSettings::default(),
            is_loaded: true,
            is_updating: false,
        };

        let next = NotificationSettingsReactor::reduce(
            state,
            NotificationSettingsMutation::SetTopic {
                topic,
                enabled: true,
            },
        )
        .state;

        for other in [
            NotificationTopic::Notice,
            NotificationTopic::PatchNote,
            NotificationTopic::Event,
        ] {
            assert_eq!(next.settings.is_enabled(other), other == topic);
        }
    }
}
