use std::sync::Arc;

use crate::domain::{Credential, LoginPlatform, SignUpAgreements};
use crate::effect::AsyncIO;
use crate::errors::WorkflowError;
use crate::ports::{AuthApi, PlatformStore, TokenStore};
use crate::reactor::mutation::{self, MutationStream};
use crate::reactor::{Reactor, Transition};
use crate::workflows::auth::{LoginResult, login, sign_up};

/// Social login and the terms-agreement signup that may follow it.
pub struct LoginReactor {
    tokens: Arc<dyn TokenStore>,
    platforms: Arc<dyn PlatformStore>,
    auth: Arc<dyn AuthApi>,
}

impl LoginReactor {
    #[must_use]
    pub fn new(
        tokens: Arc<dyn TokenStore>,
        platforms: Arc<dyn PlatformStore>,
        auth: Arc<dyn AuthApi>,
    ) -> Self {
        Self {
            tokens,
            platforms,
            auth,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LoginAction {
    Appear,
    Login(Credential),
    SignUp(Credential, SignUpAgreements),
}

#[derive(Debug, Clone)]
pub enum LoginMutation {
    SetRecentPlatform(Option<LoginPlatform>),
    SetLoading(bool),
    LoggedIn(LoginPlatform),
    SignUpRequired(Credential),
    Failed(WorkflowError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoginState {
    /// Highlighted on the login buttons.
    pub recent_platform: Option<LoginPlatform>,
    pub is_loading: bool,
}

#[derive(Debug, Clone)]
pub enum LoginRoute {
    Home,
    /// Unregistered identity: show the terms screen, then send `SignUp`
    /// with the same credential.
    TermsAgreements {
        credential: Credential,
    },
    Error(WorkflowError),
}

impl Reactor for LoginReactor {
    const NAME: &'static str = "login";

    type Action = LoginAction;
    type Mutation = LoginMutation;
    type State = LoginState;
    type Event = LoginRoute;

    fn initial_state(&self) -> LoginState {
        LoginState::default()
    }

    fn mutate(&self, action: LoginAction, _state: &LoginState) -> MutationStream<LoginMutation> {
        match action {
            LoginAction::Appear => mutation::just(LoginMutation::SetRecentPlatform(
                self.platforms.recent_platform(),
            )),
            LoginAction::Login(credential) => {
                let request = login(&self.tokens, &self.platforms, &self.auth, credential).fmap(
                    |result| match result {
                        Ok(LoginResult::Registered(platform)) => LoginMutation::LoggedIn(platform),
                        Ok(LoginResult::SignUpRequired(credential)) => {
                            LoginMutation::SignUpRequired(credential)
                        }
                        Err(error) => LoginMutation::Failed(error),
                    },
                );
                loading(request)
            }
            LoginAction::SignUp(credential, agreements) => {
                let request = sign_up(
                    &self.tokens,
                    &self.platforms,
                    &self.auth,
                    &credential,
                    agreements,
                )
                .fmap(|result| result.map_or_else(LoginMutation::Failed, LoginMutation::LoggedIn));
                loading(request)
            }
        }
    }

    fn reduce(state: LoginState, mutation: LoginMutation) -> Transition<LoginState, LoginRoute> {
        match mutation {
            LoginMutation::SetRecentPlatform(recent_platform) => Transition::to(LoginState {
                recent_platform,
                ..state
            }),
            LoginMutation::SetLoading(is_loading) => {
                Transition::to(LoginState { is_loading, ..state })
            }
            LoginMutation::LoggedIn(platform) => Transition::with_event(
                LoginState {
                    recent_platform: Some(platform),
                    ..state
                },
                LoginRoute::Home,
            ),
            LoginMutation::SignUpRequired(credential) => {
                Transition::with_event(state, LoginRoute::TermsAgreements { credential })
            }
            LoginMutation::Failed(error) => Transition::with_event(state, LoginRoute::Error(error)),
        }
    }
}

fn loading(request: AsyncIO<LoginMutation>) -> MutationStream<LoginMutation> {
    mutation::concat(vec![
        mutation::just(LoginMutation::SetLoading(true)),
        mutation::from_async_io(request),
        mutation::just(LoginMutation::SetLoading(false)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use rstest::rstest;

    #[rstest]
    fn successful_login_routes_home_and_remembers_platform() {
        let transition = LoginReactor::reduce(
            LoginState::default(),
            LoginMutation::LoggedIn(LoginPlatform::Apple),
        );

        assert_eq!(transition.state.recent_platform, Some(LoginPlatform::Apple));
        assert!(matches!(transition.events.as_slice(), [LoginRoute::Home]));
    }

    #[rstest]
    fn signup_required_routes_to_terms_with_credential() {
        let transition = LoginReactor::reduce(
            LoginState::default(),
            LoginMutation::SignUpRequired(Credential::kakao("K")),
        );

        match transition.events.as_slice() {
            [LoginRoute::TermsAgreements { credential }] => {
                assert_eq!(credential.token(), "K");
                assert_eq!(credential.platform(), LoginPlatform::Kakao);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[rstest]
    fn failure_routes_error_without_touching_state() {
        let state = LoginState {
            recent_platform: Some(LoginPlatform::Kakao),
            is_loading: true,
        };
        let transition = LoginReactor::reduce(
            state,
            LoginMutation::Failed(WorkflowError::from(ApiError::transport("offline"))),
        );

        assert_eq!(transition.state, state);
        assert!(matches!(
            transition.events.as_slice(),
            [LoginRoute::Error(error)] if error.is_api()
        ));
    }
}
