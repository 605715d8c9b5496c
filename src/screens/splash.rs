use std::sync::Arc;

use crate::domain::SessionPhase;
use crate::ports::{AuthApi, TokenStore};
use crate::reactor::mutation::{self, MutationStream};
use crate::reactor::{Reactor, Transition};
use crate::workflows::auth::check_login;

/// Launch screen: re-validates the stored session and routes.
pub struct SplashReactor {
    tokens: Arc<dyn TokenStore>,
    auth: Arc<dyn AuthApi>,
}

impl SplashReactor {
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenStore>, auth: Arc<dyn AuthApi>) -> Self {
        Self { tokens, auth }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashAction {
    Appear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashMutation {
    BeginCheck,
    Checked(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplashState {
    pub phase: SessionPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashRoute {
    Home,
    Login,
}

impl Reactor for SplashReactor {
    const NAME: &'static str = "splash";

    type Action = SplashAction;
    type Mutation = SplashMutation;
    type State = SplashState;
    type Event = SplashRoute;

    fn initial_state(&self) -> SplashState {
        SplashState::default()
    }

    fn mutate(
        &self,
        action: SplashAction,
        _state: &SplashState,
    ) -> MutationStream<SplashMutation> {
        match action {
            SplashAction::Appear => mutation::concat(vec![
                mutation::just(SplashMutation::BeginCheck),
                mutation::from_async_io(
                    check_login(&self.tokens, &self.auth).fmap(SplashMutation::Checked),
                ),
            ]),
        }
    }

    fn reduce(
        state: SplashState,
        mutation: SplashMutation,
    ) -> Transition<SplashState, SplashRoute> {
        match mutation {
            SplashMutation::BeginCheck => Transition::to(SplashState {
                phase: state.phase.begin_reissue(),
            }),
            SplashMutation::Checked(logged_in) => {
                let phase = state.phase.complete_reissue(logged_in);
                let route = if phase.is_logged_in() {
                    SplashRoute::Home
                } else {
                    SplashRoute::Login
                };
                Transition::with_event(SplashState { phase }, route)
            }
        }
    }
}
