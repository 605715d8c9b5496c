use std::sync::Arc;

use crate::domain::{Credential, LoginOutcome, LoginPlatform, SessionTokens, SignUpAgreements};
use crate::effect::AsyncIO;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::ports::{AuthApi, PlatformStore, TokenStore};

use super::member::push_cached_fcm_token;
use super::session::save_session;

/// What the login screen does next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    /// Tokens are persisted; the user is in.
    Registered(LoginPlatform),
    /// Unknown identity: continue to terms agreement and signup with the
    /// same credential. Nothing was persisted.
    SignUpRequired(Credential),
}

// =============================================================================
// Step: Persist Session [Store]
// =============================================================================

fn persist_session(
    tokens: &Arc<dyn TokenStore>,
    issued: &SessionTokens,
) -> WorkflowResult<()> {
    save_session(tokens.as_ref(), issued).map_err(|error| {
        tracing::error!(%error, "failed to persist session tokens");
        WorkflowError::data_conversion(error)
    })
}

// =============================================================================
// Step: Remember Platform [Store, best effort]
// =============================================================================

fn remember_platform(platforms: &Arc<dyn PlatformStore>, platform: LoginPlatform) {
    if let Err(error) = platforms.save_platform(platform) {
        tracing::warn!(%error, %platform, "failed to remember login platform");
    }
}

// =============================================================================
// Step: Complete Session [IO]
// =============================================================================

/// Persist tokens, then push the cached FCM token, then mark the platform.
///
/// Only the first step can fail the workflow.
fn complete_session(
    tokens: Arc<dyn TokenStore>,
    platforms: Arc<dyn PlatformStore>,
    auth: Arc<dyn AuthApi>,
    issued: &SessionTokens,
    platform: LoginPlatform,
) -> AsyncIO<WorkflowResult<()>> {
    if let Err(error) = persist_session(&tokens, issued) {
        return AsyncIO::pure(Err(error));
    }
    push_cached_fcm_token(&tokens, &auth).fmap(move |()| {
        remember_platform(&platforms, platform);
        Ok(())
    })
}

// =============================================================================
// Login Workflow
// =============================================================================

/// Logs in with a social credential (`LoginWithKakao` / `LoginWithApple`,
/// selected by the credential's platform).
pub fn login(
    tokens: &Arc<dyn TokenStore>,
    platforms: &Arc<dyn PlatformStore>,
    auth: &Arc<dyn AuthApi>,
    credential: Credential,
) -> AsyncIO<WorkflowResult<LoginResult>> {
    let tokens = Arc::clone(tokens);
    let platforms = Arc::clone(platforms);
    let auth_for_session = Arc::clone(auth);

    auth.login(&credential)
        .fmap_err(WorkflowError::from)
        .flat_map_ok(move |outcome: LoginOutcome| {
            let platform = credential.platform();
            if !outcome.is_register {
                tracing::debug!(%platform, "identity not registered, signup required");
                return AsyncIO::pure(Ok(LoginResult::SignUpRequired(credential)));
            }
            complete_session(tokens, platforms, auth_for_session, &outcome.tokens, platform)
                .fmap_ok(move |()| LoginResult::Registered(platform))
        })
}

// =============================================================================
// SignUp Workflow
// =============================================================================

/// Registers a new account (`SignUpWithKakao` / `SignUpWithApple`) and
/// starts its session.
pub fn sign_up(
    tokens: &Arc<dyn TokenStore>,
    platforms: &Arc<dyn PlatformStore>,
    auth: &Arc<dyn AuthApi>,
    credential: &Credential,
    agreements: SignUpAgreements,
) -> AsyncIO<WorkflowResult<LoginPlatform>> {
    let tokens = Arc::clone(tokens);
    let platforms = Arc::clone(platforms);
    let auth_for_session = Arc::clone(auth);
    let platform = credential.platform();

    auth.sign_up(credential, agreements)
        .fmap_err(WorkflowError::from)
        .flat_map_ok(move |issued| {
            complete_session(tokens, platforms, auth_for_session, &issued, platform)
                .fmap_ok(move |()| platform)
        })
}
