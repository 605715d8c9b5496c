use std::sync::Arc;

use crate::domain::{Job, MemberProfile, TokenKind};
use crate::effect::AsyncIO;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::ports::{AuthApi, TokenStore};

/// Pushes the locally cached FCM token to the backend, if there is one.
///
/// Never fails: a push failure is logged and swallowed so it cannot block
/// login or signup completion.
pub(crate) fn push_cached_fcm_token(
    tokens: &Arc<dyn TokenStore>,
    auth: &Arc<dyn AuthApi>,
) -> AsyncIO<()> {
    let tokens = Arc::clone(tokens);
    let auth = Arc::clone(auth);
    AsyncIO::new(move || async move {
        let fcm_token = match tokens.fetch_token(TokenKind::FcmToken) {
            Ok(token) if !token.is_empty() => token,
            _ => return,
        };
        if let Err(error) = auth.update_fcm_token(&fcm_token).run_async().await {
            tracing::warn!(%error, "failed to push FCM token, continuing");
        }
    })
}

/// Caches a freshly issued FCM token and forwards it to the backend when a
/// session exists.
///
/// # Errors
///
/// Local persistence failures surface as [`WorkflowError::Store`]; backend
/// failures as [`WorkflowError::Api`].
pub fn update_fcm_token(
    tokens: &Arc<dyn TokenStore>,
    auth: &Arc<dyn AuthApi>,
    fcm_token: impl Into<String>,
) -> AsyncIO<WorkflowResult<()>> {
    let tokens = Arc::clone(tokens);
    let auth = Arc::clone(auth);
    let fcm_token = fcm_token.into();
    AsyncIO::new(move || async move {
        tokens.save_token(TokenKind::FcmToken, &fcm_token)?;
        let has_session = tokens
            .fetch_token(TokenKind::AccessToken)
            .is_ok_and(|token| !token.is_empty());
        if !has_session {
            tracing::debug!("no session yet, FCM token cached for the next login");
            return Ok(());
        }
        auth.update_fcm_token(&fcm_token)
            .run_async()
            .await
            .map_err(WorkflowError::from)
    })
}

pub fn fetch_profile(auth: &Arc<dyn AuthApi>) -> AsyncIO<WorkflowResult<MemberProfile>> {
    auth.fetch_profile().fmap_err(WorkflowError::from)
}

pub fn fetch_jobs(auth: &Arc<dyn AuthApi>) -> AsyncIO<WorkflowResult<Vec<Job>>> {
    auth.fetch_jobs().fmap_err(WorkflowError::from)
}
