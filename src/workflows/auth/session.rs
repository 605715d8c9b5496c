use std::sync::Arc;

use crate::domain::{SessionTokens, TokenKind};
use crate::effect::AsyncIO;
use crate::errors::{StoreError, WorkflowError, WorkflowResult};
use crate::ports::{AuthApi, TokenStore};

// =============================================================================
// Session persistence [Store]
// =============================================================================

/// Writes the access / refresh pair as one unit.
///
/// The store has no transactions, so the pair is written access first. If
/// either write fails the whole save fails and the caller must treat the
/// stored pair as invalid.
///
/// # Errors
///
/// The first [`StoreError`] encountered.
pub fn save_session(store: &dyn TokenStore, tokens: &SessionTokens) -> Result<(), StoreError> {
    store.save_token(TokenKind::AccessToken, tokens.access_token())?;
    store.save_token(TokenKind::RefreshToken, tokens.refresh_token())?;
    Ok(())
}

/// Reads the refresh token, treating a missing or empty value as absent.
fn stored_refresh_token(store: &dyn TokenStore) -> Option<String> {
    match store.fetch_token(TokenKind::RefreshToken) {
        Ok(token) if !token.is_empty() => Some(token),
        Ok(_) => None,
        Err(error) => {
            if !error.is_not_found() {
                tracing::debug!(%error, "refresh token unreadable");
            }
            None
        }
    }
}

// =============================================================================
// Reissue Workflow
// =============================================================================

/// Exchanges `refresh_token` for a new pair and persists it.
///
/// Unlike [`check_login`], a persistence failure is reported as
/// [`WorkflowError::DataConversion`]: callers invoke this as an explicit
/// retry and need to know it failed.
pub fn reissue(
    tokens: &Arc<dyn TokenStore>,
    auth: &Arc<dyn AuthApi>,
    refresh_token: &str,
) -> AsyncIO<WorkflowResult<SessionTokens>> {
    let tokens = Arc::clone(tokens);
    auth.reissue(refresh_token)
        .fmap_err(WorkflowError::from)
        .fmap(move |result| {
            let issued = result?;
            save_session(tokens.as_ref(), &issued).map_err(WorkflowError::data_conversion)?;
            Ok(issued)
        })
}

// =============================================================================
// CheckLogin Workflow
// =============================================================================

/// Re-validates the stored session.
///
/// Total from the caller's point of view: every failure (no refresh token,
/// network, persistence) resolves to `false`. An empty or missing refresh
/// token short-circuits without a network call.
pub fn check_login(tokens: &Arc<dyn TokenStore>, auth: &Arc<dyn AuthApi>) -> AsyncIO<bool> {
    let tokens = Arc::clone(tokens);
    let auth = Arc::clone(auth);
    AsyncIO::new(move || async move {
        let Some(refresh_token) = stored_refresh_token(tokens.as_ref()) else {
            return false;
        };

        reissue(&tokens, &auth, &refresh_token)
            .fmap_ok(|_| true)
            .recover(|error| {
                tracing::info!(%error, "session check failed, treating as logged out");
                false
            })
            .run_async()
            .await
    })
}
