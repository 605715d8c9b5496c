use std::sync::Arc;

use crate::domain::TokenKind;
use crate::effect::AsyncIO;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::ports::{AuthApi, TokenStore};

// =============================================================================
// Logout Workflow
// =============================================================================

/// Removes the local session.
///
/// Only the access / refresh deletions are checked; the FCM token deletion
/// is attempted and its result ignored. The login platform is kept.
///
/// # Errors
///
/// [`WorkflowError::Store`] when either primary deletion fails.
pub fn logout(tokens: &dyn TokenStore) -> WorkflowResult<()> {
    let access = tokens.delete_token(TokenKind::AccessToken);
    let refresh = tokens.delete_token(TokenKind::RefreshToken);
    if let Err(error) = tokens.delete_token(TokenKind::FcmToken) {
        tracing::debug!(%error, "ignoring FCM token deletion failure");
    }
    access?;
    refresh?;
    Ok(())
}

// =============================================================================
// Withdraw Workflow
// =============================================================================

/// Deletes the remote account, then every local token.
///
/// Any local deletion failure fails the workflow even though the account is
/// already gone server-side.
pub fn withdraw(
    tokens: &Arc<dyn TokenStore>,
    auth: &Arc<dyn AuthApi>,
) -> AsyncIO<WorkflowResult<()>> {
    let tokens = Arc::clone(tokens);
    auth.withdraw()
        .fmap_err(WorkflowError::from)
        .fmap(move |result| {
            result?;
            let failures: Vec<_> = TokenKind::ALL
                .into_iter()
                .filter_map(|kind| tokens.delete_token(kind).err())
                .collect();
            match failures.into_iter().next() {
                None => Ok(()),
                Some(error) => {
                    tracing::warn!(%error, "account withdrawn remotely but local cleanup failed");
                    Err(WorkflowError::from(error))
                }
            }
        })
}
