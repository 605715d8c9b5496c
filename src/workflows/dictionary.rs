use std::sync::Arc;

use crate::domain::{DictionaryEntity, DictionarySummary, EntityId, EntityKind, LevelRange};
use crate::effect::AsyncIO;
use crate::errors::{ApiError, WorkflowError, WorkflowResult};
use crate::ports::DictionaryApi;

/// Fetches and decodes one detail entity.
pub fn fetch_detail<E: DictionaryEntity>(
    dictionary: &Arc<dyn DictionaryApi>,
    id: EntityId,
) -> AsyncIO<WorkflowResult<E>> {
    dictionary
        .fetch_detail(E::KIND, id)
        .fmap(move |result| {
            let document = result?;
            serde_json::from_value::<E>(document).map_err(|error| {
                tracing::warn!(kind = %E::KIND, %id, %error, "undecodable detail document");
                ApiError::Decode(error.to_string())
            })
        })
        .fmap_err(WorkflowError::from)
}

/// Fetches the list rows of `kind` inside `levels`.
pub fn fetch_list(
    dictionary: &Arc<dyn DictionaryApi>,
    kind: EntityKind,
    levels: LevelRange,
) -> AsyncIO<WorkflowResult<Vec<DictionarySummary>>> {
    dictionary
        .fetch_list(kind, levels)
        .fmap_err(WorkflowError::from)
}
