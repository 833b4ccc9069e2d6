//! Partial-update engine: existence-gated conditional merge of a sparse
//! field set into an existing record.

use crate::error::{Error, Result};
use crate::record::Patch;
use crate::store::TaskStore;

/// Merge `patch` into the record identified by `pk`.
///
/// Performs one point lookup and, when the record exists, one conditional
/// write. The write re-asserts existence atomically; a record deleted
/// between the lookup and the write comes back as `Error::NotFound`, the
/// same outcome the lookup produces. Patch validity (non-empty, no `pk`)
/// is enforced by `Patch` construction before this function is reachable.
pub async fn apply_partial_update(store: &dyn TaskStore, pk: &str, patch: &Patch) -> Result<()> {
    if pk.is_empty() {
        return Err(Error::validation("pk must be non-empty"));
    }

    if store.get_task(pk).await?.is_none() {
        return Err(Error::NotFound {
            pk: pk.to_string(),
        });
    }

    store.update_task(pk, patch).await
}
