//! Catalog search with priority fallback across search-capable connectors.

use macrolens_types::{MacrolensError, SeriesMetadata};

use crate::Macrolens;
use crate::core::tag_err;

impl Macrolens {
    /// Search provider catalogs for series matching a free-text query.
    ///
    /// Connectors are tried in priority order; the first successful result
    /// wins and is truncated to `limit`.
    ///
    /// # Errors
    /// `NotSupported` when no connector can search, `NotFound` when every
    /// connector searched and found nothing, `AllProvidersFailed` otherwise.
    pub async fn search_series(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SeriesMetadata>, MacrolensError> {
        let mut attempted_any = false;
        let mut errors: Vec<MacrolensError> = Vec::new();

        for c in self.ordered() {
            let Some(provider) = c.as_series_search_provider() else {
                continue;
            };
            attempted_any = true;
            match Self::provider_call_with_timeout(
                c.name(),
                "series_search",
                self.cfg.provider_timeout,
                provider.search(query, limit),
            )
            .await
            {
                Ok(mut found) => {
                    found.truncate(limit);
                    return Ok(found);
                }
                Err(e @ MacrolensError::NotFound { .. }) => errors.push(e),
                Err(e) => errors.push(tag_err(c.name(), e)),
            }
        }

        if !attempted_any {
            return Err(MacrolensError::not_supported("series_search"));
        }
        if errors
            .iter()
            .all(|e| matches!(e, MacrolensError::NotFound { .. }))
        {
            return Err(MacrolensError::not_found(format!(
                "series matching {query:?}"
            )));
        }
        Err(MacrolensError::AllProvidersFailed(errors))
    }
}
