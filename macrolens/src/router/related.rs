//! Related-series discovery over a provider's tag graph.
//!
//! Discovery is decoration, never a gate: any failure along the pipeline
//! degrades to an empty result instead of erroring the caller.

use std::collections::HashSet;

use macrolens_core::connector::TagDiscoveryProvider;
use macrolens_types::RelatedSeries;
use tracing::debug;

use crate::Macrolens;
use crate::resolver;

/// Most popular tags of the origin series considered as seeds.
const SEED_TAG_LIMIT: usize = 5;
/// Related tags kept from the seed expansion.
const RELATED_TAG_LIMIT: usize = 3;
/// Candidates requested from the provider before local filtering.
const CANDIDATE_LIMIT: usize = 20;
/// Final result cap.
const RESULT_LIMIT: usize = 15;
/// Candidates below this popularity score are dropped.
const MIN_POPULARITY: i64 = 0;

impl Macrolens {
    /// Discover series related to the given identifier through provider tags.
    ///
    /// Walks the first tag-capable connector in priority order: seed tags of
    /// the origin series, expansion to related tags, then a candidate fetch
    /// filtered against the origin and ranked by popularity. Returns an
    /// empty vector when no connector supports tags or any step fails.
    pub async fn related_series(&self, series_id: &str) -> Vec<RelatedSeries> {
        let identity = resolver::resolve(series_id);
        for c in self.ordered() {
            let Some(provider) = c.as_tag_discovery_provider() else {
                continue;
            };
            match self
                .discover_related(c.name(), provider, &identity.canonical_id)
                .await
            {
                Ok(found) => return found,
                Err(e) => {
                    debug!(series = %identity.canonical_id, connector = c.name(), error = %e, "related-series discovery failed");
                }
            }
        }
        Vec::new()
    }

    async fn discover_related(
        &self,
        name: &'static str,
        provider: &dyn TagDiscoveryProvider,
        series_id: &str,
    ) -> Result<Vec<RelatedSeries>, macrolens_types::MacrolensError> {
        let timeout = self.cfg.provider_timeout;

        let mut seeds = Self::provider_call_with_timeout(
            name,
            "series_tags",
            timeout,
            provider.series_tags(series_id),
        )
        .await?;
        seeds.sort_by_key(|t| std::cmp::Reverse(t.popularity));
        seeds.truncate(SEED_TAG_LIMIT);
        if seeds.is_empty() {
            return Ok(Vec::new());
        }
        let seed_names: Vec<String> = seeds.into_iter().map(|t| t.name).collect();

        let mut related = Self::provider_call_with_timeout(
            name,
            "related_tags",
            timeout,
            provider.related_tags(&seed_names),
        )
        .await?;
        related.sort_by_key(|t| std::cmp::Reverse(t.popularity));
        related.truncate(RELATED_TAG_LIMIT);
        if related.is_empty() {
            return Ok(Vec::new());
        }
        let query: Vec<String> = related.into_iter().map(|t| t.name).collect();

        let candidates = Self::provider_call_with_timeout(
            name,
            "series_for_tags",
            timeout,
            provider.series_for_tags(&query, CANDIDATE_LIMIT),
        )
        .await?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut out: Vec<RelatedSeries> = candidates
            .into_iter()
            .filter(|s| {
                s.id != series_id && s.popularity >= MIN_POPULARITY && seen.insert(s.id.clone())
            })
            .collect();
        out.sort_by(|x, y| {
            y.popularity
                .cmp(&x.popularity)
                .then_with(|| x.id.cmp(&y.id))
        });
        out.truncate(RESULT_LIMIT);
        Ok(out)
    }
}
