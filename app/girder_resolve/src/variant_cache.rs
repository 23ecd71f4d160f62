/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::sync::Arc;

use allocative::Allocative;
use dashmap::DashMap;
use dupe::Dupe;
use girder_core::module::ModuleVersionId;
use girder_core::sources::ModuleSources;
use girder_core::variant::VariantIdentifier;
use girder_core::variant::VariantMetadata;
use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::debug;

use crate::excludes::ExcludeSpec;
use crate::resolved_variant::ResolvedVariant;
use crate::resolver::ArtifactResolver;
use crate::resolver::ResolverId;

#[derive(Debug, Error)]
pub enum VariantCacheError {
    /// Upstream metadata construction is broken; never recoverable.
    #[error("variant of {0} has no identifier")]
    MissingVariantIdentifier(ModuleVersionId),
}

#[derive(Clone, Dupe, Debug, PartialEq, Eq, Hash, Allocative)]
struct VariantCacheKey {
    variant: VariantIdentifier,
    owner: ModuleVersionId,
    sources: ModuleSources,
    exclusions: ExcludeSpec,
    resolver: ResolverId,
}

/// Concurrent memo table for resolved variants. Lives for one resolution
/// session; never evicts. Requests for distinct keys proceed independently,
/// while requests for the same key collapse into a single computation whose
/// result every caller shares.
#[derive(Default)]
pub struct ResolvedVariantCache {
    map: DashMap<VariantCacheKey, Arc<OnceCell<ResolvedVariant>>>,
}

impl ResolvedVariantCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the resolved variant for the given key, computing it if this
    /// is the first request. Computation filters the variant's artifacts
    /// through `exclusions`; the filter is applied here, once, and never by
    /// callers.
    pub fn get_or_compute(
        &self,
        variant: &dyn VariantMetadata,
        owner: &ModuleVersionId,
        sources: &ModuleSources,
        exclusions: &ExcludeSpec,
        resolver: &Arc<dyn ArtifactResolver>,
    ) -> anyhow::Result<ResolvedVariant> {
        let identifier = variant
            .identifier()
            .ok_or_else(|| VariantCacheError::MissingVariantIdentifier(owner.dupe()))?;

        let key = VariantCacheKey {
            variant: identifier.dupe(),
            owner: owner.dupe(),
            sources: sources.dupe(),
            exclusions: exclusions.dupe(),
            resolver: resolver.id().dupe(),
        };

        // The shard lock is held only long enough to install the cell; the
        // computation itself runs under the cell's own per-key exclusion.
        let cell = self.map.entry(key).or_default().dupe();
        let resolved = cell.get_or_init(|| {
            debug!(variant = %identifier, owner = %owner, "computing resolved variant");
            let artifacts = variant
                .artifacts()
                .iter()
                .filter(|artifact| {
                    !exclusions.excludes_artifact(owner.module(), artifact.name())
                })
                .cloned()
                .collect();
            ResolvedVariant::new(
                identifier.dupe(),
                owner.dupe(),
                variant.attributes().dupe(),
                artifacts,
                exclusions.dupe(),
                resolver.dupe(),
            )
        });
        Ok(resolved.dupe())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use assert_matches::assert_matches;
    use girder_core::artifact::ArtifactName;
    use girder_core::artifact::ComponentArtifact;
    use girder_core::component::ComponentId;
    use girder_core::module::ModuleIdentifier;
    use girder_core::sources::ModuleSource;
    use girder_core::variant::testing::TestVariant;

    use super::*;
    use crate::excludes::EXCLUDE_NONE;
    use crate::resolver::testing::TestResolver;

    fn owner() -> ModuleVersionId {
        ModuleVersionId::new(ModuleIdentifier::new("com.example", "lib"), "1.0")
    }

    fn artifact(name: &str) -> ComponentArtifact {
        ComponentArtifact::new(
            ComponentId::new("com.example:lib:1.0"),
            ArtifactName::new(name, "jar").with_extension("jar"),
        )
    }

    fn resolver() -> Arc<dyn ArtifactResolver> {
        Arc::new(TestResolver::new("maven"))
    }

    fn sources() -> ModuleSources {
        ModuleSources::new([ModuleSource::new("test-repo")])
    }

    #[test]
    fn test_exclusion_filtering() {
        let cache = ResolvedVariantCache::new();
        let variant = TestVariant::new(
            "runtime",
            vec![artifact("a"), artifact("b"), artifact("c")],
        );
        let exclusions = ExcludeSpec::artifacts([(ModuleIdentifier::new(
            "com.example",
            "lib",
        ), "b")]);

        let resolved = cache
            .get_or_compute(&variant, &owner(), &sources(), &exclusions, &resolver())
            .unwrap();

        assert_eq!(resolved.artifacts(), &[artifact("a"), artifact("c")]);
    }

    #[test]
    fn test_single_computation_per_key() {
        let cache = ResolvedVariantCache::new();
        let variant = TestVariant::new("runtime", vec![artifact("a")]);
        let resolver = resolver();

        let first = cache
            .get_or_compute(&variant, &owner(), &sources(), &EXCLUDE_NONE, &resolver)
            .unwrap();
        let second = cache
            .get_or_compute(&variant, &owner(), &sources(), &EXCLUDE_NONE, &resolver)
            .unwrap();

        assert!(first.same_instance(&second));
        assert_eq!(variant.artifact_reads(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_exclusions_are_distinct_keys() {
        let cache = ResolvedVariantCache::new();
        let variant = TestVariant::new("runtime", vec![artifact("a"), artifact("b")]);
        let resolver = resolver();
        let excl = ExcludeSpec::artifacts([(ModuleIdentifier::new("com.example", "lib"), "b")]);

        let unfiltered = cache
            .get_or_compute(&variant, &owner(), &sources(), &EXCLUDE_NONE, &resolver)
            .unwrap();
        let filtered = cache
            .get_or_compute(&variant, &owner(), &sources(), &excl, &resolver)
            .unwrap();

        assert!(!unfiltered.same_instance(&filtered));
        assert_eq!(unfiltered.artifacts().len(), 2);
        assert_eq!(filtered.artifacts().len(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_distinct_exclusions_yield_distinct_values() {
        let cache = ResolvedVariantCache::new();
        let variant = TestVariant::new("runtime", vec![artifact("a"), artifact("b")]);
        let resolver = resolver();
        let excl = ExcludeSpec::artifacts([(ModuleIdentifier::new("com.example", "lib"), "b")]);

        let unfiltered = cache
            .get_or_compute(&variant, &owner(), &sources(), &EXCLUDE_NONE, &resolver)
            .unwrap();
        let filtered = cache
            .get_or_compute(&variant, &owner(), &sources(), &excl, &resolver)
            .unwrap();

        // Same variant identity, but the value identity tracks the exclusion
        // spec: a set holds both, with their differing artifact lists intact.
        assert_ne!(unfiltered, filtered);
        let set: indexmap::IndexSet<ResolvedVariant> =
            [unfiltered.dupe(), filtered.dupe()].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(unfiltered.exclusions(), &EXCLUDE_NONE);
        assert_eq!(filtered.exclusions(), &excl);
    }

    #[test]
    fn test_missing_identifier_fails_fast() {
        let cache = ResolvedVariantCache::new();
        let variant = TestVariant::unidentified(vec![artifact("a")]);

        let err = cache
            .get_or_compute(&variant, &owner(), &sources(), &EXCLUDE_NONE, &resolver())
            .unwrap_err();

        assert_matches!(
            err.downcast_ref::<VariantCacheError>(),
            Some(VariantCacheError::MissingVariantIdentifier(..))
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_requests_share_one_computation() {
        let cache = Arc::new(ResolvedVariantCache::new());
        let variant = Arc::new(TestVariant::new("runtime", vec![artifact("a")]));
        let resolver = resolver();

        let threads = 16;
        let barrier = Arc::new(Barrier::new(threads));
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let cache = cache.dupe();
                let variant = variant.dupe();
                let resolver = resolver.dupe();
                let barrier = barrier.dupe();
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_compute(
                            &*variant,
                            &owner(),
                            &sources(),
                            &EXCLUDE_NONE,
                            &resolver,
                        )
                        .unwrap()
                })
            })
            .collect();

        let results: Vec<ResolvedVariant> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        for result in &results[1..] {
            assert!(results[0].same_instance(result));
        }
        assert_eq!(variant.artifact_reads(), 1);
        assert_eq!(cache.len(), 1);
    }
}
