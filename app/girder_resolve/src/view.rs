/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::sync::Arc;

use girder_core::attributes::Attributes;
use girder_core::attributes::AttributesSchema;
use girder_core::component::ComponentId;
use girder_core::component::ComponentMetadata;
use girder_core::module::ModuleVersionId;
use girder_core::sources::ModuleSources;
use girder_core::variant::VariantMetadata;
use indexmap::IndexSet;

use crate::excludes::ExcludeSpec;
use crate::resolved_variant::ResolvedVariant;
use crate::resolver::ArtifactResolver;
use crate::variant_cache::ResolvedVariantCache;

/// The narrow, read-only slice of a component that a variant selector is
/// allowed to see: identity, sources, schema, and the resolved variants of
/// the requested variant set. Holds its collaborators explicitly; nothing is
/// captured implicitly from the facade.
pub struct ComponentArtifactView {
    component: Arc<dyn ComponentMetadata>,
    requested_variants: Vec<Arc<dyn VariantMetadata>>,
    exclusions: ExcludeSpec,
    cache: Arc<ResolvedVariantCache>,
    resolver: Arc<dyn ArtifactResolver>,
}

impl ComponentArtifactView {
    pub fn new(
        component: Arc<dyn ComponentMetadata>,
        requested_variants: Vec<Arc<dyn VariantMetadata>>,
        exclusions: ExcludeSpec,
        cache: Arc<ResolvedVariantCache>,
        resolver: Arc<dyn ArtifactResolver>,
    ) -> Self {
        Self {
            component,
            requested_variants,
            exclusions,
            cache,
            resolver,
        }
    }

    pub fn component_id(&self) -> &ComponentId {
        self.component.id()
    }

    pub fn module_version_id(&self) -> &ModuleVersionId {
        self.component.module_version_id()
    }

    pub fn sources(&self) -> &ModuleSources {
        self.component.sources()
    }

    pub fn attributes(&self) -> &Attributes {
        self.component.attributes()
    }

    pub fn schema(&self) -> &Arc<dyn AttributesSchema> {
        self.component.schema()
    }

    /// Whether any requested variant carries attributes, i.e. the component
    /// advertises variant-aware metadata rather than a bare legacy
    /// configuration.
    pub fn has_attribute_tagged_variants(&self) -> bool {
        self.requested_variants
            .iter()
            .any(|variant| !variant.attributes().is_empty())
    }

    /// Resolves every requested variant through the cache. Set semantics:
    /// variants that collapse to the same identity appear once. Repeated
    /// calls are idempotent; later calls hit the now-populated cache.
    pub fn resolved_variants(&self) -> anyhow::Result<IndexSet<ResolvedVariant>> {
        let mut resolved = IndexSet::with_capacity(self.requested_variants.len());
        for variant in &self.requested_variants {
            resolved.insert(self.cache.get_or_compute(
                variant.as_ref(),
                self.component.module_version_id(),
                self.component.sources(),
                &self.exclusions,
                &self.resolver,
            )?);
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use dupe::Dupe;
    use girder_core::artifact::ArtifactName;
    use girder_core::artifact::ComponentArtifact;
    use girder_core::component::testing::TestComponent;
    use girder_core::variant::testing::TestVariant;

    use super::*;
    use crate::excludes::EXCLUDE_NONE;
    use crate::resolver::testing::TestResolver;
    use crate::variant_cache::VariantCacheError;

    fn artifact(name: &str) -> ComponentArtifact {
        ComponentArtifact::new(
            ComponentId::new("com.example:lib:1.0"),
            ArtifactName::new(name, "jar").with_extension("jar"),
        )
    }

    fn view_over(variants: Vec<Arc<dyn VariantMetadata>>) -> ComponentArtifactView {
        ComponentArtifactView::new(
            Arc::new(TestComponent::new("com.example", "lib", "1.0")),
            variants,
            EXCLUDE_NONE,
            Arc::new(ResolvedVariantCache::new()),
            Arc::new(TestResolver::new("maven")),
        )
    }

    #[test]
    fn test_duplicate_identities_collapse() {
        let view = view_over(vec![
            Arc::new(TestVariant::new("api", vec![artifact("a")])),
            Arc::new(TestVariant::new("api", vec![artifact("a")])),
            Arc::new(TestVariant::new("runtime", vec![artifact("b")])),
        ]);

        let resolved = view.resolved_variants().unwrap();
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_repeated_access_is_idempotent() {
        let variant = Arc::new(TestVariant::new("api", vec![artifact("a")]));
        let view = view_over(vec![variant.dupe() as Arc<dyn VariantMetadata>]);

        let first = view.resolved_variants().unwrap();
        let second = view.resolved_variants().unwrap();

        assert_eq!(first, second);
        assert!(first[0].same_instance(&second[0]));
        assert_eq!(variant.artifact_reads(), 1);
    }

    #[test]
    fn test_missing_identifier_is_fatal() {
        let view = view_over(vec![
            Arc::new(TestVariant::new("api", vec![artifact("a")])),
            Arc::new(TestVariant::unidentified(vec![artifact("b")])),
        ]);

        let err = view.resolved_variants().unwrap_err();
        assert_matches!(
            err.downcast_ref::<VariantCacheError>(),
            Some(VariantCacheError::MissingVariantIdentifier(..))
        );
    }

    #[test]
    fn test_attribute_tagged_detection() {
        use girder_core::attributes::Attributes;

        let legacy = view_over(vec![Arc::new(TestVariant::new("default", vec![]))]);
        assert!(!legacy.has_attribute_tagged_variants());

        let tagged = view_over(vec![Arc::new(
            TestVariant::new("api", vec![]).with_attributes(Attributes::of([("usage", "api")])),
        )]);
        assert!(tagged.has_attribute_tagged_variants());
    }
}
