/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use dupe::Dupe;
use girder_core::attributes::Attributes;
use girder_core::module::ModuleVersionId;
use indexmap::IndexSet;
use thiserror::Error;
use tracing::trace;

use crate::artifact_set::ArtifactSet;
use crate::excludes::ExcludeSpec;
use crate::resolved_variant::ResolvedVariant;
use crate::selectors::VariantSelector;
use crate::types::ArtifactTypeRegistry;
use crate::view::ComponentArtifactView;

#[derive(Debug, Error)]
pub enum VariantSelectionError {
    /// The component is variant-aware but no variant satisfies the request.
    /// Raised on behalf of the schema service; unlike an exhausted selector
    /// chain this is a resolution failure, not an internal defect.
    #[error("no variant of {0} is compatible with requested attributes {1}")]
    NoCompatibleVariant(ModuleVersionId, Attributes),
}

/// Selects among attribute-tagged variants by asking the component's schema
/// which of them satisfy the override-merged request attributes. Declines
/// for components that only advertise a bare legacy configuration.
#[derive(Debug, Default)]
pub struct AttributeMatchingVariantSelector;

impl VariantSelector for AttributeMatchingVariantSelector {
    fn select(
        &self,
        view: &ComponentArtifactView,
        _types: &ArtifactTypeRegistry,
        _exclusions: &ExcludeSpec,
        override_attributes: &Attributes,
    ) -> anyhow::Result<Option<ArtifactSet>> {
        if !view.has_attribute_tagged_variants() {
            return Ok(None);
        }

        let requested = view.attributes().merge(override_attributes);
        let resolved = view.resolved_variants()?;
        let schema = view.schema();

        let compatible: Vec<ResolvedVariant> = resolved
            .iter()
            .filter(|variant| schema.matches(&requested, variant.attributes()))
            .cloned()
            .collect();
        if compatible.is_empty() {
            return Err(VariantSelectionError::NoCompatibleVariant(
                view.module_version_id().dupe(),
                requested,
            )
            .into());
        }

        let chosen: IndexSet<ResolvedVariant> = if compatible.len() > 1 {
            let candidates: Vec<&Attributes> =
                compatible.iter().map(|v| v.attributes()).collect();
            let keep = schema.disambiguate(&requested, &candidates);
            compatible
                .iter()
                .enumerate()
                .filter(|(i, _)| keep.contains(i))
                .map(|(_, v)| v.clone())
                .collect()
        } else {
            compatible.into_iter().collect()
        };

        trace!(
            component = %view.component_id(),
            variants = chosen.len(),
            "matched attribute-tagged variants"
        );
        Ok(Some(ArtifactSet::from_variants(chosen, requested)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use girder_core::artifact::ArtifactName;
    use girder_core::artifact::ComponentArtifact;
    use girder_core::component::ComponentId;
    use girder_core::component::testing::TestComponent;
    use girder_core::variant::VariantMetadata;
    use girder_core::variant::testing::TestVariant;

    use super::*;
    use crate::excludes::EXCLUDE_NONE;
    use crate::resolver::testing::TestResolver;
    use crate::variant_cache::ResolvedVariantCache;

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

    fn select(
        view: &ComponentArtifactView,
        overrides: &Attributes,
    ) -> anyhow::Result<Option<ArtifactSet>> {
        AttributeMatchingVariantSelector.select(
            view,
            &ArtifactTypeRegistry::new(),
            &EXCLUDE_NONE,
            overrides,
        )
    }

    #[test]
    fn test_declines_legacy_metadata() {
        let view = view_over(vec![Arc::new(TestVariant::new(
            "default",
            vec![artifact("a")],
        ))]);
        assert!(select(&view, &Attributes::default()).unwrap().is_none());
    }

    #[test]
    fn test_picks_the_compatible_variant() {
        let view = view_over(vec![
            Arc::new(
                TestVariant::new("api", vec![artifact("api")])
                    .with_attributes(Attributes::of([("usage", "api")])),
            ),
            Arc::new(
                TestVariant::new("runtime", vec![artifact("runtime")])
                    .with_attributes(Attributes::of([("usage", "runtime")])),
            ),
        ]);

        let set = select(&view, &Attributes::of([("usage", "runtime")]))
            .unwrap()
            .unwrap();
        let variants = set.unpack_from_variants().unwrap().variants();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].identifier().as_str(), "runtime");
    }

    #[test]
    fn test_no_compatible_variant_is_a_failure() {
        let view = view_over(vec![Arc::new(
            TestVariant::new("api", vec![artifact("api")])
                .with_attributes(Attributes::of([("usage", "api")])),
        )]);

        let err = select(&view, &Attributes::of([("usage", "runtime")])).unwrap_err();
        assert_matches!(
            err.downcast_ref::<VariantSelectionError>(),
            Some(VariantSelectionError::NoCompatibleVariant(..))
        );
    }

    #[test]
    fn test_multiple_compatible_variants_survive_default_disambiguation() {
        let view = view_over(vec![
            Arc::new(
                TestVariant::new("linux", vec![artifact("linux")])
                    .with_attributes(Attributes::of([("os", "linux")])),
            ),
            Arc::new(
                TestVariant::new("macos", vec![artifact("macos")])
                    .with_attributes(Attributes::of([("os", "macos")])),
            ),
        ]);

        // The request constrains nothing, so both variants are compatible and
        // the default disambiguation keeps them all.
        let set = select(&view, &Attributes::default()).unwrap().unwrap();
        assert_eq!(set.unpack_from_variants().unwrap().variants().len(), 2);
        assert_eq!(set.artifacts().len(), 2);
    }
}
