/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::sync::Arc;

use dupe::Dupe;
use girder_core::artifact::ComponentArtifact;
use girder_core::attributes::Attributes;
use girder_core::component::ComponentId;
use girder_core::component::ComponentMetadata;
use girder_core::variant::VariantMetadata;
use thiserror::Error;
use tracing::trace;

use crate::artifact_set::ArtifactSet;
use crate::artifact_set::FileDependency;
use crate::excludes::EXCLUDE_NONE;
use crate::excludes::ExcludeSpec;
use crate::resolver::ArtifactResolver;
use crate::selectors::AttributeMatchingVariantSelector;
use crate::selectors::DefaultConfigurationSelector;
use crate::selectors::VariantSelector;
use crate::types::ArtifactTypeRegistry;
use crate::variant_cache::ResolvedVariantCache;
use crate::view::ComponentArtifactView;

#[derive(Debug, Error)]
pub enum ArtifactSelectionError {
    /// Every registered selector declined. The chain was assembled without a
    /// terminal selector; an internal defect, distinct from any resolution
    /// failure a collaborator can raise.
    #[error("no artifacts selected for {0}")]
    NoArtifactsSelected(ComponentId),
}

/// Entry point for artifact selection. Owns the ordered selector chain, the
/// resolved-variant cache, the artifact type registry and the resolver, all
/// scoped to one resolution session.
pub struct ArtifactSelector {
    selectors: Vec<Arc<dyn VariantSelector>>,
    types: Arc<ArtifactTypeRegistry>,
    resolver: Arc<dyn ArtifactResolver>,
    cache: Arc<ResolvedVariantCache>,
}

impl ArtifactSelector {
    pub fn new(
        selectors: Vec<Arc<dyn VariantSelector>>,
        resolver: Arc<dyn ArtifactResolver>,
        types: Arc<ArtifactTypeRegistry>,
        cache: Arc<ResolvedVariantCache>,
    ) -> Self {
        Self {
            selectors,
            types,
            resolver,
            cache,
        }
    }

    /// The standard chain: attribute matching first, legacy default
    /// configuration as the terminal fallback.
    pub fn with_default_chain(
        resolver: Arc<dyn ArtifactResolver>,
        types: Arc<ArtifactTypeRegistry>,
        cache: Arc<ResolvedVariantCache>,
    ) -> Self {
        Self::new(
            vec![
                Arc::new(AttributeMatchingVariantSelector),
                Arc::new(DefaultConfigurationSelector),
            ],
            resolver,
            types,
            cache,
        )
    }

    /// Selects the artifacts of a local file dependency. Always succeeds;
    /// file dependencies see neither variants, nor the cache, nor exclusion
    /// filtering, and their type normalization is deferred until first read.
    pub fn select_for_file_dependency(&self, dependency: FileDependency) -> ArtifactSet {
        ArtifactSet::file_dependency(dependency, self.types.dupe())
    }

    /// Selects the artifacts of a resolved graph component: wraps it in a
    /// view scoped to `exclusions` and the requested variant set, then walks
    /// the selector chain in order and returns the first result.
    pub fn select_for_component(
        &self,
        component: &Arc<dyn ComponentMetadata>,
        requested_variants: &[Arc<dyn VariantMetadata>],
        exclusions: &ExcludeSpec,
        override_attributes: &Attributes,
    ) -> anyhow::Result<ArtifactSet> {
        let view = ComponentArtifactView::new(
            component.dupe(),
            requested_variants.to_vec(),
            exclusions.dupe(),
            self.cache.dupe(),
            self.resolver.dupe(),
        );
        for selector in &self.selectors {
            trace!(component = %component.id(), selector = ?selector, "trying selector");
            if let Some(artifacts) =
                selector.select(&view, &self.types, exclusions, override_attributes)?
            {
                return Ok(artifacts);
            }
        }
        Err(ArtifactSelectionError::NoArtifactsSelected(component.id().dupe()).into())
    }

    /// Selects a caller-supplied artifact list directly, using the
    /// component's own sources and attributes and exclude-nothing semantics.
    /// Bypasses variant selection and the cache entirely.
    pub fn select_explicit(
        &self,
        component: &Arc<dyn ComponentMetadata>,
        artifacts: Vec<ComponentArtifact>,
        override_attributes: &Attributes,
    ) -> ArtifactSet {
        ArtifactSet::ad_hoc(
            component.id().dupe(),
            component.sources().dupe(),
            artifacts,
            component.attributes().merge(override_attributes),
            EXCLUDE_NONE,
            self.resolver.dupe(),
        )
    }
}
