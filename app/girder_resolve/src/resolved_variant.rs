/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use allocative::Allocative;
use dupe::Dupe;
use girder_core::artifact::ComponentArtifact;
use girder_core::attributes::Attributes;
use girder_core::module::ModuleVersionId;
use girder_core::variant::VariantIdentifier;

use crate::excludes::ExcludeSpec;
use crate::resolver::ArtifactResolver;

/// A variant after exclusion filtering: its identity, its attributes, and
/// the artifacts that survived the exclusion spec baked into its cache key.
/// Produced exactly once per key and shared read-only by every requester.
#[derive(Clone, Dupe, Debug, Allocative)]
pub struct ResolvedVariant(Arc<ResolvedVariantData>);

#[derive(Debug, Allocative)]
struct ResolvedVariantData {
    identifier: VariantIdentifier,
    owner: ModuleVersionId,
    attributes: Attributes,
    artifacts: Box<[ComponentArtifact]>,
    exclusions: ExcludeSpec,
    #[allocative(skip)]
    resolver: Arc<dyn ArtifactResolver>,
}

impl ResolvedVariant {
    pub(crate) fn new(
        identifier: VariantIdentifier,
        owner: ModuleVersionId,
        attributes: Attributes,
        artifacts: Box<[ComponentArtifact]>,
        exclusions: ExcludeSpec,
        resolver: Arc<dyn ArtifactResolver>,
    ) -> Self {
        Self(Arc::new(ResolvedVariantData {
            identifier,
            owner,
            attributes,
            artifacts,
            exclusions,
            resolver,
        }))
    }

    pub fn identifier(&self) -> &VariantIdentifier {
        &self.0.identifier
    }

    pub fn owner(&self) -> &ModuleVersionId {
        &self.0.owner
    }

    pub fn attributes(&self) -> &Attributes {
        &self.0.attributes
    }

    /// The variant's artifacts minus everything the cache key's exclusion
    /// spec matched. Callers must not re-filter.
    pub fn artifacts(&self) -> &[ComponentArtifact] {
        &self.0.artifacts
    }

    /// The exclusion spec this variant was filtered through. Part of the
    /// value's identity: the same variant resolved under a different spec is
    /// a different value.
    pub fn exclusions(&self) -> &ExcludeSpec {
        &self.0.exclusions
    }

    /// The resolver to use when this variant's artifact content is
    /// eventually needed. Selection never invokes it.
    pub fn resolver(&self) -> &Arc<dyn ArtifactResolver> {
        &self.0.resolver
    }

    /// Whether two handles point at the same cached computation.
    pub fn same_instance(&self, other: &ResolvedVariant) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for ResolvedVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "variant '{}' of {}", self.0.identifier, self.0.owner)
    }
}

impl PartialEq for ResolvedVariant {
    fn eq(&self, other: &Self) -> bool {
        self.0.identifier == other.0.identifier
            && self.0.owner == other.0.owner
            && self.0.exclusions == other.0.exclusions
    }
}

impl Eq for ResolvedVariant {}

impl Hash for ResolvedVariant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.identifier.hash(state);
        self.0.owner.hash(state);
        self.0.exclusions.hash(state);
    }
}
