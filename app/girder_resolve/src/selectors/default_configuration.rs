/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use girder_core::attributes::Attributes;
use tracing::trace;

use crate::artifact_set::ArtifactSet;
use crate::excludes::ExcludeSpec;
use crate::selectors::VariantSelector;
use crate::types::ArtifactTypeRegistry;
use crate::view::ComponentArtifactView;

/// Legacy fallback: uses the requested configuration's artifacts as-is,
/// without attribute matching. Always applies, which makes it the chain's
/// terminal selector; a component with zero variants legitimately selects an
/// empty set here rather than failing.
#[derive(Debug, Default)]
pub struct DefaultConfigurationSelector;

impl VariantSelector for DefaultConfigurationSelector {
    fn select(
        &self,
        view: &ComponentArtifactView,
        _types: &ArtifactTypeRegistry,
        _exclusions: &ExcludeSpec,
        override_attributes: &Attributes,
    ) -> anyhow::Result<Option<ArtifactSet>> {
        let resolved = view.resolved_variants()?;
        trace!(
            component = %view.component_id(),
            variants = resolved.len(),
            "selected default configuration"
        );
        Ok(Some(ArtifactSet::from_variants(
            resolved,
            view.attributes().merge(override_attributes),
        )))
    }
}
