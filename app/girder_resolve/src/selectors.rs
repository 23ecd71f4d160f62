/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! The selection strategy chain. Each selector encapsulates one policy for
//! turning a component view into an artifact set; the facade tries them in
//! registration order and uses the first that applies.

mod attribute_matching;
mod default_configuration;

use std::fmt;

pub use attribute_matching::AttributeMatchingVariantSelector;
pub use attribute_matching::VariantSelectionError;
pub use default_configuration::DefaultConfigurationSelector;
use girder_core::attributes::Attributes;

use crate::artifact_set::ArtifactSet;
use crate::excludes::ExcludeSpec;
use crate::types::ArtifactTypeRegistry;
use crate::view::ComponentArtifactView;

/// One policy for producing an artifact set from a component view.
///
/// `Ok(None)` means "not applicable" and is a normal outcome used for chain
/// fallthrough, never an error. Selectors are pure with respect to their
/// inputs, except for the cache population triggered through the view.
pub trait VariantSelector: Send + Sync + fmt::Debug {
    fn select(
        &self,
        view: &ComponentArtifactView,
        types: &ArtifactTypeRegistry,
        exclusions: &ExcludeSpec,
        override_attributes: &Attributes,
    ) -> anyhow::Result<Option<ArtifactSet>>;
}
