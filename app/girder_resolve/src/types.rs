/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::collections::BTreeMap;

use allocative::Allocative;
use girder_core::artifact::ArtifactName;
use girder_core::attributes::Attributes;

/// Attribute key carrying an artifact's normalized type classification.
pub const ARTIFACT_TYPE_ATTRIBUTE: &str = "artifactType";

/// Pure lookup service mapping raw artifact names to normalized type
/// attributes. Assembled once by the embedding engine, read-only afterwards.
#[derive(Debug, Default, Allocative)]
pub struct ArtifactTypeRegistry {
    mappings: BTreeMap<String, Attributes>,
}

impl ArtifactTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the attributes implied by an artifact type classification
    /// (keyed by extension, falling back to kind at lookup time).
    pub fn register(&mut self, classification: &str, attributes: Attributes) {
        self.mappings.insert(classification.to_owned(), attributes);
    }

    pub fn map_attributes_for(&self, artifact: &ArtifactName) -> Attributes {
        let classification = artifact.extension().unwrap_or_else(|| artifact.kind());
        match self.mappings.get(classification) {
            Some(attributes) => attributes.merge(&Attributes::of([(
                ARTIFACT_TYPE_ATTRIBUTE,
                classification,
            )])),
            None => Attributes::of([(ARTIFACT_TYPE_ATTRIBUTE, classification)]),
        }
    }
}
