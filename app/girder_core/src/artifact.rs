/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::fmt;
use std::sync::Arc;

use allocative::Allocative;
use dupe::Dupe;

use crate::component::ComponentId;

/// An Ivy-style artifact coordinate: name, kind (a.k.a. type), optional
/// extension and classifier.
#[derive(Clone, Dupe, Debug, PartialEq, Eq, Hash, Allocative)]
pub struct ArtifactName {
    name: Arc<str>,
    kind: Arc<str>,
    extension: Option<Arc<str>>,
    classifier: Option<Arc<str>>,
}

impl ArtifactName {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: Arc::from(name),
            kind: Arc::from(kind),
            extension: None,
            classifier: None,
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = Some(Arc::from(extension));
        self
    }

    pub fn with_classifier(mut self, classifier: &str) -> Self {
        self.classifier = Some(Arc::from(classifier));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(classifier) = &self.classifier {
            write!(f, "-{classifier}")?;
        }
        if let Some(extension) = &self.extension {
            write!(f, ".{extension}")?;
        }
        Ok(())
    }
}

/// An artifact advertised by a component's metadata. Immutable value; the
/// artifact's content is resolved later, and elsewhere.
#[derive(Clone, Dupe, Debug, PartialEq, Eq, Hash, Allocative)]
pub struct ComponentArtifact {
    owner: ComponentId,
    name: ArtifactName,
}

impl ComponentArtifact {
    pub fn new(owner: ComponentId, name: ArtifactName) -> Self {
        Self { owner, name }
    }

    pub fn owner(&self) -> &ComponentId {
        &self.owner
    }

    pub fn name(&self) -> &ArtifactName {
        &self.name
    }
}

impl fmt::Display for ComponentArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.owner)
    }
}
