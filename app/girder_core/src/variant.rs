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
use derive_more::Display;
use dupe::Dupe;
use static_assertions::assert_eq_size;

use crate::artifact::ComponentArtifact;
use crate::attributes::Attributes;

/// The identity of a variant within its component. Metadata is allowed to
/// omit it (see [`VariantMetadata::identifier`]), but selection rejects such
/// variants before they can reach the resolved-variant cache.
#[derive(Clone, Dupe, Debug, Display, PartialEq, Eq, Hash, Allocative)]
#[display("{_0}")]
pub struct VariantIdentifier(Arc<str>);

assert_eq_size!(VariantIdentifier, [usize; 2]);

impl VariantIdentifier {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One variant (a.k.a. configuration) of a component, as advertised by its
/// metadata. Owned by the metadata-loading subsystem; never mutated here.
pub trait VariantMetadata: Send + Sync {
    fn identifier(&self) -> Option<&VariantIdentifier>;

    fn attributes(&self) -> &Attributes;

    fn artifacts(&self) -> &[ComponentArtifact];
}

pub mod testing {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::VariantIdentifier;
    use super::VariantMetadata;
    use crate::artifact::ComponentArtifact;
    use crate::attributes::Attributes;

    /// In-memory variant for tests. Counts how often its artifact list is
    /// read, which is once per cache computation.
    #[derive(Debug)]
    pub struct TestVariant {
        identifier: Option<VariantIdentifier>,
        attributes: Attributes,
        artifacts: Vec<ComponentArtifact>,
        artifact_reads: AtomicUsize,
    }

    impl TestVariant {
        pub fn new(name: &str, artifacts: Vec<ComponentArtifact>) -> Self {
            Self {
                identifier: Some(VariantIdentifier::new(name)),
                attributes: Attributes::default(),
                artifacts,
                artifact_reads: AtomicUsize::new(0),
            }
        }

        pub fn unidentified(artifacts: Vec<ComponentArtifact>) -> Self {
            Self {
                identifier: None,
                attributes: Attributes::default(),
                artifacts,
                artifact_reads: AtomicUsize::new(0),
            }
        }

        pub fn with_attributes(mut self, attributes: Attributes) -> Self {
            self.attributes = attributes;
            self
        }

        pub fn artifact_reads(&self) -> usize {
            self.artifact_reads.load(Ordering::SeqCst)
        }
    }

    impl VariantMetadata for TestVariant {
        fn identifier(&self) -> Option<&VariantIdentifier> {
            self.identifier.as_ref()
        }

        fn attributes(&self) -> &Attributes {
            &self.attributes
        }

        fn artifacts(&self) -> &[ComponentArtifact] {
            self.artifact_reads.fetch_add(1, Ordering::SeqCst);
            &self.artifacts
        }
    }
}
