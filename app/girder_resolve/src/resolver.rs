/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use allocative::Allocative;
use derive_more::Display;
use dupe::Dupe;
use girder_core::artifact::ComponentArtifact;
use girder_core::sources::ModuleSources;

/// Identity of an [`ArtifactResolver`], used as a cache-key component so
/// variants resolved through different resolvers never alias.
#[derive(Clone, Dupe, Debug, Display, PartialEq, Eq, Hash, Allocative)]
#[display("{_0}")]
pub struct ResolverId(Arc<str>);

impl ResolverId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }
}

/// Resolves an artifact's content location. Opaque to the selection core:
/// selection stores the resolver with each resolved variant and leaves the
/// actual (possibly blocking) lookup to the variant's eventual consumers.
pub trait ArtifactResolver: Send + Sync + fmt::Debug {
    fn id(&self) -> &ResolverId;

    fn locate(
        &self,
        artifact: &ComponentArtifact,
        sources: &ModuleSources,
    ) -> anyhow::Result<PathBuf>;
}

pub mod testing {
    use std::path::PathBuf;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use girder_core::artifact::ComponentArtifact;
    use girder_core::sources::ModuleSources;

    use super::ArtifactResolver;
    use super::ResolverId;

    /// Resolver stub producing synthetic paths; counts `locate` calls so
    /// tests can assert that selection itself never resolves content.
    #[derive(Debug)]
    pub struct TestResolver {
        id: ResolverId,
        locate_calls: AtomicUsize,
    }

    impl TestResolver {
        pub fn new(id: &str) -> Self {
            Self {
                id: ResolverId::new(id),
                locate_calls: AtomicUsize::new(0),
            }
        }

        pub fn locate_calls(&self) -> usize {
            self.locate_calls.load(Ordering::SeqCst)
        }
    }

    impl ArtifactResolver for TestResolver {
        fn id(&self) -> &ResolverId {
            &self.id
        }

        fn locate(
            &self,
            artifact: &ComponentArtifact,
            _sources: &ModuleSources,
        ) -> anyhow::Result<PathBuf> {
            self.locate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(PathBuf::from(format!("repo/{}", artifact.name())))
        }
    }
}
