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
use derive_more::Display;
use dupe::Dupe;

/// One origin of a module descriptor (a repository, a metadata file). Opaque
/// to the selection core.
#[derive(Clone, Dupe, Debug, Display, PartialEq, Eq, Hash, Allocative)]
#[display("{_0}")]
pub struct ModuleSource(Arc<str>);

impl ModuleSource {
    pub fn new(descriptor: &str) -> Self {
        Self(Arc::from(descriptor))
    }
}

/// The ordered set of origins a component's metadata was assembled from.
/// Value-comparable so it can be part of a cache key.
#[derive(Clone, Dupe, Debug, PartialEq, Eq, Hash, Allocative)]
pub struct ModuleSources(Arc<Vec<ModuleSource>>);

impl ModuleSources {
    pub fn new(sources: impl IntoIterator<Item = ModuleSource>) -> Self {
        Self(Arc::new(sources.into_iter().collect()))
    }

    pub fn empty() -> Self {
        Self::new([])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleSource> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ModuleSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, source) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{source}")?;
        }
        write!(f, "]")
    }
}
