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

/// A module coordinate without a version, e.g. `org.ow2.asm:asm`.
#[derive(
    Clone, Dupe, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Allocative
)]
#[display("{group}:{name}")]
pub struct ModuleIdentifier {
    group: Arc<str>,
    name: Arc<str>,
}

assert_eq_size!(ModuleIdentifier, [usize; 4]);

impl ModuleIdentifier {
    pub fn new(group: &str, name: &str) -> Self {
        Self {
            group: Arc::from(group),
            name: Arc::from(name),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A module coordinate pinned to a version, e.g. `org.ow2.asm:asm:9.6`.
#[derive(
    Clone, Dupe, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Allocative
)]
#[display("{module}:{version}")]
pub struct ModuleVersionId {
    module: ModuleIdentifier,
    version: Arc<str>,
}

impl ModuleVersionId {
    pub fn new(module: ModuleIdentifier, version: &str) -> Self {
        Self {
            module,
            version: Arc::from(version),
        }
    }

    pub fn module(&self) -> &ModuleIdentifier {
        &self.module
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}
