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

use crate::attributes::Attributes;
use crate::attributes::AttributesSchema;
use crate::module::ModuleVersionId;
use crate::sources::ModuleSources;

/// Opaque identity of a resolved dependency-graph node.
#[derive(Clone, Dupe, Debug, Display, PartialEq, Eq, Hash, Allocative)]
#[display("{_0}")]
pub struct ComponentId(Arc<str>);

impl ComponentId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The slice of a resolved component's metadata the selection core reads.
/// Produced by the upstream metadata-loading subsystem; immutable.
pub trait ComponentMetadata: Send + Sync {
    fn id(&self) -> &ComponentId;

    fn module_version_id(&self) -> &ModuleVersionId;

    fn sources(&self) -> &ModuleSources;

    fn attributes(&self) -> &Attributes;

    fn schema(&self) -> &Arc<dyn AttributesSchema>;
}

pub mod testing {
    use std::sync::Arc;

    use super::ComponentId;
    use super::ComponentMetadata;
    use crate::attributes::Attributes;
    use crate::attributes::AttributesSchema;
    use crate::attributes::testing::ConsistentAttributesSchema;
    use crate::module::ModuleIdentifier;
    use crate::module::ModuleVersionId;
    use crate::sources::ModuleSource;
    use crate::sources::ModuleSources;

    #[derive(Debug)]
    pub struct TestComponent {
        id: ComponentId,
        module_version: ModuleVersionId,
        sources: ModuleSources,
        attributes: Attributes,
        schema: Arc<dyn AttributesSchema>,
    }

    impl TestComponent {
        pub fn new(group: &str, name: &str, version: &str) -> Self {
            let module_version =
                ModuleVersionId::new(ModuleIdentifier::new(group, name), version);
            Self {
                id: ComponentId::new(&module_version.to_string()),
                module_version,
                sources: ModuleSources::new([ModuleSource::new("test-repo")]),
                attributes: Attributes::default(),
                schema: Arc::new(ConsistentAttributesSchema),
            }
        }

        pub fn with_attributes(mut self, attributes: Attributes) -> Self {
            self.attributes = attributes;
            self
        }

        pub fn with_schema(mut self, schema: Arc<dyn AttributesSchema>) -> Self {
            self.schema = schema;
            self
        }
    }

    impl ComponentMetadata for TestComponent {
        fn id(&self) -> &ComponentId {
            &self.id
        }

        fn module_version_id(&self) -> &ModuleVersionId {
            &self.module_version
        }

        fn sources(&self) -> &ModuleSources {
            &self.sources
        }

        fn attributes(&self) -> &Attributes {
            &self.attributes
        }

        fn schema(&self) -> &Arc<dyn AttributesSchema> {
            &self.schema
        }
    }
}
