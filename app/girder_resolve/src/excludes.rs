/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::collections::BTreeSet;
use std::sync::Arc;

use allocative::Allocative;
use dupe::Dupe;
use girder_core::artifact::ArtifactName;
use girder_core::module::ModuleIdentifier;

/// The exclusion spec shared by every caller that excludes nothing. Immutable
/// and side-effect-free, so a single constant serves the whole process.
pub const EXCLUDE_NONE: ExcludeSpec = ExcludeSpec::Nothing;

/// A pure, value-comparable exclusion predicate. Two logically-equal rule
/// sets compare and hash equal, which lets an `ExcludeSpec` participate in
/// the resolved-variant cache key.
#[derive(Clone, Dupe, Debug, PartialEq, Eq, Hash, Allocative)]
pub enum ExcludeSpec {
    Nothing,
    Modules(Arc<BTreeSet<ModuleIdentifier>>),
    Artifacts(Arc<BTreeSet<(ModuleIdentifier, String)>>),
    AnyOf(Arc<Vec<ExcludeSpec>>),
}

impl ExcludeSpec {
    pub fn modules(modules: impl IntoIterator<Item = ModuleIdentifier>) -> Self {
        Self::Modules(Arc::new(modules.into_iter().collect()))
    }

    /// Rules matching a specific artifact name within a module.
    pub fn artifacts<'a>(
        rules: impl IntoIterator<Item = (ModuleIdentifier, &'a str)>,
    ) -> Self {
        Self::Artifacts(Arc::new(
            rules
                .into_iter()
                .map(|(module, name)| (module, name.to_owned()))
                .collect(),
        ))
    }

    /// The union of several specs. Collapses `Nothing` members and avoids
    /// nesting when one spec remains.
    pub fn any_of(specs: impl IntoIterator<Item = ExcludeSpec>) -> Self {
        let mut specs: Vec<ExcludeSpec> = specs
            .into_iter()
            .filter(|spec| *spec != ExcludeSpec::Nothing)
            .collect();
        match specs.len() {
            0 => ExcludeSpec::Nothing,
            1 => specs.swap_remove(0),
            _ => ExcludeSpec::AnyOf(Arc::new(specs)),
        }
    }

    pub fn excludes_module(&self, module: &ModuleIdentifier) -> bool {
        match self {
            ExcludeSpec::Nothing => false,
            ExcludeSpec::Modules(modules) => modules.contains(module),
            ExcludeSpec::Artifacts(..) => false,
            ExcludeSpec::AnyOf(specs) => specs.iter().any(|s| s.excludes_module(module)),
        }
    }

    pub fn excludes_artifact(&self, module: &ModuleIdentifier, artifact: &ArtifactName) -> bool {
        match self {
            ExcludeSpec::Nothing => false,
            ExcludeSpec::Modules(modules) => modules.contains(module),
            ExcludeSpec::Artifacts(rules) => rules
                .iter()
                .any(|(m, name)| m == module && name == artifact.name()),
            ExcludeSpec::AnyOf(specs) => {
                specs.iter().any(|s| s.excludes_artifact(module, artifact))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hash;
    use std::hash::Hasher;

    use super::*;

    fn module(name: &str) -> ModuleIdentifier {
        ModuleIdentifier::new("com.example", name)
    }

    fn hash(spec: &ExcludeSpec) -> u64 {
        let mut hasher = DefaultHasher::new();
        spec.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_nothing_excludes_nothing() {
        assert!(!EXCLUDE_NONE.excludes_module(&module("a")));
        assert!(!EXCLUDE_NONE.excludes_artifact(&module("a"), &ArtifactName::new("a", "jar")));
    }

    #[test]
    fn test_module_exclude_covers_its_artifacts() {
        let spec = ExcludeSpec::modules([module("a")]);
        assert!(spec.excludes_module(&module("a")));
        assert!(spec.excludes_artifact(&module("a"), &ArtifactName::new("a", "jar")));
        assert!(!spec.excludes_module(&module("b")));
        assert!(!spec.excludes_artifact(&module("b"), &ArtifactName::new("b", "jar")));
    }

    #[test]
    fn test_artifact_exclude_matches_by_name() {
        let spec = ExcludeSpec::artifacts([(module("a"), "native")]);
        assert!(spec.excludes_artifact(&module("a"), &ArtifactName::new("native", "so")));
        assert!(!spec.excludes_artifact(&module("a"), &ArtifactName::new("a", "jar")));
        assert!(!spec.excludes_module(&module("a")));
    }

    #[test]
    fn test_any_of_is_a_union() {
        let spec = ExcludeSpec::any_of([
            ExcludeSpec::modules([module("a")]),
            ExcludeSpec::artifacts([(module("b"), "docs")]),
        ]);
        assert!(spec.excludes_module(&module("a")));
        assert!(spec.excludes_artifact(&module("b"), &ArtifactName::new("docs", "zip")));
        assert!(!spec.excludes_artifact(&module("b"), &ArtifactName::new("b", "jar")));
    }

    #[test]
    fn test_any_of_collapses_trivial_cases() {
        assert_eq!(ExcludeSpec::any_of([]), EXCLUDE_NONE);
        assert_eq!(
            ExcludeSpec::any_of([EXCLUDE_NONE, EXCLUDE_NONE]),
            EXCLUDE_NONE
        );
        let single = ExcludeSpec::modules([module("a")]);
        assert_eq!(
            ExcludeSpec::any_of([EXCLUDE_NONE, single.dupe()]),
            single
        );
    }

    #[test]
    fn test_equal_rule_sets_compare_and_hash_equal() {
        let a = ExcludeSpec::modules([module("x"), module("y")]);
        let b = ExcludeSpec::modules([module("y"), module("x")]);
        assert_eq!(a, b);
        assert_eq!(hash(&a), hash(&b));
    }
}
