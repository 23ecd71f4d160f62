/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use dupe::Dupe;
use gazebo::variants::UnpackVariants;
use girder_core::artifact::ArtifactName;
use girder_core::artifact::ComponentArtifact;
use girder_core::attributes::Attributes;
use girder_core::calculated::CalculatedValue;
use girder_core::component::ComponentId;
use girder_core::sources::ModuleSources;
use indexmap::IndexSet;

use crate::excludes::ExcludeSpec;
use crate::resolved_variant::ResolvedVariant;
use crate::resolver::ArtifactResolver;
use crate::types::ArtifactTypeRegistry;

/// A local file dependency: files that participate in resolution without any
/// component metadata behind them.
#[derive(Clone, Dupe, Debug, PartialEq, Eq, Hash)]
pub struct FileDependency {
    files: Arc<Vec<PathBuf>>,
}

impl FileDependency {
    pub fn new(files: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            files: Arc::new(files.into_iter().collect()),
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// An artifact backed directly by a local file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileArtifact {
    path: PathBuf,
    name: ArtifactName,
    attributes: Attributes,
}

impl FileArtifact {
    fn from_path(path: &Path, types: &ArtifactTypeRegistry) -> Self {
        let stem = path
            .file_stem()
            .map_or_else(|| path.to_string_lossy().into_owned(), |s| {
                s.to_string_lossy().into_owned()
            });
        let extension = path.extension().map(|e| e.to_string_lossy().into_owned());
        let mut name = ArtifactName::new(&stem, extension.as_deref().unwrap_or("file"));
        if let Some(extension) = &extension {
            name = name.with_extension(extension);
        }
        let attributes = types.map_attributes_for(&name);
        Self {
            path: path.to_owned(),
            name,
            attributes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &ArtifactName {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// One artifact of a selection result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectedArtifact {
    Component(ComponentArtifact),
    File(FileArtifact),
}

/// The artifacts ultimately usable for one selection. Which variant of this
/// enum a caller gets depends on the entry point that produced it; all of
/// them enumerate their artifacts through [`ArtifactSet::artifacts`].
#[derive(Debug, UnpackVariants)]
pub enum ArtifactSet {
    /// A local file dependency. Bypasses variants, the cache and exclusion
    /// filtering; its artifacts materialize lazily, once.
    FileDependency(FileDependencyArtifactSet),
    /// The artifacts of one or more resolved (exclusion-filtered) variants.
    FromVariants(VariantArtifactSet),
    /// A caller-supplied explicit artifact list with exclude-nothing
    /// semantics.
    AdHoc(AdHocArtifactSet),
}

impl ArtifactSet {
    pub(crate) fn file_dependency(
        dependency: FileDependency,
        types: Arc<ArtifactTypeRegistry>,
    ) -> Self {
        let files = dependency.dupe();
        Self::FileDependency(FileDependencyArtifactSet {
            dependency,
            artifacts: CalculatedValue::new(move || {
                files
                    .files()
                    .iter()
                    .map(|path| FileArtifact::from_path(path, &types))
                    .collect()
            }),
        })
    }

    pub(crate) fn from_variants(
        variants: IndexSet<ResolvedVariant>,
        requested: Attributes,
    ) -> Self {
        Self::FromVariants(VariantArtifactSet {
            variants,
            requested,
        })
    }

    pub(crate) fn ad_hoc(
        owner: ComponentId,
        sources: ModuleSources,
        artifacts: Vec<ComponentArtifact>,
        requested: Attributes,
        exclusions: ExcludeSpec,
        resolver: Arc<dyn ArtifactResolver>,
    ) -> Self {
        Self::AdHoc(AdHocArtifactSet {
            owner,
            sources,
            artifacts,
            requested,
            exclusions,
            resolver,
        })
    }

    /// Enumerates the selected artifacts, deduplicated by identity. For a
    /// file dependency this is the point where the lazy normalization runs.
    pub fn artifacts(&self) -> Vec<SelectedArtifact> {
        match self {
            ArtifactSet::FileDependency(set) => set
                .artifacts
                .get()
                .iter()
                .cloned()
                .map(SelectedArtifact::File)
                .collect(),
            ArtifactSet::FromVariants(set) => {
                let mut seen: IndexSet<&ComponentArtifact> = IndexSet::new();
                for variant in &set.variants {
                    seen.extend(variant.artifacts());
                }
                seen.into_iter()
                    .cloned()
                    .map(SelectedArtifact::Component)
                    .collect()
            }
            ArtifactSet::AdHoc(set) => set
                .artifacts
                .iter()
                .cloned()
                .map(SelectedArtifact::Component)
                .collect(),
        }
    }
}

pub struct FileDependencyArtifactSet {
    dependency: FileDependency,
    artifacts: CalculatedValue<Vec<FileArtifact>>,
}

impl FileDependencyArtifactSet {
    pub fn dependency(&self) -> &FileDependency {
        &self.dependency
    }

    /// Whether the file artifacts have been materialized yet.
    pub fn is_materialized(&self) -> bool {
        self.artifacts.is_computed()
    }
}

impl fmt::Debug for FileDependencyArtifactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDependencyArtifactSet")
            .field("dependency", &self.dependency)
            .field("artifacts", &self.artifacts)
            .finish()
    }
}

#[derive(Debug)]
pub struct VariantArtifactSet {
    variants: IndexSet<ResolvedVariant>,
    requested: Attributes,
}

impl VariantArtifactSet {
    pub fn variants(&self) -> &IndexSet<ResolvedVariant> {
        &self.variants
    }

    /// The override-merged attributes this selection was made for.
    pub fn requested(&self) -> &Attributes {
        &self.requested
    }
}

#[derive(Debug)]
pub struct AdHocArtifactSet {
    owner: ComponentId,
    sources: ModuleSources,
    artifacts: Vec<ComponentArtifact>,
    requested: Attributes,
    exclusions: ExcludeSpec,
    resolver: Arc<dyn ArtifactResolver>,
}

impl AdHocArtifactSet {
    pub fn owner(&self) -> &ComponentId {
        &self.owner
    }

    pub fn sources(&self) -> &ModuleSources {
        &self.sources
    }

    pub fn requested(&self) -> &Attributes {
        &self.requested
    }

    pub fn exclusions(&self) -> &ExcludeSpec {
        &self.exclusions
    }

    pub fn resolver(&self) -> &Arc<dyn ArtifactResolver> {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ARTIFACT_TYPE_ATTRIBUTE;

    #[test]
    fn test_file_dependency_materializes_lazily_and_once() {
        let dependency = FileDependency::new([PathBuf::from("libs/util-1.0.jar")]);
        let set = ArtifactSet::file_dependency(
            dependency,
            Arc::new(ArtifactTypeRegistry::new()),
        );

        let file_set = set.unpack_file_dependency().unwrap();
        assert!(!file_set.is_materialized());

        let artifacts = set.artifacts();
        assert_eq!(artifacts.len(), 1);
        match &artifacts[0] {
            SelectedArtifact::File(file) => {
                assert_eq!(file.path(), Path::new("libs/util-1.0.jar"));
                assert_eq!(file.name().to_string(), "util-1.0.jar");
                assert_eq!(file.attributes().get(ARTIFACT_TYPE_ATTRIBUTE), Some("jar"));
            }
            other => panic!("expected a file artifact, got {other:?}"),
        }

        let file_set = set.unpack_file_dependency().unwrap();
        assert!(file_set.is_materialized());
        assert_eq!(set.artifacts().len(), 1);
    }

    #[test]
    fn test_file_without_extension() {
        let set = ArtifactSet::file_dependency(
            FileDependency::new([PathBuf::from("tools/protoc")]),
            Arc::new(ArtifactTypeRegistry::new()),
        );
        match &set.artifacts()[0] {
            SelectedArtifact::File(file) => {
                assert_eq!(file.name().name(), "protoc");
                assert_eq!(file.name().kind(), "file");
                assert_eq!(
                    file.attributes().get(ARTIFACT_TYPE_ATTRIBUTE),
                    Some("file")
                );
            }
            other => panic!("expected a file artifact, got {other:?}"),
        }
    }
}
