/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Artifact selection for resolved dependency-graph components.
//!
//! Given a component's metadata, its variants, an exclusion spec and
//! attribute overrides, [`selector::ArtifactSelector`] produces the
//! deduplicated, lazily-materialized [`artifact_set::ArtifactSet`] for that
//! component. Variants are resolved at most once per cache key through
//! [`variant_cache::ResolvedVariantCache`], no matter how many graph edges
//! reference them concurrently.

pub mod artifact_set;
pub mod excludes;
pub mod resolved_variant;
pub mod resolver;
pub mod selector;
pub mod selectors;
pub mod types;
pub mod variant_cache;
pub mod view;
