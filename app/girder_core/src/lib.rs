/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Identity and value vocabulary shared by the girder resolution engine.
//!
//! Everything in this crate is an immutable value or a seam (trait) that the
//! metadata-loading subsystem implements. Nothing here performs resolution.

pub mod artifact;
pub mod attributes;
pub mod calculated;
pub mod component;
pub mod module;
pub mod sources;
pub mod variant;
