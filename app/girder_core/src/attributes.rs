/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use allocative::Allocative;
use dupe::Dupe;

/// An immutable, sorted attribute container. Comparable and hashable by
/// value, so it can participate in cache keys.
#[derive(Clone, Dupe, Debug, Default, PartialEq, Eq, Hash, Allocative)]
pub struct Attributes(Arc<BTreeMap<String, String>>);

impl Attributes {
    pub fn of<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(Arc::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        ))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Layers `overrides` on top of `self`. An override wins per key.
    pub fn merge(&self, overrides: &Attributes) -> Attributes {
        if overrides.is_empty() {
            return self.dupe();
        }
        if self.is_empty() {
            return overrides.dupe();
        }
        let mut merged = (*self.0).clone();
        for (k, v) in overrides.0.iter() {
            merged.insert(k.clone(), v.clone());
        }
        Attributes(Arc::new(merged))
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        write!(f, "}}")
    }
}

/// Compatibility and disambiguation service for attribute matching. Girder
/// consumes this as an opaque predicate; the rules themselves live with the
/// embedding engine.
pub trait AttributesSchema: Send + Sync + fmt::Debug {
    /// Whether `candidate` can satisfy a request for `requested`.
    fn matches(&self, requested: &Attributes, candidate: &Attributes) -> bool;

    /// Given several compatible candidates, returns the indices to keep.
    fn disambiguate(&self, _requested: &Attributes, candidates: &[&Attributes]) -> Vec<usize> {
        (0..candidates.len()).collect()
    }
}

pub mod testing {
    use super::Attributes;
    use super::AttributesSchema;

    /// Treats a candidate as compatible when it does not contradict the
    /// request: every key defined on both sides must carry the same value.
    #[derive(Debug, Default)]
    pub struct ConsistentAttributesSchema;

    impl AttributesSchema for ConsistentAttributesSchema {
        fn matches(&self, requested: &Attributes, candidate: &Attributes) -> bool {
            requested
                .iter()
                .all(|(k, v)| candidate.get(k).is_none_or(|c| c == v))
        }
    }
}
