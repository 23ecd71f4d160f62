/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::fmt;

use allocative::Allocative;
use allocative::Visitor;
use once_cell::sync::OnceCell;

/// A build-once, read-many deferred value. The stored computation runs at
/// most once, on first read; every subsequent reader shares the result.
pub struct CalculatedValue<T> {
    cell: OnceCell<T>,
    compute: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T> CalculatedValue<T> {
    pub fn new(compute: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            cell: OnceCell::new(),
            compute: Box::new(compute),
        }
    }

    pub fn get(&self) -> &T {
        self.cell.get_or_init(|| (self.compute)())
    }

    /// Whether the value has been materialized yet. Does not trigger the
    /// computation.
    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for CalculatedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("CalculatedValue").field(value).finish(),
            None => f.write_str("CalculatedValue(<not computed>)"),
        }
    }
}

impl<T: Allocative> Allocative for CalculatedValue<T> {
    fn visit<'a, 'b: 'a>(&self, visitor: &'a mut Visitor<'b>) {
        let visitor = visitor.enter_self_sized::<Self>();
        visitor.exit();
    }
}
