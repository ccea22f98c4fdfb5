// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// The reserved function name where symbolic execution of a program begins.
pub const ENTRY_POINT_NAME: &str = "_start";

/// An interned function name. Cheap to clone and to compare.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FunctionName(Rc<str>);

impl FunctionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this is the name the simulator starts execution from.
    pub fn is_entry_point(&self) -> bool {
        self.as_str() == ENTRY_POINT_NAME
    }
}

impl Display for FunctionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.0.fmt(f)
    }
}

/// An analysis lifetime cache that interns function names. The first request for a
/// name allocates; subsequent requests are cheap and all return handles that
/// compare equal.
#[derive(Debug, Default)]
pub struct FunctionNameCache {
    name_cache: HashMap<Rc<str>, FunctionName>,
}

impl FunctionNameCache {
    /// Create an empty function name cache.
    pub fn new() -> FunctionNameCache {
        FunctionNameCache {
            name_cache: HashMap::new(),
        }
    }

    /// Get the interned handle for the given name, interning it on first sight.
    pub fn get(&mut self, name: &str) -> FunctionName {
        if let Some(interned) = self.name_cache.get(name) {
            return interned.clone();
        }
        let interned = FunctionName(Rc::from(name));
        self.name_cache
            .insert(interned.0.clone(), interned.clone());
        interned
    }

    /// The interned handle for the simulator's entry point.
    pub fn entry_point(&mut self) -> FunctionName {
        self.get(ENTRY_POINT_NAME)
    }
}
