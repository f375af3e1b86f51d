// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Companion material (.mtl) file

use ahash::AHashSet;

/// Ordered `newmtl` names of a material file. Material bodies are opaque;
/// the file itself is never rewritten.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    names: Vec<String>,
    lookup: AHashSet<String>,
}

impl MaterialLibrary {
    pub fn parse(source: &str) -> Self {
        Self::from_names(
            source
                .lines()
                .filter_map(|line| line.trim_start().strip_prefix("newmtl "))
                .map(|name| name.trim().to_string()),
        )
    }

    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let names: Vec<String> = names.into_iter().collect();
        let lookup = names.iter().cloned().collect();
        Self { names, lookup }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(name)
    }
}
