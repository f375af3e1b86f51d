// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Flattening configuration

use crate::geometry::{VertexClaimFilter, DEFAULT_Z_MARGIN};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "flatten.toml";

/// Flattening configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Extension of each face's bounding box below and above the face plane
    pub z_margin: f64,
    /// Appended to the mesh file stem when no output path is given
    pub output_suffix: String,
    /// Write a JSON run report next to the output mesh
    pub write_report: bool,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            z_margin: DEFAULT_Z_MARGIN,
            output_suffix: "_flattened".to_string(),
            write_report: false,
        }
    }
}

impl FlattenConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: FlattenConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `flatten.toml` if present, then apply environment variable overrides
    pub fn load() -> Result<Self> {
        Self::resolve(None)
    }

    /// Load `path`, or `flatten.toml` if present when no path is given, then
    /// apply environment variable overrides exactly once
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if PathBuf::from(CONFIG_FILE).exists() => Self::from_file(CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `FLATTEN_*` environment variable overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `FLATTEN_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(margin) = lookup("FLATTEN_Z_MARGIN") {
            self.z_margin = margin
                .parse()
                .with_context(|| format!("FLATTEN_Z_MARGIN is not a number: {}", margin))?;
        }

        if let Some(suffix) = lookup("FLATTEN_OUTPUT_SUFFIX") {
            self.output_suffix = suffix;
        }

        if let Some(report) = lookup("FLATTEN_WRITE_REPORT") {
            self.write_report = report
                .parse()
                .with_context(|| format!("FLATTEN_WRITE_REPORT is not true or false: {}", report))?;
        }

        self.validate()
    }

    /// Reject margins that would make every bounding box test fail
    pub fn validate(&self) -> Result<()> {
        if !self.z_margin.is_finite() || self.z_margin < 0.0 {
            bail!(
                "z_margin must be a finite, non-negative number, got {}",
                self.z_margin
            );
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn claim_filter(&self) -> VertexClaimFilter {
        VertexClaimFilter::new(self.z_margin)
    }

    /// Output path for `mesh`: `<stem><suffix>.obj` beside it
    pub fn output_path_for(&self, mesh: &Path) -> PathBuf {
        let stem = mesh
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        mesh.with_file_name(format!("{}{}.obj", stem, self.output_suffix))
    }
}
