// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! File-level flattening runs

use crate::config::FlattenConfig;
use crate::io::{self, MaterialPlacement};
use crate::pipeline::FaceOutcome;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Inputs of one flattening run
#[derive(Debug, Clone)]
pub struct FlattenJob {
    pub scene: PathBuf,
    pub mesh: PathBuf,
    /// Defaults to `<stem><suffix>.obj` next to the mesh
    pub output: Option<PathBuf>,
    /// Write a JSON report next to the output, regardless of configuration
    pub report: bool,
}

impl FlattenJob {
    pub fn new(scene: impl Into<PathBuf>, mesh: impl Into<PathBuf>) -> Self {
        Self {
            scene: scene.into(),
            mesh: mesh.into(),
            output: None,
            report: false,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn output_path(&self, config: &FlattenConfig) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| config.output_path_for(&self.mesh))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFace {
    pub face: usize,
    pub reason: String,
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub output: PathBuf,
    pub material_file: Option<PathBuf>,
    pub faces_processed: usize,
    pub faces_claimed: usize,
    pub faces_rejected: usize,
    pub faces_without_candidates: usize,
    pub skipped_faces: Vec<SkippedFace>,
    pub vertices_kept: usize,
    pub vertices_removed: usize,
    pub faces_kept: usize,
    pub faces_removed: usize,
    pub materials: Vec<MaterialPlacement>,
    #[serde(skip)]
    pub duration: Duration,
}

impl RunReport {
    fn tally(&mut self, outcomes: &[FaceOutcome]) {
        self.faces_processed = outcomes.len();
        for outcome in outcomes {
            match outcome {
                FaceOutcome::Claimed { .. } => self.faces_claimed += 1,
                FaceOutcome::Rejected { .. } => self.faces_rejected += 1,
                FaceOutcome::NoCandidates { .. } => self.faces_without_candidates += 1,
                FaceOutcome::Skipped { face, reason } => self.skipped_faces.push(SkippedFace {
                    face: *face,
                    reason: reason.clone(),
                }),
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run report")
    }
}

/// Run a flattening job with no progress reporting
pub fn run_flatten(job: &FlattenJob, config: &FlattenConfig) -> Result<RunReport> {
    run_flatten_with(job, config, |_| {})
}

/// Load the inputs, flatten, compact and write the output mesh.
///
/// Nothing is left on disk unless every stage succeeds, including the
/// optional report.
pub fn run_flatten_with<F>(job: &FlattenJob, config: &FlattenConfig, observer: F) -> Result<RunReport>
where
    F: FnMut(&FaceOutcome),
{
    let start = Instant::now();

    let scene = io::import_scene_file(&job.scene)?;
    let document = io::import_obj_file(&job.mesh)?;
    debug!(
        vertices = document.vertex_count(),
        faces = document.face_count(),
        "mesh loaded"
    );

    let material_file = io::companion_material_path(&job.mesh, &document)
        .with_context(|| format!("Failed to locate material file for {}", job.mesh.display()))?;
    let library = material_file
        .as_ref()
        .map(io::import_material_file)
        .transpose()?;
    if let Some(path) = &material_file {
        debug!(path = %path.display(), "using material file");
    }

    let output = crate::flatten_document_with(
        &scene,
        &document,
        library.as_ref(),
        config.claim_filter(),
        observer,
    )
    .with_context(|| format!("Failed to flatten {}", job.mesh.display()))?;

    let output_path = job.output_path(config);
    let compaction = output.compaction.report;
    let mut report = RunReport {
        output: output_path.clone(),
        material_file,
        vertices_kept: compaction.vertices_kept,
        vertices_removed: compaction.vertices_removed,
        faces_kept: compaction.faces_kept,
        faces_removed: compaction.faces_removed,
        materials: compaction.materials,
        ..Default::default()
    };
    report.tally(&output.run.outcomes);

    // Serialize before touching the filesystem
    let report_file = if job.report || config.write_report {
        Some((report_path_for(&output_path), report.to_json()?))
    } else {
        None
    };

    io::export_obj(&output.compaction.document, &output_path)?;

    if let Some((report_path, json)) = report_file {
        if let Err(err) = std::fs::write(&report_path, json) {
            if let Err(cleanup) = std::fs::remove_file(&output_path) {
                warn!(output = %output_path.display(), error = %cleanup, "could not remove output mesh");
            }
            return Err(err)
                .with_context(|| format!("Failed to write run report: {}", report_path.display()));
        }
    }
    report.duration = start.elapsed();

    info!(
        output = %output_path.display(),
        kept = report.vertices_kept,
        removed = report.vertices_removed,
        "flattened mesh written"
    );
    Ok(report)
}

/// `<output>.json` beside the output mesh
pub fn report_path_for(output: &Path) -> PathBuf {
    output.with_extension("json")
}
