// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Face iteration: the per-face claim and flatten loop over a building mesh

use crate::error::{FlattenError, Result};
use crate::geometry::{
    ClaimDecision, ClaimLedger, Face, FlattenResult, Flattener, PhotogrammetryCloud,
    ProjectedCloud, ProjectedFace, VertexClaimFilter, WorldTransforms,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What happened to one building face
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FaceOutcome {
    Claimed { face: usize, vertices: usize },
    Rejected { face: usize, candidates: usize, pointing_away: usize },
    NoCandidates { face: usize },
    Skipped { face: usize, reason: String },
}

impl FaceOutcome {
    pub fn face(&self) -> usize {
        match self {
            FaceOutcome::Claimed { face, .. }
            | FaceOutcome::Rejected { face, .. }
            | FaceOutcome::NoCandidates { face }
            | FaceOutcome::Skipped { face, .. } => *face,
        }
    }
}

/// Everything a finished face loop produced
#[derive(Debug, Clone, Default)]
pub struct FlattenRun {
    pub result: FlattenResult,
    pub outcomes: Vec<FaceOutcome>,
}

impl FlattenRun {
    pub fn skipped(&self) -> impl Iterator<Item = &FaceOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FaceOutcome::Skipped { .. }))
    }
}

/// Drives faces through projection, claiming and flattening in order.
///
/// The claim ledger is passed in by the caller and is the only state shared
/// between faces; faces are processed strictly one after another so that a
/// vertex is claimed by at most one face.
pub struct FaceIterator<'a> {
    cloud: &'a PhotogrammetryCloud,
    transforms: WorldTransforms,
    filter: VertexClaimFilter,
}

impl<'a> FaceIterator<'a> {
    pub fn new(
        cloud: &'a PhotogrammetryCloud,
        transforms: WorldTransforms,
        filter: VertexClaimFilter,
    ) -> Self {
        Self {
            cloud,
            transforms,
            filter,
        }
    }

    /// Process a single face against the current ledger. Claimed vertices are
    /// recorded in `ledger` and their flattened positions in `result`.
    pub fn process_face(
        &self,
        face_index: usize,
        face: &Face,
        ledger: &mut ClaimLedger,
        result: &mut FlattenResult,
    ) -> Result<FaceOutcome> {
        self.check_ledger(ledger)?;

        let projected = match ProjectedFace::new(face_index, face, &self.transforms) {
            Ok(projected) => projected,
            Err(err) if err.is_recoverable() => {
                warn!(face = face_index, error = %err, "skipping face");
                return Ok(FaceOutcome::Skipped {
                    face: face_index,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        };

        let cloud = ProjectedCloud::new(self.cloud, &projected, &self.transforms);

        let outcome = match self.filter.decide(&projected, &cloud, ledger) {
            ClaimDecision::NoCandidates => FaceOutcome::NoCandidates { face: face_index },
            ClaimDecision::Rejected {
                candidates,
                pointing_away,
            } => FaceOutcome::Rejected {
                face: face_index,
                candidates,
                pointing_away,
            },
            ClaimDecision::Claimed { indices, .. } => {
                let flattener = Flattener::new(&projected, &self.transforms);
                result.extend(flattener.flatten(&indices, &cloud));
                ledger.claim(&indices);
                FaceOutcome::Claimed {
                    face: face_index,
                    vertices: indices.len(),
                }
            }
        };

        debug!(face = face_index, ?outcome, "face processed");
        Ok(outcome)
    }

    /// Process all faces in order
    pub fn run(&self, faces: &[Face], ledger: &mut ClaimLedger) -> Result<FlattenRun> {
        self.run_with(faces, ledger, |_| {})
    }

    /// Process all faces in order, reporting each outcome to `observer`
    pub fn run_with<F>(
        &self,
        faces: &[Face],
        ledger: &mut ClaimLedger,
        mut observer: F,
    ) -> Result<FlattenRun>
    where
        F: FnMut(&FaceOutcome),
    {
        self.check_ledger(ledger)?;

        let mut run = FlattenRun::default();
        for (index, face) in faces.iter().enumerate() {
            let outcome = self.process_face(index, face, ledger, &mut run.result)?;
            observer(&outcome);
            run.outcomes.push(outcome);
        }

        info!(
            faces = faces.len(),
            flattened = run.result.len(),
            claimed_total = ledger.claimed_count(),
            skipped = run.skipped().count(),
            "face loop finished"
        );
        Ok(run)
    }

    fn check_ledger(&self, ledger: &ClaimLedger) -> Result<()> {
        if ledger.len() != self.cloud.len() {
            return Err(FlattenError::LedgerSizeMismatch {
                ledger: ledger.len(),
                cloud: self.cloud.len(),
            });
        }
        Ok(())
    }
}
