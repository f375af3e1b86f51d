// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex claiming
//!
//! A face claims the cloud vertices that sit on it. Candidates are narrowed
//! in order: not yet claimed, strictly inside the face's Z-extended bounding
//! box, strictly inside the face polygon. The face then takes all of the
//! survivors or none of them, by majority vote of their normals.

use super::{BoundingBox, Polygon2, ProjectedCloud, ProjectedFace};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Default extension of a face's bounding box below and above the face plane
pub const DEFAULT_Z_MARGIN: f64 = 13.0;

/// One flag per cloud vertex. Flags only ever go from unclaimed to claimed,
/// so a vertex belongs to at most one face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimLedger {
    claimed: Vec<bool>,
}

impl ClaimLedger {
    /// Ledger for a cloud of `len` vertices, all unclaimed
    pub fn new(len: usize) -> Self {
        Self {
            claimed: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    pub fn is_claimed(&self, index: usize) -> bool {
        self.claimed[index]
    }

    /// Mark vertices as claimed and return how many were newly claimed
    pub fn claim(&mut self, indices: &[usize]) -> usize {
        let mut newly = 0;
        for &index in indices {
            if !self.claimed[index] {
                self.claimed[index] = true;
                newly += 1;
            }
        }
        newly
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.iter().filter(|&&c| c).count()
    }

    pub fn claimed_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.claimed
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| c.then_some(i))
    }

    pub fn unclaimed_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.claimed
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| (!c).then_some(i))
    }

    pub fn as_mask(&self) -> &[bool] {
        &self.claimed
    }
}

/// Outcome of the claim filter for one face
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimDecision {
    /// No unclaimed vertex lies within the face footprint
    NoCandidates,
    /// Candidates existed but at most half of their normals point away from +Z
    Rejected { candidates: usize, pointing_away: usize },
    /// A strict majority points away from +Z: every candidate is claimed
    Claimed {
        indices: Vec<usize>,
        pointing_away: usize,
    },
}

impl ClaimDecision {
    pub fn claimed(&self) -> &[usize] {
        match self {
            ClaimDecision::Claimed { indices, .. } => indices,
            _ => &[],
        }
    }
}

/// Three-stage geometric filter plus the per-face directional vote
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexClaimFilter {
    z_margin: f64,
}

impl Default for VertexClaimFilter {
    fn default() -> Self {
        Self::new(DEFAULT_Z_MARGIN)
    }
}

impl VertexClaimFilter {
    pub fn new(z_margin: f64) -> Self {
        Self { z_margin }
    }

    pub fn z_margin(&self) -> f64 {
        self.z_margin
    }

    /// Unclaimed vertices strictly inside the face's bounding box and polygon,
    /// in ascending index order
    pub fn candidates(
        &self,
        face: &ProjectedFace,
        cloud: &ProjectedCloud,
        ledger: &ClaimLedger,
    ) -> Vec<usize> {
        let bbox = BoundingBox::from_points(&face.vertices).extend_z(self.z_margin);
        let polygon = Polygon2::from_projected(&face.vertices);

        ledger
            .unclaimed_indices()
            .filter(|&i| bbox.strictly_contains(&cloud.positions[i]))
            .filter(|&i| polygon.contains(&cloud.positions[i].xy()))
            .collect()
    }

    /// Run all stages for one face. The ledger is only read; recording the
    /// claim is the caller's job.
    pub fn decide(
        &self,
        face: &ProjectedFace,
        cloud: &ProjectedCloud,
        ledger: &ClaimLedger,
    ) -> ClaimDecision {
        let candidates = self.candidates(face, cloud, ledger);
        if candidates.is_empty() {
            return ClaimDecision::NoCandidates;
        }

        let pointing_away = count_pointing_away(candidates.iter().map(|&i| &cloud.normals[i]));
        if pointing_away * 2 > candidates.len() {
            ClaimDecision::Claimed {
                indices: candidates,
                pointing_away,
            }
        } else {
            ClaimDecision::Rejected {
                candidates: candidates.len(),
                pointing_away,
            }
        }
    }
}

/// Number of normals with a negative dot product against +Z
pub fn count_pointing_away<'a>(normals: impl IntoIterator<Item = &'a Vector3<f64>>) -> usize {
    normals
        .into_iter()
        .filter(|n| n.dot(&Vector3::z()) < 0.0)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Face, FaceFrame, WorldTransforms};
    use nalgebra::{Matrix4, Point3};

    /// Face already in canonical position: a 10x10 square on Z = 0 whose
    /// frame is the identity
    fn canonical_square() -> ProjectedFace {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
        ];
        ProjectedFace {
            frame: FaceFrame::from_normal(0, Vector3::z()).unwrap(),
            origin: Point3::origin(),
            to_canonical: Matrix4::identity(),
            vertices,
        }
    }

    fn cloud(points: &[(f64, f64, f64, f64)]) -> ProjectedCloud {
        ProjectedCloud {
            positions: points.iter().map(|&(x, y, z, _)| Point3::new(x, y, z)).collect(),
            normals: points.iter().map(|&(_, _, _, nz)| Vector3::new(0.0, 0.0, nz)).collect(),
        }
    }

    fn ten_candidates(pointing_away: usize) -> ProjectedCloud {
        let points: Vec<_> = (0..10)
            .map(|i| {
                let nz = if i < pointing_away { -1.0 } else { 1.0 };
                (1.0 + i as f64 * 0.5, 5.0, 0.1, nz)
            })
            .collect();
        cloud(&points)
    }

    #[test]
    fn test_six_of_ten_claims_all() {
        let face = canonical_square();
        let cloud = ten_candidates(6);
        let ledger = ClaimLedger::new(cloud.len());

        let decision = VertexClaimFilter::default().decide(&face, &cloud, &ledger);
        assert_eq!(
            decision,
            ClaimDecision::Claimed {
                indices: (0..10).collect(),
                pointing_away: 6
            }
        );
    }

    #[test]
    fn test_four_of_ten_claims_none() {
        let face = canonical_square();
        let cloud = ten_candidates(4);
        let ledger = ClaimLedger::new(cloud.len());

        let decision = VertexClaimFilter::default().decide(&face, &cloud, &ledger);
        assert_eq!(
            decision,
            ClaimDecision::Rejected {
                candidates: 10,
                pointing_away: 4
            }
        );
        assert!(decision.claimed().is_empty());
    }

    #[test]
    fn test_exact_half_is_rejected() {
        let face = canonical_square();
        let cloud = ten_candidates(5);
        let ledger = ClaimLedger::new(cloud.len());

        let decision = VertexClaimFilter::default().decide(&face, &cloud, &ledger);
        assert!(matches!(decision, ClaimDecision::Rejected { pointing_away: 5, .. }));
    }

    #[test]
    fn test_claimed_vertices_are_skipped() {
        let face = canonical_square();
        let cloud = ten_candidates(10);
        let mut ledger = ClaimLedger::new(cloud.len());
        ledger.claim(&[0, 1, 2]);

        let candidates = VertexClaimFilter::default().candidates(&face, &cloud, &ledger);
        assert_eq!(candidates, (3..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_bounding_box_margin_and_boundary() {
        let face = canonical_square();
        let cloud = cloud(&[
            (0.0, 5.0, 0.0, -1.0),    // on min x: excluded
            (1e-9, 5.0, 0.0, -1.0),   // just inside
            (5.0, 5.0, 12.9, -1.0),   // within the Z margin
            (5.0, 5.0, -13.0, -1.0),  // on the Z margin: excluded
            (5.0, 5.0, 40.0, -1.0),   // far off the wall
            (15.0, 5.0, 0.0, -1.0),   // beside the face
        ]);
        let ledger = ClaimLedger::new(cloud.len());

        let candidates = VertexClaimFilter::default().candidates(&face, &cloud, &ledger);
        assert_eq!(candidates, vec![1, 2]);
    }

    #[test]
    fn test_polygon_stage_rejects_points_in_box_but_off_face() {
        // Right triangle: the box corner (9, 9) is outside the polygon
        let transforms = WorldTransforms::identity();
        let face = ProjectedFace::new(
            0,
            &Face::from_vertices(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 10.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
            ]),
            &transforms,
        )
        .unwrap();
        let cloud = cloud(&[(1.0, 1.0, 0.0, -1.0), (9.0, 9.0, 0.0, -1.0)]);
        let ledger = ClaimLedger::new(cloud.len());

        let candidates = VertexClaimFilter::default().candidates(&face, &cloud, &ledger);
        assert_eq!(candidates, vec![0]);
    }

    #[test]
    fn test_empty_candidate_set_skips_vote() {
        let face = canonical_square();
        let cloud = cloud(&[(50.0, 50.0, 0.0, -1.0)]);
        let ledger = ClaimLedger::new(cloud.len());

        let decision = VertexClaimFilter::default().decide(&face, &cloud, &ledger);
        assert_eq!(decision, ClaimDecision::NoCandidates);
    }

    #[test]
    fn test_ledger_is_monotonic() {
        let mut ledger = ClaimLedger::new(4);
        assert_eq!(ledger.claim(&[1, 3]), 2);
        assert_eq!(ledger.claim(&[3, 0]), 1);
        assert_eq!(ledger.claimed_count(), 3);
        assert_eq!(ledger.claimed_indices().collect::<Vec<_>>(), vec![0, 1, 3]);
        assert_eq!(ledger.unclaimed_indices().collect::<Vec<_>>(), vec![2]);
    }
}
