// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Claim filter and face loop properties

use approx::assert_relative_eq;
use facade_flatten::geometry::{
    ClaimDecision, Face, FlattenResult, ProjectedCloud, ProjectedFace, WorldTransforms,
};
use facade_flatten::{ClaimLedger, FaceIterator, Flattener, PhotogrammetryCloud, VertexClaimFilter};
use nalgebra::{Point3, Rotation3, Translation3, Vector3};

/// Unit square on Z = 0 whose edge order yields a +Z normal
fn square(x0: f64) -> Face {
    Face::from_vertices(vec![
        Point3::new(x0, 0.0, 0.0),
        Point3::new(x0, 1.0, 0.0),
        Point3::new(x0 + 1.0, 1.0, 0.0),
        Point3::new(x0 + 1.0, 0.0, 0.0),
    ])
}

/// Ten points over the unit square, the first `away` with -Z normals
fn voting_cloud(away: usize) -> PhotogrammetryCloud {
    let positions = (0..10)
        .map(|i| Point3::new(0.05 + 0.09 * i as f64, 0.5, 0.01))
        .collect();
    let normals = (0..10)
        .map(|i| {
            if i < away {
                Vector3::new(0.0, 0.0, -1.0)
            } else {
                Vector3::new(0.0, 0.0, 1.0)
            }
        })
        .collect();
    PhotogrammetryCloud::new(positions, normals).unwrap()
}

fn decide(face: &Face, cloud: &PhotogrammetryCloud, ledger: &ClaimLedger) -> ClaimDecision {
    let transforms = WorldTransforms::identity();
    let projected = ProjectedFace::new(0, face, &transforms).unwrap();
    let projected_cloud = ProjectedCloud::new(cloud, &projected, &transforms);
    VertexClaimFilter::default().decide(&projected, &projected_cloud, ledger)
}

#[test]
fn test_six_of_ten_claims_every_candidate() {
    let cloud = voting_cloud(6);
    let ledger = ClaimLedger::new(cloud.len());
    let decision = decide(&square(0.0), &cloud, &ledger);
    assert_eq!(decision.claimed(), (0..10).collect::<Vec<_>>().as_slice());
}

#[test]
fn test_four_of_ten_claims_nothing() {
    let cloud = voting_cloud(4);
    let ledger = ClaimLedger::new(cloud.len());
    let decision = decide(&square(0.0), &cloud, &ledger);
    assert!(decision.claimed().is_empty());
    assert_eq!(
        decision,
        ClaimDecision::Rejected {
            candidates: 10,
            pointing_away: 4
        }
    );
}

#[test]
fn test_bounding_box_is_strict() {
    let epsilon = 1e-9;
    let cloud = PhotogrammetryCloud::new(
        vec![Point3::new(0.0, 0.5, 0.0), Point3::new(epsilon, 0.5, 0.0)],
        vec![Vector3::new(0.0, 0.0, -1.0); 2],
    )
    .unwrap();
    let ledger = ClaimLedger::new(cloud.len());
    let decision = decide(&square(0.0), &cloud, &ledger);
    assert_eq!(decision.claimed(), &[1]);
}

/// Overlapping squares at x = 0, 0.5 and 1 over a row of points
fn overlapping_run() -> (PhotogrammetryCloud, Vec<Face>) {
    let positions: Vec<_> = (0..20)
        .map(|i| Point3::new(0.05 + 0.1 * i as f64, 0.5, 0.0))
        .collect();
    let normals = vec![Vector3::new(0.0, 0.0, -1.0); positions.len()];
    let cloud = PhotogrammetryCloud::new(positions, normals).unwrap();
    (cloud, vec![square(0.0), square(0.5), square(1.0)])
}

#[test]
fn test_claims_are_exclusive() {
    let (cloud, faces) = overlapping_run();
    let iterator = FaceIterator::new(&cloud, WorldTransforms::identity(), VertexClaimFilter::default());
    let mut ledger = ClaimLedger::new(cloud.len());
    let mut result = FlattenResult::new();

    let mut per_face: Vec<Vec<usize>> = Vec::new();
    for (index, face) in faces.iter().enumerate() {
        let before: Vec<usize> = ledger.claimed_indices().collect();
        iterator
            .process_face(index, face, &mut ledger, &mut result)
            .unwrap();
        per_face.push(
            ledger
                .claimed_indices()
                .filter(|i| !before.contains(i))
                .collect(),
        );
    }

    for (a, first) in per_face.iter().enumerate() {
        for second in &per_face[a + 1..] {
            assert!(first.iter().all(|i| !second.contains(i)));
        }
    }
    assert_eq!(per_face[0], (0..10).collect::<Vec<_>>());
    assert_eq!(per_face[1], (10..15).collect::<Vec<_>>());
    assert_eq!(per_face[2], (15..20).collect::<Vec<_>>());
}

#[test]
fn test_second_run_claims_nothing() {
    let (cloud, faces) = overlapping_run();
    let iterator = FaceIterator::new(&cloud, WorldTransforms::identity(), VertexClaimFilter::default());
    let mut ledger = ClaimLedger::new(cloud.len());

    let first = iterator.run(&faces, &mut ledger).unwrap();
    assert_eq!(first.result.len(), 20);
    let claimed = ledger.claimed_count();

    let second = iterator.run(&faces, &mut ledger).unwrap();
    assert!(second.result.is_empty());
    assert_eq!(ledger.claimed_count(), claimed);
}

#[test]
fn test_flattened_points_land_on_the_face_plane() {
    let face = Face::from_vertices(vec![
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 3.0),
        Point3::new(4.0, 1.0, 3.0),
        Point3::new(4.0, 1.0, 0.0),
    ]);
    let building = Translation3::new(5.0, -2.0, 1.0).to_homogeneous()
        * Rotation3::from_axis_angle(&Vector3::z_axis(), 0.7).to_homogeneous();
    let photogrammetry = Rotation3::from_euler_angles(0.1, -0.2, 0.3).to_homogeneous()
        * Translation3::new(-1.0, 0.5, 2.0).to_homogeneous();
    let transforms = WorldTransforms::new(building, photogrammetry).unwrap();

    let positions = vec![
        Point3::new(0.3, 1.2, -0.4),
        Point3::new(-2.0, 0.7, 1.5),
        Point3::new(4.0, 4.0, 4.0),
    ];
    let normals = vec![Vector3::z(); positions.len()];
    let cloud = PhotogrammetryCloud::new(positions, normals).unwrap();

    let projected = ProjectedFace::new(0, &face, &transforms).unwrap();
    let canonical = ProjectedCloud::new(&cloud, &projected, &transforms);
    let flattener = Flattener::new(&projected, &transforms);

    let indices: Vec<usize> = (0..cloud.len()).collect();
    let flattened = flattener.flatten(&indices, &canonical);
    let flattened_cloud = PhotogrammetryCloud::new(
        flattened.iter().map(|(_, p)| *p).collect(),
        vec![Vector3::z(); flattened.len()],
    )
    .unwrap();
    let reprojected = ProjectedCloud::new(&flattened_cloud, &projected, &transforms);

    for (before, after) in canonical.positions.iter().zip(&reprojected.positions) {
        assert_relative_eq!(after.x, before.x, epsilon = 1e-6);
        assert_relative_eq!(after.y, before.y, epsilon = 1e-6);
        assert_relative_eq!(after.z, 0.0, epsilon = 1e-6);
    }
}
