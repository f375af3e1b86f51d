// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Photogrammetry point cloud with per-vertex normals

use crate::error::{FlattenError, Result};
use crate::io::ObjDocument;
use crate::utils::triangle_normal;
use nalgebra::{Point3, Vector3};

/// Ordered cloud positions and a parallel list of vertex normals.
///
/// A vertex's index is its permanent identity: the claim ledger, flatten
/// results and mesh compaction all address vertices by it.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotogrammetryCloud {
    positions: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
}

impl PhotogrammetryCloud {
    pub fn new(positions: Vec<Point3<f64>>, normals: Vec<Vector3<f64>>) -> Result<Self> {
        if positions.len() != normals.len() {
            return Err(FlattenError::CloudSizeMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        Ok(Self { positions, normals })
    }

    /// Build a cloud from a parsed mesh, estimating vertex normals from its faces
    pub fn from_document(document: &ObjDocument) -> Self {
        let positions = document.vertex_positions();
        let normals = compute_vertex_normals(
            &positions,
            document.faces().map(|corners| {
                corners.iter().map(|c| c.vertex).collect::<Vec<_>>()
            }),
        );
        Self { positions, normals }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }
}

/// Area-weighted vertex normals. Polygons are fan-triangulated from their
/// first corner; vertices no face touches keep a zero normal.
pub fn compute_vertex_normals<F>(positions: &[Point3<f64>], faces: F) -> Vec<Vector3<f64>>
where
    F: IntoIterator,
    F::Item: AsRef<[usize]>,
{
    let mut normals = vec![Vector3::zeros(); positions.len()];

    for face in faces {
        let face = face.as_ref();
        if face.len() < 3 {
            continue;
        }
        let a = face[0];
        for pair in face[1..].windows(2) {
            let (b, c) = (pair[0], pair[1]);
            // Cross product magnitude is twice the triangle area
            let n = -triangle_normal(&positions[a], &positions[b], &positions[c]);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
    }

    for normal in &mut normals {
        let length = normal.norm();
        if length > 0.0 {
            *normal /= length;
        }
    }
    normals
}
