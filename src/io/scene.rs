// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene description handed over by the scene graph: the building mesh with
//! its world transform, and the photogrammetry mesh's world transform

use crate::error::{FlattenError, Result};
use crate::geometry::{Face, WorldTransforms};
use crate::utils::{matrix_from_rows, matrix_to_rows};
use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};

fn identity_rows() -> [[f64; 4]; 4] {
    matrix_to_rows(&Matrix4::identity())
}

/// Building mesh in the layout the scene graph exposes: a point list, the
/// vertex count of each face and the concatenated face indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingMesh {
    /// Row-major building-to-world transform
    #[serde(default = "identity_rows")]
    pub transform: [[f64; 4]; 4],
    pub points: Vec<[f64; 3]>,
    pub face_vertex_counts: Vec<usize>,
    pub face_vertex_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub building: BuildingMesh,
    /// Row-major photogrammetry-to-world transform
    #[serde(default = "identity_rows")]
    pub photogrammetry_transform: [[f64; 4]; 4],
}

impl Scene {
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn world_transforms(&self) -> Result<WorldTransforms> {
        WorldTransforms::new(
            matrix_from_rows(&self.building.transform),
            matrix_from_rows(&self.photogrammetry_transform),
        )
    }

    /// Group the flat index list into faces, in order
    pub fn building_faces(&self) -> Result<Vec<Face>> {
        let building = &self.building;
        let total: usize = building.face_vertex_counts.iter().sum();
        if total != building.face_vertex_indices.len() {
            return Err(FlattenError::MalformedScene(format!(
                "face vertex counts sum to {} but {} indices are given",
                total,
                building.face_vertex_indices.len()
            )));
        }

        let mut faces = Vec::with_capacity(building.face_vertex_counts.len());
        let mut offset = 0;
        for (face, &count) in building.face_vertex_counts.iter().enumerate() {
            let indices = &building.face_vertex_indices[offset..offset + count];
            offset += count;

            let vertices = indices
                .iter()
                .map(|&i| {
                    building
                        .points
                        .get(i)
                        .map(|p| Point3::new(p[0], p[1], p[2]))
                        .ok_or_else(|| {
                            FlattenError::MalformedScene(format!(
                                "face {} references point {} but only {} points exist",
                                face,
                                i,
                                building.points.len()
                            ))
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            faces.push(Face::new(indices.to_vec(), vertices));
        }
        Ok(faces)
    }
}
