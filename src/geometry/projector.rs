// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Projection of a face and the photogrammetry cloud into the face's
//! canonical frame: the face's first vertex at the origin and its normal on +Z.

use super::{Face, FaceFrame, PhotogrammetryCloud};
use crate::error::{FlattenError, Result};
use crate::utils::translation;
use nalgebra::{Matrix4, Point3, Vector3};

/// World transforms of the two meshes, as supplied by the scene graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransforms {
    building: Matrix4<f64>,
    photogrammetry: Matrix4<f64>,
    photogrammetry_inverse: Matrix4<f64>,
}

impl WorldTransforms {
    pub fn new(building: Matrix4<f64>, photogrammetry: Matrix4<f64>) -> Result<Self> {
        let photogrammetry_inverse = photogrammetry
            .try_inverse()
            .ok_or(FlattenError::SingularTransform("photogrammetry"))?;
        Ok(Self {
            building,
            photogrammetry,
            photogrammetry_inverse,
        })
    }

    pub fn identity() -> Self {
        Self {
            building: Matrix4::identity(),
            photogrammetry: Matrix4::identity(),
            photogrammetry_inverse: Matrix4::identity(),
        }
    }

    pub fn building(&self) -> &Matrix4<f64> {
        &self.building
    }

    pub fn photogrammetry(&self) -> &Matrix4<f64> {
        &self.photogrammetry
    }

    pub fn photogrammetry_inverse(&self) -> &Matrix4<f64> {
        &self.photogrammetry_inverse
    }
}

/// A building face expressed in its own canonical frame
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFace {
    pub frame: FaceFrame,
    /// The face's first vertex in world space
    pub origin: Point3<f64>,
    /// `R * T(-origin)`: world space to canonical frame
    pub to_canonical: Matrix4<f64>,
    /// Face vertices in the canonical frame (Z close to zero)
    pub vertices: Vec<Point3<f64>>,
}

impl ProjectedFace {
    /// Move a face from building-local space into its canonical frame.
    /// `face_index` only labels a degenerate-face error.
    pub fn new(face_index: usize, face: &Face, transforms: &WorldTransforms) -> Result<Self> {
        if face.vertex_count() < 3 {
            return Err(FlattenError::DegenerateFace { face: face_index });
        }

        let world: Vec<Point3<f64>> = face
            .vertices
            .iter()
            .map(|p| transforms.building.transform_point(p))
            .collect();

        let frame = FaceFrame::from_vertices(face_index, &world[0], &world[1], &world[2])?;
        let origin = world[0];
        let to_canonical = frame.rotation * translation(&-origin.coords);

        let vertices = world
            .iter()
            .map(|p| to_canonical.transform_point(p))
            .collect();

        Ok(Self {
            frame,
            origin,
            to_canonical,
            vertices,
        })
    }
}

/// Cloud positions and normals in one face's canonical frame, same indexing
/// as the source cloud
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedCloud {
    pub positions: Vec<Point3<f64>>,
    pub normals: Vec<Vector3<f64>>,
}

impl ProjectedCloud {
    /// Positions go through the photogrammetry world transform and the face's
    /// canonical transform; normals are only rotated by the face rotation.
    pub fn new(
        cloud: &PhotogrammetryCloud,
        face: &ProjectedFace,
        transforms: &WorldTransforms,
    ) -> Self {
        let to_canonical = face.to_canonical * transforms.photogrammetry;
        let rotation = face.frame.linear();

        Self {
            positions: cloud
                .positions()
                .iter()
                .map(|p| to_canonical.transform_point(p))
                .collect(),
            normals: cloud.normals().iter().map(|n| rotation * n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
