// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Flattening claimed vertices onto their face plane

use super::{ProjectedCloud, ProjectedFace, WorldTransforms};
use crate::utils::translation;
use nalgebra::{Matrix4, Point3};
use std::collections::BTreeMap;

/// New cloud-local positions of claimed vertices, keyed by vertex index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenResult {
    positions: BTreeMap<usize, Point3<f64>>,
}

impl FlattenResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, position: Point3<f64>) {
        self.positions.insert(index, position);
    }

    pub fn get(&self, index: usize) -> Option<&Point3<f64>> {
        self.positions.get(&index)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Entries in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Point3<f64>)> {
        self.positions.iter().map(|(&i, p)| (i, p))
    }
}

impl Extend<(usize, Point3<f64>)> for FlattenResult {
    fn extend<I: IntoIterator<Item = (usize, Point3<f64>)>>(&mut self, iter: I) {
        self.positions.extend(iter);
    }
}

/// Maps points from a face's canonical frame back into cloud-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flattener {
    /// `P^-1 * T(origin) * R^-1`
    to_cloud: Matrix4<f64>,
}

impl Flattener {
    pub fn new(face: &ProjectedFace, transforms: &WorldTransforms) -> Self {
        let to_cloud = transforms.photogrammetry_inverse()
            * translation(&face.origin.coords)
            * face.frame.inverse;
        Self { to_cloud }
    }

    /// Project a canonical-frame point onto the face plane and return it in
    /// cloud-local coordinates
    pub fn flatten_point(&self, canonical: &Point3<f64>) -> Point3<f64> {
        let on_plane = Point3::new(canonical.x, canonical.y, 0.0);
        self.to_cloud.transform_point(&on_plane)
    }

    /// Flatten the given vertices of a projected cloud
    pub fn flatten(&self, indices: &[usize], cloud: &ProjectedCloud) -> Vec<(usize, Point3<f64>)> {
        indices
            .iter()
            .map(|&i| (i, self.flatten_point(&cloud.positions[i])))
            .collect()
    }
}
