// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Building faces

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Planar polygon of the reference building mesh, in building-local space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Indices into the building mesh's point list
    pub vertex_indices: Vec<usize>,
    /// Positions looked up through `vertex_indices`
    pub vertices: Vec<Point3<f64>>,
}

impl Face {
    pub fn new(vertex_indices: Vec<usize>, vertices: Vec<Point3<f64>>) -> Self {
        Self {
            vertex_indices,
            vertices,
        }
    }

    /// Face from positions alone, numbering them 0..n
    pub fn from_vertices(vertices: Vec<Point3<f64>>) -> Self {
        Self {
            vertex_indices: (0..vertices.len()).collect(),
            vertices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}
