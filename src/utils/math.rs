// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::{Matrix4, Point3, Vector3};

/// Build a homogeneous translation matrix
pub fn translation(offset: &Vector3<f64>) -> Matrix4<f64> {
    Matrix4::new_translation(offset)
}

/// Build a `Matrix4` from row-major rows, the layout scene files use
pub fn matrix_from_rows(rows: &[[f64; 4]; 4]) -> Matrix4<f64> {
    Matrix4::from_fn(|r, c| rows[r][c])
}

/// Inverse of [`matrix_from_rows`]
pub fn matrix_to_rows(matrix: &Matrix4<f64>) -> [[f64; 4]; 4] {
    let mut rows = [[0.0; 4]; 4];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = matrix[(r, c)];
        }
    }
    rows
}

/// Normal of the triangle (p0, p1, p2) using the edge order
/// `(p2 - p0) x (p1 - p0)`. Not normalized.
pub fn triangle_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    (p2 - p0).cross(&(p1 - p0))
}
