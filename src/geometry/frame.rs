// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Canonical face frames
//!
//! A face frame is the rotation that carries a planar face's normal onto +Z.
//! The normal is taken from the first three vertices with the edge order
//! `(v3 - v1) x (v2 - v1)`; the directional vote in the claim filter relies
//! on that polarity, so the order must not change.

use crate::error::{FlattenError, Result};
use crate::utils::triangle_normal;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Which closed form produced the rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Normal has a Y or Z component
    General,
    /// Normal is parallel to the X axis (`b = c = 0`)
    AlongX,
}

/// Rotation aligning a face normal with +Z, plus its inverse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFrame {
    pub normal: Vector3<f64>,
    pub rotation: Matrix4<f64>,
    pub inverse: Matrix4<f64>,
    pub kind: FrameKind,
}

/// Unit normal of the face spanned by `v1`, `v2`, `v3`, or `None` when the
/// vertices are collinear or coincident
pub fn face_normal(v1: &Point3<f64>, v2: &Point3<f64>, v3: &Point3<f64>) -> Option<Vector3<f64>> {
    let cross = triangle_normal(v1, v2, v3);
    let length = cross.norm();
    if length == 0.0 || !length.is_finite() {
        return None;
    }
    Some(cross / length)
}

impl FaceFrame {
    /// Build the frame of face number `face` from its first three vertices
    pub fn from_vertices(
        face: usize,
        v1: &Point3<f64>,
        v2: &Point3<f64>,
        v3: &Point3<f64>,
    ) -> Result<Self> {
        let normal = face_normal(v1, v2, v3).ok_or(FlattenError::DegenerateFace { face })?;
        Self::from_normal(face, normal)
    }

    /// Build the frame for a face with the given normal
    pub fn from_normal(face: usize, normal: Vector3<f64>) -> Result<Self> {
        let (a, b, c) = (normal.x, normal.y, normal.z);
        let absv = normal.norm();
        let l = (b * b + c * c).sqrt();

        if absv == 0.0 || !absv.is_finite() {
            return Err(FlattenError::DegenerateFace { face });
        }

        let (linear, kind) = if l == 0.0 {
            (
                Matrix3::new(
                    0.0, 0.0, 1.0, //
                    0.0, 1.0, 0.0, //
                    -1.0, 0.0, 0.0,
                ),
                FrameKind::AlongX,
            )
        } else {
            (
                Matrix3::new(
                    l / absv,
                    -(a * b) / (l * absv),
                    -(a * c) / (l * absv),
                    0.0,
                    c / l,
                    -b / l,
                    a / absv,
                    b / absv,
                    c / absv,
                ),
                FrameKind::General,
            )
        };

        // Both closed forms are orthonormal, so the transpose is the inverse
        Ok(Self {
            normal,
            rotation: linear.to_homogeneous(),
            inverse: linear.transpose().to_homogeneous(),
            kind,
        })
    }

    /// The 3x3 linear part of the rotation, used for direction vectors
    pub fn linear(&self) -> Matrix3<f64> {
        self.rotation.fixed_view::<3, 3>(0, 0).into_owned()
    }
}
