// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! 2D polygon footprint of a face in its canonical frame

use nalgebra::{Point2, Point3};

/// Simple polygon in the XY plane
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2 {
    vertices: Vec<Point2<f64>>,
}

impl Polygon2 {
    pub fn new(vertices: Vec<Point2<f64>>) -> Self {
        Self { vertices }
    }

    /// Project points onto the XY plane by dropping Z
    pub fn from_projected<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        Self::new(points.into_iter().map(|p| p.xy()).collect())
    }

    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    /// Strict interior test: points on an edge or vertex are outside
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = &self.vertices[j];
            let b = &self.vertices[i];

            if on_segment(a, b, point) {
                return false;
            }

            if ((b.y > point.y) != (a.y > point.y))
                && (point.x < (a.x - b.x) * (point.y - b.y) / (a.y - b.y) + b.x)
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}

fn on_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    let ab = b - a;
    let ap = p - a;
    if ab.perp(&ap) != 0.0 {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
