// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - face frames, cloud projection, claiming and flattening

mod bbox;
mod claim;
mod cloud;
mod face;
mod flatten;
mod frame;
mod polygon;
mod projector;

pub use bbox::BoundingBox;
pub use claim::{count_pointing_away, ClaimDecision, ClaimLedger, VertexClaimFilter, DEFAULT_Z_MARGIN};
pub use cloud::{compute_vertex_normals, PhotogrammetryCloud};
pub use face::Face;
pub use flatten::{FlattenResult, Flattener};
pub use frame::{face_normal, FaceFrame, FrameKind};
pub use polygon::Polygon2;
pub use projector::{ProjectedCloud, ProjectedFace, WorldTransforms};
