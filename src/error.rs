// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for flattening and mesh compaction

use thiserror::Error;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, FlattenError>;

/// Errors raised while aligning, flattening or compacting meshes
#[derive(Error, Debug)]
pub enum FlattenError {
    /// The face normal has zero length, so no canonical frame exists.
    /// Recoverable: the face iterator skips the face.
    #[error("face {face} is degenerate: its normal has zero length")]
    DegenerateFace { face: usize },

    #[error("malformed mesh input at line {line}: {reason}")]
    MalformedMeshInput { line: usize, reason: String },

    #[error("malformed scene: {0}")]
    MalformedScene(String),

    #[error("mesh has {markers} material markers but the material file declares {materials}")]
    InconsistentMaterialCount { markers: usize, materials: usize },

    #[error("{0} transform is not invertible")]
    SingularTransform(&'static str),

    #[error("cloud has {positions} positions but {normals} normals")]
    CloudSizeMismatch { positions: usize, normals: usize },

    #[error("claim ledger tracks {ledger} vertices but the cloud has {cloud}")]
    LedgerSizeMismatch { ledger: usize, cloud: usize },

    /// Zero-based `vertex`, shown one-based like OBJ references
    #[error("vertex {} does not exist ({vertices} vertices)", .vertex + 1)]
    UnknownVertex { vertex: usize, vertices: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlattenError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedMeshInput {
            line,
            reason: reason.into(),
        }
    }

    /// Whether the face loop may skip past this error and continue
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DegenerateFace { .. })
    }
}
