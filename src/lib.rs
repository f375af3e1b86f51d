// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Facade flattening
//!
//! Snaps a photogrammetry mesh onto the faces of a coarse building mesh.
//! Every building face claims the photogrammetry vertices that lie over it
//! and face away from it, the claimed vertices are moved onto the face
//! plane, and the mesh is rewritten to keep only claimed vertices and the
//! faces built entirely from them.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod pipeline;
pub mod utils;

pub use config::FlattenConfig;
pub use error::{FlattenError, Result};
pub use geometry::{ClaimLedger, FaceFrame, Flattener, PhotogrammetryCloud, VertexClaimFilter};
pub use io::{parse_obj, Compaction, MaterialLibrary, MeshCompactor, ObjDocument, Scene};
pub use pipeline::{FaceIterator, FaceOutcome, FlattenRun};

/// Result of flattening one photogrammetry mesh
#[derive(Debug, Clone)]
pub struct FlattenOutput {
    pub run: FlattenRun,
    pub compaction: Compaction,
}

/// Flatten `document` onto the building faces of `scene`
pub fn flatten_document(
    scene: &Scene,
    document: &ObjDocument,
    library: Option<&MaterialLibrary>,
    filter: VertexClaimFilter,
) -> Result<FlattenOutput> {
    flatten_document_with(scene, document, library, filter, |_| {})
}

/// Like [`flatten_document`], reporting each face outcome to `observer`
pub fn flatten_document_with<F>(
    scene: &Scene,
    document: &ObjDocument,
    library: Option<&MaterialLibrary>,
    filter: VertexClaimFilter,
    observer: F,
) -> Result<FlattenOutput>
where
    F: FnMut(&FaceOutcome),
{
    let transforms = scene.world_transforms()?;
    let faces = scene.building_faces()?;
    let cloud = PhotogrammetryCloud::from_document(document);

    let mut ledger = ClaimLedger::new(cloud.len());
    let run = FaceIterator::new(&cloud, transforms, filter).run_with(&faces, &mut ledger, observer)?;

    let mut flattened = document.clone();
    flattened.replace_vertex_positions(run.result.iter())?;

    let compactor = match library {
        Some(library) => MeshCompactor::with_library(library),
        None => MeshCompactor::new(),
    };
    let compaction = compactor.compact(&flattened, &ledger)?;

    Ok(FlattenOutput { run, compaction })
}
