// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh compaction
//!
//! Keeps only claimed vertices and the faces built entirely from them.
//! Surviving face corners are renumbered to the compacted vertex order;
//! texture and normal references are left alone. Material markers are never
//! dropped and stay in front of the faces they governed.

use super::{MaterialLibrary, ObjDocument, Record};
use crate::error::{FlattenError, Result};
use crate::geometry::ClaimLedger;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where a material marker ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialPlacement {
    pub name: String,
    /// Faces preceding the marker in the input
    pub faces_before: usize,
    /// Faces preceding the marker in the output
    pub new_faces_before: usize,
    /// Faces governed by the marker in the input
    pub faces: usize,
    /// Of those, faces that survived
    pub kept_faces: usize,
}

/// Counts describing one compaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactionReport {
    pub vertices_kept: usize,
    pub vertices_removed: usize,
    pub faces_kept: usize,
    pub faces_removed: usize,
    pub materials: Vec<MaterialPlacement>,
}

/// A compacted document and its report
#[derive(Debug, Clone)]
pub struct Compaction {
    pub document: ObjDocument,
    pub report: CompactionReport,
}

/// Rewrites a mesh down to the vertices recorded in a claim ledger
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshCompactor<'a> {
    library: Option<&'a MaterialLibrary>,
}

impl<'a> MeshCompactor<'a> {
    pub fn new() -> Self {
        Self { library: None }
    }

    /// Check material markers against the companion material file
    pub fn with_library(library: &'a MaterialLibrary) -> Self {
        Self {
            library: Some(library),
        }
    }

    pub fn compact(&self, document: &ObjDocument, ledger: &ClaimLedger) -> Result<Compaction> {
        let vertex_count = document.vertex_count();
        if ledger.len() != vertex_count {
            return Err(FlattenError::LedgerSizeMismatch {
                ledger: ledger.len(),
                cloud: vertex_count,
            });
        }
        if let Some(library) = self.library {
            check_materials(document, library)?;
        }

        // Cumulative pass: new zero-based index of every kept vertex
        let mut renumber = Vec::with_capacity(vertex_count);
        let mut kept = 0;
        for &claimed in ledger.as_mask() {
            renumber.push(claimed.then_some(kept));
            if claimed {
                kept += 1;
            }
        }

        let mut report = CompactionReport {
            vertices_kept: kept,
            vertices_removed: vertex_count - kept,
            ..Default::default()
        };

        let mut records = Vec::with_capacity(document.records().len());
        let mut lines = Vec::with_capacity(document.records().len());
        let mut vertex = 0;

        for (index, record) in document.records().iter().enumerate() {
            let output = match record {
                Record::Vertex { .. } => {
                    let keep = ledger.is_claimed(vertex);
                    vertex += 1;
                    keep.then(|| record.clone())
                }
                Record::Face(corners) => {
                    let renumbered: Option<Vec<_>> = corners
                        .iter()
                        .map(|c| {
                            renumber.get(c.vertex).copied().flatten().map(|v| {
                                let mut corner = *c;
                                corner.vertex = v;
                                corner
                            })
                        })
                        .collect();

                    if let Some(current) = report.materials.last_mut() {
                        current.faces += 1;
                    }
                    match renumbered {
                        Some(corners) => {
                            report.faces_kept += 1;
                            if let Some(current) = report.materials.last_mut() {
                                current.kept_faces += 1;
                            }
                            Some(Record::Face(corners))
                        }
                        None => {
                            report.faces_removed += 1;
                            None
                        }
                    }
                }
                Record::UseMaterial(name) => {
                    let faces_before = report.faces_kept + report.faces_removed;
                    report.materials.push(MaterialPlacement {
                        name: name.clone(),
                        faces_before,
                        new_faces_before: faces_before - report.faces_removed,
                        faces: 0,
                        kept_faces: 0,
                    });
                    Some(record.clone())
                }
                _ => Some(record.clone()),
            };

            if let Some(output) = output {
                records.push(output);
                lines.push(document.line_of(index));
            }
        }

        debug!(
            vertices_kept = report.vertices_kept,
            vertices_removed = report.vertices_removed,
            faces_kept = report.faces_kept,
            faces_removed = report.faces_removed,
            "mesh compacted"
        );

        Ok(Compaction {
            document: ObjDocument::from_parts(records, lines),
            report,
        })
    }
}

fn check_materials(document: &ObjDocument, library: &MaterialLibrary) -> Result<()> {
    let markers: Vec<(usize, &str)> = document
        .records()
        .iter()
        .enumerate()
        .filter_map(|(i, r)| match r {
            Record::UseMaterial(name) => Some((i, name.as_str())),
            _ => None,
        })
        .collect();

    if markers.len() != library.len() {
        return Err(FlattenError::InconsistentMaterialCount {
            markers: markers.len(),
            materials: library.len(),
        });
    }
    if let Some((index, name)) = markers.iter().find(|(_, name)| !library.contains(name)) {
        return Err(FlattenError::malformed(
            document.line_of(*index),
            format!("material '{}' is not declared in the material file", name),
        ));
    }
    Ok(())
}
