// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - mesh text model, material files, scene input and compaction

mod compact;
mod importer;
mod material;
mod obj;
mod scene;

pub use compact::{Compaction, CompactionReport, MaterialPlacement, MeshCompactor};
pub use importer::{
    companion_material_path, export_obj, import_material_file, import_obj_file, import_scene_file,
};
pub use material::MaterialLibrary;
pub use obj::{parse_obj, FaceCorner, ObjDocument, Record};
pub use scene::{BuildingMesh, Scene};
