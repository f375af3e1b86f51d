// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! File loading and writing

use super::{parse_obj, MaterialLibrary, ObjDocument, Scene};
use crate::error::FlattenError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read and parse an OBJ file
pub fn import_obj_file(path: impl AsRef<Path>) -> Result<ObjDocument> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read OBJ file: {}", path.display()))?;

    parse_obj(&source).with_context(|| format!("Failed to parse OBJ file: {}", path.display()))
}

/// Read a JSON scene description
pub fn import_scene_file(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file: {}", path.display()))?;

    Scene::from_json(&source)
        .with_context(|| format!("Failed to parse scene file: {}", path.display()))
}

/// Read a material file
pub fn import_material_file(path: impl AsRef<Path>) -> Result<MaterialLibrary> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read material file: {}", path.display()))?;
    Ok(MaterialLibrary::parse(&source))
}

/// Locate the material file belonging to an OBJ.
///
/// An `mtllib` reference is resolved relative to the OBJ's directory and must
/// exist; a missing file is `MalformedMeshInput` at the `mtllib` line. Without
/// a reference, a `.mtl` file with the same stem is used if present.
pub fn companion_material_path(
    obj_path: &Path,
    document: &ObjDocument,
) -> crate::error::Result<Option<PathBuf>> {
    let Some((line, name)) = document.material_library_reference() else {
        let same_stem = obj_path.with_extension("mtl");
        return Ok(same_stem.is_file().then_some(same_stem));
    };

    let referenced = obj_path
        .parent()
        .map(|dir| dir.join(name))
        .unwrap_or_else(|| PathBuf::from(name));
    if !referenced.is_file() {
        return Err(FlattenError::malformed(
            line,
            format!("material file {} does not exist", referenced.display()),
        ));
    }
    Ok(Some(referenced))
}

/// Write an OBJ document
pub fn export_obj(document: &ObjDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, document.to_obj_string())
        .with_context(|| format!("Failed to write OBJ file: {}", path.display()))
}
