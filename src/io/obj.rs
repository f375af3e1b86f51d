// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront OBJ text model using pest
//!
//! A document is an ordered list of typed records. Material markers stay in
//! place between the face runs they govern, so rewriting the document keeps
//! each face attached to its material without any line-number arithmetic.

use crate::error::{FlattenError, Result};
use nalgebra::{Point3, Vector3};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use std::fmt;

#[derive(Parser)]
#[grammar = "io/obj.pest"]
struct ObjParser;

/// One `vertex/texcoord/normal` reference of a face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    /// Zero-based vertex index, already resolved if written relative
    pub vertex: usize,
    /// Texture coordinate reference exactly as written
    pub texcoord: Option<i64>,
    /// Normal reference exactly as written
    pub normal: Option<i64>,
}

impl FaceCorner {
    pub fn new(vertex: usize) -> Self {
        Self {
            vertex,
            texcoord: None,
            normal: None,
        }
    }
}

impl fmt::Display for FaceCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vertex + 1)?;
        match (self.texcoord, self.normal) {
            (None, None) => Ok(()),
            (Some(t), None) => write!(f, "/{}", t),
            (None, Some(n)) => write!(f, "//{}", n),
            (Some(t), Some(n)) => write!(f, "/{}/{}", t, n),
        }
    }
}

/// A single OBJ statement
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Vertex {
        position: Point3<f64>,
        /// Trailing components such as vertex colours
        extra: Vec<f64>,
    },
    TexCoord(Vec<f64>),
    Normal(Vector3<f64>),
    Face(Vec<FaceCorner>),
    UseMaterial(String),
    MaterialLibrary(String),
    Comment(String),
    Other(String),
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Vertex { position, extra } => {
                write!(f, "v {} {} {}", position.x, position.y, position.z)?;
                for value in extra {
                    write!(f, " {}", value)?;
                }
                Ok(())
            }
            Record::TexCoord(values) => {
                f.write_str("vt")?;
                for value in values {
                    write!(f, " {}", value)?;
                }
                Ok(())
            }
            Record::Normal(n) => write!(f, "vn {} {} {}", n.x, n.y, n.z),
            Record::Face(corners) => {
                f.write_str("f")?;
                for corner in corners {
                    write!(f, " {}", corner)?;
                }
                Ok(())
            }
            Record::UseMaterial(name) => write!(f, "usemtl {}", name),
            Record::MaterialLibrary(name) => write!(f, "mtllib {}", name),
            Record::Comment(text) | Record::Other(text) => f.write_str(text),
        }
    }
}

/// Parsed OBJ document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjDocument {
    records: Vec<Record>,
    /// Source line of each record, parallel to `records`
    lines: Vec<usize>,
}

impl ObjDocument {
    pub(crate) fn from_parts(records: Vec<Record>, lines: Vec<usize>) -> Self {
        Self { records, lines }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Source line of the record at `index`
    pub fn line_of(&self, index: usize) -> usize {
        self.lines.get(index).copied().unwrap_or(index + 1)
    }

    pub fn vertex_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, Record::Vertex { .. }))
            .count()
    }

    pub fn face_count(&self) -> usize {
        self.faces().count()
    }

    pub fn vertex_positions(&self) -> Vec<Point3<f64>> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Vertex { position, .. } => Some(*position),
                _ => None,
            })
            .collect()
    }

    pub fn faces(&self) -> impl Iterator<Item = &[FaceCorner]> {
        self.records.iter().filter_map(|r| match r {
            Record::Face(corners) => Some(corners.as_slice()),
            _ => None,
        })
    }

    /// Material marker names in file order
    pub fn material_markers(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::UseMaterial(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The first `mtllib` reference, if any
    pub fn material_library(&self) -> Option<&str> {
        self.material_library_reference().map(|(_, name)| name)
    }

    /// The first `mtllib` reference with its source line
    pub fn material_library_reference(&self) -> Option<(usize, &str)> {
        self.records.iter().enumerate().find_map(|(i, r)| match r {
            Record::MaterialLibrary(name) => Some((self.line_of(i), name.as_str())),
            _ => None,
        })
    }

    /// Overwrite vertex positions by vertex index
    pub fn replace_vertex_positions<'a, I>(&mut self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = (usize, &'a Point3<f64>)>,
    {
        let slots: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| matches!(r, Record::Vertex { .. }).then_some(i))
            .collect();

        for (vertex, new_position) in updates {
            let slot = *slots.get(vertex).ok_or(FlattenError::UnknownVertex {
                vertex,
                vertices: slots.len(),
            })?;
            if let Record::Vertex { position, .. } = &mut self.records[slot] {
                *position = *new_position;
            }
        }
        Ok(())
    }

    pub fn to_obj_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ObjDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        Ok(())
    }
}

/// Parse OBJ source text
pub fn parse_obj(source: &str) -> Result<ObjDocument> {
    let file = ObjParser::parse(Rule::file, source)
        .map_err(|e| {
            let line = match e.line_col {
                pest::error::LineColLocation::Pos((line, _)) => line,
                pest::error::LineColLocation::Span((line, _), _) => line,
            };
            FlattenError::malformed(line, "unrecognised statement")
        })?
        .next()
        .ok_or_else(|| FlattenError::malformed(1, "empty parse tree"))?;

    let mut builder = Builder::default();
    for pair in file.into_inner() {
        builder.push(pair)?;
    }
    builder.finish()
}

#[derive(Default)]
struct Builder {
    records: Vec<Record>,
    lines: Vec<usize>,
    vertices: usize,
    /// Highest vertex reference of each face, checked once all vertices are known
    face_refs: Vec<(usize, usize)>,
    seen_face: bool,
    leading_markers: usize,
}

impl Builder {
    fn push(&mut self, pair: Pair<Rule>) -> Result<()> {
        let line = pair.as_span().start_pos().line_col().0;

        let record = match pair.as_rule() {
            Rule::vertex => {
                let mut values = floats(pair, line)?;
                let extra = values.split_off(3);
                self.vertices += 1;
                Record::Vertex {
                    position: Point3::new(values[0], values[1], values[2]),
                    extra,
                }
            }
            Rule::texcoord => Record::TexCoord(floats(pair, line)?),
            Rule::vertex_normal => {
                let v = floats(pair, line)?;
                Record::Normal(Vector3::new(v[0], v[1], v[2]))
            }
            Rule::face => {
                let corners = pair
                    .into_inner()
                    .map(|corner| self.corner(corner, line))
                    .collect::<Result<Vec<_>>>()?;
                let highest = corners.iter().map(|c| c.vertex).max().unwrap_or(0);
                self.face_refs.push((line, highest));
                self.seen_face = true;
                Record::Face(corners)
            }
            Rule::use_material => {
                if !self.seen_face {
                    self.leading_markers += 1;
                    if self.leading_markers > 1 {
                        return Err(FlattenError::malformed(
                            line,
                            "duplicate material marker before the first face",
                        ));
                    }
                }
                Record::UseMaterial(rest_text(pair))
            }
            Rule::material_library => Record::MaterialLibrary(rest_text(pair)),
            Rule::comment => Record::Comment(pair.as_str().trim_end().to_string()),
            Rule::other => Record::Other(pair.as_str().trim_end().to_string()),
            _ => return Ok(()),
        };

        self.records.push(record);
        self.lines.push(line);
        Ok(())
    }

    fn corner(&self, pair: Pair<Rule>, line: usize) -> Result<FaceCorner> {
        let mut corner = FaceCorner::new(0);
        for part in pair.into_inner() {
            let value: i64 = part
                .as_str()
                .parse()
                .map_err(|_| FlattenError::malformed(line, format!("bad index '{}'", part.as_str())))?;
            match part.as_rule() {
                Rule::vertex_ref => corner.vertex = self.resolve_vertex(value, line)?,
                Rule::texcoord_ref => corner.texcoord = Some(value),
                Rule::normal_ref => corner.normal = Some(value),
                _ => {}
            }
        }
        Ok(corner)
    }

    fn resolve_vertex(&self, value: i64, line: usize) -> Result<usize> {
        let resolved = if value > 0 {
            value - 1
        } else if value < 0 {
            self.vertices as i64 + value
        } else {
            -1
        };
        if resolved < 0 {
            return Err(FlattenError::malformed(
                line,
                format!("vertex reference {} is out of range", value),
            ));
        }
        Ok(resolved as usize)
    }

    fn finish(self) -> Result<ObjDocument> {
        if let Some(&(line, highest)) = self.face_refs.iter().find(|(_, v)| *v >= self.vertices) {
            return Err(FlattenError::malformed(
                line,
                format!(
                    "face references vertex {} but only {} vertices exist",
                    highest + 1,
                    self.vertices
                ),
            ));
        }
        Ok(ObjDocument::from_parts(self.records, self.lines))
    }
}

fn floats(pair: Pair<Rule>, line: usize) -> Result<Vec<f64>> {
    pair.into_inner()
        .map(|p| {
            p.as_str()
                .parse::<f64>()
                .map_err(|_| FlattenError::malformed(line, format!("bad number '{}'", p.as_str())))
        })
        .collect()
}

fn rest_text(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().trim().to_string())
        .unwrap_or_default()
}
