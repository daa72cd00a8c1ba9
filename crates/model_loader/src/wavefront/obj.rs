//! Loader for the Wavefront *.obj scene format
//!
//! The loader is a state machine over a line-oriented directive stream.
//! Group and material context are sticky: once set they apply to every
//! subsequent face until changed. Faces are collected as interim records
//! during the line pass; material names are only resolved to material
//! records in a post-pass, once every `mtllib` has been ingested.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::diagnostics::{Diagnostic, FileLoadResult};
use crate::image_loader::ImageDecoder;
use crate::math::{Vec2, Vec3};
use crate::wavefront::line::{split_directive, strip_comments};
use crate::wavefront::material::Material;
use crate::wavefront::mtl::MtlLoader;
use crate::wavefront::scene::{Face, Group, Index, Scene};
use crate::wavefront::{LineError, LoadContext, WavefrontError};

/// A face as gathered during the line pass: indices plus the sticky
/// context that was current when its line was read. The material is
/// still a name; it becomes a material reference in the post-pass.
struct InterimFace {
    material_name: Option<String>,
    indices: Vec<Index>,
    group: Option<usize>,
}

/// A file loader for the Wavefront *.obj file format.
pub struct ObjLoader;

impl ObjLoader {
    /// Load a scene from a file.
    ///
    /// All warnings and errors gathered along the way (including those
    /// from referenced material libraries) are in the returned result's
    /// diagnostics; the scene itself is best-effort. Passing a decoder
    /// eagerly loads the texture images referenced by the material
    /// libraries. The file handle is scoped to this call.
    pub fn load(
        path: impl AsRef<Path>,
        decoder: Option<&dyn ImageDecoder>,
    ) -> Result<FileLoadResult<Scene>, WavefrontError> {
        let path = path.as_ref();
        log::debug!("Loading OBJ scene from {:?}", path);
        let reader = BufReader::new(File::open(path)?);
        let mut context = LoadContext::with_path(path);
        if let Some(decoder) = decoder {
            context = context.with_decoder(decoder);
        }
        Self::read(reader, context)
    }

    /// Read a scene from a stream.
    ///
    /// The `context` supplies the file name for diagnostics, the base
    /// directory for `mtllib` references, and the optional image decoder
    /// passed down to material loads.
    pub fn read<R: BufRead>(
        reader: R,
        context: LoadContext<'_>,
    ) -> Result<FileLoadResult<Scene>, WavefrontError> {
        let file = context.file_name();
        let file = file.as_deref();

        // Raw data gathered over the line pass.
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut vertices: Vec<Vec3> = Vec::new();
        let mut normals: Vec<Vec3> = Vec::new();
        let mut uvs: Vec<Vec2> = Vec::new();
        let mut interim_faces: Vec<InterimFace> = Vec::new();
        let mut materials: Vec<Material> = Vec::new();
        let mut groups: Vec<Group> = Vec::new();
        let mut object_name: Option<String> = None;

        // Sticky context: applies to every face until explicitly changed.
        let mut current_group: Option<usize> = None;
        let mut current_material_name: Option<String> = None;

        for (line_index, line) in reader.lines().enumerate() {
            let line_number = line_index as u64 + 1;
            let line = line?;

            let line = strip_comments(&line);
            let Some((directive, data)) = split_directive(line) else {
                continue;
            };

            match directive {
                "v" => {
                    if let Err(cause) = read_vec3(data).map(|v| vertices.push(v)) {
                        diagnostics.push(
                            Diagnostic::error(
                                file,
                                Some(line_number),
                                "There was an error reading the vertex data.",
                            )
                            .with_cause(cause),
                        );
                    }
                }
                "vn" => {
                    if let Err(cause) = read_vec3(data).map(|v| normals.push(v)) {
                        diagnostics.push(
                            Diagnostic::error(
                                file,
                                Some(line_number),
                                "There was an error reading the normal data.",
                            )
                            .with_cause(cause),
                        );
                    }
                }
                "vt" => {
                    if let Err(cause) = read_vec2(data).map(|v| uvs.push(v)) {
                        diagnostics.push(
                            Diagnostic::error(
                                file,
                                Some(line_number),
                                "There was an error reading the texture coordinate data.",
                            )
                            .with_cause(cause),
                        );
                    }
                }
                "f" => {
                    match read_face_indices(data, vertices.len(), uvs.len(), normals.len()) {
                        Ok(indices) => interim_faces.push(InterimFace {
                            material_name: current_material_name.clone(),
                            indices,
                            group: current_group,
                        }),
                        Err(cause) => diagnostics.push(
                            Diagnostic::error(
                                file,
                                Some(line_number),
                                "There was an error reading the index data.",
                            )
                            .with_cause(cause),
                        ),
                    }
                }
                "mtllib" => {
                    // The material file path is the line data, resolved
                    // against the OBJ file's directory when relative.
                    let material_path = context.resolve(data);
                    match MtlLoader::load(&material_path, context.decoder()) {
                        Ok(result) => {
                            materials.extend(result.model);
                            diagnostics.extend(result.diagnostics);
                        }
                        Err(cause) => diagnostics.push(
                            Diagnostic::error(
                                file,
                                Some(line_number),
                                format!(
                                    "Failed to load material file '{}'.",
                                    material_path.display()
                                ),
                            )
                            .with_cause(cause),
                        ),
                    }
                }
                "usemtl" => {
                    current_material_name = Some(data.to_owned());
                }
                "g" => {
                    let names = data.split_whitespace().map(str::to_owned).collect();
                    groups.push(Group::new(names));
                    current_group = Some(groups.len() - 1);
                }
                "s" => match current_group {
                    None => diagnostics.push(Diagnostic::warning(
                        file,
                        Some(line_number),
                        format!(
                            "Cannot set smoothing group '{}' as the current context has no group.",
                            data
                        ),
                    )),
                    Some(group) => {
                        // A non-integer payload (`off`) clears the tag.
                        groups[group].set_smoothing_group(data.parse().ok());
                    }
                },
                "o" => {
                    if let Some(ref previous) = object_name {
                        diagnostics.push(Diagnostic::warning(
                            file,
                            Some(line_number),
                            format!(
                                "An object name statement to set the name to '{}' will overwrite the current object name '{}'.",
                                data, previous
                            ),
                        ));
                    }
                    object_name = Some(data.to_owned());
                }
                _ => diagnostics.push(Diagnostic::warning(
                    file,
                    Some(line_number),
                    format!("Skipped unknown line type '{}'.", directive),
                )),
            }
        }

        // During the line pass faces only carry material names. Now that
        // every mtllib has been ingested, resolve the names to positions
        // in the material list and hand each face to its group.
        let mut ungrouped_faces: Vec<Face> = Vec::new();
        for interim in interim_faces {
            let material = match interim.material_name {
                Some(name) => {
                    let position = materials.iter().position(|m| m.name == name);
                    if position.is_none() {
                        diagnostics.push(Diagnostic::warning(
                            file,
                            None,
                            format!(
                                "Material '{}' is referenced for a face, but not included in any material files.",
                                name
                            ),
                        ));
                    }
                    position
                }
                None => None,
            };

            let face = Face::new(material, interim.indices);
            match interim.group {
                Some(group) => groups[group].add_face(face),
                None => ungrouped_faces.push(face),
            }
        }

        log::debug!(
            "Read OBJ scene: {} vertices, {} normals, {} uvs, {} groups, {} materials ({} diagnostics)",
            vertices.len(),
            normals.len(),
            uvs.len(),
            groups.len(),
            materials.len(),
            diagnostics.len()
        );

        let scene = Scene::new(
            vertices,
            uvs,
            normals,
            ungrouped_faces,
            groups,
            materials,
            object_name,
        );
        Ok(FileLoadResult::new(scene, diagnostics))
    }
}

fn read_vec3(data: &str) -> Result<Vec3, LineError> {
    let mut parts = data.split_whitespace();
    let mut components = [0.0_f32; 3];
    for (found, component) in components.iter_mut().enumerate() {
        let token = parts.next().ok_or(LineError::MissingComponents {
            expected: 3,
            found,
        })?;
        *component = token.parse()?;
    }
    Ok(Vec3::new(components[0], components[1], components[2]))
}

fn read_vec2(data: &str) -> Result<Vec2, LineError> {
    let mut parts = data.split_whitespace();
    let mut components = [0.0_f32; 2];
    for (found, component) in components.iter_mut().enumerate() {
        let token = parts.next().ok_or(LineError::MissingComponents {
            expected: 2,
            found,
        })?;
        *component = token.parse()?;
    }
    Ok(Vec2::new(components[0], components[1]))
}

/// Parse the corners of a face line against the pools as they stand right
/// now.
///
/// Relative (non-positive) indices must be mapped immediately: they refer
/// to the pool length at the time the face line is read, not at end of
/// file.
fn read_face_indices(
    data: &str,
    vertex_count: usize,
    uv_count: usize,
    normal_count: usize,
) -> Result<Vec<Index>, LineError> {
    let mut indices = Vec::new();

    for corner in data.split_whitespace() {
        let mut parts = corner.split('/');

        let vertex_part = parts.next().unwrap_or_default();
        let vertex = map_index(vertex_count, vertex_part.trim().parse()?)?;

        let uv = match parts.next() {
            Some(part) if !part.is_empty() => Some(map_index(uv_count, part.trim().parse()?)?),
            _ => None,
        };
        let normal = match parts.next() {
            Some(part) if !part.is_empty() => Some(map_index(normal_count, part.trim().parse()?)?),
            _ => None,
        };

        indices.push(Index { vertex, uv, normal });
    }

    Ok(indices)
}

/// Map an index as defined in the file onto a pool position.
///
/// File indices are 1-based; non-positive indices count backwards from
/// the current end of the pool. One that reaches below the start of the
/// pool cannot name anything and fails the line.
fn map_index(current_element_count: usize, index: i64) -> Result<usize, LineError> {
    let mapped = if index > 0 {
        index - 1
    } else {
        current_element_count as i64 + index
    };
    usize::try_from(mapped).map_err(|_| LineError::IndexOutOfRange {
        index,
        pool_len: current_element_count,
    })
}
