//! Scene geometry loaded from an OBJ file
//!
//! A [`Scene`] is the terminal aggregate of an OBJ load: the vertex,
//! normal and UV pools, the faces (grouped and ungrouped), the materials
//! gathered from every referenced library, and the optional object name.
//! Scenes are built once by a single parse and never mutated afterwards;
//! every public accessor is a read-only view.

use crate::math::{Vec2, Vec3};
use crate::wavefront::material::Material;

/// One corner of a polygon: a vertex index with optional UV and normal
/// indices.
///
/// Indices are 0-based positions into the scene pools. The external
/// 1-based (and possibly negative, end-relative) file indices are mapped
/// at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
    /// The vertex index
    pub vertex: usize,
    /// The uv index
    pub uv: Option<usize>,
    /// The normal index
    pub normal: Option<usize>,
}

/// A polygon: an ordered sequence of corners plus a material binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    material: Option<usize>,
    indices: Vec<Index>,
}

impl Face {
    pub(crate) fn new(material: Option<usize>, indices: Vec<Index>) -> Self {
        Self { material, indices }
    }

    /// Position of this face's material in [`Scene::materials`], or
    /// `None` when the face referenced a material that was never defined
    /// (a diagnosed condition) or never referenced one at all.
    pub fn material(&self) -> Option<usize> {
        self.material
    }

    /// The corners of the face in winding order.
    pub fn indices(&self) -> &[Index] {
        &self.indices
    }
}

/// A named partition of faces within a scene.
///
/// One `g` declaration may carry several aliases; every face read while
/// the group was current belongs to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    names: Vec<String>,
    faces: Vec<Face>,
    smoothing_group: Option<i32>,
}

impl Group {
    pub(crate) fn new(names: Vec<String>) -> Self {
        Self {
            names,
            faces: Vec::new(),
            smoothing_group: None,
        }
    }

    pub(crate) fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub(crate) fn set_smoothing_group(&mut self, smoothing_group: Option<i32>) {
        self.smoothing_group = smoothing_group;
    }

    /// The name aliases from the `g` declaration.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The faces assigned to this group, in file order.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// The smoothing-group tag, when one was set with `s`.
    pub fn smoothing_group(&self) -> Option<i32> {
        self.smoothing_group
    }
}

/// A scene of data loaded from an OBJ file.
#[derive(Debug, PartialEq)]
pub struct Scene {
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,
    ungrouped_faces: Vec<Face>,
    groups: Vec<Group>,
    materials: Vec<Material>,
    object_name: Option<String>,
}

impl Scene {
    pub(crate) fn new(
        vertices: Vec<Vec3>,
        uvs: Vec<Vec2>,
        normals: Vec<Vec3>,
        ungrouped_faces: Vec<Face>,
        groups: Vec<Group>,
        materials: Vec<Material>,
        object_name: Option<String>,
    ) -> Self {
        Self {
            vertices,
            uvs,
            normals,
            ungrouped_faces,
            groups,
            materials,
            object_name,
        }
    }

    /// The vertex position pool, in file order.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// The texture coordinate pool, in file order.
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// The normal pool, in file order.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Faces that were read before any `g` declaration.
    pub fn ungrouped_faces(&self) -> &[Face] {
        &self.ungrouped_faces
    }

    /// The groups, in declaration order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Every material loaded from every referenced library, in library
    /// load order. Duplicate names are not merged.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// The name from the `o` directive; many files have none.
    pub fn object_name(&self) -> Option<&str> {
        self.object_name.as_deref()
    }

    /// Resolve a face's material binding against this scene's materials.
    pub fn face_material(&self, face: &Face) -> Option<&Material> {
        face.material().and_then(|i| self.materials.get(i))
    }
}
