//! Material records loaded from MTL libraries

use std::path::PathBuf;

use crate::image_loader::ImageData;

/// An RGBA color with float components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Color {
    /// Create a color from RGBA components.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }
}

/// A texture map referenced by a material.
///
/// The map always carries the file-relative path as written in the MTL
/// file. The decoded image is only present when the load was performed
/// with an image decoder; otherwise the map is just a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureMap {
    /// The texture path as referenced by the MTL file
    pub path: PathBuf,
    /// The decoded image, when eager loading was requested and succeeded
    pub image: Option<ImageData>,
}

impl TextureMap {
    /// Create a texture map carrying only its file reference.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            image: None,
        }
    }
}

/// A material from an MTL library.
///
/// Field-to-directive mapping follows the Wavefront MTL format; see
/// <http://paulbourke.net/dataformats/mtl/> for the directive meanings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    /// The material name (`newmtl`), the lookup key for `usemtl`
    pub name: String,
    /// Ambient color (`Ka`)
    pub ambient: Color,
    /// Diffuse color (`Kd`)
    pub diffuse: Color,
    /// Specular color (`Ks`)
    pub specular: Color,
    /// Specular exponent (`Ns`)
    pub shininess: f32,
    /// Transparency (`d` or `Tr`).
    ///
    /// Both directives write this field verbatim even though the format
    /// historically defines them with inverted meaning (`d 1` opaque,
    /// `Tr 1` fully transparent). The value is passed through untouched;
    /// consumers decide which convention their data uses.
    pub transparency: Option<f32>,
    /// Transmission filter color (`Tf`)
    pub transmission_filter: Option<Color>,
    /// Optical density, also known as the index of refraction (`Ni`)
    pub optical_density: Option<f32>,
    /// The occasionally used bump strength (`Km`)
    pub bump_strength: Option<f32>,
    /// Illumination model (`illum`), 0-10
    pub illumination_model: i32,
    /// Ambient texture map (`map_Ka`)
    pub texture_map_ambient: Option<TextureMap>,
    /// Diffuse texture map (`map_Kd`)
    pub texture_map_diffuse: Option<TextureMap>,
    /// Specular texture map (`map_Ks`)
    pub texture_map_specular: Option<TextureMap>,
    /// Specular highlight texture map (`map_Ns`)
    pub texture_map_specular_highlight: Option<TextureMap>,
    /// Alpha texture map (`map_d`)
    pub texture_map_alpha: Option<TextureMap>,
    /// Bump texture map (`map_bump`)
    pub texture_map_bump: Option<TextureMap>,
}

impl Material {
    /// Create an empty material with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_rgb_defaults_alpha() {
        let color = Color::rgb(0.25, 0.5, 0.75);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_named_material_defaults() {
        let material = Material::named("steel");
        assert_eq!(material.name, "steel");
        assert_eq!(material.transparency, None);
        assert!(material.texture_map_diffuse.is_none());
    }
}
