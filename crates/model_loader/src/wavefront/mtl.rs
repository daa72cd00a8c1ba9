//! Loader for the Wavefront *.mtl material library format
//!
//! MTL files are line oriented: `newmtl` opens a material and every
//! following property directive enriches it until the next `newmtl`.
//! Property directives seen before any `newmtl` have no material to apply
//! to and are skipped with a warning. Numeric failures are confined to
//! their line; the rest of the library still loads.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::diagnostics::{Diagnostic, FileLoadResult};
use crate::image_loader::ImageDecoder;
use crate::wavefront::line::{split_directive, strip_comments};
use crate::wavefront::material::{Color, Material, TextureMap};
use crate::wavefront::{LineError, LoadContext, WavefrontError};

/// A file loader for the Wavefront *.mtl file format.
pub struct MtlLoader;

impl MtlLoader {
    /// Load materials from a file.
    ///
    /// The file is opened read-only and the handle is scoped to this
    /// call. Relative texture references resolve against the file's
    /// directory. Passing a decoder loads texture images eagerly; without
    /// one the texture maps carry only their file references.
    pub fn load(
        path: impl AsRef<Path>,
        decoder: Option<&dyn ImageDecoder>,
    ) -> Result<FileLoadResult<Vec<Material>>, WavefrontError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut context = LoadContext::with_path(path);
        if let Some(decoder) = decoder {
            context = context.with_decoder(decoder);
        }
        Self::read(reader, context)
    }

    /// Read material data from a stream.
    ///
    /// The `context` supplies the file name for diagnostics, the base
    /// directory for texture references, and the optional image decoder
    /// for eager texture loading.
    pub fn read<R: BufRead>(
        reader: R,
        context: LoadContext<'_>,
    ) -> Result<FileLoadResult<Vec<Material>>, WavefrontError> {
        let file = context.file_name();
        let file = file.as_deref();

        // The model we are loading is a list of materials; as we go we
        // enrich the one most recently opened by `newmtl`.
        let mut materials: Vec<Material> = Vec::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        for (line_index, line) in reader.lines().enumerate() {
            let line_number = line_index as u64 + 1;
            let line = line?;

            let line = strip_comments(&line);
            let Some((directive, data)) = split_directive(line) else {
                continue;
            };

            if directive == "newmtl" {
                materials.push(Material::named(data));
                continue;
            }

            let Some(current) = materials.last_mut() else {
                // Property directives before any newmtl have nothing to
                // apply to.
                diagnostics.push(Diagnostic::warning(
                    file,
                    Some(line_number),
                    format!(
                        "Skipped unknown or out of context line type '{}'.",
                        directive
                    ),
                ));
                continue;
            };

            let applied: Result<(), LineError> = match directive {
                "Ka" => read_color(data).map(|c| current.ambient = c),
                "Kd" => read_color(data).map(|c| current.diffuse = c),
                "Ks" => read_color(data).map(|c| current.specular = c),
                "Ns" => read_float(data).map(|v| current.shininess = v),
                "Ni" => read_float(data).map(|v| current.optical_density = Some(v)),
                "Km" => read_float(data).map(|v| current.bump_strength = Some(v)),
                // d and Tr both write the transparency verbatim; the
                // historical sign inversion between them is deliberately
                // not corrected here.
                "d" | "Tr" => read_float(data).map(|v| current.transparency = Some(v)),
                "Tf" => read_color(data).map(|c| current.transmission_filter = Some(c)),
                "illum" => data
                    .trim()
                    .parse::<i32>()
                    .map(|v| current.illumination_model = v)
                    .map_err(LineError::from),
                "map_Ka" => {
                    current.texture_map_ambient =
                        read_texture_map(data, &context, file, line_number, &mut diagnostics);
                    Ok(())
                }
                "map_Kd" => {
                    current.texture_map_diffuse =
                        read_texture_map(data, &context, file, line_number, &mut diagnostics);
                    Ok(())
                }
                "map_Ks" => {
                    current.texture_map_specular =
                        read_texture_map(data, &context, file, line_number, &mut diagnostics);
                    Ok(())
                }
                "map_Ns" => {
                    current.texture_map_specular_highlight =
                        read_texture_map(data, &context, file, line_number, &mut diagnostics);
                    Ok(())
                }
                "map_d" => {
                    current.texture_map_alpha =
                        read_texture_map(data, &context, file, line_number, &mut diagnostics);
                    Ok(())
                }
                "map_bump" => {
                    current.texture_map_bump =
                        read_texture_map(data, &context, file, line_number, &mut diagnostics);
                    Ok(())
                }
                _ => {
                    diagnostics.push(Diagnostic::warning(
                        file,
                        Some(line_number),
                        format!("Skipped unknown line type '{}'.", directive),
                    ));
                    Ok(())
                }
            };

            if let Err(cause) = applied {
                diagnostics.push(
                    Diagnostic::error(
                        file,
                        Some(line_number),
                        format!("There was an error reading the {} data.", directive),
                    )
                    .with_cause(cause),
                );
            }
        }

        log::debug!(
            "Read {} materials ({} diagnostics)",
            materials.len(),
            diagnostics.len()
        );
        Ok(FileLoadResult::new(materials, diagnostics))
    }
}

/// Parse an RGB color with an optional fourth alpha component.
fn read_color(data: &str) -> Result<Color, LineError> {
    let parts: Vec<&str> = data.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(LineError::MissingComponents {
            expected: 3,
            found: parts.len(),
        });
    }
    let r = parts[0].parse::<f32>()?;
    let g = parts[1].parse::<f32>()?;
    let b = parts[2].parse::<f32>()?;
    let a = if parts.len() >= 4 {
        parts[3].parse::<f32>()?
    } else {
        1.0
    };
    Ok(Color::new(r, g, b, a))
}

fn read_float(data: &str) -> Result<f32, LineError> {
    let token = data.split_whitespace().next().ok_or(LineError::MissingComponents {
        expected: 1,
        found: 0,
    })?;
    Ok(token.parse::<f32>()?)
}

/// Read a texture map directive payload.
///
/// A double-quoted path takes precedence when present; otherwise the last
/// whitespace-delimited token is the filename and any preceding option
/// flags are dropped (texture-map options are unsupported). The path is
/// always recorded; the image itself is only resolved when the context
/// carries a decoder.
fn read_texture_map(
    data: &str,
    context: &LoadContext<'_>,
    file: Option<&str>,
    line_number: u64,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<TextureMap> {
    let texture_file_name = if let Some(quote_pos) = data.find('"') {
        let after_quote = &data[quote_pos + 1..];
        match after_quote.find('"') {
            Some(end) => &after_quote[..end],
            None => {
                diagnostics.push(Diagnostic::error(
                    file,
                    Some(line_number),
                    "The texture file is specified incorrectly.",
                ));
                return None;
            }
        }
    } else {
        data.split_whitespace().last()?
    };

    let mut texture_map = TextureMap::new(texture_file_name);

    if let Some(decoder) = context.decoder() {
        let resolved = context.resolve(texture_file_name);
        match decoder.decode(&resolved) {
            Ok(image) => texture_map.image = Some(image),
            Err(cause) => diagnostics.push(
                Diagnostic::error(
                    file,
                    Some(line_number),
                    format!(
                        "Failed to load the texture map image file '{}'.",
                        texture_file_name
                    ),
                )
                .with_cause(cause),
            ),
        }
    }

    Some(texture_map)
}
