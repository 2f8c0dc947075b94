//! Mesh and texture loading from disk.
//!
//! Models are glTF binaries under `resources/models/`, textures plain
//! image files under `resources/textures/`. A model that fails to load is
//! reported and replaced by an empty primitive list; the viewer keeps
//! running and simply draws nothing in that slot.

use std::path::{Path, PathBuf};

use crate::error::IsleError;
use crate::gpu::context::RenderContext;
use crate::gpu::mesh::{GpuMesh, Vertex};
use crate::gpu::texture::SceneTexture;
use crate::scene::MeshSlot;

/// Root directory for bundled assets, relative to the working directory.
pub const ASSET_DIR: &str = "resources";

/// CPU-side mesh primitive decoded from a glTF file.
#[derive(Debug)]
pub struct MeshData {
    /// Interleaved vertices.
    pub vertices: Vec<Vertex>,
    /// Triangle indices.
    pub indices: Vec<u32>,
    /// Base color pixels (RGBA8) with dimensions, when the primitive's
    /// material carries one.
    pub base_color: Option<(u32, u32, Vec<u8>)>,
}

/// Decode every triangle primitive in a glTF file.
///
/// # Errors
///
/// Returns [`IsleError::MeshLoad`] when the file cannot be read or a
/// primitive is missing positions.
pub fn load_gltf(path: &Path) -> Result<Vec<MeshData>, IsleError> {
    let (document, buffers, images) = gltf::import(path)
        .map_err(|e| IsleError::MeshLoad(format!("{}: {e}", path.display())))?;

    let mut primitives = Vec::new();
    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            let reader = primitive
                .reader(|buffer| buffers.get(buffer.index()).map(|b| &b[..]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or_else(|| {
                    IsleError::MeshLoad(format!(
                        "{}: primitive has no positions",
                        path.display()
                    ))
                })?
                .collect();

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map_or_else(
                    || vec![[0.0, 1.0, 0.0]; positions.len()],
                    Iterator::collect,
                );

            let uvs: Vec<[f32; 2]> = reader.read_tex_coords(0).map_or_else(
                || vec![[0.0, 0.0]; positions.len()],
                |coords| coords.into_f32().collect(),
            );

            let vertices: Vec<Vertex> = positions
                .iter()
                .zip(&normals)
                .zip(&uvs)
                .map(|((position, normal), uv)| Vertex {
                    position: *position,
                    normal: *normal,
                    uv: *uv,
                })
                .collect();

            let indices: Vec<u32> = reader.read_indices().map_or_else(
                || (0..vertices.len() as u32).collect(),
                |idx| idx.into_u32().collect(),
            );

            let base_color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_texture()
                .and_then(|info| images.get(info.texture().source().index()))
                .map(image_to_rgba);

            primitives.push(MeshData {
                vertices,
                indices,
                base_color,
            });
        }
    }

    Ok(primitives)
}

/// Expand a glTF image to tightly packed RGBA8.
fn image_to_rgba(data: &gltf::image::Data) -> (u32, u32, Vec<u8>) {
    let pixels =
        expand_to_rgba(&data.pixels, data.format, data.width, data.height);
    (data.width, data.height, pixels)
}

fn expand_to_rgba(
    pixels: &[u8],
    format: gltf::image::Format,
    width: u32,
    height: u32,
) -> Vec<u8> {
    use gltf::image::Format;

    match format {
        Format::R8G8B8A8 => pixels.to_vec(),
        Format::R8G8B8 => pixels
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect(),
        Format::R8 => pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        Format::R8G8 => pixels
            .chunks_exact(2)
            .flat_map(|rg| [rg[0], rg[1], 0, 255])
            .collect(),
        // 16-bit and float formats are not produced by our asset set.
        _ => {
            log::warn!("unsupported glTF image format {format:?}");
            vec![255; (width * height * 4) as usize]
        }
    }
}

/// Load and upload every primitive for a mesh slot.
///
/// Failure is downgraded to an empty list so a missing model never stops
/// the frame loop.
#[must_use]
pub fn load_slot(
    context: &RenderContext,
    material_layout: &wgpu::BindGroupLayout,
    slot: MeshSlot,
) -> Vec<GpuMesh> {
    let name = slot.asset_name();
    let path = Path::new(ASSET_DIR)
        .join("models")
        .join(format!("{name}.glb"));

    let primitives = match load_gltf(&path) {
        Ok(primitives) => primitives,
        Err(e) => {
            log::error!("model '{name}' unavailable: {e}");
            return Vec::new();
        }
    };

    let fallback =
        SceneTexture::placeholder(&context.device, &context.queue, name);
    primitives
        .iter()
        .enumerate()
        .map(|(i, data)| {
            let diffuse = data.base_color.as_ref().map_or_else(
                || {
                    SceneTexture::placeholder(
                        &context.device,
                        &context.queue,
                        name,
                    )
                },
                |(w, h, pixels)| {
                    SceneTexture::from_rgba(
                        &context.device,
                        &context.queue,
                        name,
                        *w,
                        *h,
                        pixels,
                    )
                },
            );
            GpuMesh::new(
                &context.device,
                &format!("{name}[{i}]"),
                &data.vertices,
                &data.indices,
                material_layout,
                &diffuse,
                // Models carry no specular maps; a white 1x1 leaves the
                // specular term driven by the lights alone.
                &fallback,
            )
        })
        .collect()
}

/// Load the water surface's diffuse and specular textures.
#[must_use]
pub fn load_water_textures(
    context: &RenderContext,
) -> (SceneTexture, SceneTexture) {
    let dir = Path::new(ASSET_DIR).join("textures");
    let diffuse = SceneTexture::from_path(
        &context.device,
        &context.queue,
        &dir.join("water.jpg"),
    );
    let specular = SceneTexture::from_path(
        &context.device,
        &context.queue,
        &dir.join("specular_map.jpg"),
    );
    (diffuse, specular)
}

/// Face paths for the sky cubemap, in +X, -X, +Y, -Y, +Z, -Z order.
#[must_use]
pub fn skybox_face_paths() -> [PathBuf; 6] {
    let dir = Path::new(ASSET_DIR).join("textures").join("skybox");
    [
        dir.join("cloudtop_right.jpg"),
        dir.join("cloudtop_left.jpg"),
        dir.join("cloudtop_top.jpg"),
        dir.join("cloudtop_bottom.jpg"),
        dir.join("cloudtop_front.jpg"),
        dir.join("cloudtop_back.jpg"),
    ]
}

/// Load the sky cubemap.
#[must_use]
pub fn load_skybox(context: &RenderContext) -> SceneTexture {
    SceneTexture::cubemap_from_paths(
        &context.device,
        &context.queue,
        &skybox_face_paths(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_gltf_is_a_mesh_load_error() {
        let err = load_gltf(Path::new("does/not/exist.glb")).unwrap_err();
        assert!(matches!(err, IsleError::MeshLoad(_)));
    }

    #[test]
    fn rgb_pixels_gain_opaque_alpha() {
        let rgba = expand_to_rgba(
            &[10, 20, 30, 40, 50, 60],
            gltf::image::Format::R8G8B8,
            2,
            1,
        );
        assert_eq!(rgba, vec![10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn grayscale_pixels_broadcast_to_rgb() {
        let rgba =
            expand_to_rgba(&[7, 200], gltf::image::Format::R8, 2, 1);
        assert_eq!(rgba, vec![7, 7, 7, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn skybox_faces_follow_cube_layer_order() {
        let faces = skybox_face_paths();
        let names: Vec<String> = faces
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "cloudtop_right.jpg",
                "cloudtop_left.jpg",
                "cloudtop_top.jpg",
                "cloudtop_bottom.jpg",
                "cloudtop_front.jpg",
                "cloudtop_back.jpg",
            ]
        );
    }
}
