//! Texture creation and decoding.
//!
//! Asset decoding failures are never fatal: a failed load is reported to
//! the log and the caller receives a 1x1 placeholder, so the frame loop
//! keeps running with visibly wrong (but harmless) output.

use std::path::Path;

/// A sampled 2D or cube texture with its default view.
pub struct SceneTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl SceneTexture {
    /// Upload RGBA8 pixels as a 2D texture.
    #[must_use]
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            texture.as_image_copy(),
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Decode an image file into a 2D texture. On failure, logs the error
    /// and returns [`Self::placeholder`].
    #[must_use]
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Self {
        match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                Self::from_rgba(
                    device,
                    queue,
                    &path.display().to_string(),
                    width,
                    height,
                    &rgba,
                )
            }
            Err(e) => {
                log::error!("texture failed to load at {}: {e}", path.display());
                Self::placeholder(device, queue, "placeholder")
            }
        }
    }

    /// 1x1 opaque white stand-in for a missing texture.
    #[must_use]
    pub fn placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
    ) -> Self {
        Self::from_rgba(device, queue, label, 1, 1, &[255, 255, 255, 255])
    }

    /// Decode six face images into a cube texture.
    ///
    /// `faces` are in wgpu cube-layer order: +X, -X, +Y, -Y, +Z, -Z.
    /// A face that fails to decode is logged and left as transparent
    /// black; mismatched face sizes fall back to the first face's size.
    #[must_use]
    pub fn cubemap_from_paths(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[std::path::PathBuf; 6],
    ) -> Self {
        let decoded: Vec<Option<image::RgbaImage>> = faces
            .iter()
            .map(|path| match image::open(path) {
                Ok(img) => Some(img.to_rgba8()),
                Err(e) => {
                    log::error!(
                        "cubemap face failed to load at {}: {e}",
                        path.display()
                    );
                    None
                }
            })
            .collect();

        let (width, height) = decoded
            .iter()
            .flatten()
            .next()
            .map_or((1, 1), image::RgbaImage::dimensions);

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 6,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Skybox Cubemap"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, face) in decoded.iter().enumerate() {
            let Some(face) = face else { continue };
            if face.dimensions() != (width, height) {
                log::error!(
                    "cubemap face {layer} has size {:?}, expected {:?}",
                    face.dimensions(),
                    (width, height)
                );
                continue;
            }
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: layer as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                face,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        Self { texture, view }
    }
}

/// Depth format shared by every scene pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Create the depth attachment for the current surface size.
#[must_use]
pub fn create_depth_view(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Repeat + Linear sampler shared by material and skybox bindings.
#[must_use]
pub fn linear_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
