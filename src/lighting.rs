//! Light descriptors and their GPU uniform.
//!
//! Three fixed Blinn-Phong lights: a directional sun, a point light inside
//! the chest, and a spotlight attached to the camera (a flashlight, lit
//! only while the lamp key is held).

use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::gpu::context::RenderContext;

/// Directional light: parallel rays, no falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels (not normalized on upload; the shader
    /// normalizes).
    pub direction: Vec3,
    /// Ambient color contribution.
    pub ambient: Vec3,
    /// Diffuse color contribution.
    pub diffuse: Vec3,
    /// Specular color contribution.
    pub specular: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.004_397_22, -0.544_639, -0.838_659),
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.7),
            specular: Vec3::splat(0.5),
        }
    }
}

/// Point light with quadratic distance attenuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position.
    pub position: Vec3,
    /// Ambient color contribution.
    pub ambient: Vec3,
    /// Diffuse color contribution.
    pub diffuse: Vec3,
    /// Specular color contribution.
    pub specular: Vec3,
    /// Constant attenuation factor.
    pub constant: f32,
    /// Linear attenuation factor.
    pub linear: f32,
    /// Quadratic attenuation factor.
    pub quadratic: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        // Sits just above the chest lid.
        Self {
            position: Vec3::new(10.9758, 0.322_281, -0.091_666_7),
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(1.0),
            constant: 1.0,
            linear: 0.7,
            quadratic: 1.8,
        }
    }
}

/// Camera-attached spotlight with a smooth cone falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    /// World-space position (tracks the camera every frame).
    pub position: Vec3,
    /// Cone direction (tracks the camera front every frame).
    pub direction: Vec3,
    /// Ambient color contribution.
    pub ambient: Vec3,
    /// Diffuse color contribution.
    pub diffuse: Vec3,
    /// Specular color contribution.
    pub specular: Vec3,
    /// Constant attenuation factor.
    pub constant: f32,
    /// Linear attenuation factor.
    pub linear: f32,
    /// Quadratic attenuation factor.
    pub quadratic: f32,
    /// Lit only while the lamp key is held.
    pub on: bool,
    cut_off_deg: f32,
    outer_cut_off_deg: f32,
}

impl SpotLight {
    /// Inner cone half-angle in degrees (full intensity inside).
    #[must_use]
    pub fn cut_off(&self) -> f32 {
        self.cut_off_deg
    }

    /// Outer cone half-angle in degrees (falloff edge).
    #[must_use]
    pub fn outer_cut_off(&self) -> f32 {
        self.outer_cut_off_deg
    }

    /// Set the cone angles. Invariant: outer >= inner. Anything else
    /// inverts the falloff band, so the outer angle is clamped up to the
    /// inner one.
    pub fn set_cut_off(&mut self, inner_deg: f32, outer_deg: f32) {
        self.cut_off_deg = inner_deg;
        self.outer_cut_off_deg = outer_deg.max(inner_deg);
    }

    /// Track the camera: the spotlight is a flashlight fixed to the view.
    pub fn follow_camera(&mut self, camera: &Camera) {
        self.position = camera.position;
        self.direction = camera.front;
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            ambient: Vec3::ZERO,
            diffuse: Vec3::splat(1.0),
            specular: Vec3::splat(1.0),
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
            on: false,
            cut_off_deg: 12.5,
            outer_cut_off_deg: 15.0,
        }
    }
}

/// Lighting configuration shared by the scene shader.
/// NOTE: Must match the WGSL struct layout exactly (vec3 fields padded to
/// 16 bytes, with attenuation scalars packed into the pad slots).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    dir_direction: [f32; 3],
    _pad0: f32,
    dir_ambient: [f32; 3],
    _pad1: f32,
    dir_diffuse: [f32; 3],
    _pad2: f32,
    dir_specular: [f32; 3],
    _pad3: f32,

    point_position: [f32; 3],
    point_constant: f32,
    point_ambient: [f32; 3],
    point_linear: f32,
    point_diffuse: [f32; 3],
    point_quadratic: f32,
    point_specular: [f32; 3],
    _pad4: f32,

    spot_position: [f32; 3],
    spot_constant: f32,
    spot_direction: [f32; 3],
    spot_linear: f32,
    spot_ambient: [f32; 3],
    spot_quadratic: f32,
    spot_diffuse: [f32; 3],
    spot_cut_off: f32,
    spot_specular: [f32; 3],
    spot_outer_cut_off: f32,

    view_position: [f32; 3],
    shininess: f32,
}

impl LightingUniform {
    /// Material specular exponent shared by every mesh.
    pub const SHININESS: f32 = 32.0;

    fn zeroed_spot() -> ([f32; 3], [f32; 3], [f32; 3]) {
        ([0.0; 3], [0.0; 3], [0.0; 3])
    }

    /// Rebuild the uniform from the current light and camera state.
    ///
    /// Cone angles are converted to cosines here; the shader compares
    /// them directly against dot products. A switched-off spotlight
    /// uploads zero colors, which zeroes its contribution without a
    /// shader branch.
    pub fn update(
        &mut self,
        dir: &DirectionalLight,
        point: &PointLight,
        spot: &SpotLight,
        view_position: Vec3,
    ) {
        self.dir_direction = dir.direction.to_array();
        self.dir_ambient = dir.ambient.to_array();
        self.dir_diffuse = dir.diffuse.to_array();
        self.dir_specular = dir.specular.to_array();

        self.point_position = point.position.to_array();
        self.point_ambient = point.ambient.to_array();
        self.point_diffuse = point.diffuse.to_array();
        self.point_specular = point.specular.to_array();
        self.point_constant = point.constant;
        self.point_linear = point.linear;
        self.point_quadratic = point.quadratic;

        self.spot_position = spot.position.to_array();
        self.spot_direction = spot.direction.to_array();
        let (ambient, diffuse, specular) = if spot.on {
            (
                spot.ambient.to_array(),
                spot.diffuse.to_array(),
                spot.specular.to_array(),
            )
        } else {
            Self::zeroed_spot()
        };
        self.spot_ambient = ambient;
        self.spot_diffuse = diffuse;
        self.spot_specular = specular;
        self.spot_constant = spot.constant;
        self.spot_linear = spot.linear;
        self.spot_quadratic = spot.quadratic;
        self.spot_cut_off = spot.cut_off().to_radians().cos();
        self.spot_outer_cut_off = spot.outer_cut_off().to_radians().cos();

        self.view_position = view_position.to_array();
        self.shininess = Self::SHININESS;
    }
}

impl Default for LightingUniform {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

/// Owns the light descriptors plus their GPU buffer and bind group.
pub struct Lighting {
    /// The directional sun.
    pub dir: DirectionalLight,
    /// The chest point light.
    pub point: PointLight,
    /// The camera flashlight.
    pub spot: SpotLight,
    uniform: LightingUniform,
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Create the default light rig and its GPU resources.
    #[must_use]
    pub fn new(context: &RenderContext) -> Self {
        let uniform = LightingUniform::default();

        let buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Lighting Buffer"),
                    contents: bytemuck::cast_slice(&[uniform]),
                    usage: wgpu::BufferUsages::UNIFORM
                        | wgpu::BufferUsages::COPY_DST,
                });

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Lighting Bind Group"),
                });

        Self {
            dir: DirectionalLight::default(),
            point: PointLight::default(),
            spot: SpotLight::default(),
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Bind group layout for pipeline construction.
    #[must_use]
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Bind group for draw calls.
    #[must_use]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Refresh the spotlight from the camera, rebuild the uniform, and
    /// upload it. Called once per frame before any draw.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue, camera: &Camera) {
        self.spot.follow_camera(camera);
        self.uniform
            .update(&self.dir, &self.point, &self.spot, camera.position);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_cut_off_clamps_to_inner() {
        let mut spot = SpotLight::default();
        spot.set_cut_off(20.0, 10.0);
        assert_eq!(spot.cut_off(), 20.0);
        assert_eq!(spot.outer_cut_off(), 20.0);

        spot.set_cut_off(12.5, 15.0);
        assert_eq!(spot.outer_cut_off(), 15.0);
    }

    #[test]
    fn cut_offs_upload_as_cosines() {
        let mut uniform = LightingUniform::default();
        let mut spot = SpotLight::default();
        spot.on = true;
        uniform.update(
            &DirectionalLight::default(),
            &PointLight::default(),
            &spot,
            Vec3::ZERO,
        );
        assert!((uniform.spot_cut_off - 12.5_f32.to_radians().cos()).abs() < 1e-6);
        assert!(
            (uniform.spot_outer_cut_off - 15.0_f32.to_radians().cos()).abs() < 1e-6
        );
        // Inner cosine is larger than outer cosine for a valid band.
        assert!(uniform.spot_cut_off > uniform.spot_outer_cut_off);
    }

    #[test]
    fn switched_off_spot_uploads_zero_colors() {
        let mut uniform = LightingUniform::default();
        let spot = SpotLight::default();
        assert!(!spot.on);
        uniform.update(
            &DirectionalLight::default(),
            &PointLight::default(),
            &spot,
            Vec3::ZERO,
        );
        assert_eq!(uniform.spot_diffuse, [0.0; 3]);
        assert_eq!(uniform.spot_specular, [0.0; 3]);
    }

    #[test]
    fn spot_follows_camera() {
        let mut spot = SpotLight::default();
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        camera.process_mouse_movement(250.0, -80.0);
        spot.follow_camera(&camera);
        assert_eq!(spot.position, camera.position);
        assert_eq!(spot.direction, camera.front);
    }

    #[test]
    fn uniform_size_matches_wgsl_layout() {
        // 14 rows of 16 bytes: 4 directional, 4 point, 5 spot, 1 camera.
        assert_eq!(size_of::<LightingUniform>(), 224);
    }
}
