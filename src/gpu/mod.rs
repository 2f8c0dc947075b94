//! GPU plumbing: device/surface ownership, textures, and mesh buffers.

/// Core wgpu context: device, queue, surface, configuration.
pub mod context;
/// Vertex/index buffers and material bind groups.
pub mod mesh;
/// 2D, cubemap, and depth texture helpers.
pub mod texture;
