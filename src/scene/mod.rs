//! Scene content: object placements, the transform builder, and the
//! back-to-front transparency sorter.
//!
//! Every placed object is a plain data tuple of mesh slot, [`Placement`],
//! and optional [`Spin`]; the renderer processes them uniformly with no
//! per-object special cases.

/// The fixed tableau: placement constants for every object and light.
pub mod layout;
/// Object placement and motion descriptors.
pub mod object;
/// Model-matrix composition.
pub mod transform;
/// Distance sort for alpha-blended instances.
pub mod transparency;

pub use object::{MeshSlot, Placement, SceneObject, Spin};
pub use transform::model_matrix;
pub use transparency::sort_back_to_front;
