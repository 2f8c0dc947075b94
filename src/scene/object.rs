use glam::Vec3;

/// Which loaded mesh a [`SceneObject`] draws.
///
/// Doubles as an index into the engine's mesh table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshSlot {
    /// The floating island.
    Island,
    /// The dragon character.
    Dragon,
    /// The stone portal frame.
    Portal,
    /// The spinning key.
    Key,
    /// The treasure chest.
    Chest,
    /// The transparent diamond (instanced ten times).
    Diamond,
}

impl MeshSlot {
    /// Number of distinct mesh slots.
    pub const COUNT: usize = 6;

    /// Table index for this slot.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Asset file stem for this slot.
    #[must_use]
    pub fn asset_name(self) -> &'static str {
        match self {
            Self::Island => "island",
            Self::Dragon => "dragon",
            Self::Portal => "portal",
            Self::Key => "old_key",
            Self::Chest => "chest",
            Self::Diamond => "diamond",
        }
    }
}

/// Static placement of an object: position, uniform scale, and up to
/// three axis rotations in degrees.
///
/// A rotation of exactly `0.0` means "no rotation about that axis" and is
/// skipped by the transform builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// World-space position.
    pub position: Vec3,
    /// Uniform scale factor. Never zero in valid configurations; zero or
    /// negative values are accepted but produce degenerate geometry.
    pub scale: f32,
    /// Rotation about the X axis, degrees.
    pub rotation_x: f32,
    /// Rotation about the Y axis, degrees.
    pub rotation_y: f32,
    /// Rotation about the Z axis, degrees.
    pub rotation_z: f32,
}

impl Placement {
    /// Placement with no rotation.
    #[must_use]
    pub const fn new(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale,
            rotation_x: 0.0,
            rotation_y: 0.0,
            rotation_z: 0.0,
        }
    }

    /// Set the X rotation (degrees).
    #[must_use]
    pub const fn with_rotation_x(mut self, degrees: f32) -> Self {
        self.rotation_x = degrees;
        self
    }

    /// Set the Y rotation (degrees).
    #[must_use]
    pub const fn with_rotation_y(mut self, degrees: f32) -> Self {
        self.rotation_y = degrees;
        self
    }

    /// Set the Z rotation (degrees).
    #[must_use]
    pub const fn with_rotation_z(mut self, degrees: f32) -> Self {
        self.rotation_z = degrees;
        self
    }
}

/// Continuous time-driven rotation layered on top of a static placement.
///
/// The angle at time `t` is `rate * t` radians about `axis`. Rates are
/// per-object data: the key turns at 1.0 rad/s about Z, the diamonds at
/// 2.0 rad/s about Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Unit rotation axis.
    pub axis: Vec3,
    /// Angular rate in radians per second.
    pub rate: f32,
}

impl Spin {
    /// Spin about the Y axis at the given rate.
    #[must_use]
    pub const fn about_y(rate: f32) -> Self {
        Self { axis: Vec3::Y, rate }
    }

    /// Spin about the Z axis at the given rate.
    #[must_use]
    pub const fn about_z(rate: f32) -> Self {
        Self { axis: Vec3::Z, rate }
    }
}

/// A placed, optionally spinning object in the tableau.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    /// Which mesh this object draws.
    pub slot: MeshSlot,
    /// Static placement.
    pub placement: Placement,
    /// Optional time-driven rotation.
    pub spin: Option<Spin>,
}

impl SceneObject {
    /// A static object with no spin.
    #[must_use]
    pub const fn fixed(slot: MeshSlot, placement: Placement) -> Self {
        Self {
            slot,
            placement,
            spin: None,
        }
    }

    /// An object with a continuous spin.
    #[must_use]
    pub const fn spinning(slot: MeshSlot, placement: Placement, spin: Spin) -> Self {
        Self {
            slot,
            placement,
            spin: Some(spin),
        }
    }
}
