//! The hand-placed tableau.
//!
//! Every constant here is design-time data: object placements were tuned
//! by eye against the island model and are not derived from anything.

use glam::Vec3;

use super::object::{MeshSlot, Placement, SceneObject, Spin};

/// Where the camera starts when no persisted state overrides it.
pub const CAMERA_START: Vec3 = Vec3::new(14.4107, 0.438_836, 19.0486);

/// Number of diamond instances.
pub const DIAMOND_COUNT: usize = 10;

/// Uniform scale shared by all diamond instances.
pub const DIAMOND_SCALE: f32 = 0.002;

/// Diamonds spin about Y at 2 rad/s.
pub const DIAMOND_SPIN: Spin = Spin::about_y(2.0);

/// The opaque objects in their fixed draw order.
#[must_use]
pub fn opaque_objects() -> Vec<SceneObject> {
    vec![
        SceneObject::fixed(
            MeshSlot::Island,
            Placement::new(Vec3::new(12.0, 0.0, 1.0), 0.2),
        ),
        SceneObject::fixed(
            MeshSlot::Dragon,
            Placement::new(Vec3::new(15.498, -1.85, 5.23524), 1.0)
                .with_rotation_y(-85.0),
        ),
        SceneObject::fixed(
            MeshSlot::Portal,
            Placement::new(Vec3::new(17.13, -1.94783, 6.77324), 0.04)
                .with_rotation_y(55.0),
        ),
        // The key spins about Z on top of its static X tilt.
        SceneObject::spinning(
            MeshSlot::Key,
            Placement::new(Vec3::new(8.97785, -0.11684, 1.30846), 0.05)
                .with_rotation_x(55.0),
            Spin::about_z(1.0),
        ),
        SceneObject::fixed(
            MeshSlot::Chest,
            Placement::new(Vec3::new(10.9758, 0.222_281, -0.091_666_7), 0.08)
                .with_rotation_y(150.0),
        ),
    ]
}

/// Starting positions of the ten diamond instances; re-ordered every
/// frame by the transparency sorter.
#[must_use]
pub fn diamond_positions() -> Vec<Vec3> {
    vec![
        Vec3::new(10.5225, -0.873_134, 5.12017),
        Vec3::new(10.1371, -0.873_134, 5.24705),
        Vec3::new(9.76582, -0.873_134, 5.18574),
        Vec3::new(8.45477, -0.37, 1.93658),
        Vec3::new(8.51452, -0.37, 2.37812),
        Vec3::new(12.587, 0.18, 3.19113),
        Vec3::new(12.1414, 0.18, 3.12796),
        Vec3::new(12.9761, 0.18, 2.97769),
        Vec3::new(13.8174, -0.09, -0.020_390_1),
        Vec3::new(14.0017, -0.09, 0.311_945),
    ]
}

/// Placement of the water quad filling the portal arch.
#[must_use]
pub fn water_placement() -> Placement {
    Placement::new(Vec3::new(17.2534, -0.958_174, 6.71231), 1.1)
        .with_rotation_y(45.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_draw_order_is_fixed() {
        let slots: Vec<MeshSlot> =
            opaque_objects().iter().map(|o| o.slot).collect();
        assert_eq!(
            slots,
            vec![
                MeshSlot::Island,
                MeshSlot::Dragon,
                MeshSlot::Portal,
                MeshSlot::Key,
                MeshSlot::Chest,
            ]
        );
    }

    #[test]
    fn only_the_key_spins_among_opaque_objects() {
        let spinning: Vec<MeshSlot> = opaque_objects()
            .iter()
            .filter(|o| o.spin.is_some())
            .map(|o| o.slot)
            .collect();
        assert_eq!(spinning, vec![MeshSlot::Key]);
    }

    #[test]
    fn diamond_count_matches_constant() {
        assert_eq!(diamond_positions().len(), DIAMOND_COUNT);
    }
}
