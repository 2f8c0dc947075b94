use glam::{Mat4, Vec3};

use super::object::{Placement, Spin};

/// Build an object's model matrix for the given elapsed time.
///
/// Composition order is fixed: translate, uniform scale, then rotate
/// about X, Y, Z (each skipped when its angle is exactly zero), then the
/// optional spin. The X→Y→Z order is a design constant baked into the
/// placement data; rotations do not commute, so it must not be
/// reordered.
#[must_use]
pub fn model_matrix(placement: &Placement, spin: Option<&Spin>, elapsed: f32) -> Mat4 {
    let mut model = Mat4::from_translation(placement.position)
        * Mat4::from_scale(Vec3::splat(placement.scale));
    if placement.rotation_x != 0.0 {
        model *= Mat4::from_rotation_x(placement.rotation_x.to_radians());
    }
    if placement.rotation_y != 0.0 {
        model *= Mat4::from_rotation_y(placement.rotation_y.to_radians());
    }
    if placement.rotation_z != 0.0 {
        model *= Mat4::from_rotation_z(placement.rotation_z.to_radians());
    }
    if let Some(spin) = spin {
        model *= Mat4::from_axis_angle(spin.axis, spin.rate * elapsed);
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrices_close(a: Mat4, b: Mat4) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn identical_inputs_yield_identical_matrices() {
        let placement = Placement::new(Vec3::new(1.0, 2.0, 3.0), 0.5)
            .with_rotation_x(30.0)
            .with_rotation_y(45.0);
        let spin = Spin::about_y(2.0);
        let a = model_matrix(&placement, Some(&spin), 1.25);
        let b = model_matrix(&placement, Some(&spin), 1.25);
        assert_eq!(a, b);
    }

    #[test]
    fn rotation_order_is_x_then_y() {
        // Swapping which axis carries which angle must change the result:
        // proves the builder composes X before Y rather than by argument
        // order.
        let xy = Placement::new(Vec3::ZERO, 1.0)
            .with_rotation_x(55.0)
            .with_rotation_y(30.0);
        let yx = Placement::new(Vec3::ZERO, 1.0)
            .with_rotation_x(30.0)
            .with_rotation_y(55.0);
        let a = model_matrix(&xy, None, 0.0);
        let b = model_matrix(&yx, None, 0.0);
        assert!(!matrices_close(a, b));

        // And the composed matrix matches the explicit product.
        let expected = Mat4::from_rotation_x(55.0_f32.to_radians())
            * Mat4::from_rotation_y(30.0_f32.to_radians());
        assert!(matrices_close(a, expected));
    }

    #[test]
    fn translate_then_scale_then_rotate() {
        let placement =
            Placement::new(Vec3::new(4.0, 0.0, -2.0), 2.0).with_rotation_z(90.0);
        let expected = Mat4::from_translation(Vec3::new(4.0, 0.0, -2.0))
            * Mat4::from_scale(Vec3::splat(2.0))
            * Mat4::from_rotation_z(90.0_f32.to_radians());
        assert!(matrices_close(model_matrix(&placement, None, 0.0), expected));
    }

    #[test]
    fn zero_rotations_are_skipped_without_changing_the_result() {
        let placement = Placement::new(Vec3::ONE, 1.5);
        let expected = Mat4::from_translation(Vec3::ONE)
            * Mat4::from_scale(Vec3::splat(1.5));
        assert!(matrices_close(model_matrix(&placement, None, 7.0), expected));
    }

    #[test]
    fn spin_angle_scales_with_rate_and_time() {
        let placement = Placement::new(Vec3::ZERO, 1.0);
        let spin = Spin::about_y(2.0);
        let spun = model_matrix(&placement, Some(&spin), 0.75);
        let expected = Mat4::from_rotation_y(1.5);
        assert!(matrices_close(spun, expected));
    }

    #[test]
    fn spin_composes_after_static_rotations() {
        let placement = Placement::new(Vec3::ZERO, 1.0).with_rotation_x(55.0);
        let spin = Spin::about_z(1.0);
        let got = model_matrix(&placement, Some(&spin), 2.0);
        let expected =
            Mat4::from_rotation_x(55.0_f32.to_radians()) * Mat4::from_rotation_z(2.0);
        assert!(matrices_close(got, expected));
    }

    #[test]
    fn zero_scale_is_degenerate_but_not_an_error() {
        let placement = Placement::new(Vec3::ZERO, 0.0);
        let m = model_matrix(&placement, None, 0.0);
        assert_eq!(m.determinant(), 0.0);
    }
}
