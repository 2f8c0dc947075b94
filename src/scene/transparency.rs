use std::cmp::Ordering;

use glam::Vec3;

/// Sort alpha-blended instance positions back-to-front relative to the
/// camera.
///
/// Must run every frame before the instances' model matrices are built
/// and their draws issued; the camera moves, so a stale order produces
/// near-before-far blending artifacts. Ties may resolve in any order.
/// Squared distance preserves the ordering and skips the square root.
pub fn sort_back_to_front(instances: &mut [Vec3], camera_position: Vec3) {
    instances.sort_by(|a, b| {
        let da = a.distance_squared(camera_position);
        let db = b.distance_squared(camera_position);
        db.partial_cmp(&da).unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_pairs_are_non_increasing_in_distance() {
        let camera = Vec3::new(14.4, 0.4, 19.0);
        let mut instances = vec![
            Vec3::new(10.5225, -0.873_134, 5.12017),
            Vec3::new(8.45477, -0.37, 1.93658),
            Vec3::new(12.587, 0.18, 3.19113),
            Vec3::new(13.8174, -0.09, -0.020_390_1),
            Vec3::new(9.76582, -0.873_134, 5.18574),
        ];
        sort_back_to_front(&mut instances, camera);
        for pair in instances.windows(2) {
            assert!(
                pair[0].distance(camera) >= pair[1].distance(camera),
                "not back-to-front: {pair:?}"
            );
        }
    }

    #[test]
    fn distances_one_five_three_sort_to_five_three_one() {
        let camera = Vec3::ZERO;
        let mut instances = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        ];
        sort_back_to_front(&mut instances, camera);
        assert_eq!(
            instances,
            vec![
                Vec3::new(5.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn resort_reflects_camera_motion() {
        let mut instances = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)];
        sort_back_to_front(&mut instances, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(instances[0], Vec3::new(10.0, 0.0, 0.0));

        // Camera crosses to the other side: the order must flip.
        sort_back_to_front(&mut instances, Vec3::new(11.0, 0.0, 0.0));
        assert_eq!(instances[0], Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn equal_distances_are_tolerated() {
        let mut instances = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        sort_back_to_front(&mut instances, Vec3::ZERO);
        assert_eq!(instances.len(), 3);
    }
}
