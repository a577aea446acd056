//! Row-vector matrix helpers
//!
//! `glam` builds column-vector matrices (`M * p`). The skeleton composes in
//! row-vector order (`p * M`), which is the transpose. Every matrix entering
//! the runtime goes through one of these helpers.

use glam::{Mat4, Quat, Vec3};

/// Translation by `t`
pub fn translation(t: Vec3) -> Mat4 {
    Mat4::from_translation(t).transpose()
}

/// Rotation by the unit quaternion `q`
pub fn rotation(q: Quat) -> Mat4 {
    Mat4::from_quat(q).transpose()
}

/// Non-uniform scale by `s`
pub fn scale(s: Vec3) -> Mat4 {
    Mat4::from_scale(s)
}

/// Local bone transform `scale(s) * rotate(r) * translate(t)`
///
/// Scales first, then rotates, then translates.
pub fn compose_srt(s: Vec3, r: Quat, t: Vec3) -> Mat4 {
    scale(s) * rotation(r) * translation(t)
}

/// Convert a column-major, column-vector glTF matrix
pub fn from_gltf_matrix(m: Mat4) -> Mat4 {
    m.transpose()
}

/// Build from the 16 column-major floats glTF stores
pub fn from_gltf_array(cols: &[f32; 16]) -> Mat4 {
    from_gltf_matrix(Mat4::from_cols_array(cols))
}

/// Apply `m` to point `p`
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    m.transpose().transform_point3(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_translation_then_parent() {
        let child = translation(Vec3::new(0.0, 1.0, 0.0));
        let parent = translation(Vec3::new(1.0, 0.0, 0.0));
        let p = transform_point(&(child * parent), Vec3::ZERO);
        assert_close(p, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_compose_srt_order() {
        // Scale by 2, rotate 90 degrees about Z, then move along X
        let m = compose_srt(
            Vec3::splat(2.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            Vec3::new(10.0, 0.0, 0.0),
        );
        let p = transform_point(&m, Vec3::X);
        assert_close(p, Vec3::new(10.0, 2.0, 0.0));
    }

    #[test]
    fn test_compose_srt_matches_glam() {
        let s = Vec3::new(1.0, 2.0, 3.0);
        let r = Quat::from_rotation_y(0.3);
        let t = Vec3::new(4.0, 5.0, 6.0);
        let expected = Mat4::from_scale_rotation_translation(s, r, t).transpose();
        assert!(compose_srt(s, r, t).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_from_gltf_array() {
        let mut cols = [0.0; 16];
        cols[0] = 1.0;
        cols[5] = 1.0;
        cols[10] = 1.0;
        cols[15] = 1.0;
        cols[12] = 7.0;
        let m = from_gltf_array(&cols);
        assert_close(transform_point(&m, Vec3::ZERO), Vec3::new(7.0, 0.0, 0.0));
    }
}
