//! Math utilities and types
//!
//! Provides the transform value used at every placement site and the
//! rotation conversions between matrices and axis-angle pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Rotation3, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Below this value of `sin(angle / 2)` a rotation is treated as degenerate.
const DEGENERATE_SIN_EPSILON: f32 = 1e-6;

/// Translation, scale and a single axis-angle rotation
///
/// Applied in the order the scene commands are issued: translate, then
/// scale, then rotate. The rotation axis does not need to be normalized,
/// the consumer normalizes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transformation {
    /// Translation offset
    pub translate: Vec3,

    /// Scale factors, identity by default
    pub scale: Vec3,

    /// Rotation angle in degrees
    pub degrees: f32,

    /// Rotation axis
    pub axis: Vec3,
}

impl Default for Transformation {
    fn default() -> Self {
        Self {
            translate: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            degrees: 0.0,
            axis: Vec3::new(1.0, 0.0, 0.0),
        }
    }
}

impl Transformation {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transformation with only a translation
    pub fn from_translation(translate: Vec3) -> Self {
        Self {
            translate,
            ..Default::default()
        }
    }

    /// Set the translation
    pub fn with_translation(mut self, translate: Vec3) -> Self {
        self.translate = translate;
        self
    }

    /// Set a uniform scale
    pub fn with_uniform_scale(mut self, factor: f32) -> Self {
        self.scale = Vec3::new(factor, factor, factor);
        self
    }

    /// Set the scale factors
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set the rotation from degrees and an axis
    pub fn with_rotation(mut self, degrees: f32, axis: Vec3) -> Self {
        self.degrees = degrees;
        self.axis = axis;
        self
    }

    /// Set the rotation from a rotation matrix
    pub fn with_rotation_matrix(mut self, rotation: &Mat3) -> Self {
        let axis_angle = matrix_to_axis_angle(rotation);
        self.degrees = axis_angle.degrees;
        self.axis = axis_angle.axis;
        self
    }

    /// Rotation part as a 3x3 matrix
    pub fn rotation_matrix(&self) -> Mat3 {
        axis_angle_to_matrix(self.degrees, self.axis)
    }

    /// Equivalent affine matrix, `T * S * R`
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.translate)
            * Mat4::new_nonuniform_scaling(&self.scale)
            * self.rotation_matrix().to_homogeneous()
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (t, s, a) = (self.translate, self.scale, self.axis);
        writeln!(f, "Translate {} {} {}", t.x, t.y, t.z)?;
        writeln!(f, "Scale {} {} {}", s.x, s.y, s.z)?;
        writeln!(f, "Rotate {} {} {} {}", self.degrees, a.x, a.y, a.z)
    }
}

/// Rotation expressed as an angle in degrees around a unit axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAngle {
    /// Rotation angle in degrees, in `[0, 360]`
    pub degrees: f32,
    /// Unit rotation axis
    pub axis: Vec3,
}

/// Build a rotation matrix from an angle in degrees and an axis
///
/// The axis is normalized here. A zero axis yields the identity.
pub fn axis_angle_to_matrix(degrees: f32, axis: Vec3) -> Mat3 {
    match Unit::try_new(axis, f32::EPSILON) {
        Some(unit) => Rotation3::from_axis_angle(&unit, degrees.to_radians()).into_inner(),
        None => Mat3::identity(),
    }
}

/// Convert a rotation matrix to an angle in degrees and a unit axis
///
/// Goes through a unit quaternion built from the trace. Every radicand is
/// clamped to zero first so round-off on nearly orthonormal input never takes
/// the square root of a negative number. Near 180 degrees the off-diagonal
/// differences vanish and the signs are recovered from the symmetric sums
/// instead. Near 0 degrees the axis is undefined and `(1, 0, 0)` is returned.
pub fn matrix_to_axis_angle(m: &Mat3) -> AxisAngle {
    let (m00, m11, m22) = (m[(0, 0)], m[(1, 1)], m[(2, 2)]);

    let w = (1.0 + m00 + m11 + m22).max(0.0).sqrt() / 2.0;
    let mags = [
        (1.0 + m00 - m11 - m22).max(0.0).sqrt() / 2.0,
        (1.0 - m00 + m11 - m22).max(0.0).sqrt() / 2.0,
        (1.0 - m00 - m11 + m22).max(0.0).sqrt() / 2.0,
    ];
    let diffs = [
        m[(2, 1)] - m[(1, 2)],
        m[(0, 2)] - m[(2, 0)],
        m[(1, 0)] - m[(0, 1)],
    ];

    let largest = (0..3).fold(0, |best, i| if mags[i] > mags[best] { i } else { best });
    let v = if w >= mags[largest] {
        // Well away from 180 degrees, the differences carry the signs.
        [
            mags[0].copysign(diffs[0]),
            mags[1].copysign(diffs[1]),
            mags[2].copysign(diffs[2]),
        ]
    } else {
        let sign = if diffs[largest] < 0.0 { -1.0 } else { 1.0 };
        let sums = [
            m[(1, 2)] + m[(2, 1)],
            m[(0, 2)] + m[(2, 0)],
            m[(0, 1)] + m[(1, 0)],
        ];
        let mut v = [0.0; 3];
        for i in 0..3 {
            v[i] = if i == largest {
                sign * mags[i]
            } else {
                // Sum of the pair that excludes the remaining third axis.
                let pair_sum = sums[3 - i - largest];
                sign * mags[i].copysign(pair_sum)
            };
        }
        v
    };

    let q = Quaternion::new(w, v[0], v[1], v[2]);
    let norm = q.norm();
    let (qw, qv) = if norm > f32::EPSILON {
        (q.w / norm, q.imag() / norm)
    } else {
        (1.0, Vec3::zeros())
    };

    let qw = qw.clamp(0.0, 1.0);
    let degrees = 2.0 * qw.acos() * (180.0 / std::f32::consts::PI);
    let sin_half = (1.0 - qw * qw).max(0.0).sqrt();

    let axis = if sin_half < DEGENERATE_SIN_EPSILON {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        qv / sin_half
    };

    AxisAngle { degrees, axis }
}

/// Convert the rotation part of an affine matrix, ignoring translation
pub fn matrix4_to_axis_angle(m: &Mat4) -> AxisAngle {
    matrix_to_axis_angle(&m.fixed_view::<3, 3>(0, 0).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_default_scale_is_identity() {
        let transform = Transformation::default();

        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(transform.axis, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(transform.to_matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_matrix_applies_rotate_then_scale_then_translate() {
        let transform = Transformation::from_translation(Vec3::new(0.0, 0.0, -2.0))
            .with_uniform_scale(5.0)
            .with_rotation(90.0, Vec3::new(1.0, 0.0, 0.0));

        // +Y rotated 90 degrees about X lands on +Z, then scaled and moved.
        let p = transform.to_matrix().transform_point(&nalgebra::Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(p.coords, Vec3::new(0.0, 0.0, 3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_round_trip_through_matrix() {
        let cases = [
            (30.0, Vec3::new(1.0, 0.0, 0.0)),
            (90.0, Vec3::new(0.0, 1.0, 0.0)),
            (135.0, Vec3::new(0.0, 0.0, 1.0)),
            (250.0, Vec3::new(1.0, 2.0, 3.0)),
            (320.0, Vec3::new(0.0, 0.0, 1.0)),
            (45.0, Vec3::new(-1.0, 0.5, -0.25)),
        ];

        for (degrees, axis) in cases {
            let r = axis_angle_to_matrix(degrees, axis);
            let aa = matrix_to_axis_angle(&r);
            assert_relative_eq!(axis_angle_to_matrix(aa.degrees, aa.axis), r, epsilon = EPSILON);
            assert_relative_eq!(aa.axis.norm(), 1.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_recovers_angle_and_axis_up_to_sign() {
        let axis = Vec3::new(1.0, 2.0, 2.0).normalize();
        let aa = matrix_to_axis_angle(&axis_angle_to_matrix(60.0, axis));

        assert_relative_eq!(aa.degrees, 60.0, epsilon = 1e-3);
        assert_relative_eq!(aa.axis, axis, epsilon = EPSILON);

        // 300 degrees around `axis` is 60 degrees around `-axis`.
        let aa = matrix_to_axis_angle(&axis_angle_to_matrix(300.0, axis));
        assert_relative_eq!(aa.degrees, 60.0, epsilon = 1e-3);
        assert_relative_eq!(aa.axis, -axis, epsilon = EPSILON);
    }

    #[test]
    fn test_identity_is_degenerate() {
        let aa = matrix_to_axis_angle(&Mat3::identity());

        assert_relative_eq!(aa.degrees, 0.0, epsilon = EPSILON);
        assert_eq!(aa.axis, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_half_turn_keeps_axis() {
        for axis in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, -1.0, 0.0).normalize(),
            Vec3::new(0.3, 0.4, -0.5).normalize(),
        ] {
            let r = axis_angle_to_matrix(180.0, axis);
            let aa = matrix_to_axis_angle(&r);

            assert_relative_eq!(aa.degrees, 180.0, epsilon = 0.05);
            assert!(aa.axis.iter().all(|c| c.is_finite()));
            assert_relative_eq!(aa.axis.dot(&axis).abs(), 1.0, epsilon = EPSILON);
            assert_relative_eq!(axis_angle_to_matrix(aa.degrees, aa.axis), r, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_round_off_outside_orthonormality_stays_finite() {
        // Identity nudged so 1 - m00 - m11 + m22 and friends go slightly negative.
        let mut m = Mat3::identity() * (1.0 + 1e-6);
        m[(0, 1)] = 1e-7;
        let aa = matrix_to_axis_angle(&m);
        assert!(aa.degrees.is_finite());
        assert!(aa.axis.iter().all(|c| c.is_finite()));

        // Half turn about X with a diagonal pushed past -1.
        let mut m = axis_angle_to_matrix(180.0, Vec3::x());
        m[(1, 1)] -= 1e-6;
        m[(2, 2)] -= 1e-6;
        let aa = matrix_to_axis_angle(&m);
        assert!(aa.degrees.is_finite());
        assert!(aa.axis.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_rebuild_from_rotation_matrix() {
        let original = Transformation::from_translation(Vec3::new(-20.0, -120.0, 0.0))
            .with_uniform_scale(0.8)
            .with_rotation(250.0, Vec3::new(1.0, 2.0, 3.0));
        let rebuilt = Transformation::from_translation(original.translate)
            .with_scale(original.scale)
            .with_rotation_matrix(&original.rotation_matrix());

        assert_relative_eq!(rebuilt.to_matrix(), original.to_matrix(), epsilon = 1e-3);
        assert_relative_eq!(rebuilt.axis.norm(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_matrix4_ignores_translation() {
        let transform = Transformation::from_translation(Vec3::new(5.0, -3.0, 2.0))
            .with_rotation(40.0, Vec3::new(0.0, 1.0, 0.0));
        let aa = matrix4_to_axis_angle(&transform.to_matrix());

        assert_relative_eq!(aa.degrees, 40.0, epsilon = 1e-3);
        assert_relative_eq!(aa.axis, Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_display_lists_commands() {
        let text = Transformation::from_translation(Vec3::new(-10.0, 75.0, 0.0)).to_string();
        assert_eq!(text, "Translate -10 75 0\nScale 1 1 1\nRotate 0 1 0 0\n");
    }
}
