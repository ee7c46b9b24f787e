//! Decomposition of a head view into directions and angles.

use crate::types::{EulerAngles, Matrix4, Quaternion, Vector3d};

/// Cosine of the pitch below which yaw and roll can no longer be separated.
const GIMBAL_LOCK_COS: f64 = 0.01;

/// A world-to-display transform produced by a [`HeadTracker`](crate::HeadTracker).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct HeadTransform {
    head_view: Matrix4<f64>,
}

impl HeadTransform {
    /// Wraps a head view.
    pub const fn new(head_view: Matrix4<f64>) -> Self {
        Self { head_view }
    }

    /// The wrapped transform.
    pub fn head_view(&self) -> &Matrix4<f64> {
        &self.head_view
    }

    /// The translation part of the transform.
    pub fn translation(&self) -> Vector3d {
        self.head_view.translation_vector()
    }

    /// The direction the viewer looks at, i.e. the negated third column.
    pub fn forward(&self) -> Vector3d {
        let m = self.head_view.as_array();
        Vector3d::new(-m[8], -m[9], -m[10])
    }

    /// The up direction, i.e. the second column.
    pub fn up(&self) -> Vector3d {
        let m = self.head_view.as_array();
        Vector3d::new(m[4], m[5], m[6])
    }

    /// The right direction, i.e. the first column.
    pub fn right(&self) -> Vector3d {
        let m = self.head_view.as_array();
        Vector3d::new(m[0], m[1], m[2])
    }

    /// The head orientation as a quaternion.
    ///
    /// Extraction branches on the trace and the largest diagonal entry so
    /// that the divisor never becomes small.
    pub fn quaternion(&self) -> Quaternion<f64> {
        let m = self.head_view.as_array();
        let t = m[0] + m[5] + m[10];

        if t >= 0.0 {
            let s = (t + 1.0).sqrt();
            let w = 0.5 * s;
            let s = 0.5 / s;
            Quaternion::new((m[9] - m[6]) * s, (m[2] - m[8]) * s, (m[4] - m[1]) * s, w)
        } else if m[0] > m[5] && m[0] > m[10] {
            let s = (1.0 + m[0] - m[5] - m[10]).sqrt();
            let x = s * 0.5;
            let s = 0.5 / s;
            Quaternion::new(x, (m[4] + m[1]) * s, (m[2] + m[8]) * s, (m[9] - m[6]) * s)
        } else if m[5] > m[10] {
            let s = (1.0 + m[5] - m[0] - m[10]).sqrt();
            let y = s * 0.5;
            let s = 0.5 / s;
            Quaternion::new((m[4] + m[1]) * s, y, (m[9] + m[6]) * s, (m[2] - m[8]) * s)
        } else {
            let s = (1.0 + m[10] - m[0] - m[5]).sqrt();
            let z = s * 0.5;
            let s = 0.5 / s;
            Quaternion::new((m[2] + m[8]) * s, (m[9] + m[6]) * s, z, (m[4] - m[1]) * s)
        }
    }

    /// The head orientation as Euler angles, in radians.
    ///
    /// Near gimbal lock the yaw is reported as zero and the whole rotation
    /// about the vertical is attributed to roll.
    pub fn euler_angles(&self) -> EulerAngles<f64> {
        let m = self.head_view.as_array();
        let pitch = m[6].clamp(-1.0, 1.0).asin();

        let (yaw, roll) = if (1.0 - m[6] * m[6]).max(0.0).sqrt() >= GIMBAL_LOCK_COS {
            ((-m[2]).atan2(m[10]), (-m[4]).atan2(m[5]))
        } else {
            (0.0, m[1].atan2(m[0]))
        };

        EulerAngles::new(-pitch, -yaw, -roll)
    }
}

impl From<Matrix4<f64>> for HeadTransform {
    fn from(head_view: Matrix4<f64>) -> Self {
        Self::new(head_view)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::so3;
    use approx::assert_relative_eq;
    use core::f64::consts::{FRAC_PI_2, PI};

    fn rotation(w: Vector3d) -> HeadTransform {
        HeadTransform::new(Matrix4::from_rotation(&so3::exp(w)))
    }

    #[test]
    fn test_identity() {
        let transform = HeadTransform::default();
        assert_eq!(transform.translation(), Vector3d::zero());
        assert_eq!(transform.forward(), Vector3d::new(0.0, 0.0, -1.0));
        assert_eq!(transform.up(), Vector3d::new(0.0, 1.0, 0.0));
        assert_eq!(transform.right(), Vector3d::new(1.0, 0.0, 0.0));
        assert_eq!(transform.quaternion(), Quaternion::identity());

        let angles = transform.euler_angles();
        assert_eq!(angles.pitch, 0.0);
        assert_eq!(angles.yaw, 0.0);
        assert_eq!(angles.roll, 0.0);
    }

    #[test]
    fn test_translation() {
        let transform = HeadTransform::new(Matrix4::translation(1.0, 2.0, 3.0));
        assert_eq!(transform.translation(), Vector3d::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_roll() {
        let angle = 0.4;
        let transform = rotation(Vector3d::new(0.0, 0.0, angle));

        let q = transform.quaternion();
        assert_relative_eq!(q.w, (angle / 2.0).cos(), epsilon = 1e-12);
        assert_relative_eq!(q.z, -(angle / 2.0).sin(), epsilon = 1e-12);

        let angles = transform.euler_angles();
        assert_relative_eq!(angles.roll, -angle, epsilon = 1e-12);
        assert_relative_eq!(angles.pitch, 0.0, epsilon = 1e-12);
        assert_relative_eq!(angles.yaw, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gimbal_lock() {
        let transform = rotation(Vector3d::new(FRAC_PI_2, 0.0, 0.0));
        let angles = transform.euler_angles();
        assert_relative_eq!(angles.pitch, -FRAC_PI_2, epsilon = 1e-6);
        assert_eq!(angles.yaw, 0.0);
        assert_relative_eq!(angles.roll, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quaternion_half_turns() {
        for axis in 0..3 {
            let transform = rotation(Vector3d::unit(axis) * PI);
            let q = transform.quaternion();
            assert_relative_eq!(q.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(q[axis].abs(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(q.w, 0.0, epsilon = 1e-12);
        }
    }
}
