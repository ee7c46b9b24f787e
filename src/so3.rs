//! Exponential and logarithm maps on the rotation group SO(3).
//!
//! Rotations are [`Matrix3x3d`] values; tangent vectors (axis × angle, in radians)
//! are [`Vector3d`] values.

use crate::types::{Matrix3x3d, Vector3d};
use core::f64::consts::PI;

/// `1/6`, as used by the series expansion of `sin θ / θ`.
const ONE_SIXTH: f64 = 0.16666667163372;

/// `1/24`, as used by the series expansion of `(1 - cos θ) / θ²`.
const ONE_TWENTY_FOURTH: f64 = 0.0416666679084301;

/// `2/π²`, the Rodrigues coefficient of a half-turn at angle π.
const HALF_TURN_KB: f64 = 0.20264236728467558;

/// `cos(π/4)`; separates the three regimes of [`log`].
const LOG_REGIME_COS: f64 = 0.7071067811865476;

/// Evaluates the Rodrigues formula `I + kA·[w]× + kB·[w]ײ`.
///
/// ## Arguments
/// * `w` - The rotation vector.
/// * `k_a` - The coefficient of the skew term, usually `sin θ / θ`.
/// * `k_b` - The coefficient of the squared skew term, usually `(1 - cos θ) / θ²`.
pub fn rodrigues(w: Vector3d, k_a: f64, k_b: f64) -> Matrix3x3d {
    let wx2 = w.x * w.x;
    let wy2 = w.y * w.y;
    let wz2 = w.z * w.z;

    let mut result = Matrix3x3d::zero();
    result.set(0, 0, 1.0 - k_b * (wy2 + wz2));
    result.set(1, 1, 1.0 - k_b * (wx2 + wz2));
    result.set(2, 2, 1.0 - k_b * (wx2 + wy2));

    let a = k_a * w.z;
    let b = k_b * (w.x * w.y);
    result.set(0, 1, b - a);
    result.set(1, 0, b + a);

    let a = k_a * w.y;
    let b = k_b * (w.x * w.z);
    result.set(0, 2, b + a);
    result.set(2, 0, b - a);

    let a = k_a * w.x;
    let b = k_b * (w.y * w.z);
    result.set(1, 2, b - a);
    result.set(2, 1, b + a);

    result
}

/// Maps a rotation vector to its rotation matrix.
///
/// Small angles switch to truncated series of the Rodrigues coefficients so
/// that the result stays accurate as `|w|` approaches zero.
pub fn exp(w: Vector3d) -> Matrix3x3d {
    let theta_sq = w.dot(w);

    let (k_a, k_b) = if theta_sq < 1.0e-8 {
        (1.0 - ONE_SIXTH * theta_sq, 0.5)
    } else if theta_sq < 1.0e-6 {
        (
            1.0 - theta_sq * ONE_SIXTH * (1.0 - ONE_SIXTH * theta_sq),
            0.5 - ONE_TWENTY_FOURTH * theta_sq,
        )
    } else {
        let theta = theta_sq.sqrt();
        let inv_theta = theta.recip();
        (theta.sin() * inv_theta, (1.0 - theta.cos()) * (inv_theta * inv_theta))
    };

    rodrigues(w, k_a, k_b)
}

/// Maps a rotation matrix to its rotation vector, with an angle in `[0, π]`.
///
/// ## Arguments
/// * `rotation` - A proper rotation matrix.
pub fn log(rotation: &Matrix3x3d) -> Vector3d {
    let r = rotation;
    let cos_angle = (r.trace() - 1.0) * 0.5;

    let mut result = Vector3d::new(
        (r.get(2, 1) - r.get(1, 2)) / 2.0,
        (r.get(0, 2) - r.get(2, 0)) / 2.0,
        (r.get(1, 0) - r.get(0, 1)) / 2.0,
    );
    let sin_angle_abs = result.norm();

    if cos_angle > LOG_REGIME_COS {
        if sin_angle_abs > 0.0 {
            result.scale(sin_angle_abs.asin() / sin_angle_abs);
        }
        return result;
    }

    if cos_angle > -LOG_REGIME_COS {
        let angle = cos_angle.acos();
        result.scale(angle / sin_angle_abs);
        return result;
    }

    // Close to a half turn the skew part vanishes; the axis is taken from the
    // symmetric part and only its sign from the skew part.
    let angle = PI - sin_angle_abs.asin();
    let d0 = r.get(0, 0) - cos_angle;
    let d1 = r.get(1, 1) - cos_angle;
    let d2 = r.get(2, 2) - cos_angle;

    let mut axis = if d0 * d0 > d1 * d1 && d0 * d0 > d2 * d2 {
        Vector3d::new(
            d0,
            (r.get(1, 0) + r.get(0, 1)) / 2.0,
            (r.get(0, 2) + r.get(2, 0)) / 2.0,
        )
    } else if d1 * d1 > d2 * d2 {
        Vector3d::new(
            (r.get(1, 0) + r.get(0, 1)) / 2.0,
            d1,
            (r.get(2, 1) + r.get(1, 2)) / 2.0,
        )
    } else {
        Vector3d::new(
            (r.get(0, 2) + r.get(2, 0)) / 2.0,
            (r.get(2, 1) + r.get(1, 2)) / 2.0,
            d2,
        )
    };

    if axis.dot(result) < 0.0 {
        axis = -axis;
    }

    axis.normalized() * angle
}

/// Builds the rotation by π about the given (not necessarily unit) axis.
pub fn rotation_pi_about_axis(axis: Vector3d) -> Matrix3x3d {
    let w = axis * (PI / axis.norm());
    rodrigues(w, 0.0, HALF_TURN_KB)
}

/// Finds a rotation that maps the direction of `a` onto the direction of `b`.
///
/// Parallel inputs yield the identity; anti-parallel inputs yield a half turn
/// about an axis orthogonal to `a`.
///
/// ## Arguments
/// * `a` - The source direction; its length is irrelevant.
/// * `b` - The target direction; its length is irrelevant.
pub fn align_two_vectors(a: Vector3d, b: Vector3d) -> Matrix3x3d {
    let normal = a.cross(b);
    if normal.norm() == 0.0 {
        return if a.dot(b) >= 0.0 {
            Matrix3x3d::identity()
        } else {
            rotation_pi_about_axis(a.ortho())
        };
    }

    let n = normal.normalized();
    let a = a.normalized();
    let b = b.normalized();

    let from = Matrix3x3d::from_columns(a, n, n.cross(a));
    let to = Matrix3x3d::from_columns(b, n, n.cross(b));

    to * from.transpose()
}

/// The rotation angle between two rotations, in radians.
pub fn geodesic_distance(a: &Matrix3x3d, b: &Matrix3x3d) -> f64 {
    log(&(a.transpose() * *b)).norm()
}
