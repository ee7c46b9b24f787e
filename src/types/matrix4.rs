use crate::types::{Matrix3x3, Vector3};
use core::fmt::{Debug, Formatter};
use core::ops::Mul;
use num_traits::Float;

/// A homogeneous 4×4 transform in column-major order, as consumed by GL-style renderers.
///
/// Entry `(row, col)` lives at index `col * 4 + row`.
#[derive(Copy, Clone, PartialEq)]
pub struct Matrix4<T> {
    m: [T; 16],
}

impl<T> Matrix4<T> {
    /// Initializes a new [`Matrix4`] from a column-major array.
    #[inline(always)]
    pub const fn from_array(m: [T; 16]) -> Self {
        Self { m }
    }

    /// Returns the entries in column-major order.
    #[inline(always)]
    pub const fn as_array(&self) -> &[T; 16] {
        &self.m
    }
}

impl<T> Matrix4<T>
where
    T: Float,
{
    /// Returns the identity transform.
    pub fn identity() -> Self {
        let mut m = [T::zero(); 16];
        m[0] = T::one();
        m[5] = T::one();
        m[10] = T::one();
        m[15] = T::one();
        Self { m }
    }

    /// Embeds a rotation as the upper-left block; the translation is zero.
    pub fn from_rotation(rotation: &Matrix3x3<T>) -> Self {
        let mut matrix = Self::identity();
        for row in 0..3 {
            for col in 0..3 {
                matrix.set(row, col, rotation.get(row, col));
            }
        }
        matrix
    }

    /// Builds the rotation for Euler angles about the x, y and z axes, in degrees.
    pub fn from_euler_degrees(x: T, y: T, z: T) -> Self {
        let (sx, cx) = x.to_radians().sin_cos();
        let (sy, cy) = y.to_radians().sin_cos();
        let (sz, cz) = z.to_radians().sin_cos();

        let cxsy = cx * sy;
        let sxsy = sx * sy;

        let zero = T::zero();
        Self::from_array([
            cy * cz,
            -cy * sz,
            sy,
            zero,
            cx * sz + sxsy * cz,
            cx * cz - sxsy * sz,
            -sx * cy,
            zero,
            sx * sz - cxsy * cz,
            sx * cz + cxsy * sz,
            cx * cy,
            zero,
            zero,
            zero,
            zero,
            T::one(),
        ])
    }

    /// Builds a pure translation.
    pub fn translation(x: T, y: T, z: T) -> Self {
        let mut matrix = Self::identity();
        matrix.m[12] = x;
        matrix.m[13] = y;
        matrix.m[14] = z;
        matrix
    }

    /// Applies a translation in the local frame, i.e. returns `self · T(x, y, z)`.
    pub fn translate(&self, x: T, y: T, z: T) -> Self {
        *self * Self::translation(x, y, z)
    }

    /// Gets the entry at the given row and column.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.m[col * 4 + row]
    }

    /// Sets the entry at the given row and column.
    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.m[col * 4 + row] = value;
    }

    /// Returns the upper-left 3×3 block.
    pub fn rotation(&self) -> Matrix3x3<T> {
        Matrix3x3::new(
            self.get(0, 0),
            self.get(0, 1),
            self.get(0, 2),
            self.get(1, 0),
            self.get(1, 1),
            self.get(1, 2),
            self.get(2, 0),
            self.get(2, 1),
            self.get(2, 2),
        )
    }

    /// Returns the translation column.
    pub fn translation_vector(&self) -> Vector3<T> {
        Vector3::new(self.m[12], self.m[13], self.m[14])
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut result = *self;
        for row in 0..4 {
            for col in 0..4 {
                result.set(row, col, self.get(col, row));
            }
        }
        result
    }

    /// Transforms a direction (w = 0); the translation does not apply.
    pub fn transform_vector3(&self, v: Vector3<T>) -> Vector3<T> {
        let m = &self.m;
        Vector3::new(
            m[0] * v.x + m[4] * v.y + m[8] * v.z,
            m[1] * v.x + m[5] * v.y + m[9] * v.z,
            m[2] * v.x + m[6] * v.y + m[10] * v.z,
        )
    }
}

impl Matrix4<f64> {
    /// Converts to single precision for upload to a renderer.
    pub fn to_f32(&self) -> Matrix4<f32> {
        Matrix4::from_array(self.m.map(|value| value as f32))
    }
}

impl<T> Default for Matrix4<T>
where
    T: Float,
{
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}

impl<T> Debug for Matrix4<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Matrix4")
            .field("columns", &self.m.chunks(4).collect::<Vec<_>>())
            .finish()
    }
}

impl<T> Mul<Matrix4<T>> for Matrix4<T>
where
    T: Float,
{
    type Output = Matrix4<T>;

    fn mul(self, rhs: Matrix4<T>) -> Self::Output {
        let mut result = [T::zero(); 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = T::zero();
                for k in 0..4 {
                    sum = sum + self.get(row, k) * rhs.get(k, col);
                }
                result[col * 4 + row] = sum;
            }
        }
        Self::from_array(result)
    }
}
