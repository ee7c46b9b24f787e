use crate::types::Vector3;
use core::fmt::{Debug, Formatter};
use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use num_traits::Float;

/// A 3×3 matrix stored in row-major order.
///
/// All operations produce new values; products read every input entry
/// before the result is assembled, so `a = a * b` is alias-free.
#[derive(Copy, Clone, PartialEq)]
pub struct Matrix3x3<T> {
    m: [T; 9],
}

/// Double precision matrix, the filter's working type.
pub type Matrix3x3d = Matrix3x3<f64>;

impl<T> Matrix3x3<T> {
    /// Initializes a new [`Matrix3x3`] from its entries in row-major order.
    #[allow(clippy::too_many_arguments)]
    #[inline(always)]
    pub const fn new(m00: T, m01: T, m02: T, m10: T, m11: T, m12: T, m20: T, m21: T, m22: T) -> Self {
        Self {
            m: [m00, m01, m02, m10, m11, m12, m20, m21, m22],
        }
    }

    /// Initializes a new [`Matrix3x3`] from a row-major array.
    #[inline(always)]
    pub const fn from_array(m: [T; 9]) -> Self {
        Self { m }
    }

    /// Returns the entries in row-major order.
    #[inline(always)]
    pub const fn as_array(&self) -> &[T; 9] {
        &self.m
    }
}

impl<T> Matrix3x3<T>
where
    T: Float,
{
    /// Returns the zero matrix.
    #[inline]
    pub fn zero() -> Self {
        Self { m: [T::zero(); 9] }
    }

    /// Returns the identity matrix.
    #[inline]
    pub fn identity() -> Self {
        Self::from_diagonal(T::one())
    }

    /// Returns a matrix with `value` on the diagonal and zeros elsewhere.
    pub fn from_diagonal(value: T) -> Self {
        let mut matrix = Self::zero();
        matrix.set_diagonal(value);
        matrix
    }

    /// Builds a matrix from its three columns.
    pub fn from_columns(c0: Vector3<T>, c1: Vector3<T>, c2: Vector3<T>) -> Self {
        Self::new(c0.x, c1.x, c2.x, c0.y, c1.y, c2.y, c0.z, c1.z, c2.z)
    }

    /// Overwrites the diagonal entries, leaving the others untouched.
    pub fn set_diagonal(&mut self, value: T) {
        self.m[0] = value;
        self.m[4] = value;
        self.m[8] = value;
    }

    /// Gets the entry at the given row and column.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.m[3 * row + col]
    }

    /// Sets the entry at the given row and column.
    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.m[3 * row + col] = value;
    }

    /// Gets the column with the given index.
    pub fn column(&self, col: usize) -> Vector3<T> {
        Vector3::new(self.m[col], self.m[col + 3], self.m[col + 6])
    }

    /// Overwrites the column with the given index.
    pub fn set_column(&mut self, col: usize, vector: Vector3<T>) {
        self.m[col] = vector.x;
        self.m[col + 3] = vector.y;
        self.m[col + 6] = vector.z;
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self::new(m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8])
    }

    /// Transposes the matrix in place.
    pub fn transpose_in_place(&mut self) {
        self.m.swap(1, 3);
        self.m.swap(2, 6);
        self.m.swap(5, 7);
    }

    /// Sum of the diagonal entries.
    #[inline]
    pub fn trace(&self) -> T {
        self.m[0] + self.m[4] + self.m[8]
    }

    /// Calculates the determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> T {
        self.get(0, 0) * (self.get(1, 1) * self.get(2, 2) - self.get(2, 1) * self.get(1, 2))
            - self.get(0, 1) * (self.get(1, 0) * self.get(2, 2) - self.get(1, 2) * self.get(2, 0))
            + self.get(0, 2) * (self.get(1, 0) * self.get(2, 1) - self.get(1, 1) * self.get(2, 0))
    }

    /// Calculates the inverse via the adjugate.
    ///
    /// Returns `None` if the determinant is exactly zero.
    pub fn invert(&self) -> Option<Self> {
        let d = self.determinant();
        if d == T::zero() {
            return None;
        }

        let inv = d.recip();
        let m = &self.m;
        Some(Self::new(
            (m[4] * m[8] - m[7] * m[5]) * inv,
            -(m[1] * m[8] - m[2] * m[7]) * inv,
            (m[1] * m[5] - m[2] * m[4]) * inv,
            -(m[3] * m[8] - m[5] * m[6]) * inv,
            (m[0] * m[8] - m[2] * m[6]) * inv,
            -(m[0] * m[5] - m[3] * m[2]) * inv,
            (m[3] * m[7] - m[6] * m[4]) * inv,
            -(m[0] * m[7] - m[6] * m[1]) * inv,
            (m[0] * m[4] - m[3] * m[1]) * inv,
        ))
    }

    /// Multiplies every entry by `factor`.
    pub fn scaled(&self, factor: T) -> Self {
        Self {
            m: self.m.map(|value| value * factor),
        }
    }

    /// Whether the matrix is orthonormal with determinant +1, within `tolerance`.
    pub fn is_rotation(&self, tolerance: T) -> bool {
        let should_be_identity = *self * self.transpose();
        let identity = Self::identity();
        let orthonormal = should_be_identity
            .m
            .iter()
            .zip(identity.m.iter())
            .all(|(&a, &b)| (a - b).abs() <= tolerance);
        orthonormal && (self.determinant() - T::one()).abs() <= tolerance
    }
}

impl<T> Default for Matrix3x3<T>
where
    T: Float,
{
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl<T> Debug for Matrix3x3<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.m.chunks(3)).finish()
    }
}

impl<T> Mul<Matrix3x3<T>> for Matrix3x3<T>
where
    T: Float,
{
    type Output = Matrix3x3<T>;

    fn mul(self, rhs: Matrix3x3<T>) -> Self::Output {
        let a = &self.m;
        let b = &rhs.m;
        Self::new(
            a[0] * b[0] + a[1] * b[3] + a[2] * b[6],
            a[0] * b[1] + a[1] * b[4] + a[2] * b[7],
            a[0] * b[2] + a[1] * b[5] + a[2] * b[8],
            a[3] * b[0] + a[4] * b[3] + a[5] * b[6],
            a[3] * b[1] + a[4] * b[4] + a[5] * b[7],
            a[3] * b[2] + a[4] * b[5] + a[5] * b[8],
            a[6] * b[0] + a[7] * b[3] + a[8] * b[6],
            a[6] * b[1] + a[7] * b[4] + a[8] * b[7],
            a[6] * b[2] + a[7] * b[5] + a[8] * b[8],
        )
    }
}

impl<T> Mul<Vector3<T>> for Matrix3x3<T>
where
    T: Float,
{
    type Output = Vector3<T>;

    fn mul(self, v: Vector3<T>) -> Self::Output {
        let a = &self.m;
        Vector3::new(
            a[0] * v.x + a[1] * v.y + a[2] * v.z,
            a[3] * v.x + a[4] * v.y + a[5] * v.z,
            a[6] * v.x + a[7] * v.y + a[8] * v.z,
        )
    }
}

impl<T> Mul<T> for Matrix3x3<T>
where
    T: Float,
{
    type Output = Matrix3x3<T>;

    #[inline]
    fn mul(self, rhs: T) -> Self::Output {
        self.scaled(rhs)
    }
}

impl<T> Add<Matrix3x3<T>> for Matrix3x3<T>
where
    T: Float,
{
    type Output = Matrix3x3<T>;

    fn add(mut self, rhs: Matrix3x3<T>) -> Self::Output {
        self += rhs;
        self
    }
}

impl<T> AddAssign<Matrix3x3<T>> for Matrix3x3<T>
where
    T: Float,
{
    fn add_assign(&mut self, rhs: Matrix3x3<T>) {
        for (lhs, rhs) in self.m.iter_mut().zip(rhs.m) {
            *lhs = *lhs + rhs;
        }
    }
}

impl<T> Sub<Matrix3x3<T>> for Matrix3x3<T>
where
    T: Float,
{
    type Output = Matrix3x3<T>;

    fn sub(mut self, rhs: Matrix3x3<T>) -> Self::Output {
        self -= rhs;
        self
    }
}

impl<T> SubAssign<Matrix3x3<T>> for Matrix3x3<T>
where
    T: Float,
{
    fn sub_assign(&mut self, rhs: Matrix3x3<T>) {
        for (lhs, rhs) in self.m.iter_mut().zip(rhs.m) {
            *lhs = *lhs - rhs;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Matrix3x3<f64> {
        Matrix3x3::new(2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0)
    }

    #[test]
    fn test_identity_and_diagonal() {
        let identity = Matrix3x3::<f64>::identity();
        assert_eq!(identity.trace(), 3.0);
        assert_eq!(identity.get(0, 1), 0.0);

        let mut m = sample();
        m.set_diagonal(5.0);
        assert_eq!(m.get(1, 1), 5.0);
        assert_eq!(m.get(1, 0), -1.0, "off-diagonal entries are untouched");
    }

    #[test]
    fn test_determinant() {
        assert_eq!(sample().determinant(), 4.0);
        assert_eq!(Matrix3x3::<f64>::zero().determinant(), 0.0);
    }

    #[test]
    fn test_invert() {
        let m = sample();
        let inv = m.invert().expect("matrix is regular");
        let product = m * inv;
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_relative_eq!(product.get(row, col), expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_invert_singular() {
        let m = Matrix3x3::<f64>::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 1.0, 1.0);
        assert!(m.invert().is_none());
    }

    #[test]
    fn test_transpose() {
        let m = Matrix3x3::<f64>::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        let t = m.transpose();
        assert_eq!(t.get(0, 1), 4.0);
        assert_eq!(t.get(2, 0), 3.0);

        let mut in_place = m;
        in_place.transpose_in_place();
        assert_eq!(in_place, t);
    }

    #[test]
    fn test_self_multiplication_is_alias_free() {
        let m = Matrix3x3::<f64>::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        let mut a = m;
        a = a * a;
        assert_eq!(a.get(0, 0), 30.0);
        assert_eq!(a.get(1, 2), 96.0);
        assert_eq!(a.get(2, 2), 150.0);
    }

    #[test]
    fn test_columns_and_vector_product() {
        let mut m = Matrix3x3::<f64>::zero();
        m.set_column(1, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m.column(1), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m * Vector3::new(0.0, 2.0, 0.0), Vector3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_add_sub_scale() {
        let m = sample();
        let sum = m + Matrix3x3::identity();
        assert_eq!(sum.get(0, 0), 3.0);
        assert_eq!((sum - m), Matrix3x3::identity());
        assert_eq!((m * 2.0).get(1, 2), -2.0);
    }
}
