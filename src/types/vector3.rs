use core::borrow::Borrow;
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use num_traits::Float;
use uniform_array_derive::UniformArray;

/// A column vector of three components; indexable as `v[0]..v[2]`.
#[derive(UniformArray, Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

/// Shorthand for the double precision vectors used by the filter.
pub type Vector3d = Vector3<f64>;

impl<T> Vector3<T> {
    /// Initializes a new [`Vector3`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Sets the component with the given index; indices greater than one select `z`.
    pub fn set_component(&mut self, index: usize, value: T) {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            _ => self.z = value,
        }
    }
}

impl<T> Vector3<T>
where
    T: Float,
{
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// The unit vector along `x`, `y` or `z` for indices 0, 1 and anything above.
    pub fn unit(index: usize) -> Self {
        let mut axis = Self::zero();
        axis.set_component(index, T::one());
        axis
    }

    #[doc(alias = "length_squared")]
    pub fn norm_sq(&self) -> T {
        self.dot(self)
    }

    #[doc(alias = "length")]
    pub fn norm(&self) -> T {
        self.norm_sq().sqrt()
    }

    /// The unit vector in the same direction. The zero vector stays zero.
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == T::zero() {
            *self
        } else {
            *self * norm.recip()
        }
    }

    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    pub fn scale(&mut self, factor: T) {
        *self = *self * factor;
    }

    pub fn dot<V>(&self, rhs: V) -> T
    where
        V: Borrow<Self>,
    {
        let rhs = rhs.borrow();
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross<V>(&self, rhs: V) -> Self
    where
        V: Borrow<Self>,
    {
        let rhs = rhs.borrow();
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Index of the component with the largest magnitude; ties go to the later axis.
    pub fn largest_abs_component(&self) -> usize {
        let (x, y, z) = (self.x.abs(), self.y.abs(), self.z.abs());
        match (x > y, x > z, y > z) {
            (true, true, _) => 0,
            (true, false, _) => 2,
            (false, _, true) => 1,
            (false, _, false) => 2,
        }
    }

    /// A unit vector perpendicular to this one.
    ///
    /// Built by crossing with the axis before the largest component, wrapping
    /// from `x` around to `z`.
    pub fn ortho(&self) -> Self {
        let axis = (self.largest_abs_component() + 2) % 3;
        self.cross(Self::unit(axis)).normalized()
    }

    /// Whether no component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl<T> Neg for Vector3<T>
where
    T: Neg<Output = T>,
{
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// `a * b` between two vectors is their dot product.
impl<T> Mul for Vector3<T>
where
    T: Float,
{
    type Output = T;

    fn mul(self, rhs: Self) -> T {
        self.dot(rhs)
    }
}

impl<T> Mul<T> for Vector3<T>
where
    T: Float,
{
    type Output = Self;

    fn mul(self, factor: T) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

macro_rules! impl_componentwise {
    ($op:ident, $method:ident, $assign_op:ident, $assign_method:ident) => {
        impl<T> $op for Vector3<T>
        where
            T: $op<Output = T>,
        {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self::new(self.x.$method(rhs.x), self.y.$method(rhs.y), self.z.$method(rhs.z))
            }
        }

        impl<T> $assign_op for Vector3<T>
        where
            T: $assign_op,
        {
            fn $assign_method(&mut self, rhs: Self) {
                self.x.$assign_method(rhs.x);
                self.y.$assign_method(rhs.y);
                self.z.$assign_method(rhs.z);
            }
        }
    };
}

impl_componentwise!(Add, add, AddAssign, add_assign);
impl_componentwise!(Sub, sub, SubAssign, sub_assign);

impl<T> From<Vector3<T>> for (T, T, T) {
    fn from(v: Vector3<T>) -> Self {
        (v.x, v.y, v.z)
    }
}

impl<T> From<[T; 3]> for Vector3<T> {
    fn from([x, y, z]: [T; 3]) -> Self {
        Self::new(x, y, z)
    }
}
