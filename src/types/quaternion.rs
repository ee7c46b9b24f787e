use core::fmt::{Debug, Formatter};
use num_traits::Float;
use uniform_array_derive::UniformArray;

/// A rotation quaternion with the scalar part last.
#[derive(UniformArray, Copy, Clone, PartialEq)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct Quaternion<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

impl<T> Quaternion<T> {
    /// Initializes a new [`Quaternion`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w }
    }

    /// The identity rotation.
    pub fn identity() -> Self
    where
        T: Float,
    {
        Self::new(T::zero(), T::zero(), T::zero(), T::one())
    }

    /// Calculates the quaternion norm.
    pub fn norm(&self) -> T
    where
        T: Float,
    {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }
}

impl<T> Default for Quaternion<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::identity()
    }
}

impl<T> Debug for Quaternion<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Quaternion")
            .field(&self.x)
            .field(&self.y)
            .field(&self.z)
            .field(&self.w)
            .finish()
    }
}
