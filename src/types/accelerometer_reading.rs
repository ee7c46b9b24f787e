use crate::impl_standard_traits;
use num_traits::Float;
use uniform_array_derive::UniformArray;

/// Standard gravity, in m/s², for platforms reporting acceleration in `g`.
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Specific force measured along the device axes, in m/s².
///
/// Readings follow the direction of gravity: a device resting face up
/// reports roughly `(0, 0, -9.81)`, one held upright `(0, -9.81, 0)`.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct AccelerometerReading<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> AccelerometerReading<T> {
    #[inline(always)]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Scales a reading given in multiples of [`STANDARD_GRAVITY`] to m/s².
    pub fn from_g_units(x: T, y: T, z: T) -> Self
    where
        T: Float,
    {
        let g = T::from(STANDARD_GRAVITY).unwrap_or_else(T::one);
        Self::new(x * g, y * g, z * g)
    }

    /// Takes the reading from a device whose x, y and z axes point east, north and up.
    #[cfg(feature = "coordinate-frame")]
    #[cfg_attr(docsrs, doc(cfg(feature = "coordinate-frame")))]
    pub fn from_enu<C>(force: C) -> Self
    where
        C: Into<coordinate_frame::EastNorthUp<T>>,
        T: Clone,
    {
        let enu = force.into();
        Self::new(enu.x(), enu.y(), enu.z())
    }
}

impl_standard_traits!(AccelerometerReading, T, x, y, z);
