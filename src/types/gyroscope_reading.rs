use crate::impl_standard_traits;
use uniform_array_derive::UniformArray;

/// Angular velocity of the device about its own axes, in rad/s.
///
/// Positive rates turn counter-clockwise when looking down the axis.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct GyroscopeReading<T> {
    pub omega_x: T,
    pub omega_y: T,
    pub omega_z: T,
}

impl<T> GyroscopeReading<T> {
    #[inline(always)]
    pub const fn new(omega_x: T, omega_y: T, omega_z: T) -> Self {
        Self {
            omega_x,
            omega_y,
            omega_z,
        }
    }

    /// Takes the rates from a device whose x, y and z axes point east, north and up.
    #[cfg(feature = "coordinate-frame")]
    #[cfg_attr(docsrs, doc(cfg(feature = "coordinate-frame")))]
    pub fn from_enu<C>(rate: C) -> Self
    where
        C: Into<coordinate_frame::EastNorthUp<T>>,
        T: Clone,
    {
        let enu = rate.into();
        Self::new(enu.x(), enu.y(), enu.z())
    }
}

impl_standard_traits!(GyroscopeReading, T, omega_x, omega_y, omega_z);

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Vector3;

    #[test]
    fn test_axis_order() {
        let reading = GyroscopeReading::<f64>::new(0.5, -1.0, 2.0);
        assert_eq!(reading.len(), 3);
        assert_eq!(reading[1], -1.0);
        assert_eq!(Vector3::from(reading), Vector3::new(0.5, -1.0, 2.0));
    }

    #[test]
    #[cfg(feature = "coordinate-frame")]
    fn test_from_enu() {
        let reading = GyroscopeReading::from_enu(coordinate_frame::EastNorthUp::new(0.1, 0.2, 0.3));
        assert_eq!((reading.omega_x, reading.omega_y, reading.omega_z), (0.1, 0.2, 0.3));
    }
}
