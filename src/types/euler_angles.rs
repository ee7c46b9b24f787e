use crate::impl_standard_traits;
use num_traits::Float;
use uniform_array_derive::UniformArray;

/// Head angles as reported by [`HeadTransform`](crate::HeadTransform).
///
/// Pitch turns about the x-axis (nodding), yaw about the y-axis (shaking)
/// and roll about the z-axis (tilting).
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct EulerAngles<T> {
    pub pitch: T,
    pub yaw: T,
    pub roll: T,
}

impl<T> EulerAngles<T> {
    /// Initializes a new [`EulerAngles`] instance.
    #[inline(always)]
    pub const fn new(pitch: T, yaw: T, roll: T) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Converts angles given in radians to degrees.
    pub fn to_degrees(self) -> Self
    where
        T: Float,
    {
        Self::new(self.pitch.to_degrees(), self.yaw.to_degrees(), self.roll.to_degrees())
    }
}

impl_standard_traits!(EulerAngles, T, pitch, yaw, roll);

#[cfg(test)]
mod test {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn test_order() {
        let angles = EulerAngles::<f64>::new(0.1, 0.2, 0.3);
        assert_eq!(angles[0], 0.1);
        assert_eq!(angles[2], 0.3);
        assert_eq!(angles.len(), 3);
    }

    #[test]
    fn test_to_degrees() {
        let angles = EulerAngles::new(FRAC_PI_2, -FRAC_PI_2, 0.0).to_degrees();
        assert_eq!((angles.pitch, angles.yaw, angles.roll), (90.0, -90.0, 0.0));
    }
}
