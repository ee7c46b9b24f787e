/// Implements the common value traits of a three-component sample type
/// and its conversions from and into [`Vector3`](crate::types::Vector3).
///
/// The type must provide a `const fn new(a, b, c)` constructor taking the
/// components in the order given to the macro.
#[macro_export]
macro_rules! impl_standard_traits {
    ($type_name:ident, $type_param:ident, $x:ident, $y:ident, $z:ident) => {
        impl<$type_param> Copy for $type_name<$type_param> where $type_param: Copy {}

        impl<$type_param> Clone for $type_name<$type_param>
        where
            $type_param: Clone,
        {
            fn clone(&self) -> Self {
                Self {
                    $x: self.$x.clone(),
                    $y: self.$y.clone(),
                    $z: self.$z.clone(),
                }
            }
        }

        impl<$type_param> Default for $type_name<$type_param>
        where
            $type_param: Default,
        {
            #[inline]
            fn default() -> Self {
                Self::new(Default::default(), Default::default(), Default::default())
            }
        }

        impl<$type_param> core::fmt::Debug for $type_name<$type_param>
        where
            $type_param: core::fmt::Debug,
        {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_tuple(stringify!($type_name))
                    .field(&self.$x)
                    .field(&self.$y)
                    .field(&self.$z)
                    .finish()
            }
        }

        impl<$type_param> core::ops::Mul<$type_param> for $type_name<$type_param>
        where
            $type_param: core::ops::Mul<$type_param, Output = $type_param> + Clone,
        {
            type Output = $type_name<$type_param>;

            #[inline]
            fn mul(self, rhs: $type_param) -> Self::Output {
                Self {
                    $x: self.$x * rhs.clone(),
                    $y: self.$y * rhs.clone(),
                    $z: self.$z * rhs,
                }
            }
        }

        impl<$type_param> From<$type_name<$type_param>> for $crate::types::Vector3<$type_param> {
            #[inline]
            fn from(value: $type_name<$type_param>) -> Self {
                Self::new(value.$x, value.$y, value.$z)
            }
        }

        impl<$type_param> From<&$type_name<$type_param>> for $crate::types::Vector3<$type_param>
        where
            $type_param: Clone,
        {
            #[inline]
            fn from(value: &$type_name<$type_param>) -> Self {
                Self::new(value.$x.clone(), value.$y.clone(), value.$z.clone())
            }
        }

        impl<$type_param> From<$crate::types::Vector3<$type_param>> for $type_name<$type_param> {
            #[inline]
            fn from(value: $crate::types::Vector3<$type_param>) -> Self {
                Self::new(value.x, value.y, value.z)
            }
        }

        #[cfg(test)]
        paste::paste! {
            #[cfg(test)]
            mod [<tests_gen_ $type_name:lower>] {
                use super::*;

                #[test]
                fn test_default_is_zero() {
                    let value = $type_name::<f64>::default();
                    assert_eq!(value.$x, 0.0);
                    assert_eq!(value.$y, 0.0);
                    assert_eq!(value.$z, 0.0);
                }

                #[test]
                fn test_vector_conversion() {
                    let value = $type_name::<f64>::new(1.0, 2.0, 3.0);
                    let vector: $crate::types::Vector3<f64> = (&value).into();
                    assert_eq!((vector.x, vector.y, vector.z), (1.0, 2.0, 3.0));

                    let back = $type_name::from(vector);
                    assert_eq!((back.$x, back.$y, back.$z), (1.0, 2.0, 3.0));
                }

                #[test]
                fn test_scale() {
                    let value = $type_name::<f64>::new(1.0, -2.0, 0.5) * 2.0;
                    assert_eq!((value.$x, value.$y, value.$z), (2.0, -4.0, 1.0));
                }
            }
        }
    };
}
