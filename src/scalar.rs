//! This module defines [`RayScalar`], the numeric abstraction shared by single rays and
//! ray packets.
//!
//! A scalar is either one float (`f32`, `f64`) or a SIMD register holding one float per
//! lane. Every comparison yields a [`Mask`] with one flag per lane, and every conditional
//! update goes through a lane-wise `select`, so the same traversal code serves both.

use core::fmt::Debug;

use nalgebra::{SimdBool, SimdRealField, SimdValue};

use crate::bounding_hierarchy::BHValue;

/// Lane-wise boolean of a [`RayScalar`]. `bool` for plain floats.
pub type Mask<T> = <T as SimdValue>::SimdBool;

/// Index stored for lanes which did not hit any primitive.
pub const INVALID_PRIMITIVE: u32 = u32::MAX;

/// A floating point type the traversal kernel can trace rays with.
///
/// Implemented for `f32` and `f64`, and with the `simd` feature for the `wide`-backed
/// packet types [`simba::simd::WideF32x4`], [`simba::simd::WideF32x8`] and
/// [`simba::simd::WideF64x4`].
pub trait RayScalar: SimdRealField + Copy {
    /// The scalar type of a single lane.
    type Lane: RayScalar + BHValue;

    /// Per-lane primitive identifiers.
    type Index: Copy + Debug + PartialEq + Send + Sync;

    /// The largest finite distance in every lane. Default `max_t` of all queries.
    fn max_distance() -> Self;

    /// Broadcasts `value` to every lane.
    fn splat_lane(value: Self::Lane) -> Self;

    /// Reads lane `i`.
    fn lane(&self, i: usize) -> Self::Lane;

    /// Overwrites lane `i` with `value`.
    fn set_lane(&mut self, i: usize, value: Self::Lane);

    /// Builds a scalar from exactly `Self::LANES` lane values.
    fn from_lane_slice(lanes: &[Self::Lane]) -> Option<Self>;

    /// Broadcasts one primitive identifier to every lane.
    fn index_splat(id: u32) -> Self::Index;

    /// Takes `a` in lanes where `mask` is set and `b` elsewhere.
    fn index_select(mask: Mask<Self>, a: Self::Index, b: Self::Index) -> Self::Index;

    /// Reads lane `i` of an identifier.
    fn index_lane(index: &Self::Index, i: usize) -> u32;

    /// A mask with every lane cleared.
    #[inline(always)]
    fn none_mask() -> Mask<Self> {
        Self::zero().simd_gt(Self::zero())
    }

    /// A mask with every lane set.
    #[inline(always)]
    fn all_mask() -> Mask<Self> {
        !Self::none_mask()
    }

    /// Returns whether every lane of `mask` is set.
    #[inline(always)]
    fn all_lanes(mask: Mask<Self>) -> bool {
        // Goes through the bitmask, `SimdBool::all` is not provided by every backend.
        mask.bitmask() == (1u64 << Self::LANES) - 1
    }

    /// Returns whether at least one lane of `mask` is set.
    #[inline(always)]
    fn any_lane(mask: Mask<Self>) -> bool {
        mask.bitmask() != 0
    }
}

/// Returns whether lane `i` of `mask` is set.
#[inline(always)]
pub fn mask_lane<M: SimdBool>(mask: M, i: usize) -> bool {
    mask.bitmask() & (1 << i) != 0
}

macro_rules! impl_float_ray_scalar {
    ($t:ty) => {
        impl RayScalar for $t {
            type Lane = $t;
            type Index = u32;

            #[inline(always)]
            fn max_distance() -> Self {
                <$t>::MAX
            }

            #[inline(always)]
            fn splat_lane(value: $t) -> Self {
                value
            }

            #[inline(always)]
            fn lane(&self, _i: usize) -> $t {
                *self
            }

            #[inline(always)]
            fn set_lane(&mut self, _i: usize, value: $t) {
                *self = value;
            }

            fn from_lane_slice(lanes: &[$t]) -> Option<Self> {
                match lanes {
                    [value] => Some(*value),
                    _ => None,
                }
            }

            #[inline(always)]
            fn index_splat(id: u32) -> u32 {
                id
            }

            #[inline(always)]
            fn index_select(mask: bool, a: u32, b: u32) -> u32 {
                if mask {
                    a
                } else {
                    b
                }
            }

            #[inline(always)]
            fn index_lane(index: &u32, _i: usize) -> u32 {
                *index
            }
        }
    };
}

impl_float_ray_scalar!(f32);
impl_float_ray_scalar!(f64);

#[cfg(feature = "simd")]
mod wide_impls {
    use simba::simd::{SimdBool as _, SimdValue as _, WideF32x4, WideF32x8, WideF64x4};
    use wide::{f32x4, f32x8, f64x4};

    use super::{Mask, RayScalar};

    macro_rules! impl_wide_ray_scalar {
        ($t:ident, $register:ident, $lane:ty, $lanes:expr) => {
            impl RayScalar for $t {
                type Lane = $lane;
                type Index = [u32; $lanes];

                #[inline(always)]
                fn max_distance() -> Self {
                    $t($register::splat(<$lane>::MAX))
                }

                #[inline(always)]
                fn splat_lane(value: $lane) -> Self {
                    $t($register::splat(value))
                }

                #[inline(always)]
                fn lane(&self, i: usize) -> $lane {
                    self.extract(i)
                }

                #[inline(always)]
                fn set_lane(&mut self, i: usize, value: $lane) {
                    self.replace(i, value)
                }

                fn from_lane_slice(lanes: &[$lane]) -> Option<Self> {
                    let lanes: [$lane; $lanes] = lanes.try_into().ok()?;
                    Some($t($register::from(lanes)))
                }

                #[inline(always)]
                fn index_splat(id: u32) -> [u32; $lanes] {
                    [id; $lanes]
                }

                #[inline(always)]
                fn index_select(
                    mask: Mask<Self>,
                    a: [u32; $lanes],
                    b: [u32; $lanes],
                ) -> [u32; $lanes] {
                    let bits = mask.bitmask();
                    core::array::from_fn(|i| if bits & (1 << i) != 0 { a[i] } else { b[i] })
                }

                #[inline(always)]
                fn index_lane(index: &[u32; $lanes], i: usize) -> u32 {
                    index[i]
                }
            }
        };
    }

    impl_wide_ray_scalar!(WideF32x4, f32x4, f32, 4);
    impl_wide_ray_scalar!(WideF32x8, f32x8, f32, 8);
    impl_wide_ray_scalar!(WideF64x4, f64x4, f64, 4);
}
